use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api_keys: Option<ApiKeysConfig>,
    pub http: Option<HttpConfig>,
    pub summarizer: Option<SummarizerConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    pub pubmed_api_key: Option<String>,
    pub hf_api_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizerConfig {
    pub endpoint: Option<String>,
    pub max_length: Option<u32>,
}

/// Platform config directory path: `<config_dir>/pharmascreen/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pharmascreen").join("config.toml"))
}

/// Load config by cascading CWD `.pharmascreen.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".pharmascreen.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api_keys: Some(ApiKeysConfig {
            pubmed_api_key: overlay
                .api_keys
                .as_ref()
                .and_then(|a| a.pubmed_api_key.clone())
                .or_else(|| base.api_keys.as_ref().and_then(|a| a.pubmed_api_key.clone())),
            hf_api_token: overlay
                .api_keys
                .as_ref()
                .and_then(|a| a.hf_api_token.clone())
                .or_else(|| base.api_keys.as_ref().and_then(|a| a.hf_api_token.clone())),
        }),
        http: Some(HttpConfig {
            timeout_secs: overlay
                .http
                .as_ref()
                .and_then(|h| h.timeout_secs)
                .or_else(|| base.http.as_ref().and_then(|h| h.timeout_secs)),
        }),
        summarizer: Some(SummarizerConfig {
            endpoint: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.endpoint.clone())
                .or_else(|| base.summarizer.as_ref().and_then(|s| s.endpoint.clone())),
            max_length: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.max_length)
                .or_else(|| base.summarizer.as_ref().and_then(|s| s.max_length)),
        }),
    }
}
