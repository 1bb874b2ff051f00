//! NCBI E-utilities client: esearch for PMIDs, esummary for title/date,
//! efetch for the full article XML.

use std::time::Duration;

use thiserror::Error;

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const USER_AGENT: &str = "pharmascreen";

#[derive(Error, Debug)]
pub enum PubMedError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
}

/// Title and publication date from esummary. Fields that the API does not
/// return resolve to `"N/A"`, never to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperSummary {
    pub title: String,
    pub pubdate: String,
}

impl PaperSummary {
    pub fn unavailable() -> Self {
        Self {
            title: "N/A".to_string(),
            pubdate: "N/A".to_string(),
        }
    }
}

/// Client over the three E-utilities endpoints used by the pipeline.
pub struct PubMedClient {
    client: reqwest::Client,
    api_key: Option<String>,
    timeout: Duration,
}

impl PubMedClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            timeout,
        }
    }

    fn params<'a>(&'a self, mut params: Vec<(&'a str, String)>) -> Vec<(&'a str, String)> {
        if let Some(ref key) = self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Search PubMed, returning up to `retmax` PMIDs.
    pub async fn search(&self, query: &str, retmax: usize) -> Result<Vec<String>, PubMedError> {
        let url = format!("{}/esearch.fcgi", EUTILS_BASE);
        let params = self.params(vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmax", retmax.to_string()),
            ("retmode", "json".to_string()),
        ]);

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PubMedError::Status(status));
        }

        let data: serde_json::Value = resp.json().await?;
        Ok(parse_id_list(&data))
    }

    /// Fetch title and publication date for one PMID.
    ///
    /// A non-200 response yields `PaperSummary::unavailable()` rather than an
    /// error; only transport failures propagate.
    pub async fn summary(&self, pmid: &str) -> Result<PaperSummary, PubMedError> {
        let url = format!("{}/esummary.fcgi", EUTILS_BASE);
        let params = self.params(vec![
            ("db", "pubmed".to_string()),
            ("id", pmid.to_string()),
            ("retmode", "json".to_string()),
        ]);

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            tracing::debug!(pmid, status = %resp.status(), "esummary returned non-200");
            return Ok(PaperSummary::unavailable());
        }

        let data: serde_json::Value = resp.json().await?;
        Ok(parse_summary(&data, pmid))
    }

    /// Fetch the raw article XML for one PMID.
    pub async fn fetch_xml(&self, pmid: &str) -> Result<String, PubMedError> {
        let url = format!("{}/efetch.fcgi", EUTILS_BASE);
        let params = self.params(vec![
            ("db", "pubmed".to_string()),
            ("id", pmid.to_string()),
            ("retmode", "xml".to_string()),
        ]);

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PubMedError::Status(status));
        }

        Ok(resp.text().await?)
    }
}

/// Pull `esearchresult.idlist` out of an esearch response. Missing or
/// malformed fields yield an empty list.
fn parse_id_list(data: &serde_json::Value) -> Vec<String> {
    data["esearchresult"]["idlist"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Pull title and pubdate for `pmid` out of an esummary response.
fn parse_summary(data: &serde_json::Value, pmid: &str) -> PaperSummary {
    let result = &data["result"][pmid];
    PaperSummary {
        title: result["title"].as_str().unwrap_or("N/A").to_string(),
        pubdate: result["pubdate"].as_str().unwrap_or("N/A").to_string(),
    }
}
