use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use pharmascreen_extract::parse_article_str;
use pharmascreen_pubmed::PubMedClient;
use pharmascreen_report::{PaperRecord, append_records};
use pharmascreen_summarize::{BartSummarizer, summarize_document};

mod config;
mod output;

use output::ColorMode;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SUMMARY_MAX_LENGTH: u32 = 400;

/// Screen PubMed search results for pharma/biotech author affiliations
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// PubMed search query
    query: String,

    /// Maximum number of papers to fetch
    max_results: usize,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Output CSV path
    #[arg(short, long, default_value = "output/research_papers.csv")]
    file: PathBuf,

    /// NCBI API key
    #[arg(long)]
    api_key: Option<String>,

    /// Token for the hosted summarization endpoint
    #[arg(long)]
    hf_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let file_config = config::load_config();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let api_key = cli
        .api_key
        .or_else(|| std::env::var("PUBMED_API_KEY").ok())
        .or_else(|| {
            file_config
                .api_keys
                .as_ref()
                .and_then(|a| a.pubmed_api_key.clone())
        });
    let hf_token = cli
        .hf_token
        .or_else(|| std::env::var("HF_API_TOKEN").ok())
        .or_else(|| {
            file_config
                .api_keys
                .as_ref()
                .and_then(|a| a.hf_api_token.clone())
        });
    let timeout_secs = cli
        .timeout
        .or_else(|| {
            std::env::var("PUBMED_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or_else(|| file_config.http.as_ref().and_then(|h| h.timeout_secs))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let endpoint = file_config
        .summarizer
        .as_ref()
        .and_then(|s| s.endpoint.clone())
        .unwrap_or_else(|| pharmascreen_summarize::DEFAULT_ENDPOINT.to_string());
    let summary_max_length = file_config
        .summarizer
        .as_ref()
        .and_then(|s| s.max_length)
        .unwrap_or(DEFAULT_SUMMARY_MAX_LENGTH);

    let color = ColorMode(!cli.no_color);
    let timeout = Duration::from_secs(timeout_secs);
    let client = PubMedClient::new(api_key, timeout);
    let summarizer = BartSummarizer::new(endpoint, hf_token, timeout);

    // Ctrl+C stops the pipeline between papers; buffered rows still flush
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let ids = client.search(&cli.query, cli.max_results).await?;

    let mut stdout = std::io::stdout();
    output::print_search_summary(&mut stdout, &cli.query, ids.len(), color)?;

    if ids.is_empty() {
        writeln!(stdout, "Nothing to do.")?;
        return Ok(());
    }

    let mut records: Vec<PaperRecord> = Vec::with_capacity(ids.len());
    for (i, pmid) in ids.iter().enumerate() {
        if cancel.is_cancelled() {
            output::print_cancelled(&mut stdout, records.len(), color)?;
            break;
        }

        output::print_fetching(&mut stdout, i, ids.len(), pmid)?;

        let xml = match client.fetch_xml(pmid).await {
            Ok(xml) => xml,
            Err(e) => {
                tracing::warn!(%pmid, error = %e, "efetch failed, skipping paper");
                output::print_fetch_failure(&mut stdout, pmid, &e.to_string(), color)?;
                continue;
            }
        };
        let meta = match client.summary(pmid).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(%pmid, error = %e, "esummary failed, skipping paper");
                output::print_fetch_failure(&mut stdout, pmid, &e.to_string(), color)?;
                continue;
            }
        };

        // Malformed article XML fails the whole run; partial rows are worse
        // than no rows here
        let article = parse_article_str(&xml)?;
        let extraction = pharmascreen_extract::extract(&article);
        let summary = summarize_document(&summarizer, &xml, summary_max_length).await;

        tracing::debug!(
            %pmid,
            affiliations = extraction.affiliations.len(),
            company = extraction.company_affiliations.len(),
            email = %extraction.contact_email,
            "extracted"
        );
        output::print_extraction(&mut stdout, &meta.title, &extraction, color)?;

        records.push(PaperRecord {
            pubmed_id: pmid.clone(),
            title: meta.title,
            pub_date: meta.pubdate,
            company_affiliations: extraction.company_affiliations,
            email: extraction.contact_email,
            summary,
        });
    }

    append_records(&cli.file, &records)?;
    writeln!(
        stdout,
        "\n{} rows saved to {}",
        records.len(),
        cli.file.display()
    )?;

    Ok(())
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
