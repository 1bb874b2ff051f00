//! CSV persistence for screened paper records.
//!
//! Rows are appended in insertion order; the header is written only when the
//! target file is missing or empty, so repeated runs against the same file
//! never duplicate it.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

const HEADER: &str = "PubMedID,Title,Publication Date,Company Affiliations,Email ID,Summary";

/// Placeholder for an empty company-affiliation list.
const NO_AFFILIATIONS: &str = "N/A";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One output row. Immutable once built.
#[derive(Debug, Clone)]
pub struct PaperRecord {
    pub pubmed_id: String,
    pub title: String,
    pub pub_date: String,
    pub company_affiliations: Vec<String>,
    pub email: String,
    pub summary: String,
}

impl PaperRecord {
    fn to_row(&self) -> String {
        let company = if self.company_affiliations.is_empty() {
            NO_AFFILIATIONS.to_string()
        } else {
            self.company_affiliations.join("; ")
        };

        format!(
            "{},{},{},{},{},{}",
            csv_escape(&self.pubmed_id),
            csv_escape(&self.title),
            csv_escape(&self.pub_date),
            csv_escape(&company),
            csv_escape(&self.email),
            csv_escape(&self.summary),
        )
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Append `records` to the CSV at `path`, creating parent directories and
/// writing the header only for a new or empty file. The content is built up
/// front and written in a single call.
pub fn append_records(path: &Path, records: &[PaperRecord]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let needs_header = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };

    let mut content = String::new();
    if needs_header {
        content.push_str(HEADER);
        content.push('\n');
    }
    for record in records {
        content.push_str(&record.to_row());
        content.push('\n');
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    tracing::info!(path = %path.display(), rows = records.len(), "results saved");
    Ok(())
}
