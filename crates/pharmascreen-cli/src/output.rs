use std::io::Write;

use owo_colors::OwoColorize;
use pharmascreen_extract::{Extraction, NO_EMAIL};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the search result count before processing starts.
pub fn print_search_summary(
    w: &mut dyn Write,
    query: &str,
    count: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "Searching PubMed for {}... found {} papers",
            format!("\"{}\"", query).bold(),
            count
        )?;
    } else {
        writeln!(w, "Searching PubMed for \"{}\"... found {} papers", query, count)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print the per-paper progress line.
pub fn print_fetching(
    w: &mut dyn Write,
    index: usize,
    total: usize,
    pmid: &str,
) -> std::io::Result<()> {
    writeln!(w, "[{}/{}] Fetching PMID {}", index + 1, total, pmid)
}

/// Print the extraction outcome for one paper.
pub fn print_extraction(
    w: &mut dyn Write,
    title: &str,
    extraction: &Extraction,
    color: ColorMode,
) -> std::io::Result<()> {
    let short = if title.len() > 60 {
        format!("{}...", &title[..60])
    } else {
        title.to_string()
    };
    writeln!(w, "  \"{}\"", short)?;

    if extraction.company_affiliations.is_empty() {
        if color.enabled() {
            writeln!(w, "  -> {}", "no industry affiliation".dimmed())?;
        } else {
            writeln!(w, "  -> no industry affiliation")?;
        }
    } else if color.enabled() {
        writeln!(
            w,
            "  -> {} ({} company affiliations)",
            "FLAGGED".yellow(),
            extraction.company_affiliations.len()
        )?;
    } else {
        writeln!(
            w,
            "  -> FLAGGED ({} company affiliations)",
            extraction.company_affiliations.len()
        )?;
    }

    if extraction.contact_email != NO_EMAIL {
        writeln!(w, "  -> contact: {}", extraction.contact_email)?;
    }
    Ok(())
}

/// Print a skipped-paper line after a fetch failure.
pub fn print_fetch_failure(
    w: &mut dyn Write,
    pmid: &str,
    message: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "  -> {} {} ({})", "SKIPPED".red(), pmid, message)
    } else {
        writeln!(w, "  -> SKIPPED {} ({})", pmid, message)
    }
}

/// Print the cancellation notice.
pub fn print_cancelled(
    w: &mut dyn Write,
    buffered: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!("Cancelled; flushing {} buffered rows", buffered);
    if color.enabled() {
        writeln!(w, "{}", msg.yellow())
    } else {
        writeln!(w, "{}", msg)
    }
}
