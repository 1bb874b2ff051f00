//! Per-author affiliation classification against the pharma/biotech keyword set.

use crate::article::ParsedArticle;

/// Keywords marking an affiliation as pharmaceutical/biotech industry.
/// Substring match on lower-cased text, so "pharmacology" matches "pharma" —
/// a known precision limitation that downstream consumers rely on.
pub const PHARMA_KEYWORDS: &[&str] = &[
    "pharmaceutical",
    "biotech",
    "biotechnology",
    "drug company",
    "pharma",
];

/// Per-document classification result. The three lists are parallel over the
/// set of authors that carry a non-empty affiliation:
/// `affiliations.len() == non_academic_authors.len() + company_affiliations.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffiliationRecord {
    /// Every non-empty affiliation, lower-cased, document order, duplicates kept.
    pub affiliations: Vec<String>,
    /// Last names of authors whose affiliation matched no keyword.
    pub non_academic_authors: Vec<String>,
    /// Lower-cased affiliation texts that matched a keyword.
    pub company_affiliations: Vec<String>,
}

/// Classify with the default keyword set.
pub fn classify(article: &ParsedArticle) -> AffiliationRecord {
    classify_with(article, PHARMA_KEYWORDS)
}

/// Classify against an explicit keyword set.
///
/// Authors without an affiliation contribute to none of the output lists.
/// An author with an unmatched affiliation but no last name is recorded as
/// "Unknown".
pub fn classify_with(article: &ParsedArticle, keywords: &[&str]) -> AffiliationRecord {
    let mut record = AffiliationRecord::default();

    for author in &article.authors {
        let Some(aff) = author.affiliation.as_deref().filter(|a| !a.is_empty()) else {
            continue;
        };

        let aff_text = aff.to_lowercase();
        record.affiliations.push(aff_text.clone());

        if keywords.iter().any(|k| aff_text.contains(k)) {
            record.company_affiliations.push(aff_text);
        } else {
            record.non_academic_authors.push(
                author
                    .last_name
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
            );
        }
    }

    record
}
