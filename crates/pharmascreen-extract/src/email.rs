//! Contact email lookup over a parsed article.
//!
//! Email placement in PubMed exports is inconsistent across publishers, so
//! the search runs tiers in decreasing reliability: structured author email
//! fields, then affiliation free text, then comment/correction notes. The
//! first hit wins and later tiers are never consulted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::article::ParsedArticle;

/// Sentinel returned when no tier produces an email.
pub const NO_EMAIL: &str = "N/A";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// Extract the first email-shaped substring from free text.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

fn explicit_author_field(article: &ParsedArticle) -> Option<String> {
    article
        .authors
        .iter()
        .find_map(|a| a.email.as_deref().filter(|e| !e.is_empty()))
        .map(String::from)
}

fn affiliation_free_text(article: &ParsedArticle) -> Option<String> {
    article
        .authors
        .iter()
        .filter_map(|a| a.affiliation.as_deref())
        .find_map(extract_email)
}

fn correction_notes(article: &ParsedArticle) -> Option<String> {
    article
        .corrections
        .iter()
        .find_map(|c| extract_email(c))
}

/// Find the best-candidate contact email, or `"N/A"`. Never fails.
pub fn find_contact_email(article: &ParsedArticle) -> String {
    const TIERS: &[fn(&ParsedArticle) -> Option<String>] = &[
        explicit_author_field,
        affiliation_free_text,
        correction_notes,
    ];

    TIERS
        .iter()
        .find_map(|tier| tier(article))
        .unwrap_or_else(|| NO_EMAIL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleAuthor;

    fn article(authors: Vec<ArticleAuthor>, corrections: Vec<&str>) -> ParsedArticle {
        ParsedArticle {
            authors,
            corrections: corrections.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email("Contact: jane.doe+lab@uni-example.edu, room 4").as_deref(),
            Some("jane.doe+lab@uni-example.edu")
        );
        assert!(extract_email("no address here").is_none());
        // TLD must be at least two letters
        assert!(extract_email("bad@host.x").is_none());
    }

    #[test]
    fn test_explicit_field_beats_affiliation_text() {
        let a = article(
            vec![
                ArticleAuthor {
                    last_name: Some("Smith".into()),
                    email: Some("smith@explicit.org".into()),
                    affiliation: Some("University, freetext@affil.org".into()),
                },
            ],
            vec![],
        );
        assert_eq!(find_contact_email(&a), "smith@explicit.org");
    }

    #[test]
    fn test_affiliation_fallback() {
        let a = article(
            vec![ArticleAuthor {
                last_name: Some("Smith".into()),
                email: None,
                affiliation: Some("State University. Electronic address: s.smith@state.edu.".into()),
            }],
            vec![],
        );
        assert_eq!(find_contact_email(&a), "s.smith@state.edu");
    }

    #[test]
    fn test_corrections_fallback() {
        let a = article(
            vec![ArticleAuthor::default()],
            vec!["Erratum: contact errata@journal.com"],
        );
        assert_eq!(find_contact_email(&a), "errata@journal.com");
    }

    #[test]
    fn test_document_order_within_tier() {
        let a = article(
            vec![
                ArticleAuthor {
                    last_name: None,
                    email: None,
                    affiliation: Some("No address".into()),
                },
                ArticleAuthor {
                    last_name: None,
                    email: Some("second@author.org".into()),
                    affiliation: None,
                },
                ArticleAuthor {
                    last_name: None,
                    email: Some("third@author.org".into()),
                    affiliation: None,
                },
            ],
            vec![],
        );
        assert_eq!(find_contact_email(&a), "second@author.org");
    }

    #[test]
    fn test_sentinel_when_nothing_matches() {
        let a = article(
            vec![ArticleAuthor {
                last_name: Some("Smith".into()),
                email: None,
                affiliation: Some("State University".into()),
            }],
            vec!["Comment on: Nat Med. 2020"],
        );
        assert_eq!(find_contact_email(&a), NO_EMAIL);
    }

    #[test]
    fn test_empty_explicit_field_falls_through() {
        let a = article(
            vec![ArticleAuthor {
                last_name: None,
                email: Some(String::new()),
                affiliation: Some("Lab, lab@inst.edu".into()),
            }],
            vec![],
        );
        assert_eq!(find_contact_email(&a), "lab@inst.edu");
    }
}
