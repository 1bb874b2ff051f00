//! Affiliation and contact-email extraction from PubMed article XML.
//!
//! The input is the raw efetch document for one paper. [`parse_article`]
//! builds the navigable view once; [`extract`] runs the affiliation
//! classifier and the email locator over that same view.

pub mod article;
pub mod classify;
pub mod email;

pub use article::{ArticleAuthor, ParseError, ParsedArticle, parse_article, parse_article_str};
pub use classify::{AffiliationRecord, PHARMA_KEYWORDS, classify, classify_with};
pub use email::{NO_EMAIL, extract_email, find_contact_email};

/// Aggregate extraction result for one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub affiliations: Vec<String>,
    pub non_academic_authors: Vec<String>,
    pub company_affiliations: Vec<String>,
    /// A concrete address, or `"N/A"`. Never empty.
    pub contact_email: String,
}

/// Classify affiliations and locate the contact email in one pass over an
/// already-parsed article.
pub fn extract(article: &ParsedArticle) -> Extraction {
    let record = classify(article);
    let contact_email = find_contact_email(article);

    Extraction {
        affiliations: record.affiliations,
        non_academic_authors: record.non_academic_authors,
        company_affiliations: record.company_affiliations,
        contact_email,
    }
}
