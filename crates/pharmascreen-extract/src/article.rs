//! SAX-style parser for PubMed efetch XML.
//!
//! Extracts the author entries and comment/correction notes needed by the
//! classifier and the email locator. Everything else in the document is
//! skipped without buffering.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

/// One `<Author>` entry from the article.
#[derive(Debug, Clone, Default)]
pub struct ArticleAuthor {
    /// `<LastName>` text, if present.
    pub last_name: Option<String>,
    /// Direct `<Email>` child of the author, if present.
    pub email: Option<String>,
    /// First `<AffiliationInfo><Affiliation>` text, if present.
    pub affiliation: Option<String>,
}

/// A parsed article: authors in document order plus the text of any
/// `<CommentsCorrections>` nodes. Read-only after parsing.
#[derive(Debug, Clone, Default)]
pub struct ParsedArticle {
    pub authors: Vec<ArticleAuthor>,
    pub corrections: Vec<String>,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed article XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Which author child element we're currently reading text for.
enum Field {
    LastName,
    Email,
    Affiliation,
}

/// Parse a PubMed efetch document.
///
/// Malformed XML is a hard error: a truncated or corrupt response must not
/// produce partial extraction output.
pub fn parse_article<R: BufRead>(reader: R) -> Result<ParsedArticle, ParseError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);

    let mut article = ParsedArticle::default();

    // State
    let mut current_author: Option<ArticleAuthor> = None;
    let mut in_affiliation_info = false;
    let mut reading: Option<Field> = None;
    let mut text_buf = String::new();
    let mut correction_depth: usize = 0;
    let mut correction_buf = String::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.name();
                match name.as_ref() {
                    b"Author" if correction_depth == 0 => {
                        current_author = Some(ArticleAuthor::default());
                        in_affiliation_info = false;
                        reading = None;
                    }
                    b"LastName" if current_author.is_some() => {
                        reading = Some(Field::LastName);
                        text_buf.clear();
                    }
                    b"Email" if current_author.is_some() && !in_affiliation_info => {
                        reading = Some(Field::Email);
                        text_buf.clear();
                    }
                    b"AffiliationInfo" if current_author.is_some() => {
                        in_affiliation_info = true;
                    }
                    b"Affiliation" if in_affiliation_info => {
                        reading = Some(Field::Affiliation);
                        text_buf.clear();
                    }
                    b"CommentsCorrections" if correction_depth == 0 => {
                        correction_depth = 1;
                        correction_buf.clear();
                    }
                    _ if correction_depth > 0 => {
                        correction_depth += 1;
                    }
                    _ => {}
                }
            }

            Event::Text(ref e) => {
                let text = e.unescape()?;
                if correction_depth > 0 {
                    correction_buf.push_str(&text);
                } else if reading.is_some() {
                    text_buf.push_str(&text);
                }
            }

            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                if correction_depth > 0 {
                    correction_buf.push_str(&text);
                } else if reading.is_some() {
                    text_buf.push_str(&text);
                }
            }

            Event::End(ref e) => {
                let name = e.name();
                if correction_depth > 0 {
                    correction_depth -= 1;
                    if correction_depth == 0 {
                        let text = correction_buf.trim().to_string();
                        if !text.is_empty() {
                            article.corrections.push(text);
                        }
                    }
                    buf.clear();
                    continue;
                }

                match name.as_ref() {
                    b"Author" => {
                        if let Some(author) = current_author.take() {
                            article.authors.push(author);
                        }
                        reading = None;
                    }
                    b"AffiliationInfo" => {
                        in_affiliation_info = false;
                    }
                    b"LastName" | b"Email" | b"Affiliation" => {
                        if let (Some(field), Some(author)) =
                            (reading.take(), current_author.as_mut())
                        {
                            let text = text_buf.trim().to_string();
                            if !text.is_empty() {
                                match field {
                                    Field::LastName => author.last_name = Some(text),
                                    Field::Email => {
                                        if author.email.is_none() {
                                            author.email = Some(text);
                                        }
                                    }
                                    Field::Affiliation => {
                                        // Only the first affiliation per author is kept
                                        if author.affiliation.is_none() {
                                            author.affiliation = Some(text);
                                        }
                                    }
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }

            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    Ok(article)
}

/// Convenience wrapper for in-memory XML strings.
pub fn parse_article_str(xml: &str) -> Result<ParsedArticle, ParseError> {
    parse_article(xml.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authors() {
        let xml = r#"<?xml version="1.0"?>
<PubmedArticleSet>
<PubmedArticle><MedlineCitation><Article>
<AuthorList>
  <Author>
    <LastName>Smith</LastName>
    <ForeName>Jane</ForeName>
    <AffiliationInfo><Affiliation>Dept. of Biology, State University</Affiliation></AffiliationInfo>
  </Author>
  <Author>
    <LastName>Doe</LastName>
    <Email>jdoe@example.org</Email>
  </Author>
</AuthorList>
</Article></MedlineCitation></PubmedArticle>
</PubmedArticleSet>"#;

        let article = parse_article_str(xml).unwrap();
        assert_eq!(article.authors.len(), 2);
        assert_eq!(article.authors[0].last_name.as_deref(), Some("Smith"));
        assert_eq!(
            article.authors[0].affiliation.as_deref(),
            Some("Dept. of Biology, State University")
        );
        assert!(article.authors[0].email.is_none());
        assert_eq!(article.authors[1].email.as_deref(), Some("jdoe@example.org"));
        assert!(article.authors[1].affiliation.is_none());
    }

    #[test]
    fn test_first_affiliation_wins() {
        let xml = r#"<Author>
  <LastName>Lee</LastName>
  <AffiliationInfo><Affiliation>First Institute</Affiliation></AffiliationInfo>
  <AffiliationInfo><Affiliation>Second Institute</Affiliation></AffiliationInfo>
</Author>"#;

        let article = parse_article_str(xml).unwrap();
        assert_eq!(article.authors.len(), 1);
        assert_eq!(
            article.authors[0].affiliation.as_deref(),
            Some("First Institute")
        );
    }

    #[test]
    fn test_collective_author_has_no_fields() {
        let xml = r#"<AuthorList>
  <Author><CollectiveName>The Study Group</CollectiveName></Author>
</AuthorList>"#;

        let article = parse_article_str(xml).unwrap();
        assert_eq!(article.authors.len(), 1);
        assert!(article.authors[0].last_name.is_none());
        assert!(article.authors[0].affiliation.is_none());
    }

    #[test]
    fn test_comments_corrections_text() {
        let xml = r#"<MedlineCitation>
<CommentsCorrectionsList>
  <CommentsCorrections RefType="ErratumIn">
    <RefSource>Contact editor at errata@journal.com for details</RefSource>
  </CommentsCorrections>
  <CommentsCorrections RefType="CommentOn">
    <RefSource>Nat Med. 2020</RefSource>
  </CommentsCorrections>
</CommentsCorrectionsList>
</MedlineCitation>"#;

        let article = parse_article_str(xml).unwrap();
        assert_eq!(article.corrections.len(), 2);
        assert!(article.corrections[0].contains("errata@journal.com"));
    }

    #[test]
    fn test_affiliation_entities_unescaped() {
        let xml = r#"<Author>
  <LastName>Kim</LastName>
  <AffiliationInfo><Affiliation>R&amp;D Division, Acme Biotech</Affiliation></AffiliationInfo>
</Author>"#;

        let article = parse_article_str(xml).unwrap();
        assert_eq!(
            article.authors[0].affiliation.as_deref(),
            Some("R&D Division, Acme Biotech")
        );
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = "<Author><LastName>Broken</Author>";
        assert!(parse_article_str(xml).is_err());
    }

    #[test]
    fn test_empty_document() {
        let article = parse_article_str("<PubmedArticleSet></PubmedArticleSet>").unwrap();
        assert!(article.authors.is_empty());
        assert!(article.corrections.is_empty());
    }
}
