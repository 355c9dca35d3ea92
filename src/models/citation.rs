//! Citation model representing one bibliographic record from PubMed.

use serde::{Deserialize, Serialize};

/// Base URL for PubMed article pages
pub const PUBMED_ARTICLE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// A normalized bibliographic entry, independent of the response encoding
/// it was parsed from.
///
/// `relevance_score` stays `None` until the citation passes through
/// [`crate::rank::rank`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Article title (never empty)
    pub title: String,

    /// Display-formatted author list
    pub authors: String,

    /// Journal name
    pub journal: String,

    /// PubMed identifier
    pub pmid: Option<String>,

    /// Four-digit publication year
    pub year: Option<String>,

    /// Digital Object Identifier
    pub doi: Option<String>,

    /// Whether the publication types include a review
    pub is_review: bool,

    /// Score assigned by the ranker
    pub relevance_score: Option<f64>,

    /// Article page URL
    pub url: Option<String>,
}

impl Citation {
    /// Create a new citation with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: String::new(),
            journal: String::new(),
            pmid: None,
            year: None,
            doi: None,
            is_review: false,
            relevance_score: None,
            url: None,
        }
    }

    /// Publication year as a number, if it parses
    pub fn year_number(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }
}

/// Builder for constructing Citation objects
#[derive(Debug, Clone)]
pub struct CitationBuilder {
    citation: Citation,
}

impl CitationBuilder {
    /// Create a new builder with the required title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            citation: Citation::new(title),
        }
    }

    /// Set authors
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.citation.authors = authors.into();
        self
    }

    /// Set journal
    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.citation.journal = journal.into();
        self
    }

    /// Set the PubMed identifier; also derives the article URL
    pub fn pmid(mut self, pmid: impl Into<String>) -> Self {
        let pmid = pmid.into();
        self.citation.url = Some(format!("{}/{}/", PUBMED_ARTICLE_URL, pmid));
        self.citation.pmid = Some(pmid);
        self
    }

    /// Set publication year
    pub fn year(mut self, year: Option<String>) -> Self {
        self.citation.year = year;
        self
    }

    /// Set DOI
    pub fn doi(mut self, doi: Option<String>) -> Self {
        self.citation.doi = doi;
        self
    }

    /// Mark as review
    pub fn review(mut self, is_review: bool) -> Self {
        self.citation.is_review = is_review;
        self
    }

    /// Build the Citation
    pub fn build(self) -> Citation {
        self.citation
    }
}

/// Format an author list for display: up to three names, then "et al."
pub fn format_author_list(names: &[String]) -> String {
    match names.len() {
        0 => String::new(),
        1..=3 => names.join(", "),
        _ => format!("{} et al.", names[..3].join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_builder() {
        let citation = CitationBuilder::new("BRCA1 and breast cancer")
            .authors("Smith J, Doe A")
            .journal("Nature")
            .pmid("12345678")
            .year(Some("2021".to_string()))
            .doi(Some("10.1000/xyz".to_string()))
            .review(true)
            .build();

        assert_eq!(citation.title, "BRCA1 and breast cancer");
        assert_eq!(citation.pmid.as_deref(), Some("12345678"));
        assert_eq!(
            citation.url.as_deref(),
            Some("https://pubmed.ncbi.nlm.nih.gov/12345678/")
        );
        assert!(citation.is_review);
        assert!(citation.relevance_score.is_none());
        assert_eq!(citation.year_number(), Some(2021));
    }

    #[test]
    fn test_year_number_unparseable() {
        let citation = CitationBuilder::new("Title")
            .year(Some("n.d.".to_string()))
            .build();
        assert_eq!(citation.year_number(), None);
    }

    #[test]
    fn test_format_author_list() {
        let names: Vec<String> = ["Smith J", "Doe A", "Roe B", "Poe C"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(format_author_list(&names[..1]), "Smith J");
        assert_eq!(format_author_list(&names[..3]), "Smith J, Doe A, Roe B");
        assert_eq!(format_author_list(&names), "Smith J, Doe A, Roe B et al.");
        assert_eq!(format_author_list(&[]), "");
    }
}
