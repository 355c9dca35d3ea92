//! Citation search options and results.

use serde::{Deserialize, Serialize};

use super::{Citation, ExtractedEntities};
use crate::config::PubmedConfig;

/// Options for a single citation search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of citations to return
    pub max_citations: usize,

    /// Restrict the search to review articles
    pub prioritize_reviews: bool,

    /// Recency window in years (0 disables the date filter)
    pub max_age_years: u32,

    /// Try the alternate extraction strategy before the rule-based one
    pub use_alternate_extraction: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_config(&PubmedConfig::default())
    }
}

impl SearchOptions {
    /// Options seeded from the configured defaults
    pub fn from_config(config: &PubmedConfig) -> Self {
        Self {
            max_citations: config.default_max_citations,
            prioritize_reviews: config.default_prioritize_reviews,
            max_age_years: config.default_max_age_years,
            use_alternate_extraction: false,
        }
    }

    /// Set maximum citations
    pub fn max_citations(mut self, max: usize) -> Self {
        self.max_citations = max;
        self
    }

    /// Enable/disable the review-only filter
    pub fn prioritize_reviews(mut self, prioritize: bool) -> Self {
        self.prioritize_reviews = prioritize;
        self
    }

    /// Set the recency window
    pub fn max_age_years(mut self, years: u32) -> Self {
        self.max_age_years = years;
        self
    }

    /// Enable/disable the alternate extraction strategy
    pub fn use_alternate_extraction(mut self, enabled: bool) -> Self {
        self.use_alternate_extraction = enabled;
        self
    }
}

/// Outcome of a citation search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationResult {
    /// The original question
    pub query: String,

    /// Entities extracted from the question
    pub extracted_entities: ExtractedEntities,

    /// The final PubMed search expression, filters included
    pub optimized_query: String,

    /// Ranked and truncated citations
    pub citations: Vec<Citation>,

    /// Gene symbols mentioned in the returned titles
    pub genes_in_titles: Vec<String>,
}

impl CitationResult {
    /// Whether any citation was found
    pub fn has_citations(&self) -> bool {
        !self.citations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let mut config = PubmedConfig::default();
        config.default_max_citations = 7;
        config.default_prioritize_reviews = true;
        config.default_max_age_years = 3;

        let options = SearchOptions::from_config(&config);
        assert_eq!(options.max_citations, 7);
        assert!(options.prioritize_reviews);
        assert_eq!(options.max_age_years, 3);
        assert!(!options.use_alternate_extraction);
    }

    #[test]
    fn test_options_builder() {
        let options = SearchOptions::default()
            .max_citations(2)
            .prioritize_reviews(true)
            .max_age_years(0)
            .use_alternate_extraction(true);

        assert_eq!(options.max_citations, 2);
        assert!(options.prioritize_reviews);
        assert_eq!(options.max_age_years, 0);
        assert!(options.use_alternate_extraction);
    }
}
