//! Pluggable entity extraction and query generation.
//!
//! An [`ExtractionStrategy`] is the seam for an externally supplied
//! implementation (a language model service, for example). The pipeline
//! tries it first when asked to and falls back to the rule-based
//! implementation on any error.

mod mock;

pub use mock::MockStrategy;

use async_trait::async_trait;

use crate::extract::{EntityExtractor, RuleBasedExtractor};
use crate::models::ExtractedEntities;
use crate::query::{QueryBuilder, RuleBasedQueryBuilder};

/// Errors raised by an alternate strategy
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// The strategy is not usable (missing credentials, disabled, ...)
    #[error("Strategy unavailable: {0}")]
    Unavailable(String),

    /// The backing service failed
    #[error("Strategy service error: {0}")]
    Service(String),
}

/// Extraction and query generation behind one capability
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Extract entities from the question
    async fn extract(&self, text: &str) -> Result<ExtractedEntities, StrategyError>;

    /// Build a search expression from the question and its entities
    async fn build_query(
        &self,
        text: &str,
        entities: &ExtractedEntities,
    ) -> Result<String, StrategyError>;
}

/// The built-in rules exposed as a strategy; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedStrategy {
    extractor: RuleBasedExtractor,
    builder: RuleBasedQueryBuilder,
}

impl RuleBasedStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous extraction, for callers without a runtime
    pub fn extract_now(&self, text: &str) -> ExtractedEntities {
        self.extractor.extract(text)
    }

    /// Synchronous query building, for callers without a runtime
    pub fn build_query_now(&self, text: &str, entities: &ExtractedEntities) -> String {
        self.builder.build(text, entities)
    }
}

#[async_trait]
impl ExtractionStrategy for RuleBasedStrategy {
    fn name(&self) -> &str {
        "rule-based"
    }

    async fn extract(&self, text: &str) -> Result<ExtractedEntities, StrategyError> {
        Ok(self.extract_now(text))
    }

    async fn build_query(
        &self,
        text: &str,
        entities: &ExtractedEntities,
    ) -> Result<String, StrategyError> {
        Ok(self.build_query_now(text, entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rule_based_strategy_matches_rules() {
        let strategy = RuleBasedStrategy::new();
        let text = "What causes BRCA1 mutations?";

        let entities = strategy.extract(text).await.unwrap();
        assert_eq!(entities, RuleBasedExtractor::new().extract(text));

        let query = strategy.build_query(text, &entities).await.unwrap();
        assert_eq!(query, RuleBasedQueryBuilder::new().build(text, &entities));
        assert!(query.contains("\"BRCA1\"[Gene/Protein Name]"));
    }

    #[test]
    fn test_strategy_error_display() {
        let err = StrategyError::Unavailable("no API key".to_string());
        assert_eq!(err.to_string(), "Strategy unavailable: no API key");
    }
}
