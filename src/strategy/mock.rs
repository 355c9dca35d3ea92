//! Mock strategy for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ExtractionStrategy, StrategyError};
use crate::models::ExtractedEntities;

/// A strategy that returns predefined entities and queries.
///
/// Unset responses fail with [`StrategyError::Unavailable`], which lets
/// tests drive the fallback to the rule-based path.
#[derive(Debug, Default)]
pub struct MockStrategy {
    entities: Mutex<Option<ExtractedEntities>>,
    query: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl MockStrategy {
    /// Create a mock that fails every call
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entities to return
    pub fn with_entities(self, entities: ExtractedEntities) -> Self {
        if let Ok(mut guard) = self.entities.lock() {
            *guard = Some(entities);
        }
        self
    }

    /// Set the query to return
    pub fn with_query(self, query: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.query.lock() {
            *guard = Some(query.into());
        }
        self
    }

    /// Number of `extract` and `build_query` calls seen so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionStrategy for MockStrategy {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, _text: &str) -> Result<ExtractedEntities, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let guard = self
            .entities
            .lock()
            .map_err(|e| StrategyError::Service(e.to_string()))?;
        guard
            .clone()
            .ok_or_else(|| StrategyError::Unavailable("no entities configured".to_string()))
    }

    async fn build_query(
        &self,
        _text: &str,
        _entities: &ExtractedEntities,
    ) -> Result<String, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let guard = self
            .query
            .lock()
            .map_err(|e| StrategyError::Service(e.to_string()))?;
        guard
            .clone()
            .ok_or_else(|| StrategyError::Unavailable("no query configured".to_string()))
    }
}
