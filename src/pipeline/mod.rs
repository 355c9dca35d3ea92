//! The citation pipeline: question in, ranked citations out.
//!
//! ```text
//! extract -> build query -> filters -> JSON search -> (XML search) -> rank -> truncate
//! ```
//!
//! Network failures never fail the whole call: the result still carries
//! the extracted entities and the optimized query, with no citations.

use std::sync::Arc;

use crate::config::PubmedConfig;
use crate::extract::{genes_in_titles, EntityExtractor, RuleBasedExtractor};
use crate::models::{Citation, CitationResult, ExtractedEntities, SearchOptions};
use crate::query::{apply_filters, QueryBuilder, RuleBasedQueryBuilder};
use crate::rank;
use crate::sources::{PubMedClient, ResponseFormat, SourceError};
use crate::strategy::ExtractionStrategy;
use crate::utils::HttpClient;

/// Raw results requested per wanted citation
pub const OVER_FETCH_FACTOR: usize = 2;

/// Composes extraction, query building, fetching and ranking.
///
/// Holds no per-call state; one pipeline can serve concurrent calls.
#[derive(Clone)]
pub struct CitationPipeline {
    client: PubMedClient,
    extractor: RuleBasedExtractor,
    builder: RuleBasedQueryBuilder,
    alternate: Option<Arc<dyn ExtractionStrategy>>,
}

impl std::fmt::Debug for CitationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationPipeline")
            .field("client", &self.client)
            .field("alternate", &self.alternate.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}

impl CitationPipeline {
    /// Create a pipeline with a default HTTP client
    pub fn new(config: Arc<PubmedConfig>) -> Result<Self, SourceError> {
        Ok(Self::with_client(PubMedClient::new(config)?))
    }

    /// Create a pipeline over an existing client
    pub fn with_client(client: PubMedClient) -> Self {
        Self {
            client,
            extractor: RuleBasedExtractor::new(),
            builder: RuleBasedQueryBuilder::new(),
            alternate: None,
        }
    }

    /// Create a pipeline with a custom HTTP client
    pub fn with_http_client(http: HttpClient, config: Arc<PubmedConfig>) -> Self {
        Self::with_client(PubMedClient::with_client(http, config))
    }

    /// Register a strategy tried before the rules when
    /// [`SearchOptions::use_alternate_extraction`] is set
    pub fn with_alternate_strategy(mut self, strategy: Arc<dyn ExtractionStrategy>) -> Self {
        self.alternate = Some(strategy);
        self
    }

    pub fn config(&self) -> &PubmedConfig {
        self.client.config()
    }

    /// Search options seeded from the configured defaults
    pub fn default_options(&self) -> SearchOptions {
        SearchOptions::from_config(self.config())
    }

    /// Entities and final search expression for `query`, without any
    /// network access
    pub async fn prepare(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> (ExtractedEntities, String) {
        let alternate = if options.use_alternate_extraction {
            self.alternate.as_deref()
        } else {
            None
        };

        let entities = match alternate {
            Some(strategy) => match strategy.extract(query).await {
                Ok(entities) => entities,
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), "Extraction failed, using rules: {}", e);
                    self.extractor.extract(query)
                }
            },
            None => self.extractor.extract(query),
        };

        let base_query = match alternate {
            Some(strategy) => match strategy.build_query(query, &entities).await {
                Ok(built) if !built.trim().is_empty() => built,
                Ok(_) => {
                    tracing::warn!(strategy = strategy.name(), "Empty query, using rules");
                    self.builder.build(query, &entities)
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), "Query building failed, using rules: {}", e);
                    self.builder.build(query, &entities)
                }
            },
            None => self.builder.build(query, &entities),
        };

        let optimized_query = apply_filters(&base_query, options);
        tracing::debug!(query = %optimized_query, "Optimized query");
        (entities, optimized_query)
    }

    /// Answer `query` with up to `options.max_citations` ranked citations
    pub async fn fetch_citations(&self, query: &str, options: &SearchOptions) -> CitationResult {
        let (extracted_entities, optimized_query) = self.prepare(query, options).await;

        let mut citations = if options.max_citations == 0 {
            Vec::new()
        } else {
            let retmax = options.max_citations.saturating_mul(OVER_FETCH_FACTOR);
            self.search_with_fallback(&optimized_query, retmax).await
        };

        rank::rank(&mut citations);
        citations.truncate(options.max_citations);
        let genes_in_titles = genes_in_titles(&citations);

        tracing::info!(
            citations = citations.len(),
            genes_in_titles = genes_in_titles.len(),
            "Citation search complete"
        );

        CitationResult {
            query: query.to_string(),
            extracted_entities,
            optimized_query,
            citations,
            genes_in_titles,
        }
    }

    /// Try each response format in priority order until one yields
    /// citations. A failed path counts as an empty one.
    async fn search_with_fallback(&self, term: &str, retmax: usize) -> Vec<Citation> {
        for format in ResponseFormat::PRIORITY {
            match self.client.search(term, retmax, format).await {
                Ok(citations) if !citations.is_empty() => {
                    tracing::info!(%format, count = citations.len(), "Fetched citations");
                    return citations;
                }
                Ok(_) => {
                    tracing::info!(%format, "No citations, trying next format");
                }
                Err(e) => {
                    tracing::warn!(%format, "Search failed: {}", e);
                }
            }
        }
        Vec::new()
    }
}
