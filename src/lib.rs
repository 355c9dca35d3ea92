//! # biocite
//!
//! Answers a biomedical question with ranked PubMed citations.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Citation, ExtractedEntities, SearchOptions, etc.)
//! - [`extract`]: Rule-based recognition of genes, proteins, diseases and pathways
//! - [`query`]: PubMed query construction and filter augmentation
//! - [`strategy`]: Pluggable alternate extraction/query strategies
//! - [`sources`]: PubMed E-utilities client and error taxonomy
//! - [`parse`]: JSON and XML response parsers
//! - [`rank`]: Review/recency ranking
//! - [`pipeline`]: The end-to-end `fetch_citations` operation
//! - [`utils`]: HTTP client, retry policy and citation rendering
//! - [`config`]: Configuration management
//!
//! ```rust,no_run
//! use biocite::{CitationPipeline, PubmedConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(PubmedConfig::default());
//! let pipeline = CitationPipeline::new(config)?;
//! let options = pipeline.default_options();
//! let result = pipeline
//!     .fetch_citations("What causes BRCA1 mutations?", &options)
//!     .await;
//! println!("{}", biocite::utils::format_citations(&result.citations));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod extract;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod query;
pub mod rank;
pub mod sources;
pub mod strategy;
pub mod utils;

// Re-export commonly used types
pub use config::PubmedConfig;
pub use models::{Citation, CitationResult, ExtractedEntities, SearchOptions};
pub use pipeline::CitationPipeline;
pub use sources::{PubMedClient, ResponseFormat, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
