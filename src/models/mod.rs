//! Core data models for citations, entities and search operations.

mod citation;
mod entities;
mod search;

pub use citation::{format_author_list, Citation, CitationBuilder, PUBMED_ARTICLE_URL};
pub(crate) use entities::push_unique;
pub use entities::ExtractedEntities;
pub use search::{CitationResult, SearchOptions};
