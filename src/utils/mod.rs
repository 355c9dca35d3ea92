//! Utility modules supporting citation retrieval.
//!
//! - [`HttpClient`]: shared reqwest client with crate defaults
//! - [`ResilientFetcher`]: GET with per-attempt timeout, backoff and a
//!   post-success rate-limit delay
//! - [`RetryConfig`]: the backoff policy
//! - [`format_citations`]: render citations as a display block
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use biocite::config::PubmedConfig;
//! use biocite::utils::{HttpClient, ResilientFetcher};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PubmedConfig::default();
//! let fetcher = ResilientFetcher::new(HttpClient::new()?, &config);
//! let response = fetcher
//!     .fetch_with_retry(
//!         "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/einfo.fcgi",
//!         &[("db", "pubmed".to_string())],
//!         Duration::from_secs(10),
//!     )
//!     .await?;
//! println!("{}", response.status);
//! # Ok(())
//! # }
//! ```

mod cite;
mod http;
mod retry;

use chrono::Datelike;

pub use cite::{format_citation_line, format_citations, lucky_link, NO_CITATIONS_MESSAGE};
pub use http::{encode_params, HttpClient, RawResponse, ResilientFetcher};
pub use retry::RetryConfig;

/// Current calendar year (UTC)
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}
