//! PubMed E-utilities source and its error taxonomy.
//!
//! A search is a two-step round trip: an `esearch` call yields PubMed
//! identifiers, then a detail call (`esummary` for JSON, `efetch` for XML)
//! turns them into citations. The two encodings form a small closed set of
//! interchangeable paths, see [`ResponseFormat`].

mod pubmed;

pub use pubmed::PubMedClient;

use std::fmt;

/// Response encodings, tried in [`ResponseFormat::PRIORITY`] order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    /// `esearch` + `esummary` with `retmode=json`
    Json,
    /// `esearch` + `efetch` with `retmode=xml`
    Xml,
}

impl ResponseFormat {
    /// JSON first (cheaper, structured), XML only when JSON yields nothing
    pub const PRIORITY: [ResponseFormat; 2] = [ResponseFormat::Json, ResponseFormat::Xml];

    /// Value of the `retmode` parameter
    pub fn retmode(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.retmode())
    }
}

/// Errors that can occur when talking to the search service
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// The per-attempt timeout elapsed
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The service signalled a rate-limit condition
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Non-2xx response
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Parsing error (XML, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl SourceError {
    /// Whether a retry may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SourceError::Network(_)
                | SourceError::Timeout(_)
                | SourceError::RateLimit(_)
                | SourceError::Http { .. }
        )
    }

    /// Whether the failure carries a rate-limit signature
    pub fn is_rate_limited(&self) -> bool {
        match self {
            SourceError::RateLimit(_) => true,
            SourceError::Http { status, message } => {
                *status == 429 || mentions_rate_limit(message)
            }
            SourceError::Network(msg) | SourceError::Other(msg) => mentions_rate_limit(msg),
            _ => false,
        }
    }
}

/// Heuristic: check for common rate-limit patterns in messages
pub(crate) fn mentions_rate_limit(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("rate limit") || lower.contains("too many requests")
}

impl From<reqwest::Error> for SourceError {
    // The request URL may carry the API key
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<quick_xml::DeError> for SourceError {
    fn from(err: quick_xml::DeError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_is_json_then_xml() {
        assert_eq!(
            ResponseFormat::PRIORITY,
            [ResponseFormat::Json, ResponseFormat::Xml]
        );
        assert_eq!(ResponseFormat::Xml.to_string(), "xml");
    }

    #[test]
    fn test_transient_error_detection() {
        assert!(SourceError::Network("connection refused".to_string()).is_transient());
        assert!(SourceError::Timeout(std::time::Duration::from_secs(1)).is_transient());
        assert!(SourceError::Http {
            status: 500,
            message: "Internal Server Error".to_string()
        }
        .is_transient());
        assert!(!SourceError::Parse("invalid json".to_string()).is_transient());
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(SourceError::Http {
            status: 429,
            message: String::new()
        }
        .is_rate_limited());
        assert!(SourceError::Http {
            status: 503,
            message: r#"{"error":"API rate limit exceeded"}"#.to_string()
        }
        .is_rate_limited());
        assert!(!SourceError::Http {
            status: 503,
            message: "Service Unavailable".to_string()
        }
        .is_rate_limited());
        assert!(!SourceError::Timeout(std::time::Duration::from_secs(1)).is_rate_limited());
    }
}
