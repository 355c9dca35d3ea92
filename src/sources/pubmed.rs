//! PubMed client over the NCBI E-utilities API.

use std::sync::Arc;
use std::time::Duration;

use super::{ResponseFormat, SourceError};
use crate::config::PubmedConfig;
use crate::models::Citation;
use crate::parse::{json, xml};
use crate::utils::{HttpClient, ResilientFetcher};

const DATABASE: &str = "pubmed";

/// PubMed search client
///
/// Every call goes through a [`ResilientFetcher`] built from the shared,
/// read-only configuration.
#[derive(Debug, Clone)]
pub struct PubMedClient {
    fetcher: ResilientFetcher,
    config: Arc<PubmedConfig>,
}

impl PubMedClient {
    /// Create a client with a default HTTP client
    pub fn new(config: Arc<PubmedConfig>) -> Result<Self, SourceError> {
        Ok(Self::with_client(HttpClient::new()?, config))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: HttpClient, config: Arc<PubmedConfig>) -> Self {
        Self {
            fetcher: ResilientFetcher::new(client, &config),
            config,
        }
    }

    pub fn config(&self) -> &PubmedConfig {
        &self.config
    }

    fn endpoint(&self, utility: &str) -> String {
        format!("{}/{}.fcgi", self.config.base_url.trim_end_matches('/'), utility)
    }

    /// Full round trip: `esearch` for identifiers, then the detail call
    /// matching `format`
    pub async fn search(
        &self,
        term: &str,
        retmax: usize,
        format: ResponseFormat,
    ) -> Result<Vec<Citation>, SourceError> {
        let ids = self.search_ids(term, retmax, format).await?;
        if ids.is_empty() {
            tracing::debug!(%format, "esearch returned no identifiers");
            return Ok(Vec::new());
        }
        self.fetch_details(&ids, format).await
    }

    /// PubMed identifiers matching `term`, most relevant first
    pub async fn search_ids(
        &self,
        term: &str,
        retmax: usize,
        format: ResponseFormat,
    ) -> Result<Vec<String>, SourceError> {
        if term.trim().is_empty() {
            return Err(SourceError::InvalidRequest("empty search term".to_string()));
        }

        let params = [
            ("db", DATABASE.to_string()),
            ("term", term.to_string()),
            ("retmax", retmax.to_string()),
            ("retmode", format.retmode().to_string()),
            ("sort", "relevance".to_string()),
        ];

        let response = self
            .fetcher
            .fetch_with_retry(&self.endpoint("esearch"), &params, self.config.long_timeout())
            .await?;

        let ids = match format {
            ResponseFormat::Json => json::parse_search_ids(&response.body),
            ResponseFormat::Xml => xml::parse_search_ids(&response.body),
        };
        tracing::debug!(%format, count = ids.len(), "esearch identifiers");
        Ok(ids)
    }

    /// Citations for `ids`: `esummary` in JSON mode, `efetch` in XML mode
    pub async fn fetch_details(
        &self,
        ids: &[String],
        format: ResponseFormat,
    ) -> Result<Vec<Citation>, SourceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let (utility, timeout, extra): (&str, Duration, Option<(&str, String)>) = match format {
            ResponseFormat::Json => ("esummary", self.config.short_timeout(), None),
            ResponseFormat::Xml => (
                "efetch",
                self.config.long_timeout(),
                Some(("rettype", "abstract".to_string())),
            ),
        };

        let mut params = vec![
            ("db", DATABASE.to_string()),
            ("id", ids.join(",")),
            ("retmode", format.retmode().to_string()),
        ];
        params.extend(extra);

        let response = self
            .fetcher
            .fetch_with_retry(&self.endpoint(utility), &params, timeout)
            .await?;

        let citations = match format {
            ResponseFormat::Json => json::parse_summaries(ids, &response.body),
            ResponseFormat::Xml => xml::parse_articles(&response.body),
        };
        tracing::debug!(
            %format,
            requested = ids.len(),
            parsed = citations.len(),
            "{} citations",
            utility
        );
        Ok(citations)
    }
}
