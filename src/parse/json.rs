//! JSON variant: `esearch` id lists and `esummary` document summaries.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

use super::{clean_text, extract_year, is_review_type};
use crate::models::{format_author_list, Citation, CitationBuilder};

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_AUTHORS: &str = "Unknown";
const DEFAULT_JOURNAL: &str = "Unknown Journal";

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Debug, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentSummary {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<SummaryAuthor>,
    #[serde(default)]
    fulljournalname: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    pubdate: Option<String>,
    #[serde(default)]
    pubtype: Vec<String>,
    #[serde(default)]
    articleids: Vec<SummaryArticleId>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryAuthor {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SummaryArticleId {
    #[serde(default)]
    idtype: String,
    #[serde(default)]
    value: String,
}

fn idlist_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""idlist"\s*:\s*\[([^\]]*)\]"#).expect("valid idlist pattern"))
}

fn quoted_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""(\d+)""#).expect("valid id pattern"))
}

/// Identifiers from an `esearch` JSON body.
///
/// Falls back to scanning the raw text for the id list when the body does
/// not decode (truncated or otherwise malformed JSON).
pub fn parse_search_ids(body: &str) -> Vec<String> {
    match serde_json::from_str::<ESearchResponse>(body) {
        Ok(response) => response.esearchresult.idlist,
        Err(e) => {
            tracing::debug!("esearch JSON did not decode ({}), scanning text for ids", e);
            scan_search_ids(body)
        }
    }
}

fn scan_search_ids(body: &str) -> Vec<String> {
    let Some(list) = idlist_regex().captures(body).and_then(|c| c.get(1)) else {
        return Vec::new();
    };

    let mut ids: Vec<String> = Vec::new();
    for caps in quoted_id_regex().captures_iter(list.as_str()) {
        let id = caps[1].to_string();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Citations from an `esummary` JSON body, in `ids` order.
///
/// Identifiers without a usable summary entry are skipped.
pub fn parse_summaries(ids: &[String], body: &str) -> Vec<Citation> {
    let root: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("esummary JSON did not decode: {}", e);
            return Vec::new();
        }
    };

    let Some(result) = root.get("result") else {
        tracing::debug!("esummary JSON has no result object");
        return Vec::new();
    };

    ids.iter()
        .filter_map(|id| {
            let entry = result.get(id.as_str())?;
            match DocumentSummary::deserialize(entry) {
                Ok(summary) if summary.error.is_none() => Some(summary_to_citation(id, summary)),
                Ok(summary) => {
                    tracing::debug!(pmid = %id, "Skipping summary: {:?}", summary.error);
                    None
                }
                Err(e) => {
                    tracing::debug!(pmid = %id, "Skipping malformed summary: {}", e);
                    None
                }
            }
        })
        .collect()
}

fn summary_to_citation(id: &str, summary: DocumentSummary) -> Citation {
    let title = summary
        .title
        .as_deref()
        .map(clean_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let names: Vec<String> = summary
        .authors
        .iter()
        .map(|a| a.name.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    let authors = if names.is_empty() {
        DEFAULT_AUTHORS.to_string()
    } else {
        format_author_list(&names)
    };

    let journal = summary
        .fulljournalname
        .as_deref()
        .or(summary.source.as_deref())
        .map(clean_text)
        .filter(|j| !j.is_empty())
        .unwrap_or_else(|| DEFAULT_JOURNAL.to_string());

    let doi = summary
        .articleids
        .iter()
        .find(|a| a.idtype.eq_ignore_ascii_case("doi") && !a.value.trim().is_empty())
        .map(|a| a.value.trim().to_string());

    CitationBuilder::new(title)
        .authors(authors)
        .journal(journal)
        .pmid(id)
        .year(summary.pubdate.as_deref().and_then(extract_year))
        .doi(doi)
        .review(summary.pubtype.iter().any(|t| is_review_type(t)))
        .build()
}
