//! Parsers turning raw E-utilities bodies into [`Citation`](crate::models::Citation)s.
//!
//! Both variants share one contract: they never fail. A record that cannot
//! be decoded is skipped and logged at debug level; the rest of the body is
//! still used.

pub mod json;
pub mod xml;

use regex::Regex;
use std::sync::OnceLock;

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("valid year pattern"))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// First four-digit run of a date string ("2023 Jan 15" -> "2023")
pub fn extract_year(date: &str) -> Option<String> {
    year_regex()
        .captures(date)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Strip inline markup, unescape entities and collapse whitespace
pub fn clean_text(raw: &str) -> String {
    let without_tags = tag_regex().replace_all(raw, " ");
    let unescaped = quick_xml::escape::unescape(&without_tags)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| without_tags.into_owned());
    whitespace_regex()
        .replace_all(&unescaped, " ")
        .trim()
        .to_string()
}

/// Whether a publication type names a review
pub fn is_review_type(publication_type: &str) -> bool {
    publication_type.to_lowercase().contains("review")
}
