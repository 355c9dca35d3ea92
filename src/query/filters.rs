//! Review and publication-date filters appended to a base query.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::SearchOptions;
use crate::utils::current_year;

/// Restricts results to review articles
pub const REVIEW_FILTER: &str = "review[Publication Type]";

fn boolean_operator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:AND|OR|NOT)\b").expect("valid operator pattern"))
}

/// Publication-date range covering the last `max_age_years` years up to the
/// end of `current_year`.
///
/// The start year never goes below year 1.
pub fn date_range_filter(max_age_years: u32, current_year: i32) -> String {
    let window = i32::try_from(max_age_years).unwrap_or(i32::MAX);
    let min_year = current_year.saturating_sub(window).max(1);
    format!(
        "(\"{}/01/01\"[Date - Publication] : \"{}/12/31\"[Date - Publication])",
        min_year, current_year
    )
}

/// Append the filters requested by `options`, dated from today
pub fn apply_filters(base_query: &str, options: &SearchOptions) -> String {
    apply_filters_for_year(
        base_query,
        options.prioritize_reviews,
        options.max_age_years,
        current_year(),
    )
}

/// Append the review and date filters to `base_query`.
///
/// The base is parenthesized first when it already carries boolean
/// operators or opens with a parenthesis. Without filters it is returned
/// unchanged.
pub fn apply_filters_for_year(
    base_query: &str,
    prioritize_reviews: bool,
    max_age_years: u32,
    current_year: i32,
) -> String {
    let mut filters: Vec<String> = Vec::new();
    if prioritize_reviews {
        filters.push(REVIEW_FILTER.to_string());
    }
    if max_age_years > 0 {
        filters.push(date_range_filter(max_age_years, current_year));
    }

    if filters.is_empty() {
        return base_query.to_string();
    }

    let base = if needs_grouping(base_query) {
        format!("({})", base_query)
    } else {
        base_query.to_string()
    };

    std::iter::once(base)
        .chain(filters)
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn needs_grouping(query: &str) -> bool {
    query.trim_start().starts_with('(') || boolean_operator_regex().is_match(query)
}
