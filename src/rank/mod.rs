//! Relevance ranking by document type and recency.

use crate::models::Citation;
use crate::utils::current_year;

/// Fixed bonus for review articles
pub const REVIEW_BONUS: f64 = 10.0;

/// Recency score of a citation published this year
pub const RECENCY_WEIGHT: f64 = 5.0;

/// Yearly decay applied to the recency score
pub const RECENCY_DECAY: f64 = 0.85;

/// Score a citation relative to `current_year`.
///
/// Citations without a parseable year get no recency credit; future years
/// count as current.
pub fn score(citation: &Citation, current_year: i32) -> f64 {
    let review = if citation.is_review { REVIEW_BONUS } else { 0.0 };
    let recency = citation
        .year_number()
        .map(|year| {
            let years_old = (current_year - year).max(0);
            RECENCY_WEIGHT * RECENCY_DECAY.powi(years_old)
        })
        .unwrap_or(0.0);
    review + recency
}

/// Score and sort `citations` in place against the current year
pub fn rank(citations: &mut [Citation]) {
    rank_with_year(citations, current_year());
}

/// Score and sort `citations` in place, highest first.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_with_year(citations: &mut [Citation], current_year: i32) {
    for citation in citations.iter_mut() {
        citation.relevance_score = Some(score(citation, current_year));
    }
    citations.sort_by(|a, b| {
        let a = a.relevance_score.unwrap_or(0.0);
        let b = b.relevance_score.unwrap_or(0.0);
        b.total_cmp(&a)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CitationBuilder;

    fn citation(title: &str, year: Option<&str>, review: bool) -> Citation {
        CitationBuilder::new(title)
            .year(year.map(str::to_string))
            .review(review)
            .build()
    }

    #[test]
    fn test_score_components() {
        assert_eq!(score(&citation("a", Some("2026"), false), 2026), 5.0);
        assert_eq!(score(&citation("b", None, true), 2026), 10.0);
        assert_eq!(score(&citation("c", Some("2030"), false), 2026), 5.0);

        let two_years = score(&citation("d", Some("2024"), false), 2026);
        assert!((two_years - 5.0 * 0.85 * 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_unparseable_year_is_no_year() {
        assert_eq!(score(&citation("a", Some("n.d."), false), 2026), 0.0);
    }

    #[test]
    fn test_review_outranks_same_year_non_review() {
        let mut citations = vec![
            citation("primary", Some("2023"), false),
            citation("review", Some("2023"), true),
        ];
        rank_with_year(&mut citations, 2026);
        assert_eq!(citations[0].title, "review");
    }

    #[test]
    fn test_old_review_beats_fresh_primary_article() {
        let mut citations = vec![
            citation("fresh", Some("2026"), false),
            citation("old review", Some("2006"), true),
        ];
        rank_with_year(&mut citations, 2026);
        assert_eq!(citations[0].title, "old review");
    }

    #[test]
    fn test_rank_is_stable() {
        let mut citations = vec![
            citation("first", Some("2020"), false),
            citation("second", Some("2020"), false),
            citation("newer", Some("2025"), false),
            citation("third", Some("2020"), false),
        ];
        rank_with_year(&mut citations, 2026);

        let titles: Vec<&str> = citations.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "first", "second", "third"]);
    }

    #[test]
    fn test_rank_sets_scores() {
        let mut citations = vec![citation("a", Some("2026"), true)];
        assert!(citations[0].relevance_score.is_none());
        rank_with_year(&mut citations, 2026);
        assert_eq!(citations[0].relevance_score, Some(15.0));
    }
}
