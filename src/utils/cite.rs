//! Rendering citations as a display block appended to an answer.

use std::fmt::Write;
use url::Url;

use crate::models::Citation;

/// Shown in place of the block when there is nothing to cite
pub const NO_CITATIONS_MESSAGE: &str = "No relevant citations found.";

const LUCKY_SEARCH_URL: &str = "https://www.google.com/search";

/// "I'm feeling lucky" search link for a title
pub fn lucky_link(title: &str) -> Option<String> {
    Url::parse_with_params(LUCKY_SEARCH_URL, &[("q", title), ("btnI", "1")])
        .ok()
        .map(String::from)
}

/// Render citations as numbered blocks: title, authors, journal and,
/// for citations with a link target, a lucky search link
pub fn format_citations(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return NO_CITATIONS_MESSAGE.to_string();
    }

    let mut out = String::from("References:\n");
    for (i, citation) in citations.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, citation.title);
        if !citation.authors.is_empty() {
            let _ = writeln!(out, "   {}", citation.authors);
        }
        if !citation.journal.is_empty() {
            match &citation.year {
                Some(year) => {
                    let _ = writeln!(out, "   {} ({})", citation.journal, year);
                }
                None => {
                    let _ = writeln!(out, "   {}", citation.journal);
                }
            }
        }
        if citation.url.is_some() {
            if let Some(link) = lucky_link(&citation.title) {
                let _ = writeln!(out, "   {}", link);
            }
        }
    }
    out.trim_end().to_string()
}

/// One-line form: `Title. Authors. Journal (Year). PMID: n`
pub fn format_citation_line(citation: &Citation) -> String {
    let mut parts = vec![citation.title.trim_end_matches('.').to_string()];
    if !citation.authors.is_empty() {
        parts.push(citation.authors.clone());
    }
    match (&citation.journal, &citation.year) {
        (journal, Some(year)) if !journal.is_empty() => parts.push(format!("{} ({})", journal, year)),
        (journal, None) if !journal.is_empty() => parts.push(journal.clone()),
        (_, Some(year)) => parts.push(year.clone()),
        _ => {}
    }
    if let Some(pmid) = &citation.pmid {
        parts.push(format!("PMID: {}", pmid));
    }
    parts.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CitationBuilder;

    fn sample() -> Citation {
        CitationBuilder::new("BRCA1 & DNA repair")
            .authors("Smith J, Doe A")
            .journal("Nature")
            .pmid("123")
            .year(Some("2023".to_string()))
            .build()
    }

    #[test]
    fn test_empty_input_renders_message() {
        assert_eq!(format_citations(&[]), NO_CITATIONS_MESSAGE);
    }

    #[test]
    fn test_block_layout() {
        let rendered = format_citations(&[sample()]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "References:");
        assert_eq!(lines[2], "1. BRCA1 & DNA repair");
        assert_eq!(lines[3], "   Smith J, Doe A");
        assert_eq!(lines[4], "   Nature (2023)");
        assert_eq!(
            lines[5],
            "   https://www.google.com/search?q=BRCA1+%26+DNA+repair&btnI=1"
        );
    }

    #[test]
    fn test_no_link_without_target() {
        let citation = CitationBuilder::new("Untargeted").journal("Cell").build();
        let rendered = format_citations(&[citation]);
        assert!(!rendered.contains("google.com"));
        assert!(rendered.ends_with("   Cell"));
    }

    #[test]
    fn test_citation_line() {
        assert_eq!(
            format_citation_line(&sample()),
            "BRCA1 & DNA repair. Smith J, Doe A. Nature (2023). PMID: 123"
        );
        assert_eq!(format_citation_line(&Citation::new("Bare title.")), "Bare title");
    }
}
