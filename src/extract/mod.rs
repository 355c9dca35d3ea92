//! Pattern-based recognition of biomedical entities in free text.
//!
//! Five independent scans run over the input: gene symbols, protein names,
//! disease names, pathway names and, only when the first four come back
//! empty, indicator keywords. Structural scans are case-sensitive; the
//! keyword scan is a case-insensitive substring check.

pub mod vocab;

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{push_unique, Citation, ExtractedEntities};
use vocab::{Concept, DISEASE_SUFFIXES, GENE_STOPLIST, PATHWAY_SUFFIXES, PROTEIN_SUFFIXES};

/// Capitalized words that open a question rather than name something
const LEADING_FILLERS: &[&str] = &[
    "What", "Which", "How", "Why", "When", "Where", "Who", "Does", "Do", "Did", "Is", "Are",
    "Can", "Could", "Should", "Would", "Will", "The", "A", "An", "In", "Of", "On", "For",
    "Explain", "Describe", "Tell",
];

/// Capability shared by every entity extraction implementation
pub trait EntityExtractor: Send + Sync {
    /// Extract entities from `text`; never fails, returns empty lists on no match
    fn extract(&self, text: &str) -> ExtractedEntities;
}

/// Regex-driven extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl EntityExtractor for RuleBasedExtractor {
    fn extract(&self, text: &str) -> ExtractedEntities {
        let mut entities = ExtractedEntities {
            genes: gene_symbols(text),
            proteins: suffixed_phrases(protein_regex(), text, 1),
            diseases: suffixed_phrases(disease_regex(), text, 1),
            pathways: suffixed_phrases(pathway_regex(), text, 0),
            keywords: Vec::new(),
        };

        if entities.has_no_structural() {
            entities.keywords = fallback_keywords(text);
        }

        tracing::debug!(
            genes = entities.genes.len(),
            proteins = entities.proteins.len(),
            diseases = entities.diseases.len(),
            pathways = entities.pathways.len(),
            keywords = entities.keywords.len(),
            "Extracted entities"
        );
        entities
    }
}

fn gene_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z][A-Z0-9]+(?:-\d+)?\b").expect("valid gene pattern"))
}

fn protein_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"\b(?:[A-Z][\w'’-]*\s+){{1,4}}(?:{})\b",
            PROTEIN_SUFFIXES.join("|")
        );
        Regex::new(&pattern).expect("valid protein pattern")
    })
}

fn disease_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"\b(?:[A-Z][\w'’-]*\s+){{1,4}}(?:{})\b",
            DISEASE_SUFFIXES.join("|")
        );
        Regex::new(&pattern).expect("valid disease pattern")
    })
}

fn pathway_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let suffixes = PATHWAY_SUFFIXES.join("|");
        // Allows names like "mTOR" and chained suffixes like "signaling pathway"
        let pattern = format!(
            r"(?:\b[a-z]?[A-Z][\w/'’-]*\s+){{0,3}}\b(?:{})(?:\s+(?:pathway|cascade|axis))?\b",
            suffixes
        );
        Regex::new(&pattern).expect("valid pathway pattern")
    })
}

/// Gene symbols in `text`: upper-case alphanumeric tokens with an optional
/// `-digits` suffix, minus the stoplist and anything shorter than 3 characters
pub fn gene_symbols(text: &str) -> Vec<String> {
    let mut genes = Vec::new();
    for m in gene_regex().find_iter(text) {
        let token = m.as_str();
        if is_gene_symbol(token) {
            push_unique(&mut genes, token);
        }
    }
    genes
}

fn is_gene_symbol(token: &str) -> bool {
    token.len() >= 3
        && !token.chars().all(|c| c.is_ascii_digit())
        && !GENE_STOPLIST.contains(&token)
}

/// Gene symbols mentioned in citation titles, in first-seen order
pub fn genes_in_titles(citations: &[Citation]) -> Vec<String> {
    let mut genes = Vec::new();
    for citation in citations {
        for gene in gene_symbols(&citation.title) {
            push_unique(&mut genes, gene);
        }
    }
    genes
}

/// Matches of a "Capitalized words + suffix" pattern, with question fillers
/// removed from the front. Matches left with fewer than `min_words` leading
/// words are dropped.
fn suffixed_phrases(re: &Regex, text: &str, min_words: usize) -> Vec<String> {
    let mut phrases = Vec::new();
    for m in re.find_iter(text) {
        let words: Vec<&str> = m.as_str().split_whitespace().collect();
        let Some(suffix_start) = words
            .iter()
            .position(|w| is_suffix_word(w))
        else {
            continue;
        };

        let fillers = words[..suffix_start]
            .iter()
            .take_while(|w| LEADING_FILLERS.contains(w))
            .count();
        if suffix_start - fillers < min_words {
            continue;
        }

        push_unique(&mut phrases, words[fillers..].join(" "));
    }
    phrases
}

fn is_suffix_word(word: &str) -> bool {
    PROTEIN_SUFFIXES.contains(&word)
        || DISEASE_SUFFIXES.contains(&word)
        || PATHWAY_SUFFIXES.contains(&word)
}

/// Indicator phrases present in `text`, checked case-insensitively
fn fallback_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut keywords = Vec::new();
    for concept in Concept::ALL {
        for indicator in concept.indicators() {
            if lower.contains(indicator) {
                push_unique(&mut keywords, *indicator);
            }
        }
    }
    keywords
}
