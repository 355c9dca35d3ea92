//! Turns extracted entities into a PubMed boolean search expression.
//!
//! Fragments are emitted in a fixed priority order and AND-joined:
//!
//! 1. diseases, each as a MeSH term and a free-text phrase
//! 2. one focus block (gene, else pathway, else protein) chosen from the
//!    question's wording, followed by the matching entities
//! 3. remaining entity groups as free-text phrases, only once a topic
//!    fragment exists
//!
//! With nothing to emit, the question itself becomes the query.

pub mod filters;

use crate::extract::vocab::{
    DISEASE_INDICATORS, GENE_INDICATORS, PATHWAY_INDICATORS, PROTEIN_INDICATORS,
};
use crate::models::ExtractedEntities;

pub use filters::{apply_filters, apply_filters_for_year, date_range_filter, REVIEW_FILTER};

const MESH: &str = "MeSH Terms";
const TITLE_ABSTRACT: &str = "Title/Abstract";
const GENE_PROTEIN_NAME: &str = "Gene/Protein Name";

/// Capability shared by every query construction implementation
pub trait QueryBuilder: Send + Sync {
    /// Build a search expression for `original_query`
    fn build(&self, original_query: &str, entities: &ExtractedEntities) -> String;
}

/// Rule engine over PubMed field tags
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedQueryBuilder;

impl RuleBasedQueryBuilder {
    pub fn new() -> Self {
        Self
    }
}

/// Which concept types the question's wording points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub gene: bool,
    pub pathway: bool,
    pub protein: bool,
    pub disease: bool,
}

impl Intent {
    /// Classify by word membership in the indicator vocabularies
    pub fn classify(original_query: &str, entities: &ExtractedEntities) -> Self {
        let lower = original_query.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let mentions = |vocab: &[&str]| words.iter().any(|w| vocab.contains(w));

        Self {
            gene: mentions(GENE_INDICATORS),
            pathway: mentions(PATHWAY_INDICATORS),
            protein: mentions(PROTEIN_INDICATORS),
            disease: mentions(DISEASE_INDICATORS) || !entities.diseases.is_empty(),
        }
    }

    /// The single focus block for this intent, if any
    pub fn focus(&self) -> Option<Focus> {
        if self.gene {
            Some(Focus::Gene)
        } else if self.pathway {
            Some(Focus::Pathway)
        } else if self.protein {
            Some(Focus::Protein)
        } else {
            None
        }
    }
}

/// Concept type of the focus block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Gene,
    Pathway,
    Protein,
}

impl Focus {
    /// Fixed MeSH and free-text synonyms for the concept
    fn synonyms(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Focus::Gene => &[
                ("Genes", MESH),
                ("Mutation", MESH),
                ("Gene Expression", MESH),
                ("gene", TITLE_ABSTRACT),
                ("mutation", TITLE_ABSTRACT),
            ],
            Focus::Pathway => &[
                ("Signal Transduction", MESH),
                ("Metabolic Networks and Pathways", MESH),
                ("pathway", TITLE_ABSTRACT),
                ("signaling", TITLE_ABSTRACT),
            ],
            Focus::Protein => &[
                ("Proteins", MESH),
                ("Protein Binding", MESH),
                ("protein", TITLE_ABSTRACT),
            ],
        }
    }

    /// Field tags used for this concept's own entities
    fn entity_tags(&self) -> &'static [&'static str] {
        match self {
            Focus::Gene | Focus::Protein => &[GENE_PROTEIN_NAME, TITLE_ABSTRACT],
            Focus::Pathway => &[TITLE_ABSTRACT],
        }
    }

    fn entities<'a>(&self, entities: &'a ExtractedEntities) -> &'a [String] {
        match self {
            Focus::Gene => &entities.genes,
            Focus::Pathway => &entities.pathways,
            Focus::Protein => &entities.proteins,
        }
    }
}

impl QueryBuilder for RuleBasedQueryBuilder {
    fn build(&self, original_query: &str, entities: &ExtractedEntities) -> String {
        let intent = Intent::classify(original_query, entities);
        let focus = intent.focus();
        let mut fragments: Vec<String> = Vec::new();

        if !entities.diseases.is_empty() {
            fragments.push(or_group(
                entities
                    .diseases
                    .iter()
                    .flat_map(|d| [tagged(d, MESH), tagged(d, TITLE_ABSTRACT)]),
            ));
        }

        if let Some(focus) = focus {
            fragments.push(or_group(
                focus
                    .synonyms()
                    .iter()
                    .map(|(term, tag)| tagged(term, tag)),
            ));

            let own = focus.entities(entities);
            if !own.is_empty() {
                let tags = focus.entity_tags();
                fragments.push(or_group(
                    own.iter()
                        .flat_map(|term| tags.iter().map(move |tag| tagged(term, tag))),
                ));
            }
        }

        // Residual groups only narrow an existing topic
        for (group, terms) in [
            (Focus::Pathway, &entities.pathways),
            (Focus::Protein, &entities.proteins),
            (Focus::Gene, &entities.genes),
        ] {
            if fragments.is_empty() || focus == Some(group) || terms.is_empty() {
                continue;
            }
            fragments.push(or_group(
                terms.iter().map(|term| tagged(term, TITLE_ABSTRACT)),
            ));
        }

        tracing::debug!(
            ?intent,
            ?focus,
            fragments = fragments.len(),
            "Built query fragments"
        );

        if fragments.is_empty() {
            return fallback_query(original_query);
        }
        fragments.join(" AND ")
    }
}

/// `"term"[tag]`, with embedded double quotes dropped
fn tagged(term: &str, tag: &str) -> String {
    format!("\"{}\"[{}]", term.replace('"', ""), tag)
}

fn or_group(terms: impl IntoIterator<Item = String>) -> String {
    let terms: Vec<String> = terms.into_iter().collect();
    format!("({})", terms.join(" OR "))
}

/// The question as a phrase search: quoted when it has whitespace and is
/// not already quoted
fn fallback_query(original_query: &str) -> String {
    let trimmed = original_query.trim();
    let already_quoted = trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"');
    if trimmed.contains(char::is_whitespace) && !already_quoted {
        format!("\"{}\"", trimmed)
    } else {
        trimmed.to_string()
    }
}
