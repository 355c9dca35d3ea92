//! Biomedical entities extracted from a free-text question.

use serde::{Deserialize, Serialize};

/// Five parallel, de-duplicated lists of entity strings.
///
/// Every list is always present, possibly empty. `keywords` is only filled
/// by the rule-based extractor when the four structural lists are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    #[serde(default)]
    pub genes: Vec<String>,

    #[serde(default)]
    pub proteins: Vec<String>,

    #[serde(default)]
    pub diseases: Vec<String>,

    #[serde(default)]
    pub pathways: Vec<String>,

    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ExtractedEntities {
    /// Whether genes, proteins, diseases and pathways are all empty
    pub fn has_no_structural(&self) -> bool {
        self.genes.is_empty()
            && self.proteins.is_empty()
            && self.diseases.is_empty()
            && self.pathways.is_empty()
    }

    /// Whether every list, keywords included, is empty
    pub fn is_empty(&self) -> bool {
        self.has_no_structural() && self.keywords.is_empty()
    }
}

/// Append `value` unless an identical string is already present.
pub(crate) fn push_unique(list: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    if !list.contains(&value) {
        list.push(value);
    }
}
