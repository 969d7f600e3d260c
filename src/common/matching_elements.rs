//! Matched element indices per document and struct field.

use serde::{Deserialize, Serialize};

/// Element indices one plan leaf matched in one struct field of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingElementsEntry {
    pub doc_id: u32,
    pub field_name: String,
    pub elements: Vec<u32>,
}

/// Append-only collection of matching element entries.
///
/// Contributions are kept as separate entries: when several leaves target
/// the same struct field, each adds its own entry for the document. Use
/// [`MatchingElements::merged`] to get a single list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingElements {
    entries: Vec<MatchingElementsEntry>,
}

impl MatchingElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record matches; empty lists are ignored.
    pub fn add_matching_elements(&mut self, doc_id: u32, field_name: &str, elements: &[u32]) {
        if elements.is_empty() {
            return;
        }
        self.entries.push(MatchingElementsEntry {
            doc_id,
            field_name: field_name.to_string(),
            elements: elements.to_vec(),
        });
    }

    pub fn entries(&self) -> &[MatchingElementsEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry recorded for a document and field, in insertion order.
    pub fn get<'a>(
        &'a self,
        doc_id: u32,
        field_name: &'a str,
    ) -> impl Iterator<Item = &'a [u32]> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.doc_id == doc_id && e.field_name == field_name)
            .map(|e| e.elements.as_slice())
    }

    /// Sorted, deduplicated union of all entries for a document and field.
    pub fn merged(&self, doc_id: u32, field_name: &str) -> Vec<u32> {
        let mut elements: Vec<u32> = self.get(doc_id, field_name).flatten().copied().collect();
        elements.sort_unstable();
        elements.dedup();
        elements
    }
}
