//! Per-call match data written by iterators on unpack and read by features.

use std::sync::Arc;

use parking_lot::RwLock;

/// Index of a term field slot inside [`MatchData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermFieldHandle(u32);

impl TermFieldHandle {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// What one query term matched in the most recently unpacked document.
#[derive(Debug, Clone, Default)]
pub struct TermFieldMatchData {
    field_name: String,
    doc_id: Option<u32>,
    elements: Vec<u32>,
}

impl TermFieldMatchData {
    fn new(field_name: String) -> Self {
        TermFieldMatchData {
            field_name,
            doc_id: None,
            elements: Vec::new(),
        }
    }

    /// Record a match in `doc_id` at the given elements.
    pub fn set_match(&mut self, doc_id: u32, elements: &[u32]) {
        self.doc_id = Some(doc_id);
        self.elements.clear();
        self.elements.extend_from_slice(elements);
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Whether this slot was unpacked for `doc_id`.
    pub fn is_unpacked_for(&self, doc_id: u32) -> bool {
        self.doc_id == Some(doc_id)
    }

    pub fn elements(&self) -> &[u32] {
        &self.elements
    }
}

/// Allocates term field slots while a plan is being assembled.
#[derive(Debug, Clone, Default)]
pub struct MatchDataLayout {
    fields: Vec<String>,
}

impl MatchDataLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_term_field<S: Into<String>>(&mut self, field_name: S) -> TermFieldHandle {
        self.fields.push(field_name.into());
        TermFieldHandle((self.fields.len() - 1) as u32)
    }

    pub fn num_term_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn create_match_data(&self) -> MatchData {
        MatchData {
            term_fields: self
                .fields
                .iter()
                .cloned()
                .map(TermFieldMatchData::new)
                .collect(),
        }
    }
}

/// Term field slots for one evaluation binding.
#[derive(Debug, Clone, Default)]
pub struct MatchData {
    term_fields: Vec<TermFieldMatchData>,
}

impl MatchData {
    pub fn term_field(&self, handle: TermFieldHandle) -> Option<&TermFieldMatchData> {
        self.term_fields.get(handle.index())
    }

    pub fn term_field_mut(&mut self, handle: TermFieldHandle) -> Option<&mut TermFieldMatchData> {
        self.term_fields.get_mut(handle.index())
    }

    pub fn num_term_fields(&self) -> usize {
        self.term_fields.len()
    }

    pub fn into_shared(self) -> SharedMatchData {
        Arc::new(RwLock::new(self))
    }
}

/// Match data shared between the iterator tree and the rank program of one
/// binding.
pub type SharedMatchData = Arc<RwLock<MatchData>>;
