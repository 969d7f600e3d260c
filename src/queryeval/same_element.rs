//! Search for documents where all terms match inside the same struct element.

use std::sync::Arc;

use crate::attribute::AttributeSearchContext;
use crate::queryeval::search_iterator::{DocIdCursor, SearchIterator};

/// Element-match search over the subfield attributes of one struct field.
///
/// An element matches when every child context matches at that element
/// index. A strict instance seeks forward to the next document with at
/// least one matching element; a non-strict instance only checks the target.
#[derive(Debug)]
pub struct SameElementSearch {
    cursor: DocIdCursor,
    children: Vec<Arc<dyn AttributeSearchContext>>,
    strict: bool,
    scratch: Vec<u32>,
}

impl SameElementSearch {
    pub fn new(children: Vec<Arc<dyn AttributeSearchContext>>, strict: bool) -> Self {
        SameElementSearch {
            cursor: DocIdCursor::new(),
            children,
            strict,
            scratch: Vec::new(),
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Replace the contents of `out` with the ascending element indices of
    /// `doc_id` where every child matches.
    pub fn find_matching_elements(&self, doc_id: u32, out: &mut Vec<u32>) {
        out.clear();
        let Some((first, rest)) = self.children.split_first() else {
            return;
        };
        let mut id = first.find(doc_id, 0);
        while id >= 0 {
            // Jump to the first element all children agree on.
            let mut agreed = true;
            for child in rest {
                let found = child.find(doc_id, id);
                if found != id {
                    agreed = false;
                    if found < 0 {
                        return;
                    }
                    id = first.find(doc_id, found);
                    break;
                }
            }
            if agreed {
                out.push(id as u32);
                id = first.find(doc_id, id + 1);
            }
        }
    }

    fn has_match(&mut self, doc_id: u32) -> bool {
        let mut scratch = std::mem::take(&mut self.scratch);
        self.find_matching_elements(doc_id, &mut scratch);
        let found = !scratch.is_empty();
        self.scratch = scratch;
        found
    }
}

impl SearchIterator for SameElementSearch {
    fn cursor(&self) -> &DocIdCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut DocIdCursor {
        &mut self.cursor
    }

    fn do_seek(&mut self, doc_id: u32) {
        if !self.strict {
            if self.has_match(doc_id) {
                self.cursor.set_doc_id(doc_id);
            }
            return;
        }
        let num_docs = self
            .children
            .iter()
            .map(|c| c.num_docs())
            .min()
            .unwrap_or(0);
        let limit = self.cursor.end_id().min(num_docs);
        for doc in doc_id..limit {
            if self.has_match(doc) {
                self.cursor.set_doc_id(doc);
                return;
            }
        }
        self.cursor.set_at_end();
    }

    fn do_unpack(&mut self, _doc_id: u32) {}
}
