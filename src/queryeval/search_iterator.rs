//! The doc-at-a-time iteration protocol.

use std::fmt::Debug;

/// Document id used for an exhausted iterator.
pub const END_DOC_ID: u32 = u32::MAX;

/// Position and range state shared by every search iterator.
#[derive(Debug, Clone)]
pub struct DocIdCursor {
    doc_id: u32,
    begin_id: u32,
    end_id: u32,
    positioned: bool,
}

impl Default for DocIdCursor {
    fn default() -> Self {
        DocIdCursor {
            doc_id: 0,
            begin_id: 0,
            end_id: END_DOC_ID,
            positioned: false,
        }
    }
}

impl DocIdCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict iteration to `[begin, end)` and reset the position.
    pub fn init_range(&mut self, begin: u32, end: u32) {
        self.doc_id = begin;
        self.begin_id = begin;
        self.end_id = end;
        self.positioned = false;
    }

    pub fn doc_id(&self) -> u32 {
        self.doc_id
    }

    pub fn begin_id(&self) -> u32 {
        self.begin_id
    }

    pub fn end_id(&self) -> u32 {
        self.end_id
    }

    pub fn is_at(&self, doc_id: u32) -> bool {
        self.positioned && self.doc_id == doc_id
    }

    /// True when a seek to `target` has to move the iterator.
    pub fn is_before(&self, target: u32) -> bool {
        !self.positioned || self.doc_id < target
    }

    pub fn is_at_end(&self) -> bool {
        self.positioned && self.doc_id >= self.end_id
    }

    /// Land on `doc_id`; ids outside the range exhaust the iterator.
    pub fn set_doc_id(&mut self, doc_id: u32) {
        if doc_id >= self.end_id {
            self.set_at_end();
        } else {
            self.doc_id = doc_id;
            self.positioned = true;
        }
    }

    pub fn set_at_end(&mut self) {
        self.doc_id = END_DOC_ID;
        self.positioned = true;
    }
}

/// A cursor over the documents matched by a (sub)plan.
///
/// Strict iterators land on the first match at or after a seek target;
/// non-strict ones only check the target itself. Callers seek with
/// non-decreasing targets.
pub trait SearchIterator: Send + Debug {
    fn cursor(&self) -> &DocIdCursor;

    fn cursor_mut(&mut self) -> &mut DocIdCursor;

    /// Move towards `doc_id`. Only called when the iterator is before it and
    /// the target lies inside the initialized range.
    fn do_seek(&mut self, doc_id: u32);

    /// Write per-document match information for `doc_id`.
    fn do_unpack(&mut self, doc_id: u32);

    /// Restrict iteration to `[begin, end)`. Composite iterators forward the
    /// range to their children.
    fn init_range(&mut self, begin: u32, end: u32) {
        self.cursor_mut().init_range(begin, end);
    }

    fn doc_id(&self) -> u32 {
        self.cursor().doc_id()
    }

    fn is_at(&self, doc_id: u32) -> bool {
        self.cursor().is_at(doc_id)
    }

    fn is_at_end(&self) -> bool {
        self.cursor().is_at_end()
    }

    /// Seek to `doc_id`; returns true if the iterator landed exactly on it.
    fn seek(&mut self, doc_id: u32) -> bool {
        let cursor = self.cursor();
        if cursor.is_at(doc_id) {
            return true;
        }
        if doc_id < cursor.begin_id() {
            return false;
        }
        if doc_id >= cursor.end_id() {
            self.cursor_mut().set_at_end();
            return false;
        }
        if cursor.is_before(doc_id) {
            self.do_seek(doc_id);
        }
        self.cursor().is_at(doc_id)
    }

    /// Materialize the inputs features need for `doc_id`. Must be called
    /// while positioned on that document.
    fn unpack(&mut self, doc_id: u32) {
        self.do_unpack(doc_id);
    }
}

/// Next seek candidate after `child` failed to land on `candidate`.
pub(crate) fn next_candidate(child: &dyn SearchIterator, candidate: u32) -> u32 {
    let next = child.doc_id();
    if child.is_at_end() {
        END_DOC_ID
    } else if next > candidate {
        next
    } else {
        candidate + 1
    }
}

/// An iterator that matches nothing.
#[derive(Debug, Default)]
pub struct EmptySearch {
    cursor: DocIdCursor,
}

impl EmptySearch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchIterator for EmptySearch {
    fn cursor(&self) -> &DocIdCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut DocIdCursor {
        &mut self.cursor
    }

    fn do_seek(&mut self, _doc_id: u32) {
        self.cursor.set_at_end();
    }

    fn do_unpack(&mut self, _doc_id: u32) {}
}
