//! Leaf iterators over posting lists and attributes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeSearchContext;
use crate::queryeval::match_data::{SharedMatchData, TermFieldHandle};
use crate::queryeval::search_iterator::{DocIdCursor, SearchIterator};

/// One document in a posting list together with the elements it matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: u32,
    pub elements: Vec<u32>,
}

impl Posting {
    pub fn new(doc_id: u32, elements: Vec<u32>) -> Self {
        Posting { doc_id, elements }
    }
}

/// Postings sorted by document id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    /// Build from postings in any order; duplicates keep the last entry.
    pub fn new(mut postings: Vec<Posting>) -> Self {
        postings.sort_by_key(|p| p.doc_id);
        postings.reverse();
        postings.dedup_by_key(|p| p.doc_id);
        postings.reverse();
        PostingList { postings }
    }

    /// Postings without element information.
    pub fn from_doc_ids(doc_ids: &[u32]) -> Self {
        Self::new(doc_ids.iter().map(|&d| Posting::new(d, Vec::new())).collect())
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }
}

/// Strict iterator over a posting list.
#[derive(Debug)]
pub struct PostingSearch {
    cursor: DocIdCursor,
    postings: Arc<PostingList>,
    pos: usize,
    handle: TermFieldHandle,
    match_data: SharedMatchData,
}

impl PostingSearch {
    pub fn new(
        postings: Arc<PostingList>,
        handle: TermFieldHandle,
        match_data: SharedMatchData,
    ) -> Self {
        PostingSearch {
            cursor: DocIdCursor::new(),
            postings,
            pos: 0,
            handle,
            match_data,
        }
    }
}

impl SearchIterator for PostingSearch {
    fn cursor(&self) -> &DocIdCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut DocIdCursor {
        &mut self.cursor
    }

    fn init_range(&mut self, begin: u32, end: u32) {
        self.cursor.init_range(begin, end);
        self.pos = 0;
    }

    fn do_seek(&mut self, doc_id: u32) {
        let rest = &self.postings.postings()[self.pos..];
        self.pos += rest.partition_point(|p| p.doc_id < doc_id);
        match self.postings.postings().get(self.pos) {
            Some(posting) => self.cursor.set_doc_id(posting.doc_id),
            None => self.cursor.set_at_end(),
        }
    }

    fn do_unpack(&mut self, doc_id: u32) {
        if let Some(posting) = self.postings.postings().get(self.pos) {
            if posting.doc_id == doc_id {
                if let Some(tfmd) = self.match_data.write().term_field_mut(self.handle) {
                    tfmd.set_match(doc_id, &posting.elements);
                }
            }
        }
    }
}

/// Iterator over the documents where an attribute search context matches.
#[derive(Debug)]
pub struct AttributeSearch {
    cursor: DocIdCursor,
    context: Arc<dyn AttributeSearchContext>,
    handle: Option<TermFieldHandle>,
    match_data: SharedMatchData,
    strict: bool,
    elements: Vec<u32>,
}

impl AttributeSearch {
    pub fn new(
        context: Arc<dyn AttributeSearchContext>,
        handle: Option<TermFieldHandle>,
        match_data: SharedMatchData,
        strict: bool,
    ) -> Self {
        AttributeSearch {
            cursor: DocIdCursor::new(),
            context,
            handle,
            match_data,
            strict,
            elements: Vec::new(),
        }
    }
}

impl SearchIterator for AttributeSearch {
    fn cursor(&self) -> &DocIdCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut DocIdCursor {
        &mut self.cursor
    }

    fn do_seek(&mut self, doc_id: u32) {
        if !self.strict {
            if self.context.matches(doc_id) {
                self.cursor.set_doc_id(doc_id);
            }
            return;
        }
        let limit = self.cursor.end_id().min(self.context.num_docs());
        match (doc_id..limit).find(|&doc| self.context.matches(doc)) {
            Some(doc) => self.cursor.set_doc_id(doc),
            None => self.cursor.set_at_end(),
        }
    }

    fn do_unpack(&mut self, doc_id: u32) {
        let Some(handle) = self.handle else {
            return;
        };
        self.context.collect_elements(doc_id, &mut self.elements);
        if let Some(tfmd) = self.match_data.write().term_field_mut(handle) {
            tfmd.set_match(doc_id, &self.elements);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeVector, CollectionType, QueryTerm, SearchContext};
    use crate::queryeval::match_data::MatchDataLayout;

    #[test]
    fn test_posting_list_sorts_and_dedups() {
        let list = PostingList::new(vec![
            Posting::new(9, vec![]),
            Posting::new(3, vec![1]),
            Posting::new(3, vec![2]),
        ]);
        let ids: Vec<u32> = list.postings().iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![3, 9]);
        assert_eq!(list.postings()[0].elements, vec![2]);
    }

    #[test]
    fn test_posting_search_seek() {
        let mut layout = MatchDataLayout::new();
        let handle = layout.alloc_term_field("title");
        let md = layout.create_match_data().into_shared();
        let postings = Arc::new(PostingList::from_doc_ids(&[3, 9, 15]));

        let mut search = PostingSearch::new(postings, handle, md);
        search.init_range(3, 10);

        assert!(search.seek(3));
        assert!(!search.seek(7));
        assert_eq!(search.doc_id(), 9);
        assert!(search.seek(9));
        assert!(!search.seek(10));
        assert!(search.is_at_end());
    }

    #[test]
    fn test_posting_search_unpack() {
        let mut layout = MatchDataLayout::new();
        let handle = layout.alloc_term_field("title");
        let md = layout.create_match_data().into_shared();
        let postings = Arc::new(PostingList::new(vec![Posting::new(4, vec![0, 3])]));

        let mut search = PostingSearch::new(postings, handle, md.clone());
        search.init_range(1, 10);
        assert!(search.seek(4));
        search.unpack(4);

        let md = md.read();
        let tfmd = md.term_field(handle).unwrap();
        assert!(tfmd.is_unpacked_for(4));
        assert_eq!(tfmd.elements(), &[0, 3]);
    }

    #[test]
    fn test_attribute_search() {
        let mut attr = AttributeVector::new("tags.value", CollectionType::Array);
        attr.set_values(2, vec!["x".into()]);
        attr.set_values(5, vec!["y".into(), "x".into(), "x".into()]);
        let ctx: Arc<dyn AttributeSearchContext> =
            Arc::new(SearchContext::new(Arc::new(attr), QueryTerm::exact("x")));

        let mut layout = MatchDataLayout::new();
        let handle = layout.alloc_term_field("tags.value");
        let md = layout.create_match_data().into_shared();

        let mut search = AttributeSearch::new(ctx.clone(), Some(handle), md.clone(), true);
        search.init_range(1, 6);
        assert!(!search.seek(3));
        assert_eq!(search.doc_id(), 5);
        search.unpack(5);
        assert_eq!(md.read().term_field(handle).unwrap().elements(), &[1, 2]);

        let mut non_strict = AttributeSearch::new(ctx, None, md, false);
        non_strict.init_range(1, 6);
        assert!(!non_strict.seek(3));
        assert!(!non_strict.is_at_end());
        assert!(non_strict.seek(5));
    }
}
