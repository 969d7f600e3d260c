//! Composite iterators: AND, OR, AND-NOT and RANK.
//!
//! All composites are strict: a seek lands on the first document at or
//! after the target that satisfies the composite. Children may be
//! non-strict, in which case candidates advance one document at a time.

use crate::queryeval::search_iterator::{DocIdCursor, SearchIterator, next_candidate};

fn init_children(children: &mut [Box<dyn SearchIterator>], begin: u32, end: u32) {
    for child in children.iter_mut() {
        child.init_range(begin, end);
    }
}

/// Conjunction of its children.
#[derive(Debug)]
pub struct AndSearch {
    cursor: DocIdCursor,
    children: Vec<Box<dyn SearchIterator>>,
}

impl AndSearch {
    pub fn new(children: Vec<Box<dyn SearchIterator>>) -> Self {
        AndSearch {
            cursor: DocIdCursor::new(),
            children,
        }
    }
}

impl SearchIterator for AndSearch {
    fn cursor(&self) -> &DocIdCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut DocIdCursor {
        &mut self.cursor
    }

    fn init_range(&mut self, begin: u32, end: u32) {
        self.cursor.init_range(begin, end);
        init_children(&mut self.children, begin, end);
    }

    fn do_seek(&mut self, doc_id: u32) {
        if self.children.is_empty() {
            self.cursor.set_at_end();
            return;
        }
        let mut candidate = doc_id;
        'candidates: loop {
            if candidate >= self.cursor.end_id() {
                self.cursor.set_at_end();
                return;
            }
            for child in self.children.iter_mut() {
                if !child.seek(candidate) {
                    candidate = next_candidate(child.as_ref(), candidate);
                    continue 'candidates;
                }
            }
            self.cursor.set_doc_id(candidate);
            return;
        }
    }

    fn do_unpack(&mut self, doc_id: u32) {
        for child in self.children.iter_mut() {
            child.unpack(doc_id);
        }
    }
}

/// Disjunction of its children.
#[derive(Debug)]
pub struct OrSearch {
    cursor: DocIdCursor,
    children: Vec<Box<dyn SearchIterator>>,
}

impl OrSearch {
    pub fn new(children: Vec<Box<dyn SearchIterator>>) -> Self {
        OrSearch {
            cursor: DocIdCursor::new(),
            children,
        }
    }
}

impl SearchIterator for OrSearch {
    fn cursor(&self) -> &DocIdCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut DocIdCursor {
        &mut self.cursor
    }

    fn init_range(&mut self, begin: u32, end: u32) {
        self.cursor.init_range(begin, end);
        init_children(&mut self.children, begin, end);
    }

    fn do_seek(&mut self, doc_id: u32) {
        let mut candidate = doc_id;
        loop {
            if candidate >= self.cursor.end_id() {
                self.cursor.set_at_end();
                return;
            }
            let mut best = u32::MAX;
            for child in self.children.iter_mut() {
                if child.seek(candidate) {
                    best = candidate;
                } else {
                    best = best.min(next_candidate(child.as_ref(), candidate));
                }
            }
            if best == candidate {
                self.cursor.set_doc_id(candidate);
                return;
            }
            candidate = best;
        }
    }

    fn do_unpack(&mut self, doc_id: u32) {
        for child in self.children.iter_mut() {
            if child.is_at(doc_id) {
                child.unpack(doc_id);
            }
        }
    }
}

/// Documents matching the first child and none of the others.
#[derive(Debug)]
pub struct AndNotSearch {
    cursor: DocIdCursor,
    positive: Box<dyn SearchIterator>,
    negatives: Vec<Box<dyn SearchIterator>>,
}

impl AndNotSearch {
    pub fn new(positive: Box<dyn SearchIterator>, negatives: Vec<Box<dyn SearchIterator>>) -> Self {
        AndNotSearch {
            cursor: DocIdCursor::new(),
            positive,
            negatives,
        }
    }
}

impl SearchIterator for AndNotSearch {
    fn cursor(&self) -> &DocIdCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut DocIdCursor {
        &mut self.cursor
    }

    fn init_range(&mut self, begin: u32, end: u32) {
        self.cursor.init_range(begin, end);
        self.positive.init_range(begin, end);
        init_children(&mut self.negatives, begin, end);
    }

    fn do_seek(&mut self, doc_id: u32) {
        let mut candidate = doc_id;
        loop {
            if candidate >= self.cursor.end_id() {
                self.cursor.set_at_end();
                return;
            }
            if !self.positive.seek(candidate) {
                candidate = next_candidate(self.positive.as_ref(), candidate);
                continue;
            }
            if self.negatives.iter_mut().any(|neg| neg.seek(candidate)) {
                candidate += 1;
                continue;
            }
            self.cursor.set_doc_id(candidate);
            return;
        }
    }

    fn do_unpack(&mut self, doc_id: u32) {
        self.positive.unpack(doc_id);
    }
}

/// Matches like its first child; the remaining children only add match
/// data for ranking.
#[derive(Debug)]
pub struct RankSearch {
    cursor: DocIdCursor,
    children: Vec<Box<dyn SearchIterator>>,
}

impl RankSearch {
    pub fn new(children: Vec<Box<dyn SearchIterator>>) -> Self {
        RankSearch {
            cursor: DocIdCursor::new(),
            children,
        }
    }
}

impl SearchIterator for RankSearch {
    fn cursor(&self) -> &DocIdCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut DocIdCursor {
        &mut self.cursor
    }

    fn init_range(&mut self, begin: u32, end: u32) {
        self.cursor.init_range(begin, end);
        init_children(&mut self.children, begin, end);
    }

    fn do_seek(&mut self, doc_id: u32) {
        let Some(first) = self.children.first_mut() else {
            self.cursor.set_at_end();
            return;
        };
        let mut candidate = doc_id;
        loop {
            if candidate >= self.cursor.end_id() {
                self.cursor.set_at_end();
                return;
            }
            if first.seek(candidate) {
                self.cursor.set_doc_id(candidate);
                return;
            }
            candidate = next_candidate(first.as_ref(), candidate);
        }
    }

    fn do_unpack(&mut self, doc_id: u32) {
        let mut children = self.children.iter_mut();
        if let Some(first) = children.next() {
            first.unpack(doc_id);
        }
        for child in children {
            if child.seek(doc_id) {
                child.unpack(doc_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::queryeval::leaf_search::{PostingList, PostingSearch};
    use crate::queryeval::match_data::MatchDataLayout;

    fn postings(lists: &[&[u32]]) -> Vec<Box<dyn SearchIterator>> {
        let mut layout = MatchDataLayout::new();
        let handles: Vec<_> = lists.iter().map(|_| layout.alloc_term_field("f")).collect();
        let md = layout.create_match_data().into_shared();
        lists
            .iter()
            .zip(handles)
            .map(|(docs, handle)| {
                Box::new(PostingSearch::new(
                    Arc::new(PostingList::from_doc_ids(docs)),
                    handle,
                    md.clone(),
                )) as Box<dyn SearchIterator>
            })
            .collect()
    }

    fn collect(search: &mut dyn SearchIterator, begin: u32, end: u32) -> Vec<u32> {
        search.init_range(begin, end);
        let mut hits = Vec::new();
        let mut doc = begin;
        while doc < end {
            if search.seek(doc) {
                hits.push(doc);
                doc += 1;
            } else if search.is_at_end() {
                break;
            } else {
                doc = search.doc_id().max(doc + 1);
            }
        }
        hits
    }

    #[test]
    fn test_and_search() {
        let mut search = AndSearch::new(postings(&[&[1, 3, 5, 7, 9], &[3, 4, 7, 10]]));
        assert_eq!(collect(&mut search, 1, 11), vec![3, 7]);
    }

    #[test]
    fn test_or_search() {
        let mut search = OrSearch::new(postings(&[&[1, 5], &[3, 5, 8]]));
        assert_eq!(collect(&mut search, 1, 11), vec![1, 3, 5, 8]);
    }

    #[test]
    fn test_and_not_search() {
        let mut children = postings(&[&[1, 3, 5, 7], &[3, 7]]);
        let negative = children.pop().unwrap();
        let positive = children.pop().unwrap();
        let mut search = AndNotSearch::new(positive, vec![negative]);
        assert_eq!(collect(&mut search, 1, 11), vec![1, 5]);
    }

    #[test]
    fn test_rank_search() {
        let mut search = RankSearch::new(postings(&[&[2, 4], &[1, 2, 3]]));
        assert_eq!(collect(&mut search, 1, 11), vec![2, 4]);
    }

    #[test]
    fn test_range_is_respected() {
        let mut search = OrSearch::new(postings(&[&[1, 5, 9, 12]]));
        assert_eq!(collect(&mut search, 5, 10), vec![5, 9]);
    }
}
