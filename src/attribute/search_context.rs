//! Element-enumerating search over attributes.

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attribute::attribute_vector::{AttributeValue, AttributeVector};

/// Search over one attribute that can enumerate the matching elements of a
/// document.
pub trait AttributeSearchContext: Send + Sync + Debug {
    /// Name of the searched attribute (for struct subfields, `field.subfield`).
    fn attribute_name(&self) -> &str;

    /// One past the highest document id that can match.
    fn num_docs(&self) -> u32;

    /// First matching element index at or after `element_id`, or a negative
    /// value when there are no more.
    fn find(&self, doc_id: u32, element_id: i32) -> i32;

    /// Whether any element of the document matches.
    fn matches(&self, doc_id: u32) -> bool {
        self.find(doc_id, 0) >= 0
    }

    /// Replace the contents of `out` with every matching element of the
    /// document, walking `find` from element 0 until it reports no more.
    fn collect_elements(&self, doc_id: u32, out: &mut Vec<u32>) {
        out.clear();
        let mut id = self.find(doc_id, 0);
        while id >= 0 {
            out.push(id as u32);
            id = self.find(doc_id, id + 1);
        }
    }
}

/// Predicate evaluated against each attribute element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryTerm {
    /// Exact string (or integer literal) match.
    Exact(String),
    /// String prefix match.
    Prefix(String),
    /// Inclusive numeric range.
    IntRange { lo: i64, hi: i64 },
}

impl QueryTerm {
    pub fn exact<S: Into<String>>(term: S) -> Self {
        QueryTerm::Exact(term.into())
    }

    pub fn prefix<S: Into<String>>(prefix: S) -> Self {
        QueryTerm::Prefix(prefix.into())
    }

    pub fn range(lo: i64, hi: i64) -> Self {
        QueryTerm::IntRange { lo, hi }
    }

    pub fn matches(&self, value: &AttributeValue) -> bool {
        match (self, value) {
            (QueryTerm::Exact(term), AttributeValue::Str(s)) => s == term,
            (QueryTerm::Exact(term), AttributeValue::Int(v)) => {
                term.parse::<i64>().map(|t| t == *v).unwrap_or(false)
            }
            (QueryTerm::Exact(_), AttributeValue::Float(_)) => false,
            (QueryTerm::Prefix(prefix), AttributeValue::Str(s)) => s.starts_with(prefix.as_str()),
            (QueryTerm::Prefix(_), _) => false,
            (QueryTerm::IntRange { lo, hi }, AttributeValue::Int(v)) => lo <= v && v <= hi,
            (QueryTerm::IntRange { lo, hi }, AttributeValue::Float(v)) => {
                (*lo as f64) <= *v && *v <= (*hi as f64)
            }
            (QueryTerm::IntRange { .. }, AttributeValue::Str(_)) => false,
        }
    }
}

/// A query term bound to an attribute.
#[derive(Debug, Clone)]
pub struct SearchContext {
    attribute: Arc<AttributeVector>,
    term: QueryTerm,
}

impl SearchContext {
    pub fn new(attribute: Arc<AttributeVector>, term: QueryTerm) -> Self {
        SearchContext { attribute, term }
    }

    pub fn term(&self) -> &QueryTerm {
        &self.term
    }

    pub fn attribute(&self) -> &Arc<AttributeVector> {
        &self.attribute
    }
}

impl AttributeSearchContext for SearchContext {
    fn attribute_name(&self) -> &str {
        self.attribute.name()
    }

    fn num_docs(&self) -> u32 {
        self.attribute.num_docs()
    }

    fn find(&self, doc_id: u32, element_id: i32) -> i32 {
        let start = element_id.max(0) as usize;
        self.attribute
            .values(doc_id)
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, value)| self.term.matches(value))
            .map(|(idx, _)| idx as i32)
            .unwrap_or(-1)
    }
}
