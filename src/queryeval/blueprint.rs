//! The evaluation plan tree.
//!
//! [`Blueprint`] is a closed set of node kinds. Consumers that walk the tree
//! use the capability accessors ([`Blueprint::as_same_element`],
//! [`Blueprint::attribute_search_context`], [`Blueprint::as_and_not`],
//! [`Blueprint::children`]) instead of matching on concrete kinds, so a node
//! that offers several capabilities is handled by whichever the walker
//! checks first.

use std::sync::Arc;

use crate::attribute::AttributeSearchContext;
use crate::queryeval::intermediate_search::{AndNotSearch, AndSearch, OrSearch, RankSearch};
use crate::queryeval::leaf_search::{AttributeSearch, PostingList, PostingSearch};
use crate::queryeval::match_data::{SharedMatchData, TermFieldHandle};
use crate::queryeval::same_element::SameElementSearch;
use crate::queryeval::search_iterator::{EmptySearch, SearchIterator};

/// A term looked up in an inverted index field.
#[derive(Debug, Clone)]
pub struct TermBlueprint {
    field_name: String,
    term: String,
    postings: Arc<PostingList>,
    handle: TermFieldHandle,
}

impl TermBlueprint {
    pub fn new<F: Into<String>, T: Into<String>>(
        field_name: F,
        term: T,
        postings: Arc<PostingList>,
        handle: TermFieldHandle,
    ) -> Self {
        TermBlueprint {
            field_name: field_name.into(),
            term: term.into(),
            postings,
            handle,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn handle(&self) -> TermFieldHandle {
        self.handle
    }
}

/// A term searched directly in an attribute.
#[derive(Debug, Clone)]
pub struct AttributeBlueprint {
    context: Arc<dyn AttributeSearchContext>,
    handle: Option<TermFieldHandle>,
}

impl AttributeBlueprint {
    pub fn new(context: Arc<dyn AttributeSearchContext>) -> Self {
        AttributeBlueprint {
            context,
            handle: None,
        }
    }

    /// Unpack matched elements into `handle`.
    pub fn with_handle(mut self, handle: TermFieldHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn context(&self) -> &dyn AttributeSearchContext {
        self.context.as_ref()
    }

    pub fn attribute_name(&self) -> &str {
        self.context.attribute_name()
    }
}

/// Terms that must all match within the same element of a struct field.
#[derive(Debug, Clone)]
pub struct SameElementBlueprint {
    struct_field_name: String,
    terms: Vec<Arc<dyn AttributeSearchContext>>,
}

impl SameElementBlueprint {
    pub fn new<S: Into<String>>(
        struct_field_name: S,
        terms: Vec<Arc<dyn AttributeSearchContext>>,
    ) -> Self {
        SameElementBlueprint {
            struct_field_name: struct_field_name.into(),
            terms,
        }
    }

    pub fn struct_field_name(&self) -> &str {
        &self.struct_field_name
    }

    pub fn terms(&self) -> &[Arc<dyn AttributeSearchContext>] {
        &self.terms
    }

    /// Create a fresh element-match search over this node's terms.
    pub fn create_same_element_search(&self, strict: bool) -> SameElementSearch {
        SameElementSearch::new(self.terms.clone(), strict)
    }
}

/// Kind of an intermediate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntermediateKind {
    And,
    Or,
    /// First child is positive, the rest are excluded.
    AndNot,
    /// First child decides matching, the rest only contribute match data.
    Rank,
}

/// A node combining child plans.
#[derive(Debug, Clone)]
pub struct IntermediateBlueprint {
    kind: IntermediateKind,
    children: Vec<Blueprint>,
}

impl IntermediateBlueprint {
    pub fn new(kind: IntermediateKind, children: Vec<Blueprint>) -> Self {
        IntermediateBlueprint { kind, children }
    }

    pub fn kind(&self) -> IntermediateKind {
        self.kind
    }

    pub fn children(&self) -> &[Blueprint] {
        &self.children
    }

    pub fn child(&self, idx: usize) -> Option<&Blueprint> {
        self.children.get(idx)
    }

    pub fn add_child(&mut self, child: Blueprint) {
        self.children.push(child);
    }

    fn create_search(&self, match_data: &SharedMatchData, strict: bool) -> Box<dyn SearchIterator> {
        // Only the leading child drives iteration; the others are probed.
        let mut children: Vec<Box<dyn SearchIterator>> = self
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let child_strict = match self.kind {
                    IntermediateKind::Or => strict,
                    _ => strict && i == 0,
                };
                child.create_search(match_data, child_strict)
            })
            .collect();

        match self.kind {
            IntermediateKind::And => Box::new(AndSearch::new(children)),
            IntermediateKind::Or => Box::new(OrSearch::new(children)),
            IntermediateKind::Rank => Box::new(RankSearch::new(children)),
            IntermediateKind::AndNot => {
                if children.is_empty() {
                    return Box::new(EmptySearch::new());
                }
                let positive = children.remove(0);
                Box::new(AndNotSearch::new(positive, children))
            }
        }
    }
}

/// A node in the evaluation plan.
#[derive(Debug, Clone)]
pub enum Blueprint {
    /// Matches nothing.
    Empty,
    Term(TermBlueprint),
    Attribute(AttributeBlueprint),
    SameElement(SameElementBlueprint),
    Intermediate(IntermediateBlueprint),
}

impl Blueprint {
    pub fn and(children: Vec<Blueprint>) -> Self {
        Blueprint::Intermediate(IntermediateBlueprint::new(IntermediateKind::And, children))
    }

    pub fn or(children: Vec<Blueprint>) -> Self {
        Blueprint::Intermediate(IntermediateBlueprint::new(IntermediateKind::Or, children))
    }

    pub fn and_not(positive: Blueprint, negative: Blueprint) -> Self {
        Blueprint::Intermediate(IntermediateBlueprint::new(
            IntermediateKind::AndNot,
            vec![positive, negative],
        ))
    }

    pub fn rank(children: Vec<Blueprint>) -> Self {
        Blueprint::Intermediate(IntermediateBlueprint::new(IntermediateKind::Rank, children))
    }

    pub fn as_same_element(&self) -> Option<&SameElementBlueprint> {
        match self {
            Blueprint::SameElement(same_element) => Some(same_element),
            _ => None,
        }
    }

    /// The attribute search context of an attribute leaf.
    pub fn attribute_search_context(&self) -> Option<&dyn AttributeSearchContext> {
        match self {
            Blueprint::Attribute(attr) => Some(attr.context()),
            _ => None,
        }
    }

    pub fn as_intermediate(&self) -> Option<&IntermediateBlueprint> {
        match self {
            Blueprint::Intermediate(intermediate) => Some(intermediate),
            _ => None,
        }
    }

    pub fn as_and_not(&self) -> Option<&IntermediateBlueprint> {
        self.as_intermediate()
            .filter(|intermediate| intermediate.kind() == IntermediateKind::AndNot)
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[Blueprint] {
        match self {
            Blueprint::Intermediate(intermediate) => intermediate.children(),
            _ => &[],
        }
    }

    /// Build a fresh iterator tree for this plan.
    pub fn create_search(&self, match_data: &SharedMatchData, strict: bool) -> Box<dyn SearchIterator> {
        match self {
            Blueprint::Empty => Box::new(EmptySearch::new()),
            Blueprint::Term(term) => Box::new(PostingSearch::new(
                term.postings.clone(),
                term.handle,
                match_data.clone(),
            )),
            Blueprint::Attribute(attr) => Box::new(AttributeSearch::new(
                attr.context.clone(),
                attr.handle,
                match_data.clone(),
                strict,
            )),
            Blueprint::SameElement(same_element) => {
                Box::new(same_element.create_same_element_search(strict))
            }
            Blueprint::Intermediate(intermediate) => intermediate.create_search(match_data, strict),
        }
    }
}
