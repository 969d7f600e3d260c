//! Feature executors and the built-in feature kinds.

use std::fmt::Debug;
use std::sync::Arc;

use crate::attribute::{AttributeVector, TensorAttribute};
use crate::fef::value::Value;
use crate::queryeval::{MatchData, TermFieldHandle};

/// Computes one feature for a document.
///
/// Executors read attributes directly and read query-dependent inputs from
/// the match data unpacked for the document.
pub trait FeatureExecutor: Send + Sync + Debug {
    /// Whether the feature produces object values instead of numbers.
    fn is_object(&self) -> bool {
        false
    }

    fn number(&self, doc_id: u32, match_data: &MatchData) -> f64;

    fn object(&self, doc_id: u32, match_data: &MatchData) -> Value {
        Value::Double(self.number(doc_id, match_data))
    }
}

/// A fixed value, e.g. a query or profile constant.
#[derive(Debug, Clone)]
pub struct ConstantFeature {
    value: f64,
    object: bool,
}

impl ConstantFeature {
    /// Numeric constant.
    pub fn number(value: f64) -> Self {
        ConstantFeature {
            value,
            object: false,
        }
    }

    /// Object-kind constant holding a plain double.
    pub fn object(value: f64) -> Self {
        ConstantFeature {
            value,
            object: true,
        }
    }
}

impl FeatureExecutor for ConstantFeature {
    fn is_object(&self) -> bool {
        self.object
    }

    fn number(&self, _doc_id: u32, _match_data: &MatchData) -> f64 {
        self.value
    }
}

/// `attribute(name)`: first value of a numeric attribute.
#[derive(Debug, Clone)]
pub struct AttributeFeature {
    attribute: Arc<AttributeVector>,
}

impl AttributeFeature {
    pub fn new(attribute: Arc<AttributeVector>) -> Self {
        AttributeFeature { attribute }
    }
}

impl FeatureExecutor for AttributeFeature {
    fn number(&self, doc_id: u32, _match_data: &MatchData) -> f64 {
        self.attribute.number(doc_id)
    }
}

/// `attribute(name)` over a tensor attribute.
#[derive(Debug, Clone)]
pub struct TensorAttributeFeature {
    attribute: Arc<TensorAttribute>,
}

impl TensorAttributeFeature {
    pub fn new(attribute: Arc<TensorAttribute>) -> Self {
        TensorAttributeFeature { attribute }
    }
}

impl FeatureExecutor for TensorAttributeFeature {
    fn is_object(&self) -> bool {
        true
    }

    fn number(&self, doc_id: u32, _match_data: &MatchData) -> f64 {
        self.attribute.tensor(doc_id).as_double()
    }

    fn object(&self, doc_id: u32, _match_data: &MatchData) -> Value {
        Value::Tensor(self.attribute.tensor(doc_id))
    }
}

/// `matches(field)`: 1.0 when the term was unpacked for the document.
#[derive(Debug, Clone)]
pub struct MatchesFeature {
    handle: TermFieldHandle,
}

impl MatchesFeature {
    pub fn new(handle: TermFieldHandle) -> Self {
        MatchesFeature { handle }
    }
}

impl FeatureExecutor for MatchesFeature {
    fn number(&self, doc_id: u32, match_data: &MatchData) -> f64 {
        match match_data.term_field(self.handle) {
            Some(tfmd) if tfmd.is_unpacked_for(doc_id) => 1.0,
            _ => 0.0,
        }
    }
}

/// Number of elements the term matched in the document.
#[derive(Debug, Clone)]
pub struct ElementCountFeature {
    handle: TermFieldHandle,
}

impl ElementCountFeature {
    pub fn new(handle: TermFieldHandle) -> Self {
        ElementCountFeature { handle }
    }
}

impl FeatureExecutor for ElementCountFeature {
    fn number(&self, doc_id: u32, match_data: &MatchData) -> f64 {
        match match_data.term_field(self.handle) {
            Some(tfmd) if tfmd.is_unpacked_for(doc_id) => tfmd.elements().len() as f64,
            _ => 0.0,
        }
    }
}
