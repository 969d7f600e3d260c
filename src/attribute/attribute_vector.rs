//! Single- and array-valued attribute storage.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttributeValue {
    /// Numeric projection; strings project to 0.0.
    pub fn as_f64(&self) -> f64 {
        match self {
            AttributeValue::Int(v) => *v as f64,
            AttributeValue::Float(v) => *v,
            AttributeValue::Str(_) => 0.0,
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

/// Whether a document holds one value or an array of element values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    Single,
    Array,
}

/// A named attribute with values for each document id.
pub struct AttributeVector {
    name: String,
    collection_type: CollectionType,
    docs: Vec<Vec<AttributeValue>>,
    enum_readers: AtomicUsize,
}

impl AttributeVector {
    pub fn new<S: Into<String>>(name: S, collection_type: CollectionType) -> Self {
        AttributeVector {
            name: name.into(),
            collection_type,
            docs: Vec::new(),
            enum_readers: AtomicUsize::new(0),
        }
    }

    /// Set the value of a single-valued document.
    pub fn set<V: Into<AttributeValue>>(&mut self, doc_id: u32, value: V) {
        self.set_values(doc_id, vec![value.into()]);
    }

    /// Set all element values of a document.
    pub fn set_values(&mut self, doc_id: u32, values: Vec<AttributeValue>) {
        let idx = doc_id as usize;
        if self.docs.len() <= idx {
            self.docs.resize_with(idx + 1, Vec::new);
        }
        self.docs[idx] = values;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection_type(&self) -> CollectionType {
        self.collection_type
    }

    /// One past the highest document id with storage.
    pub fn num_docs(&self) -> u32 {
        self.docs.len() as u32
    }

    /// Element values of a document; empty if the document has none.
    pub fn values(&self, doc_id: u32) -> &[AttributeValue] {
        self.docs
            .get(doc_id as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Numeric value of the first element, 0.0 when absent.
    pub fn number(&self, doc_id: u32) -> f64 {
        self.values(doc_id)
            .first()
            .map(AttributeValue::as_f64)
            .unwrap_or(0.0)
    }

    /// Pin the enum store for reading until the returned guard is dropped.
    pub fn acquire_enum_guard(self: &Arc<Self>) -> EnumGuard {
        self.enum_readers.fetch_add(1, Ordering::AcqRel);
        EnumGuard {
            attribute: Arc::clone(self),
        }
    }

    /// Number of live enum guards.
    pub fn enum_readers(&self) -> usize {
        self.enum_readers.load(Ordering::Acquire)
    }
}

impl fmt::Debug for AttributeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeVector")
            .field("name", &self.name)
            .field("collection_type", &self.collection_type)
            .field("num_docs", &self.docs.len())
            .field("enum_readers", &self.enum_readers())
            .finish()
    }
}

/// Read guard over an attribute's enum store.
#[derive(Debug)]
pub struct EnumGuard {
    attribute: Arc<AttributeVector>,
}

impl EnumGuard {
    pub fn attribute(&self) -> &AttributeVector {
        &self.attribute
    }
}

impl Drop for EnumGuard {
    fn drop(&mut self) {
        self.attribute.enum_readers.fetch_sub(1, Ordering::AcqRel);
    }
}
