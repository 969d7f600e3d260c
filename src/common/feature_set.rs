//! Per-document feature vectors.

use serde::{Deserialize, Serialize};

/// A stored feature value: a number or an encoded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Number(f64),
    Bytes(Vec<u8>),
}

impl Default for FeatureValue {
    fn default() -> Self {
        FeatureValue::Number(0.0)
    }
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FeatureValue::Bytes(bytes) => Some(bytes),
            FeatureValue::Number(_) => None,
        }
    }

    pub fn set_number(&mut self, value: f64) {
        *self = FeatureValue::Number(value);
    }

    pub fn set_bytes(&mut self, bytes: Vec<u8>) {
        *self = FeatureValue::Bytes(bytes);
    }
}

/// Feature names plus one row of values per document.
///
/// Rows are appended in document id order; lookups by document id rely on
/// that ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    names: Vec<String>,
    doc_ids: Vec<u32>,
    values: Vec<FeatureValue>,
}

impl FeatureSet {
    /// An empty set: no names and no documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set with fixed names and room for `expected_docs` rows.
    pub fn with_names(names: Vec<String>, expected_docs: usize) -> Self {
        let values = Vec::with_capacity(names.len() * expected_docs);
        FeatureSet {
            names,
            doc_ids: Vec::with_capacity(expected_docs),
            values,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn num_features(&self) -> usize {
        self.names.len()
    }

    pub fn num_docs(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn doc_ids(&self) -> &[u32] {
        &self.doc_ids
    }

    /// True when the set holds no names and no documents.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.doc_ids.is_empty()
    }

    /// Append a row for `doc_id` and return its index.
    pub fn add_doc_id(&mut self, doc_id: u32) -> usize {
        debug_assert!(
            self.doc_ids.last().is_none_or(|&last| last < doc_id),
            "rows must be added in ascending doc id order"
        );
        self.doc_ids.push(doc_id);
        let len = self.values.len() + self.names.len();
        self.values.resize(len, FeatureValue::default());
        self.doc_ids.len() - 1
    }

    pub fn features_by_index(&self, row: usize) -> &[FeatureValue] {
        let width = self.names.len();
        &self.values[row * width..(row + 1) * width]
    }

    pub fn features_by_index_mut(&mut self, row: usize) -> &mut [FeatureValue] {
        let width = self.names.len();
        &mut self.values[row * width..(row + 1) * width]
    }

    pub fn features_by_doc_id(&self, doc_id: u32) -> Option<&[FeatureValue]> {
        self.doc_ids
            .binary_search(&doc_id)
            .ok()
            .map(|row| self.features_by_index(row))
    }

    pub fn contains(&self, doc_id: u32) -> bool {
        self.doc_ids.binary_search(&doc_id).is_ok()
    }

    /// Value of the named feature for a document.
    pub fn get(&self, doc_id: u32, name: &str) -> Option<&FeatureValue> {
        let col = self.names.iter().position(|n| n == name)?;
        self.features_by_doc_id(doc_id).map(|row| &row[col])
    }

    /// Iterate `(doc id, row)` pairs in document order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &[FeatureValue])> {
        self.doc_ids
            .iter()
            .enumerate()
            .map(|(row, &doc_id)| (doc_id, self.features_by_index(row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_feature_set() {
        let fs = FeatureSet::new();
        assert!(fs.is_empty());
        assert_eq!(fs.num_features(), 0);
        assert_eq!(fs.num_docs(), 0);
        assert!(fs.features_by_doc_id(1).is_none());
    }

    #[test]
    fn test_add_and_lookup() {
        let mut fs = FeatureSet::with_names(vec!["score".to_string(), "emb".to_string()], 2);
        assert!(!fs.is_empty());

        let row = fs.add_doc_id(3);
        fs.features_by_index_mut(row)[0].set_number(0.87);
        fs.features_by_index_mut(row)[1].set_bytes(vec![1, 2, 3]);
        let row = fs.add_doc_id(9);
        fs.features_by_index_mut(row)[0].set_number(0.5);

        assert_eq!(fs.num_docs(), 2);
        assert_eq!(fs.doc_ids(), &[3, 9]);
        assert_eq!(fs.get(3, "score"), Some(&FeatureValue::Number(0.87)));
        assert_eq!(fs.get(3, "emb").and_then(FeatureValue::as_bytes), Some(&[1u8, 2, 3][..]));
        assert_eq!(fs.get(9, "emb"), Some(&FeatureValue::Number(0.0)));
        assert!(fs.get(7, "score").is_none());
        assert!(fs.get(3, "missing").is_none());
        assert!(fs.contains(9));
        assert!(!fs.contains(7));

        let rows: Vec<(u32, usize)> = fs.rows().map(|(doc_id, row)| (doc_id, row.len())).collect();
        assert_eq!(rows, vec![(3, 2), (9, 2)]);
    }

    #[test]
    fn test_serialize_feature_set() {
        let mut fs = FeatureSet::with_names(vec!["score".to_string()], 1);
        let row = fs.add_doc_id(1);
        fs.features_by_index_mut(row)[0].set_number(1.5);

        let json = serde_json::to_string(&fs).unwrap();
        let decoded: FeatureSet = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, fs);
    }
}
