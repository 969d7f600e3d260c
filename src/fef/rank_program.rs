//! Compiled feature programs and the resolver interface.

use std::fmt;
use std::sync::Arc;

use crate::fef::feature_executor::FeatureExecutor;
use crate::fef::value::Value;
use crate::queryeval::SharedMatchData;

/// Maps feature indices to names and per-document values.
///
/// Indices run from 0 to `num_features() - 1`; the order is fixed for the
/// lifetime of the resolver.
pub trait FeatureResolver {
    fn num_features(&self) -> usize;

    fn name_of(&self, idx: usize) -> &str;

    fn is_object(&self, idx: usize) -> bool;

    fn resolve(&self, idx: usize) -> LazyValue<'_>;
}

/// Accessor for one feature, evaluated on demand per document.
pub struct LazyValue<'a> {
    executor: &'a dyn FeatureExecutor,
    match_data: &'a SharedMatchData,
}

impl<'a> LazyValue<'a> {
    pub fn as_number(&self, doc_id: u32) -> f64 {
        self.executor.number(doc_id, &self.match_data.read())
    }

    pub fn as_object(&self, doc_id: u32) -> Value {
        self.executor.object(doc_id, &self.match_data.read())
    }
}

/// Named feature executors bound to the match data of one binding.
pub struct RankProgram {
    features: Vec<(String, Arc<dyn FeatureExecutor>)>,
    match_data: SharedMatchData,
}

impl RankProgram {
    pub fn new(features: Vec<(String, Arc<dyn FeatureExecutor>)>, match_data: SharedMatchData) -> Self {
        RankProgram {
            features,
            match_data,
        }
    }

    pub fn match_data(&self) -> &SharedMatchData {
        &self.match_data
    }
}

impl FeatureResolver for RankProgram {
    fn num_features(&self) -> usize {
        self.features.len()
    }

    fn name_of(&self, idx: usize) -> &str {
        &self.features[idx].0
    }

    fn is_object(&self, idx: usize) -> bool {
        self.features[idx].1.is_object()
    }

    fn resolve(&self, idx: usize) -> LazyValue<'_> {
        LazyValue {
            executor: self.features[idx].1.as_ref(),
            match_data: &self.match_data,
        }
    }
}

impl fmt::Debug for RankProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.features.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("RankProgram").field("features", &names).finish()
    }
}
