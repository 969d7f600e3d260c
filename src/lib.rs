//! # docmatch
//!
//! Docsum-time matching for a search engine backend. Once the first
//! matching phase has picked the hits to show, `docmatch` revisits the query
//! for just those documents and extracts:
//!
//! - Summary features configured by the rank profile
//! - Full rank feature dumps for diagnostics
//! - The element indices inside struct and array fields where the query matched
//!
//! The query plan, attribute stores and feature executors are provided
//! in-memory; see [`matching::DocsumMatcher`] for the entry point.

pub mod attribute;
pub mod common;
pub mod config;
pub mod error;
pub mod executor;
pub mod fef;
pub mod matching;
pub mod queryeval;
pub mod tensor;
pub mod util;

pub mod prelude {
    pub use crate::common::{FeatureSet, FeatureValue, MatchingElements, StructFieldMapper};
    pub use crate::error::{DocMatchError, Result};
    pub use crate::matching::{DocsumMatcher, MatchToolsFactory, QueryMatchToolsFactory};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
