//! Result containers and the struct field mapper.

pub mod feature_set;
pub mod matching_elements;
pub mod struct_field_mapper;

pub use self::feature_set::{FeatureSet, FeatureValue};
pub use self::matching_elements::{MatchingElements, MatchingElementsEntry};
pub use self::struct_field_mapper::StructFieldMapper;
