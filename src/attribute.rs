//! In-memory attributes and their search contexts.
//!
//! Attributes are the per-document value stores that features read and
//! that attribute leaves in the evaluation plan search. Array attributes
//! hold one value per struct element, which is what makes element-level
//! matching possible.

pub mod attribute_vector;
pub mod search_context;
pub mod tensor_attribute;

pub use self::attribute_vector::{AttributeValue, AttributeVector, CollectionType, EnumGuard};
pub use self::search_context::{AttributeSearchContext, QueryTerm, SearchContext};
pub use self::tensor_attribute::TensorAttribute;
