//! Feature evaluation framework.
//!
//! Features are named per-document values computed from attributes and
//! from the match data the iterator tree unpacks. A [`RankProgram`] binds a
//! list of feature executors to one [`SharedMatchData`] and exposes them
//! through the [`FeatureResolver`] interface.
//!
//! [`SharedMatchData`]: crate::queryeval::SharedMatchData

pub mod feature_executor;
pub mod rank_program;
pub mod rank_setup;
pub mod value;

pub use self::feature_executor::{
    AttributeFeature, ConstantFeature, ElementCountFeature, FeatureExecutor, MatchesFeature,
    TensorAttributeFeature,
};
pub use self::rank_program::{FeatureResolver, LazyValue, RankProgram};
pub use self::rank_setup::{FeatureRegistry, RankSetup};
pub use self::value::Value;
