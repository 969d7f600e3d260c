//! Query evaluation: plan trees, search iterators and match data.
//!
//! A [`Blueprint`] is the compiled form of a query. Each extraction call
//! creates fresh [`SearchIterator`] trees and [`MatchData`] from it; nothing
//! created here is shared between calls.

pub mod blueprint;
pub mod intermediate_search;
pub mod leaf_search;
pub mod match_data;
pub mod same_element;
pub mod search_iterator;

pub use self::blueprint::{
    AttributeBlueprint, Blueprint, IntermediateBlueprint, IntermediateKind, SameElementBlueprint,
    TermBlueprint,
};
pub use self::intermediate_search::{AndNotSearch, AndSearch, OrSearch, RankSearch};
pub use self::leaf_search::{AttributeSearch, Posting, PostingList, PostingSearch};
pub use self::match_data::{
    MatchData, MatchDataLayout, SharedMatchData, TermFieldHandle, TermFieldMatchData,
};
pub use self::same_element::SameElementSearch;
pub use self::search_iterator::{DocIdCursor, EmptySearch, END_DOC_ID, SearchIterator};
