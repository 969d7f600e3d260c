//! Docsum-time matching.
//!
//! After the first matching phase has picked the documents to show, a
//! [`DocsumMatcher`] revisits the query for just those documents. It
//! extracts summary features, dumps rank features and reports which struct
//! elements matched. Each call creates its own [`MatchTools`] from a
//! [`MatchToolsFactory`], so calls never share iteration state.

pub mod docsum_matcher;
pub mod match_tools;
pub mod search_session;

pub use self::docsum_matcher::DocsumMatcher;
pub use self::match_tools::{
    ExtractMode, MatchTools, MatchToolsFactory, OnSummaryTask, QueryMatchToolsFactory,
};
pub use self::search_session::SearchSession;
