//! Property-based tests for feature extraction over arbitrary batches.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use docmatch::config::RankProfile;
use docmatch::fef::{ConstantFeature, FeatureRegistry, RankSetup};
use docmatch::prelude::*;
use docmatch::queryeval::{Blueprint, MatchDataLayout, PostingList, TermBlueprint};

fn factory(postings: &[u32]) -> QueryMatchToolsFactory {
    let mut layout = MatchDataLayout::new();
    let handle = layout.alloc_term_field("body");
    let root = Blueprint::Term(TermBlueprint::new(
        "body",
        "term",
        Arc::new(PostingList::from_doc_ids(postings)),
        handle,
    ));
    let mut registry = FeatureRegistry::new();
    registry.register("one", ConstantFeature::number(1.0));
    let profile = RankProfile::new("default").with_summary_features(vec!["one"]);
    QueryMatchToolsFactory::new(Some(root), layout, Arc::new(RankSetup::new(profile, registry)))
}

proptest! {
    #[test]
    fn prop_rows_are_matched_subset_of_batch(
        postings in prop::collection::btree_set(0u32..500, 0..60),
        batch in prop::collection::btree_set(0u32..500, 0..60),
    ) {
        let postings: Vec<u32> = postings.into_iter().collect();
        let batch: Vec<u32> = batch.into_iter().collect();
        let factory = factory(&postings);
        let matcher = DocsumMatcher::from_borrowed(&factory, batch.clone());
        let fs = matcher.get_summary_features().unwrap();

        let posted: BTreeSet<u32> = postings.iter().copied().collect();
        let expected: Vec<u32> = batch.iter().copied().filter(|d| posted.contains(d)).collect();

        // Rows are ascending, all from the batch, and never for unposted docs.
        prop_assert_eq!(fs.doc_ids(), expected.as_slice());
        prop_assert_eq!(fs.num_features(), 1);
        for doc_id in fs.doc_ids() {
            prop_assert_eq!(fs.get(*doc_id, "one"), Some(&FeatureValue::Number(1.0)));
        }
    }

    #[test]
    fn prop_rank_dump_matches_summary_rows(
        postings in prop::collection::btree_set(0u32..200, 1..40),
        batch in prop::collection::btree_set(0u32..200, 1..40),
    ) {
        let postings: Vec<u32> = postings.into_iter().collect();
        let batch: Vec<u32> = batch.into_iter().collect();
        let factory = factory(&postings);
        let matcher = DocsumMatcher::from_borrowed(&factory, batch);

        let summary = matcher.get_summary_features().unwrap();
        let dump = matcher.get_rank_features().unwrap();
        prop_assert_eq!(summary.doc_ids(), dump.doc_ids());
    }
}
