//! Feature and matching element extraction for a batch of hits.

use std::sync::Arc;

use log::{debug, trace};

use crate::attribute::AttributeSearchContext;
use crate::common::{FeatureSet, MatchingElements, StructFieldMapper};
use crate::error::Result;
use crate::fef::FeatureResolver;
use crate::matching::match_tools::{ExtractMode, MatchToolsFactory};
use crate::matching::search_session::SearchSession;
use crate::queryeval::{Blueprint, SameElementBlueprint, SearchIterator};

/// Releases the session's enum guards when the matcher goes away.
struct SessionBinding {
    session: Arc<SearchSession>,
}

impl Drop for SessionBinding {
    fn drop(&mut self) {
        self.session.release_enum_guards();
    }
}

enum ToolsSource<'a> {
    None,
    Session(SessionBinding),
    Owned(Box<dyn MatchToolsFactory>),
    Borrowed(&'a dyn MatchToolsFactory),
}

/// Extracts summary features, rank features and matching elements for a
/// batch of documents selected by an earlier matching phase.
///
/// The document ids must be ascending and free of duplicates. Documents
/// that the query does not match are left out of feature results.
///
/// # Examples
///
/// ```
/// use docmatch::common::StructFieldMapper;
/// use docmatch::matching::DocsumMatcher;
///
/// let matcher = DocsumMatcher::empty();
/// assert_eq!(matcher.get_summary_features().unwrap().num_docs(), 0);
/// assert!(matcher.get_matching_elements(&StructFieldMapper::new()).is_empty());
/// ```
pub struct DocsumMatcher<'a> {
    source: ToolsSource<'a>,
    docs: Vec<u32>,
}

impl<'a> DocsumMatcher<'a> {
    /// A matcher without a binding source; every operation returns an empty
    /// result.
    pub fn empty() -> Self {
        DocsumMatcher {
            source: ToolsSource::None,
            docs: Vec::new(),
        }
    }

    /// Bind to a search session. The session's enum guards are released
    /// when the matcher is dropped.
    pub fn from_session(session: Arc<SearchSession>, docs: Vec<u32>) -> Self {
        Self::with_source(ToolsSource::Session(SessionBinding { session }), docs)
    }

    /// Bind to a factory the matcher owns exclusively. The factory is
    /// dropped together with the matcher.
    pub fn from_factory(factory: Box<dyn MatchToolsFactory>, docs: Vec<u32>) -> Self {
        Self::with_source(ToolsSource::Owned(factory), docs)
    }

    /// Bind to a factory owned by the caller. The borrow keeps the factory
    /// alive and unmoved for as long as the matcher exists.
    pub fn from_borrowed(factory: &'a dyn MatchToolsFactory, docs: Vec<u32>) -> Self {
        Self::with_source(ToolsSource::Borrowed(factory), docs)
    }

    fn with_source(source: ToolsSource<'a>, docs: Vec<u32>) -> Self {
        debug_assert!(
            docs.windows(2).all(|w| w[0] < w[1]),
            "doc ids must be ascending and unique"
        );
        DocsumMatcher { source, docs }
    }

    pub fn docs(&self) -> &[u32] {
        &self.docs
    }

    fn factory(&self) -> Option<&dyn MatchToolsFactory> {
        match &self.source {
            ToolsSource::None => None,
            ToolsSource::Session(binding) => Some(binding.session.match_tools_factory()),
            ToolsSource::Owned(factory) => Some(factory.as_ref()),
            ToolsSource::Borrowed(factory) => Some(*factory),
        }
    }

    /// Summary features of every matched document in the batch.
    pub fn get_summary_features(&self) -> Result<FeatureSet> {
        match self.factory() {
            Some(factory) => get_feature_set(factory, &self.docs, ExtractMode::Summary),
            None => Ok(FeatureSet::new()),
        }
    }

    /// Rank feature dump of every matched document in the batch.
    pub fn get_rank_features(&self) -> Result<FeatureSet> {
        match self.factory() {
            Some(factory) => get_feature_set(factory, &self.docs, ExtractMode::Dump),
            None => Ok(FeatureSet::new()),
        }
    }

    /// Element indices that matched inside the struct fields known to
    /// `field_mapper`.
    pub fn get_matching_elements(&self, field_mapper: &StructFieldMapper) -> MatchingElements {
        let mut result = MatchingElements::new();
        if field_mapper.is_empty() || self.docs.is_empty() {
            return result;
        }
        if let Some(root) = self.factory().and_then(|factory| factory.root()) {
            find_matching_elements(field_mapper, &self.docs, root, &mut result);
        }
        result
    }
}

fn get_feature_set(
    factory: &dyn MatchToolsFactory,
    docs: &[u32],
    mode: ExtractMode,
) -> Result<FeatureSet> {
    let mut tools = factory.create_match_tools(mode)?;
    let (search, resolver) = tools.parts_mut();
    let names: Vec<String> = (0..resolver.num_features())
        .map(|idx| resolver.name_of(idx).to_string())
        .collect();
    let mut result = FeatureSet::with_names(names, docs.len());
    let (Some(&first), Some(&last)) = (docs.first(), docs.last()) else {
        return Ok(result);
    };

    search.init_range(first, last.saturating_add(1));
    for &doc_id in docs {
        if !search.seek(doc_id) {
            debug!("Did not find hit for docid '{}'. Skipping hit", doc_id);
            continue;
        }
        search.unpack(doc_id);
        let row = result.add_doc_id(doc_id);
        let features = result.features_by_index_mut(row);
        for (idx, feature) in features.iter_mut().enumerate() {
            let value = resolver.resolve(idx);
            if !resolver.is_object(idx) {
                feature.set_number(value.as_number(doc_id));
                continue;
            }
            let object = value.as_object(doc_id);
            match object.as_tensor() {
                Some(tensor) => {
                    let mut buf = Vec::new();
                    tensor.engine().encode(tensor, &mut buf)?;
                    feature.set_bytes(buf);
                }
                None => feature.set_number(object.as_double()),
            }
        }
    }

    if let Some(task) = factory.create_on_summary_task() {
        task.run(docs)?;
    }
    Ok(result)
}

fn find_matching_elements(
    mapper: &StructFieldMapper,
    docs: &[u32],
    node: &Blueprint,
    result: &mut MatchingElements,
) {
    if let Some(same_element) = node.as_same_element() {
        if mapper.is_struct_field(same_element.struct_field_name()) {
            find_same_element_matches(docs, same_element, result);
        } else {
            trace!(
                "Skipping same element subtree for unmapped field '{}'",
                same_element.struct_field_name()
            );
        }
    } else if let Some(ctx) = node.attribute_search_context() {
        if mapper.is_struct_subfield(ctx.attribute_name()) {
            if let Some(struct_field) = mapper.get_struct_field(ctx.attribute_name()) {
                find_attribute_matches(docs, struct_field, ctx, result);
            }
        }
    } else if let Some(and_not) = node.as_and_not() {
        if let Some(positive) = and_not.child(0) {
            find_matching_elements(mapper, docs, positive, result);
        }
    } else if let Some(intermediate) = node.as_intermediate() {
        for child in intermediate.children() {
            find_matching_elements(mapper, docs, child, result);
        }
    }
}

fn find_same_element_matches(
    docs: &[u32],
    same_element: &SameElementBlueprint,
    result: &mut MatchingElements,
) {
    let (Some(&first), Some(&last)) = (docs.first(), docs.last()) else {
        return;
    };
    let mut search = same_element.create_same_element_search(false);
    search.init_range(first, last.saturating_add(1));
    let mut matches = Vec::new();
    for &doc_id in docs {
        search.find_matching_elements(doc_id, &mut matches);
        result.add_matching_elements(doc_id, same_element.struct_field_name(), &matches);
    }
}

fn find_attribute_matches(
    docs: &[u32],
    struct_field: &str,
    ctx: &dyn AttributeSearchContext,
    result: &mut MatchingElements,
) {
    let mut matches = Vec::new();
    for &doc_id in docs {
        ctx.collect_elements(doc_id, &mut matches);
        result.add_matching_elements(doc_id, struct_field, &matches);
    }
}
