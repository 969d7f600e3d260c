//! Per-call evaluation bindings and the factories that build them.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::error::Result;
use crate::fef::{RankProgram, RankSetup};
use crate::queryeval::{Blueprint, EmptySearch, MatchDataLayout, SearchIterator};

/// Which feature program a binding is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractMode {
    /// The profile's summary features.
    Summary,
    /// Rank feature dump for diagnostics.
    Dump,
}

/// An iterator tree and a feature program sharing one match data.
///
/// Built for a single extraction call and dropped at its end.
#[derive(Debug)]
pub struct MatchTools {
    search: Box<dyn SearchIterator>,
    program: RankProgram,
}

impl MatchTools {
    pub fn new(search: Box<dyn SearchIterator>, program: RankProgram) -> Self {
        MatchTools { search, program }
    }

    pub fn search(&mut self) -> &mut dyn SearchIterator {
        self.search.as_mut()
    }

    pub fn program(&self) -> &RankProgram {
        &self.program
    }

    /// Borrow the iterator mutably and the program immutably at once.
    pub fn parts_mut(&mut self) -> (&mut dyn SearchIterator, &RankProgram) {
        (self.search.as_mut(), &self.program)
    }
}

/// Side-effecting work run once per summary call over the whole batch.
pub trait OnSummaryTask: Send + Sync {
    fn run(&self, doc_ids: &[u32]) -> Result<()>;
}

/// Source of evaluation bindings for one query.
pub trait MatchToolsFactory: Send + Sync {
    /// Build fresh match tools for one call.
    fn create_match_tools(&self, mode: ExtractMode) -> Result<MatchTools>;

    /// Root of the evaluation plan, if the query produced one.
    fn root(&self) -> Option<&Blueprint>;

    /// Task to run after feature extraction, if any.
    fn create_on_summary_task(&self) -> Option<Arc<dyn OnSummaryTask>> {
        None
    }
}

/// Builds match tools from a compiled plan and a rank setup.
pub struct QueryMatchToolsFactory {
    root: Option<Blueprint>,
    layout: MatchDataLayout,
    rank_setup: Arc<RankSetup>,
    on_summary_task: Option<Arc<dyn OnSummaryTask>>,
}

impl QueryMatchToolsFactory {
    /// `layout` must be the layout the plan's term field handles were
    /// allocated from.
    pub fn new(root: Option<Blueprint>, layout: MatchDataLayout, rank_setup: Arc<RankSetup>) -> Self {
        QueryMatchToolsFactory {
            root,
            layout,
            rank_setup,
            on_summary_task: None,
        }
    }

    pub fn with_on_summary_task(mut self, task: Arc<dyn OnSummaryTask>) -> Self {
        self.on_summary_task = Some(task);
        self
    }

    pub fn rank_setup(&self) -> &Arc<RankSetup> {
        &self.rank_setup
    }
}

impl MatchToolsFactory for QueryMatchToolsFactory {
    fn create_match_tools(&self, mode: ExtractMode) -> Result<MatchTools> {
        let match_data = self.layout.create_match_data().into_shared();
        let search: Box<dyn SearchIterator> = match &self.root {
            Some(root) => root.create_search(&match_data, true),
            None => Box::new(EmptySearch::new()),
        };
        let program = match mode {
            ExtractMode::Summary => self.rank_setup.create_summary_program(match_data)?,
            ExtractMode::Dump => self.rank_setup.create_dump_program(match_data)?,
        };
        trace!(
            "Created match tools for {:?} with {} term fields",
            mode,
            self.layout.num_term_fields()
        );
        Ok(MatchTools::new(search, program))
    }

    fn root(&self) -> Option<&Blueprint> {
        self.root.as_ref()
    }

    fn create_on_summary_task(&self) -> Option<Arc<dyn OnSummaryTask>> {
        self.on_summary_task.clone()
    }
}

impl fmt::Debug for QueryMatchToolsFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryMatchToolsFactory")
            .field("root", &self.root)
            .field("layout", &self.layout)
            .field("rank_setup", &self.rank_setup)
            .field("on_summary_task", &self.on_summary_task.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankProfile;
    use crate::fef::{ConstantFeature, FeatureRegistry, FeatureResolver, MatchesFeature};
    use crate::queryeval::PostingList;
    use crate::queryeval::TermBlueprint;

    fn factory() -> QueryMatchToolsFactory {
        let mut layout = MatchDataLayout::new();
        let handle = layout.alloc_term_field("title");
        let root = Blueprint::Term(TermBlueprint::new(
            "title",
            "rust",
            Arc::new(PostingList::from_doc_ids(&[2, 4])),
            handle,
        ));
        let mut registry = FeatureRegistry::new();
        registry.register("matches(title)", MatchesFeature::new(handle));
        registry.register("now", ConstantFeature::number(1.5));
        let profile = RankProfile::new("default").with_summary_features(vec!["matches(title)"]);
        QueryMatchToolsFactory::new(Some(root), layout, Arc::new(RankSetup::new(profile, registry)))
    }

    #[test]
    fn test_summary_and_dump_programs() {
        let factory = factory();
        let tools = factory.create_match_tools(ExtractMode::Summary).unwrap();
        assert_eq!(tools.program().num_features(), 1);

        let tools = factory.create_match_tools(ExtractMode::Dump).unwrap();
        assert_eq!(tools.program().num_features(), 2);
    }

    #[test]
    fn test_fresh_tools_per_call() {
        let factory = factory();
        let mut first = factory.create_match_tools(ExtractMode::Summary).unwrap();
        first.search().init_range(0, 10);
        assert!(first.search().seek(4));

        let mut second = factory.create_match_tools(ExtractMode::Summary).unwrap();
        second.search().init_range(0, 10);
        assert!(second.search().seek(2));
    }

    #[test]
    fn test_no_root_uses_empty_search() {
        let setup = RankSetup::new(RankProfile::new("default"), FeatureRegistry::new());
        let factory = QueryMatchToolsFactory::new(None, MatchDataLayout::new(), Arc::new(setup));
        assert!(factory.root().is_none());
        assert!(factory.create_on_summary_task().is_none());

        let mut tools = factory.create_match_tools(ExtractMode::Summary).unwrap();
        tools.search().init_range(0, 10);
        assert!(!tools.search().seek(3));
    }
}
