//! Search sessions kept alive between the matching and docsum phases.

use std::fmt;

use log::trace;
use parking_lot::Mutex;

use crate::attribute::EnumGuard;
use crate::matching::match_tools::MatchToolsFactory;

/// State of one query that outlives its first matching phase.
///
/// The session owns the binding source and the attribute enum guards that
/// keep enumerated attribute values stable until the docsum phase is done.
pub struct SearchSession {
    id: String,
    factory: Box<dyn MatchToolsFactory>,
    enum_guards: Mutex<Vec<EnumGuard>>,
}

impl SearchSession {
    pub fn new<S: Into<String>>(id: S, factory: Box<dyn MatchToolsFactory>) -> Self {
        SearchSession {
            id: id.into(),
            factory,
            enum_guards: Mutex::new(Vec::new()),
        }
    }

    pub fn with_enum_guards(self, guards: Vec<EnumGuard>) -> Self {
        *self.enum_guards.lock() = guards;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn match_tools_factory(&self) -> &dyn MatchToolsFactory {
        self.factory.as_ref()
    }

    pub fn num_enum_guards(&self) -> usize {
        self.enum_guards.lock().len()
    }

    /// Drop every held enum guard. Calling this again is a no-op.
    pub fn release_enum_guards(&self) {
        let released = std::mem::take(&mut *self.enum_guards.lock());
        if !released.is_empty() {
            trace!(
                "Releasing {} enum guards for session '{}'",
                released.len(),
                self.id
            );
        }
    }
}

impl fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSession")
            .field("id", &self.id)
            .field("enum_guards", &self.num_enum_guards())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::attribute::{AttributeVector, CollectionType};
    use crate::config::RankProfile;
    use crate::fef::{FeatureRegistry, RankSetup};
    use crate::matching::QueryMatchToolsFactory;
    use crate::queryeval::MatchDataLayout;

    fn factory() -> Box<dyn MatchToolsFactory> {
        let setup = RankSetup::new(RankProfile::new("default"), FeatureRegistry::new());
        Box::new(QueryMatchToolsFactory::new(None, MatchDataLayout::new(), Arc::new(setup)))
    }

    #[test]
    fn test_release_is_idempotent() {
        let attr = Arc::new(AttributeVector::new("tags.value", CollectionType::Array));
        let session = SearchSession::new("q1", factory())
            .with_enum_guards(vec![attr.acquire_enum_guard(), attr.acquire_enum_guard()]);

        assert_eq!(session.id(), "q1");
        assert_eq!(session.num_enum_guards(), 2);
        assert_eq!(attr.enum_readers(), 2);

        session.release_enum_guards();
        assert_eq!(attr.enum_readers(), 0);
        assert_eq!(session.num_enum_guards(), 0);

        session.release_enum_guards();
        assert_eq!(attr.enum_readers(), 0);
    }
}
