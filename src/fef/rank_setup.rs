//! Feature registry and per-mode program compilation.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::config::RankProfile;
use crate::error::{DocMatchError, Result};
use crate::fef::feature_executor::FeatureExecutor;
use crate::fef::rank_program::RankProgram;
use crate::queryeval::SharedMatchData;

/// Named feature executors in registration order.
#[derive(Clone, Default)]
pub struct FeatureRegistry {
    features: Vec<(String, Arc<dyn FeatureExecutor>)>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature; re-registering a name replaces it in place.
    pub fn register<S, E>(&mut self, name: S, executor: E)
    where
        S: Into<String>,
        E: FeatureExecutor + 'static,
    {
        let name = name.into();
        let executor: Arc<dyn FeatureExecutor> = Arc::new(executor);
        match self.features.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = executor,
            None => self.features.push((name, executor)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FeatureExecutor>> {
        self.features
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, executor)| executor)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A rank profile together with the features it can refer to.
#[derive(Debug, Clone)]
pub struct RankSetup {
    profile: RankProfile,
    registry: FeatureRegistry,
}

impl RankSetup {
    pub fn new(profile: RankProfile, registry: FeatureRegistry) -> Self {
        RankSetup { profile, registry }
    }

    pub fn profile(&self) -> &RankProfile {
        &self.profile
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Names computed for document summaries.
    pub fn summary_feature_names(&self) -> Vec<String> {
        dedup(self.profile.summary_features.iter().cloned())
    }

    /// Names computed for rank feature dumps: the profile's rank features,
    /// then every other registered feature unless defaults are ignored.
    pub fn dump_feature_names(&self) -> Vec<String> {
        let listed = self.profile.rank_features.iter().cloned();
        if self.profile.ignore_default_rank_features {
            dedup(listed)
        } else {
            dedup(listed.chain(self.registry.names().map(str::to_string)))
        }
    }

    pub fn create_summary_program(&self, match_data: SharedMatchData) -> Result<RankProgram> {
        self.compile(self.summary_feature_names(), match_data)
    }

    pub fn create_dump_program(&self, match_data: SharedMatchData) -> Result<RankProgram> {
        self.compile(self.dump_feature_names(), match_data)
    }

    fn compile(&self, names: Vec<String>, match_data: SharedMatchData) -> Result<RankProgram> {
        let mut features = Vec::with_capacity(names.len());
        for name in names {
            let executor = self.registry.get(&name).cloned().ok_or_else(|| {
                DocMatchError::feature(format!(
                    "rank profile '{}' refers to unknown feature '{}'",
                    self.profile.name, name
                ))
            })?;
            features.push((name, executor));
        }
        Ok(RankProgram::new(features, match_data))
    }
}

fn dedup<I: Iterator<Item = String>>(names: I) -> Vec<String> {
    let mut seen = HashSet::new();
    names.filter(|name| seen.insert(name.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fef::feature_executor::ConstantFeature;
    use crate::fef::rank_program::FeatureResolver;
    use crate::queryeval::MatchData;

    fn registry() -> FeatureRegistry {
        let mut registry = FeatureRegistry::new();
        registry.register("value(a)", ConstantFeature::number(1.0));
        registry.register("value(b)", ConstantFeature::number(2.0));
        registry.register("value(c)", ConstantFeature::number(3.0));
        registry
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = registry();
        registry.register("value(a)", ConstantFeature::number(10.0));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names().next(), Some("value(a)"));
        let md = MatchData::default();
        assert_eq!(registry.get("value(a)").unwrap().number(0, &md), 10.0);
    }

    #[test]
    fn test_summary_program() {
        let profile = RankProfile::new("p").with_summary_features(["value(c)", "value(a)", "value(c)"]);
        let setup = RankSetup::new(profile, registry());

        let program = setup
            .create_summary_program(MatchData::default().into_shared())
            .unwrap();
        assert_eq!(program.num_features(), 2);
        assert_eq!(program.name_of(0), "value(c)");
        assert_eq!(program.name_of(1), "value(a)");
    }

    #[test]
    fn test_dump_program_includes_defaults() {
        let profile = RankProfile::new("p").with_rank_features(["value(b)"]);
        let setup = RankSetup::new(profile, registry());
        assert_eq!(
            setup.dump_feature_names(),
            vec!["value(b)", "value(a)", "value(c)"]
        );

        let profile = RankProfile::new("p")
            .with_rank_features(["value(b)"])
            .ignore_default_rank_features(true);
        let setup = RankSetup::new(profile, registry());
        assert_eq!(setup.dump_feature_names(), vec!["value(b)"]);
    }

    #[test]
    fn test_unknown_feature() {
        let profile = RankProfile::new("p").with_summary_features(["fieldMatch(title)"]);
        let setup = RankSetup::new(profile, registry());

        let err = setup
            .create_summary_program(MatchData::default().into_shared())
            .unwrap_err();
        assert!(matches!(err, DocMatchError::Feature(_)));
    }
}
