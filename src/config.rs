//! Configuration for feature programs and task executors.

use serde::{Deserialize, Serialize};

use crate::error::{DocMatchError, Result};

/// Selects which features each extraction mode computes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankProfile {
    /// Profile name, used in diagnostics.
    pub name: String,

    /// Features returned with document summaries.
    pub summary_features: Vec<String>,

    /// Features listed first in rank feature dumps.
    pub rank_features: Vec<String>,

    /// When false, dumps also include every registered feature.
    pub ignore_default_rank_features: bool,
}

impl RankProfile {
    pub fn new<S: Into<String>>(name: S) -> Self {
        RankProfile {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_summary_features<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.summary_features = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rank_features<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rank_features = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignore_default_rank_features(mut self, ignore: bool) -> Self {
        self.ignore_default_rank_features = ignore;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for the sequenced task executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Number of shards (one worker thread each).
    pub num_executors: usize,

    /// Prefix for worker thread names.
    pub thread_name_prefix: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig {
            num_executors: num_cpus::get(),
            thread_name_prefix: "sequenced-executor".to_string(),
        }
    }
}

impl ExecutorConfig {
    pub fn with_num_executors(mut self, num_executors: usize) -> Self {
        self.num_executors = num_executors;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_executors == 0 {
            return Err(DocMatchError::invalid_config("num_executors must be > 0"));
        }
        if self.num_executors > u32::MAX as usize {
            return Err(DocMatchError::invalid_config(format!(
                "num_executors {} exceeds {}",
                self.num_executors,
                u32::MAX
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: ExecutorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_profile_from_json() {
        let profile = RankProfile::from_json(
            r#"{
                "name": "default",
                "summary_features": ["attribute(price)", "matches(title)"],
                "ignore_default_rank_features": true
            }"#,
        )
        .unwrap();

        assert_eq!(profile.name, "default");
        assert_eq!(profile.summary_features.len(), 2);
        assert!(profile.rank_features.is_empty());
        assert!(profile.ignore_default_rank_features);
    }

    #[test]
    fn test_executor_config_defaults() {
        let config = ExecutorConfig::default();
        assert!(config.num_executors >= 1);
        assert!(config.validate().is_ok());

        let config = ExecutorConfig::from_json(r#"{"num_executors": 4}"#).unwrap();
        assert_eq!(config.num_executors, 4);
        assert_eq!(config.thread_name_prefix, "sequenced-executor");
    }

    #[test]
    fn test_executor_config_validation() {
        assert!(ExecutorConfig::default().with_num_executors(0).validate().is_err());
        assert!(ExecutorConfig::from_json(r#"{"num_executors": 0}"#).is_err());
        assert!(ExecutorConfig::from_json("not json").is_err());
    }
}
