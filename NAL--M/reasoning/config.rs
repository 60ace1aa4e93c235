use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::NalError;

/// Tunable parameters of the inference core.
///
/// Loaded from TOML; every field falls back to the reference value when
/// omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    /// Evidential horizon `k` of the evidence-to-confidence mapping.
    pub horizon: f32,
    /// Number of cycles treated as "the same moment" by temporal rules.
    pub duration: i64,
    /// Number of peer-term keys a task remembers to avoid re-pairing.
    pub novelty_capacity: usize,
    /// Beliefs kept per concept.
    pub belief_capacity: usize,
    /// Goals kept per concept.
    pub goal_capacity: usize,
    /// Maximum number of serials in a merged evidential base.
    pub max_evidential_base: usize,
    /// Budget summary a derived task must reach to be kept.
    pub budget_threshold: f32,
    /// Confidence discount of single-premise structural inference.
    pub reliance: f32,
    /// Additive term in the temporal projection denominator; larger values
    /// project more leniently.
    pub projection_decay: f32,
    /// Largest occurrence-time distance across which two events revise.
    pub revision_max_distance: i64,
    /// Records kept by the in-memory trace sink.
    pub trace_capacity: usize,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            horizon: 1.0,
            duration: 5,
            novelty_capacity: 10,
            belief_capacity: 7,
            goal_capacity: 7,
            max_evidential_base: 20_000,
            budget_threshold: 0.01,
            reliance: 0.9,
            projection_decay: 1.0,
            revision_max_distance: 10,
            trace_capacity: 512,
        }
    }
}

impl ReasonerConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading reasoner config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its admissible range.
    pub fn validate(&self) -> Result<(), NalError> {
        if self.horizon <= 0.0 {
            return Err(NalError::Config("horizon must be positive".into()));
        }
        if self.duration < 0 {
            return Err(NalError::Config("duration must not be negative".into()));
        }
        if self.novelty_capacity == 0 {
            return Err(NalError::Config("novelty_capacity must be positive".into()));
        }
        if self.belief_capacity == 0 || self.goal_capacity == 0 {
            return Err(NalError::Config("table capacities must be positive".into()));
        }
        if self.max_evidential_base < 2 {
            return Err(NalError::Config(
                "max_evidential_base must hold at least two serials".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.budget_threshold) {
            return Err(NalError::Config("budget_threshold must lie in [0, 1)".into()));
        }
        if !(self.reliance > 0.0 && self.reliance < 1.0) {
            return Err(NalError::Config("reliance must lie in (0, 1)".into()));
        }
        if self.projection_decay <= 0.0 {
            return Err(NalError::Config("projection_decay must be positive".into()));
        }
        if self.revision_max_distance < 0 {
            return Err(NalError::Config(
                "revision_max_distance must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ReasonerConfig::from_toml("belief_capacity = 3\nreliance = 0.8\n").unwrap();
        assert_eq!(config.belief_capacity, 3);
        assert!((config.reliance - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.novelty_capacity, ReasonerConfig::default().novelty_capacity);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = ReasonerConfig::from_toml("reliance = 1.5").unwrap_err();
        assert!(err.to_string().contains("reliance"));
        assert!(ReasonerConfig::from_toml("novelty_capacity = 0").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reasoner.toml");
        fs::write(&path, "revision_max_distance = 4\n").unwrap();
        let config = ReasonerConfig::load(&path).unwrap();
        assert_eq!(config.revision_max_distance, 4);
        assert!(ReasonerConfig::load(dir.path().join("missing.toml")).is_err());
    }
}
