//! Environment metadata

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{EnvError, Result, Space};

/// Static description of an environment: its spaces, discount factor and
/// horizon.
///
/// Built once per environment and owned by it. The spaces serialize as nested
/// objects, `gamma` and `horizon` as plain values, so the whole record can be
/// persisted with [`EnvironmentInfo::save`] and restored with
/// [`EnvironmentInfo::load`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    observation_space: Space,
    action_space: Space,
    gamma: f64,
    horizon: usize,
}

impl EnvironmentInfo {
    /// Create environment info.
    ///
    /// Fails with [`EnvError::InvalidInfo`] unless `0 < gamma <= 1` and
    /// `horizon > 0`.
    pub fn new(
        observation_space: impl Into<Space>,
        action_space: impl Into<Space>,
        gamma: f64,
        horizon: usize,
    ) -> Result<Self> {
        let info = Self {
            observation_space: observation_space.into(),
            action_space: action_space.into(),
            gamma,
            horizon,
        };
        info.validate()?;
        Ok(info)
    }

    fn validate(&self) -> Result<()> {
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(EnvError::InvalidInfo(format!(
                "gamma must lie in (0, 1], got {}",
                self.gamma
            )));
        }
        if self.horizon == 0 {
            return Err(EnvError::InvalidInfo(
                "horizon must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Observation space
    #[must_use]
    pub fn observation_space(&self) -> &Space {
        &self.observation_space
    }

    /// Action space
    #[must_use]
    pub fn action_space(&self) -> &Space {
        &self.action_space
    }

    /// Discount factor
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Maximum number of steps in an episode
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of discrete states plus number of discrete actions.
    ///
    /// Fails with [`EnvError::Unsupported`] when either space is continuous.
    pub fn size(&self) -> Result<usize> {
        Ok(self.observation_space.size()? + self.action_space.size()?)
    }

    /// Observation shape followed by action shape
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = self.observation_space.shape();
        shape.extend(self.action_space.shape());
        shape
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from a JSON string, re-applying validation
    pub fn from_json(json: &str) -> Result<Self> {
        let info: Self = serde_json::from_str(json)?;
        info.validate()?;
        Ok(info)
    }

    /// Write to `path` as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), "saved environment info");
        Ok(())
    }

    /// Read from a JSON file written by [`EnvironmentInfo::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxSpace;

    fn continuous(dim: usize) -> BoxSpace {
        BoxSpace::from_bounds(vec![-1.0; dim], vec![1.0; dim]).unwrap()
    }

    #[test]
    fn test_discrete_size() {
        let info = EnvironmentInfo::new(Space::discrete(4), Space::discrete(2), 0.99, 100).unwrap();
        assert_eq!(info.size().unwrap(), 6);
        assert_eq!(info.shape(), vec![1, 1]);
    }

    #[test]
    fn test_mixed_shape() {
        let info = EnvironmentInfo::new(continuous(3), Space::discrete(2), 0.9, 10).unwrap();
        assert_eq!(info.shape(), vec![3, 1]);
        assert!(matches!(info.size(), Err(EnvError::Unsupported(_))));
    }

    #[test]
    fn test_accessors() {
        let info = EnvironmentInfo::new(continuous(2), continuous(1), 1.0, 500).unwrap();
        assert_eq!(info.gamma(), 1.0);
        assert_eq!(info.horizon(), 500);
        assert!(!info.observation_space().is_discrete());
        assert_eq!(info.action_space().shape(), vec![1]);
    }

    #[test]
    fn test_validation() {
        for gamma in [0.0, -0.5, 1.01, f64::NAN] {
            let result = EnvironmentInfo::new(Space::discrete(2), Space::discrete(2), gamma, 10);
            assert!(matches!(result, Err(EnvError::InvalidInfo(_))), "gamma {gamma}");
        }
        let result = EnvironmentInfo::new(Space::discrete(2), Space::discrete(2), 0.5, 0);
        assert!(matches!(result, Err(EnvError::InvalidInfo(_))));
    }

    #[test]
    fn test_json_rejects_invalid_gamma() {
        let info = EnvironmentInfo::new(Space::discrete(2), Space::discrete(2), 0.5, 10).unwrap();
        let json = info.to_json().unwrap().replace("0.5", "1.5");
        assert!(matches!(
            EnvironmentInfo::from_json(&json),
            Err(EnvError::InvalidInfo(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info.json");
        let info = EnvironmentInfo::new(continuous(3), Space::discrete(5), 0.95, 250).unwrap();

        info.save(&path).unwrap();
        let restored = EnvironmentInfo::load(&path).unwrap();

        assert_eq!(restored, info);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EnvironmentInfo::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(EnvError::Io(_))));
    }
}
