//! Environment trait and step types

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{EnvError, EnvironmentInfo, Result};

/// Additional information from a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Custom fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StepInfo {
    /// Insert a field, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Look up a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Whether no fields are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Result of a single environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// State reached after the action
    pub state: Array1<f64>,
    /// Reward of the transition
    pub reward: f64,
    /// Whether the reached state is absorbing. A time-limit truncation is
    /// not absorbing; the caller tracks it against the horizon.
    pub absorbing: bool,
    /// Additional info from the environment
    pub info: StepInfo,
}

impl Step {
    /// Step with empty info
    #[must_use]
    pub fn new(state: Array1<f64>, reward: f64, absorbing: bool) -> Self {
        Self {
            state,
            reward,
            absorbing,
            info: StepInfo::default(),
        }
    }

    /// Split into `(next_state, reward, absorbing, info)`
    #[must_use]
    pub fn into_parts(self) -> (Array1<f64>, f64, bool, StepInfo) {
        (self.state, self.reward, self.absorbing, self.info)
    }
}

/// Core environment trait.
///
/// Only [`Environment::info`] is required. The remaining lifecycle methods
/// default to [`EnvError::Unimplemented`], except [`Environment::stop`] which
/// defaults to a no-op.
pub trait Environment: Send {
    /// Reset the current state. With `Some(state)` the environment resumes
    /// from exactly that state; otherwise it starts a new episode.
    fn reset(&mut self, state: Option<&Array1<f64>>) -> Result<Array1<f64>> {
        let _ = state;
        Err(EnvError::Unimplemented("reset"))
    }

    /// Apply `action` from the current state
    fn step(&mut self, action: &Array1<f64>) -> Result<Step> {
        let _ = action;
        Err(EnvError::Unimplemented("step"))
    }

    /// Produce a human-readable view of the current state
    fn render(&mut self) -> Result<()> {
        Err(EnvError::Unimplemented("render"))
    }

    /// Release external resources. Calling it more than once is allowed.
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    /// Seed the random generator driving stochastic transitions
    fn seed(&mut self, seed: u64) -> Result<()> {
        let _ = seed;
        Err(EnvError::Unimplemented("seed"))
    }

    /// Metadata of this environment
    fn info(&self) -> &EnvironmentInfo;
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn reset(&mut self, state: Option<&Array1<f64>>) -> Result<Array1<f64>> {
        (**self).reset(state)
    }

    fn step(&mut self, action: &Array1<f64>) -> Result<Step> {
        (**self).step(action)
    }

    fn render(&mut self) -> Result<()> {
        (**self).render()
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }

    fn seed(&mut self, seed: u64) -> Result<()> {
        (**self).seed(seed)
    }

    fn info(&self) -> &EnvironmentInfo {
        (**self).info()
    }
}
