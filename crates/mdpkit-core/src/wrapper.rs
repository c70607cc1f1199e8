//! Delegate base for environments wrapping another environment

use ndarray::Array1;

use crate::{Environment, EnvironmentInfo, Result, Step};

/// Owns an inner environment and forwards the lifecycle to it.
///
/// Environments built around a delegate embed a `Wrapper` and reuse
/// [`Wrapper::seed_delegate`] for seeding instead of implementing their own.
#[derive(Debug, Clone)]
pub struct Wrapper<E> {
    env: E,
}

impl<E: Environment> Wrapper<E> {
    /// Wrap an environment
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// Inner environment
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Mutable inner environment
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Unwrap the inner environment
    pub fn into_inner(self) -> E {
        self.env
    }

    /// Forward a seed to the delegate
    pub fn seed_delegate(&mut self, seed: u64) -> Result<()> {
        tracing::debug!(seed, "forwarding seed to delegate environment");
        self.env.seed(seed)
    }
}

impl<E: Environment> Environment for Wrapper<E> {
    fn reset(&mut self, state: Option<&Array1<f64>>) -> Result<Array1<f64>> {
        self.env.reset(state)
    }

    fn step(&mut self, action: &Array1<f64>) -> Result<Step> {
        self.env.step(action)
    }

    fn render(&mut self) -> Result<()> {
        self.env.render()
    }

    fn stop(&mut self) -> Result<()> {
        self.env.stop()
    }

    fn seed(&mut self, seed: u64) -> Result<()> {
        self.seed_delegate(seed)
    }

    fn info(&self) -> &EnvironmentInfo {
        self.env.info()
    }
}
