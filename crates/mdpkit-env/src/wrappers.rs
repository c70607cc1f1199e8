//! Environment wrappers

use ndarray::Array1;

use mdpkit_core::{Environment, EnvironmentInfo, Result, Step, Wrapper};

/// Time limit wrapper.
///
/// Counts steps since the last reset and flags the step reaching the
/// environment's horizon with a `"truncated"` info field. Truncation never
/// marks the step absorbing.
pub struct TimeLimit<E> {
    /// Inner environment
    wrapper: Wrapper<E>,
    /// Current step count
    steps: usize,
}

impl<E: Environment> TimeLimit<E> {
    /// Create a new time limit wrapper
    pub fn new(env: E) -> Self {
        Self {
            wrapper: Wrapper::new(env),
            steps: 0,
        }
    }

    /// Steps taken in the current episode
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Whether the current episode reached the horizon
    pub fn is_truncated(&self) -> bool {
        self.steps >= self.info().horizon()
    }

    /// Inner environment
    pub fn inner(&self) -> &E {
        self.wrapper.inner()
    }

    /// Unwrap the inner environment
    pub fn into_inner(self) -> E {
        self.wrapper.into_inner()
    }
}

impl<E: Environment> Environment for TimeLimit<E> {
    fn reset(&mut self, state: Option<&Array1<f64>>) -> Result<Array1<f64>> {
        self.steps = 0;
        self.wrapper.reset(state)
    }

    fn step(&mut self, action: &Array1<f64>) -> Result<Step> {
        self.steps += 1;
        let mut step = self.wrapper.step(action)?;

        if self.is_truncated() && !step.absorbing {
            tracing::trace!(steps = self.steps, "episode truncated at horizon");
            step.info.insert("truncated", true);
        }

        Ok(step)
    }

    fn render(&mut self) -> Result<()> {
        self.wrapper.render()
    }

    fn stop(&mut self) -> Result<()> {
        self.wrapper.stop()
    }

    fn seed(&mut self, seed: u64) -> Result<()> {
        self.wrapper.seed_delegate(seed)
    }

    fn info(&self) -> &EnvironmentInfo {
        self.wrapper.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FiniteMdp;
    use ndarray::arr1;

    fn limited(horizon: usize) -> TimeLimit<FiniteMdp> {
        TimeLimit::new(FiniteMdp::simple_chain(4, &[3], 1.0, 1.0, None, 0.9, horizon).unwrap())
    }

    #[test]
    fn test_truncates_at_horizon() {
        let mut env = limited(3);
        env.reset(Some(&arr1(&[0.0]))).unwrap();

        for _ in 0..2 {
            let step = env.step(&arr1(&[1.0])).unwrap();
            assert!(step.info.get("truncated").is_none());
        }
        let step = env.step(&arr1(&[1.0])).unwrap();
        assert_eq!(step.info.get("truncated"), Some(&serde_json::Value::Bool(true)));
        assert!(!step.absorbing);
        assert!(env.is_truncated());

        env.reset(None).unwrap();
        assert_eq!(env.steps(), 0);
        assert!(!env.is_truncated());
    }

    #[test]
    fn test_seed_reaches_inner() {
        let run = |seed| {
            let mut env = TimeLimit::new(
                FiniteMdp::simple_chain(6, &[5], 0.5, 1.0, None, 0.9, 30).unwrap(),
            );
            env.seed(seed).unwrap();
            env.reset(None).unwrap();
            (0..10)
                .map(|_| env.step(&arr1(&[0.0])).unwrap().state[0])
                .collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_forwards_info() {
        let env = limited(12);
        assert_eq!(env.info().horizon(), 12);
        assert_eq!(env.inner().info().size().unwrap(), 6);
    }
}
