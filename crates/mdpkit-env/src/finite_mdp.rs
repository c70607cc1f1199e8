//! Tabular environments

use ndarray::{arr1, Array1, Array3, Axis};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mdpkit_core::{EnvError, Environment, EnvironmentInfo, Result, Space, Step};

use crate::registry::{Generator, Registrable};
use crate::EnvArgs;

const DEFAULT_GAMMA: f64 = 0.9;
const DEFAULT_HORIZON: usize = 100;
const PROB_TOLERANCE: f64 = 1e-6;

/// Finite MDP described by transition and reward tensors indexed
/// `[state, action, next_state]`.
///
/// A state whose transition rows are all zero is absorbing.
pub struct FiniteMdp {
    p: Array3<f64>,
    r: Array3<f64>,
    mu: Option<Array1<f64>>,
    info: EnvironmentInfo,
    state: Option<usize>,
    rng: StdRng,
}

impl FiniteMdp {
    /// Create a finite MDP.
    ///
    /// `mu` is the initial state distribution; without it episodes start in
    /// a uniformly drawn state. Every transition row of a non-absorbing state,
    /// and `mu`, must be a probability distribution.
    pub fn new(
        p: Array3<f64>,
        r: Array3<f64>,
        mu: Option<Array1<f64>>,
        gamma: f64,
        horizon: usize,
    ) -> Result<Self> {
        let (n_states, n_actions, n_next) = p.dim();
        if n_states == 0 || n_actions == 0 {
            return Err(EnvError::InvalidArgument(format!(
                "finite MDP needs at least one state and one action, got {n_states} and {n_actions}"
            )));
        }
        if n_next != n_states {
            return Err(EnvError::DimensionMismatch {
                expected: n_states,
                actual: n_next,
            });
        }
        if r.dim() != p.dim() {
            return Err(EnvError::InvalidArgument(format!(
                "reward tensor shape {:?} does not match transitions {:?}",
                r.shape(),
                p.shape()
            )));
        }
        if let Some(mu) = &mu {
            if mu.len() != n_states {
                return Err(EnvError::DimensionMismatch {
                    expected: n_states,
                    actual: mu.len(),
                });
            }
            check_distribution(mu.iter().copied(), "mu")?;
        }
        for (s, transitions) in p.outer_iter().enumerate() {
            if transitions.iter().all(|&x| x == 0.0) {
                continue;
            }
            for (a, row) in transitions.outer_iter().enumerate() {
                check_distribution(row.iter().copied(), &format!("p[{s}, {a}, ..]"))?;
            }
        }

        let info = EnvironmentInfo::new(
            Space::discrete(n_states),
            Space::discrete(n_actions),
            gamma,
            horizon,
        )?;

        Ok(Self {
            p,
            r,
            mu,
            info,
            state: None,
            rng: StdRng::from_entropy(),
        })
    }

    /// Chain of `n_states` states with two actions. Action 0 moves right and
    /// action 1 moves left, each succeeding with probability `prob` and
    /// otherwise staying put. Entering a goal state pays `reward`.
    pub fn simple_chain(
        n_states: usize,
        goal_states: &[usize],
        prob: f64,
        reward: f64,
        mu: Option<Array1<f64>>,
        gamma: f64,
        horizon: usize,
    ) -> Result<Self> {
        if n_states == 0 {
            return Err(EnvError::InvalidArgument("chain needs at least one state".to_string()));
        }
        if !(0.0..=1.0).contains(&prob) {
            return Err(EnvError::InvalidArgument(format!(
                "prob must lie in [0, 1], got {prob}"
            )));
        }
        if let Some(&g) = goal_states.iter().find(|&&g| g >= n_states) {
            return Err(EnvError::InvalidArgument(format!(
                "goal state {g} outside a chain of {n_states} states"
            )));
        }

        let last = n_states - 1;
        let mut p = Array3::zeros((n_states, 2, n_states));
        for s in 0..n_states {
            if s == last {
                p[[s, 0, s]] = 1.0;
            } else {
                p[[s, 0, s]] = 1.0 - prob;
                p[[s, 0, s + 1]] = prob;
            }
            if s == 0 {
                p[[s, 1, s]] = 1.0;
            } else {
                p[[s, 1, s]] = 1.0 - prob;
                p[[s, 1, s - 1]] = prob;
            }
        }

        let mut r = Array3::zeros((n_states, 2, n_states));
        for &g in goal_states {
            if g != 0 {
                r[[g - 1, 0, g]] = reward;
            }
            if g != last {
                r[[g + 1, 1, g]] = reward;
            }
        }

        Self::new(p, r, mu, gamma, horizon)
    }

    fn generate_simple_chain(args: &EnvArgs) -> Result<Self> {
        let n_states: usize = args.require(0, "state_n")?;
        let goal_states: Vec<usize> = args.require(1, "goal_states")?;
        let prob: f64 = args.require(2, "prob")?;
        let reward: f64 = args.require(3, "rew")?;
        let mu: Option<Vec<f64>> = args.lookup(4, "mu")?;
        let gamma = args.lookup_or(5, "gamma", DEFAULT_GAMMA)?;
        let horizon = args.lookup_or(6, "horizon", DEFAULT_HORIZON)?;

        Self::simple_chain(
            n_states,
            &goal_states,
            prob,
            reward,
            mu.map(Array1::from),
            gamma,
            horizon,
        )
    }

    /// Current state index, if an episode is running
    #[must_use]
    pub fn current_state(&self) -> Option<usize> {
        self.state
    }

    fn n_states(&self) -> usize {
        self.p.dim().0
    }

    fn is_absorbing(&self, state: usize) -> bool {
        self.p.index_axis(Axis(0), state).iter().all(|&x| x == 0.0)
    }

    fn index_of(value: &Array1<f64>, n: usize, what: &str) -> Result<usize> {
        match value.as_slice() {
            Some([v]) if v.fract() == 0.0 && *v >= 0.0 && (*v as usize) < n => Ok(*v as usize),
            _ => Err(EnvError::InvalidArgument(format!(
                "{what} {value} is not an index below {n}"
            ))),
        }
    }

    fn sample(rng: &mut StdRng, weights: impl IntoIterator<Item = f64>) -> Result<usize> {
        let dist = WeightedIndex::<f64>::new(weights)
            .map_err(|e| EnvError::InvalidState(format!("cannot sample distribution: {e}")))?;
        Ok(dist.sample(rng))
    }
}

fn check_distribution(weights: impl IntoIterator<Item = f64>, what: &str) -> Result<()> {
    let mut total = 0.0;
    for w in weights {
        if w.is_nan() || w < 0.0 {
            return Err(EnvError::InvalidArgument(format!(
                "{what} has a negative or NaN probability {w}"
            )));
        }
        total += w;
    }
    if (total - 1.0).abs() > PROB_TOLERANCE {
        return Err(EnvError::InvalidArgument(format!(
            "{what} sums to {total}, not 1"
        )));
    }
    Ok(())
}

fn to_array3(nested: Vec<Vec<Vec<f64>>>, what: &str) -> Result<Array3<f64>> {
    let dim0 = nested.len();
    let dim1 = nested.first().map_or(0, Vec::len);
    let dim2 = nested.first().and_then(|a| a.first()).map_or(0, Vec::len);

    let regular = nested
        .iter()
        .all(|plane| plane.len() == dim1 && plane.iter().all(|row| row.len() == dim2));
    if !regular {
        return Err(EnvError::InvalidArgument(format!(
            "{what} is not a regular 3-d tensor"
        )));
    }

    let flat: Vec<f64> = nested.into_iter().flatten().flatten().collect();
    Array3::from_shape_vec((dim0, dim1, dim2), flat)
        .map_err(|e| EnvError::InvalidArgument(format!("{what} is not a regular 3-d tensor: {e}")))
}

impl Environment for FiniteMdp {
    fn reset(&mut self, state: Option<&Array1<f64>>) -> Result<Array1<f64>> {
        let n_states = self.n_states();
        let s = match (state, &self.mu) {
            (Some(state), _) => Self::index_of(state, n_states, "state")?,
            (None, Some(mu)) => Self::sample(&mut self.rng, mu.iter().copied())?,
            (None, None) => self.rng.gen_range(0..n_states),
        };
        self.state = Some(s);
        Ok(arr1(&[s as f64]))
    }

    fn step(&mut self, action: &Array1<f64>) -> Result<Step> {
        let s = self
            .state
            .ok_or_else(|| EnvError::InvalidState("step called before reset".to_string()))?;
        let a = Self::index_of(action, self.p.dim().1, "action")
            .map_err(|e| EnvError::InvalidAction(e.to_string()))?;

        let row = self.p.slice(ndarray::s![s, a, ..]);
        let next = Self::sample(&mut self.rng, row.iter().copied())?;
        let reward = self.r[[s, a, next]];
        let absorbing = self.is_absorbing(next);

        self.state = Some(next);
        Ok(Step::new(arr1(&[next as f64]), reward, absorbing))
    }

    fn render(&mut self) -> Result<()> {
        let line: String = (0..self.n_states())
            .map(|s| if Some(s) == self.state { 'X' } else { '.' })
            .collect();
        println!("[{line}]");
        Ok(())
    }

    fn seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn info(&self) -> &EnvironmentInfo {
        &self.info
    }
}

impl Registrable for FiniteMdp {
    fn create(args: &EnvArgs) -> Result<Self> {
        let p = to_array3(args.require(0, "p")?, "p")?;
        let r = to_array3(args.require(1, "r")?, "r")?;
        let mu: Option<Vec<f64>> = args.lookup(2, "mu")?;
        let gamma = args.lookup_or(3, "gamma", DEFAULT_GAMMA)?;
        let horizon = args.lookup_or(4, "horizon", DEFAULT_HORIZON)?;

        Self::new(p, r, mu.map(Array1::from), gamma, horizon)
    }

    fn generator() -> Option<Generator<Self>> {
        Some(Self::generate_simple_chain)
    }
}
