//! Classic control environments

use ndarray::{arr1, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use mdpkit_core::{
    bound, BoxSpace, EnvError, Environment, EnvironmentInfo, Result, Space, Step,
};

use crate::registry::Registrable;
use crate::EnvArgs;

/// Mountain Car environment
pub struct MountainCar {
    /// Current state
    state: MountainCarState,
    /// Configuration
    config: MountainCarConfig,
    info: EnvironmentInfo,
    rng: StdRng,
}

#[derive(Debug, Clone, Copy)]
struct MountainCarState {
    position: f64,
    velocity: f64,
}

/// Physical constants and episode settings, read from keyword arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MountainCarConfig {
    /// Left wall
    pub min_position: f64,
    /// Right edge
    pub max_position: f64,
    /// Speed limit in both directions
    pub max_speed: f64,
    /// Position at which the car has escaped the valley
    pub goal_position: f64,
    /// Minimum velocity at the goal
    pub goal_velocity: f64,
    /// Engine force
    pub force: f64,
    /// Gravity along the slope
    pub gravity: f64,
    /// Discount factor
    pub gamma: f64,
    /// Maximum episode steps
    pub horizon: usize,
}

impl Default for MountainCarConfig {
    fn default() -> Self {
        Self {
            min_position: -1.2,
            max_position: 0.6,
            max_speed: 0.07,
            goal_position: 0.5,
            goal_velocity: 0.0,
            force: 0.001,
            gravity: 0.0025,
            gamma: 0.99,
            horizon: 200,
        }
    }
}

impl MountainCar {
    /// Create a new Mountain Car environment
    pub fn new(config: MountainCarConfig) -> Result<Self> {
        let observation_space = BoxSpace::from_bounds(
            vec![config.min_position, -config.max_speed],
            vec![config.max_position, config.max_speed],
        )?;
        let info = EnvironmentInfo::new(
            observation_space,
            Space::discrete(3), // 0: push left, 1: no push, 2: push right
            config.gamma,
            config.horizon,
        )?;

        Ok(Self {
            state: MountainCarState {
                position: -0.5,
                velocity: 0.0,
            },
            config,
            info,
            rng: StdRng::from_entropy(),
        })
    }

    fn observation(&self) -> Array1<f64> {
        arr1(&[self.state.position, self.state.velocity])
    }

    fn clip_state(&self, position: f64, velocity: f64) -> MountainCarState {
        MountainCarState {
            position: bound(position, self.config.min_position, self.config.max_position),
            velocity: bound(velocity, -self.config.max_speed, self.config.max_speed),
        }
    }
}

impl Environment for MountainCar {
    /// A given state is resumed exactly; it must lie inside the observation
    /// space.
    fn reset(&mut self, state: Option<&Array1<f64>>) -> Result<Array1<f64>> {
        self.state = match state {
            Some(state) => match state.as_slice() {
                Some(&[position, velocity]) => {
                    if !self.info.observation_space().contains(state) {
                        return Err(EnvError::InvalidState(format!(
                            "{state} outside the observation space"
                        )));
                    }
                    MountainCarState { position, velocity }
                }
                _ => {
                    return Err(EnvError::DimensionMismatch {
                        expected: 2,
                        actual: state.len(),
                    })
                }
            },
            None => MountainCarState {
                position: self.rng.gen_range(-0.6..-0.4),
                velocity: 0.0,
            },
        };

        Ok(self.observation())
    }

    fn step(&mut self, action: &Array1<f64>) -> Result<Step> {
        // Convert action to force
        let force = match action.as_slice() {
            Some(&[a]) if a == 0.0 => -1.0,
            Some(&[a]) if a == 1.0 => 0.0,
            Some(&[a]) if a == 2.0 => 1.0,
            _ => return Err(EnvError::InvalidAction(format!("Invalid action: {action}"))),
        };

        let velocity = self.state.velocity + force * self.config.force
            - self.config.gravity * (3.0 * self.state.position).cos();
        let velocity = bound(velocity, -self.config.max_speed, self.config.max_speed);
        self.state = self.clip_state(self.state.position + velocity, velocity);

        // Stop at the left wall
        if self.state.position <= self.config.min_position && self.state.velocity < 0.0 {
            self.state.velocity = 0.0;
        }

        let absorbing = self.state.position >= self.config.goal_position
            && self.state.velocity >= self.config.goal_velocity;
        let reward = if absorbing { 0.0 } else { -1.0 };

        Ok(Step::new(self.observation(), reward, absorbing))
    }

    fn render(&mut self) -> Result<()> {
        const WIDTH: usize = 40;
        let span = self.config.max_position - self.config.min_position;
        let frac = (self.state.position - self.config.min_position) / span;
        let col = bound((frac * WIDTH as f64).round() as isize, 0, WIDTH as isize) as usize;

        let track: String = (0..=WIDTH).map(|i| if i == col { 'o' } else { '_' }).collect();
        println!(
            "{track}  x={:+.3} v={:+.4}",
            self.state.position, self.state.velocity
        );
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

impl Registrable for MountainCar {
    fn create(args: &EnvArgs) -> Result<Self> {
        if !args.positional.is_empty() {
            return Err(EnvError::InvalidArgument(format!(
                "MountainCar takes keyword arguments only, got {} positional",
                args.positional.len()
            )));
        }
        Self::new(args.params_as()?)
    }
}
