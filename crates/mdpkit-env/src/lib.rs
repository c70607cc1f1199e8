//! Environment registry and bundled environments for mdpkit
//!
//! This crate provides:
//! - A registry creating environments by name, through their constructor or
//!   a simplified `generate` factory
//! - Tabular environments (finite MDPs, simple chains)
//! - Classic control environments
//! - Wrappers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod classic;
pub mod finite_mdp;
pub mod registry;
pub mod wrappers;

// Re-export environments
pub use args::EnvArgs;
pub use classic::{MountainCar, MountainCarConfig};
pub use finite_mdp::FiniteMdp;
pub use registry::{EnvConstructor, EnvRegistry, Generator, Registrable};
pub use wrappers::TimeLimit;

// Re-export core types
pub use mdpkit_core::{
    bound, EnvError, Environment, EnvironmentInfo, Result, Space, Step, StepInfo, Wrapper,
};

/// Registry holding every environment bundled with this crate
#[must_use]
pub fn default_registry() -> EnvRegistry {
    let mut registry = EnvRegistry::new();
    registry.register::<FiniteMdp>();
    registry.register::<MountainCar>();
    registry
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{default_registry, EnvArgs, EnvRegistry, FiniteMdp, MountainCar, TimeLimit};
    pub use mdpkit_core::prelude::*;
}
