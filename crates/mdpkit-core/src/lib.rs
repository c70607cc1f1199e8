//! Core environment traits and types for mdpkit
//!
//! This crate provides the environment lifecycle trait, the metadata record
//! every environment carries, observation/action spaces and the bounding
//! helper used to keep continuous variables in range.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bound;
pub mod environment;
pub mod error;
pub mod info;
pub mod space;
pub mod wrapper;

// Re-export core traits and types
pub use bound::{bound, bound_elementwise, Bound};
pub use environment::{Environment, Step, StepInfo};
pub use error::{EnvError, Result};
pub use info::EnvironmentInfo;
pub use space::{BoxSpace, Discrete, Space};
pub use wrapper::Wrapper;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        bound, Environment, EnvironmentInfo, EnvError, Result, Space, Step, StepInfo,
    };
}
