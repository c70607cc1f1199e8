//! Observation and action spaces

use serde::{Deserialize, Serialize};

use crate::{bound::bound_elementwise, EnvError, Result};
use ndarray::Array1;

/// Finite space of `n` values `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrete {
    /// Number of values
    pub n: usize,
}

impl Discrete {
    /// Create a new discrete space
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Check if a one-element array holds a value of this space
    #[must_use]
    pub fn contains(&self, value: &Array1<f64>) -> bool {
        match value.as_slice() {
            Some([v]) => v.fract() == 0.0 && *v >= 0.0 && (*v as usize) < self.n,
            _ => false,
        }
    }
}

/// Continuous box space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    /// Lower bounds, flattened
    pub low: Vec<f64>,
    /// Upper bounds, flattened
    pub high: Vec<f64>,
    /// Shape of values in this space
    pub shape: Vec<usize>,
}

impl BoxSpace {
    /// Create a box space; bounds must match the product of `shape`
    pub fn new(low: Vec<f64>, high: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
        let total_size: usize = shape.iter().product();
        if low.len() != total_size {
            return Err(EnvError::DimensionMismatch {
                expected: total_size,
                actual: low.len(),
            });
        }
        if high.len() != total_size {
            return Err(EnvError::DimensionMismatch {
                expected: total_size,
                actual: high.len(),
            });
        }
        Ok(Self { low, high, shape })
    }

    /// One-dimensional box from bounds
    pub fn from_bounds(low: Vec<f64>, high: Vec<f64>) -> Result<Self> {
        let shape = vec![low.len()];
        Self::new(low, high, shape)
    }

    /// Check if a flattened value lies inside the box
    #[must_use]
    pub fn contains(&self, value: &Array1<f64>) -> bool {
        value.len() == self.low.len()
            && value
                .iter()
                .zip(&self.low)
                .zip(&self.high)
                .all(|((x, l), h)| x >= l && x <= h)
    }

    /// Clamp a flattened value into the box
    pub fn clip(&self, value: &Array1<f64>) -> Result<Array1<f64>> {
        bound_elementwise(
            value,
            &Array1::from(self.low.clone()),
            &Array1::from(self.high.clone()),
        )
    }
}

/// Space descriptor held by [`crate::EnvironmentInfo`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Space {
    /// Finite space
    Discrete(Discrete),
    /// Continuous space
    Box(BoxSpace),
}

impl Space {
    /// Discrete space of `n` values
    #[must_use]
    pub fn discrete(n: usize) -> Self {
        Self::Discrete(Discrete::new(n))
    }

    /// Number of values in the space; only defined for discrete spaces
    pub fn size(&self) -> Result<usize> {
        match self {
            Self::Discrete(d) => Ok(d.n),
            Self::Box(_) => Err(EnvError::Unsupported(
                "size of a continuous space".to_string(),
            )),
        }
    }

    /// Shape of a single value
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Discrete(_) => vec![1],
            Self::Box(b) => b.shape.clone(),
        }
    }

    /// Whether the space is finite
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        matches!(self, Self::Discrete(_))
    }

    /// Check membership of a flattened value
    #[must_use]
    pub fn contains(&self, value: &Array1<f64>) -> bool {
        match self {
            Self::Discrete(d) => d.contains(value),
            Self::Box(b) => b.contains(value),
        }
    }
}

impl From<Discrete> for Space {
    fn from(space: Discrete) -> Self {
        Self::Discrete(space)
    }
}

impl From<BoxSpace> for Space {
    fn from(space: BoxSpace) -> Self {
        Self::Box(space)
    }
}
