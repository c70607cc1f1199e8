//! Bounding of state and action variables

use ndarray::{Array, Array1, Dimension, Zip};

use crate::{EnvError, Result};

/// Element-wise clamping into `[min, max]`.
///
/// Scalars and arrays share the same rule, `max(min, min(x, max))`, so a
/// `min` above `max` yields `min` and NaN inputs pass through unchanged.
pub trait Bound: Sized {
    /// Element type of the bounds
    type Scalar: Copy;

    /// Clamp every element into `[min, max]`
    #[must_use]
    fn bound(self, min: Self::Scalar, max: Self::Scalar) -> Self;
}

fn clamp_scalar<T: PartialOrd>(x: T, min: T, max: T) -> T {
    let upper = if x > max { max } else { x };
    if upper < min {
        min
    } else {
        upper
    }
}

macro_rules! impl_scalar_bound {
    ($($t:ty),*) => {
        $(
            impl Bound for $t {
                type Scalar = $t;

                fn bound(self, min: $t, max: $t) -> $t {
                    clamp_scalar(self, min, max)
                }
            }
        )*
    };
}

impl_scalar_bound!(f32, f64, i32, i64, isize);

impl<T: PartialOrd + Copy> Bound for Vec<T> {
    type Scalar = T;

    fn bound(mut self, min: T, max: T) -> Self {
        for x in &mut self {
            *x = clamp_scalar(*x, min, max);
        }
        self
    }
}

impl<T, D> Bound for Array<T, D>
where
    T: PartialOrd + Copy,
    D: Dimension,
{
    type Scalar = T;

    fn bound(mut self, min: T, max: T) -> Self {
        self.mapv_inplace(|x| clamp_scalar(x, min, max));
        self
    }
}

/// Clamp `x` into `[min_value, max_value]` element-wise
#[must_use]
pub fn bound<X: Bound>(x: X, min_value: X::Scalar, max_value: X::Scalar) -> X {
    x.bound(min_value, max_value)
}

/// Clamp `x` against per-element bounds of the same length
pub fn bound_elementwise(
    x: &Array1<f64>,
    min_value: &Array1<f64>,
    max_value: &Array1<f64>,
) -> Result<Array1<f64>> {
    for limits in [min_value, max_value] {
        if limits.len() != x.len() {
            return Err(EnvError::DimensionMismatch {
                expected: x.len(),
                actual: limits.len(),
            });
        }
    }

    Ok(Zip::from(x)
        .and(min_value)
        .and(max_value)
        .map_collect(|&v, &lo, &hi| clamp_scalar(v, lo, hi)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use proptest::prelude::*;

    #[test]
    fn test_scalar_bound() {
        assert_eq!(bound(5, 0, 3), 3);
        assert_eq!(bound(-1, 0, 3), 0);
        assert_eq!(bound(2, 0, 3), 2);
        assert_eq!(bound(0.25_f64, -1.0, 1.0), 0.25);
    }

    #[test]
    fn test_sequence_bound() {
        assert_eq!(bound(vec![5, -1, 2], 0, 3), vec![3, 0, 2]);
        assert_eq!(
            bound(arr1(&[5.0, -1.0, 2.0]), 0.0, 3.0),
            arr1(&[3.0, 0.0, 2.0])
        );
    }

    #[test]
    fn test_matrix_bound() {
        let x = arr2(&[[-2.0, 0.5], [1.5, 9.0]]);
        assert_eq!(bound(x, 0.0, 1.0), arr2(&[[0.0, 0.5], [1.0, 1.0]]));
    }

    #[test]
    fn test_inverted_bounds_prefer_min() {
        assert_eq!(bound(1.0, 2.0, 0.0), 2.0);
    }

    #[test]
    fn test_nan_passes_through() {
        assert!(bound(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn test_elementwise_bounds() {
        let x = arr1(&[-3.0, 0.0, 3.0]);
        let low = arr1(&[-1.0, 0.5, -1.0]);
        let high = arr1(&[1.0, 1.0, 2.0]);

        assert_eq!(
            bound_elementwise(&x, &low, &high).unwrap(),
            arr1(&[-1.0, 0.5, 2.0])
        );
        assert!(matches!(
            bound_elementwise(&x, &arr1(&[0.0]), &high),
            Err(EnvError::DimensionMismatch { expected: 3, actual: 1 })
        ));
    }

    proptest! {
        #[test]
        fn bounded_values_stay_in_range(
            xs in prop::collection::vec(-1e6_f64..1e6, 0..32),
            lo in -100.0_f64..0.0,
            span in 0.0_f64..100.0,
        ) {
            let hi = lo + span;
            let bounded = bound(xs.clone(), lo, hi);
            prop_assert_eq!(bounded.len(), xs.len());
            for (b, x) in bounded.iter().zip(&xs) {
                prop_assert!(*b >= lo && *b <= hi);
                if *x >= lo && *x <= hi {
                    prop_assert_eq!(b, x);
                }
            }
        }
    }
}
