use crate::error::{GeometryError, Result};
use crate::math::TOLERANCE;

use super::{CurveAdaptor, DiscretizationParams};

/// Iteration cap when placing a single sample.
const MAX_ITERATIONS: usize = 64;

/// Samples a curve at parameters spaced uniformly by arc length.
///
/// The curve of length `L` is split into `n = max(1, ceil(L / step))` equal
/// arcs, so the actual spacing is `L / n` (never more than `step`). The
/// result holds `n + 1` increasing local parameters, starting at 0 and
/// ending exactly at the end of the adaptor range. A step larger than the
/// curve yields just the two end points.
#[derive(Debug, Clone, Copy)]
pub struct UniformAbscissa {
    params: DiscretizationParams,
}

impl UniformAbscissa {
    /// Creates a sampler with the given step and default limits.
    #[must_use]
    pub fn new(step: f64) -> Self {
        Self::with_params(DiscretizationParams::with_step(step))
    }

    #[must_use]
    pub fn with_params(params: DiscretizationParams) -> Self {
        Self { params }
    }

    /// Computes the sample parameters on `adaptor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is not finite and positive, the curve is
    /// shorter than the tolerance, the sample count would exceed
    /// `max_points_per_edge`, or the curve cannot be evaluated.
    pub fn execute(&self, adaptor: &CurveAdaptor<'_>) -> Result<Vec<f64>> {
        let step = self.params.step;
        if !step.is_finite() || step <= 0.0 {
            return Err(GeometryError::Degenerate(format!("invalid sampling step {step}")).into());
        }

        let length = adaptor.length()?;
        if !length.is_finite() || length <= self.params.tolerance {
            return Err(GeometryError::Degenerate(format!("curve length {length} is below tolerance")).into());
        }

        // Guard against L / step landing a hair above an integer.
        let intervals = (length / step - 1e-9).ceil().max(1.0);
        #[allow(clippy::cast_precision_loss)]
        let limit = self.params.max_points_per_edge as f64;
        if intervals + 1.0 > limit {
            return Err(GeometryError::Degenerate(format!(
                "{} samples needed, limit is {}",
                intervals + 1.0,
                self.params.max_points_per_edge
            ))
            .into());
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let intervals = intervals as usize;
        #[allow(clippy::cast_precision_loss)]
        let spacing = length / intervals as f64;

        let mut params = Vec::with_capacity(intervals + 1);
        params.push(0.0);
        let mut s = 0.0;
        for _ in 1..intervals {
            s = self.advance(adaptor, s, spacing)?;
            params.push(s);
        }
        params.push(adaptor.span());
        Ok(params)
    }

    /// Finds `s` with `length(s0, s) == distance`, by Newton steps kept
    /// inside a shrinking bracket.
    fn advance(&self, adaptor: &CurveAdaptor<'_>, s0: f64, distance: f64) -> Result<f64> {
        let mut lo = s0;
        let mut hi = adaptor.span();

        let speed = adaptor.d1(s0)?.norm();
        let mut s = if speed > TOLERANCE {
            (s0 + distance / speed).clamp(lo, hi)
        } else {
            0.5 * (lo + hi)
        };

        for _ in 0..MAX_ITERATIONS {
            let residual = adaptor.length_between(s0, s)? - distance;
            if residual.abs() <= self.params.tolerance {
                break;
            }
            if residual > 0.0 {
                hi = s;
            } else {
                lo = s;
            }
            let speed = adaptor.d1(s)?.norm();
            let next = s - residual / speed.max(TOLERANCE);
            s = if next > lo && next < hi { next } else { 0.5 * (lo + hi) };
        }
        Ok(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::{BSplineCurve, Circle, Line};
    use crate::math::{Point3, Vector3};
    use approx::assert_relative_eq;

    #[test]
    fn half_side_step_gives_three_parameters() {
        let line = Line::new(Point3::origin(), Vector3::x()).unwrap();
        let adaptor = CurveAdaptor::new(&line, 0.0, 1.0);
        let params = UniformAbscissa::new(0.5).execute(&adaptor).unwrap();
        assert_eq!(params.len(), 3);
        assert_relative_eq!(params[1], 0.5, epsilon = 1e-9);
        assert_relative_eq!(params[2], 1.0);
    }

    #[test]
    fn step_is_shortened_to_divide_length_evenly() {
        let line = Line::new(Point3::origin(), Vector3::x()).unwrap();
        let adaptor = CurveAdaptor::new(&line, 0.0, 1.0);
        let params = UniformAbscissa::new(0.3).execute(&adaptor).unwrap();
        assert_eq!(params.len(), 5);
        for pair in params.windows(2) {
            assert_relative_eq!(pair[1] - pair[0], 0.25, epsilon = 1e-9);
        }
    }

    #[test]
    fn step_longer_than_curve_gives_end_points() {
        let line = Line::new(Point3::origin(), Vector3::y()).unwrap();
        let adaptor = CurveAdaptor::new(&line, 2.0, 0.0);
        let params = UniformAbscissa::new(10.0).execute(&adaptor).unwrap();
        assert_eq!(params, vec![0.0, 2.0]);
    }

    #[test]
    fn samples_are_equidistant_along_a_non_uniform_spline() {
        let curve = BSplineCurve::from_multiplicities(
            2,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.2, 2.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
            ],
            &[3, 3],
            &[0.0, 1.0],
            None,
        )
        .unwrap();
        let adaptor = CurveAdaptor::new(&curve, 0.0, 1.0);
        let total = adaptor.length().unwrap();
        let params = UniformAbscissa::new(total / 8.0).execute(&adaptor).unwrap();
        assert_eq!(params.len(), 9);
        for pair in params.windows(2) {
            let arc = adaptor.length_between(pair[0], pair[1]).unwrap();
            assert_relative_eq!(arc, total / 8.0, epsilon = 1e-7);
        }
    }

    #[test]
    fn circle_quarter_arcs() {
        let circle = Circle::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x()).unwrap();
        let adaptor = CurveAdaptor::new(&circle, 0.0, std::f64::consts::TAU);
        let params = UniformAbscissa::new(std::f64::consts::FRAC_PI_2).execute(&adaptor).unwrap();
        assert_eq!(params.len(), 5);
        assert_relative_eq!(
            adaptor.point(params[1]).unwrap(),
            Point3::new(0.0, 1.0, 0.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn rejects_bad_input() {
        let line = Line::new(Point3::origin(), Vector3::x()).unwrap();
        let adaptor = CurveAdaptor::new(&line, 0.0, 1.0);
        assert!(UniformAbscissa::new(0.0).execute(&adaptor).is_err());
        assert!(UniformAbscissa::new(f64::NAN).execute(&adaptor).is_err());

        let params = DiscretizationParams {
            step: 0.001,
            max_points_per_edge: 10,
            ..DiscretizationParams::default()
        };
        let err = UniformAbscissa::with_params(params).execute(&adaptor).unwrap_err();
        assert!(err.to_string().contains("limit is 10"));

        let point = CurveAdaptor::new(&line, 0.5, 0.5);
        assert!(UniformAbscissa::new(0.1).execute(&point).is_err());
    }
}
