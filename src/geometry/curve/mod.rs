mod bspline;
mod circle;
mod ellipse;
mod line;

pub use bspline::BSplineCurve;
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3};

/// Number of coarse samples used to seed [`Curve::closest_parameter`].
const PROJECTION_SAMPLES: usize = 64;

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Returns `true` if both ends of the domain are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.t_min.is_finite() && self.t_max.is_finite()
    }

    /// Clamps `t` into the domain.
    #[must_use]
    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.t_min, self.t_max)
    }
}

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the first derivative `dC/dt` at parameter `t` (not normalized).
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn derivative(&self, t: f64) -> Result<Vector3>;

    /// Computes the second derivative `d²C/dt²` at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn second_derivative(&self, t: f64) -> Result<Vector3>;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;

    /// Finds the parameter of the point on the curve closest to `point`.
    ///
    /// The default implementation seeds with a coarse sampling of the domain
    /// and refines with Newton iterations on `(C(t) - P) . C'(t) = 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is unbounded or evaluation fails.
    fn closest_parameter(&self, point: &Point3) -> Result<f64> {
        let domain = self.domain();
        if !domain.is_bounded() {
            return Err(GeometryError::Degenerate(
                "cannot project onto an unbounded curve".into(),
            )
            .into());
        }

        #[allow(clippy::cast_precision_loss)]
        let step = (domain.t_max - domain.t_min) / PROJECTION_SAMPLES as f64;
        let mut best_t = domain.t_min;
        let mut best_dist = f64::INFINITY;
        for i in 0..=PROJECTION_SAMPLES {
            #[allow(clippy::cast_precision_loss)]
            let t = domain.t_min + step * i as f64;
            let dist = (self.evaluate(t)? - point).norm_squared();
            if dist < best_dist {
                best_dist = dist;
                best_t = t;
            }
        }

        let mut t = best_t;
        for _ in 0..32 {
            let diff = self.evaluate(t)? - point;
            let d1 = self.derivative(t)?;
            let d2 = self.second_derivative(t)?;
            let f = diff.dot(&d1);
            let df = d1.dot(&d1) + diff.dot(&d2);
            if df.abs() < crate::math::TOLERANCE {
                break;
            }
            let next = domain.clamp(t - f / df);
            if (next - t).abs() < 1e-14 {
                t = next;
                break;
            }
            t = next;
        }
        Ok(t)
    }
}
