use crate::error::Result;
use crate::math::{Point3, Vector3};

use super::{Curve, CurveDomain};

/// An infinite line defined by an origin point and a direction vector.
///
/// The parametric form is: `P(t) = origin + t * direction`, with a unit
/// direction so that `t` is the arc length from the origin.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < crate::math::TOLERANCE {
            return Err(crate::error::GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Creates a line through two distinct points, parameterized so that
    /// `from` is at `t = 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn through(from: Point3, to: Point3) -> Result<Self> {
        Self::new(from, to - from)
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.origin + self.direction * t)
    }

    fn derivative(&self, _t: f64) -> Result<Vector3> {
        Ok(self.direction)
    }

    fn second_derivative(&self, _t: f64) -> Result<Vector3> {
        Ok(Vector3::zeros())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn closest_parameter(&self, point: &Point3) -> Result<f64> {
        Ok((point - self.origin).dot(&self.direction))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Line::new(Point3::origin(), Vector3::zeros()).is_err());
    }

    #[test]
    fn parameter_is_arc_length() {
        let line = Line::through(Point3::origin(), Point3::new(3.0, 4.0, 0.0)).unwrap();
        let p = line.evaluate(5.0).unwrap();
        assert_relative_eq!(p.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 4.0, epsilon = 1e-12);
        assert_relative_eq!(line.derivative(1.0).unwrap().norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(line.second_derivative(1.0).unwrap().norm(), 0.0);
    }

    #[test]
    fn projects_point_onto_line() {
        let line = Line::new(Point3::new(1.0, 1.0, 0.0), Vector3::x()).unwrap();
        let t = line.closest_parameter(&Point3::new(4.0, 7.0, 0.0)).unwrap();
        assert_relative_eq!(t, 3.0, epsilon = 1e-12);
    }
}
