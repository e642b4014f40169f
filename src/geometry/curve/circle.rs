use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A full circle in 3D space.
///
/// Defined by a center, radius, normal axis, and a reference direction
/// for the zero-angle. The parametric domain is `[0, 2*pi)`; the curve is
/// periodic, so parameters outside the domain wrap around.
///
/// `P(t) = center + radius * cos(t) * ref_dir + radius * sin(t) * binormal`
/// where `binormal = normal x ref_dir`.
#[derive(Debug, Clone)]
pub struct Circle {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the circle
    /// * `radius` - Radius (must be positive)
    /// * `normal` - Normal vector defining the circle plane
    /// * `ref_dir` - Reference direction for angle = 0 (must be perpendicular to normal)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the normal is zero-length,
    /// or the reference direction is not perpendicular to the normal.
    pub fn new(center: Point3, radius: f64, normal: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("circle radius must be positive".into()).into());
        }

        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if normal.dot(&ref_dir).abs() > 1e-9 {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to normal".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
        })
    }

    /// Returns the center of the circle.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the normal vector of the circle plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Computes the binormal direction (`normal x ref_dir`).
    fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }
}

impl Curve for Circle {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let x = self.radius * t.cos();
        let y = self.radius * t.sin();
        Ok(self.center + self.ref_dir * x + self.binormal() * y)
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        let dx = -self.radius * t.sin();
        let dy = self.radius * t.cos();
        Ok(self.ref_dir * dx + self.binormal() * dy)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        let ddx = -self.radius * t.cos();
        let ddy = -self.radius * t.sin();
        Ok(self.ref_dir * ddx + self.binormal() * ddy)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, std::f64::consts::TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn closest_parameter(&self, point: &Point3) -> Result<f64> {
        let local = point - self.center;
        let x = local.dot(&self.ref_dir);
        let y = local.dot(&self.binormal());
        if x.hypot(y) < TOLERANCE {
            return Err(GeometryError::Degenerate("point is at the circle center".into()).into());
        }
        Ok(y.atan2(x).rem_euclid(std::f64::consts::TAU))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn xy_circle(radius: f64) -> Circle {
        Circle::new(Point3::origin(), radius, Vector3::z(), Vector3::x()).unwrap()
    }

    #[test]
    fn evaluate_at_pi_over_2() {
        let c = xy_circle(3.0);
        let p = c.evaluate(FRAC_PI_2).unwrap();
        assert!((p - Point3::new(0.0, 3.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn derivative_magnitude_is_radius() {
        let c = xy_circle(2.0);
        let d1 = c.derivative(0.3).unwrap();
        assert!((d1.norm() - 2.0).abs() < 1e-12);
        // At t=0 the curve moves towards +Y
        assert!((c.derivative(0.0).unwrap().normalize() - Vector3::y()).norm() < 1e-9);
    }

    #[test]
    fn second_derivative_points_to_center() {
        let c = xy_circle(2.0);
        let d2 = c.second_derivative(0.0).unwrap();
        assert!((d2 - Vector3::new(-2.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn closest_parameter_wraps_into_domain() {
        let c = xy_circle(1.0);
        let t = c.closest_parameter(&Point3::new(0.0, -5.0, 0.0)).unwrap();
        assert!((t - 1.5 * PI).abs() < 1e-12);
        assert!(t < TAU);
    }

    #[test]
    fn invalid_radius() {
        let r = Circle::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x());
        assert!(r.is_err());
    }

    #[test]
    fn non_perpendicular_ref_dir() {
        let r = Circle::new(
            Point3::origin(),
            1.0,
            Vector3::z(),
            Vector3::new(1.0, 0.0, 1.0),
        );
        assert!(r.is_err());
    }
}
