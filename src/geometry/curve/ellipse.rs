use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A full ellipse in 3D space.
///
/// Defined by a center, semi-major and semi-minor axes, a normal and a
/// major axis direction. Edges trim it by parameter range.
///
/// `P(t) = center + a * cos(t) * major_dir + b * sin(t) * minor_dir`
/// where `minor_dir = normal x major_dir`.
#[derive(Debug, Clone)]
pub struct Ellipse {
    center: Point3,
    semi_major: f64,
    semi_minor: f64,
    normal: Vector3,
    major_dir: Vector3,
}

impl Ellipse {
    /// Creates a new ellipse.
    ///
    /// # Errors
    ///
    /// Returns an error if either axis length is non-positive, the normal is
    /// zero-length, or the major direction is not perpendicular to the normal.
    pub fn new(
        center: Point3,
        semi_major: f64,
        semi_minor: f64,
        normal: Vector3,
        major_dir: Vector3,
    ) -> Result<Self> {
        if semi_major < TOLERANCE {
            return Err(GeometryError::Degenerate("semi-major axis must be positive".into()).into());
        }
        if semi_minor < TOLERANCE {
            return Err(GeometryError::Degenerate("semi-minor axis must be positive".into()).into());
        }

        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;

        let major_len = major_dir.norm();
        if major_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let major_dir = major_dir / major_len;

        if normal.dot(&major_dir).abs() > 1e-9 {
            return Err(GeometryError::Degenerate(
                "major direction must be perpendicular to normal".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            semi_major,
            semi_minor,
            normal,
            major_dir,
        })
    }

    /// Returns the semi-major axis length.
    #[must_use]
    pub fn semi_major(&self) -> f64 {
        self.semi_major
    }

    /// Returns the semi-minor axis length.
    #[must_use]
    pub fn semi_minor(&self) -> f64 {
        self.semi_minor
    }

    fn minor_dir(&self) -> Vector3 {
        self.normal.cross(&self.major_dir)
    }
}

impl Curve for Ellipse {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let x = self.semi_major * t.cos();
        let y = self.semi_minor * t.sin();
        Ok(self.center + self.major_dir * x + self.minor_dir() * y)
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        let dx = -self.semi_major * t.sin();
        let dy = self.semi_minor * t.cos();
        Ok(self.major_dir * dx + self.minor_dir() * dy)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        let ddx = -self.semi_major * t.cos();
        let ddy = -self.semi_minor * t.sin();
        Ok(self.major_dir * ddx + self.minor_dir() * ddy)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, std::f64::consts::TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn closest_parameter(&self, point: &Point3) -> Result<f64> {
        // Exact for points on the ellipse, which is all the STEP reader needs.
        let local = point - self.center;
        let x = local.dot(&self.major_dir) / self.semi_major;
        let y = local.dot(&self.minor_dir()) / self.semi_minor;
        if x.hypot(y) < TOLERANCE {
            return Err(GeometryError::Degenerate("point is at the ellipse center".into()).into());
        }
        Ok(y.atan2(x).rem_euclid(std::f64::consts::TAU))
    }
}
