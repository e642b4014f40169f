use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// An infinite plane in 3D space.
///
/// Defined by an origin and a unit normal.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane from an axis placement.
    ///
    /// The reference direction only has to be non-parallel to the normal;
    /// the plane itself does not depend on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length or the reference
    /// direction is parallel to it.
    pub fn new(origin: Point3, normal: Vector3, ref_dir: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        let in_plane = ref_dir - normal * ref_dir.dot(&normal);
        if in_plane.norm() < TOLERANCE {
            return Err(
                GeometryError::Degenerate("plane reference direction is parallel to the normal".into())
                    .into(),
            );
        }

        Ok(Self { origin, normal })
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }


    /// Returns `true` if the plane is parallel to the global XY plane.
    #[must_use]
    pub fn is_xy_aligned(&self) -> bool {
        1.0 - self.normal.z.abs() < 1e-9
    }
}
