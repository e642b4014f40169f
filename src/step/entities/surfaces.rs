//! Surface entities. Only `PLANE` is modelled; other surfaces are kept by
//! name so a face on them can still be reported.

use tracing::debug;

use crate::error::StepError;
use crate::geometry::surface::Plane;
use crate::step::parser::StepFile;
use crate::topology::FaceSurface;

use super::geometry::parse_axis2_placement_3d;
use super::{geometry_error, EntityArgs};

/// Parses `PLANE(name, position)`.
///
/// # Errors
///
/// Returns an error if the entity is of another type or its placement is
/// malformed.
pub fn parse_plane(file: &StepFile, id: u64) -> Result<Plane, StepError> {
    let entity = file.require(id)?;
    if entity.type_name != "PLANE" {
        return Err(StepError::type_mismatch("PLANE", &entity.type_name));
    }
    let placement = parse_axis2_placement_3d(file, entity.entity_ref(1)?)?;
    Plane::new(placement.location, placement.z_axis(), placement.x_axis()).map_err(geometry_error(id))
}

/// Resolves the surface a face lies on.
///
/// # Errors
///
/// Returns an error if the entity is missing or a `PLANE` is malformed.
pub fn parse_face_surface(file: &StepFile, id: u64) -> Result<FaceSurface, StepError> {
    let entity = file.require(id)?;
    if entity.type_name == "PLANE" {
        return parse_plane(file, id).map(FaceSurface::Plane);
    }
    debug!(entity = id, kind = %entity.type_name, "surface kind is not modelled");
    Ok(FaceSurface::Other(entity.type_name.clone()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::step::entities::tests::parse_data;
    use approx::assert_relative_eq;

    #[test]
    fn plane_from_placement() {
        let file = parse_data(
            "#1 = CARTESIAN_POINT('', (0., 0., 2.));\n#2 = DIRECTION('', (0., 0., 1.));\n#3 = DIRECTION('', (1., 0., 0.));\n#4 = AXIS2_PLACEMENT_3D('', #1, #2, #3);\n#5 = PLANE('', #4);\n#6 = CYLINDRICAL_SURFACE('', #4, 1.);",
        );
        let FaceSurface::Plane(plane) = parse_face_surface(&file, 5).unwrap() else {
            panic!("expected a plane");
        };
        assert_relative_eq!(*plane.normal(), Vector3::z());
        assert_relative_eq!(*plane.origin(), Point3::new(0.0, 0.0, 2.0));
        assert!(plane.is_xy_aligned());

        let other = parse_face_surface(&file, 6).unwrap();
        assert!(matches!(other, FaceSurface::Other(ref name) if name == "CYLINDRICAL_SURFACE"));
        assert!(parse_plane(&file, 6).is_err());
    }
}
