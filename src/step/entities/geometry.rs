//! Points, directions, vectors and axis placements.

use crate::error::StepError;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::step::parser::StepFile;

use super::EntityArgs;

/// Parses `CARTESIAN_POINT(name, (x, y[, z]))`; a missing `z` reads as 0.
///
/// # Errors
///
/// Returns an error if the entity is missing, of another type, or has fewer
/// than two coordinates.
pub fn parse_cartesian_point(file: &StepFile, id: u64) -> Result<Point3, StepError> {
    let entity = file.require(id)?;
    if entity.type_name != "CARTESIAN_POINT" {
        return Err(StepError::type_mismatch("CARTESIAN_POINT", &entity.type_name));
    }
    let coords = entity.real_list(1)?;
    match coords.as_slice() {
        [x, y] => Ok(Point3::new(*x, *y, 0.0)),
        [x, y, z, ..] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(StepError::parser(
            Some(id),
            format!("CARTESIAN_POINT needs 2 or 3 coordinates, got {}", coords.len()),
        )),
    }
}

/// Parses `DIRECTION(name, (x, y[, z]))` into a unit vector.
///
/// # Errors
///
/// Returns an error if the entity is malformed or the direction is zero.
pub fn parse_direction(file: &StepFile, id: u64) -> Result<Vector3, StepError> {
    let entity = file.require(id)?;
    if entity.type_name != "DIRECTION" {
        return Err(StepError::type_mismatch("DIRECTION", &entity.type_name));
    }
    let ratios = entity.real_list(1)?;
    let v = match ratios.as_slice() {
        [x, y] => Vector3::new(*x, *y, 0.0),
        [x, y, z, ..] => Vector3::new(*x, *y, *z),
        _ => {
            return Err(StepError::parser(
                Some(id),
                format!("DIRECTION needs 2 or 3 components, got {}", ratios.len()),
            ))
        }
    };
    let len = v.norm();
    if len < TOLERANCE {
        return Err(StepError::parser(Some(id), "zero-length direction"));
    }
    Ok(v / len)
}

/// Parses `VECTOR(name, orientation, magnitude)` into a scaled vector.
///
/// # Errors
///
/// Returns an error if the entity or its direction is malformed.
pub fn parse_vector(file: &StepFile, id: u64) -> Result<Vector3, StepError> {
    let entity = file.require(id)?;
    if entity.type_name != "VECTOR" {
        return Err(StepError::type_mismatch("VECTOR", &entity.type_name));
    }
    let dir = parse_direction(file, entity.entity_ref(1)?)?;
    Ok(dir * entity.real(2)?)
}

/// Location and (optional) axes of a placement entity.
#[derive(Debug, Clone)]
pub struct AxisPlacement {
    pub location: Point3,
    /// Z axis; `None` means the global +Z.
    pub axis: Option<Vector3>,
    /// X axis; `None` means "any direction perpendicular to Z".
    pub ref_direction: Option<Vector3>,
}

impl AxisPlacement {
    /// Z axis, defaulting to +Z.
    #[must_use]
    pub fn z_axis(&self) -> Vector3 {
        self.axis.unwrap_or_else(Vector3::z)
    }

    /// X axis made perpendicular to [`z_axis`](Self::z_axis).
    #[must_use]
    pub fn x_axis(&self) -> Vector3 {
        let z = self.z_axis();
        let candidate = match self.ref_direction {
            Some(x) => x - z * x.dot(&z),
            None => Vector3::zeros(),
        };
        if candidate.norm() > TOLERANCE {
            return candidate.normalize();
        }
        let arbitrary = if z.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
        (arbitrary - z * arbitrary.dot(&z)).normalize()
    }

    /// Y axis, `z × x`.
    #[must_use]
    pub fn y_axis(&self) -> Vector3 {
        self.z_axis().cross(&self.x_axis())
    }
}

fn optional_direction(file: &StepFile, entity: &impl EntityArgs, idx: usize) -> Result<Option<Vector3>, StepError> {
    if entity.is_null(idx) {
        Ok(None)
    } else {
        parse_direction(file, entity.entity_ref(idx)?).map(Some)
    }
}

/// Parses `AXIS2_PLACEMENT_3D(name, location, axis, ref_direction)` or
/// `AXIS1_PLACEMENT(name, location, axis)`.
///
/// # Errors
///
/// Returns an error if the entity is of another type or malformed.
pub fn parse_axis2_placement_3d(file: &StepFile, id: u64) -> Result<AxisPlacement, StepError> {
    let entity = file.require(id)?;
    match entity.type_name.as_str() {
        "AXIS2_PLACEMENT_3D" | "AXIS1_PLACEMENT" => {
            let location = parse_cartesian_point(file, entity.entity_ref(1)?)?;
            let axis = optional_direction(file, entity, 2)?;
            let ref_direction = if entity.type_name == "AXIS2_PLACEMENT_3D" {
                optional_direction(file, entity, 3)?
            } else {
                None
            };
            Ok(AxisPlacement {
                location,
                axis,
                ref_direction,
            })
        }
        other => Err(StepError::type_mismatch("AXIS2_PLACEMENT_3D", other)),
    }
}
