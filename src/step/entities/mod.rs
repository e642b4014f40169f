//! Typed views over the raw entity graph.
//!
//! Each submodule turns one family of AP203/AP214 entities into kernel
//! values (points, curves, surfaces) or into small records describing the
//! topology (`StepEdge`, `StepFace`, ...), which the reader then assembles
//! into a [`TopologyStore`](crate::topology::TopologyStore).

pub mod curves;
pub mod geometry;
pub mod surfaces;
pub mod topology;

pub use curves::parse_edge_geometry;
pub use geometry::{parse_axis2_placement_3d, parse_cartesian_point, parse_direction, AxisPlacement};
pub use surfaces::parse_face_surface;
pub use topology::*;

use crate::error::{QueryCadError, StepError};

use super::parser::{StepEntity, StepValue};

/// Typed access to the positional arguments of an entity.
pub trait EntityArgs {
    /// Returns the argument at `idx`, if present.
    fn arg(&self, idx: usize) -> Option<&StepValue>;

    /// Builds an error for a missing or mistyped argument.
    fn arg_error(&self, idx: usize, expected: &str) -> StepError;

    /// Reads a required real (integers are accepted).
    ///
    /// # Errors
    ///
    /// Returns a parser error if the argument is absent or not numeric.
    fn real(&self, idx: usize) -> Result<f64, StepError> {
        self.arg(idx)
            .and_then(StepValue::as_real)
            .ok_or_else(|| self.arg_error(idx, "real"))
    }

    /// Reads a required integer.
    ///
    /// # Errors
    ///
    /// Returns a parser error if the argument is absent or not an integer.
    fn integer(&self, idx: usize) -> Result<i64, StepError> {
        self.arg(idx)
            .and_then(StepValue::as_integer)
            .ok_or_else(|| self.arg_error(idx, "integer"))
    }

    /// Reads a required enumeration value.
    ///
    /// # Errors
    ///
    /// Returns a parser error if the argument is absent or not an enum.
    fn enumeration(&self, idx: usize) -> Result<&str, StepError> {
        self.arg(idx)
            .and_then(StepValue::as_enum)
            .ok_or_else(|| self.arg_error(idx, "enumeration"))
    }

    /// Reads a required boolean/logical (`.T.` or `.F.`).
    ///
    /// # Errors
    ///
    /// Returns a parser error if the argument is not `.T.`/`.F.`.
    fn boolean(&self, idx: usize) -> Result<bool, StepError> {
        match self.enumeration(idx)? {
            "T" | "TRUE" => Ok(true),
            "F" | "FALSE" => Ok(false),
            _ => Err(self.arg_error(idx, "boolean")),
        }
    }

    /// Reads a required entity reference.
    ///
    /// # Errors
    ///
    /// Returns a parser error if the argument is absent or not a reference.
    fn entity_ref(&self, idx: usize) -> Result<u64, StepError> {
        self.arg(idx)
            .and_then(StepValue::as_entity_ref)
            .ok_or_else(|| self.arg_error(idx, "entity reference"))
    }

    /// Reads a required list.
    ///
    /// # Errors
    ///
    /// Returns a parser error if the argument is absent or not a list.
    fn list(&self, idx: usize) -> Result<&[StepValue], StepError> {
        self.arg(idx)
            .and_then(StepValue::as_list)
            .ok_or_else(|| self.arg_error(idx, "list"))
    }

    /// Reads a list of reals.
    ///
    /// # Errors
    ///
    /// Returns a parser error if any element is not numeric.
    fn real_list(&self, idx: usize) -> Result<Vec<f64>, StepError> {
        self.list(idx)?
            .iter()
            .map(|v| v.as_real().ok_or_else(|| self.arg_error(idx, "list of reals")))
            .collect()
    }

    /// Reads a list of non-negative integers.
    ///
    /// # Errors
    ///
    /// Returns a parser error if any element is not a non-negative integer.
    fn count_list(&self, idx: usize) -> Result<Vec<usize>, StepError> {
        self.list(idx)?
            .iter()
            .map(|v| {
                v.as_integer()
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or_else(|| self.arg_error(idx, "list of counts"))
            })
            .collect()
    }

    /// Reads a list of entity references.
    ///
    /// # Errors
    ///
    /// Returns a parser error if any element is not a reference.
    fn entity_ref_list(&self, idx: usize) -> Result<Vec<u64>, StepError> {
        self.list(idx)?
            .iter()
            .map(|v| v.as_entity_ref().ok_or_else(|| self.arg_error(idx, "list of entity references")))
            .collect()
    }

    /// Returns `true` if the argument is unset (`$`) or absent.
    fn is_null(&self, idx: usize) -> bool {
        self.arg(idx).is_none_or(StepValue::is_null)
    }
}

impl EntityArgs for StepEntity {
    fn arg(&self, idx: usize) -> Option<&StepValue> {
        self.args.get(idx)
    }

    fn arg_error(&self, idx: usize, expected: &str) -> StepError {
        StepError::parser(
            Some(self.id),
            format!("expected {expected} at arg {idx} of {}", self.type_name),
        )
    }
}

/// Converts a kernel error raised while building geometry for `entity_id`.
pub(crate) fn geometry_error(entity_id: u64) -> impl Fn(QueryCadError) -> StepError {
    move |err| match err {
        QueryCadError::Geometry(source) => StepError::Geometry { entity_id, source },
        other => StepError::parser(Some(entity_id), other.to_string()),
    }
}
