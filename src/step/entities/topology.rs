//! Topology entities: vertex, edge, loop, bound, face, shell and solid.

use crate::error::StepError;
use crate::math::Point3;
use crate::step::parser::StepFile;

use super::{parse_cartesian_point, EntityArgs};

/// Parsed `EDGE_CURVE`.
#[derive(Debug, Clone)]
pub struct StepEdge {
    pub start_vertex_id: u64,
    pub end_vertex_id: u64,
    pub curve_id: u64,
    /// Whether the edge runs in the direction of its curve.
    pub same_sense: bool,
}

/// Parsed `ORIENTED_EDGE`.
#[derive(Debug, Clone)]
pub struct StepOrientedEdge {
    pub edge_id: u64,
    /// `true` if the loop traverses the edge from its start to its end vertex.
    pub orientation: bool,
}

/// Parsed loop. `VERTEX_LOOP` and other edge-free loops have no edges.
#[derive(Debug, Clone)]
pub struct StepLoop {
    /// Oriented edge entity ids, in loop order.
    pub edge_ids: Vec<u64>,
    /// Entity name of the loop, kept for diagnostics.
    pub kind: String,
}

/// Parsed `FACE_BOUND` / `FACE_OUTER_BOUND`.
#[derive(Debug, Clone)]
pub struct StepFaceBound {
    pub loop_id: u64,
    /// `false` if the loop is used opposite to its own direction.
    pub orientation: bool,
    pub is_outer: bool,
}

/// Parsed `ADVANCED_FACE` / `FACE_SURFACE`.
#[derive(Debug, Clone)]
pub struct StepFace {
    pub bounds: Vec<StepFaceBound>,
    pub surface_id: u64,
    pub same_sense: bool,
}

/// Parsed `OPEN_SHELL` / `CLOSED_SHELL`.
#[derive(Debug, Clone)]
pub struct StepShell {
    pub face_ids: Vec<u64>,
    pub is_closed: bool,
}

/// Parsed `MANIFOLD_SOLID_BREP` / `BREP_WITH_VOIDS`.
#[derive(Debug, Clone)]
pub struct StepSolid {
    pub outer_shell_id: u64,
    pub void_shell_ids: Vec<u64>,
}

/// Parses `VERTEX_POINT(name, point)`.
///
/// # Errors
///
/// Returns an error if the entity or its point is malformed.
pub fn parse_vertex_point(file: &StepFile, id: u64) -> Result<Point3, StepError> {
    let entity = file.require(id)?;
    if entity.type_name != "VERTEX_POINT" {
        return Err(StepError::type_mismatch("VERTEX_POINT", &entity.type_name));
    }
    parse_cartesian_point(file, entity.entity_ref(1)?)
}

/// Parses `EDGE_CURVE(name, start, end, geometry, same_sense)`.
///
/// # Errors
///
/// Returns an error if the entity is malformed.
pub fn parse_edge_curve(file: &StepFile, id: u64) -> Result<StepEdge, StepError> {
    let entity = file.require(id)?;
    if entity.type_name != "EDGE_CURVE" {
        return Err(StepError::type_mismatch("EDGE_CURVE", &entity.type_name));
    }
    Ok(StepEdge {
        start_vertex_id: entity.entity_ref(1)?,
        end_vertex_id: entity.entity_ref(2)?,
        curve_id: entity.entity_ref(3)?,
        same_sense: entity.boolean(4)?,
    })
}

/// Parses `ORIENTED_EDGE(name, *, *, edge_element, orientation)`.
///
/// # Errors
///
/// Returns an error if the entity is malformed.
pub fn parse_oriented_edge(file: &StepFile, id: u64) -> Result<StepOrientedEdge, StepError> {
    let entity = file.require(id)?;
    if entity.type_name != "ORIENTED_EDGE" {
        return Err(StepError::type_mismatch("ORIENTED_EDGE", &entity.type_name));
    }
    Ok(StepOrientedEdge {
        edge_id: entity.entity_ref(3)?,
        orientation: entity.boolean(4)?,
    })
}

/// Parses `EDGE_LOOP(name, (edges))`; any other loop kind yields no edges.
///
/// # Errors
///
/// Returns an error if the entity is missing or an `EDGE_LOOP` is malformed.
pub fn parse_loop(file: &StepFile, id: u64) -> Result<StepLoop, StepError> {
    let entity = file.require(id)?;
    let edge_ids = if entity.type_name == "EDGE_LOOP" {
        entity.entity_ref_list(1)?
    } else {
        Vec::new()
    };
    Ok(StepLoop {
        edge_ids,
        kind: entity.type_name.clone(),
    })
}

/// Parses `FACE_BOUND(name, bound, orientation)` or `FACE_OUTER_BOUND(..)`.
///
/// # Errors
///
/// Returns an error if the entity is malformed.
pub fn parse_face_bound(file: &StepFile, id: u64) -> Result<StepFaceBound, StepError> {
    let entity = file.require(id)?;
    match entity.type_name.as_str() {
        "FACE_BOUND" | "FACE_OUTER_BOUND" => Ok(StepFaceBound {
            loop_id: entity.entity_ref(1)?,
            orientation: entity.boolean(2)?,
            is_outer: entity.type_name == "FACE_OUTER_BOUND",
        }),
        other => Err(StepError::type_mismatch("FACE_BOUND", other)),
    }
}

/// Parses `ADVANCED_FACE(name, (bounds), surface, same_sense)` or the
/// identically shaped `FACE_SURFACE`.
///
/// # Errors
///
/// Returns an error if the entity or one of its bounds is malformed.
pub fn parse_face(file: &StepFile, id: u64) -> Result<StepFace, StepError> {
    let entity = file.require(id)?;
    match entity.type_name.as_str() {
        "ADVANCED_FACE" | "FACE_SURFACE" => {
            let bounds = entity
                .entity_ref_list(1)?
                .into_iter()
                .map(|bid| parse_face_bound(file, bid))
                .collect::<Result<_, _>>()?;
            Ok(StepFace {
                bounds,
                surface_id: entity.entity_ref(2)?,
                same_sense: entity.boolean(3)?,
            })
        }
        other => Err(StepError::type_mismatch("ADVANCED_FACE", other)),
    }
}

/// Parses `OPEN_SHELL` / `CLOSED_SHELL(name, (faces))`. An
/// `ORIENTED_CLOSED_SHELL(name, *, shell, orientation)` resolves to the
/// shell it wraps.
///
/// # Errors
///
/// Returns an error if the entity is not a shell or is malformed.
pub fn parse_shell(file: &StepFile, id: u64) -> Result<StepShell, StepError> {
    let entity = file.require(resolve_oriented_shell(file, id)?)?;
    match entity.type_name.as_str() {
        "OPEN_SHELL" | "CLOSED_SHELL" => Ok(StepShell {
            face_ids: entity.entity_ref_list(1)?,
            is_closed: entity.type_name == "CLOSED_SHELL",
        }),
        other => Err(StepError::type_mismatch("CLOSED_SHELL", other)),
    }
}

/// Follows `ORIENTED_CLOSED_SHELL` wrappers to the id of the shell they
/// carry. Any other entity resolves to itself.
///
/// # Errors
///
/// Returns an error on a dangling or cyclic reference.
pub fn resolve_oriented_shell(file: &StepFile, id: u64) -> Result<u64, StepError> {
    let mut wrappers = Vec::new();
    let mut id = id;
    loop {
        let entity = file.require(id)?;
        if entity.type_name != "ORIENTED_CLOSED_SHELL" {
            return Ok(id);
        }
        if wrappers.contains(&id) {
            return Err(StepError::parser(Some(id), "cyclic reference"));
        }
        wrappers.push(id);
        id = entity.entity_ref(2)?;
    }
}

/// Parses `MANIFOLD_SOLID_BREP(name, outer)` or
/// `BREP_WITH_VOIDS(name, outer, (voids))`.
///
/// # Errors
///
/// Returns an error if the entity is not a solid or is malformed.
pub fn parse_solid(file: &StepFile, id: u64) -> Result<StepSolid, StepError> {
    let entity = file.require(id)?;
    match entity.type_name.as_str() {
        "MANIFOLD_SOLID_BREP" => Ok(StepSolid {
            outer_shell_id: entity.entity_ref(1)?,
            void_shell_ids: Vec::new(),
        }),
        "BREP_WITH_VOIDS" => Ok(StepSolid {
            outer_shell_id: entity.entity_ref(1)?,
            void_shell_ids: entity.entity_ref_list(2)?,
        }),
        other => Err(StepError::type_mismatch("MANIFOLD_SOLID_BREP", other)),
    }
}
