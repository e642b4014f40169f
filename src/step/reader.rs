//! Builds kernel topology from a parsed STEP file.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use tracing::{debug, warn};

use crate::error::StepError;
use crate::geometry::curve::Curve;
use crate::math::{Point3, TOLERANCE};
use crate::topology::{
    EdgeCurve, EdgeData, EdgeId, FaceData, FaceId, OrientedEdge, Orientation, Shape, ShellData,
    ShellId, SolidData, SolidId, TopologyStore, VertexData, VertexId, WireData, WireId,
};

use super::entities::{
    geometry_error, parse_edge_curve, parse_edge_geometry, parse_face, parse_face_surface, parse_loop,
    parse_oriented_edge, parse_shell, parse_solid, parse_vertex_point, resolve_oriented_shell, EntityArgs,
    StepFaceBound,
};
use super::parser::StepFile;
use super::ImportedShape;

/// Distance under which two vertices are considered the same point.
const VERTEX_TOLERANCE: f64 = 1e-7;

/// Converts a STEP file into a topology store and its root compound.
///
/// Roots are, in entity id order: every solid, every shell of a
/// `SHELL_BASED_SURFACE_MODEL`, shells no solid or surface model refers to,
/// and faces no shell refers to. Shared entities are built once.
pub(super) struct StepReader<'a> {
    file: &'a StepFile,
    store: TopologyStore,
    vertices: HashMap<u64, (VertexId, Point3)>,
    edges: HashMap<u64, EdgeId>,
    faces: HashMap<u64, FaceId>,
    shells: HashMap<u64, ShellId>,
    solids: HashMap<u64, SolidId>,
}

impl<'a> StepReader<'a> {
    pub(super) fn new(file: &'a StepFile) -> Self {
        Self {
            file,
            store: TopologyStore::new(),
            vertices: HashMap::new(),
            edges: HashMap::new(),
            faces: HashMap::new(),
            shells: HashMap::new(),
            solids: HashMap::new(),
        }
    }

    pub(super) fn read(mut self) -> Result<ImportedShape, StepError> {
        let file = self.file;
        let (owned_shells, owned_faces) = self.owned_entities()?;
        let mut roots = Vec::new();

        for entity in file.entities.values() {
            let id = entity.id;
            match entity.type_name.as_str() {
                "MANIFOLD_SOLID_BREP" | "BREP_WITH_VOIDS" => roots.push(Shape::Solid(self.solid(id)?)),
                "SHELL_BASED_SURFACE_MODEL" => {
                    for shell_id in entity.entity_ref_list(1)? {
                        roots.push(Shape::Shell(self.shell(shell_id)?));
                    }
                }
                "OPEN_SHELL" | "CLOSED_SHELL" if !owned_shells.contains(&id) => {
                    roots.push(Shape::Shell(self.shell(id)?));
                }
                "ADVANCED_FACE" | "FACE_SURFACE" if !owned_faces.contains(&id) => {
                    roots.push(Shape::Face(self.face(id)?));
                }
                _ => {}
            }
        }

        debug!(
            roots = roots.len(),
            solids = self.solids.len(),
            shells = self.shells.len(),
            faces = self.faces.len(),
            edges = self.edges.len(),
            "STEP topology assembled"
        );
        Ok(ImportedShape {
            store: self.store,
            shape: Shape::Compound(roots),
        })
    }

    /// Ids of shells owned by a solid or surface model, and of faces owned
    /// by any shell.
    fn owned_entities(&self) -> Result<(HashSet<u64>, HashSet<u64>), StepError> {
        let mut shells = HashSet::new();
        let mut faces = HashSet::new();
        for entity in self.file.entities.values() {
            match entity.type_name.as_str() {
                "MANIFOLD_SOLID_BREP" | "BREP_WITH_VOIDS" => {
                    let solid = parse_solid(self.file, entity.id)?;
                    for id in std::iter::once(solid.outer_shell_id).chain(solid.void_shell_ids) {
                        shells.insert(resolve_oriented_shell(self.file, id)?);
                    }
                }
                "SHELL_BASED_SURFACE_MODEL" => {
                    for id in entity.entity_ref_list(1)? {
                        shells.insert(resolve_oriented_shell(self.file, id)?);
                    }
                }
                "OPEN_SHELL" | "CLOSED_SHELL" => faces.extend(entity.entity_ref_list(1)?),
                _ => {}
            }
        }
        Ok((shells, faces))
    }

    fn solid(&mut self, id: u64) -> Result<SolidId, StepError> {
        if let Some(&solid) = self.solids.get(&id) {
            return Ok(solid);
        }
        let step_solid = parse_solid(self.file, id)?;
        let outer_shell = self.shell(step_solid.outer_shell_id)?;
        let inner_shells = step_solid
            .void_shell_ids
            .iter()
            .map(|&sid| self.shell(sid))
            .collect::<Result<_, _>>()?;
        let solid = self.store.add_solid(SolidData {
            outer_shell,
            inner_shells,
        });
        self.solids.insert(id, solid);
        Ok(solid)
    }

    fn shell(&mut self, id: u64) -> Result<ShellId, StepError> {
        let id = resolve_oriented_shell(self.file, id)?;
        if let Some(&shell) = self.shells.get(&id) {
            return Ok(shell);
        }
        let step_shell = parse_shell(self.file, id)?;
        let faces = step_shell
            .face_ids
            .iter()
            .map(|&fid| self.face(fid))
            .collect::<Result<_, _>>()?;
        let shell = self.store.add_shell(ShellData {
            faces,
            is_closed: step_shell.is_closed,
        });
        self.shells.insert(id, shell);
        Ok(shell)
    }

    fn face(&mut self, id: u64) -> Result<FaceId, StepError> {
        if let Some(&face) = self.faces.get(&id) {
            return Ok(face);
        }
        let step_face = parse_face(self.file, id)?;
        let surface = parse_face_surface(self.file, step_face.surface_id)?;

        // Without an explicit outer bound the first bound is taken as outer.
        let outer_index = step_face
            .bounds
            .iter()
            .position(|b| b.is_outer)
            .or_else(|| (!step_face.bounds.is_empty()).then_some(0));

        let mut outer_wire = None;
        let mut inner_wires = Vec::new();
        for (i, bound) in step_face.bounds.iter().enumerate() {
            let wire = self.wire(bound)?;
            if Some(i) == outer_index {
                outer_wire = Some(wire);
            } else {
                inner_wires.push(wire);
            }
        }

        let face = self.store.add_face(FaceData {
            surface,
            outer_wire,
            inner_wires,
            same_sense: step_face.same_sense,
        });
        self.faces.insert(id, face);
        Ok(face)
    }

    fn wire(&mut self, bound: &StepFaceBound) -> Result<WireId, StepError> {
        let step_loop = parse_loop(self.file, bound.loop_id)?;
        if step_loop.kind != "EDGE_LOOP" {
            warn!(entity = bound.loop_id, kind = %step_loop.kind, "face bound without edges");
        }

        let mut edges = Vec::with_capacity(step_loop.edge_ids.len());
        for &oe_id in &step_loop.edge_ids {
            let oriented = parse_oriented_edge(self.file, oe_id)?;
            edges.push(OrientedEdge::new(self.edge(oriented.edge_id)?, oriented.orientation));
        }

        Ok(self.store.add_wire(WireData {
            is_closed: !edges.is_empty(),
            edges,
            orientation: if bound.orientation {
                Orientation::Forward
            } else {
                Orientation::Reversed
            },
        }))
    }

    fn edge(&mut self, id: u64) -> Result<EdgeId, StepError> {
        if let Some(&edge) = self.edges.get(&id) {
            return Ok(edge);
        }
        let step_edge = parse_edge_curve(self.file, id)?;
        let (start, start_point) = self.vertex(step_edge.start_vertex_id)?;
        let (end, end_point) = self.vertex(step_edge.end_vertex_id)?;
        let curve = parse_edge_geometry(self.file, step_edge.curve_id)?;
        let (t_start, t_end) = edge_parameters(&curve, &start_point, &end_point, step_edge.same_sense)
            .map_err(geometry_error(id))?;

        let edge = self.store.add_edge(EdgeData {
            start,
            end,
            curve,
            t_start,
            t_end,
        });
        self.edges.insert(id, edge);
        Ok(edge)
    }

    fn vertex(&mut self, id: u64) -> Result<(VertexId, Point3), StepError> {
        if let Some(&cached) = self.vertices.get(&id) {
            return Ok(cached);
        }
        let point = parse_vertex_point(self.file, id)?;
        let vertex = self.store.add_vertex(VertexData::new(point));
        self.vertices.insert(id, (vertex, point));
        Ok((vertex, point))
    }
}

/// Curve parameters of an edge's start and end vertex.
///
/// Projections onto circles and ellipses land in `[0, 2π)`; the end is
/// shifted by a full turn so the range runs with the edge sense, which also
/// turns a closed conic edge into a full turn. A closed edge on any other
/// closed curve spans its whole domain.
fn edge_parameters(
    curve: &EdgeCurve,
    start: &Point3,
    end: &Point3,
    same_sense: bool,
) -> crate::error::Result<(f64, f64)> {
    if let EdgeCurve::Unsupported(_) = curve {
        return Ok((0.0, 0.0));
    }

    let t_start = curve.closest_parameter(start)?;
    let mut t_end = curve.closest_parameter(end)?;

    match curve {
        EdgeCurve::Circle(_) | EdgeCurve::Ellipse(_) => {
            if same_sense && t_end <= t_start + TOLERANCE {
                t_end += TAU;
            } else if !same_sense && t_end >= t_start - TOLERANCE {
                t_end -= TAU;
            }
            Ok((t_start, t_end))
        }
        _ if (start - end).norm() <= VERTEX_TOLERANCE && curve.is_closed() => {
            let domain = curve.domain();
            Ok(if same_sense {
                (domain.t_min, domain.t_max)
            } else {
                (domain.t_max, domain.t_min)
            })
        }
        _ => Ok((t_start, t_end)),
    }
}
