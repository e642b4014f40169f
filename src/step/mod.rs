//! STEP (ISO 10303-21) import.
//!
//! Reading happens in three stages: [`lexer`] tokenizes the Part 21 text,
//! [`parser`] builds the raw entity graph, and the reader turns the B-rep
//! entities into a [`TopologyStore`] under a single root compound.

pub mod entities;
pub mod lexer;
pub mod parser;
mod reader;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::Path;

use tracing::debug;

use crate::error::StepError;
use crate::topology::{Shape, TopologyStore};

use parser::Parser;
use reader::StepReader;

/// Result of importing a STEP file: the topology arena and the root shape.
///
/// The root is always a [`Shape::Compound`]; it is empty (see
/// [`Shape::is_null`]) when the file holds no B-rep entities.
#[derive(Debug)]
pub struct ImportedShape {
    pub store: TopologyStore,
    pub shape: Shape,
}

/// Reads a STEP file from disk.
///
/// # Errors
///
/// Returns [`StepError::Io`] if the file cannot be read, or any lexer,
/// parser or geometry error raised while interpreting it.
pub fn read_step(path: impl AsRef<Path>) -> Result<ImportedShape, StepError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = data.len(), "read STEP file");
    read_step_from_buffer(&data)
}

/// Reads STEP data already held in memory.
///
/// # Errors
///
/// Returns any lexer, parser or geometry error raised while interpreting
/// the data.
pub fn read_step_from_buffer(data: &[u8]) -> Result<ImportedShape, StepError> {
    let file = Parser::parse(data)?;
    StepReader::new(&file).read()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Curve;
    use crate::topology::{EdgeCurve, FaceSurface, Orientation, ShapeKind};
    use approx::assert_relative_eq;

    fn count(imported: &ImportedShape, kind: ShapeKind) -> usize {
        imported.store.explore(&imported.shape, kind).count()
    }

    #[test]
    fn square_face_imports_one_face_with_four_edges() {
        let imported = read_step_from_buffer(fixtures::square(2.0).as_bytes()).unwrap();
        assert_eq!(count(&imported, ShapeKind::Solid), 0);
        assert_eq!(count(&imported, ShapeKind::Face), 1);
        assert_eq!(count(&imported, ShapeKind::Wire), 1);
        assert_eq!(count(&imported, ShapeKind::Edge), 4);

        let face = imported
            .store
            .explore(&imported.shape, ShapeKind::Face)
            .next()
            .unwrap()
            .unwrap()
            .as_face()
            .unwrap();
        let face = imported.store.face(face).unwrap();
        assert!(matches!(face.surface, FaceSurface::Plane(_)));

        let wire = imported.store.wire(face.outer_wire.unwrap()).unwrap();
        assert!(wire.is_closed);
        assert_eq!(wire.orientation, Orientation::Forward);
        let first = imported.store.edge(wire.edges[0].edge).unwrap();
        assert!(matches!(first.curve, EdgeCurve::Line(_)));
        assert_relative_eq!(first.t_start, 0.0, epsilon = 1e-12);
        assert_relative_eq!(first.t_end, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn hole_is_an_inner_wire_after_the_outer_one() {
        let imported = read_step_from_buffer(fixtures::square_with_hole().as_bytes()).unwrap();
        let wires: Vec<_> = imported
            .store
            .explore(&imported.shape, ShapeKind::Wire)
            .map(|w| imported.store.wire(w.unwrap().as_wire().unwrap()).unwrap().clone())
            .collect();
        assert_eq!(wires.len(), 2);
        assert_eq!(wires[0].edges.len(), 4);
        assert_eq!(wires[1].edges.len(), 1);

        let hole = imported.store.edge(wires[1].edges[0].edge).unwrap();
        assert!(matches!(hole.curve, EdgeCurve::Circle(_)));
        assert_relative_eq!((hole.t_end - hole.t_start).abs(), std::f64::consts::TAU, epsilon = 1e-9);
        let start = hole.curve.evaluate(hole.t_start).unwrap();
        assert_relative_eq!(start, imported.store.vertex(hole.start).unwrap().point, epsilon = 1e-9);
    }

    #[test]
    fn reversed_bound_gives_reversed_wire() {
        let imported = read_step_from_buffer(fixtures::reversed_square(1.0).as_bytes()).unwrap();
        let wire = imported
            .store
            .explore(&imported.shape, ShapeKind::Wire)
            .next()
            .unwrap()
            .unwrap()
            .as_wire()
            .unwrap();
        assert_eq!(imported.store.wire(wire).unwrap().orientation, Orientation::Reversed);
    }

    #[test]
    fn solid_and_extra_faces_are_kept() {
        let solid = read_step_from_buffer(fixtures::with_solid().as_bytes()).unwrap();
        assert_eq!(count(&solid, ShapeKind::Solid), 1);

        let two = read_step_from_buffer(fixtures::two_faces().as_bytes()).unwrap();
        assert_eq!(count(&two, ShapeKind::Face), 2);
    }

    #[test]
    fn file_without_brep_is_null() {
        let imported = read_step_from_buffer(fixtures::no_faces().as_bytes()).unwrap();
        assert!(imported.shape.is_null());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_step(dir.path().join("absent.step")).unwrap_err();
        assert!(matches!(err, StepError::Io(_)));
    }

    #[test]
    fn dangling_reference_is_reported() {
        let text = fixtures::square(1.0).replace("VERTEX_POINT('', #", "VERTEX_POINT('', #9");
        assert!(read_step_from_buffer(text.as_bytes()).is_err());
    }
}
