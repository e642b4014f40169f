use std::path::Path;

use tracing::{info, warn};

use crate::error::LoadError;
use crate::step::{read_step, ImportedShape};
use crate::topology::{FaceId, FaceSurface, Shape, ShapeKind, TopologyStore, WireId};

/// A validated 2D model: exactly one face, no solids, and at least one
/// wire, each with at least one edge.
///
/// The only way to obtain one is through [`PlanarModel::load`] or
/// [`PlanarModel::from_shape`], which run every check.
#[derive(Debug)]
pub struct PlanarModel {
    store: TopologyStore,
    shape: Shape,
    face: FaceId,
    wires: Vec<WireId>,
}

impl PlanarModel {
    /// Reads a STEP file and validates it as a planar single-face model.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError`] encountered, in the order of the
    /// variants of that enum.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening STEP file");
        let ImportedShape { store, shape } = read_step(path)?;
        let model = Self::from_shape(store, shape)?;
        info!(
            wires = model.wires.len(),
            "Successfully loaded 2D STEP file with 1 surface and {} wireframes",
            model.wires.len()
        );
        Ok(model)
    }

    /// Validates an already imported shape.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NullShape`], [`LoadError::NotPlanar`],
    /// [`LoadError::NoSurface`], [`LoadError::MultipleSurfaces`],
    /// [`LoadError::NoWireframe`] or [`LoadError::EmptyWire`] when the
    /// corresponding check fails, and [`LoadError::Kernel`] on a dangling
    /// topology reference.
    pub fn from_shape(store: TopologyStore, shape: Shape) -> Result<Self, LoadError> {
        if shape.is_null() {
            return Err(LoadError::NullShape);
        }

        if store.explore(&shape, ShapeKind::Solid).next().transpose()?.is_some() {
            return Err(LoadError::NotPlanar);
        }

        let face = {
            let mut faces = store.explore(&shape, ShapeKind::Face);
            let Some(face) = faces.next().transpose()?.as_ref().and_then(Shape::as_face) else {
                return Err(LoadError::NoSurface);
            };
            // Short-circuit at the second face.
            if faces.next().is_some() {
                return Err(LoadError::MultipleSurfaces);
            }
            face
        };

        match &store.face(face)?.surface {
            FaceSurface::Plane(plane) if !plane.is_xy_aligned() => {
                warn!(
                    origin = ?plane.origin(),
                    normal = ?plane.normal(),
                    "planar face is not parallel to the XY plane"
                );
            }
            FaceSurface::Plane(_) => {}
            FaceSurface::Other(kind) => warn!(surface = %kind, "face surface is not a plane"),
        }

        let wires = store
            .explore(&Shape::Face(face), ShapeKind::Wire)
            .filter_map(|shape| shape.map(|s| s.as_wire()).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        if wires.is_empty() {
            return Err(LoadError::NoWireframe);
        }
        for (index, &wire) in wires.iter().enumerate() {
            if store.wire(wire)?.edges.is_empty() {
                return Err(LoadError::EmptyWire { wire: index });
            }
        }

        Ok(Self {
            store,
            shape,
            face,
            wires,
        })
    }

    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// Root shape of the imported file.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The single face of the model.
    #[must_use]
    pub fn face(&self) -> FaceId {
        self.face
    }

    /// Boundary wires of the face, outer bound first.
    #[must_use]
    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::step::{fixtures, read_step_from_buffer};
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Writes `text` to `name` inside a fresh temporary directory.
    pub(crate) fn write_fixture(name: &str, text: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        (dir, path)
    }

    pub(crate) fn model_from(text: &str) -> PlanarModel {
        let ImportedShape { store, shape } = read_step_from_buffer(text.as_bytes()).unwrap();
        PlanarModel::from_shape(store, shape).unwrap()
    }

    fn load_error(text: &str) -> LoadError {
        let (_dir, path) = write_fixture("model.step", text);
        PlanarModel::load(&path).unwrap_err()
    }

    #[test]
    fn square_is_a_valid_model() {
        let (_dir, path) = write_fixture("square.step", &fixtures::square(1.0));
        let model = PlanarModel::load(&path).unwrap();
        assert_eq!(model.wires().len(), 1);
        assert!(model.store().face(model.face()).is_ok());
        assert!(!model.shape().is_null());
    }

    #[test]
    fn hole_gives_two_wires_outer_first() {
        let model = model_from(&fixtures::square_with_hole());
        assert_eq!(model.wires().len(), 2);
        let outer = model.store().wire(model.wires()[0]).unwrap();
        assert_eq!(outer.edges.len(), 4);
    }

    #[test]
    fn outer_bound_comes_first_whatever_its_file_position() {
        let model = model_from(&fixtures::hole_listed_first());
        let edge_counts: Vec<usize> = model
            .wires()
            .iter()
            .map(|&w| model.store().wire(w).unwrap().edges.len())
            .collect();
        assert_eq!(edge_counts, vec![4, 1]);
    }

    #[test]
    fn rejections_follow_check_order() {
        assert!(matches!(load_error(&fixtures::with_solid()), LoadError::NotPlanar));
        assert!(matches!(load_error(&fixtures::two_faces()), LoadError::MultipleSurfaces));
        assert!(matches!(load_error(&fixtures::face_without_bounds()), LoadError::NoWireframe));
        assert!(matches!(load_error(&fixtures::no_faces()), LoadError::NullShape));
        assert!(matches!(load_error("not a step file"), LoadError::Import(_)));
    }

    #[test]
    fn shell_without_faces_has_no_surface() {
        let text = fixtures::no_faces().replace(
            "ENDSEC;\nEND-ISO",
            "#3 = OPEN_SHELL('', ());\n#4 = SHELL_BASED_SURFACE_MODEL('', (#3));\nENDSEC;\nEND-ISO",
        );
        assert!(matches!(load_error(&text), LoadError::NoSurface));
    }

    /// The unit square with its first edge's line swapped for a
    /// `SURFACE_CURVE` over `#9000`, defined by `extra` entities.
    fn square_with_curve(extra: &str) -> String {
        fixtures::square(1.0)
            .replacen("LINE('', ", "SURFACE_CURVE('', #9000, ", 1)
            .replace("ENDSEC;\nEND-ISO", &format!("{extra}\nENDSEC;\nEND-ISO"))
    }

    #[test]
    fn cyclic_curve_reference_is_an_import_error() {
        let text = square_with_curve("#9000 = SURFACE_CURVE('', #9000, (), .CURVE_3D.);");
        assert!(matches!(load_error(&text), LoadError::Import(_)));
    }

    #[test]
    fn oversized_knot_multiplicity_is_an_import_error() {
        let text = square_with_curve(
            "#9001 = CARTESIAN_POINT('', (0., 0., 0.));\n#9002 = CARTESIAN_POINT('', (1., 0., 0.));\n#9000 = B_SPLINE_CURVE_WITH_KNOTS('', 1, (#9001, #9002), .UNSPECIFIED., .F., .F., (2, 4000000000000), (0., 1.), .UNSPECIFIED.);",
        );
        assert!(matches!(load_error(&text), LoadError::Import(_)));
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlanarModel::load(dir.path().join("absent.step")).unwrap_err();
        assert!(matches!(err, LoadError::Import(_)));
        assert_eq!(err.to_string().split(':').next(), Some("failed to read STEP file"));
    }
}
