use std::path::Path;

use tracing::{error, info};

use crate::error::{LoadError, MeshError, Result};
use crate::export::VtkWriter;
use crate::tessellation::{DiscretizationParams, TessellateWires, WireMesh};

use super::PlanarModel;

/// A loaded STEP file together with its most recent 1D mesh.
///
/// Opening never fails: a file that does not describe a valid planar model
/// produces an invalid session whose [`QueryCad::load_error`] tells why.
#[derive(Debug)]
pub struct QueryCad {
    model: std::result::Result<PlanarModel, LoadError>,
    mesh: Option<WireMesh>,
}

impl QueryCad {
    /// Loads and validates the STEP file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let model = PlanarModel::load(path);
        if let Err(err) = &model {
            error!(path = %path.display(), "{err}");
        }
        Self { model, mesh: None }
    }

    /// Returns `true` if the file is a valid planar single-face model.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.model.is_ok()
    }

    #[must_use]
    pub fn model(&self) -> Option<&PlanarModel> {
        self.model.as_ref().ok()
    }

    /// Why the model was rejected, if it was.
    #[must_use]
    pub fn load_error(&self) -> Option<&LoadError> {
        self.model.as_ref().err()
    }

    /// The mesh built by the last successful [`QueryCad::discretize`].
    #[must_use]
    pub fn mesh(&self) -> Option<&WireMesh> {
        self.mesh.as_ref()
    }

    /// Discretizes the boundary wires with sample spacing `step`,
    /// replacing any previous mesh.
    ///
    /// A failed call leaves the session without a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidModel`] for an invalid session, otherwise
    /// any error of [`TessellateWires::execute`].
    pub fn discretize(&mut self, step: f64) -> std::result::Result<&WireMesh, MeshError> {
        self.mesh = None;
        let model = self.model.as_ref().map_err(|_| MeshError::InvalidModel)?;
        let mesh = TessellateWires::new(DiscretizationParams::with_step(step)).execute(model)?;
        info!(
            vertices = mesh.vertices.len(),
            segments = mesh.segments.len(),
            "1D mesh computed"
        );
        Ok(self.mesh.insert(mesh))
    }

    /// Writes the current mesh as legacy VTK polydata.
    ///
    /// Nothing is created on disk unless the session is valid and has a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidModel`] or [`MeshError::NotDiscretized`]
    /// before touching the file system, and an export error if the file
    /// cannot be written.
    pub fn write_vtk(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.model.is_err() {
            return Err(MeshError::InvalidModel.into());
        }
        let mesh = self.mesh.as_ref().ok_or(MeshError::NotDiscretized)?;
        VtkWriter::new(&mesh.vertices, &mesh.segments)
            .with_derivatives(&mesh.d1)
            .write(path)?;
        Ok(())
    }
}
