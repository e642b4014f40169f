use std::fmt;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use tracing::info;

use crate::error::ExportError;
use crate::math::{Point3, Vector3, TOLERANCE};

const TITLE: &str = "1D Mesh generated by QueryCAD2";

/// Writes a 1D mesh as a legacy ASCII VTK `POLYDATA` file.
///
/// Points and two-point lines are always written. When derivatives are
/// supplied, a `NORMALS` point-data block follows, holding the in-plane
/// normal of each tangent (see [`normal_from_derivative`]).
pub struct VtkWriter<'a> {
    vertices: &'a [Point3],
    segments: &'a [[usize; 2]],
    derivatives: Option<&'a [Vector3]>,
}

impl<'a> VtkWriter<'a> {
    #[must_use]
    pub fn new(vertices: &'a [Point3], segments: &'a [[usize; 2]]) -> Self {
        Self {
            vertices,
            segments,
            derivatives: None,
        }
    }

    /// Adds per-vertex first derivatives, used to emit normals.
    #[must_use]
    pub fn with_derivatives(mut self, d1: &'a [Vector3]) -> Self {
        self.derivatives = Some(d1);
        self
    }

    /// Renders the whole document.
    #[must_use]
    pub fn to_vtk_string(&self) -> String {
        self.to_string()
    }

    /// Renders the document and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::FileOpen`] if the file cannot be created and
    /// [`ExportError::Io`] if writing fails.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let text = self.to_vtk_string();
        let mut file = File::create(path).map_err(|source| ExportError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        info!("VTK file written to: {}", path.display());
        Ok(())
    }
}

impl fmt::Display for VtkWriter<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "# vtk DataFile Version 3.0")?;
        writeln!(out, "{TITLE}")?;
        writeln!(out, "ASCII")?;
        writeln!(out, "DATASET POLYDATA")?;

        writeln!(out, "POINTS {} float", self.vertices.len())?;
        for p in self.vertices {
            writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
        }

        writeln!(out, "LINES {} {}", self.segments.len(), 3 * self.segments.len())?;
        for [a, b] in self.segments {
            writeln!(out, "2 {a} {b}")?;
        }

        if let Some(d1) = self.derivatives {
            writeln!(out, "POINT_DATA {}", self.vertices.len())?;
            writeln!(out, "NORMALS Normals float")?;
            for d in d1 {
                let n = normal_from_derivative(d);
                writeln!(out, "{} {} {}", n.x, n.y, n.z)?;
            }
        }
        Ok(())
    }
}

/// In-plane normal of a tangent: `(d.y, -d.x, d.z) / |d|`.
///
/// A tangent shorter than [`TOLERANCE`] gives `(0, 0, 1)`.
#[must_use]
pub fn normal_from_derivative(d1: &Vector3) -> Vector3 {
    let norm = d1.norm();
    if norm <= TOLERANCE {
        return Vector3::z();
    }
    Vector3::new(d1.y, -d1.x, d1.z) / norm
}
