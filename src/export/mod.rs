//! Mesh output formats.

mod vtk;

pub use vtk::{normal_from_derivative, VtkWriter};
