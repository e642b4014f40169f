//! Reads planar single-face STEP models and discretizes their boundary
//! wires into 1D meshes written as VTK polydata.

pub mod error;
pub mod export;
pub mod geometry;
pub mod math;
pub mod model;
pub mod operations;
pub mod step;
pub mod tessellation;
pub mod topology;

pub use error::{QueryCadError, Result};
pub use model::{PlanarModel, QueryCad};
