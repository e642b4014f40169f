//! The planar model and the session that drives it.

pub mod planar;
pub mod session;

pub use planar::PlanarModel;
pub use session::QueryCad;
