pub mod curve;
pub mod surface;

pub use curve::{BSplineCurve, Circle, Curve, CurveDomain, Ellipse, Line};
pub use surface::Plane;
