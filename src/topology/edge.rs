use crate::error::{GeometryError, Result};
use crate::geometry::curve::{BSplineCurve, Circle, Curve, CurveDomain, Ellipse, Line};
use crate::math::{Point3, Vector3};

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// The geometric curve associated with an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    /// A straight line.
    Line(Line),
    /// A full circle, trimmed by the edge parameters.
    Circle(Circle),
    /// A full ellipse, trimmed by the edge parameters.
    Ellipse(Ellipse),
    /// A (rational) B-spline curve.
    BSpline(BSplineCurve),
    /// A curve kind the importer does not model; carries the entity name.
    ///
    /// Every evaluation fails, so discretizing such an edge reports which
    /// entity was responsible.
    Unsupported(String),
}

impl EdgeCurve {
    fn unsupported(name: &str) -> crate::error::QueryCadError {
        GeometryError::UnsupportedCurve(name.to_owned()).into()
    }
}

impl Curve for EdgeCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        match self {
            Self::Line(c) => c.evaluate(t),
            Self::Circle(c) => c.evaluate(t),
            Self::Ellipse(c) => c.evaluate(t),
            Self::BSpline(c) => c.evaluate(t),
            Self::Unsupported(name) => Err(Self::unsupported(name)),
        }
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        match self {
            Self::Line(c) => c.derivative(t),
            Self::Circle(c) => c.derivative(t),
            Self::Ellipse(c) => c.derivative(t),
            Self::BSpline(c) => c.derivative(t),
            Self::Unsupported(name) => Err(Self::unsupported(name)),
        }
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        match self {
            Self::Line(c) => c.second_derivative(t),
            Self::Circle(c) => c.second_derivative(t),
            Self::Ellipse(c) => c.second_derivative(t),
            Self::BSpline(c) => c.second_derivative(t),
            Self::Unsupported(name) => Err(Self::unsupported(name)),
        }
    }

    fn domain(&self) -> CurveDomain {
        match self {
            Self::Line(c) => c.domain(),
            Self::Circle(c) => c.domain(),
            Self::Ellipse(c) => c.domain(),
            Self::BSpline(c) => c.domain(),
            Self::Unsupported(_) => CurveDomain::new(0.0, 0.0),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Self::Line(c) => c.is_closed(),
            Self::Circle(c) => c.is_closed(),
            Self::Ellipse(c) => c.is_closed(),
            Self::BSpline(c) => c.is_closed(),
            Self::Unsupported(_) => false,
        }
    }

    fn closest_parameter(&self, point: &Point3) -> Result<f64> {
        match self {
            Self::Line(c) => c.closest_parameter(point),
            Self::Circle(c) => c.closest_parameter(point),
            Self::Ellipse(c) => c.closest_parameter(point),
            Self::BSpline(c) => c.closest_parameter(point),
            Self::Unsupported(name) => Err(Self::unsupported(name)),
        }
    }
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices and carries a geometric curve
/// that defines the shape of the edge between them. The edge runs from
/// `t_start` to `t_end` on its curve; `t_end < t_start` means the edge
/// follows the curve backwards.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The geometric curve defining this edge's shape.
    pub curve: EdgeCurve,
    /// Parameter on the curve corresponding to the start vertex.
    pub t_start: f64,
    /// Parameter on the curve corresponding to the end vertex.
    pub t_end: f64,
}
