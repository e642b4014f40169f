use crate::error::Result;
use crate::tessellation::CurveAdaptor;
use crate::topology::{EdgeCurve, EdgeId, TopologyStore};

/// Computes the arc length of an edge between its two vertices.
pub struct Length {
    edge: EdgeId,
}

impl Length {
    /// Creates a new `Length` query.
    #[must_use]
    pub fn new(edge: EdgeId) -> Self {
        Self { edge }
    }

    /// Executes the query, returning the edge length.
    ///
    /// Lines use `|t_end - t_start|` directly; every other curve is
    /// integrated numerically.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found or its curve cannot be
    /// evaluated.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let edge = store.edge(self.edge)?;
        match &edge.curve {
            // Lines are parameterized by arc length.
            EdgeCurve::Line(_) => Ok((edge.t_end - edge.t_start).abs()),
            _ => CurveAdaptor::from_edge(edge, true).length(),
        }
    }
}
