use tracing::debug;

use crate::error::MeshError;
use crate::model::PlanarModel;

use super::{CurveAdaptor, DiscretizationParams, UniformAbscissa, WireMesh};

/// Discretizes every boundary wire of a [`PlanarModel`] into a closed
/// polyline.
///
/// Each edge is sampled uniformly by arc length in the direction it is
/// traversed, dropping its last sample (which is the first sample of the
/// next edge). Every wire therefore becomes one cycle whose segment count
/// equals its vertex count.
pub struct TessellateWires {
    params: DiscretizationParams,
}

impl TessellateWires {
    #[must_use]
    pub fn new(params: DiscretizationParams) -> Self {
        Self { params }
    }

    /// Builds a fresh mesh for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidStep`] if the step is not finite and
    /// positive, and [`MeshError::Discretization`] naming the wire and edge
    /// that could not be sampled.
    pub fn execute(&self, model: &PlanarModel) -> Result<WireMesh, MeshError> {
        let step = self.params.step;
        if !step.is_finite() || step <= 0.0 {
            return Err(MeshError::InvalidStep(step));
        }

        let store = model.store();
        let sampler = UniformAbscissa::with_params(self.params);
        let mut mesh = WireMesh::default();

        for (wire_index, &wire_id) in model.wires().iter().enumerate() {
            let wire = store.wire(wire_id)?;
            let first = mesh.vertices.len();

            for (edge_index, oriented) in wire.edges.iter().enumerate() {
                let failed = |reason: String| MeshError::Discretization {
                    wire: wire_index,
                    edge: edge_index,
                    reason,
                };
                let edge = store.edge(oriented.edge)?;
                let adaptor = CurveAdaptor::from_edge(edge, oriented.forward);
                let params = sampler.execute(&adaptor).map_err(|e| failed(e.to_string()))?;

                let Some((_, interior)) = params.split_last() else {
                    continue;
                };
                for &s in interior {
                    let point = adaptor.point(s).map_err(|e| failed(e.to_string()))?;
                    let d1 = adaptor.d1(s).map_err(|e| failed(e.to_string()))?;
                    let d2 = adaptor.d2(s).map_err(|e| failed(e.to_string()))?;

                    let index = mesh.vertices.len();
                    mesh.vertices.push(point);
                    mesh.d1.push(wire.orientation.correct(d1));
                    mesh.d2.push(wire.orientation.correct(d2));
                    if index > first {
                        mesh.segments.push([index - 1, index]);
                    }
                }
                debug!(wire = wire_index, edge = edge_index, samples = interior.len(), "sampled edge");
            }

            let end = mesh.vertices.len();
            if end > first {
                mesh.segments.push([end - 1, first]);
            }
            mesh.wire_ranges.push(first..end);
            debug!(wire = wire_index, vertices = end - first, "discretized wire");
        }

        Ok(mesh)
    }
}
