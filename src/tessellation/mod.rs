mod adaptor;
mod tessellate_wires;
mod uniform_abscissa;

pub use adaptor::CurveAdaptor;
pub use tessellate_wires::TessellateWires;
pub use uniform_abscissa::UniformAbscissa;

use std::ops::Range;

use crate::math::{Point3, Vector3};

/// Parameters controlling wire discretization.
#[derive(Debug, Clone, Copy)]
pub struct DiscretizationParams {
    /// Target arc length between consecutive samples.
    pub step: f64,
    /// Upper bound on samples for a single edge.
    pub max_points_per_edge: usize,
    /// Edges shorter than this are degenerate; also the arc-length
    /// accuracy when placing samples.
    pub tolerance: f64,
}

impl Default for DiscretizationParams {
    fn default() -> Self {
        Self {
            step: 0.01,
            max_points_per_edge: 1_000_000,
            tolerance: 1e-9,
        }
    }
}

impl DiscretizationParams {
    /// Default parameters with the given step length.
    #[must_use]
    pub fn with_step(step: f64) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }
}

/// A 1D mesh of the boundary wires of a face.
///
/// `d1[i]` and `d2[i]` are the first and second derivatives at `vertices[i]`,
/// already sign-corrected for the orientation of the wire they belong to.
/// Every wire forms one closed cycle of segments over the vertex range
/// `wire_ranges[w]`.
#[derive(Debug, Clone, Default)]
pub struct WireMesh {
    /// Sample positions, wire after wire.
    pub vertices: Vec<Point3>,
    /// Pairs of indices into `vertices`.
    pub segments: Vec<[usize; 2]>,
    /// First derivative at each vertex, along the direction of travel.
    pub d1: Vec<Vector3>,
    /// Second derivative at each vertex.
    pub d2: Vec<Vector3>,
    /// Vertex index range produced by each wire, in wire order.
    pub wire_ranges: Vec<Range<usize>>,
}

impl WireMesh {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Segments whose endpoints belong to wire `wire`, in emission order.
    pub fn wire_segments(&self, wire: usize) -> impl Iterator<Item = &[usize; 2]> + '_ {
        let range = self.wire_ranges.get(wire).cloned().unwrap_or(0..0);
        self.segments.iter().filter(move |s| range.contains(&s[0]))
    }
}
