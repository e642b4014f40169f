use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::math::{Point3, Vector3};
use crate::topology::EdgeData;

/// Gauss-Legendre nodes on [-1, 1].
const GAUSS_NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683,
    0.0,
    0.538_469_310_105_683,
    0.906_179_845_938_664,
];

/// Gauss-Legendre weights matching [`GAUSS_NODES`].
const GAUSS_WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189,
    0.478_628_670_499_366,
    0.568_888_888_888_889,
    0.478_628_670_499_366,
    0.236_926_885_056_189,
];

/// Number of integration panels used across the full adaptor range.
const LENGTH_PANELS: f64 = 64.0;

/// A view of a curve restricted to `[a, b]` and re-parameterized in the
/// direction of travel.
///
/// The local parameter `s` runs from 0 to `|b - a|` and maps to
/// `t = a + sign * s` on the underlying curve. When the range is traversed
/// backwards the first derivative is negated; the second is unchanged.
pub struct CurveAdaptor<'a> {
    curve: &'a dyn Curve,
    origin: f64,
    sign: f64,
    span: f64,
}

impl<'a> CurveAdaptor<'a> {
    /// Adapts `curve` for travel from parameter `a` to parameter `b`.
    #[must_use]
    pub fn new(curve: &'a dyn Curve, a: f64, b: f64) -> Self {
        Self {
            curve,
            origin: a,
            sign: if b < a { -1.0 } else { 1.0 },
            span: (b - a).abs(),
        }
    }

    /// Adapts an edge for travel in the direction it is used in its wire.
    #[must_use]
    pub fn from_edge(edge: &'a EdgeData, forward: bool) -> Self {
        let (a, b) = if forward {
            (edge.t_start, edge.t_end)
        } else {
            (edge.t_end, edge.t_start)
        };
        Self::new(&edge.curve, a, b)
    }

    /// Length of the local parameter range.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.span
    }

    fn curve_parameter(&self, s: f64) -> f64 {
        self.origin + self.sign * s
    }

    /// Point at local parameter `s`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn point(&self, s: f64) -> Result<Point3> {
        self.curve.evaluate(self.curve_parameter(s))
    }

    /// First derivative with respect to the local parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn d1(&self, s: f64) -> Result<Vector3> {
        Ok(self.curve.derivative(self.curve_parameter(s))? * self.sign)
    }

    /// Second derivative with respect to the local parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn d2(&self, s: f64) -> Result<Vector3> {
        self.curve.second_derivative(self.curve_parameter(s))
    }

    /// Arc length between local parameters `s0` and `s1` (signed).
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn length_between(&self, s0: f64, s1: f64) -> Result<f64> {
        let width = s1 - s0;
        if width == 0.0 || self.span == 0.0 {
            return Ok(0.0);
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let panels = ((width.abs() / self.span * LENGTH_PANELS).ceil() as usize).clamp(1, LENGTH_PANELS as usize);
        #[allow(clippy::cast_precision_loss)]
        let h = width / panels as f64;

        let mut total = 0.0;
        for panel in 0..panels {
            #[allow(clippy::cast_precision_loss)]
            let mid = s0 + h * (panel as f64 + 0.5);
            for (node, weight) in GAUSS_NODES.iter().zip(GAUSS_WEIGHTS) {
                total += weight * self.d1(mid + 0.5 * h * node)?.norm();
            }
        }
        Ok(total * 0.5 * h)
    }

    /// Arc length of the whole adapted range.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn length(&self) -> Result<f64> {
        self.length_between(0.0, self.span)
    }
}
