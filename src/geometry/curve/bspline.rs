use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A (possibly rational) B-spline curve with a clamped or unclamped knot vector.
///
/// Evaluation uses the basis-function derivative recurrence, so first and
/// second derivatives are exact rather than finite differences.
#[derive(Debug, Clone)]
pub struct BSplineCurve {
    degree: usize,
    control_points: Vec<Point3>,
    weights: Option<Vec<f64>>,
    knots: Vec<f64>,
}

impl BSplineCurve {
    /// Creates a B-spline from a fully expanded knot vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the degree is zero, there are too few control points,
    /// the knot vector length is not `control_points + degree + 1`, knots
    /// decrease, the weight count does not match, or a weight is not positive.
    pub fn new(
        degree: usize,
        control_points: Vec<Point3>,
        knots: Vec<f64>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        if degree == 0 {
            return Err(GeometryError::Degenerate("B-spline degree must be at least 1".into()).into());
        }
        if control_points.len() <= degree {
            return Err(GeometryError::Degenerate(format!(
                "B-spline of degree {degree} needs more than {degree} control points, got {}",
                control_points.len()
            ))
            .into());
        }
        let expected = control_points.len() + degree + 1;
        if knots.len() != expected {
            return Err(GeometryError::Degenerate(format!(
                "invalid knot vector length: expected {expected}, got {}",
                knots.len()
            ))
            .into());
        }
        if knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(GeometryError::Degenerate("knot vector must be non-decreasing".into()).into());
        }
        if let Some(w) = &weights {
            if w.len() != control_points.len() {
                return Err(GeometryError::Degenerate(
                    "weight count must match control point count".into(),
                )
                .into());
            }
            if w.iter().any(|&wi| wi <= 0.0) {
                return Err(GeometryError::Degenerate("weights must be positive".into()).into());
            }
        }
        let curve = Self {
            degree,
            control_points,
            weights,
            knots,
        };
        let domain = curve.domain();
        if domain.t_max - domain.t_min < TOLERANCE {
            return Err(GeometryError::Degenerate("B-spline has an empty domain".into()).into());
        }
        Ok(curve)
    }

    /// Creates a B-spline from distinct knots and their multiplicities,
    /// the form used by `B_SPLINE_CURVE_WITH_KNOTS`.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot and multiplicity lists differ in length,
    /// if the multiplicities do not sum to `control_points + degree + 1`,
    /// or if [`BSplineCurve::new`] rejects the expanded curve.
    pub fn from_multiplicities(
        degree: usize,
        control_points: Vec<Point3>,
        multiplicities: &[usize],
        knots: &[f64],
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        if multiplicities.len() != knots.len() {
            return Err(GeometryError::Degenerate(
                "knot and multiplicity lists differ in length".into(),
            )
            .into());
        }
        let expected = control_points.len() + degree + 1;
        let total = multiplicities
            .iter()
            .try_fold(0usize, |sum, &m| sum.checked_add(m));
        if total != Some(expected) {
            return Err(GeometryError::Degenerate(format!(
                "knot multiplicities must sum to {expected}, got {}",
                total.map_or_else(|| "an overflowing count".to_owned(), |t| t.to_string())
            ))
            .into());
        }
        let expanded = knots
            .iter()
            .zip(multiplicities)
            .flat_map(|(&k, &m)| std::iter::repeat_n(k, m))
            .collect();
        Self::new(degree, control_points, expanded, weights)
    }

    /// Returns the polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns `true` if the curve carries weights.
    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    fn weight(&self, i: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[i])
    }

    /// Index of the knot span containing `t`.
    fn find_span(&self, t: f64) -> usize {
        let n = self.control_points.len() - 1;
        let p = self.degree;
        if t >= self.knots[n + 1] {
            return n;
        }
        if t <= self.knots[p] {
            return p;
        }
        let (mut low, mut high) = (p, n + 1);
        let mut mid = (low + high) / 2;
        while t < self.knots[mid] || t >= self.knots[mid + 1] {
            if t < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        mid
    }

    /// Non-zero basis functions and their derivatives up to `order` at `t`.
    ///
    /// `ders[k][j]` is the k-th derivative of `N_{span - p + j, p}`.
    #[allow(clippy::many_single_char_names, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn basis_derivatives(&self, span: usize, t: f64, order: usize) -> Vec<Vec<f64>> {
        let p = self.degree;
        let u = &self.knots;
        let n = order.min(p);

        let mut ndu = vec![vec![0.0; p + 1]; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];
        ndu[0][0] = 1.0;
        for j in 1..=p {
            left[j] = t - u[span + 1 - j];
            right[j] = u[span + j] - t;
            let mut saved = 0.0;
            for r in 0..j {
                ndu[j][r] = right[r + 1] + left[j - r];
                let temp = ndu[r][j - 1] / ndu[j][r];
                ndu[r][j] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            ndu[j][j] = saved;
        }

        let mut ders = vec![vec![0.0; p + 1]; order + 1];
        for j in 0..=p {
            ders[0][j] = ndu[j][p];
        }

        let mut a = vec![vec![0.0; p + 1]; 2];
        for r in 0..=p {
            let (mut s1, mut s2) = (0, 1);
            a[0][0] = 1.0;
            for k in 1..=n {
                let mut d = 0.0;
                let rk = r as isize - k as isize;
                let pk = p - k;
                if r >= k {
                    let rk = rk as usize;
                    a[s2][0] = a[s1][0] / ndu[pk + 1][rk];
                    d = a[s2][0] * ndu[rk][pk];
                }
                let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
                let j2 = if r as isize - 1 <= pk as isize { k - 1 } else { p - r };
                for j in j1..=j2 {
                    let idx = (rk + j as isize) as usize;
                    a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][idx];
                    d += a[s2][j] * ndu[idx][pk];
                }
                if r <= pk {
                    a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                    d += a[s2][k] * ndu[r][pk];
                }
                ders[k][r] = d;
                std::mem::swap(&mut s1, &mut s2);
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let mut factor = p as f64;
        for k in 1..=n {
            for value in &mut ders[k] {
                *value *= factor;
            }
            #[allow(clippy::cast_precision_loss)]
            {
                factor *= (p - k) as f64;
            }
        }
        ders
    }

    /// Position, first and second derivative at `t`.
    fn derivatives(&self, t: f64) -> Result<[Vector3; 3]> {
        if !t.is_finite() {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: self.domain().t_min,
                max: self.domain().t_max,
            }
            .into());
        }
        let t = self.domain().clamp(t);
        let span = self.find_span(t);
        let ders = self.basis_derivatives(span, t, 2);

        // Homogeneous sums: A^(k) = sum N^(k) w P, W^(k) = sum N^(k) w
        let mut a = [Vector3::zeros(); 3];
        let mut w = [0.0; 3];
        for j in 0..=self.degree {
            let idx = span - self.degree + j;
            let wi = self.weight(idx);
            let pw = self.control_points[idx].coords * wi;
            for k in 0..3 {
                a[k] += pw * ders[k][j];
                w[k] += wi * ders[k][j];
            }
        }

        if w[0].abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("rational B-spline weight sum is zero".into()).into());
        }
        let c0 = a[0] / w[0];
        let c1 = (a[1] - c0 * w[1]) / w[0];
        let c2 = (a[2] - c1 * (2.0 * w[1]) - c0 * w[2]) / w[0];
        Ok([c0, c1, c2])
    }
}

impl Curve for BSplineCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let [c0, _, _] = self.derivatives(t)?;
        Ok(Point3::from(c0))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        let [_, c1, _] = self.derivatives(t)?;
        Ok(c1)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        let [_, _, c2] = self.derivatives(t)?;
        Ok(c2)
    }

    fn domain(&self) -> CurveDomain {
        let n = self.control_points.len();
        CurveDomain::new(self.knots[self.degree], self.knots[n])
    }

    fn is_closed(&self) -> bool {
        match (self.control_points.first(), self.control_points.last()) {
            (Some(first), Some(last)) => (first - last).norm() < 1e-7,
            _ => false,
        }
    }
}
