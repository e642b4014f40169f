//! Curve entities: lines, conics and B-spline curves.

use tracing::debug;

use crate::error::StepError;
use crate::geometry::curve::{BSplineCurve, Circle, Ellipse, Line};
use crate::step::parser::{StepEntity, StepFile};
use crate::topology::EdgeCurve;

use super::geometry::{parse_axis2_placement_3d, parse_cartesian_point, parse_vector};
use super::{geometry_error, EntityArgs};

/// Resolves the 3D geometry of an `EDGE_CURVE`.
///
/// `SURFACE_CURVE`, `SEAM_CURVE` and `TRIMMED_CURVE` are unwrapped to the
/// curve they carry; trimming comes from the edge vertices instead. Curve
/// kinds without a kernel counterpart become [`EdgeCurve::Unsupported`].
///
/// # Errors
///
/// Returns an error if a supported curve entity is malformed.
pub fn parse_edge_geometry(file: &StepFile, id: u64) -> Result<EdgeCurve, StepError> {
    let mut wrappers = Vec::new();
    let mut id = id;
    loop {
        if wrappers.contains(&id) {
            return Err(StepError::parser(Some(id), "cyclic reference"));
        }
        let entity = file.require(id)?;
        if entity.part("B_SPLINE_CURVE_WITH_KNOTS").is_some() {
            let curve = parse_bspline_curve(file, entity)?;
            debug!(entity = id, degree = curve.degree(), rational = curve.is_rational(), "read B-spline curve");
            return Ok(EdgeCurve::BSpline(curve));
        }
        return match entity.type_name.as_str() {
            "SURFACE_CURVE" | "SEAM_CURVE" | "TRIMMED_CURVE" => {
                wrappers.push(id);
                id = entity.entity_ref(1)?;
                continue;
            }
            "LINE" => parse_line(file, entity).map(EdgeCurve::Line),
            "CIRCLE" => parse_circle(file, entity).map(EdgeCurve::Circle),
            "ELLIPSE" => parse_ellipse(file, entity).map(EdgeCurve::Ellipse),
            other => {
                debug!(entity = id, kind = other, "curve kind is not supported");
                Ok(EdgeCurve::Unsupported(other.to_owned()))
            }
        };
    }
}

/// `LINE(name, pnt, dir)` where `dir` is a `VECTOR`.
fn parse_line(file: &StepFile, entity: &StepEntity) -> Result<Line, StepError> {
    let origin = parse_cartesian_point(file, entity.entity_ref(1)?)?;
    let direction = parse_vector(file, entity.entity_ref(2)?)?;
    Line::new(origin, direction).map_err(geometry_error(entity.id))
}

/// `CIRCLE(name, position, radius)`.
fn parse_circle(file: &StepFile, entity: &StepEntity) -> Result<Circle, StepError> {
    let placement = parse_axis2_placement_3d(file, entity.entity_ref(1)?)?;
    let radius = entity.real(2)?;
    Circle::new(placement.location, radius, placement.z_axis(), placement.x_axis())
        .map_err(geometry_error(entity.id))
}

/// `ELLIPSE(name, position, semi_axis_1, semi_axis_2)`.
fn parse_ellipse(file: &StepFile, entity: &StepEntity) -> Result<Ellipse, StepError> {
    let placement = parse_axis2_placement_3d(file, entity.entity_ref(1)?)?;
    let semi_axis_1 = entity.real(2)?;
    let semi_axis_2 = entity.real(3)?;
    Ellipse::new(
        placement.location,
        semi_axis_1,
        semi_axis_2,
        placement.z_axis(),
        placement.x_axis(),
    )
    .map_err(geometry_error(entity.id))
}

/// Reads a B-spline from either form:
///
/// - simple: `B_SPLINE_CURVE_WITH_KNOTS(name, degree, points, form, closed,
///   self_intersect, multiplicities, knots, knot_spec)`
/// - complex: `( B_SPLINE_CURVE(degree, points, ...)
///   B_SPLINE_CURVE_WITH_KNOTS(multiplicities, knots, knot_spec)
///   RATIONAL_B_SPLINE_CURVE(weights) ... )`
fn parse_bspline_curve(file: &StepFile, entity: &StepEntity) -> Result<BSplineCurve, StepError> {
    let (degree, point_ids, multiplicities, knots, weights) = if entity.is_complex() {
        let curve = entity
            .part("B_SPLINE_CURVE")
            .ok_or_else(|| StepError::parser(Some(entity.id), "complex B-spline lacks B_SPLINE_CURVE"))?;
        let with_knots = entity
            .part("B_SPLINE_CURVE_WITH_KNOTS")
            .ok_or_else(|| StepError::parser(Some(entity.id), "complex B-spline lacks knots"))?;
        let weights = entity
            .part("RATIONAL_B_SPLINE_CURVE")
            .map(|r| r.real_list(0))
            .transpose()?;
        (
            curve.integer(0)?,
            curve.entity_ref_list(1)?,
            with_knots.count_list(0)?,
            with_knots.real_list(1)?,
            weights,
        )
    } else {
        (
            entity.integer(1)?,
            entity.entity_ref_list(2)?,
            entity.count_list(6)?,
            entity.real_list(7)?,
            None,
        )
    };

    let degree = usize::try_from(degree)
        .map_err(|_| StepError::parser(Some(entity.id), format!("invalid B-spline degree {degree}")))?;
    let control_points = point_ids
        .into_iter()
        .map(|pid| parse_cartesian_point(file, pid))
        .collect::<Result<Vec<_>, _>>()?;

    BSplineCurve::from_multiplicities(degree, control_points, &multiplicities, &knots, weights)
        .map_err(geometry_error(entity.id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Curve;
    use crate::math::{Point3, Vector3};
    use crate::step::entities::tests::parse_data;
    use approx::assert_relative_eq;

    const FRAME: &str = "#1 = CARTESIAN_POINT('', (0., 0., 0.));\n#2 = DIRECTION('', (0., 0., 1.));\n#3 = DIRECTION('', (1., 0., 0.));\n#4 = AXIS2_PLACEMENT_3D('', #1, #2, #3);";

    #[test]
    fn line_through_surface_curve() {
        let file = parse_data(&format!(
            "{FRAME}\n#5 = VECTOR('', #3, 10.);\n#6 = LINE('', #1, #5);\n#7 = SURFACE_CURVE('', #6, (#99), .CURVE_3D.);"
        ));
        let EdgeCurve::Line(line) = parse_edge_geometry(&file, 7).unwrap() else {
            panic!("expected a line");
        };
        assert_relative_eq!(*line.direction(), Vector3::x());
    }

    #[test]
    fn circle_and_ellipse() {
        let file = parse_data(&format!(
            "{FRAME}\n#5 = CIRCLE('', #4, 2.);\n#6 = ELLIPSE('', #4, 3., 1.);"
        ));
        let circle = parse_edge_geometry(&file, 5).unwrap();
        assert_relative_eq!(circle.evaluate(0.0).unwrap(), Point3::new(2.0, 0.0, 0.0));
        let ellipse = parse_edge_geometry(&file, 6).unwrap();
        assert_relative_eq!(
            ellipse.evaluate(std::f64::consts::FRAC_PI_2).unwrap(),
            Point3::new(0.0, 1.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn simple_bspline() {
        let file = parse_data(
            "#1 = CARTESIAN_POINT('', (0., 0., 0.));\n#2 = CARTESIAN_POINT('', (1., 1., 0.));\n#3 = CARTESIAN_POINT('', (2., 0., 0.));\n#4 = B_SPLINE_CURVE_WITH_KNOTS('', 2, (#1, #2, #3), .UNSPECIFIED., .F., .F., (3, 3), (0., 1.), .UNSPECIFIED.);",
        );
        let EdgeCurve::BSpline(curve) = parse_edge_geometry(&file, 4).unwrap() else {
            panic!("expected a B-spline");
        };
        assert_eq!(curve.degree(), 2);
        assert!(!curve.is_rational());
        assert_relative_eq!(curve.evaluate(0.5).unwrap(), Point3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn rational_bspline_quarter_circle() {
        let w = std::f64::consts::FRAC_1_SQRT_2;
        let file = parse_data(&format!(
            "#1 = CARTESIAN_POINT('', (1., 0., 0.));\n#2 = CARTESIAN_POINT('', (1., 1., 0.));\n#3 = CARTESIAN_POINT('', (0., 1., 0.));\n#4 = ( BOUNDED_CURVE() B_SPLINE_CURVE(2, (#1, #2, #3), .CIRCULAR_ARC., .F., .F.) B_SPLINE_CURVE_WITH_KNOTS((3, 3), (0., 1.), .UNSPECIFIED.) CURVE() GEOMETRIC_REPRESENTATION_ITEM() RATIONAL_B_SPLINE_CURVE((1., {w}, 1.)) REPRESENTATION_ITEM('') );"
        ));
        let EdgeCurve::BSpline(curve) = parse_edge_geometry(&file, 4).unwrap() else {
            panic!("expected a B-spline");
        };
        assert!(curve.is_rational());
        let mid = curve.evaluate(0.5).unwrap();
        assert_relative_eq!((mid - Point3::origin()).norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unknown_curve_is_kept_as_unsupported() {
        let file = parse_data("#1 = HYPERBOLA('', #2, 1., 1.);");
        let curve = parse_edge_geometry(&file, 1).unwrap();
        assert!(matches!(curve, EdgeCurve::Unsupported(ref name) if name == "HYPERBOLA"));
    }

    #[test]
    fn self_referencing_surface_curve_is_rejected() {
        let file = parse_data("#1 = SURFACE_CURVE('', #2, (), .CURVE_3D.);\n#2 = SURFACE_CURVE('', #2, (), .CURVE_3D.);");
        let err = parse_edge_geometry(&file, 1).unwrap_err();
        assert!(err.to_string().contains("cyclic reference"));
    }

    #[test]
    fn huge_multiplicity_is_rejected_before_expansion() {
        let file = parse_data(
            "#1 = CARTESIAN_POINT('', (0., 0., 0.));\n#2 = CARTESIAN_POINT('', (1., 1., 0.));\n#3 = CARTESIAN_POINT('', (2., 0., 0.));\n#4 = B_SPLINE_CURVE_WITH_KNOTS('', 2, (#1, #2, #3), .UNSPECIFIED., .F., .F., (2, 4000000000000), (0., 1.), .UNSPECIFIED.);",
        );
        let err = parse_edge_geometry(&file, 4).unwrap_err();
        assert!(matches!(err, StepError::Geometry { entity_id: 4, .. }));
        assert!(err.to_string().contains("must sum to 6"));
    }

    #[test]
    fn degenerate_circle_reports_entity() {
        let file = parse_data(&format!("{FRAME}\n#5 = CIRCLE('', #4, 0.);"));
        let err = parse_edge_geometry(&file, 5).unwrap_err();
        assert!(matches!(err, StepError::Geometry { entity_id: 5, .. }));
    }
}
