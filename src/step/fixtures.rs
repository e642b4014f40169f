//! Small STEP documents for tests, generated so ids stay consistent.

/// Accumulates data section entities with increasing ids.
#[derive(Default)]
pub(crate) struct StepText {
    lines: Vec<String>,
}

impl StepText {
    pub(crate) fn add(&mut self, body: impl AsRef<str>) -> u64 {
        self.lines.push(body.as_ref().to_owned());
        self.lines.len() as u64
    }

    pub(crate) fn point(&mut self, x: f64, y: f64, z: f64) -> u64 {
        self.add(format!("CARTESIAN_POINT('', ({x:?}, {y:?}, {z:?}))"))
    }

    pub(crate) fn direction(&mut self, x: f64, y: f64, z: f64) -> u64 {
        self.add(format!("DIRECTION('', ({x:?}, {y:?}, {z:?}))"))
    }

    pub(crate) fn placement(&mut self, x: f64, y: f64, z: f64) -> u64 {
        let origin = self.point(x, y, z);
        let axis = self.direction(0.0, 0.0, 1.0);
        let ref_dir = self.direction(1.0, 0.0, 0.0);
        self.add(format!("AXIS2_PLACEMENT_3D('', #{origin}, #{axis}, #{ref_dir})"))
    }

    pub(crate) fn vertex(&mut self, x: f64, y: f64, z: f64) -> u64 {
        let p = self.point(x, y, z);
        self.add(format!("VERTEX_POINT('', #{p})"))
    }

    /// Closed polygon in the z = 0 plane, one line edge per side.
    pub(crate) fn polygon_loop(&mut self, corners: &[(f64, f64)]) -> u64 {
        let vertices: Vec<u64> = corners.iter().map(|&(x, y)| self.vertex(x, y, 0.0)).collect();
        let mut oriented = Vec::new();
        for i in 0..corners.len() {
            let j = (i + 1) % corners.len();
            let (x0, y0) = corners[i];
            let (x1, y1) = corners[j];
            let len = (x1 - x0).hypot(y1 - y0);
            let origin = self.point(x0, y0, 0.0);
            let dir = self.direction((x1 - x0) / len, (y1 - y0) / len, 0.0);
            let vector = self.add(format!("VECTOR('', #{dir}, {len:?})"));
            let line = self.add(format!("LINE('', #{origin}, #{vector})"));
            let edge = self.add(format!(
                "EDGE_CURVE('', #{}, #{}, #{line}, .T.)",
                vertices[i], vertices[j]
            ));
            oriented.push(self.add(format!("ORIENTED_EDGE('', *, *, #{edge}, .T.)")));
        }
        self.edge_loop(&oriented)
    }

    /// Full circle in the z = 0 plane as a single closed edge.
    pub(crate) fn circle_loop(&mut self, cx: f64, cy: f64, radius: f64) -> u64 {
        let v = self.vertex(cx + radius, cy, 0.0);
        let placement = self.placement(cx, cy, 0.0);
        let circle = self.add(format!("CIRCLE('', #{placement}, {radius:?})"));
        let edge = self.add(format!("EDGE_CURVE('', #{v}, #{v}, #{circle}, .T.)"));
        let oriented = self.add(format!("ORIENTED_EDGE('', *, *, #{edge}, .T.)"));
        self.edge_loop(&[oriented])
    }

    fn edge_loop(&mut self, oriented: &[u64]) -> u64 {
        self.add(format!("EDGE_LOOP('', ({}))", refs(oriented)))
    }

    /// Face on the XY plane; each bound is `(loop, is_outer, orientation)`.
    pub(crate) fn planar_face(&mut self, bounds: &[(u64, bool, bool)]) -> u64 {
        let placement = self.placement(0.0, 0.0, 0.0);
        let plane = self.add(format!("PLANE('', #{placement})"));
        let bound_ids: Vec<u64> = bounds
            .iter()
            .map(|&(lp, outer, orientation)| {
                let kind = if outer { "FACE_OUTER_BOUND" } else { "FACE_BOUND" };
                self.add(format!("{kind}('', #{lp}, {})", logical(orientation)))
            })
            .collect();
        self.add(format!("ADVANCED_FACE('', ({}), #{plane}, .T.)", refs(&bound_ids)))
    }

    /// Wraps faces in an open shell inside a surface model.
    pub(crate) fn surface_model(&mut self, faces: &[u64]) -> u64 {
        let shell = self.add(format!("OPEN_SHELL('', ({}))", refs(faces)));
        self.add(format!("SHELL_BASED_SURFACE_MODEL('', (#{shell}))"))
    }

    /// Wraps faces in a closed shell inside a solid.
    pub(crate) fn solid(&mut self, faces: &[u64]) -> u64 {
        let shell = self.add(format!("CLOSED_SHELL('', ({}))", refs(faces)));
        self.add(format!("MANIFOLD_SOLID_BREP('', #{shell})"))
    }

    pub(crate) fn finish(&self) -> String {
        let mut out = String::from(
            "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION(('test'),'2;1');\nFILE_NAME('test.step','2024-01-01T00:00:00',(''),(''),'','','');\nFILE_SCHEMA(('AUTOMOTIVE_DESIGN'));\nENDSEC;\nDATA;\n",
        );
        for (i, line) in self.lines.iter().enumerate() {
            out.push_str(&format!("#{} = {line};\n", i + 1));
        }
        out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
        out
    }
}

fn refs(ids: &[u64]) -> String {
    ids.iter().map(|id| format!("#{id}")).collect::<Vec<_>>().join(", ")
}

fn logical(value: bool) -> &'static str {
    if value {
        ".T."
    } else {
        ".F."
    }
}

fn square_corners(side: f64) -> [(f64, f64); 4] {
    [(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]
}

/// Axis-aligned square face with its corner at the origin.
pub(crate) fn square(side: f64) -> String {
    let mut b = StepText::default();
    let lp = b.polygon_loop(&square_corners(side));
    let face = b.planar_face(&[(lp, true, true)]);
    b.surface_model(&[face]);
    b.finish()
}

/// Same square, but bounded with orientation `.F.`.
pub(crate) fn reversed_square(side: f64) -> String {
    let mut b = StepText::default();
    let lp = b.polygon_loop(&square_corners(side));
    let face = b.planar_face(&[(lp, true, false)]);
    b.surface_model(&[face]);
    b.finish()
}

/// 4 x 4 square with a circular hole of radius 1 at its center.
pub(crate) fn square_with_hole() -> String {
    let mut b = StepText::default();
    let outer = b.polygon_loop(&square_corners(4.0));
    let hole = b.circle_loop(2.0, 2.0, 1.0);
    let face = b.planar_face(&[(outer, true, true), (hole, false, false)]);
    b.surface_model(&[face]);
    b.finish()
}

/// The 4 x 4 square with its hole, but the hole bound is listed first.
pub(crate) fn hole_listed_first() -> String {
    let mut b = StepText::default();
    let outer = b.polygon_loop(&square_corners(4.0));
    let hole = b.circle_loop(2.0, 2.0, 1.0);
    let face = b.planar_face(&[(hole, false, false), (outer, true, true)]);
    b.surface_model(&[face]);
    b.finish()
}

/// Half disc of radius 1 centered at (1, 0), traversed counterclockwise
/// from (0, 0), where both edges are stored against the direction of
/// travel:
///
/// - the diameter is an `EDGE_CURVE` from (2, 0) to (0, 0) used with `.F.`;
/// - the arc is an `EDGE_CURVE` from (0, 0) to (2, 0) with `same_sense`
///   `.F.` on a counterclockwise circle, also used with `.F.`.
pub(crate) fn reversed_edges() -> String {
    let mut b = StepText::default();
    let left = b.vertex(0.0, 0.0, 0.0);
    let right = b.vertex(2.0, 0.0, 0.0);

    let origin = b.point(2.0, 0.0, 0.0);
    let dir = b.direction(-1.0, 0.0, 0.0);
    let vector = b.add(format!("VECTOR('', #{dir}, 2.0)"));
    let line = b.add(format!("LINE('', #{origin}, #{vector})"));
    let diameter = b.add(format!("EDGE_CURVE('', #{right}, #{left}, #{line}, .T.)"));

    let placement = b.placement(1.0, 0.0, 0.0);
    let circle = b.add(format!("CIRCLE('', #{placement}, 1.0)"));
    let arc = b.add(format!("EDGE_CURVE('', #{left}, #{right}, #{circle}, .F.)"));

    let first = b.add(format!("ORIENTED_EDGE('', *, *, #{diameter}, .F.)"));
    let second = b.add(format!("ORIENTED_EDGE('', *, *, #{arc}, .F.)"));
    let lp = b.edge_loop(&[first, second]);
    let face = b.planar_face(&[(lp, true, true)]);
    b.surface_model(&[face]);
    b.finish()
}

/// Two separate square faces in one surface model.
pub(crate) fn two_faces() -> String {
    let mut b = StepText::default();
    let first = b.polygon_loop(&square_corners(1.0));
    let f1 = b.planar_face(&[(first, true, true)]);
    let second = b.polygon_loop(&[(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)]);
    let f2 = b.planar_face(&[(second, true, true)]);
    b.surface_model(&[f1, f2]);
    b.finish()
}

/// A single square face wrapped as a (degenerate) solid.
pub(crate) fn with_solid() -> String {
    let mut b = StepText::default();
    let lp = b.polygon_loop(&square_corners(1.0));
    let face = b.planar_face(&[(lp, true, true)]);
    b.solid(&[face]);
    b.finish()
}

/// A face with no bounds at all.
pub(crate) fn face_without_bounds() -> String {
    let mut b = StepText::default();
    b.planar_face(&[]);
    b.finish()
}

/// Geometry only, no B-rep entities.
pub(crate) fn no_faces() -> String {
    let mut b = StepText::default();
    b.point(0.0, 0.0, 0.0);
    b.direction(0.0, 0.0, 1.0);
    b.finish()
}
