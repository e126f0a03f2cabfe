use crate::core::hull::facet::{ConvexHullTetrahedron, ConvexHullTriangle};
use crate::core::{BARYCENTRIC_SLACK, EPSILON};
use nalgebra::{Const, LU, Matrix4, Point2, Point3, Vector4};

/// Projected (composition-space) measure below which a face or cell is vertical.
const MIN_PROJECTED_MEASURE: f64 = 1e-14;

/// Envelope energy at `x` along a lower chain sorted by increasing x.
///
/// Outside the chain's x-range the nearest endpoint energy is returned. `None`
/// only for an empty chain.
pub fn interpolate_chain(chain: &[Point2<f64>], x: f64) -> Option<f64> {
    let first = chain.first()?;
    let last = chain.last()?;
    if x <= first.x {
        return Some(first.y);
    }
    if x >= last.x {
        return Some(last.y);
    }

    let segment = chain.windows(2).find(|w| x <= w[1].x)?;
    let (left, right) = (segment[0], segment[1]);
    let span = right.x - left.x;
    if span <= 0.0 {
        return Some(left.y.min(right.y));
    }
    let t = (x - left.x) / span;
    Some(left.y + t * (right.y - left.y))
}

/// A piece of the lower envelope that can evaluate itself at a composition point.
pub trait EnvelopeModel {
    type Point;

    /// Envelope energy at `point`, or `None` if the point lies outside this piece.
    fn energy_at(&self, point: &Self::Point) -> Option<f64>;
}

/// Minimum envelope energy over every model accepting `point`.
///
/// Where neighbouring pieces overlap within tolerance the lowest value wins.
pub fn query_hull_energy<M: EnvelopeModel>(models: &[M], point: &M::Point) -> Option<f64> {
    models
        .iter()
        .filter_map(|model| model.energy_at(point))
        .reduce(f64::min)
}

/// Planar model `z = a·x + b·y + c` of one lower-hull triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct HullFaceModel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    min: Point2<f64>,
    max: Point2<f64>,
    base: [Point2<f64>; 3],
    denominator: f64,
}

impl HullFaceModel {
    /// `None` when the triangle projects onto a degenerate (zero-area) region.
    pub fn new(face: &ConvexHullTriangle) -> Option<Self> {
        let [v1, v2, v3] = &face.vertices;
        let e1 = v2 - v1;
        let e2 = v3 - v1;
        let normal = e1.cross(&e2);

        let denominator = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
        if denominator.abs() < MIN_PROJECTED_MEASURE || normal.z.abs() < MIN_PROJECTED_MEASURE {
            return None;
        }

        let a = -normal.x / normal.z;
        let b = -normal.y / normal.z;
        let c = v1.z - a * v1.x - b * v1.y;

        let base = [v1.xy(), v2.xy(), v3.xy()];
        let min = Point2::new(
            base.iter().map(|p| p.x).fold(f64::INFINITY, f64::min),
            base.iter().map(|p| p.y).fold(f64::INFINITY, f64::min),
        );
        let max = Point2::new(
            base.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max),
            base.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max),
        );

        Some(Self {
            a,
            b,
            c,
            min,
            max,
            base,
            denominator,
        })
    }

    #[inline]
    fn in_bounding_box(&self, p: &Point2<f64>) -> bool {
        p.x >= self.min.x - EPSILON
            && p.x <= self.max.x + EPSILON
            && p.y >= self.min.y - EPSILON
            && p.y <= self.max.y + EPSILON
    }

    /// Barycentric coordinates of `p` with respect to the projected triangle.
    pub fn barycentric(&self, p: &Point2<f64>) -> [f64; 3] {
        let [p1, p2, p3] = &self.base;
        let l1 = ((p2.y - p3.y) * (p.x - p3.x) + (p3.x - p2.x) * (p.y - p3.y)) / self.denominator;
        let l2 = ((p3.y - p1.y) * (p.x - p3.x) + (p1.x - p3.x) * (p.y - p3.y)) / self.denominator;
        [l1, l2, 1.0 - l1 - l2]
    }

    pub fn contains(&self, p: &Point2<f64>) -> bool {
        self.in_bounding_box(p)
            && self
                .barycentric(p)
                .iter()
                .all(|&lambda| lambda >= BARYCENTRIC_SLACK)
    }

    #[inline]
    pub fn plane_energy(&self, p: &Point2<f64>) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }
}

impl EnvelopeModel for HullFaceModel {
    type Point = Point2<f64>;

    fn energy_at(&self, point: &Point2<f64>) -> Option<f64> {
        self.contains(point).then(|| self.plane_energy(point))
    }
}

/// Linear model of one lower-hull tetrahedron over composition space.
///
/// Holds the LU factorization of the matrix whose columns are `(x, y, z, 1)` for
/// the four vertices, so a query is a single 4×4 back-substitution.
#[derive(Debug, Clone)]
pub struct HullCellModel {
    min: Point3<f64>,
    max: Point3<f64>,
    energies: Vector4<f64>,
    lu: LU<f64, Const<4>, Const<4>>,
}

impl HullCellModel {
    /// `None` when the tetrahedron projects onto a degenerate (zero-volume) region.
    pub fn new(cell: &ConvexHullTetrahedron) -> Option<Self> {
        let columns: Vec<Vector4<f64>> = cell
            .vertices
            .iter()
            .map(|v| Vector4::new(v[0], v[1], v[2], 1.0))
            .collect();
        let matrix = Matrix4::from_columns(&columns);
        let lu = matrix.lu();
        if !lu.is_invertible() || lu.determinant().abs() < MIN_PROJECTED_MEASURE {
            return None;
        }

        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for v in &cell.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        let energies = Vector4::from_fn(|i, _| cell.vertices[i][3]);

        Some(Self {
            min,
            max,
            energies,
            lu,
        })
    }

    #[inline]
    fn in_bounding_box(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] - EPSILON && p[axis] <= self.max[axis] + EPSILON)
    }

    /// Barycentric coordinates of `p`, or `None` if the solve fails numerically.
    pub fn barycentric(&self, p: &Point3<f64>) -> Option<Vector4<f64>> {
        self.lu.solve(&Vector4::new(p.x, p.y, p.z, 1.0))
    }
}

impl EnvelopeModel for HullCellModel {
    type Point = Point3<f64>;

    fn energy_at(&self, point: &Point3<f64>) -> Option<f64> {
        if !self.in_bounding_box(point) {
            return None;
        }
        let lambda = self.barycentric(point)?;
        if lambda.iter().any(|&l| l < BARYCENTRIC_SLACK) {
            return None;
        }
        Some(lambda.dot(&self.energies))
    }
}
