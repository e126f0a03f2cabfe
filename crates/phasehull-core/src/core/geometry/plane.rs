use nalgebra::{DMatrix, Point, SVector};

/// Raw (unnormalized) normal length below which a simplex is considered flat.
const MIN_NORMAL_LENGTH: f64 = 1e-18;

/// An oriented hyperplane `normal · p + offset = 0` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperplane<const D: usize> {
    pub normal: SVector<f64, D>,
    pub offset: f64,
}

impl<const D: usize> Hyperplane<D> {
    /// The hyperplane through `D` points, or `None` when they are affinely dependent.
    pub fn through(vertices: &[Point<f64, D>; D]) -> Option<Self> {
        let normal = hyperplane_normal(vertices)?;
        let offset = -normal.dot(&vertices[0].coords);
        Some(Self { normal, offset })
    }

    /// A plane with a zero normal. Every point has signed distance zero to it.
    pub fn flat() -> Self {
        Self {
            normal: SVector::zeros(),
            offset: 0.0,
        }
    }

    #[inline]
    pub fn signed_distance(&self, point: &Point<f64, D>) -> f64 {
        self.normal.dot(&point.coords) + self.offset
    }

    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }
}

/// Unit normal of the hyperplane spanned by `D` points in `D` dimensions.
///
/// Component `i` is the signed cofactor obtained by deleting column `i` from the
/// matrix of edge vectors, which reduces to the cross product for `D = 3`.
pub fn hyperplane_normal<const D: usize>(
    vertices: &[Point<f64, D>; D],
) -> Option<SVector<f64, D>> {
    if D < 2 {
        return None;
    }
    let edges: Vec<SVector<f64, D>> = vertices[1..].iter().map(|v| v - vertices[0]).collect();

    let mut normal = SVector::<f64, D>::zeros();
    for i in 0..D {
        let minor = DMatrix::from_fn(D - 1, D - 1, |r, c| {
            let col = if c < i { c } else { c + 1 };
            edges[r][col]
        });
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        normal[i] = sign * minor.determinant();
    }

    let length = normal.norm();
    if !length.is_finite() || length < MIN_NORMAL_LENGTH {
        return None;
    }
    Some(normal / length)
}

/// Incrementally grown affine span with an orthonormal direction basis.
#[derive(Debug, Clone)]
pub struct AffineSpan<const D: usize> {
    origin: Point<f64, D>,
    basis: Vec<SVector<f64, D>>,
}

impl<const D: usize> AffineSpan<D> {
    pub fn new(origin: Point<f64, D>) -> Self {
        Self {
            origin,
            basis: Vec::with_capacity(D),
        }
    }

    pub fn dimension(&self) -> usize {
        self.basis.len()
    }

    fn residual(&self, point: &Point<f64, D>) -> SVector<f64, D> {
        let mut r = point - self.origin;
        for b in &self.basis {
            r -= *b * b.dot(&r);
        }
        r
    }

    /// Euclidean distance from `point` to the span.
    pub fn distance(&self, point: &Point<f64, D>) -> f64 {
        self.residual(point).norm()
    }

    /// Extends the span by `point`. Returns `false` (leaving the span unchanged) if
    /// the point already lies in it.
    pub fn extend(&mut self, point: &Point<f64, D>) -> bool {
        let r = self.residual(point);
        let length = r.norm();
        if length < MIN_NORMAL_LENGTH {
            return false;
        }
        self.basis.push(r / length);
        true
    }
}
