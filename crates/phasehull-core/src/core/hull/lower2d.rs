use crate::core::EPSILON;
use nalgebra::Point2;

#[inline]
fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Lower convex hull of `(composition fraction, energy)` points by monotone chain.
///
/// Points are sorted by x then y; points sharing an x coordinate collapse to the
/// lowest one, then a left-to-right scan keeps only strictly convex (left) turns.
/// The result is ordered by increasing x and never longer than the input.
pub fn build_lower_hull_2d(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut sorted: Vec<Point2<f64>> = points
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .copied()
        .collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|later, kept| (later.x - kept.x).abs() <= EPSILON);

    let mut chain: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for p in sorted {
        while chain.len() >= 2 && cross(&chain[chain.len() - 2], &chain[chain.len() - 1], &p) <= 0.0
        {
            chain.pop();
        }
        chain.push(p);
    }
    chain
}
