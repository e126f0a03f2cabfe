use super::facet::{ConvexHullTetrahedron, ConvexHullTriangle, HullFacet, centroid_of};
use crate::core::EPSILON;
use crate::core::geometry::plane::{AffineSpan, Hyperplane};
use itertools::Itertools;
use nalgebra::{Point, Point3, Point4};
use slotmap::{SlotMap, new_key_type};
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace, warn};

/// Point count up to which the initial farthest pair is searched exhaustively.
pub const DEFAULT_SAMPLE_THRESHOLD: usize = 100;

new_key_type! {
    struct FaceId;
}

/// A face under construction: vertex indices into the point arena plus the points
/// currently lying strictly in front of it.
#[derive(Debug, Clone)]
struct ConvexHullFace<const D: usize> {
    vertices: [usize; D],
    plane: Hyperplane<D>,
    centroid: Point<f64, D>,
    outside: Vec<usize>,
    farthest: Option<(usize, f64)>,
}

impl<const D: usize> ConvexHullFace<D> {
    fn push_outside(&mut self, index: usize, distance: f64) {
        self.outside.push(index);
        if self.farthest.is_none_or(|(_, best)| distance > best) {
            self.farthest = Some((index, distance));
        }
    }
}

/// Working state of one hull build. The face arena and every outside set are owned
/// here and dropped when the build returns.
struct Quickhull<'a, const D: usize> {
    points: &'a [Point<f64, D>],
    interior: Point<f64, D>,
    faces: SlotMap<FaceId, ConvexHullFace<D>>,
}

/// Convex hull of 3D points (two composition coordinates plus energy).
///
/// Returns an empty list for fewer than 4 points or coplanar input.
pub fn build_hull_3d(points: &[Point3<f64>]) -> Vec<ConvexHullTriangle> {
    build_hull(points, DEFAULT_SAMPLE_THRESHOLD)
}

/// Convex hull of 4D points (three composition coordinates plus energy).
///
/// Returns an empty list for fewer than 5 points or co-hyperplanar input.
pub fn build_hull_4d(points: &[Point4<f64>]) -> Vec<ConvexHullTetrahedron> {
    build_hull(points, DEFAULT_SAMPLE_THRESHOLD)
}

/// Generalized Quickhull in `D` dimensions.
///
/// `sample_threshold` bounds the exhaustive farthest-pair search used to seed the
/// initial simplex. Degenerate input is not an error: the result is simply empty.
#[instrument(level = "debug", skip_all, fields(dim = D, points = points.len()))]
pub fn build_hull<const D: usize>(
    points: &[Point<f64, D>],
    sample_threshold: usize,
) -> Vec<HullFacet<D>> {
    if D < 2 || points.len() < D + 1 {
        debug!(
            "Not enough points for a {}D hull ({} given), returning empty hull.",
            D,
            points.len()
        );
        return Vec::new();
    }

    let Some(simplex) = initial_simplex(points, sample_threshold) else {
        debug!("Input points are degenerate in {}D, returning empty hull.", D);
        return Vec::new();
    };

    let mut hull = Quickhull::seed(points, &simplex);
    hull.expand();
    let facets = hull.into_facets();
    debug!("Built {}D hull with {} faces.", D, facets.len());
    facets
}

/// Picks `D + 1` affinely independent points spanning as much volume as the greedy
/// farthest-point rule allows, or `None` when the input is degenerate.
fn initial_simplex<const D: usize>(
    points: &[Point<f64, D>],
    sample_threshold: usize,
) -> Option<Vec<usize>> {
    let (a, b, distance) = farthest_pair(points, sample_threshold)?;
    if distance < EPSILON {
        return None;
    }

    let mut simplex = vec![a, b];
    let mut span = AffineSpan::new(points[a]);
    span.extend(&points[b]);

    while simplex.len() < D + 1 {
        let (index, distance) = points
            .iter()
            .enumerate()
            .filter(|(i, _)| !simplex.contains(i))
            .map(|(i, p)| (i, span.distance(p)))
            .max_by(|x, y| x.1.total_cmp(&y.1))?;
        if distance < EPSILON || !span.extend(&points[index]) {
            return None;
        }
        simplex.push(index);
    }
    Some(simplex)
}

fn farthest_pair<const D: usize>(
    points: &[Point<f64, D>],
    sample_threshold: usize,
) -> Option<(usize, usize, f64)> {
    let candidates: Vec<usize> = if points.len() <= sample_threshold {
        (0..points.len()).collect()
    } else {
        sample_candidates(points, sample_threshold)
    };

    candidates
        .iter()
        .tuple_combinations()
        .map(|(&i, &j)| (i, j, (points[i] - points[j]).norm()))
        .max_by(|x, y| x.2.total_cmp(&y.2))
}

/// Per-axis extreme points plus an evenly strided sample of at most `sample_size`
/// points, sorted and deduplicated.
fn sample_candidates<const D: usize>(points: &[Point<f64, D>], sample_size: usize) -> Vec<usize> {
    let mut candidates = Vec::with_capacity(sample_size + 2 * D);
    for axis in 0..D {
        let by_axis = |&i: &usize, &j: &usize| points[i][axis].total_cmp(&points[j][axis]);
        candidates.extend((0..points.len()).min_by(by_axis));
        candidates.extend((0..points.len()).max_by(by_axis));
    }
    let stride = (points.len() / sample_size.max(1)).max(1);
    candidates.extend((0..points.len()).step_by(stride).take(sample_size));
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

impl<'a, const D: usize> Quickhull<'a, D> {
    fn seed(points: &'a [Point<f64, D>], simplex: &[usize]) -> Self {
        let simplex_points: Vec<_> = simplex.iter().map(|&i| points[i]).collect();
        let mut hull = Self {
            points,
            interior: centroid_of(&simplex_points),
            faces: SlotMap::with_key(),
        };

        let mut face_ids = Vec::with_capacity(D + 1);
        for skip in 0..simplex.len() {
            let mut others = simplex
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != skip)
                .map(|(_, &v)| v);
            let vertices: [usize; D] = std::array::from_fn(|_| others.next().unwrap_or(0));
            let face = hull.make_face(vertices);
            face_ids.push(hull.faces.insert(face));
        }

        let remaining = (0..points.len()).filter(|i| !simplex.contains(i));
        hull.assign_outside(remaining, &face_ids);
        hull
    }

    /// Builds a face oriented away from the interior point, swapping two vertices
    /// when the computed normal points inward.
    fn make_face(&self, mut vertices: [usize; D]) -> ConvexHullFace<D> {
        let coords = vertices.map(|i| self.points[i]);
        let mut plane = Hyperplane::through(&coords).unwrap_or_else(|| {
            trace!("Face {:?} is flat, keeping it with a zero normal.", vertices);
            Hyperplane::flat()
        });
        if plane.signed_distance(&self.interior) > 0.0 {
            vertices.swap(0, 1);
            plane = plane.flipped();
        }
        ConvexHullFace {
            vertices,
            plane,
            centroid: centroid_of(&coords),
            outside: Vec::new(),
            farthest: None,
        }
    }

    /// Gives each candidate point to the first face in `targets` it lies strictly in
    /// front of. Points in front of none of them are inside the hull and dropped.
    fn assign_outside(&mut self, candidates: impl IntoIterator<Item = usize>, targets: &[FaceId]) {
        let points = self.points;
        for index in candidates {
            let point = &points[index];
            for &id in targets {
                let Some(face) = self.faces.get_mut(id) else {
                    continue;
                };
                let distance = face.plane.signed_distance(point);
                if distance > EPSILON {
                    face.push_outside(index, distance);
                    break;
                }
            }
        }
    }

    fn farthest_outside_point(&self) -> Option<usize> {
        self.faces
            .values()
            .filter_map(|face| face.farthest)
            .max_by(|x, y| x.1.total_cmp(&y.1))
            .map(|(index, _)| index)
    }

    /// Ridges (faces minus one vertex, sorted) that appear exactly once among the
    /// visible faces.
    fn horizon(&self, visible: &[FaceId]) -> Vec<Vec<usize>> {
        let mut counts: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
        for face in visible.iter().filter_map(|&id| self.faces.get(id)) {
            for skip in 0..D {
                let mut ridge: Vec<usize> = face
                    .vertices
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k != skip)
                    .map(|(_, &v)| v)
                    .collect();
                ridge.sort_unstable();
                *counts.entry(ridge).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|(ridge, _)| ridge)
            .collect()
    }

    fn expand(&mut self) {
        let max_iterations = 4 * self.points.len() + 16;

        for iteration in 0..max_iterations {
            let Some(eye) = self.farthest_outside_point() else {
                trace!("Quickhull converged after {} iterations.", iteration);
                return;
            };
            let eye_point = self.points[eye];

            let visible: Vec<FaceId> = self
                .faces
                .iter()
                .filter(|(_, face)| face.plane.signed_distance(&eye_point) > EPSILON)
                .map(|(id, _)| id)
                .collect();
            let horizon = self.horizon(&visible);

            let orphans: Vec<usize> = visible
                .iter()
                .filter_map(|&id| self.faces.remove(id))
                .flat_map(|face| face.outside)
                .filter(|&index| index != eye)
                .collect();

            let new_faces: Vec<FaceId> = horizon
                .into_iter()
                .map(|ridge| {
                    let mut vertices = [eye; D];
                    vertices[..D - 1].copy_from_slice(&ridge);
                    let face = self.make_face(vertices);
                    self.faces.insert(face)
                })
                .collect();

            trace!(
                iteration,
                eye,
                visible = visible.len(),
                created = new_faces.len(),
                orphans = orphans.len(),
                "Quickhull step"
            );
            self.assign_outside(orphans, &new_faces);
        }

        warn!(
            "Quickhull stopped after {} iterations with outside points remaining.",
            max_iterations
        );
    }

    fn into_facets(self) -> Vec<HullFacet<D>> {
        let points = self.points;
        self.faces
            .into_iter()
            .map(|(_, face)| HullFacet {
                vertices: face.vertices.map(|i| points[i]),
                normal: face.plane.normal,
                centroid: face.centroid,
            })
            .collect()
    }
}
