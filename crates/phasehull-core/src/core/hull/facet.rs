use nalgebra::{Point, SVector};

/// A face of a finished convex hull with materialized vertex coordinates.
///
/// The normal is a unit vector pointing away from the hull interior.
#[derive(Debug, Clone, PartialEq)]
pub struct HullFacet<const D: usize> {
    pub vertices: [Point<f64, D>; D],
    pub normal: SVector<f64, D>,
    pub centroid: Point<f64, D>,
}

/// Face of a 3D hull (two composition coordinates plus energy).
pub type ConvexHullTriangle = HullFacet<3>;

/// Face of a 4D hull (three composition coordinates plus energy).
pub type ConvexHullTetrahedron = HullFacet<4>;

impl<const D: usize> HullFacet<D> {
    /// Whether the face points toward decreasing energy (the last coordinate).
    #[inline]
    pub fn is_lower(&self) -> bool {
        self.normal[D - 1] < 0.0
    }
}

pub(crate) fn centroid_of<const D: usize>(vertices: &[Point<f64, D>]) -> Point<f64, D> {
    let sum = vertices
        .iter()
        .fold(SVector::<f64, D>::zeros(), |acc, v| acc + v.coords);
    Point::from(sum / vertices.len() as f64)
}

/// Keeps the faces of the stability envelope: those whose outward normal has a
/// strictly negative energy component.
pub fn lower_hull_faces<const D: usize>(faces: Vec<HullFacet<D>>) -> Vec<HullFacet<D>> {
    faces.into_iter().filter(HullFacet::is_lower).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn facet(normal: Vector3<f64>) -> ConvexHullTriangle {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        HullFacet {
            centroid: centroid_of(&vertices),
            vertices,
            normal,
        }
    }

    #[test]
    fn lower_filter_discards_upward_and_vertical_faces() {
        let faces = vec![
            facet(Vector3::new(0.0, 0.0, -1.0)),
            facet(Vector3::new(0.0, 0.0, 1.0)),
            facet(Vector3::new(1.0, 0.0, 0.0)),
            facet(Vector3::new(0.6, 0.0, -0.8)),
        ];
        let lower = lower_hull_faces(faces);
        assert_eq!(lower.len(), 2);
        assert!(lower.iter().all(|f| f.normal.z < 0.0));
    }

    #[test]
    fn centroid_is_vertex_average() {
        let f = facet(Vector3::z());
        assert!((f.centroid - Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).norm() < 1e-12);
    }
}
