use crate::core::models::composition::Composition;
use nalgebra::{Point2, Point3};
use thiserror::Error;

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const SQRT_6: f64 = 2.449_489_742_783_178;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Barycentric mapping needs 3 or 4 elements, got {found}")]
    InvalidArity { found: usize },
    #[error("Composition contains none of the requested elements")]
    EmptyComposition,
}

/// Vertices of the reference triangle, one per element in list order.
pub const TRIANGLE_VERTICES: [[f64; 2]; 3] = [[1.0, 0.0], [0.5, SQRT_3 / 2.0], [0.0, 0.0]];

/// Vertices of the regular reference tetrahedron, one per element in list order.
pub const TETRAHEDRON_VERTICES: [[f64; 3]; 4] = [
    [1.0, 0.0, 0.0],
    [0.5, SQRT_3 / 2.0, 0.0],
    [0.5, SQRT_3 / 6.0, SQRT_6 / 3.0],
    [0.0, 0.0, 0.0],
];

/// Atomic fractions of `elements` within `composition`, normalized over the listed
/// elements only.
pub fn composition_fractions<S: AsRef<str>>(
    composition: &Composition,
    elements: &[S],
) -> Result<Vec<f64>, MappingError> {
    let amounts: Vec<f64> = elements
        .iter()
        .map(|el| composition.amount(el.as_ref()))
        .collect();
    let total: f64 = amounts.iter().sum();
    if total <= 0.0 {
        return Err(MappingError::EmptyComposition);
    }
    Ok(amounts.into_iter().map(|a| a / total).collect())
}

/// Maps a composition onto the reference simplex of a 3- or 4-element system.
///
/// Returns two Euclidean coordinates for a ternary element list and three for a
/// quaternary one.
pub fn map_to_barycentric<S: AsRef<str>>(
    composition: &Composition,
    elements: &[S],
) -> Result<Vec<f64>, MappingError> {
    match elements.len() {
        3 => ternary_coordinates(composition, elements).map(|p| vec![p.x, p.y]),
        4 => quaternary_coordinates(composition, elements).map(|p| vec![p.x, p.y, p.z]),
        found => Err(MappingError::InvalidArity { found }),
    }
}

pub fn ternary_coordinates<S: AsRef<str>>(
    composition: &Composition,
    elements: &[S],
) -> Result<Point2<f64>, MappingError> {
    if elements.len() != 3 {
        return Err(MappingError::InvalidArity {
            found: elements.len(),
        });
    }
    let fractions = composition_fractions(composition, elements)?;
    Ok(ternary_point(&fractions))
}

pub fn quaternary_coordinates<S: AsRef<str>>(
    composition: &Composition,
    elements: &[S],
) -> Result<Point3<f64>, MappingError> {
    if elements.len() != 4 {
        return Err(MappingError::InvalidArity {
            found: elements.len(),
        });
    }
    let fractions = composition_fractions(composition, elements)?;
    Ok(quaternary_point(&fractions))
}

fn ternary_point(fractions: &[f64]) -> Point2<f64> {
    let (x, y) = fractions
        .iter()
        .zip(TRIANGLE_VERTICES.iter())
        .fold((0.0, 0.0), |(x, y), (f, v)| (x + f * v[0], y + f * v[1]));
    Point2::new(x, y)
}

fn quaternary_point(fractions: &[f64]) -> Point3<f64> {
    let (x, y, z) = fractions.iter().zip(TETRAHEDRON_VERTICES.iter()).fold(
        (0.0, 0.0, 0.0),
        |(x, y, z), (f, v)| (x + f * v[0], y + f * v[1], z + f * v[2]),
    );
    Point3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn comp(pairs: &[(&str, f64)]) -> Composition {
        Composition::new(pairs.iter().map(|&(e, a)| (e, a))).unwrap()
    }

    #[test]
    fn pure_element_maps_exactly_to_its_triangle_vertex() {
        let coords = map_to_barycentric(&comp(&[("A", 1.0)]), &["A", "B", "C"]).unwrap();
        assert_eq!(coords, vec![1.0, 0.0]);

        let coords = map_to_barycentric(&comp(&[("B", 2.0)]), &["A", "B", "C"]).unwrap();
        assert!(f64_approx_equal(coords[0], 0.5));
        assert!(f64_approx_equal(coords[1], SQRT_3 / 2.0));
    }

    #[test]
    fn equimolar_composition_maps_to_triangle_centroid() {
        let coords =
            map_to_barycentric(&comp(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]), &["A", "B", "C"])
                .unwrap();
        assert!(f64_approx_equal(coords[0], 0.5));
        assert!(f64_approx_equal(coords[1], SQRT_3 / 6.0));
    }

    #[test]
    fn quaternary_vertices_form_a_regular_tetrahedron() {
        for (i, a) in TETRAHEDRON_VERTICES.iter().enumerate() {
            for b in TETRAHEDRON_VERTICES.iter().skip(i + 1) {
                let d2: f64 = a.iter().zip(b).map(|(p, q)| (p - q).powi(2)).sum();
                assert!(f64_approx_equal(d2.sqrt(), 1.0));
            }
        }
    }

    #[test]
    fn quaternary_mapping_of_equimolar_composition_is_centroid() {
        let coords = map_to_barycentric(
            &comp(&[("A", 1.0), ("B", 1.0), ("C", 1.0), ("D", 1.0)]),
            &["A", "B", "C", "D"],
        )
        .unwrap();
        assert!(f64_approx_equal(coords[0], 0.5));
        assert!(f64_approx_equal(coords[1], SQRT_3 / 6.0));
        assert!(f64_approx_equal(coords[2], SQRT_6 / 12.0));
    }

    #[test]
    fn fractions_ignore_elements_outside_the_list() {
        let fractions =
            composition_fractions(&comp(&[("A", 1.0), ("B", 3.0), ("Z", 4.0)]), &["A", "B"])
                .unwrap();
        assert!(f64_approx_equal(fractions[0], 0.25));
        assert!(f64_approx_equal(fractions[1], 0.75));
    }

    #[test]
    fn wrong_element_list_length_is_invalid_arity() {
        let result = map_to_barycentric(&comp(&[("A", 1.0)]), &["A", "B"]);
        assert!(matches!(result, Err(MappingError::InvalidArity { found: 2 })));
        let result = map_to_barycentric(&comp(&[("A", 1.0)]), &["A", "B", "C", "D", "E"]);
        assert!(matches!(result, Err(MappingError::InvalidArity { found: 5 })));
    }

    #[test]
    fn composition_without_listed_elements_is_empty() {
        let result = map_to_barycentric(&comp(&[("Z", 1.0)]), &["A", "B", "C"]);
        assert!(matches!(result, Err(MappingError::EmptyComposition)));
    }
}
