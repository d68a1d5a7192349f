//! Coordinate maps: linear-with-translation symmetries of the input.
//!
//! A map stores one image per column of the homogenized row space; an image
//! is a list of `(column, factor)` terms. Column 0 is the homogenizing
//! column, so translations appear as factor terms on column 0 and the
//! identity image `[(0, 1)]` keeps it fixed.

use crate::DescryError as Error;
use crate::num::Int;
use crate::ops;
use crate::types::{Matrix, Row, Tag};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Map<N: Int> {
    images: Vec<Vec<(usize, N)>>,
}

impl<N: Int> Map<N> {
    pub fn new(images: Vec<Vec<(usize, N)>>) -> Result<Self, Error> {
        let width = images.len();
        if width == 0 {
            return Err(Error::InvalidArgument {
                context: "a coordinate map needs at least one image",
            });
        }
        for image in &images {
            for (column, _) in image {
                if *column >= width {
                    return Err(Error::InvalidArgument {
                        context: "map term references a column out of range",
                    });
                }
            }
        }
        Ok(Self { images })
    }

    pub fn width(&self) -> usize {
        self.images.len()
    }

    pub fn images(&self) -> &[Vec<(usize, N)>] {
        &self.images
    }

    /// A map that only reorders columns, possibly flipping signs.
    pub fn is_pure_permutation(&self) -> bool {
        self.images
            .iter()
            .all(|image| image.len() == 1 && image[0].1.ref_abs() == N::one())
    }
}

/// Applies a map to a row and renormalizes the result.
///
/// Under [`Tag::Vertex`] this is the direct action: output column `i` is the
/// evaluation of image `i`. Under [`Tag::Facet`] the map acts by
/// substitution, `f ↦ f ∘ m`: wherever image `i` contributes `factor` times
/// input column `c`, the inequality's coefficient at `i` flows to `c`. A map
/// sending the polytope onto itself thus sends valid inequalities to valid
/// inequalities, and since the maps form a group, orbit enumeration under
/// this action needs no matrix inversion.
pub fn apply<N: Int>(map: &Map<N>, row: &[N], tag: Tag) -> Row<N> {
    debug_assert_eq!(map.width(), row.len(), "map width must match row width");
    let mut out = vec![N::zero(); row.len()];
    match tag {
        Tag::Vertex => {
            for (index, image) in map.images().iter().enumerate() {
                for (column, factor) in image {
                    out[index].add_mul_assign(factor, &row[*column]);
                }
            }
        }
        Tag::Facet => {
            for (index, image) in map.images().iter().enumerate() {
                for (column, factor) in image {
                    out[*column].add_mul_assign(factor, &row[index]);
                }
            }
        }
    }
    ops::normalize(&mut out);
    out
}

pub fn are_pure_permutations<N: Int>(maps: &[Map<N>]) -> bool {
    !maps.is_empty() && maps.iter().all(Map::is_pure_permutation)
}

/// Lifts pure permutation maps to the permutations they induce on the vertex
/// list. `None` when the maps are empty, not pure permutations, or some
/// transformed vertex is missing from the list.
pub fn induced_vertex_permutations<N: Int>(
    maps: &[Map<N>],
    vertices: &Matrix<N>,
) -> Option<Vec<Vec<usize>>> {
    if vertices.is_empty() || !are_pure_permutations(maps) {
        return None;
    }
    let mut permutations = Vec::with_capacity(maps.len());
    for map in maps {
        let mut permutation = Vec::with_capacity(vertices.len());
        for vertex in vertices {
            let image = apply(map, vertex, Tag::Vertex);
            let target = vertices.iter().position(|candidate| *candidate == image)?;
            permutation.push(target);
        }
        debug_assert!(
            {
                let mut sorted = permutation.clone();
                sorted.sort_unstable();
                sorted.iter().copied().eq(0..vertices.len())
            },
            "a group element must permute the vertex list"
        );
        permutations.push(permutation);
    }
    Some(permutations)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Swap of the two coordinates on homogenized width-3 rows.
    fn swap_map() -> Map<i64> {
        Map::new(vec![vec![(0, 1)], vec![(2, 1)], vec![(1, 1)]]).unwrap()
    }

    #[test]
    fn direct_action_moves_points() {
        let map = swap_map();
        assert_eq!(apply(&map, &[1, 2, 5], Tag::Vertex), vec![1, 5, 2]);
    }

    #[test]
    fn substitution_action_moves_inequalities() {
        // x <= 1 under the swap becomes y <= 1.
        let map = swap_map();
        assert_eq!(apply(&map, &[1, -1, 0], Tag::Facet), vec![1, 0, -1]);
    }

    #[test]
    fn pure_permutation_detection() {
        assert!(are_pure_permutations(&[swap_map()]));
        let scaling = Map::new(vec![vec![(0, 1)], vec![(1, 2)], vec![(2, 1)]]).unwrap();
        assert!(!are_pure_permutations(&[scaling]));
        assert!(!are_pure_permutations::<i64>(&[]));
    }

    #[test]
    fn swap_induces_a_vertex_permutation_of_the_square() {
        let vertices = vec![
            vec![1, 0, 0],
            vec![1, 1, 0],
            vec![1, 1, 1],
            vec![1, 0, 1],
        ];
        let permutations = induced_vertex_permutations(&[swap_map()], &vertices).unwrap();
        assert_eq!(permutations, vec![vec![0, 3, 2, 1]]);
    }
}
