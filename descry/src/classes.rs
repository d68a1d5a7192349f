//! Equivalence reduction of rows under the map group.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::group::VertexGroup;
use crate::maps::{self, Map};
use crate::num::Int;
use crate::ops;
use crate::types::{Matrix, Row, Support, Tag};

/// The lexicographically minimal normalized row in the orbit of `row` under
/// the maps, found by closing the orbit under all generators.
pub fn class_representative<N: Int>(row: &Row<N>, maps: &[Map<N>], tag: Tag) -> Row<N> {
    let seed = ops::normalized(row.clone());
    if maps.is_empty() {
        return seed;
    }
    let mut orbit: BTreeSet<Row<N>> = BTreeSet::from([seed.clone()]);
    let mut queue: VecDeque<Row<N>> = VecDeque::from([seed]);
    while let Some(current) = queue.pop_front() {
        for map in maps {
            let image = maps::apply(map, &current, tag);
            if orbit.insert(image.clone()) {
                queue.push_back(image);
            }
        }
    }
    orbit
        .into_iter()
        .next()
        .expect("orbit contains the seed row")
}

/// One representative per map orbit, sorted.
pub fn classes<N: Int>(rows: &BTreeSet<Row<N>>, maps: &[Map<N>], tag: Tag) -> Matrix<N> {
    let mut representatives = BTreeSet::new();
    for row in rows {
        representatives.insert(class_representative(row, maps, tag));
    }
    representatives.into_iter().collect()
}

/// One representative per canonical vertex support. The first row seen for a
/// canonical support wins (rows are visited in lexicographic order); the
/// surviving rows are then mapped through [`class_representative`] so the
/// output does not depend on which orbit member happened to be first.
pub fn classes_vertex_support<N: Int>(
    rows: BTreeSet<Row<N>>,
    vertices: &Matrix<N>,
    maps: &[Map<N>],
    group: &VertexGroup,
    tag: Tag,
) -> Matrix<N> {
    let mut by_support: BTreeMap<Support, Row<N>> = BTreeMap::new();
    for row in rows {
        let support = ops::vertex_support(&row, vertices);
        let canonical = group.canonical(&support);
        by_support.entry(canonical).or_insert(row);
    }
    let mut representatives = BTreeSet::new();
    for row in by_support.into_values() {
        representatives.insert(class_representative(&row, maps, tag));
    }
    representatives.into_iter().collect()
}
