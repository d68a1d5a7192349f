//! Ridge rotation and adjacency decomposition over one facet.
//!
//! `rotate` pivots a ridge row around its ridge until it settles on the
//! unique other facet containing it. `ridges_of` finds the ridges of a facet
//! by eliminating over the vertices lying on it; the recursive variant runs a
//! single-threaded adjacency decomposition on that sub-polytope instead,
//! which scales to degenerate facets with many vertices.

use std::collections::{BTreeSet, VecDeque};

use crate::DescryError as Error;
use crate::classes;
use crate::fme;
use crate::group::VertexGroup;
use crate::maps::Map;
use crate::num::Int;
use crate::ops;
use crate::types::{Matrix, Row, Tag};

#[derive(Clone, Copy, Debug, Default)]
pub struct RecursionOptions {
    /// Remaining recursion depth for ridge discovery; zero means plain
    /// elimination.
    pub depth: usize,
    /// Minimum number of vertices on a facet before recursing; an effective
    /// minimum of two always applies.
    pub min_vertices: usize,
    /// In sampling mode inner enumerations expand only their seed facet and
    /// do not enqueue discoveries.
    pub sampling: bool,
}

impl RecursionOptions {
    fn effective_min_vertices(&self) -> usize {
        self.min_vertices.max(2)
    }
}

/// Rotates `ridge` around the ridge it defines on `facet`, returning the
/// adjacent facet. `start` must be the vertex deepest inside `facet`, which
/// is shared by every rotation from that facet.
pub(crate) fn rotate<N: Int>(
    vertices: &Matrix<N>,
    start: &Row<N>,
    facet: &Row<N>,
    mut ridge: Row<N>,
) -> Result<Row<N>, Error> {
    let mut d_facet = ops::distance(facet, start);
    let mut d_ridge = ops::distance(&ridge, start);
    loop {
        let shared = d_facet.ref_gcd(&d_ridge);
        if shared > N::one() {
            d_facet = d_facet.ref_div(&shared);
            d_ridge = d_ridge.ref_div(&shared);
        }
        for (r, f) in ridge.iter_mut().zip(facet) {
            *r = r.ref_mul(&d_facet).ref_sub(&f.ref_mul(&d_ridge));
        }
        let gcd = ops::row_gcd(&ridge);
        if gcd.is_zero() {
            return Err(Error::DegenerateRotation);
        }
        if gcd > N::one() {
            for value in ridge.iter_mut() {
                *value = value.ref_div(&gcd);
            }
        }
        let vertex = ops::nearest_vertex(vertices, &ridge);
        d_facet = ops::distance(facet, vertex);
        d_ridge = ops::distance(&ridge, vertex);
        if d_ridge.is_zero() {
            return Ok(ridge);
        }
    }
}

fn vertices_on_facet<N: Int>(vertices: &Matrix<N>, facet: &Row<N>) -> Matrix<N> {
    vertices
        .iter()
        .filter(|vertex| ops::distance(facet, vertex).is_zero())
        .cloned()
        .collect()
}

/// Ridges of `facet`: the facets of the sub-polytope spanned by the vertices
/// lying on it.
pub fn ridges_of<N: Int>(vertices: &Matrix<N>, facet: &Row<N>) -> Result<Matrix<N>, Error> {
    let on_facet = vertices_on_facet(vertices, facet);
    if on_facet.is_empty() {
        return Err(Error::EmptyVertexSupport);
    }
    fme::fourier_motzkin(&on_facet)
}

/// Like [`ridges_of`], but recurses into an adjacency decomposition of the
/// sub-polytope while depth remains and the facet carries enough vertices.
pub fn ridges_of_recursive<N: Int>(
    vertices: &Matrix<N>,
    facet: &Row<N>,
    recursion: &RecursionOptions,
) -> Result<Matrix<N>, Error> {
    let on_facet = vertices_on_facet(vertices, facet);
    if on_facet.is_empty() {
        return Err(Error::EmptyVertexSupport);
    }
    if recursion.depth > 0 && on_facet.len() >= recursion.effective_min_vertices() {
        tracing::debug!(
            depth = recursion.depth,
            vertices = on_facet.len(),
            "recursing into the sub-polytope"
        );
        let inner = RecursionOptions {
            depth: recursion.depth - 1,
            ..*recursion
        };
        single_threaded_ad(&on_facet, &inner)
    } else {
        fme::fourier_motzkin(&on_facet)
    }
}

/// Sequential adjacency decomposition: heuristic seeds, then breadth-first
/// rotation across ridges until the facet set closes. In sampling mode only
/// the first seed is expanded.
pub fn single_threaded_ad<N: Int>(
    vertices: &Matrix<N>,
    recursion: &RecursionOptions,
) -> Result<Matrix<N>, Error> {
    let seeds = fme::fourier_motzkin_heuristic(vertices)?;
    if seeds.is_empty() {
        return Ok(seeds);
    }
    let mut all: BTreeSet<Row<N>> = seeds.iter().cloned().collect();
    let mut queue: VecDeque<Row<N>> = if recursion.sampling {
        VecDeque::from([seeds[0].clone()])
    } else {
        seeds.into_iter().collect()
    };
    while let Some(current) = queue.pop_front() {
        let start = ops::furthest_vertex(vertices, &current).clone();
        let ridges = if recursion.depth > 0
            && vertices.len() >= recursion.effective_min_vertices()
        {
            ridges_of_recursive(vertices, &current, recursion)?
        } else {
            ridges_of(vertices, &current)?
        };
        for ridge in ridges {
            let adjacent = rotate(vertices, &start, &current, ridge)?;
            if all.insert(adjacent.clone()) && !recursion.sampling {
                queue.push_back(adjacent);
            }
        }
    }
    Ok(all.into_iter().collect())
}

/// All facets adjacent to `facet`, one rotation per ridge. Without a vertex
/// group the result is reduced to map-class representatives; with one, the
/// work list deduplicates by canonical support instead and the rotations are
/// returned as they are.
pub fn adjacent_facets<N: Int>(
    vertices: &Matrix<N>,
    facet: &Row<N>,
    maps: &[Map<N>],
    group: Option<&VertexGroup>,
    tag: Tag,
    recursion: &RecursionOptions,
) -> Result<Matrix<N>, Error> {
    let start = ops::furthest_vertex(vertices, facet).clone();
    let ridges = if recursion.depth > 0 {
        ridges_of_recursive(vertices, facet, recursion)?
    } else {
        ridges_of(vertices, facet)?
    };
    let mut output = BTreeSet::new();
    for ridge in ridges {
        output.insert(rotate(vertices, &start, facet, ridge)?);
    }
    if group.is_some() {
        Ok(output.into_iter().collect())
    } else {
        Ok(classes::classes(&output, maps, tag))
    }
}
