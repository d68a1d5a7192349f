//! End-to-end conversions between the two descriptions.

use std::collections::BTreeSet;
use std::io::Write;

use descry::rotation::RecursionOptions;
use descry::types::{Matrix, Row, Tag};
use descry::{Enumeration, VertexGroup};

fn sink() -> Box<dyn Write + Send> {
    Box::new(std::io::sink())
}

fn vertex(coords: &[i64]) -> Row<i64> {
    let mut row = vec![1];
    row.extend_from_slice(coords);
    row
}

fn cube_vertices() -> Matrix<i64> {
    let mut vertices = Vec::new();
    for z in 0..2 {
        for y in 0..2 {
            for x in 0..2 {
                vertices.push(vertex(&[x, y, z]));
            }
        }
    }
    vertices
}

fn cube_facets() -> BTreeSet<Row<i64>> {
    [
        vec![0, 1, 0, 0],
        vec![0, 0, 1, 0],
        vec![0, 0, 0, 1],
        vec![1, -1, 0, 0],
        vec![1, 0, -1, 0],
        vec![1, 0, 0, -1],
    ]
    .into_iter()
    .collect()
}

fn as_set(rows: Matrix<i64>) -> BTreeSet<Row<i64>> {
    rows.into_iter().collect()
}

/// The inequality description plus the homogenizing row, ready for vertex
/// enumeration.
fn homogenized(facets: &BTreeSet<Row<i64>>, dimension: usize) -> Matrix<i64> {
    let mut rows: Matrix<i64> = facets.iter().cloned().collect();
    let mut h = vec![0; dimension + 1];
    h[0] = 1;
    rows.push(h);
    rows
}

#[test]
fn cube_vertices_to_facets() {
    let vertices = cube_vertices();
    let facets = Enumeration::new(&vertices, Tag::Facet)
        .run_adjacency(sink())
        .unwrap();
    assert_eq!(as_set(facets), cube_facets());
}

#[test]
fn cube_facets_to_vertices() {
    let rows = homogenized(&cube_facets(), 3);
    let vertices = Enumeration::new(&rows, Tag::Vertex)
        .run_adjacency(sink())
        .unwrap();
    assert_eq!(as_set(vertices), as_set(cube_vertices()));
}

#[test]
fn duality_round_trip_on_the_cube() {
    let vertices = cube_vertices();
    let facets = Enumeration::new(&vertices, Tag::Facet)
        .run_double_description(sink())
        .unwrap();
    let rows = homogenized(&as_set(facets), 3);
    let recovered = Enumeration::new(&rows, Tag::Vertex)
        .run_double_description(sink())
        .unwrap();
    assert_eq!(as_set(recovered), as_set(cube_vertices()));
}

#[test]
fn unbounded_polyhedron_has_four_facets() {
    // Triangle corners plus a diagonal recession ray.
    let rows = vec![
        vertex(&[0, 0]),
        vertex(&[2, 0]),
        vertex(&[0, 2]),
        vec![0, 1, 1],
    ];
    let facets = Enumeration::new(&rows, Tag::Facet)
        .run_adjacency(sink())
        .unwrap();
    let expected: BTreeSet<Row<i64>> = [
        vec![0, 1, 0],
        vec![0, 0, 1],
        vec![2, -1, 1],
        vec![2, 1, -1],
    ]
    .into_iter()
    .collect();
    assert_eq!(as_set(facets), expected);
}

#[test]
fn recursion_settings_are_invisible_in_the_result() {
    let vertices = cube_vertices();
    let baseline = Enumeration::new(&vertices, Tag::Facet)
        .run_adjacency(sink())
        .unwrap();
    for depth in [1, 2] {
        for min_vertices in [0, 5] {
            let recursion = RecursionOptions {
                depth,
                min_vertices,
                sampling: false,
            };
            let facets = Enumeration::new(&vertices, Tag::Facet)
                .with_recursion(recursion)
                .run_adjacency(sink())
                .unwrap();
            assert_eq!(facets, baseline, "depth {depth}, min {min_vertices}");
        }
    }
}

#[test]
fn parallel_runs_agree_with_sequential_runs() {
    let vertices = cube_vertices();
    let sequential = Enumeration::new(&vertices, Tag::Facet)
        .with_threads(1)
        .run_adjacency(sink())
        .unwrap();
    for threads in [2, 4, 8] {
        let parallel = Enumeration::new(&vertices, Tag::Facet)
            .with_threads(threads)
            .run_adjacency(sink())
            .unwrap();
        assert_eq!(parallel, sequential, "{threads} threads");
    }
}

#[test]
fn vertex_group_reduces_the_square_to_one_representative() {
    let square = vec![
        vertex(&[0, 0]),
        vertex(&[1, 0]),
        vertex(&[1, 1]),
        vertex(&[0, 1]),
    ];
    let group = VertexGroup::new(vec![vec![1, 2, 3, 0]], 4).unwrap();
    let facets = Enumeration::new(&square, Tag::Facet)
        .with_group(&group)
        .run_adjacency(sink())
        .unwrap();
    assert_eq!(facets.len(), 1);
}

#[test]
fn every_emitted_row_is_normalized_and_valid() {
    let vertices = cube_vertices();
    let facets = Enumeration::new(&vertices, Tag::Facet)
        .run_adjacency(sink())
        .unwrap();
    for facet in &facets {
        assert_eq!(descry::ops::row_gcd(facet), 1);
        for v in &vertices {
            assert!(!descry::ops::distance(facet, v).is_negative());
        }
        let support = descry::ops::vertex_support(facet, &vertices);
        assert!(support.len() >= 3, "a cube facet carries at least 3 vertices");
    }
}
