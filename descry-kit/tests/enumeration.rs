//! End-to-end runs over the shipped fixtures, exactly as the binary wires
//! them up.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use descry::types::{Matrix, Tag};
use descry::{Enumeration, VertexGroup};
use descry_kit::InputFile;
use descry_kit::format;
use rug::Integer;

fn fixture(name: &str) -> InputFile<Integer> {
    let path = Path::new("tests/data").join(name);
    let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("read {name}: {err}"));
    format::parse(&text).unwrap_or_else(|err| panic!("parse {name}: {err}"))
}

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn cube_vertices_to_pretty_facets() {
    let input = fixture("sample_cube");
    let sink = SharedSink::default();
    let facets = Enumeration::new(&input.vertices, Tag::Facet)
        .with_names(input.names.clone())
        .run_adjacency(Box::new(sink.clone()))
        .unwrap();
    assert_eq!(facets.len(), 6);

    let lines: BTreeSet<String> = sink.lines().into_iter().collect();
    let expected: BTreeSet<String> = [
        "-x <= 0", "-y <= 0", "-z <= 0", "x <= 1", "y <= 1", "z <= 1",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    assert_eq!(lines, expected);
}

#[test]
fn cube_inequalities_to_vertices() {
    let input = fixture("sample_cube_h");
    let mut rows: Matrix<Integer> = input.inequalities.clone();
    let mut nonnegative = vec![Integer::new(); input.dimension() + 1];
    nonnegative[0] = Integer::from(1);
    rows.push(nonnegative);

    let sink = SharedSink::default();
    let vertices = Enumeration::new(&rows, Tag::Vertex)
        .run_adjacency(Box::new(sink.clone()))
        .unwrap();
    assert_eq!(vertices.len(), 8);
    assert!(vertices.iter().all(|row| row[0] == 1));
    assert_eq!(sink.lines().len(), 8);
    assert!(sink.lines().contains(&"1 0 0 0".to_string()));
    assert!(sink.lines().contains(&"1 1 1 1".to_string()));
}

#[test]
fn adjacency_and_double_description_agree_on_the_porta_cube() {
    let input = fixture("porta_cube.poi");
    let ad = Enumeration::new(&input.vertices, Tag::Facet)
        .run_adjacency(Box::new(std::io::sink()))
        .unwrap();
    let dd = Enumeration::new(&input.vertices, Tag::Facet)
        .run_double_description(Box::new(std::io::sink()))
        .unwrap();
    assert_eq!(ad, dd);
    assert_eq!(ad.len(), 6);
}

#[test]
fn polyhedron_with_rays_has_four_facets() {
    let input = fixture("sample_rays");
    let sink = SharedSink::default();
    let facets = Enumeration::new(&input.vertices, Tag::Facet)
        .with_names(input.names.clone())
        .run_adjacency(Box::new(sink.clone()))
        .unwrap();
    assert_eq!(facets.len(), 4);
    assert_eq!(sink.lines().len(), 4);
}

#[test]
fn explicit_vertex_permutations_collapse_the_square() {
    let input = fixture("sample_square_symmetry");
    let group =
        VertexGroup::new(input.vertex_permutations.clone(), input.vertices.len()).unwrap();
    let sink = SharedSink::default();
    let facets = Enumeration::new(&input.vertices, Tag::Facet)
        .with_names(input.names.clone())
        .with_group(&group)
        .run_adjacency(Box::new(sink.clone()))
        .unwrap();
    assert_eq!(facets.len(), 1);
    assert_eq!(sink.lines().len(), 1);
}

#[test]
fn maps_lift_to_a_vertex_group_and_halve_the_square() {
    let input = fixture("sample_square_maps");
    let group = VertexGroup::from_maps(&input.maps, &input.vertices)
        .expect("a swap map permutes the square's vertices");
    let facets = Enumeration::new(&input.vertices, Tag::Facet)
        .with_names(input.names.clone())
        .with_maps(&input.maps)
        .with_group(&group)
        .run_adjacency(Box::new(std::io::sink()))
        .unwrap();
    // The swap pairs the four edges into two classes.
    assert_eq!(facets.len(), 2);
}

#[test]
fn map_classes_without_a_group_reduce_identically() {
    let input = fixture("sample_square_maps");
    let facets = Enumeration::new(&input.vertices, Tag::Facet)
        .with_names(input.names.clone())
        .with_maps(&input.maps)
        .run_adjacency(Box::new(std::io::sink()))
        .unwrap();
    assert_eq!(facets.len(), 2);
}

#[test]
fn thread_counts_agree_on_rug_integers() {
    let input = fixture("sample_cube");
    let single = Enumeration::new(&input.vertices, Tag::Facet)
        .with_threads(1)
        .run_adjacency(Box::new(std::io::sink()))
        .unwrap();
    let several = Enumeration::new(&input.vertices, Tag::Facet)
        .with_threads(4)
        .run_adjacency(Box::new(std::io::sink()))
        .unwrap();
    assert_eq!(single, several);
}
