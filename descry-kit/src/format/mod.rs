//! Input file parsing.
//!
//! Two line-oriented dialects are understood: the keyword-sectioned native
//! dialect (`panda`) and the `DIM`/`*_SECTION` convention used by the PORTA
//! tools (`porta`). Both produce the same [`InputFile`].

pub mod panda;
pub mod porta;

mod expr;

use anyhow::{Result, bail};
use descry::maps::Map;
use descry::num::Int;
use descry::types::{Matrix, Names};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dialect {
    Panda,
    Porta,
}

/// A parsed input description, homogenized and ready for the engine.
///
/// `vertices` holds point rows `(1, p)` and ray rows `(0, r)`; a non-empty
/// vertex section selects facet enumeration, with `inequalities` acting as
/// trusted extra seeds. A file with only `inequalities` selects vertex
/// enumeration.
#[derive(Clone, Debug)]
pub struct InputFile<N: Int> {
    pub names: Names,
    pub vertices: Matrix<N>,
    pub inequalities: Matrix<N>,
    pub maps: Vec<Map<N>>,
    pub vertex_permutations: Vec<Vec<usize>>,
}

impl<N: Int> InputFile<N> {
    pub fn dimension(&self) -> usize {
        self.names.len()
    }
}

/// Guesses the dialect from the file content.
pub fn detect(text: &str) -> Dialect {
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with("DIM") || line.ends_with("_SECTION") || line == "END" {
            return Dialect::Porta;
        }
        if panda::is_keyword(line) {
            return Dialect::Panda;
        }
    }
    Dialect::Panda
}

pub fn parse<N: Int>(text: &str) -> Result<InputFile<N>> {
    match detect(text) {
        Dialect::Panda => panda::parse(text),
        Dialect::Porta => porta::parse(text),
    }
}

/// Shared final checks for both dialects.
fn finish<N: Int>(input: InputFile<N>) -> Result<InputFile<N>> {
    let dimension = input.names.len();
    if dimension == 0 {
        bail!("input declares no coordinates");
    }
    for row in input.vertices.iter().chain(&input.inequalities) {
        if row.len() != dimension + 1 {
            bail!(
                "row has {} coordinates but the input is {dimension}-dimensional",
                row.len() - 1
            );
        }
    }
    for map in &input.maps {
        if map.width() != dimension + 1 {
            bail!("map does not cover every coordinate");
        }
    }
    for permutation in &input.vertex_permutations {
        if permutation.len() != input.vertices.len() {
            bail!(
                "Permutation has {} entries but expected {} (one per vertex).",
                permutation.len(),
                input.vertices.len()
            );
        }
    }
    Ok(input)
}
