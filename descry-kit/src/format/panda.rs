//! The keyword-sectioned native dialect.
//!
//! Uppercase keyword lines ending in `:` open sections; a blank line or the
//! next keyword closes one. Vertex and ray rows are plain integers;
//! inequalities, equations and map images are symbolic expressions over the
//! declared names.

use anyhow::{Context, Result, bail};
use descry::maps::Map;
use descry::num::Int;
use descry::ops;
use descry::types::{Matrix, Row};

use super::InputFile;
use super::expr::{self, Constraint, VariableTable};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Keyword {
    Names,
    Vertices,
    Rays,
    Inequalities,
    Equations,
    Maps,
    VertexPermutations,
}

fn keyword(line: &str) -> Option<Keyword> {
    match line {
        "NAMES:" => Some(Keyword::Names),
        "VERTICES:" | "ROWS:" | "REDUCED:" => Some(Keyword::Vertices),
        "RAYS:" => Some(Keyword::Rays),
        "INEQUALITIES:" => Some(Keyword::Inequalities),
        "EQUATIONS:" => Some(Keyword::Equations),
        "MAPS:" => Some(Keyword::Maps),
        "VERTEX_PERMUTATIONS:" => Some(Keyword::VertexPermutations),
        _ => None,
    }
}

pub fn is_keyword(line: &str) -> bool {
    keyword(line).is_some()
}

pub fn parse<N: Int>(text: &str) -> Result<InputFile<N>> {
    let mut sections: Vec<(Keyword, Vec<&str>)> = Vec::new();
    let mut current: Option<usize> = None;
    for raw in text.lines() {
        let line = raw.trim();
        if let Some(keyword) = keyword(line) {
            sections.push((keyword, Vec::new()));
            current = Some(sections.len() - 1);
        } else if line.is_empty() {
            current = None;
        } else {
            let Some(index) = current else {
                bail!("unexpected line outside of a section: \"{line}\"");
            };
            sections[index].1.push(line);
        }
    }

    let mut table: Option<VariableTable> = None;
    for (kind, body) in &sections {
        if *kind == Keyword::Names {
            let labels: Vec<String> = body
                .iter()
                .flat_map(|line| line.split_whitespace())
                .map(str::to_string)
                .collect();
            if table.is_some() {
                bail!("duplicate NAMES section");
            }
            table = Some(VariableTable::fixed(labels));
        }
    }
    let mut table = table.unwrap_or_else(VariableTable::implicit);

    let mut vertices: Matrix<N> = Vec::new();
    let mut rays: Matrix<N> = Vec::new();
    let mut constraints: Vec<Constraint<N>> = Vec::new();
    let mut map_lines: Vec<&str> = Vec::new();
    let mut permutation_lines: Vec<&str> = Vec::new();

    for (kind, body) in &sections {
        match kind {
            Keyword::Names => {}
            Keyword::Vertices => {
                for &line in body {
                    vertices.push(point_row(line, N::one())?);
                }
            }
            Keyword::Rays => {
                for &line in body {
                    let mut row = point_row(line, N::zero())?;
                    ops::normalize(&mut row);
                    rays.push(row);
                }
            }
            Keyword::Inequalities | Keyword::Equations => {
                for &line in body {
                    let mut constraint = expr::parse_constraint(line, &mut table)?;
                    if *kind == Keyword::Equations {
                        constraint.relation = expr::Relation::Equal;
                    }
                    constraints.push(constraint);
                }
            }
            Keyword::Maps => map_lines.extend(body),
            Keyword::VertexPermutations => permutation_lines.extend(body),
        }
    }

    let point_width = vertices
        .iter()
        .chain(&rays)
        .map(|row| row.len() - 1)
        .max();
    if let Some(width) = point_width {
        if vertices
            .iter()
            .chain(&rays)
            .any(|row| row.len() - 1 != width)
        {
            bail!("vertex and ray rows must all have the same dimension");
        }
        table.ensure_dimension(width)?;
    } else {
        let width = table.dimension();
        table.ensure_dimension(width)?;
    }
    let dimension = table.dimension();

    let mut inequalities: Matrix<N> = Vec::new();
    for constraint in &constraints {
        inequalities.extend(constraint.rows(dimension));
    }

    let mut maps = Vec::with_capacity(map_lines.len());
    for &line in &map_lines {
        maps.push(parse_map(line, &mut table, dimension)?);
    }

    // The permutations act on the whole point matrix, rays included.
    vertices.extend(rays);
    let mut vertex_permutations = Vec::with_capacity(permutation_lines.len());
    if !permutation_lines.is_empty() {
        if vertices.is_empty() {
            bail!("vertex permutations require a vertex section");
        }
        for &line in &permutation_lines {
            vertex_permutations.push(parse_permutation(line, vertices.len())?);
        }
    }

    super::finish(InputFile {
        names: table.into_names(),
        vertices,
        inequalities,
        maps,
        vertex_permutations,
    })
}

/// Reads a `VERTEX_PERMUTATIONS:` section from `text`, which must begin with
/// the keyword line itself. One generator per line; a blank line or the next
/// keyword ends the section.
pub fn vertex_permutations(text: &str, vertex_count: usize) -> Result<Vec<Vec<usize>>> {
    let mut lines = text.lines();
    if lines.next().map(str::trim) != Some("VERTEX_PERMUTATIONS:") {
        bail!("Cannot read vertex permutations: file is at an invalid position.");
    }
    let mut generators = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() || is_keyword(line) {
            break;
        }
        generators.push(parse_permutation(line, vertex_count)?);
    }
    Ok(generators)
}

fn parse_permutation(line: &str, vertex_count: usize) -> Result<Vec<usize>> {
    debug_assert!(vertex_count > 0, "permutations act on at least one vertex");
    let mut permutation = Vec::with_capacity(vertex_count);
    for token in line.split_whitespace() {
        let Ok(value) = token.parse::<usize>() else {
            break;
        };
        if value >= vertex_count {
            bail!(
                "Vertex index {value} out of range [0, {}] in permutation \"{line}\"",
                vertex_count - 1
            );
        }
        permutation.push(value);
    }
    if permutation.len() != vertex_count {
        bail!(
            "Permutation has {} entries but expected {vertex_count} (one per vertex).",
            permutation.len()
        );
    }
    Ok(permutation)
}

fn point_row<N: Int>(line: &str, homogenizing: N) -> Result<Row<N>> {
    let mut row = vec![homogenizing];
    for token in line.split_whitespace() {
        row.push(
            N::from_decimal(token)
                .with_context(|| format!("invalid coordinate \"{token}\" in \"{line}\""))?,
        );
    }
    if row.len() == 1 {
        bail!("empty coordinate row");
    }
    Ok(row)
}

/// One map per line, one image expression per coordinate; the homogenizing
/// column keeps its identity image.
fn parse_map<N: Int>(
    line: &str,
    table: &mut VariableTable,
    dimension: usize,
) -> Result<Map<N>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != dimension {
        bail!(
            "map \"{line}\" has {} images but the input has {dimension} coordinates",
            tokens.len()
        );
    }
    let mut images = Vec::with_capacity(dimension + 1);
    images.push(vec![(0, N::one())]);
    for token in tokens {
        images.push(expr::parse_image(token, table)?);
    }
    Ok(Map::new(images)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_are_homogenized() {
        let input: InputFile<i64> = parse("VERTICES:\n0 0\n1 0\n0 1\n").unwrap();
        assert_eq!(
            input.vertices,
            vec![vec![1, 0, 0], vec![1, 1, 0], vec![1, 0, 1]]
        );
        assert_eq!(input.names.labels(), ["x1", "x2"]);
    }

    #[test]
    fn rays_carry_a_zero_homogenizing_coordinate() {
        let input: InputFile<i64> = parse("VERTICES:\n0 0\n\nRAYS:\n2 2\n").unwrap();
        assert_eq!(input.vertices, vec![vec![1, 0, 0], vec![0, 1, 1]]);
    }

    #[test]
    fn named_inequalities_become_rows() {
        let text = "NAMES:\nx y\n\nINEQUALITIES:\n-x <= 0\nx + y <= 2\n";
        let input: InputFile<i64> = parse(text).unwrap();
        assert_eq!(input.inequalities, vec![vec![0, 1, 0], vec![2, -1, -1]]);
    }

    #[test]
    fn maps_parse_one_image_per_coordinate() {
        let text = "NAMES:\nx y\n\nVERTICES:\n0 0\n1 0\n1 1\n0 1\n\nMAPS:\ny x\n";
        let input: InputFile<i64> = parse(text).unwrap();
        assert_eq!(input.maps.len(), 1);
        assert!(input.maps[0].is_pure_permutation());
    }

    #[test]
    fn permutation_section_is_validated() {
        let text = "VERTICES:\n0\n1\n\nVERTEX_PERMUTATIONS:\n1 0\n";
        let input: InputFile<i64> = parse(text).unwrap();
        assert_eq!(input.vertex_permutations, vec![vec![1, 0]]);
    }
}
