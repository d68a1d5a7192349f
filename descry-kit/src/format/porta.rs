//! The PORTA file convention.
//!
//! `DIM = n` fixes the dimension; `CONV_SECTION` lists points,
//! `CONE_SECTION` rays, `INEQUALITIES_SECTION` symbolic constraints over
//! `x1 .. xn` (optionally prefixed with a `( k)` row label), `END` closes the
//! file. Only integer coordinates are accepted.

use anyhow::{Context, Result, bail};
use descry::num::Int;
use descry::ops;
use descry::types::{Matrix, Row};

use super::InputFile;
use super::expr::{self, Constraint, VariableTable};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Section {
    Conv,
    Cone,
    Inequalities,
}

pub fn parse<N: Int>(text: &str) -> Result<InputFile<N>> {
    let mut dimension: Option<usize> = None;
    let mut section: Option<Section> = None;
    let mut vertices: Matrix<N> = Vec::new();
    let mut rays: Matrix<N> = Vec::new();
    let mut constraints: Vec<Constraint<N>> = Vec::new();
    let mut table: Option<VariableTable> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("DIM") {
            let value = rest.trim_start().strip_prefix('=').map(str::trim);
            let Some(value) = value else {
                bail!("malformed dimension line \"{line}\"");
            };
            let value: usize = value
                .parse()
                .with_context(|| format!("invalid dimension \"{value}\""))?;
            if value == 0 {
                bail!("dimension must be positive");
            }
            dimension = Some(value);
            table = Some(VariableTable::fixed(
                (1..=value).map(|i| format!("x{i}")).collect(),
            ));
            continue;
        }
        match line {
            "CONV_SECTION" => {
                section = Some(Section::Conv);
                continue;
            }
            "CONE_SECTION" => {
                section = Some(Section::Cone);
                continue;
            }
            "INEQUALITIES_SECTION" => {
                section = Some(Section::Inequalities);
                continue;
            }
            "END" => break,
            _ => {}
        }
        let Some(current) = section else {
            bail!("unexpected line outside of a section: \"{line}\"");
        };
        let Some(dimension) = dimension else {
            bail!("DIM must be declared before any section");
        };
        match current {
            Section::Conv => vertices.push(point_row(line, dimension, N::one())?),
            Section::Cone => {
                let mut row = point_row(line, dimension, N::zero())?;
                ops::normalize(&mut row);
                rays.push(row);
            }
            Section::Inequalities => {
                let body = strip_label(line)?;
                let table = table.as_mut().expect("table exists once DIM is set");
                constraints.push(expr::parse_constraint(body, table)?);
            }
        }
    }

    let Some(dimension) = dimension else {
        bail!("missing DIM declaration");
    };
    let table = table.expect("table exists once DIM is set");

    let mut inequalities: Matrix<N> = Vec::new();
    for constraint in &constraints {
        inequalities.extend(constraint.rows(dimension));
    }

    vertices.extend(rays);
    super::finish(InputFile {
        names: table.into_names(),
        vertices,
        inequalities,
        maps: Vec::new(),
        vertex_permutations: Vec::new(),
    })
}

/// Strips an optional `( k)` row label.
fn strip_label(line: &str) -> Result<&str> {
    if !line.starts_with('(') {
        return Ok(line);
    }
    let Some(close) = line.find(')') else {
        bail!("unclosed row label in \"{line}\"");
    };
    Ok(line[close + 1..].trim_start())
}

fn point_row<N: Int>(line: &str, dimension: usize, homogenizing: N) -> Result<Row<N>> {
    let mut row = vec![homogenizing];
    for token in line.split_whitespace() {
        if token.contains('/') {
            bail!("fractional coordinates are not supported: \"{token}\"");
        }
        row.push(
            N::from_decimal(token)
                .with_context(|| format!("invalid coordinate \"{token}\" in \"{line}\""))?,
        );
    }
    if row.len() - 1 != dimension {
        bail!(
            "row \"{line}\" has {} coordinates but DIM = {dimension}",
            row.len() - 1
        );
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conv_and_cone_sections_are_homogenized() {
        let text = "DIM = 2\n\nCONV_SECTION\n0 0\n1 0\n\nCONE_SECTION\n0 2\n\nEND\n";
        let input: InputFile<i64> = parse(text).unwrap();
        assert_eq!(
            input.vertices,
            vec![vec![1, 0, 0], vec![1, 1, 0], vec![0, 0, 1]]
        );
    }

    #[test]
    fn labelled_inequalities_parse() {
        let text = "DIM = 2\n\nINEQUALITIES_SECTION\n( 1) -x1 <= 0\n( 2) x1 + x2 <= 2\n\nEND\n";
        let input: InputFile<i64> = parse(text).unwrap();
        assert_eq!(input.inequalities, vec![vec![0, 1, 0], vec![2, -1, -1]]);
    }

    #[test]
    fn fractions_are_rejected() {
        let text = "DIM = 1\n\nCONV_SECTION\n1/2\n\nEND\n";
        assert!(parse::<i64>(text).is_err());
    }

    #[test]
    fn dim_is_mandatory() {
        assert!(parse::<i64>("CONV_SECTION\n0 0\nEND\n").is_err());
    }
}
