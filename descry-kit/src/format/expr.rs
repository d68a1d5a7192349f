//! Linear constraint and map-image expressions.
//!
//! Grammar (whitespace-insensitive): a side is a sum of terms, a term is an
//! optional sign, an optional integer coefficient and an optional variable
//! name, e.g. `-x1`, `2y`, `3`, `2 x1`. Constraints are two sides joined by
//! `<=`, `>=`, `=` or `==`.

use anyhow::{Context, Result, bail};
use descry::num::Int;
use descry::types::{Names, Row};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

/// A constraint with variables resolved to coordinate columns,
/// constants folded to the right-hand side.
#[derive(Clone, Debug)]
pub(crate) struct Constraint<N: Int> {
    pub terms: Vec<(usize, N)>,
    pub rhs: N,
    pub relation: Relation,
}

impl<N: Int> Constraint<N> {
    /// Homogenized inequality rows of width `dimension + 1`; equations
    /// expand into their two opposite inequalities.
    pub fn rows(&self, dimension: usize) -> Vec<Row<N>> {
        // a.x <= b is stored as (b, -a).
        let mut less = vec![N::zero(); dimension + 1];
        less[0] = self.rhs.clone();
        for (column, factor) in &self.terms {
            less[1 + column] = less[1 + column].ref_sub(factor);
        }
        let greater: Row<N> = less.iter().map(Int::ref_neg).collect();
        match self.relation {
            Relation::LessEq => vec![less],
            Relation::GreaterEq => vec![greater],
            Relation::Equal => vec![less, greater],
        }
    }
}

/// Maps variable names to coordinate columns. With a `NAMES:` section the
/// table is fixed; otherwise `x1 .. xd` labels are accepted and the table
/// grows to the highest index used.
#[derive(Clone, Debug)]
pub(crate) struct VariableTable {
    names: Vec<String>,
    fixed: bool,
}

impl VariableTable {
    pub fn fixed(names: Vec<String>) -> Self {
        Self { names, fixed: true }
    }

    pub fn implicit() -> Self {
        Self {
            names: Vec::new(),
            fixed: false,
        }
    }

    pub fn resolve(&mut self, name: &str) -> Result<usize> {
        if let Some(position) = self.names.iter().position(|n| n == name) {
            return Ok(position);
        }
        if self.fixed {
            bail!("unknown variable \"{name}\"");
        }
        let index = name
            .strip_prefix('x')
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|&index| index >= 1);
        let Some(index) = index else {
            bail!("unknown variable \"{name}\" (declare names in a NAMES section)");
        };
        while self.names.len() < index {
            self.names.push(format!("x{}", self.names.len() + 1));
        }
        Ok(index - 1)
    }

    /// Grows an implicit table to at least `dimension` coordinates.
    pub fn ensure_dimension(&mut self, dimension: usize) -> Result<()> {
        if self.fixed {
            if self.names.len() != dimension {
                bail!(
                    "rows have {dimension} coordinates but {} names are declared",
                    self.names.len()
                );
            }
            return Ok(());
        }
        if self.names.len() > dimension {
            bail!(
                "variable {} exceeds the {dimension}-dimensional rows",
                self.names.last().expect("non-empty table")
            );
        }
        while self.names.len() < dimension {
            self.names.push(format!("x{}", self.names.len() + 1));
        }
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.names.len()
    }

    pub fn into_names(self) -> Names {
        Names::new(self.names)
    }
}

#[derive(Clone, Debug, Default)]
struct Side<N> {
    terms: Vec<(String, N)>,
    constant: N,
}

/// Parses a full constraint line.
pub(crate) fn parse_constraint<N: Int>(
    line: &str,
    table: &mut VariableTable,
) -> Result<Constraint<N>> {
    let mut cursor = Cursor::new(line);
    let lhs: Side<N> = parse_side(&mut cursor)?;
    let Some(relation) = cursor.relation()? else {
        bail!("constraint \"{line}\" is missing a relation");
    };
    let rhs: Side<N> = parse_side(&mut cursor)?;
    if !cursor.at_end() {
        bail!("trailing input in constraint \"{line}\"");
    }

    let mut terms: Vec<(usize, N)> = Vec::new();
    let mut add = |column: usize, factor: N| {
        if let Some((_, existing)) = terms.iter_mut().find(|(c, _)| *c == column) {
            *existing = existing.ref_add(&factor);
        } else {
            terms.push((column, factor));
        }
    };
    for (name, factor) in lhs.terms {
        add(table.resolve(&name)?, factor);
    }
    for (name, factor) in rhs.terms {
        add(table.resolve(&name)?, factor.ref_neg());
    }
    terms.retain(|(_, factor)| !factor.is_zero());
    Ok(Constraint {
        terms,
        rhs: rhs.constant.ref_sub(&lhs.constant),
        relation,
    })
}

/// Parses a compact map image such as `x2`, `-x1`, `x1+x3` or `2x1-1` into
/// `(column, factor)` terms over the homogenized columns (constants land on
/// column 0).
pub(crate) fn parse_image<N: Int>(
    token: &str,
    table: &mut VariableTable,
) -> Result<Vec<(usize, N)>> {
    let mut cursor = Cursor::new(token);
    let side: Side<N> = parse_side(&mut cursor)?;
    if !cursor.at_end() || cursor.relation()?.is_some() {
        bail!("malformed map image \"{token}\"");
    }
    let mut terms = Vec::with_capacity(side.terms.len() + 1);
    if !side.constant.is_zero() {
        terms.push((0, side.constant));
    }
    for (name, factor) in side.terms {
        terms.push((1 + table.resolve(&name)?, factor));
    }
    if terms.is_empty() {
        bail!("map image \"{token}\" is empty");
    }
    Ok(terms)
}

struct Cursor<'a> {
    chars: Vec<char>,
    position: usize,
    source: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            source,
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .chars
            .get(self.position)
            .is_some_and(|c| c.is_whitespace())
        {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.position == self.chars.len()
    }

    fn at_relation(&mut self) -> bool {
        self.skip_whitespace();
        matches!(self.peek(), Some('<' | '>' | '='))
    }

    fn relation(&mut self) -> Result<Option<Relation>> {
        self.skip_whitespace();
        let relation = match self.peek() {
            Some('<') => {
                self.expect_pair('=')?;
                Relation::LessEq
            }
            Some('>') => {
                self.expect_pair('=')?;
                Relation::GreaterEq
            }
            Some('=') => {
                self.position += 1;
                if self.peek() == Some('=') {
                    self.position += 1;
                }
                Relation::Equal
            }
            _ => return Ok(None),
        };
        Ok(Some(relation))
    }

    fn expect_pair(&mut self, second: char) -> Result<()> {
        self.position += 1;
        if self.peek() != Some(second) {
            bail!("malformed relation in \"{}\"", self.source);
        }
        self.position += 1;
        Ok(())
    }

    fn digits(&mut self) -> Option<String> {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }
        (self.position > start).then(|| self.chars[start..self.position].iter().collect())
    }

    fn name(&mut self) -> Option<String> {
        if !self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            return None;
        }
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.position += 1;
        }
        Some(self.chars[start..self.position].iter().collect())
    }
}

fn parse_side<N: Int>(cursor: &mut Cursor<'_>) -> Result<Side<N>> {
    let mut side = Side {
        terms: Vec::new(),
        constant: N::zero(),
    };
    loop {
        if cursor.at_end() || cursor.at_relation() {
            return Ok(side);
        }
        let mut negative = false;
        while let Some(sign) = cursor.peek().filter(|c| *c == '+' || *c == '-') {
            if sign == '-' {
                negative = !negative;
            }
            cursor.position += 1;
            cursor.skip_whitespace();
        }
        let digits = cursor.digits();
        cursor.skip_whitespace();
        let name = cursor.name();
        match (digits, name) {
            (None, None) => bail!("expected a term in \"{}\"", cursor.source),
            (digits, Some(name)) => {
                let mut factor = match digits {
                    Some(digits) => N::from_decimal(&digits)
                        .with_context(|| format!("invalid coefficient in \"{}\"", cursor.source))?,
                    None => N::one(),
                };
                if negative {
                    factor = factor.ref_neg();
                }
                side.terms.push((name, factor));
            }
            (Some(digits), None) => {
                let mut value = N::from_decimal(&digits)
                    .with_context(|| format!("invalid constant in \"{}\"", cursor.source))?;
                if negative {
                    value = value.ref_neg();
                }
                side.constant = side.constant.ref_add(&value);
            }
        }
    }
}
