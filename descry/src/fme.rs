//! Fourier-Motzkin elimination between the two cone descriptions.
//!
//! The generator rows `W` (homogenized points and rays) span the cone
//! `{ x : x = W^T u, u >= 0 }`. Its inequality description is the projection
//! of the system `u_j >= 0`, `x_i = sum_j W[j][i] u_j` onto the `x` columns,
//! obtained by eliminating the `u` columns one at a time: Gaussian pivot on
//! an equality row when one covers the column, positive/negative combination
//! of inequality rows otherwise. The construction is self-dual, so feeding
//! inequality rows yields the extreme rays of the polyhedron they cut out.
//!
//! Each derived inequality carries the index set of the original rows
//! combined into it. A row whose index set strictly contains another row's is
//! redundant and dropped, as is a row combining more than one original per
//! eliminated column; these two prunes keep the intermediate systems small
//! without losing facets.

use std::collections::BTreeSet;

use crate::DescryError as Error;
use crate::num::Int;
use crate::ops;
use crate::types::{Matrix, Row};

/// Retained inequality rows per elimination step in the heuristic variant.
const HEURISTIC_ROW_CAP: usize = 512;

/// All facet rows of the cone spanned by `input`.
pub fn fourier_motzkin<N: Int>(input: &Matrix<N>) -> Result<Matrix<N>, Error> {
    eliminate(input, None)
}

/// A subset of the facet rows, capped per elimination step. Cheaper on large
/// inputs; used to seed adjacency decomposition, which discovers the rest.
pub fn fourier_motzkin_heuristic<N: Int>(input: &Matrix<N>) -> Result<Matrix<N>, Error> {
    eliminate(input, Some(HEURISTIC_ROW_CAP))
}

#[derive(Clone, Debug)]
struct History {
    blocks: Vec<u64>,
}

impl History {
    fn singleton(capacity: usize, index: usize) -> Self {
        let mut blocks = vec![0u64; capacity.div_ceil(64)];
        blocks[index / 64] |= 1 << (index % 64);
        Self { blocks }
    }

    fn union(&self, other: &Self) -> Self {
        debug_assert_eq!(self.blocks.len(), other.blocks.len());
        Self {
            blocks: self
                .blocks
                .iter()
                .zip(&other.blocks)
                .map(|(a, b)| a | b)
                .collect(),
        }
    }

    fn cardinality(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    fn subset_of(&self, other: &Self) -> bool {
        self.blocks
            .iter()
            .zip(&other.blocks)
            .all(|(a, b)| a & !b == 0)
    }
}

#[derive(Clone, Debug)]
struct TableauRow<N: Int> {
    coeffs: Row<N>,
    /// `Some` for inequality rows (original-row index set), `None` for the
    /// equality rows tying `x` to the combination variables.
    history: Option<History>,
}

impl<N: Int> TableauRow<N> {
    fn nonzero_count(&self) -> usize {
        self.coeffs.iter().filter(|v| !v.is_zero()).count()
    }

    fn reduce(&mut self) {
        ops::normalize(&mut self.coeffs);
        if self.history.is_some() {
            return;
        }
        // Equality rows are valid up to sign; fix the first non-zero entry
        // positive so duplicates collapse.
        let flip = self
            .coeffs
            .iter()
            .find(|v| !v.is_zero())
            .is_some_and(|first| first.is_negative());
        if flip {
            for value in self.coeffs.iter_mut() {
                *value = value.ref_neg();
            }
        }
    }
}

fn eliminate<N: Int>(input: &Matrix<N>, cap: Option<usize>) -> Result<Matrix<N>, Error> {
    let generators = input.len();
    let Some(width) = input.first().map(Vec::len) else {
        return Err(Error::InvalidArgument {
            context: "elimination needs at least one input row",
        });
    };
    if width < 2 {
        return Err(Error::InvalidArgument {
            context: "elimination needs rows of width at least two",
        });
    }
    if input.iter().any(|row| row.len() != width) {
        return Err(Error::DimensionMismatch);
    }

    let total = generators + width;
    let mut rows: Vec<TableauRow<N>> = Vec::with_capacity(total);
    for index in 0..generators {
        let mut coeffs = vec![N::zero(); total];
        coeffs[index] = N::one();
        rows.push(TableauRow {
            coeffs,
            history: Some(History::singleton(generators, index)),
        });
    }
    for coordinate in 0..width {
        let mut coeffs = vec![N::zero(); total];
        for (index, row) in input.iter().enumerate() {
            coeffs[index] = row[coordinate].ref_neg();
        }
        coeffs[generators + coordinate] = N::one();
        rows.push(TableauRow {
            coeffs,
            history: None,
        });
    }

    let mut eliminated = 0usize;
    for column in 0..generators {
        let pivot_position = rows
            .iter()
            .position(|row| row.history.is_none() && !row.coeffs[column].is_zero());
        if let Some(position) = pivot_position {
            let mut pivot = rows.swap_remove(position);
            if pivot.coeffs[column].is_negative() {
                for value in pivot.coeffs.iter_mut() {
                    *value = value.ref_neg();
                }
            }
            let factor = pivot.coeffs[column].clone();
            for row in rows.iter_mut() {
                if row.coeffs[column].is_zero() {
                    continue;
                }
                let scale = row.coeffs[column].clone();
                for (value, p) in row.coeffs.iter_mut().zip(&pivot.coeffs) {
                    *value = value.ref_mul(&factor).ref_sub(&p.ref_mul(&scale));
                }
                row.reduce();
            }
        } else {
            eliminated += 1;
            let mut kept = Vec::new();
            let mut positive = Vec::new();
            let mut negative = Vec::new();
            for row in rows.drain(..) {
                let value = &row.coeffs[column];
                if value.is_zero() {
                    kept.push(row);
                } else if value.is_positive() {
                    positive.push(row);
                } else {
                    negative.push(row);
                }
            }
            for upper in &positive {
                for lower in &negative {
                    if let Some(row) = combine(upper, lower, column, eliminated) {
                        kept.push(row);
                    }
                }
            }
            rows = kept;
        }
        prune(&mut rows);
        if let Some(cap) = cap {
            enforce_cap(&mut rows, cap);
        }
        tracing::trace!(column, rows = rows.len(), "eliminated combination column");
    }

    collect_facets(input, rows, generators)
}

/// Positive combination of an inequality row with positive coefficient and
/// one with negative coefficient, zeroing `column`. `None` when the result
/// combines more originals than eliminated columns allow.
fn combine<N: Int>(
    upper: &TableauRow<N>,
    lower: &TableauRow<N>,
    column: usize,
    eliminated: usize,
) -> Option<TableauRow<N>> {
    let history = match (&upper.history, &lower.history) {
        (Some(a), Some(b)) => a.union(b),
        _ => unreachable!("equality rows are pivoted before combination"),
    };
    if history.cardinality() > eliminated + 1 {
        return None;
    }
    let upper_scale = upper.coeffs[column].clone();
    let lower_scale = lower.coeffs[column].ref_abs();
    let mut coeffs = Vec::with_capacity(upper.coeffs.len());
    for (a, b) in upper.coeffs.iter().zip(&lower.coeffs) {
        let mut value = a.ref_mul(&lower_scale);
        value.add_mul_assign(b, &upper_scale);
        coeffs.push(value);
    }
    if coeffs.iter().all(|v| v.is_zero()) {
        return None;
    }
    let mut row = TableauRow {
        coeffs,
        history: Some(history),
    };
    row.reduce();
    Some(row)
}

/// Drops duplicate functionals and inequality rows whose origin set strictly
/// contains another row's.
fn prune<N: Int>(rows: &mut Vec<TableauRow<N>>) {
    let mut seen: BTreeSet<Row<N>> = BTreeSet::new();
    rows.retain(|row| seen.insert(row.coeffs.clone()));

    let mut keep = vec![true; rows.len()];
    for i in 0..rows.len() {
        let Some(a) = &rows[i].history else { continue };
        for j in 0..rows.len() {
            if i == j || !keep[i] || !keep[j] {
                continue;
            }
            let Some(b) = &rows[j].history else { continue };
            if a.subset_of(b) && !b.subset_of(a) {
                keep[j] = false;
            }
        }
    }
    let mut index = 0;
    rows.retain(|_| {
        let retained = keep[index];
        index += 1;
        retained
    });
}

/// Keeps the `cap` cheapest inequality rows (fewest origins, then sparsest);
/// equality rows are structural and always survive.
fn enforce_cap<N: Int>(rows: &mut Vec<TableauRow<N>>, cap: usize) {
    let inequalities = rows.iter().filter(|row| row.history.is_some()).count();
    if inequalities <= cap {
        return;
    }
    let mut split: Vec<TableauRow<N>> = Vec::with_capacity(rows.len());
    let mut equalities = Vec::new();
    for row in rows.drain(..) {
        if row.history.is_some() {
            split.push(row);
        } else {
            equalities.push(row);
        }
    }
    split.sort_by_key(|row| {
        (
            row.history
                .as_ref()
                .map(History::cardinality)
                .unwrap_or(usize::MAX),
            row.nonzero_count(),
        )
    });
    split.truncate(cap);
    split.extend(equalities);
    *rows = split;
}

/// Projects the surviving inequality rows onto the `x` columns and keeps the
/// genuine facets: rows whose zero set among the input spans one dimension
/// less than the input itself.
fn collect_facets<N: Int>(
    input: &Matrix<N>,
    rows: Vec<TableauRow<N>>,
    generators: usize,
) -> Result<Matrix<N>, Error> {
    let input_refs: Vec<&[N]> = input.iter().map(|row| row.as_slice()).collect();
    let input_rank = ops::rank(&input_refs);
    if input_rank == 0 {
        return Ok(Vec::new());
    }

    let mut facets = BTreeSet::new();
    for row in rows.into_iter().filter(|row| row.history.is_some()) {
        debug_assert!(
            row.coeffs[..generators].iter().all(|v| v.is_zero()),
            "all combination columns must be eliminated"
        );
        let candidate: Row<N> = row.coeffs[generators..].to_vec();
        if candidate.iter().all(|v| v.is_zero()) {
            continue;
        }
        let candidate = ops::normalized(candidate);
        debug_assert!(
            input.iter().all(|p| !ops::distance(&candidate, p).is_negative()),
            "derived rows must be valid for every generator"
        );
        let support: Vec<&[N]> = input
            .iter()
            .filter(|point| ops::distance(&candidate, point).is_zero())
            .map(|point| point.as_slice())
            .collect();
        if ops::rank(&support) + 1 != input_rank {
            continue;
        }
        facets.insert(candidate);
    }
    Ok(facets.into_iter().collect())
}
