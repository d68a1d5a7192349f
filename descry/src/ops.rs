//! Exact row arithmetic and vertex selection.

use crate::num::Int;
use crate::types::{Row, Support};

/// Non-negative gcd of a row's entries; zero only for the zero row.
pub fn row_gcd<N: Int>(row: &[N]) -> N {
    let mut acc = N::zero();
    for value in row {
        if value.is_zero() {
            continue;
        }
        acc = acc.ref_gcd(value);
        if acc == N::one() {
            break;
        }
    }
    acc
}

/// Divides the row by its gcd when that gcd exceeds one.
pub fn normalize<N: Int>(row: &mut [N]) {
    let gcd = row_gcd(row);
    if gcd > N::one() {
        for value in row.iter_mut() {
            *value = value.ref_div(&gcd);
        }
    }
}

pub fn normalized<N: Int>(mut row: Row<N>) -> Row<N> {
    normalize(&mut row);
    row
}

/// Slack of an inequality at a point: the plain scalar product of the rows.
/// Non-negative exactly when the point satisfies the inequality, zero when it
/// lies on it.
pub fn distance<N: Int>(inequality: &[N], point: &[N]) -> N {
    debug_assert_eq!(inequality.len(), point.len(), "row width mismatch");
    let mut acc = N::zero();
    for (a, p) in inequality.iter().zip(point) {
        acc.add_mul_assign(a, p);
    }
    acc
}

/// The vertex deepest in the feasible side of `inequality` (maximal
/// distance). For a facet of a full-dimensional polytope this is a vertex
/// strictly off the facet. Ties go to the lowest index.
pub fn furthest_vertex<'a, N: Int>(vertices: &'a [Row<N>], inequality: &[N]) -> &'a Row<N> {
    let mut best: Option<(&'a Row<N>, N)> = None;
    for vertex in vertices {
        let d = distance(inequality, vertex);
        if best.as_ref().is_none_or(|(_, current)| d > *current) {
            best = Some((vertex, d));
        }
    }
    best.expect("furthest vertex needs a non-empty vertex list").0
}

/// The violating vertex closest to the hyperplane, or, once no violator is
/// left, the vertex of minimal absolute distance. Rotation pivots onto the
/// returned vertex each step; the no-violator case yields distance zero and
/// terminates the loop. Ties go to the lowest index.
pub fn nearest_vertex<'a, N: Int>(vertices: &'a [Row<N>], inequality: &[N]) -> &'a Row<N> {
    let mut violator: Option<(&'a Row<N>, N)> = None;
    let mut closest: Option<(&'a Row<N>, N)> = None;
    for vertex in vertices {
        let magnitude = distance(inequality, vertex);
        let negative = magnitude.is_negative();
        let magnitude = magnitude.ref_abs();
        if negative && violator.as_ref().is_none_or(|(_, m)| magnitude < *m) {
            violator = Some((vertex, magnitude.clone()));
        }
        if closest.as_ref().is_none_or(|(_, m)| magnitude < *m) {
            closest = Some((vertex, magnitude));
        }
    }
    violator
        .or(closest)
        .expect("nearest vertex needs a non-empty vertex list")
        .0
}

/// Indices of the vertices lying on the inequality, in ascending order.
pub fn vertex_support<N: Int>(inequality: &[N], vertices: &[Row<N>]) -> Support {
    vertices
        .iter()
        .enumerate()
        .filter(|(_, vertex)| distance(inequality, vertex).is_zero())
        .map(|(index, _)| index)
        .collect()
}

/// Rank of a set of rows by fraction-free Gaussian elimination.
pub fn rank<N: Int>(rows: &[&[N]]) -> usize {
    let Some(width) = rows.first().map(|row| row.len()) else {
        return 0;
    };
    let mut work: Vec<Row<N>> = rows.iter().map(|row| row.to_vec()).collect();
    let mut rank = 0;
    for column in 0..width {
        let Some(pivot_index) = (rank..work.len()).find(|&i| !work[i][column].is_zero()) else {
            continue;
        };
        work.swap(rank, pivot_index);
        let pivot = work[rank].clone();
        for row in work.iter_mut().skip(rank + 1) {
            if row[column].is_zero() {
                continue;
            }
            let scale = row[column].clone();
            for (value, p) in row.iter_mut().zip(&pivot) {
                *value = value.ref_mul(&pivot[column]).ref_sub(&p.ref_mul(&scale));
            }
            normalize(row);
        }
        rank += 1;
        if rank == work.len() {
            break;
        }
    }
    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(coords: &[i64]) -> Row<i64> {
        let mut row = vec![1];
        row.extend_from_slice(coords);
        row
    }

    #[test]
    fn row_gcd_reduces_to_primitive_form() {
        let mut row = vec![6i64, -9, 12];
        assert_eq!(row_gcd(&row), 3);
        normalize(&mut row);
        assert_eq!(row, vec![2, -3, 4]);
        assert_eq!(row_gcd(&[0i64, 0]), 0);
    }

    #[test]
    fn distance_is_the_slack() {
        // x <= 1 at the origin and at (1, 1).
        let facet = vec![1i64, -1, 0];
        assert_eq!(distance(&facet, &vertex(&[0, 0])), 1);
        assert_eq!(distance(&facet, &vertex(&[1, 1])), 0);
        assert_eq!(distance(&facet, &vertex(&[2, 0])), -1);
    }

    #[test]
    fn furthest_vertex_is_deepest_inside() {
        let vertices = vec![vertex(&[0]), vertex(&[1]), vertex(&[3])];
        let facet = vec![3i64, -1]; // x <= 3
        assert_eq!(furthest_vertex(&vertices, &facet), &vertex(&[0]));
    }

    #[test]
    fn nearest_vertex_prefers_violators() {
        let vertices = vec![vertex(&[0]), vertex(&[2]), vertex(&[5])];
        let row = vec![1i64, -1]; // x <= 1: violated by 2 and 5
        assert_eq!(nearest_vertex(&vertices, &row), &vertex(&[2]));
        let valid = vec![5i64, -1]; // x <= 5: tight at 5
        assert_eq!(nearest_vertex(&vertices, &valid), &vertex(&[5]));
    }

    #[test]
    fn rank_of_the_square_is_three() {
        let rows: Vec<Row<i64>> = vec![
            vertex(&[0, 0]),
            vertex(&[1, 0]),
            vertex(&[1, 1]),
            vertex(&[0, 1]),
        ];
        let refs: Vec<&[i64]> = rows.iter().map(|r| r.as_slice()).collect();
        assert_eq!(rank(&refs), 3);
    }
}
