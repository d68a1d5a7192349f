//! Randomized invariants of the elimination and reduction steps.

use std::collections::BTreeSet;

use proptest::prelude::*;

use descry::classes;
use descry::fme;
use descry::maps::Map;
use descry::ops;
use descry::types::{Matrix, Row, Tag};
use descry::Int;

fn homogenize(points: &BTreeSet<(i64, i64, i64)>) -> Matrix<i64> {
    points
        .iter()
        .map(|&(x, y, z)| vec![1, x, y, z])
        .collect()
}

fn full_dimensional(rows: &Matrix<i64>) -> bool {
    let refs: Vec<&[i64]> = rows.iter().map(|r| r.as_slice()).collect();
    ops::rank(&refs) == 4
}

fn point_sets() -> impl Strategy<Value = BTreeSet<(i64, i64, i64)>> {
    proptest::collection::btree_set((0..4i64, 0..4i64, 0..4i64), 4..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn elimination_produces_normalized_valid_facets(points in point_sets()) {
        let rows = homogenize(&points);
        prop_assume!(full_dimensional(&rows));
        let facets = fme::fourier_motzkin(&rows).unwrap();
        prop_assert!(!facets.is_empty());
        for facet in &facets {
            prop_assert_eq!(ops::row_gcd(facet), 1);
            for row in &rows {
                prop_assert!(!ops::distance(facet, row).is_negative());
            }
            let support: Vec<&[i64]> = rows
                .iter()
                .filter(|row| ops::distance(facet, row).is_zero())
                .map(|row| row.as_slice())
                .collect();
            prop_assert_eq!(ops::rank(&support), 3);
        }
    }

    #[test]
    fn every_input_point_satisfies_some_facet_with_equality(points in point_sets()) {
        let rows = homogenize(&points);
        prop_assume!(full_dimensional(&rows));
        let facets = fme::fourier_motzkin(&rows).unwrap();
        // Corner points of the hull lie on at least three facets; interior
        // points on none. At minimum the facets must touch every hull vertex,
        // so each facet's support is non-empty.
        for facet in &facets {
            prop_assert!(
                rows.iter().any(|row| ops::distance(facet, row).is_zero())
            );
        }
    }

    #[test]
    fn class_reduction_is_idempotent(points in point_sets()) {
        let rows = homogenize(&points);
        prop_assume!(full_dimensional(&rows));
        let facets: BTreeSet<Row<i64>> =
            fme::fourier_motzkin(&rows).unwrap().into_iter().collect();
        // Swap the first two coordinates; a symmetry of the bounding box.
        let swap = Map::new(vec![
            vec![(0, 1)],
            vec![(2, 1)],
            vec![(1, 1)],
            vec![(3, 1)],
        ])
        .unwrap();
        let maps = [swap];
        let once = classes::classes(&facets, &maps, Tag::Facet);
        let twice = classes::classes(&once.iter().cloned().collect(), &maps, Tag::Facet);
        prop_assert_eq!(once, twice);
    }
}
