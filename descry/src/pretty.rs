//! Human-readable rendering of result rows.

use std::fmt::Write;

use crate::num::Int;
use crate::types::Names;

/// Renders an inequality row as `a.x <= b`, e.g. `-x <= 0` or `x + 2y <= 3`.
pub fn format_inequality<N: Int>(row: &[N], names: &Names) -> String {
    debug_assert_eq!(names.len() + 1, row.len(), "one label per coordinate");
    let mut out = String::new();
    for (index, value) in row.iter().enumerate().skip(1) {
        let coefficient = value.ref_neg();
        if coefficient.is_zero() {
            continue;
        }
        if out.is_empty() {
            if coefficient.is_negative() {
                out.push('-');
            }
        } else if coefficient.is_negative() {
            out.push_str(" - ");
        } else {
            out.push_str(" + ");
        }
        let magnitude = coefficient.ref_abs();
        if magnitude != N::one() {
            let _ = write!(out, "{magnitude}");
        }
        out.push_str(names.label(index - 1));
    }
    if out.is_empty() {
        out.push('0');
    }
    let _ = write!(out, " <= {}", row[0]);
    out
}

/// Renders a point row verbatim, entries separated by single spaces.
pub fn format_row<N: Int>(row: &[N]) -> String {
    let mut out = String::new();
    for (index, value) in row.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{value}");
    }
    out
}
