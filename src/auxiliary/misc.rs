//! Small numerical helpers for fractional coordinates.

#[cfg(test)]
#[path = "misc_tests.rs"]
mod misc_tests;

/// Default tolerance for comparing fractional translations.
pub(crate) const FRACTION_TOLERANCE: f64 = 1.0e-5;

/// Folds a coordinate into the half-open unit interval $`[0, 1)`$.
///
/// Values within `tol` below an integer are folded to zero and counted towards the next cell.
///
/// # Arguments
///
/// * `x` - The coordinate to fold.
/// * `tol` - Tolerance for snapping values near an integer.
///
/// # Returns
///
/// A tuple `(frac, offset)` such that `x = frac + offset`.
pub(crate) fn fold_unit(x: f64, tol: f64) -> (f64, i32) {
    let offset = x.floor();
    let frac = x - offset;
    if frac > 1.0 - tol {
        (0.0, offset as i32 + 1)
    } else if frac < tol {
        (0.0, offset as i32)
    } else {
        (frac, offset as i32)
    }
}

/// Distance between two coordinates modulo lattice translations.
pub(crate) fn lattice_distance(a: f64, b: f64) -> f64 {
    let d = a - b;
    (d - d.round()).abs()
}

/// Checks whether a value is an integer within a tolerance.
pub(crate) fn is_integral(x: f64, tol: f64) -> bool {
    (x - x.round()).abs() < tol
}

/// Greatest common divisor of two integers.
pub(crate) fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
