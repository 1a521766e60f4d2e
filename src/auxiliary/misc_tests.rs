use approx::assert_relative_eq;

use crate::auxiliary::misc::{fold_unit, gcd, is_integral, lattice_distance};

#[test]
fn test_misc_fold_unit() {
    let (frac, offset) = fold_unit(1.25, 1e-5);
    assert_relative_eq!(frac, 0.25);
    assert_eq!(offset, 1);

    let (frac, offset) = fold_unit(-0.25, 1e-5);
    assert_relative_eq!(frac, 0.75);
    assert_eq!(offset, -1);

    let (frac, offset) = fold_unit(0.9999999, 1e-5);
    assert_relative_eq!(frac, 0.0);
    assert_eq!(offset, 1);

    let (frac, offset) = fold_unit(-1e-9, 1e-5);
    assert_relative_eq!(frac, 0.0);
    assert_eq!(offset, 0);
}

#[test]
fn test_misc_lattice_distance() {
    assert!(lattice_distance(0.1, 1.1) < 1e-12);
    assert!(lattice_distance(0.99999, 0.0) < 1e-4);
    assert_relative_eq!(lattice_distance(0.25, 0.75), 0.5);
    assert!(is_integral(2.0000001, 1e-5));
    assert!(!is_integral(0.5, 1e-5));
}

#[test]
fn test_misc_gcd() {
    assert_eq!(gcd(6, 12), 6);
    assert_eq!(gcd(-4, 12), 4);
    assert_eq!(gcd(0, 5), 5);
}
