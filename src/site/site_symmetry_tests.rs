use nalgebra::{Matrix3, Vector3};
use proptest::prelude::*;

use crate::group::expansion::ExpandedOperator;
use crate::group::test_groups::test_group;
use crate::site::site_symmetry::{classify_site, ClassificationPrecision};
use crate::symmetry::rotation_table::pack_rotation;
use crate::symmetry::symmetry_operator::SymmetryOperator;
use crate::symmetry::SymmetryError;

const TOL: f64 = 2.0e-4;
const THIRD: f64 = 1.0 / 3.0;

#[test]
fn test_site_symmetry_centred_inversion() {
    let site = classify_site(&Vector3::new(0.25, 0.25, 0.5), &test_group("C 2/c"), TOL);
    assert_eq!(site.label, "-1");
    assert_eq!(site.multiplicity, 4);
    assert_eq!(site.precision, ClassificationPrecision::Exact);
    assert_eq!(site.stabiliser, vec![0, 6]);
    assert_eq!(site.code, 1);

    // The same point is a general position without the C centering.
    let site = classify_site(&Vector3::new(0.25, 0.25, 0.5), &test_group("P 2/c"), TOL);
    assert_eq!(site.label, "1");
    assert_eq!(site.multiplicity, 4);
}

#[test]
fn test_site_symmetry_labels() {
    let cases = [
        ("P 2/c", [0.0, 0.0, 0.0], "-1", 2),
        ("P 2/c", [0.0, 0.3, 0.25], "2(y)", 2),
        ("P m m m", [0.0, 0.0, 0.0], "mmm", 1),
        ("P m m m", [0.25, 0.0, 0.0], "mm2(x)", 2),
        ("P m m m", [0.1, 0.2, 0.5], "m(z)", 4),
        ("P m m 2", [0.0, 0.5, 0.2], "mm2(z)", 1),
        ("P 2 2 2", [0.0, 0.0, 0.2], "2(z)", 2),
        ("P b c a", [0.0, 0.0, 0.0], "-1", 4),
        ("P 4/m m m", [0.0, 0.0, 0.0], "4/mmm(z)", 1),
        ("P 4/m m m", [0.5, 0.0, 0.0], "mmm", 2),
        ("P 4/m m m", [0.2, 0.2, 0.0], "mm2(110)", 4),
        ("P -4 2 m", [0.0, 0.0, 0.0], "-42m(z)", 1),
        ("P -4 2 m", [0.2, 0.2, 0.1], "m(1-10)", 4),
        ("P 3", [THIRD, 2.0 * THIRD, 0.15], "3", 1),
        ("P -3 m 1", [0.0, 0.0, 0.5], "-3m1", 1),
        ("P -3 m 1", [THIRD, 2.0 * THIRD, 0.2], "3m1", 2),
        ("R -3 m", [0.0, 0.0, 0.0], "-3m1", 3),
        ("R -3 m", [0.0, 0.0, 0.2], "3m1", 6),
        ("R -3 m :R", [0.0, 0.0, 0.0], "-3m(111)", 1),
        ("R -3 m :R", [0.2, 0.2, 0.2], "3m(111)", 2),
        ("P 6/m m m", [0.0, 0.0, 0.0], "6/mmm", 1),
        ("P 6/m m m", [THIRD, 2.0 * THIRD, 0.0], "-6m2", 2),
        ("P 6/m m m", [0.5, 0.0, 0.0], "mmm(z;100)", 3),
        ("P 6/m m m", [0.2, 0.0, 0.0], "mm2(100)", 6),
        ("P 6/m m m", [0.2, 0.4, 0.0], "mm2(120)", 6),
        ("P 63/m m c", [0.0, 0.0, 0.0], "-3m1", 2),
        ("P 63/m m c", [THIRD, 2.0 * THIRD, 0.25], "-6m2", 2),
        ("P m -3", [0.0, 0.0, 0.0], "m-3", 1),
        ("P m -3", [0.5, 0.0, 0.0], "mmm", 3),
        ("F m -3 m", [0.0, 0.0, 0.0], "m-3m", 4),
        ("F m -3 m", [0.25, 0.25, 0.25], "-43m", 8),
        ("F m -3 m", [0.0, 0.25, 0.25], "mmm(x;011)", 24),
        ("F m -3 m", [0.2, 0.2, 0.2], "3m(111)", 32),
    ];
    for (symbol, x, label, multiplicity) in cases {
        let group = test_group(symbol);
        let site = classify_site(&Vector3::from(x), &group, TOL);
        assert_eq!(site.label, label, "{symbol} at {x:?}");
        assert_eq!(site.multiplicity, multiplicity, "{symbol} at {x:?}");
        assert_eq!(site.multiplicity * site.stabiliser.len(), group.len());
        assert!(site.is_exact());
    }
}

#[test]
fn test_site_symmetry_tolerance() {
    let group = test_group("P m m m");
    let near = Vector3::new(0.1, 0.2, 0.5 + 5.0e-5);
    assert_eq!(classify_site(&near, &group, TOL).label, "m(z)");
    assert_eq!(classify_site(&near, &group, 1.0e-6).label, "1");
}

#[test]
fn test_site_symmetry_degraded() {
    // An operator list that is not closed: 2(x) and 2(110) without their product.
    let mut group = test_group("P 1");
    for rows in ["x, -y, -z", "y, x, -z"] {
        let operator: SymmetryOperator = rows.parse().unwrap();
        group.operators.push(ExpandedOperator {
            packed_id: pack_rotation(&operator.rotation),
            operator,
            generator_index: group.operators.len(),
            centering_index: 0,
            inverted: false,
            cell_offset: Vector3::zeros(),
        });
    }
    let site = classify_site(&Vector3::zeros(), &group, TOL);
    assert_eq!(site.label, "sp");
    assert_eq!(site.precision, ClassificationPrecision::Degraded);
    assert_eq!(site.multiplicity, 1);
    assert_eq!(site.stabiliser_rotations.len(), 3);
    assert!(site.stabiliser_rotations.contains(&Matrix3::identity()));
    assert!(matches!(
        site.clone().require_exact(),
        Err(SymmetryError::DegradedClassification(_))
    ));

    let constraints = site.constraints();
    assert_eq!(constraints.pattern_codes, None);
    assert_eq!(constraints.position_indices, [0, 0, 0]);
}

#[test]
fn test_site_symmetry_display() {
    let site = classify_site(&Vector3::new(0.25, 0.25, 0.5), &test_group("C 2/c"), TOL);
    assert_eq!(
        site.to_string(),
        "(0.25000, 0.25000, 0.50000): -1 (multiplicity 4, exact classification)"
    );
}

proptest! {
    #[test]
    fn test_site_symmetry_multiplicity_conservation(
        index in 0usize..6,
        x in prop::sample::select(vec![0.0, 0.125, 0.25, 0.5, 0.75, 0.1234]),
        y in prop::sample::select(vec![0.0, 0.25, 0.5, 0.3817]),
        z in prop::sample::select(vec![0.0, 0.25, 0.5, 0.6621]),
    ) {
        let symbol = ["P 2/c", "C 2/c", "P m m m", "P 4/m m m", "P m -3", "F m -3 m"][index];
        let group = test_group(symbol);
        let position = Vector3::new(x, y, z);
        let site = classify_site(&position, &group, TOL);
        prop_assert_eq!(site.multiplicity * site.stabiliser.len(), group.len());
        let orbit = crate::site::orbit::generate_orbit(
            &position,
            &group,
            &crate::site::orbit::OrbitParams::default(),
        );
        prop_assert_eq!(orbit.n_unique(), site.multiplicity);
        prop_assert!(site.is_exact());
    }
}
