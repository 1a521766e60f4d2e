use std::collections::HashSet;

use nalgebra::Matrix3;

use crate::symmetry::rotation_table::{
    element_matrices, lookup_rotation, pack_rotation, rotation_name, RotationFamily,
    HEXAGONAL_BIT_RANGE, ROTATION_ELEMENTS, UNNAMED_ROTATION,
};

#[test]
fn test_rotation_table_unique_ids() {
    let ids = ROTATION_ELEMENTS
        .iter()
        .map(|element| element.packed_id())
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 64);
    assert_eq!(
        ROTATION_ELEMENTS
            .iter()
            .filter(|element| element.family != RotationFamily::Hexagonal)
            .count(),
        48
    );
}

#[test]
fn test_rotation_table_determinants_and_inverses() {
    for element in ROTATION_ELEMENTS.iter() {
        let m = element.matrix();
        assert_eq!(m.determinant().round().abs(), 1.0, "{}", element.name);
        let inv = m.try_inverse().unwrap().map(f64::round);
        let inv_element = lookup_rotation(&inv).unwrap();
        assert_eq!(inv_element.name, element.name);
        assert_eq!(inv_element.bit, element.bit);
    }
}

#[test]
fn test_rotation_table_bits() {
    for element in ROTATION_ELEMENTS.iter() {
        assert!(element.bit <= 38);
        if element.family == RotationFamily::Hexagonal {
            assert!(HEXAGONAL_BIT_RANGE.contains(&element.bit));
        }
    }
    let identity = lookup_rotation(&Matrix3::identity()).unwrap();
    assert_eq!(identity.name, "1");
    assert_eq!(identity.mask(), 0);
    assert_eq!(lookup_rotation(&(-Matrix3::identity())).unwrap().mask(), 1);
}

#[test]
fn test_rotation_table_packing() {
    assert_eq!(pack_rotation(&Matrix3::zeros()), Some((0..9).map(|k| 3u32.pow(k)).sum()));
    assert_eq!(pack_rotation(&(Matrix3::identity() * 2.0)), None);
    let c3z = Matrix3::new(0.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 0.0, 1.0);
    assert_eq!(rotation_name(&c3z), "3(z)");
    assert_eq!(rotation_name(&(Matrix3::identity() * 2.0)), UNNAMED_ROTATION);
    assert_eq!(element_matrices("4(z)").len(), 2);
    assert_eq!(element_matrices("m(100)").len(), 1);
    assert!(element_matrices("5(z)").is_empty());
}
