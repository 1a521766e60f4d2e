use approx::assert_relative_eq;
use proptest::prelude::*;

use crate::auxiliary::lattice::{
    hexagonal_to_rhombohedral_indices, inverse_d_squared, inverse_d_squared_vector,
    rhombohedral_to_hexagonal_indices, UnitCell,
};
use crate::symmetry::SymmetryError;

fn assert_cell_eq(a: &UnitCell, b: &UnitCell) {
    for i in 0..3 {
        assert_relative_eq!(a.lengths[i], b.lengths[i], epsilon = 1e-6);
        assert_relative_eq!(a.angles[i], b.angles[i], epsilon = 1e-6);
    }
}

#[test]
fn test_lattice_cell_a_tensor_round_trip() {
    let cells = [
        UnitCell::new([5.1, 6.2, 7.3], [81.0, 97.5, 103.2]).unwrap(),
        UnitCell::new([4.0, 9.5, 3.3], [90.0, 90.0, 90.0]).unwrap(),
        UnitCell::new([7.7, 5.4, 11.9], [90.0, 112.4, 90.0]).unwrap(),
        UnitCell::new([3.9, 3.9, 12.1], [90.0, 90.0, 120.0]).unwrap(),
    ];
    for cell in cells {
        let a = cell.to_a_tensor().unwrap();
        assert_cell_eq(&UnitCell::from_a_tensor(&a).unwrap(), &cell);
    }
}

#[test]
fn test_lattice_a_tensor_cubic() {
    let cell = UnitCell::cubic(4.0).unwrap();
    let a = cell.to_a_tensor().unwrap();
    assert_relative_eq!(a[0], 1.0 / 16.0);
    assert_relative_eq!(a[3], 0.0, epsilon = 1e-12);
    assert_relative_eq!(inverse_d_squared(&[1, 1, 1], &a), 3.0 / 16.0);
    assert_relative_eq!(cell.volume(), 64.0, epsilon = 1e-9);
    assert_eq!(cell.max_indices(2.0), [2, 2, 2]);
}

#[test]
fn test_lattice_hexagonal_d_spacing() {
    let cell = UnitCell::new([3.0, 3.0, 5.0], [90.0, 90.0, 120.0]).unwrap();
    let a = cell.to_a_tensor().unwrap();
    // 1/d^2 = 4/3 (h^2 + hk + k^2)/a^2 + l^2/c^2
    let expected = 4.0 / 3.0 * (1.0 + 1.0 + 1.0) / 9.0 + 4.0 / 25.0;
    assert_relative_eq!(inverse_d_squared(&[1, 1, 2], &a), expected, epsilon = 1e-12);
    assert_relative_eq!(
        inverse_d_squared_vector(&nalgebra::Vector3::new(1.0, 1.0, 2.0), &a),
        expected,
        epsilon = 1e-12
    );
}

#[test]
fn test_lattice_invalid_cells() {
    assert!(matches!(
        UnitCell::new([0.0, 1.0, 1.0], [90.0; 3]),
        Err(SymmetryError::InvalidCell(_))
    ));
    assert!(matches!(
        UnitCell::new([1.0; 3], [90.0, 180.0, 90.0]),
        Err(SymmetryError::InvalidCell(_))
    ));
    assert!(matches!(
        UnitCell::new([1.0; 3], [130.0, 130.0, 130.0]),
        Err(SymmetryError::InvalidCell(_))
    ));
    assert!(UnitCell::from_a_tensor(&[-1.0, 1.0, 1.0, 0.0, 0.0, 0.0]).is_err());
}

#[test]
fn test_lattice_rhombohedral_hexagonal_cells() {
    let rh = UnitCell::new([5.0; 3], [60.0; 3]).unwrap();
    let hx = rh.rhombohedral_to_hexagonal().unwrap();
    assert_relative_eq!(hx.lengths[0], 5.0, epsilon = 1e-9);
    assert_relative_eq!(hx.lengths[2], 5.0 * 6.0_f64.sqrt(), epsilon = 1e-9);
    assert_relative_eq!(rh.volume() * 3.0, hx.volume(), epsilon = 1e-6);
    assert_cell_eq(&hx.hexagonal_to_rhombohedral().unwrap(), &rh);
    assert!(UnitCell::cubic(3.0).unwrap().hexagonal_to_rhombohedral().is_err());
    assert!(UnitCell::new([3.0, 3.0, 4.0], [90.0, 90.0, 120.0])
        .unwrap()
        .rhombohedral_to_hexagonal()
        .is_err());
}

#[test]
fn test_lattice_rhombohedral_indices() {
    assert_eq!(hexagonal_to_rhombohedral_indices(&[0, 0, 3]), Some([1, 1, 1]));
    assert_eq!(hexagonal_to_rhombohedral_indices(&[1, 0, 1]), Some([1, 0, 0]));
    assert_eq!(hexagonal_to_rhombohedral_indices(&[1, 0, 0]), None);
    assert_eq!(rhombohedral_to_hexagonal_indices(&[1, 0, 0]), [1, 0, 1]);
    assert_eq!(rhombohedral_to_hexagonal_indices(&[1, 1, 1]), [0, 0, 3]);
}

proptest! {
    #[test]
    fn test_lattice_rhombohedral_indices_round_trip(h in -6i32..6, k in -6i32..6, l in -6i32..6) {
        let hx = rhombohedral_to_hexagonal_indices(&[h, k, l]);
        let back = hexagonal_to_rhombohedral_indices(&hx).unwrap();
        if h >= 0 {
            prop_assert_eq!(back, [h, k, l]);
        } else {
            prop_assert_eq!(back, [-h, -k, -l]);
        }
    }
}
