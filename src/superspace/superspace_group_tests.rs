use approx::assert_relative_eq;
use nalgebra::{Matrix3, RowVector3};

use crate::group::test_groups::test_group;
use crate::superspace::superspace_group::{lift_rotation, SuperspaceGroupDescriptor};
use crate::symmetry::{SymbolDiagnostic, SymmetryError};

fn build(symbol: &str, superspace: &str) -> Result<SuperspaceGroupDescriptor, SymmetryError> {
    SuperspaceGroupDescriptor::build(&test_group(symbol), superspace)
}

#[test]
fn test_superspace_lift_rotation() {
    let c2z = Matrix3::new(-1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0);
    let (h_row, epsilon) = lift_rotation(&c2z, &"(1/2 0 g)".parse().unwrap()).unwrap();
    assert_eq!(h_row, RowVector3::new(-1.0, 0.0, 0.0));
    assert_relative_eq!(epsilon, 1.0);

    let (h_row, epsilon) = lift_rotation(&c2z, &"(a0g)".parse().unwrap()).unwrap();
    assert_eq!(h_row, RowVector3::zeros());
    assert_relative_eq!(epsilon, -1.0);

    assert!(lift_rotation(&c2z, &"(1/3 0 g)".parse().unwrap()).is_err());

    let c4z = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    assert!(lift_rotation(&c4z, &"(a0g)".parse().unwrap()).is_err());
    assert!(lift_rotation(&c4z, &"(00g)".parse().unwrap()).is_ok());
}

#[test]
fn test_superspace_p2m_without_generator_letters() {
    let group = test_group("P 2/m");
    let ssg = SuperspaceGroupDescriptor::build(&group, "(a0g)").unwrap();
    assert_eq!(ssg.generators.len(), 2);
    for (lifted, op) in ssg.generators.iter().zip(group.generators()) {
        assert_eq!(lifted.spatial_part().rotation, op.operator.rotation);
    }
    assert_relative_eq!(ssg.generators[0].epsilon(), 1.0);
    assert_relative_eq!(ssg.generators[1].epsilon(), -1.0);
    assert_eq!(ssg.generators[1].to_xyz_string(), "-x, y, -z, -t");
    assert_eq!(ssg.kl, vec![-1, 1]);
    assert_eq!(ssg.generator_symbol, "00");
    assert_eq!(ssg.symbol(), "P 2/m(a0g)00");
    assert_eq!(ssg.operators.len(), 4);
    assert!(ssg.operators.iter().all(|op| op.tau().abs() < 1e-10));
    assert!(ssg.is_closed());
}

#[test]
fn test_superspace_p2m_with_glide_in_internal_space() {
    let ssg = build("P 2/m", "(a0g)0s").unwrap();
    // Operators are ordered 1, 2(y), -1, m(y).
    assert_relative_eq!(ssg.operators[1].tau(), 0.0);
    assert_relative_eq!(ssg.operators[2].tau(), 0.5);
    assert_relative_eq!(ssg.operators[3].tau(), 0.5);
    assert_eq!(ssg.operators[3].to_xyz_string(), "x, -y, z, t+1/2");
    assert!(ssg.is_closed());

    assert!(ssg.is_systematically_absent(&[1, 0, 1, 1]));
    assert!(!ssg.is_systematically_absent(&[1, 0, 1, 2]));
    assert!(!ssg.is_systematically_absent(&[1, 1, 1, 1]));
}

#[test]
fn test_superspace_orthorhombic_closure() {
    let ssg = build("P 2 2 2", "(00g)00s").unwrap();
    assert_eq!(ssg.kl, vec![-1, -1, 1]);
    // Operators are ordered 1, 2(z), 2(x), 2(y).
    assert_relative_eq!(ssg.operators[1].tau(), 0.5);
    assert_relative_eq!(ssg.operators[2].tau(), 0.0);
    assert_relative_eq!(ssg.operators[3].tau(), 0.5);
    assert!(ssg.is_closed());

    let err = build("P 2 2 2", "(00g)sss").unwrap_err();
    assert!(matches!(err, SymmetryError::ClosureConflict(_)), "{err}");
}

#[test]
fn test_superspace_centering() {
    let ssg = build("C 2/c", "(a0g)").unwrap();
    assert_eq!(ssg.operators.len(), 8);
    assert_relative_eq!(ssg.centering_vectors[1][3], 0.0);
    assert!(ssg.is_closed());

    let ssg = build("C 2/c", "(1 0 g)").unwrap();
    assert_relative_eq!(ssg.centering_vectors[1][0], 0.5);
    assert_relative_eq!(ssg.centering_vectors[1][3], 0.5);
    assert_relative_eq!(ssg.operators[4].tau(), 0.5);
    assert!(ssg.is_closed());
}

#[test]
fn test_superspace_tetragonal_and_hexagonal() {
    let ssg = build("P 4/m m m", "(00g)q000").unwrap();
    assert_eq!(ssg.kl, vec![1, -1, 1, 1]);
    assert_eq!(ssg.operators.len(), 16);
    assert_relative_eq!(ssg.operators[1].tau(), 0.25);
    assert_relative_eq!(ssg.operators[2].tau(), 0.5);
    assert_relative_eq!(ssg.operators[3].tau(), 0.75);
    assert!(ssg.is_closed());

    let ssg = build("P 63/m m c", "(00g)").unwrap();
    assert_eq!(ssg.kl, vec![1, -1, 1, 1]);
    assert_eq!(ssg.operators.len(), 24);
    assert!(ssg.is_closed());

    let ssg = build("P -3 m 1", "(00g)").unwrap();
    assert_eq!(ssg.kl, vec![-1, 1, 1]);
    assert!(ssg.is_closed());
}

#[test]
fn test_superspace_errors() {
    for (symbol, superspace) in [("F m -3 m", "(00g)"), ("R -3 m :R", "(00g)")] {
        let err = build(symbol, superspace).unwrap_err();
        assert!(
            matches!(err, SymmetryError::UnsupportedCombination(_)),
            "{symbol}: {err}"
        );
    }
    for (symbol, superspace) in [
        ("P 4", "(a0g)"),
        ("P 3", "(a00)"),
        ("P 2/m", "(a0g)000"),
        ("P 2/m", "a0g"),
    ] {
        let err = build(symbol, superspace).unwrap_err();
        assert!(
            matches!(err, SymmetryError::Symbol(SymbolDiagnostic::Superspace(_))),
            "{symbol}{superspace}: {err}"
        );
    }
}

#[test]
fn test_superspace_display() {
    let ssg = build("P 2/m", "(a0g)0s").unwrap();
    let text = ssg.to_string();
    assert!(text.starts_with("Superspace group: P 2/m(a0g)0s"));
    assert!(text.contains("Kl: [-1, +1]"));
    assert!(text.contains("Operators (4):"));
}
