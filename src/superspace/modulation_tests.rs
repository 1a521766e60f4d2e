use approx::assert_relative_eq;
use nalgebra::Vector3;

use crate::superspace::modulation::{
    generator_offset, ModulationComponent, ModulationVector, SuperspaceSymbol,
};
use crate::symmetry::{SymbolDiagnostic, SymmetryError};

#[test]
fn test_modulation_vector_parse() {
    let q: ModulationVector = "(a0g)".parse().unwrap();
    assert_eq!(
        q.components,
        [
            ModulationComponent::Free,
            ModulationComponent::Rational(0, 1),
            ModulationComponent::Free
        ]
    );
    assert_eq!(q.free_axes(), vec![0, 2]);
    assert_relative_eq!(q.rational_part(), Vector3::zeros());
    assert_eq!(q.symbol(), "(a0g)");

    let q: ModulationVector = "(1/2 0 g)".parse().unwrap();
    assert_eq!(q.components[0], ModulationComponent::Rational(1, 2));
    assert_eq!(q.free_axes(), vec![2]);
    assert_relative_eq!(q.rational_part(), Vector3::new(0.5, 0.0, 0.0));
    assert_eq!(q.to_string(), "(1/2 0 g)");

    let q: ModulationVector = "1,1/3,g".parse().unwrap();
    assert_relative_eq!(q.rational_part(), Vector3::new(1.0, 1.0 / 3.0, 0.0));
    assert!(q.is_compatible(&Vector3::new(1.0, 1.0 / 3.0, 0.3), 1e-6));
    assert!(!q.is_compatible(&Vector3::new(0.5, 1.0 / 3.0, 0.3), 1e-6));
}

#[test]
fn test_modulation_vector_parse_errors() {
    for bad in ["(g00)", "(a0)", "(a0g0)", "(000)", "(1/4 0 g)", "(a0x)"] {
        let err = bad.parse::<ModulationVector>().unwrap_err();
        assert!(
            matches!(err, SymmetryError::Symbol(SymbolDiagnostic::Superspace(_))),
            "{bad}: {err}"
        );
    }
}

#[test]
fn test_superspace_symbol_parse() {
    let symbol: SuperspaceSymbol = "(a0g)0s".parse().unwrap();
    assert_eq!(symbol.generator_symbol, "0s");
    assert_eq!(symbol.offsets, vec![0.0, 0.5]);
    assert_eq!(symbol.to_string(), "(a0g)0s");

    let symbol: SuperspaceSymbol = " (0 0 g) q 0 0 ".parse().unwrap();
    assert_eq!(symbol.generator_symbol, "q00");
    assert_eq!(symbol.offsets, vec![0.25, 0.0, 0.0]);

    let symbol: SuperspaceSymbol = "(a0g)".parse().unwrap();
    assert!(symbol.offsets.is_empty());

    assert!("a0g".parse::<SuperspaceSymbol>().is_err());
    assert!("P2/m(a0g)".parse::<SuperspaceSymbol>().is_err());
    assert!("(a0g)0x".parse::<SuperspaceSymbol>().is_err());
}

#[test]
fn test_generator_offsets() {
    assert_eq!(generator_offset('h'), Some(1.0 / 6.0));
    assert_eq!(generator_offset('t'), Some(1.0 / 3.0));
    assert_eq!(generator_offset('z'), None);
}
