use crate::symmetry::{symbol_error_message, SymbolDiagnostic, SymmetryError};

#[test]
fn test_symbol_error_messages() {
    assert_eq!(symbol_error_message(14), "Space group has not been found");
    assert_eq!(
        symbol_error_message(15),
        "More than 24 matrices needed to define group"
    );
    assert!(symbol_error_message(3).starts_with("Illegal lattice type"));
    assert_eq!(symbol_error_message(200), "Unknown error in space group symbol");
    assert!((1..=29).all(|code| symbol_error_message(code) != symbol_error_message(200)));
}

#[test]
fn test_symmetry_error_display() {
    let err: SymmetryError = SymbolDiagnostic::Resolver(14).into();
    assert_eq!(
        err.to_string(),
        "Symbol error: Space group has not been found (code 14)"
    );
    let err = SymmetryError::ClosureConflict("a conflicts with b".to_string());
    assert_eq!(err.to_string(), "Closure conflict: a conflicts with b");
}
