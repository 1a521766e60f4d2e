use crate::group::resolver::{
    normalise_symbol, ResolvedSymbol, SymbolResolver, TabulatedSymbolResolver,
    SPACE_GROUP_NOT_FOUND,
};

#[test]
fn test_normalise_symbol() {
    let sym = normalise_symbol("  P  21/c   ");
    assert_eq!(sym.symbol, "P 21/c");
    assert_eq!(sym.setting, None);
    assert!(!sym.gray);

    let sym = normalise_symbol("F d -3 m :2");
    assert_eq!(sym.symbol, "F d -3 m");
    assert_eq!(sym.setting.as_deref(), Some("2"));
    assert_eq!(sym.key(), "F d -3 m:2");

    let sym = normalise_symbol("P 2/m 1'");
    assert_eq!(sym.symbol, "P 2/m");
    assert!(sym.gray);
    assert_eq!(sym.to_string(), "P 2/m 1'");
    assert_eq!(sym.fields(), vec!["P", "2/m"]);
    assert_eq!(sym.key(), "P 2/m");
    assert_eq!(sym.cache_key(), "P 2/m 1'");

    let sym = normalise_symbol("P 21/c1'");
    assert_eq!(sym.symbol, "P 21/c");
    assert!(sym.gray);

    let sym = normalise_symbol("P21/c1' :b");
    assert_eq!(sym.symbol, "P21/c");
    assert_eq!(sym.setting.as_deref(), Some("b"));
    assert!(sym.gray);

    let sym = normalise_symbol("P 1 1'");
    assert_eq!(sym.symbol, "P 1");
    assert!(sym.gray);
}

#[test]
fn test_tabulated_resolver() {
    let mut resolver = TabulatedSymbolResolver::new();
    assert!(resolver.is_empty());
    resolver.insert(
        "P 2/m",
        ResolvedSymbol::from_operator_strings(2, true, 1, 2, &["x,y,z", "-x,y,-z"]).unwrap(),
    );
    assert_eq!(resolver.len(), 1);

    let resolved = resolver.resolve(&normalise_symbol("P   2/m 1'"));
    assert_eq!(resolved.error_code, 0);
    assert_eq!(resolved.n_ops, 2);
    assert_eq!(resolved.rotations[1], [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]]);

    let missing = resolver.resolve(&normalise_symbol("P 2/c"));
    assert_eq!(missing.error_code, SPACE_GROUP_NOT_FOUND);
    assert_eq!(missing.n_ops, 0);
}

#[test]
fn test_resolved_symbol_from_bad_operators() {
    assert!(ResolvedSymbol::from_operator_strings(1, false, 1, 0, &["x,y"]).is_err());
}
