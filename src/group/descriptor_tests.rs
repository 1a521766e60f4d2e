use crate::group::descriptor::{
    point_group_from_operators, point_group_from_symbol, GroupDescriptor,
};
use crate::group::group_classes::{Centering, LaueClass, PointGroup, PolarAxis, UniqueAxis};
use crate::group::resolver::ResolvedSymbol;
use crate::group::test_groups::{test_descriptor, test_resolver, test_symbols};
use crate::symmetry::{SymbolDiagnostic, SymmetryError};

#[test]
fn test_descriptor_monoclinic() {
    let desc = test_descriptor("  C 2/c  ");
    assert_eq!(desc.symbol, "C 2/c");
    assert_eq!(desc.laue_class, LaueClass::TwoOverM);
    assert_eq!(desc.centering, Centering::C);
    assert_eq!(desc.centering_vectors.len(), 2);
    assert_eq!(desc.unique_axis, UniqueAxis::B);
    assert_eq!(desc.point_group, PointGroup::P2OverM);
    assert_eq!(desc.kl, vec![-1, 1]);
    assert!(desc.inversion);
    assert!(desc.polar_axes.is_empty());
    assert_eq!(desc.operator_count(), 8);
}

#[test]
fn test_descriptor_polar_axes() {
    assert_eq!(
        test_descriptor("P 1").polar_axes,
        vec![PolarAxis::X, PolarAxis::Y, PolarAxis::Z]
    );
    assert_eq!(test_descriptor("P 2").polar_axes, vec![PolarAxis::Y]);
    assert_eq!(test_descriptor("P m").polar_axes, vec![PolarAxis::X, PolarAxis::Z]);
    assert_eq!(test_descriptor("P m m 2").polar_axes, vec![PolarAxis::Z]);
    assert_eq!(test_descriptor("P 3").polar_axes, vec![PolarAxis::Z]);
    assert!(test_descriptor("P 2 2 2").polar_axes.is_empty());
    assert!(test_descriptor("P -4 2 m").polar_axes.is_empty());
}

#[test]
fn test_descriptor_point_groups() {
    let expected = [
        ("P 1", PointGroup::P1),
        ("P -1", PointGroup::PBar1),
        ("P 2", PointGroup::P2),
        ("P m", PointGroup::Pm),
        ("P 21/c", PointGroup::P2OverM),
        ("P 2 2 2", PointGroup::P222),
        ("P m m 2", PointGroup::Pmm2),
        ("P b c a", PointGroup::Pmmm),
        ("P 4", PointGroup::P4),
        ("P 4/m m m", PointGroup::P4OverMmm),
        ("P -4 2 m", PointGroup::PBar42m),
        ("P 3", PointGroup::P3),
        ("P -3 m 1", PointGroup::PBar3m1),
        ("R -3 m", PointGroup::PBar3m1),
        ("R -3 m :R", PointGroup::PBar3m),
        ("P 63/m m c", PointGroup::P6OverMmm),
        ("P m -3", PointGroup::PmBar3),
        ("F m -3 m", PointGroup::PmBar3m),
    ];
    for (symbol, pg) in expected {
        assert_eq!(test_descriptor(symbol).point_group, pg, "{symbol}");
    }
}

#[test]
fn test_point_group_from_symbol_fields() {
    let cases = [
        (LaueClass::Mmm, vec!["P", "m", "c", "21"], PointGroup::Pmm2),
        (LaueClass::Mmm, vec!["P", "21", "m", "a"], PointGroup::P2mm),
        (LaueClass::Mmm, vec!["P", "m", "21", "b"], PointGroup::Pm2m),
        (LaueClass::Mmm, vec!["P", "21", "21", "21"], PointGroup::P222),
        (LaueClass::FourOverMmm, vec!["P", "42", "21", "2"], PointGroup::P422),
        (LaueClass::FourOverMmm, vec!["P", "4", "b", "m"], PointGroup::P4mm),
        (LaueClass::FourOverMmm, vec!["P", "-4", "b", "2"], PointGroup::PBar4m2),
        (LaueClass::FourOverM, vec!["I", "-4"], PointGroup::PBar4),
        (LaueClass::ThreeMR, vec!["R", "3", "2"], PointGroup::P32),
        (LaueClass::ThreeMR, vec!["R", "3", "m"], PointGroup::P3m),
        (LaueClass::ThreeM1, vec!["P", "3", "2", "1"], PointGroup::P321),
        (LaueClass::ThreeM1, vec!["P", "3", "c", "1"], PointGroup::P3m1),
        (LaueClass::Three1M, vec!["P", "3", "1", "2"], PointGroup::P312),
        (LaueClass::Three1M, vec!["P", "-3", "1", "c"], PointGroup::PBar31m),
        (LaueClass::Three1M, vec!["P", "3", "1", "m"], PointGroup::P31m),
        (LaueClass::SixOverM, vec!["P", "-6"], PointGroup::PBar6),
        (LaueClass::SixOverMmm, vec!["P", "-6", "2", "m"], PointGroup::PBar62m),
        (LaueClass::SixOverMmm, vec!["P", "-6", "m", "2"], PointGroup::PBar6m2),
        (LaueClass::SixOverMmm, vec!["P", "61", "2", "2"], PointGroup::P622),
        (LaueClass::SixOverMmm, vec!["P", "63", "m", "c"], PointGroup::P6mm),
        (LaueClass::M3, vec!["I", "21", "3"], PointGroup::P23),
        (LaueClass::M3m, vec!["I", "41", "3", "2"], PointGroup::P432),
        (LaueClass::M3m, vec!["I", "-4", "3", "d"], PointGroup::PBar43m),
        (LaueClass::M3m, vec!["F", "d", "-3", "m"], PointGroup::PmBar3m),
    ];
    for (laue, fields, pg) in cases {
        assert_eq!(point_group_from_symbol(laue, &fields), Some(pg), "{fields:?}");
    }
    assert_eq!(point_group_from_symbol(LaueClass::Mmm, &["Pmm2"]), None);
}

#[test]
fn test_point_group_from_operators_agrees_with_symbol() {
    for symbol in test_symbols() {
        let desc = test_descriptor(symbol);
        let from_ops = point_group_from_operators(
            desc.laue_class,
            &desc.generators,
            desc.inversion,
            &desc.polar_axes,
        );
        assert_eq!(from_ops, desc.point_group, "{symbol}");
    }
}

#[test]
fn test_descriptor_unspaced_symbol_falls_back_to_operators() {
    let ops = ["x,y,z", "-x,-y,z", "x,-y,z", "-x,y,z"];
    let resolved = ResolvedSymbol::from_operator_strings(3, false, 1, 0, &ops).unwrap();
    let desc = GroupDescriptor::from_resolved("Pmm2", &resolved).unwrap();
    assert_eq!(desc.point_group, PointGroup::Pmm2);
}

#[test]
fn test_descriptor_errors() {
    let resolver = test_resolver();
    assert_eq!(
        GroupDescriptor::resolve("P 42/n", &resolver),
        Err(SymmetryError::Symbol(SymbolDiagnostic::Resolver(14)))
    );
    assert_eq!(
        GroupDescriptor::from_resolved("Q 1", &ResolvedSymbol::error(3)),
        Err(SymmetryError::Symbol(SymbolDiagnostic::Resolver(3)))
    );

    let mut bad =
        ResolvedSymbol::from_operator_strings(2, true, 1, 2, &["x,y,z", "-x,y,-z"]).unwrap();
    bad.n_ops = 3;
    assert!(matches!(
        GroupDescriptor::from_resolved("P 2/m", &bad),
        Err(SymmetryError::Symbol(SymbolDiagnostic::MalformedOutput(_)))
    ));

    let mut bad =
        ResolvedSymbol::from_operator_strings(2, true, 1, 2, &["x,y,z", "-x,y,-z"]).unwrap();
    bad.laue_index = 15;
    assert!(GroupDescriptor::from_resolved("P 2/m", &bad).is_err());

    let swapped =
        ResolvedSymbol::from_operator_strings(2, true, 1, 2, &["-x,y,-z", "x,y,z"]).unwrap();
    assert!(matches!(
        GroupDescriptor::from_resolved("P 2/m", &swapped),
        Err(SymmetryError::Symbol(SymbolDiagnostic::MalformedOutput(_)))
    ));

    let singular = ResolvedSymbol::from_operator_strings(1, false, 1, 0, &["x,x,z"]).unwrap();
    assert!(matches!(
        GroupDescriptor::from_resolved("P 1", &singular),
        Err(SymmetryError::Symbol(SymbolDiagnostic::MalformedOutput(_)))
    ));
}

#[test]
fn test_descriptor_display() {
    let text = test_descriptor("P 63/m m c").to_string();
    assert!(text.contains("Space group: P 63/m m c"));
    assert!(text.contains("Laue class: 6/mmm (hexagonal)"));
    assert!(text.contains("Number of operators: 24"));
}
