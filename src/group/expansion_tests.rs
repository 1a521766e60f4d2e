use nalgebra::Vector3;

use crate::group::expansion::ExpandedGroup;
use crate::group::test_groups::{test_descriptor, test_group, test_symbols};

#[test]
fn test_expansion_counts() {
    let expected = [
        ("P 1", 1),
        ("P -1", 2),
        ("P 2/m", 4),
        ("C 2/c", 8),
        ("P m m m", 8),
        ("P 4/m m m", 16),
        ("R -3 m", 36),
        ("R -3 m :R", 12),
        ("P 63/m m c", 24),
        ("F m -3 m", 192),
    ];
    for (symbol, n) in expected {
        let group = test_group(symbol);
        assert_eq!(group.len(), n, "{symbol}");
        assert_eq!(test_descriptor(symbol).operator_count(), n);
    }
}

#[test]
fn test_expansion_is_closed_and_duplicate_free() {
    for symbol in test_symbols() {
        let group = test_group(symbol);
        assert!(group.is_closed(), "{symbol} is not closed");
        assert!(group.is_duplicate_free(), "{symbol} has duplicates");
    }
}

#[test]
fn test_expansion_order_and_provenance() {
    let group = test_group("C 2/c");
    let provenance = group
        .operators
        .iter()
        .map(|op| (op.centering_index, op.inverted, op.generator_index))
        .collect::<Vec<_>>();
    assert_eq!(
        provenance,
        vec![
            (0, false, 0),
            (0, false, 1),
            (0, true, 0),
            (0, true, 1),
            (1, false, 0),
            (1, false, 1),
            (1, true, 0),
            (1, true, 1),
        ]
    );
    assert_eq!(
        group.operators.iter().map(|op| op.signed_index()).collect::<Vec<_>>(),
        vec![1, 2, -1, -2, 101, 102, 99, 98]
    );

    // -x, y, -z+1/2 inverted gives x, -y, z-1/2, folded to z+1/2 with offset -1.
    let glide = &group.operators[3];
    assert_eq!(glide.operator.to_string(), "x, -y, z+1/2");
    assert_eq!(glide.cell_offset, Vector3::new(0, 0, -1));
    assert_eq!(glide.element().unwrap().name, "m(y)");

    let centred_glide = &group.operators[7];
    assert_eq!(centred_glide.operator.to_string(), "x+1/2, -y+1/2, z+1/2");
    assert_eq!(group.generators().count(), 2);
    assert!(group.operators.iter().all(|op| op.packed_id.is_some()));
}

#[test]
fn test_expansion_find() {
    let group = test_group("P 63/m m c");
    let screw = "-x, -y, z+3/2".parse().unwrap();
    let index = group.find(&screw, 1e-6).unwrap();
    assert_eq!(group.operators[index].element().unwrap().name, "2(z)");
    let missing = "-x, -y, z".parse().unwrap();
    assert!(group.find(&missing, 1e-6).is_none());
}

#[test]
fn test_expansion_display() {
    let text = ExpandedGroup::from_descriptor(&test_descriptor("P -1")).to_string();
    assert!(text.contains("Operators of P -1 (2):"));
    assert!(text.contains("-x, -y, -z"));
    assert!(text.contains("-1"));
}
