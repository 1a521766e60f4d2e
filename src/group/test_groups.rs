//! Resolver outputs for a handful of space groups, shared by unit tests.

use crate::group::descriptor::GroupDescriptor;
use crate::group::expansion::ExpandedGroup;
use crate::group::resolver::{ResolvedSymbol, TabulatedSymbolResolver};

/// `(symbol, laue index, inversion, centering index, unique axis index, generators)`
type GroupEntry = (
    &'static str,
    u8,
    bool,
    u8,
    u8,
    &'static [&'static str],
);

const TEST_GROUPS: &[GroupEntry] = &[
    ("P 1", 1, false, 1, 0, &["x,y,z"]),
    ("P -1", 1, true, 1, 0, &["x,y,z"]),
    ("P 2", 2, false, 1, 2, &["x,y,z", "-x,y,-z"]),
    ("P m", 2, false, 1, 2, &["x,y,z", "x,-y,z"]),
    ("P 2/m", 2, true, 1, 2, &["x,y,z", "-x,y,-z"]),
    ("P 2/c", 2, true, 1, 2, &["x,y,z", "-x,y,-z+1/2"]),
    ("P 21/c", 2, true, 1, 2, &["x,y,z", "-x,y+1/2,-z+1/2"]),
    ("C 2/c", 2, true, 4, 2, &["x,y,z", "-x,y,-z+1/2"]),
    ("P 2 2 2", 3, false, 1, 0, &["x,y,z", "-x,-y,z", "x,-y,-z", "-x,y,-z"]),
    ("P m m 2", 3, false, 1, 0, &["x,y,z", "-x,-y,z", "x,-y,z", "-x,y,z"]),
    ("P m m m", 3, true, 1, 0, &["x,y,z", "-x,-y,z", "x,-y,-z", "-x,y,-z"]),
    ("P b c a", 3, true, 1, 0, &[
        "x,y,z",
        "-x+1/2,-y,z+1/2",
        "x+1/2,-y+1/2,-z",
        "-x,y+1/2,-z+1/2",
    ]),
    ("P 4", 4, false, 1, 0, &["x,y,z", "-y,x,z", "-x,-y,z", "y,-x,z"]),
    ("P 4/m", 4, true, 1, 0, &["x,y,z", "-y,x,z", "-x,-y,z", "y,-x,z"]),
    ("P 4/m m m", 5, true, 1, 0, &[
        "x,y,z",
        "-y,x,z",
        "-x,-y,z",
        "y,-x,z",
        "x,-y,-z",
        "-x,y,-z",
        "y,x,-z",
        "-y,-x,-z",
    ]),
    ("P -4 2 m", 5, false, 1, 0, &[
        "x,y,z",
        "y,-x,-z",
        "-x,-y,z",
        "-y,x,-z",
        "x,-y,-z",
        "-x,y,-z",
        "-y,-x,z",
        "y,x,z",
    ]),
    ("P 3", 8, false, 1, 0, &["x,y,z", "-y,x-y,z", "-x+y,-x,z"]),
    ("P -3", 8, true, 1, 0, &["x,y,z", "-y,x-y,z", "-x+y,-x,z"]),
    ("R -3 :R", 6, true, 1, 0, &["x,y,z", "z,x,y", "y,z,x"]),
    ("P -3 m 1", 9, true, 1, 0, &[
        "x,y,z",
        "-y,x-y,z",
        "-x+y,-x,z",
        "y,x,-z",
        "x-y,-y,-z",
        "-x,-x+y,-z",
    ]),
    ("P -3 1 m", 10, true, 1, 0, &[
        "x,y,z",
        "-y,x-y,z",
        "-x+y,-x,z",
        "-y,-x,-z",
        "-x+y,y,-z",
        "x,x-y,-z",
    ]),
    ("R -3 m", 9, true, 7, 0, &[
        "x,y,z",
        "-y,x-y,z",
        "-x+y,-x,z",
        "y,x,-z",
        "x-y,-y,-z",
        "-x,-x+y,-z",
    ]),
    ("R -3 m :R", 7, true, 1, 0, &[
        "x,y,z",
        "z,x,y",
        "y,z,x",
        "-z,-y,-x",
        "-y,-x,-z",
        "-x,-z,-y",
    ]),
    ("P 6/m", 11, true, 1, 0, &[
        "x,y,z",
        "-y,x-y,z",
        "-x+y,-x,z",
        "-x,-y,z",
        "y,-x+y,z",
        "x-y,x,z",
    ]),
    ("P 6/m m m", 12, true, 1, 0, &[
        "x,y,z",
        "-y,x-y,z",
        "-x+y,-x,z",
        "-x,-y,z",
        "y,-x+y,z",
        "x-y,x,z",
        "y,x,-z",
        "x-y,-y,-z",
        "-x,-x+y,-z",
        "-y,-x,-z",
        "-x+y,y,-z",
        "x,x-y,-z",
    ]),
    ("P 63/m m c", 12, true, 1, 0, &[
        "x,y,z",
        "-y,x-y,z",
        "-x+y,-x,z",
        "-x,-y,z+1/2",
        "y,-x+y,z+1/2",
        "x-y,x,z+1/2",
        "y,x,-z",
        "x-y,-y,-z",
        "-x,-x+y,-z",
        "-y,-x,-z+1/2",
        "-x+y,y,-z+1/2",
        "x,x-y,-z+1/2",
    ]),
    ("P m -3", 13, true, 1, 0, &[
        "x,y,z",
        "-x,-y,z",
        "-x,y,-z",
        "x,-y,-z",
        "z,x,y",
        "z,-x,-y",
        "-z,-x,y",
        "-z,x,-y",
        "y,z,x",
        "-y,z,-x",
        "y,-z,-x",
        "-y,-z,x",
    ]),
    ("F m -3 m", 14, true, 6, 0, &[
        "x,y,z",
        "-x,-y,z",
        "-x,y,-z",
        "x,-y,-z",
        "z,x,y",
        "z,-x,-y",
        "-z,-x,y",
        "-z,x,-y",
        "y,z,x",
        "-y,z,-x",
        "y,-z,-x",
        "-y,-z,x",
        "y,x,-z",
        "-y,-x,-z",
        "y,-x,z",
        "-y,x,z",
        "x,z,-y",
        "-x,z,y",
        "-x,-z,-y",
        "x,-z,y",
        "z,y,-x",
        "z,-y,x",
        "-z,y,x",
        "-z,-y,-x",
    ]),
];

/// Returns a resolver knowing all test groups.
pub(crate) fn test_resolver() -> TabulatedSymbolResolver {
    let mut resolver = TabulatedSymbolResolver::new();
    for (symbol, laue, inversion, centering, unique, ops) in TEST_GROUPS {
        let resolved =
            ResolvedSymbol::from_operator_strings(*laue, *inversion, *centering, *unique, ops)
                .expect("Unable to parse test-group operators.");
        resolver.insert(symbol, resolved);
    }
    resolver
}

/// Returns the descriptor of a test group.
pub(crate) fn test_descriptor(symbol: &str) -> GroupDescriptor {
    GroupDescriptor::resolve(symbol, &test_resolver())
        .unwrap_or_else(|err| panic!("Unable to build test group `{symbol}`: {err}"))
}

/// Returns the expanded operators of a test group.
pub(crate) fn test_group(symbol: &str) -> ExpandedGroup {
    ExpandedGroup::from_descriptor(&test_descriptor(symbol))
}

/// Returns the symbols of all test groups.
pub(crate) fn test_symbols() -> Vec<&'static str> {
    TEST_GROUPS.iter().map(|entry| entry.0).collect()
}
