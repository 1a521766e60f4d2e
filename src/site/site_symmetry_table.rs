//! The static site-symmetry table and the data derived from it at start-up.
//!
//! Each entry names a crystallographic point group in a given orientation by its label and a
//! set of generating elements from the rotation table. The bit-set key, the group order and the
//! constraint patterns of every entry are derived once from the generators.

use std::collections::HashMap;

use indexmap::IndexSet;
use lazy_static::lazy_static;
use log;
use nalgebra::Matrix3;

use crate::site::constraints::{position_pattern, uij_pattern, RationalPattern};
use crate::symmetry::rotation_table::{
    element_matrices, lookup_rotation, RotationElement, RotationFamily, HEXAGONAL_BIAS,
    HEXAGONAL_BIT_RANGE,
};

#[cfg(test)]
#[path = "site_symmetry_table_tests.rs"]
mod site_symmetry_table_tests;

/// Label of a site whose bit-set is not tabulated.
pub const UNCLASSIFIED_SITE: &str = "sp";

/// A site-symmetry table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteSymmetryEntry {
    /// The canonical label, such as `2/m(y)` or `-3m(111)`.
    pub label: &'static str,

    /// Names of elements generating the site-symmetry group.
    pub generators: &'static [&'static str],
}

macro_rules! site {
    ($label:expr $(, $gen:expr)*) => {
        SiteSymmetryEntry {
            label: $label,
            generators: &[$($gen),*],
        }
    };
}

/// All tabulated site symmetries.
pub static SITE_SYMMETRY_ENTRIES: [SiteSymmetryEntry; 136] = [
    // Triclinic
    site!("1"),
    site!("-1", "-1"),

    // Monoclinic, one entry triple per axis
    site!("2(x)", "2(x)"),
    site!("m(x)", "m(x)"),
    site!("2/m(x)", "2(x)", "-1"),
    site!("2(y)", "2(y)"),
    site!("m(y)", "m(y)"),
    site!("2/m(y)", "2(y)", "-1"),
    site!("2(z)", "2(z)"),
    site!("m(z)", "m(z)"),
    site!("2/m(z)", "2(z)", "-1"),
    site!("2(110)", "2(110)"),
    site!("m(110)", "m(110)"),
    site!("2/m(110)", "2(110)", "-1"),
    site!("2(1-10)", "2(1-10)"),
    site!("m(1-10)", "m(1-10)"),
    site!("2/m(1-10)", "2(1-10)", "-1"),
    site!("2(011)", "2(011)"),
    site!("m(011)", "m(011)"),
    site!("2/m(011)", "2(011)", "-1"),
    site!("2(01-1)", "2(01-1)"),
    site!("m(01-1)", "m(01-1)"),
    site!("2/m(01-1)", "2(01-1)", "-1"),
    site!("2(101)", "2(101)"),
    site!("m(101)", "m(101)"),
    site!("2/m(101)", "2(101)", "-1"),
    site!("2(-101)", "2(-101)"),
    site!("m(-101)", "m(-101)"),
    site!("2/m(-101)", "2(-101)", "-1"),
    site!("2(100)", "2(100)"),
    site!("m(100)", "m(100)"),
    site!("2/m(100)", "2(100)", "-1"),
    site!("2(010)", "2(010)"),
    site!("m(010)", "m(010)"),
    site!("2/m(010)", "2(010)", "-1"),
    site!("2(120)", "2(120)"),
    site!("m(120)", "m(120)"),
    site!("2/m(120)", "2(120)", "-1"),
    site!("2(210)", "2(210)"),
    site!("m(210)", "m(210)"),
    site!("2/m(210)", "2(210)", "-1"),

    // Orthorhombic, conventional frame
    site!("222", "2(x)", "2(y)"),
    site!("mm2(x)", "2(x)", "m(y)"),
    site!("mm2(y)", "2(y)", "m(z)"),
    site!("mm2(z)", "2(z)", "m(x)"),
    site!("mmm", "2(x)", "2(y)", "-1"),

    // Orthorhombic, frames tagged by two of their axes
    site!("222(z;110)", "2(z)", "2(110)"),
    site!("mm2(z;110)", "2(z)", "m(110)"),
    site!("mm2(110)", "2(110)", "m(z)"),
    site!("mm2(1-10)", "2(1-10)", "m(z)"),
    site!("mmm(z;110)", "2(z)", "2(110)", "-1"),
    site!("222(x;011)", "2(x)", "2(011)"),
    site!("mm2(x;011)", "2(x)", "m(011)"),
    site!("mm2(011)", "2(011)", "m(x)"),
    site!("mm2(01-1)", "2(01-1)", "m(x)"),
    site!("mmm(x;011)", "2(x)", "2(011)", "-1"),
    site!("222(y;101)", "2(y)", "2(101)"),
    site!("mm2(y;101)", "2(y)", "m(101)"),
    site!("mm2(101)", "2(101)", "m(y)"),
    site!("mm2(-101)", "2(-101)", "m(y)"),
    site!("mmm(y;101)", "2(y)", "2(101)", "-1"),
    site!("222(z;100)", "2(z)", "2(100)"),
    site!("mm2(z;100)", "2(z)", "m(100)"),
    site!("mm2(100)", "2(100)", "m(z)"),
    site!("mm2(120)", "2(120)", "m(z)"),
    site!("mmm(z;100)", "2(z)", "2(100)", "-1"),
    site!("222(z;010)", "2(z)", "2(010)"),
    site!("mm2(z;010)", "2(z)", "m(010)"),
    site!("mm2(010)", "2(010)", "m(z)"),
    site!("mm2(210)", "2(210)", "m(z)"),
    site!("mmm(z;010)", "2(z)", "2(010)", "-1"),

    // Tetragonal, main axis then perpendicular axis
    site!("4(z)", "4(z)"),
    site!("-4(z)", "-4(z)"),
    site!("4/m(z)", "4(z)", "-1"),
    site!("422(z)", "4(z)", "2(x)"),
    site!("4mm(z)", "4(z)", "m(x)"),
    site!("-42m(z)", "-4(z)", "2(x)"),
    site!("-4m2(z)", "-4(z)", "m(x)"),
    site!("4/mmm(z)", "4(z)", "m(x)", "-1"),
    site!("4(x)", "4(x)"),
    site!("-4(x)", "-4(x)"),
    site!("4/m(x)", "4(x)", "-1"),
    site!("422(x)", "4(x)", "2(y)"),
    site!("4mm(x)", "4(x)", "m(y)"),
    site!("-42m(x)", "-4(x)", "2(y)"),
    site!("-4m2(x)", "-4(x)", "m(y)"),
    site!("4/mmm(x)", "4(x)", "m(y)", "-1"),
    site!("4(y)", "4(y)"),
    site!("-4(y)", "-4(y)"),
    site!("4/m(y)", "4(y)", "-1"),
    site!("422(y)", "4(y)", "2(z)"),
    site!("4mm(y)", "4(y)", "m(z)"),
    site!("-42m(y)", "-4(y)", "2(z)"),
    site!("-4m2(y)", "-4(y)", "m(z)"),
    site!("4/mmm(y)", "4(y)", "m(z)", "-1"),

    // Trigonal about body diagonals
    site!("3(111)", "3(111)"),
    site!("-3(111)", "-3(111)"),
    site!("32(111)", "3(111)", "2(1-10)"),
    site!("3m(111)", "3(111)", "m(1-10)"),
    site!("-3m(111)", "3(111)", "m(1-10)", "-1"),
    site!("3(-111)", "3(-111)"),
    site!("-3(-111)", "-3(-111)"),
    site!("32(-111)", "3(-111)", "2(110)"),
    site!("3m(-111)", "3(-111)", "m(110)"),
    site!("-3m(-111)", "3(-111)", "m(110)", "-1"),
    site!("3(1-11)", "3(1-11)"),
    site!("-3(1-11)", "-3(1-11)"),
    site!("32(1-11)", "3(1-11)", "2(110)"),
    site!("3m(1-11)", "3(1-11)", "m(110)"),
    site!("-3m(1-11)", "3(1-11)", "m(110)", "-1"),
    site!("3(11-1)", "3(11-1)"),
    site!("-3(11-1)", "-3(11-1)"),
    site!("32(11-1)", "3(11-1)", "2(1-10)"),
    site!("3m(11-1)", "3(11-1)", "m(1-10)"),
    site!("-3m(11-1)", "3(11-1)", "m(1-10)", "-1"),

    // Hexagonal axes
    site!("3", "3(z)"),
    site!("-3", "-3(z)"),
    site!("6", "6(z)"),
    site!("-6", "-6(z)"),
    site!("6/m", "6(z)", "-1"),
    site!("321", "3(z)", "2(100)"),
    site!("312", "3(z)", "2(1-10)"),
    site!("3m1", "3(z)", "m(100)"),
    site!("31m", "3(z)", "m(1-10)"),
    site!("-3m1", "3(z)", "m(100)", "-1"),
    site!("-31m", "3(z)", "m(1-10)", "-1"),
    site!("622", "6(z)", "2(100)"),
    site!("6mm", "6(z)", "m(100)"),
    site!("-6m2", "-6(z)", "m(100)"),
    site!("-62m", "-6(z)", "2(100)"),
    site!("6/mmm", "6(z)", "m(100)", "-1"),

    // Cubic
    site!("23", "2(z)", "3(111)"),
    site!("m-3", "2(z)", "3(111)", "-1"),
    site!("432", "4(z)", "3(111)"),
    site!("-43m", "-4(z)", "3(111)"),
    site!("m-3m", "4(z)", "3(111)", "-1"),
];

// ==============
// Derived tables
// ==============

/// A site symmetry with its derived data.
#[derive(Clone, Debug)]
pub(crate) struct DerivedSiteSymmetry {
    pub(crate) label: &'static str,

    /// The bit-set key.
    pub(crate) key: u64,

    /// The number of distinct rotations in the site-symmetry group.
    pub(crate) order: usize,

    /// Index into [`SiteSymmetryTable::position_patterns`].
    pub(crate) position_code: usize,

    /// Index into [`SiteSymmetryTable::uij_patterns`].
    pub(crate) uij_code: usize,
}

/// The site-symmetry table with keys, orders and constraint patterns derived.
#[derive(Debug)]
pub(crate) struct SiteSymmetryTable {
    sites: Vec<DerivedSiteSymmetry>,
    by_key: HashMap<u64, usize>,
    by_label: HashMap<&'static str, usize>,

    /// Distinct position constraint patterns.
    pub(crate) position_patterns: IndexSet<RationalPattern>,

    /// Distinct Uij constraint patterns.
    pub(crate) uij_patterns: IndexSet<RationalPattern>,
}

lazy_static! {
    pub(crate) static ref SITE_SYMMETRY_TABLE: SiteSymmetryTable = SiteSymmetryTable::derive();
}

/// Computes the site-symmetry bit-set of a collection of rotation elements.
///
/// # Arguments
///
/// * `elements` - The named rotations of the operators fixing a site.
/// * `bias` - The Laue-class-dependent seed of the bit-set.
///
/// # Returns
///
/// The bitwise OR of the element masks and the bias.
pub fn site_symmetry_key<'a, I>(elements: I, bias: u64) -> u64
where
    I: IntoIterator<Item = &'a RotationElement>,
{
    elements
        .into_iter()
        .fold(bias, |acc, element| acc | element.mask())
}

/// The largest order of a crystallographic point group.
const MAX_POINT_GROUP_ORDER: usize = 48;

/// Closes a set of integer rotation matrices under multiplication.
///
/// Growth stops once more than [`MAX_POINT_GROUP_ORDER`] matrices have been found, which only
/// happens for sets not generating a crystallographic point group.
pub(crate) fn rotation_closure(generators: &[Matrix3<i32>]) -> Vec<Matrix3<i32>> {
    let mut group = vec![Matrix3::<i32>::identity()];
    for gen in generators {
        if !group.contains(gen) {
            group.push(*gen);
        }
    }
    let mut n_checked = 0;
    while n_checked < group.len() && group.len() <= MAX_POINT_GROUP_ORDER {
        let a = group[n_checked];
        let mut i = 0;
        while i < group.len() {
            for product in [a * group[i], group[i] * a] {
                if !group.contains(&product) {
                    group.push(product);
                }
            }
            i += 1;
        }
        n_checked += 1;
    }
    group
}

impl SiteSymmetryTable {
    /// Derives keys, orders and constraint patterns from [`SITE_SYMMETRY_ENTRIES`].
    ///
    /// # Panics
    ///
    /// Panics if an entry names an unknown element, generates a rotation outside the rotation
    /// table, or shares its key or label with another entry.
    fn derive() -> Self {
        let mut sites = Vec::with_capacity(SITE_SYMMETRY_ENTRIES.len());
        let mut by_key = HashMap::new();
        let mut by_label = HashMap::new();
        let mut position_patterns = IndexSet::new();
        let mut uij_patterns = IndexSet::new();

        for (index, entry) in SITE_SYMMETRY_ENTRIES.iter().enumerate() {
            let generators = entry
                .generators
                .iter()
                .flat_map(|name| {
                    let matrices = element_matrices(name);
                    assert!(
                        !matrices.is_empty(),
                        "Unknown element `{name}` in site symmetry `{}`.",
                        entry.label
                    );
                    matrices
                })
                .map(|m| m.map(|x| x.round() as i32))
                .collect::<Vec<_>>();
            let group = rotation_closure(&generators);
            let elements = group
                .iter()
                .map(|m| {
                    lookup_rotation(&m.map(f64::from)).unwrap_or_else(|| {
                        panic!(
                            "Site symmetry `{}` generates an untabulated rotation {m}.",
                            entry.label
                        )
                    })
                })
                .collect::<Vec<_>>();
            let bias = if elements
                .iter()
                .any(|element| element.family == RotationFamily::Hexagonal)
            {
                HEXAGONAL_BIAS
            } else {
                0
            };
            let key = site_symmetry_key(elements.iter().copied(), bias);

            let (position_code, _) = position_patterns.insert_full(position_pattern(&group));
            let (uij_code, _) = uij_patterns.insert_full(uij_pattern(&group));

            if let Some(other) = by_key.insert(key, index) {
                panic!(
                    "Site symmetries `{}` and `{}` share the key {key:#x}.",
                    SITE_SYMMETRY_ENTRIES[other].label, entry.label
                );
            }
            if by_label.insert(entry.label, index).is_some() {
                panic!("Site symmetry `{}` is tabulated twice.", entry.label);
            }
            sites.push(DerivedSiteSymmetry {
                label: entry.label,
                key,
                order: group.len(),
                position_code,
                uij_code,
            });
        }
        log::debug!(
            "Derived {} site symmetries with {} position and {} Uij constraint patterns.",
            sites.len(),
            position_patterns.len(),
            uij_patterns.len()
        );
        Self {
            sites,
            by_key,
            by_label,
            position_patterns,
            uij_patterns,
        }
    }

    /// Returns the number of tabulated site symmetries.
    pub(crate) fn len(&self) -> usize {
        self.sites.len()
    }

    /// Returns all derived site symmetries in table order.
    pub(crate) fn sites(&self) -> &[DerivedSiteSymmetry] {
        &self.sites
    }

    /// Looks up a bit-set key.
    ///
    /// A key carrying the hexagonal bias but no hexagonal-specific bit is retried without the
    /// bias, since such sites are tabulated with cubic-type axes.
    pub(crate) fn lookup_key(&self, key: u64) -> Option<&DerivedSiteSymmetry> {
        if let Some(&index) = self.by_key.get(&key) {
            return Some(&self.sites[index]);
        }
        let mut hexagonal_bits = HEXAGONAL_BIT_RANGE;
        let has_hexagonal_bits = hexagonal_bits.any(|bit| key & (1 << (bit - 1)) != 0);
        if key & HEXAGONAL_BIAS != 0 && !has_hexagonal_bits {
            self.by_key
                .get(&(key & !HEXAGONAL_BIAS))
                .map(|&index| &self.sites[index])
        } else {
            None
        }
    }

    /// Looks up a site symmetry by label.
    pub(crate) fn lookup_label(&self, label: &str) -> Option<&DerivedSiteSymmetry> {
        self.by_label.get(label).map(|&index| &self.sites[index])
    }
}
