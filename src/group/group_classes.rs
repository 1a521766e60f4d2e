//! Classification enums for space groups: Laue classes, lattice centerings, unique axes and
//! point groups.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::symmetry::rotation_table::HEXAGONAL_BIAS;

#[cfg(test)]
#[path = "group_classes_tests.rs"]
mod group_classes_tests;

// ==========
// Laue class
// ==========

/// An enumerated type for the 14 Laue classes, distinguishing the orientations and axis settings
/// that affect reflection enumeration and site-symmetry classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaueClass {
    /// $`\bar{1}`$.
    Bar1,
    /// $`2/m`$.
    TwoOverM,
    /// $`mmm`$.
    Mmm,
    /// $`4/m`$.
    FourOverM,
    /// $`4/mmm`$.
    FourOverMmm,
    /// $`\bar{3}`$ on rhombohedral axes.
    ThreeR,
    /// $`\bar{3}m`$ on rhombohedral axes.
    ThreeMR,
    /// $`\bar{3}`$ on hexagonal axes.
    Three,
    /// $`\bar{3}m1`$.
    ThreeM1,
    /// $`\bar{3}1m`$.
    Three1M,
    /// $`6/m`$.
    SixOverM,
    /// $`6/mmm`$.
    SixOverMmm,
    /// $`m\bar{3}`$.
    M3,
    /// $`m\bar{3}m`$.
    M3m,
}

/// Laue classes in resolver index order (one-based).
pub const LAUE_CLASSES: [LaueClass; 14] = [
    LaueClass::Bar1,
    LaueClass::TwoOverM,
    LaueClass::Mmm,
    LaueClass::FourOverM,
    LaueClass::FourOverMmm,
    LaueClass::ThreeR,
    LaueClass::ThreeMR,
    LaueClass::Three,
    LaueClass::ThreeM1,
    LaueClass::Three1M,
    LaueClass::SixOverM,
    LaueClass::SixOverMmm,
    LaueClass::M3,
    LaueClass::M3m,
];

impl LaueClass {
    /// Returns the Laue class for a one-based resolver index.
    pub fn from_index(index: u8) -> Option<Self> {
        LAUE_CLASSES.get(usize::from(index).checked_sub(1)?).copied()
    }

    /// Returns the one-based resolver index.
    pub fn index(&self) -> u8 {
        LAUE_CLASSES
            .iter()
            .position(|laue| laue == self)
            .map_or(0, |i| i as u8 + 1)
    }

    /// Returns the conventional short symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            LaueClass::Bar1 => "-1",
            LaueClass::TwoOverM => "2/m",
            LaueClass::Mmm => "mmm",
            LaueClass::FourOverM => "4/m",
            LaueClass::FourOverMmm => "4/mmm",
            LaueClass::ThreeR => "3R",
            LaueClass::ThreeMR => "3mR",
            LaueClass::Three => "3",
            LaueClass::ThreeM1 => "3m1",
            LaueClass::Three1M => "31m",
            LaueClass::SixOverM => "6/m",
            LaueClass::SixOverMmm => "6/mmm",
            LaueClass::M3 => "m3",
            LaueClass::M3m => "m3m",
        }
    }

    /// Parses a Laue-class symbol as produced by [`Self::symbol`].
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        LAUE_CLASSES
            .iter()
            .find(|laue| laue.symbol() == symbol.trim())
            .copied()
    }

    /// Checks if groups in this Laue class are referred to hexagonal axes.
    pub fn uses_hexagonal_axes(&self) -> bool {
        matches!(
            self,
            LaueClass::Three
                | LaueClass::ThreeM1
                | LaueClass::Three1M
                | LaueClass::SixOverM
                | LaueClass::SixOverMmm
        )
    }

    /// Checks if groups in this Laue class are referred to rhombohedral axes.
    pub fn uses_rhombohedral_axes(&self) -> bool {
        matches!(self, LaueClass::ThreeR | LaueClass::ThreeMR)
    }

    /// Checks if the Laue class is cubic.
    pub fn is_cubic(&self) -> bool {
        matches!(self, LaueClass::M3 | LaueClass::M3m)
    }

    /// Returns the bias bit seeding site-symmetry bit-sets for this Laue class.
    pub fn site_symmetry_bias(&self) -> u64 {
        if self.uses_hexagonal_axes() {
            HEXAGONAL_BIAS
        } else {
            0
        }
    }

    /// Returns the crystal system name.
    pub fn crystal_system(&self) -> &'static str {
        match self {
            LaueClass::Bar1 => "triclinic",
            LaueClass::TwoOverM => "monoclinic",
            LaueClass::Mmm => "orthorhombic",
            LaueClass::FourOverM | LaueClass::FourOverMmm => "tetragonal",
            LaueClass::ThreeR
            | LaueClass::ThreeMR
            | LaueClass::Three
            | LaueClass::ThreeM1
            | LaueClass::Three1M => "trigonal",
            LaueClass::SixOverM | LaueClass::SixOverMmm => "hexagonal",
            LaueClass::M3 | LaueClass::M3m => "cubic",
        }
    }

    /// Returns the site-symmetry label of the Laue group itself, *i.e.* the site symmetry of a
    /// lattice point in the primitive centrosymmetric group of this class.
    pub fn holohedral_site_label(&self, unique_axis: UniqueAxis) -> &'static str {
        match self {
            LaueClass::Bar1 => "-1",
            LaueClass::TwoOverM => match unique_axis {
                UniqueAxis::A => "2/m(x)",
                UniqueAxis::C => "2/m(z)",
                UniqueAxis::B | UniqueAxis::None => "2/m(y)",
            },
            LaueClass::Mmm => "mmm",
            LaueClass::FourOverM => "4/m(z)",
            LaueClass::FourOverMmm => "4/mmm(z)",
            LaueClass::ThreeR => "-3(111)",
            LaueClass::ThreeMR => "-3m(111)",
            LaueClass::Three => "-3",
            LaueClass::ThreeM1 => "-3m1",
            LaueClass::Three1M => "-31m",
            LaueClass::SixOverM => "6/m",
            LaueClass::SixOverMmm => "6/mmm",
            LaueClass::M3 => "m-3",
            LaueClass::M3m => "m-3m",
        }
    }
}

impl fmt::Display for LaueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// =========
// Centering
// =========

/// An enumerated type for lattice centerings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Centering {
    P,
    A,
    B,
    C,
    I,
    F,
    /// Rhombohedral centering of a hexagonal cell, obverse setting.
    R,
}

const CENTERINGS: [Centering; 7] = [
    Centering::P,
    Centering::A,
    Centering::B,
    Centering::C,
    Centering::I,
    Centering::F,
    Centering::R,
];

impl Centering {
    /// Returns the centering for a one-based resolver index.
    pub fn from_index(index: u8) -> Option<Self> {
        CENTERINGS.get(usize::from(index).checked_sub(1)?).copied()
    }

    /// Returns the centering for a lattice letter.
    pub fn from_letter(letter: char) -> Option<Self> {
        CENTERINGS
            .iter()
            .find(|cen| cen.letter() == letter.to_ascii_uppercase())
            .copied()
    }

    /// Returns the lattice letter.
    pub fn letter(&self) -> char {
        match self {
            Centering::P => 'P',
            Centering::A => 'A',
            Centering::B => 'B',
            Centering::C => 'C',
            Centering::I => 'I',
            Centering::F => 'F',
            Centering::R => 'R',
        }
    }

    /// Returns the centering translations, the origin always first.
    pub fn vectors(&self) -> Vec<Vector3<f64>> {
        let mut vectors = vec![Vector3::zeros()];
        match self {
            Centering::P => {}
            Centering::A => vectors.push(Vector3::new(0.0, 0.5, 0.5)),
            Centering::B => vectors.push(Vector3::new(0.5, 0.0, 0.5)),
            Centering::C => vectors.push(Vector3::new(0.5, 0.5, 0.0)),
            Centering::I => vectors.push(Vector3::new(0.5, 0.5, 0.5)),
            Centering::F => vectors.extend([
                Vector3::new(0.0, 0.5, 0.5),
                Vector3::new(0.5, 0.0, 0.5),
                Vector3::new(0.5, 0.5, 0.0),
            ]),
            Centering::R => vectors.extend([
                Vector3::new(2.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
                Vector3::new(1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0),
            ]),
        }
        vectors
    }

    /// Checks if a reflection is allowed by the lattice centering.
    ///
    /// # Arguments
    ///
    /// * `hkl` - Miller indices referred to the centered cell (hexagonal axes for `R`).
    ///
    /// # Returns
    ///
    /// `false` if the reflection is systematically absent.
    pub fn allows_reflection(&self, hkl: &[i32; 3]) -> bool {
        let [h, k, l] = *hkl;
        match self {
            Centering::P => true,
            Centering::A => (k + l).rem_euclid(2) == 0,
            Centering::B => (h + l).rem_euclid(2) == 0,
            Centering::C => (h + k).rem_euclid(2) == 0,
            Centering::I => (h + k + l).rem_euclid(2) == 0,
            Centering::F => (h + k).rem_euclid(2) == 0 && (h + l).rem_euclid(2) == 0,
            Centering::R => (-h + k + l).rem_euclid(3) == 0,
        }
    }
}

impl fmt::Display for Centering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ===========
// Unique axis
// ===========

/// An enumerated type for the unique axis of monoclinic groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniqueAxis {
    None,
    A,
    B,
    C,
}

impl UniqueAxis {
    /// Returns the unique axis for a resolver index (1 = a, 2 = b, 3 = c; anything else means
    /// no unique axis).
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => UniqueAxis::A,
            2 => UniqueAxis::B,
            3 => UniqueAxis::C,
            _ => UniqueAxis::None,
        }
    }

    /// Returns the zero-based Cartesian index of the axis, if any.
    pub fn axis_index(&self) -> Option<usize> {
        match self {
            UniqueAxis::None => None,
            UniqueAxis::A => Some(0),
            UniqueAxis::B => Some(1),
            UniqueAxis::C => Some(2),
        }
    }

    /// Returns the axis letter, empty for no unique axis.
    pub fn letter(&self) -> &'static str {
        match self {
            UniqueAxis::None => "",
            UniqueAxis::A => "a",
            UniqueAxis::B => "b",
            UniqueAxis::C => "c",
        }
    }
}

// ==========
// Polar axes
// ==========

/// An enumerated type for polar directions of non-centrosymmetric groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolarAxis {
    X,
    Y,
    Z,
    /// The body diagonal $`[111]`$ of rhombohedral axes.
    Diagonal111,
}

impl fmt::Display for PolarAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolarAxis::X => write!(f, "x"),
            PolarAxis::Y => write!(f, "y"),
            PolarAxis::Z => write!(f, "z"),
            PolarAxis::Diagonal111 => write!(f, "111"),
        }
    }
}

// ===========
// Point group
// ===========

/// An enumerated type for the crystallographic point groups in the orientations distinguished by
/// Hermann–Mauguin short symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointGroup {
    P1,
    PBar1,
    P2,
    Pm,
    P2OverM,
    P222,
    Pmm2,
    Pm2m,
    P2mm,
    Pmmm,
    P4,
    PBar4,
    P4OverM,
    P422,
    P4mm,
    PBar42m,
    PBar4m2,
    P4OverMmm,
    P3,
    PBar3,
    P32,
    P3m,
    PBar3m,
    P321,
    P312,
    P3m1,
    P31m,
    PBar3m1,
    PBar31m,
    P6,
    PBar6,
    P6OverM,
    P622,
    P6mm,
    PBar6m2,
    PBar62m,
    P6OverMmm,
    P23,
    PmBar3,
    P432,
    PBar43m,
    PmBar3m,
}

impl PointGroup {
    /// Returns the Hermann–Mauguin symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            PointGroup::P1 => "1",
            PointGroup::PBar1 => "-1",
            PointGroup::P2 => "2",
            PointGroup::Pm => "m",
            PointGroup::P2OverM => "2/m",
            PointGroup::P222 => "222",
            PointGroup::Pmm2 => "mm2",
            PointGroup::Pm2m => "m2m",
            PointGroup::P2mm => "2mm",
            PointGroup::Pmmm => "mmm",
            PointGroup::P4 => "4",
            PointGroup::PBar4 => "-4",
            PointGroup::P4OverM => "4/m",
            PointGroup::P422 => "422",
            PointGroup::P4mm => "4mm",
            PointGroup::PBar42m => "-42m",
            PointGroup::PBar4m2 => "-4m2",
            PointGroup::P4OverMmm => "4/mmm",
            PointGroup::P3 => "3",
            PointGroup::PBar3 => "-3",
            PointGroup::P32 => "32",
            PointGroup::P3m => "3m",
            PointGroup::PBar3m => "-3m",
            PointGroup::P321 => "321",
            PointGroup::P312 => "312",
            PointGroup::P3m1 => "3m1",
            PointGroup::P31m => "31m",
            PointGroup::PBar3m1 => "-3m1",
            PointGroup::PBar31m => "-31m",
            PointGroup::P6 => "6",
            PointGroup::PBar6 => "-6",
            PointGroup::P6OverM => "6/m",
            PointGroup::P622 => "622",
            PointGroup::P6mm => "6mm",
            PointGroup::PBar6m2 => "-6m2",
            PointGroup::PBar62m => "-62m",
            PointGroup::P6OverMmm => "6/mmm",
            PointGroup::P23 => "23",
            PointGroup::PmBar3 => "m-3",
            PointGroup::P432 => "432",
            PointGroup::PBar43m => "-43m",
            PointGroup::PmBar3m => "m-3m",
        }
    }

    /// Returns the tabulated $`\epsilon`$ values (the `Kl` vector) for the symmetry directions of
    /// the point-group symbol. The values actually used by a superspace group depend on its
    /// modulation vector and are worked out when the group is built. Cubic groups have none.
    pub fn default_kl(&self) -> &'static [i8] {
        match self {
            PointGroup::P1 => &[1],
            PointGroup::PBar1 => &[-1],
            PointGroup::P2 => &[-1],
            PointGroup::Pm => &[1],
            PointGroup::P2OverM => &[-1, 1],
            PointGroup::P222 => &[-1, -1, -1],
            PointGroup::Pmm2 => &[1, 1, -1],
            PointGroup::Pm2m => &[1, -1, 1],
            PointGroup::P2mm => &[-1, 1, 1],
            PointGroup::Pmmm => &[1, 1, 1],
            PointGroup::P4 => &[1],
            PointGroup::PBar4 => &[-1],
            PointGroup::P4OverM => &[1, -1],
            PointGroup::P422 => &[1, -1, -1],
            PointGroup::P4mm => &[1, 1, 1],
            PointGroup::PBar42m => &[-1, -1, 1],
            PointGroup::PBar4m2 => &[-1, 1, -1],
            PointGroup::P4OverMmm => &[1, -1, 1, 1],
            PointGroup::P3 => &[1],
            PointGroup::PBar3 => &[-1],
            PointGroup::P32 => &[1, -1],
            PointGroup::P3m => &[1, 1],
            PointGroup::PBar3m => &[-1, 1],
            PointGroup::P321 => &[1, -1, 1],
            PointGroup::P312 => &[1, 1, -1],
            PointGroup::P3m1 => &[1, 1, 1],
            PointGroup::P31m => &[1, 1, 1],
            PointGroup::PBar3m1 => &[-1, 1, 1],
            PointGroup::PBar31m => &[-1, 1, 1],
            PointGroup::P6 => &[1],
            PointGroup::PBar6 => &[-1],
            PointGroup::P6OverM => &[1, -1],
            PointGroup::P622 => &[1, -1, -1],
            PointGroup::P6mm => &[1, 1, 1],
            PointGroup::PBar6m2 => &[-1, 1, -1],
            PointGroup::PBar62m => &[-1, -1, 1],
            PointGroup::P6OverMmm => &[1, -1, 1, 1],
            PointGroup::P23
            | PointGroup::PmBar3
            | PointGroup::P432
            | PointGroup::PBar43m
            | PointGroup::PmBar3m => &[],
        }
    }

    /// Checks if the point group contains the inversion.
    pub fn is_centrosymmetric(&self) -> bool {
        matches!(
            self,
            PointGroup::PBar1
                | PointGroup::P2OverM
                | PointGroup::Pmmm
                | PointGroup::P4OverM
                | PointGroup::P4OverMmm
                | PointGroup::PBar3
                | PointGroup::PBar3m
                | PointGroup::PBar3m1
                | PointGroup::PBar31m
                | PointGroup::P6OverM
                | PointGroup::P6OverMmm
                | PointGroup::PmBar3
                | PointGroup::PmBar3m
        )
    }
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
