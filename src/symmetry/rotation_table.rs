//! Named crystallographic rotation matrices and their packed identifiers.
//!
//! Every rotation part occurring in a space group referred to a conventional cell is one of the
//! 48 signed permutation matrices or one of 16 further matrices only found with hexagonal axes.
//! Each is identified by a base-3 packing of its nine entries and carries the bit position used
//! to build site-symmetry bit-sets. A rotation and its inverse share a bit.

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use lazy_static::lazy_static;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "rotation_table_tests.rs"]
mod rotation_table_tests;

/// Bias bit marking bit-sets computed with hexagonal axes.
pub const HEXAGONAL_BIAS: u64 = 1 << 40;

/// Bit positions used by hexagonal-specific elements. The same positions denote cubic
/// three-fold elements when the hexagonal bias is absent.
pub const HEXAGONAL_BIT_RANGE: RangeInclusive<u8> = 27..=38;

/// Label given to rotations outside the table.
pub const UNNAMED_ROTATION: &str = "unnamed - higher multiplicity elements";

/// An enumerated type classifying which lattice families a rotation occurs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationFamily {
    /// The rotation occurs with both cubic-type and hexagonal axes.
    Shared,

    /// The rotation is a signed permutation not occurring with hexagonal axes.
    Cubic,

    /// The rotation only occurs with hexagonal axes.
    Hexagonal,
}

/// A named rotation matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationElement {
    /// The element name, *e.g.* `2(z)`, `m(110)`, `-3(111)`.
    pub name: &'static str,

    /// The one-based bit position, or zero for the identity.
    pub bit: u8,

    /// The lattice family of the rotation.
    pub family: RotationFamily,

    /// The rotation matrix rows acting on fractional coordinates.
    pub rows: [[i8; 3]; 3],
}

impl RotationElement {
    /// Returns the rotation as a floating-point matrix.
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::from_fn(|i, j| f64::from(self.rows[i][j]))
    }

    /// Returns the packed identifier of the rotation.
    pub fn packed_id(&self) -> u32 {
        pack_rows(&self.rows)
    }

    /// Returns the single-bit mask for this element, or zero for the identity.
    pub fn mask(&self) -> u64 {
        if self.bit == 0 {
            0
        } else {
            1 << (self.bit - 1)
        }
    }
}

impl fmt::Display for RotationElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

macro_rules! rot {
    ($name:expr, $bit:expr, $family:ident, $rows:expr) => {
        RotationElement {
            name: $name,
            bit: $bit,
            family: RotationFamily::$family,
            rows: $rows,
        }
    };
}

/// The 64 named rotations.
pub static ROTATION_ELEMENTS: [RotationElement; 64] = [
    rot!("1", 0, Shared, [[1, 0, 0], [0, 1, 0], [0, 0, 1]]),
    rot!("-1", 1, Shared, [[-1, 0, 0], [0, -1, 0], [0, 0, -1]]),
    // Axial two-folds and mirrors
    rot!("2(x)", 2, Cubic, [[1, 0, 0], [0, -1, 0], [0, 0, -1]]),
    rot!("2(y)", 3, Cubic, [[-1, 0, 0], [0, 1, 0], [0, 0, -1]]),
    rot!("2(z)", 4, Shared, [[-1, 0, 0], [0, -1, 0], [0, 0, 1]]),
    rot!("m(x)", 5, Cubic, [[-1, 0, 0], [0, 1, 0], [0, 0, 1]]),
    rot!("m(y)", 6, Cubic, [[1, 0, 0], [0, -1, 0], [0, 0, 1]]),
    rot!("m(z)", 7, Shared, [[1, 0, 0], [0, 1, 0], [0, 0, -1]]),
    // Face-diagonal two-folds and mirrors
    rot!("2(110)", 8, Shared, [[0, 1, 0], [1, 0, 0], [0, 0, -1]]),
    rot!("2(1-10)", 9, Shared, [[0, -1, 0], [-1, 0, 0], [0, 0, -1]]),
    rot!("m(110)", 10, Shared, [[0, -1, 0], [-1, 0, 0], [0, 0, 1]]),
    rot!("m(1-10)", 11, Shared, [[0, 1, 0], [1, 0, 0], [0, 0, 1]]),
    rot!("2(011)", 12, Cubic, [[-1, 0, 0], [0, 0, 1], [0, 1, 0]]),
    rot!("2(01-1)", 13, Cubic, [[-1, 0, 0], [0, 0, -1], [0, -1, 0]]),
    rot!("m(011)", 14, Cubic, [[1, 0, 0], [0, 0, -1], [0, -1, 0]]),
    rot!("m(01-1)", 15, Cubic, [[1, 0, 0], [0, 0, 1], [0, 1, 0]]),
    rot!("2(101)", 16, Cubic, [[0, 0, 1], [0, -1, 0], [1, 0, 0]]),
    rot!("2(-101)", 17, Cubic, [[0, 0, -1], [0, -1, 0], [-1, 0, 0]]),
    rot!("m(101)", 18, Cubic, [[0, 0, -1], [0, 1, 0], [-1, 0, 0]]),
    rot!("m(-101)", 19, Cubic, [[0, 0, 1], [0, 1, 0], [1, 0, 0]]),
    // Four-folds
    rot!("4(x)", 20, Cubic, [[1, 0, 0], [0, 0, -1], [0, 1, 0]]),
    rot!("4(x)", 20, Cubic, [[1, 0, 0], [0, 0, 1], [0, -1, 0]]),
    rot!("4(y)", 21, Cubic, [[0, 0, 1], [0, 1, 0], [-1, 0, 0]]),
    rot!("4(y)", 21, Cubic, [[0, 0, -1], [0, 1, 0], [1, 0, 0]]),
    rot!("4(z)", 22, Cubic, [[0, -1, 0], [1, 0, 0], [0, 0, 1]]),
    rot!("4(z)", 22, Cubic, [[0, 1, 0], [-1, 0, 0], [0, 0, 1]]),
    rot!("-4(x)", 23, Cubic, [[-1, 0, 0], [0, 0, 1], [0, -1, 0]]),
    rot!("-4(x)", 23, Cubic, [[-1, 0, 0], [0, 0, -1], [0, 1, 0]]),
    rot!("-4(y)", 24, Cubic, [[0, 0, -1], [0, -1, 0], [1, 0, 0]]),
    rot!("-4(y)", 24, Cubic, [[0, 0, 1], [0, -1, 0], [-1, 0, 0]]),
    rot!("-4(z)", 25, Cubic, [[0, 1, 0], [-1, 0, 0], [0, 0, -1]]),
    rot!("-4(z)", 25, Cubic, [[0, -1, 0], [1, 0, 0], [0, 0, -1]]),
    // Body-diagonal three-folds
    rot!("3(111)", 26, Cubic, [[0, 0, 1], [1, 0, 0], [0, 1, 0]]),
    rot!("3(111)", 26, Cubic, [[0, 1, 0], [0, 0, 1], [1, 0, 0]]),
    rot!("3(-111)", 27, Cubic, [[0, 0, -1], [-1, 0, 0], [0, 1, 0]]),
    rot!("3(-111)", 27, Cubic, [[0, -1, 0], [0, 0, 1], [-1, 0, 0]]),
    rot!("3(1-11)", 28, Cubic, [[0, 0, 1], [-1, 0, 0], [0, -1, 0]]),
    rot!("3(1-11)", 28, Cubic, [[0, -1, 0], [0, 0, -1], [1, 0, 0]]),
    rot!("3(11-1)", 29, Cubic, [[0, 0, -1], [1, 0, 0], [0, -1, 0]]),
    rot!("3(11-1)", 29, Cubic, [[0, 1, 0], [0, 0, -1], [-1, 0, 0]]),
    rot!("-3(111)", 30, Cubic, [[0, 0, -1], [-1, 0, 0], [0, -1, 0]]),
    rot!("-3(111)", 30, Cubic, [[0, -1, 0], [0, 0, -1], [-1, 0, 0]]),
    rot!("-3(-111)", 31, Cubic, [[0, 0, 1], [1, 0, 0], [0, -1, 0]]),
    rot!("-3(-111)", 31, Cubic, [[0, 1, 0], [0, 0, -1], [1, 0, 0]]),
    rot!("-3(1-11)", 32, Cubic, [[0, 0, -1], [1, 0, 0], [0, 1, 0]]),
    rot!("-3(1-11)", 32, Cubic, [[0, 1, 0], [0, 0, 1], [-1, 0, 0]]),
    rot!("-3(11-1)", 33, Cubic, [[0, 0, 1], [-1, 0, 0], [0, 1, 0]]),
    rot!("-3(11-1)", 33, Cubic, [[0, -1, 0], [0, 0, 1], [1, 0, 0]]),
    // Hexagonal-axis rotations
    rot!("3(z)", 27, Hexagonal, [[0, -1, 0], [1, -1, 0], [0, 0, 1]]),
    rot!("3(z)", 27, Hexagonal, [[-1, 1, 0], [-1, 0, 0], [0, 0, 1]]),
    rot!("-3(z)", 28, Hexagonal, [[0, 1, 0], [-1, 1, 0], [0, 0, -1]]),
    rot!("-3(z)", 28, Hexagonal, [[1, -1, 0], [1, 0, 0], [0, 0, -1]]),
    rot!("6(z)", 29, Hexagonal, [[1, -1, 0], [1, 0, 0], [0, 0, 1]]),
    rot!("6(z)", 29, Hexagonal, [[0, 1, 0], [-1, 1, 0], [0, 0, 1]]),
    rot!("-6(z)", 30, Hexagonal, [[-1, 1, 0], [-1, 0, 0], [0, 0, -1]]),
    rot!("-6(z)", 30, Hexagonal, [[0, -1, 0], [1, -1, 0], [0, 0, -1]]),
    rot!("2(100)", 31, Hexagonal, [[1, -1, 0], [0, -1, 0], [0, 0, -1]]),
    rot!("2(010)", 32, Hexagonal, [[-1, 0, 0], [-1, 1, 0], [0, 0, -1]]),
    rot!("2(120)", 33, Hexagonal, [[-1, 1, 0], [0, 1, 0], [0, 0, -1]]),
    rot!("2(210)", 34, Hexagonal, [[1, 0, 0], [1, -1, 0], [0, 0, -1]]),
    rot!("m(100)", 35, Hexagonal, [[-1, 1, 0], [0, 1, 0], [0, 0, 1]]),
    rot!("m(010)", 36, Hexagonal, [[1, 0, 0], [1, -1, 0], [0, 0, 1]]),
    rot!("m(120)", 37, Hexagonal, [[1, -1, 0], [0, -1, 0], [0, 0, 1]]),
    rot!("m(210)", 38, Hexagonal, [[-1, 0, 0], [-1, 1, 0], [0, 0, 1]]),
];

lazy_static! {
    static ref ROTATIONS_BY_ID: HashMap<u32, &'static RotationElement> = ROTATION_ELEMENTS
        .iter()
        .map(|element| (element.packed_id(), element))
        .collect();
}

fn pack_rows(rows: &[[i8; 3]; 3]) -> u32 {
    rows.iter()
        .flatten()
        .rev()
        .fold(0, |acc, m| acc * 3 + (*m + 1) as u32)
}

/// Packs a rotation matrix with entries in $`\{-1, 0, 1\}`$ into a base-3 identifier,
/// $`\sum_{k=0}^{8} (m_k + 1) 3^k`$ with $`k = 3i + j`$.
///
/// # Returns
///
/// The packed identifier, or `None` if an entry is not one of $`-1`$, $`0`$, $`1`$.
pub fn pack_rotation(rotation: &Matrix3<f64>) -> Option<u32> {
    let mut rows = [[0i8; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let m = rotation[(i, j)];
            let r = m.round();
            if (m - r).abs() > 1e-6 || r.abs() > 1.0 {
                return None;
            }
            rows[i][j] = r as i8;
        }
    }
    Some(pack_rows(&rows))
}

/// Looks up the named element for a rotation matrix.
pub fn lookup_rotation(rotation: &Matrix3<f64>) -> Option<&'static RotationElement> {
    pack_rotation(rotation).and_then(|id| ROTATIONS_BY_ID.get(&id).copied())
}

/// Returns every rotation matrix carrying a given element name. Elements of order greater than
/// two have two matrices, one being the inverse of the other.
pub fn element_matrices(name: &str) -> Vec<Matrix3<f64>> {
    ROTATION_ELEMENTS
        .iter()
        .filter(|element| element.name == name)
        .map(RotationElement::matrix)
        .collect()
}

/// Returns the name of a rotation, or [`UNNAMED_ROTATION`] if it is not tabulated.
pub fn rotation_name(rotation: &Matrix3<f64>) -> &'static str {
    lookup_rotation(rotation).map_or(UNNAMED_ROTATION, |element| element.name)
}
