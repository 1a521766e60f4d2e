//! Symmetry operators in three-dimensional space and in (3+1)-dimensional superspace.

use std::error::Error;
use std::fmt;

use phf::phf_map;
use serde::{Deserialize, Serialize};

pub mod rotation_table;
pub mod symmetry_operator;
pub mod symmetry_operator_text;

#[cfg(test)]
#[path = "symmetry_error_tests.rs"]
mod symmetry_error_tests;

// ==================
// Error definitions
// ==================

/// Canned messages for the nonzero error codes returned by an external symbol resolver.
static SYMBOL_ERROR_MESSAGES: phf::Map<u8, &'static str> = phf_map! {
    1u8 => "Less than 2 characters in symbol",
    2u8 => "First character in symbol is not a valid lattice type",
    3u8 => "Illegal lattice type - please use a standard lattice letter",
    4u8 => "Symbol has too many blanks between characters",
    5u8 => "Blank not followed by a numeral, a letter or a minus sign",
    6u8 => "Illegal character in symbol",
    7u8 => "Screw axis not following a numeral",
    8u8 => "Illegal screw axis",
    9u8 => "Numeral not followed by a blank, a slash or a screw subscript",
    10u8 => "Slash not preceded by a numeral",
    11u8 => "Slash not followed by a mirror or glide letter",
    12u8 => "Minus sign not followed by a rotation numeral",
    13u8 => "Minus sign applied to a two-fold axis",
    14u8 => "Space group has not been found",
    15u8 => "More than 24 matrices needed to define group",
    16u8 => "Inconsistent axis assignments in symbol",
    17u8 => "Illegal rotation order",
    18u8 => "Illegal combination of axes in symbol",
    19u8 => "Unique axis cannot be determined from symbol",
    20u8 => "Cubic symbol requires a three-fold axis in the second position",
    21u8 => "Mirror or glide letter not allowed in this position",
    22u8 => "Invalid setting suffix",
    23u8 => "Too many operators on one axis",
    24u8 => "Trigonal axis not compatible with lattice type",
    25u8 => "Hexagonal axis not compatible with lattice type",
    26u8 => "Tetragonal axis not compatible with lattice type",
    27u8 => "Improper rotation not compatible with lattice type",
    28u8 => "Glide plane translation not compatible with lattice type",
    29u8 => "Symbol is ambiguous; please specify a unique axis",
};

/// Returns the human-readable message associated with a symbol-resolver error code.
///
/// # Arguments
///
/// * `code` - The nonzero error code returned by the resolver.
///
/// # Returns
///
/// The canned message, or a generic one for codes outside the known range.
pub fn symbol_error_message(code: u8) -> &'static str {
    SYMBOL_ERROR_MESSAGES
        .get(&code)
        .copied()
        .unwrap_or("Unknown error in space group symbol")
}

/// An enumerated type describing why a space-group symbol was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolDiagnostic {
    /// The external resolver reported a nonzero error code.
    Resolver(u8),

    /// The resolver output is internally inconsistent.
    MalformedOutput(String),

    /// A superspace modulation or generator symbol could not be understood.
    Superspace(String),
}

impl fmt::Display for SymbolDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolDiagnostic::Resolver(code) => {
                write!(f, "{} (code {code})", symbol_error_message(*code))
            }
            SymbolDiagnostic::MalformedOutput(msg) => write!(f, "malformed resolver output: {msg}"),
            SymbolDiagnostic::Superspace(msg) => write!(f, "superspace symbol: {msg}"),
        }
    }
}

/// An enumerated type for errors arising from symmetry computations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymmetryError {
    /// The symbol could not be resolved or parsed.
    Symbol(SymbolDiagnostic),

    /// The requested Laue class and operation are not compatible, such as a superspace group on
    /// a cubic lattice.
    UnsupportedCombination(String),

    /// Two operators with the same three-dimensional part disagree in their superspace part.
    ClosureConflict(String),

    /// A site-symmetry bit-set was not found in the site-symmetry table.
    DegradedClassification(String),

    /// The unit cell or metric tensor is not usable.
    InvalidCell(String),
}

impl fmt::Display for SymmetryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymmetryError::Symbol(diag) => write!(f, "Symbol error: {diag}"),
            SymmetryError::UnsupportedCombination(msg) => {
                write!(f, "Unsupported combination: {msg}")
            }
            SymmetryError::ClosureConflict(msg) => write!(f, "Closure conflict: {msg}"),
            SymmetryError::DegradedClassification(msg) => {
                write!(f, "Degraded site-symmetry classification: {msg}")
            }
            SymmetryError::InvalidCell(msg) => write!(f, "Invalid cell: {msg}"),
        }
    }
}

impl Error for SymmetryError {}

impl From<SymbolDiagnostic> for SymmetryError {
    fn from(diag: SymbolDiagnostic) -> Self {
        SymmetryError::Symbol(diag)
    }
}
