//! # SsgSym: Space-Group and Superspace-Group Symmetry for Crystallography
//!
//! SsgSym is a symmetry engine for crystal structure analysis written in Rust with the following
//! capabilities:
//! - expansion of space-group generators (as returned by a symbol resolver) into the full list
//!   of operators, including centering translations and the inversion,
//! - generation of the orbit of a fractional coordinate and of its displacement tensor,
//! - classification of site symmetry and derivation of the constraints it imposes on positions
//!   and anisotropic displacement parameters,
//! - enumeration of symmetry-unique reflections within a resolution limit, with lattice,
//!   space-group and superspace-group extinctions, and
//! - construction of (3+1)-dimensional superspace groups from a space group and a superspace
//!   symbol such as `(a0g)0s`.
//!
//! This documentation details the public API of the `ssgsym` crate.
//!
//! ## Getting started
//!
//! Space-group symbols are turned into generators by a [`group::resolver::SymbolResolver`]. The
//! crate ships with [`group::resolver::TabulatedSymbolResolver`], which is filled from resolver
//! output written as coordinate triplets or rotation matrices. Descriptors and expanded groups are
//! cached per symbol by a [`group::cache::GroupCache`].
//!
//! The `ssgsym` binary reads a YAML input file describing the space group, the unit cell, the
//! atoms and the requested analyses. Run `ssgsym --template input` to obtain a template.
//!
//! ## Examples and usage
//!
//! For most items (structs, enums, functions, and traits), their usages are illustrated in test
//! functions. For more explanation, please consult this documentation.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod auxiliary;
pub mod drivers;
pub mod group;
pub mod interfaces;
pub mod io;
pub mod reflection;
pub mod site;
pub mod superspace;
pub mod symmetry;
