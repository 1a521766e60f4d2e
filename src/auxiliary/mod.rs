//! Helper items to assist the working of the symmetry engine.

pub mod lattice;
pub(crate) mod misc;
