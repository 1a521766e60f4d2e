//! Superspace groups for incommensurately modulated structures.

pub mod modulation;
pub mod superspace_group;
