//! Site analysis: orbits of fractional coordinates, site-symmetry classification and the
//! parameter constraints that follow from it.

pub mod constraints;
pub mod orbit;
pub mod site_symmetry;
pub mod site_symmetry_table;
