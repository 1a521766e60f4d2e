//! Classification of the site symmetry of a position.

use std::fmt;

use itertools::Itertools;
use log;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::group::expansion::ExpandedGroup;
use crate::site::constraints::ConstraintTable;
use crate::site::orbit::{generate_orbit, OrbitParams};
use crate::site::site_symmetry_table::{site_symmetry_key, SITE_SYMMETRY_TABLE, UNCLASSIFIED_SITE};
use crate::symmetry::SymmetryError;

#[cfg(test)]
#[path = "site_symmetry_tests.rs"]
mod site_symmetry_tests;

/// An enumerated type indicating how reliably a site was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassificationPrecision {
    /// The bit-set was found in the site-symmetry table.
    Exact,

    /// The bit-set is not tabulated; the site carries the generic label `sp`.
    Degraded,
}

impl fmt::Display for ClassificationPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationPrecision::Exact => write!(f, "exact"),
            ClassificationPrecision::Degraded => write!(f, "degraded"),
        }
    }
}

/// The site symmetry of a position in a space group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteSymmetry {
    /// The classified position.
    pub position: Vector3<f64>,

    /// The site-symmetry bit-set.
    pub code: u64,

    /// The canonical label, or `sp` if unclassified.
    pub label: String,

    /// The number of equivalent positions in the unit cell.
    pub multiplicity: usize,

    /// Indices of the expanded-group operators fixing the position.
    pub stabiliser: Vec<usize>,

    /// The distinct rotation parts of the stabiliser.
    pub stabiliser_rotations: Vec<Matrix3<f64>>,

    /// The classification precision.
    pub precision: ClassificationPrecision,
}

impl SiteSymmetry {
    /// Checks if the site was found in the site-symmetry table.
    pub fn is_exact(&self) -> bool {
        self.precision == ClassificationPrecision::Exact
    }

    /// Turns a degraded classification into an error.
    ///
    /// # Errors
    ///
    /// Errors with [`SymmetryError::DegradedClassification`] if the site is unclassified.
    pub fn require_exact(self) -> Result<Self, SymmetryError> {
        if self.is_exact() {
            Ok(self)
        } else {
            Err(SymmetryError::DegradedClassification(format!(
                "bit-set {:#x} of position ({}) is not tabulated",
                self.code,
                self.position.iter().map(|x| format!("{x:.5}")).join(", ")
            )))
        }
    }

    /// Returns the position and Uij constraints of the site.
    pub fn constraints(&self) -> ConstraintTable {
        ConstraintTable::for_site(self)
    }
}

impl fmt::Display for SiteSymmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}): {} (multiplicity {}, {} classification)",
            self.position.iter().map(|x| format!("{x:.5}")).join(", "),
            self.label,
            self.multiplicity,
            self.precision
        )
    }
}

/// Classifies the site symmetry of a position.
///
/// Every operator mapping the position onto itself modulo lattice translations contributes the
/// bit of its named rotation to a bit-set seeded with the hexagonal bias for Laue classes on
/// hexagonal axes. The bit-set is looked up in the site-symmetry table. Rotations outside the
/// rotation table contribute no bit.
///
/// # Arguments
///
/// * `position` - The fractional coordinates.
/// * `group` - The expanded space group.
/// * `tolerance` - The coincidence tolerance for images.
///
/// # Returns
///
/// The site symmetry. An untabulated bit-set gives the label `sp` with
/// [`ClassificationPrecision::Degraded`].
pub fn classify_site(
    position: &Vector3<f64>,
    group: &ExpandedGroup,
    tolerance: f64,
) -> SiteSymmetry {
    let params = OrbitParams {
        tolerance,
        allow_duplicates: true,
        uij: None,
    };
    let orbit = generate_orbit(position, group, &params);
    let stabiliser = orbit.stabiliser();
    let stabiliser_rotations = stabiliser
        .iter()
        .map(|&i| group.operators[i].operator.rotation)
        .fold(Vec::<Matrix3<f64>>::new(), |mut acc, rot| {
            if !acc.iter().any(|r| (r - rot).amax() < 1e-6) {
                acc.push(rot);
            }
            acc
        });
    let code = site_symmetry_key(
        stabiliser
            .iter()
            .filter_map(|&i| group.operators[i].element()),
        group.laue_class.site_symmetry_bias(),
    );
    let n_fixing = stabiliser.len().max(1);
    let multiplicity = group.len() / n_fixing;

    let (label, precision) = match SITE_SYMMETRY_TABLE.lookup_key(code) {
        Some(site) => (site.label.to_string(), ClassificationPrecision::Exact),
        None => {
            log::warn!(
                "Site-symmetry bit-set {code:#x} of ({}) in `{}` is not tabulated.",
                position.iter().map(|x| format!("{x:.5}")).join(", "),
                group.symbol
            );
            (UNCLASSIFIED_SITE.to_string(), ClassificationPrecision::Degraded)
        }
    };
    SiteSymmetry {
        position: *position,
        code,
        label,
        multiplicity,
        stabiliser,
        stabiliser_rotations,
        precision,
    }
}
