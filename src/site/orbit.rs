//! Orbits of fractional coordinates under an expanded space group.

use std::fmt;

use derive_builder::Builder;
use itertools::Itertools;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::auxiliary::misc::{fold_unit, lattice_distance};
use crate::group::expansion::ExpandedGroup;

#[cfg(test)]
#[path = "orbit_tests.rs"]
mod orbit_tests;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for orbit generation.
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    /// Tolerance for two images to be considered the same position modulo lattice translations.
    #[builder(default = "2.0e-4")]
    pub tolerance: f64,

    /// Boolean indicating if images coinciding with an earlier one are to be recorded as
    /// duplicates rather than dropped.
    #[builder(default = "false")]
    pub allow_duplicates: bool,

    /// Anisotropic displacement parameters $`(U_{11}, U_{22}, U_{33}, U_{12}, U_{13}, U_{23})`$
    /// to be carried through each operator.
    #[builder(default = "None")]
    pub uij: Option<[f64; 6]>,
}

impl OrbitParams {
    /// Returns a builder to construct a [`OrbitParams`] structure.
    pub fn builder() -> OrbitParamsBuilder {
        OrbitParamsBuilder::default()
    }
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            tolerance: 2.0e-4,
            allow_duplicates: false,
            uij: None,
        }
    }
}

// ------
// Orbit
// ------

/// An image of a position under one operator of a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitMember {
    /// The image, folded into the unit cell.
    pub position: Vector3<f64>,

    /// Index of the producing operator in the expanded group.
    pub operator_index: usize,

    /// Signed duplicate index of the producing operator.
    pub signed_index: i32,

    /// Boolean indicating if this image coincides with an earlier image.
    pub duplicate: bool,

    /// Boolean indicating if this image coincides with the input position.
    pub fixes_input: bool,

    /// Integer lattice translation removed when folding the image into the unit cell.
    pub cell_shift: Vector3<i32>,

    /// The transformed Uij components, if Uij components were supplied.
    pub uij: Option<[f64; 6]>,
}

/// The orbit of a position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// The input position.
    pub origin: Vector3<f64>,

    /// The images in operator order.
    pub members: Vec<OrbitMember>,
}

impl Orbit {
    /// Returns the images that do not duplicate an earlier image.
    pub fn unique_members(&self) -> impl Iterator<Item = &OrbitMember> {
        self.members.iter().filter(|member| !member.duplicate)
    }

    /// Returns the number of distinct images.
    pub fn n_unique(&self) -> usize {
        self.unique_members().count()
    }

    /// Returns the indices of the operators mapping the input position onto itself.
    pub fn stabiliser(&self) -> Vec<usize> {
        self.members
            .iter()
            .filter(|member| member.fixes_input)
            .map(|member| member.operator_index)
            .collect()
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Orbit of ({}) with {} distinct positions:",
            self.origin.iter().map(|x| format!("{x:.5}")).join(", "),
            self.n_unique()
        )?;
        for member in self.members.iter() {
            writeln!(
                f,
                "  ({})  op {:>3}  {:>5}{}",
                member.position.iter().map(|x| format!("{x:.5}")).join(", "),
                member.operator_index + 1,
                member.signed_index,
                if member.duplicate { "  (duplicate)" } else { "" }
            )?;
        }
        Ok(())
    }
}

// =========
// Functions
// =========

/// Transforms Uij components as $`\mathbf{U}' = \mathbf{M}\mathbf{U}\mathbf{M}^{\mathsf{T}}`$.
pub fn transform_uij(rotation: &Matrix3<f64>, uij: &[f64; 6]) -> [f64; 6] {
    let [u11, u22, u33, u12, u13, u23] = *uij;
    let u = Matrix3::new(u11, u12, u13, u12, u22, u23, u13, u23, u33);
    let t = rotation * u * rotation.transpose();
    [
        t[(0, 0)],
        t[(1, 1)],
        t[(2, 2)],
        t[(0, 1)],
        t[(0, 2)],
        t[(1, 2)],
    ]
}

fn same_site(a: &Vector3<f64>, b: &Vector3<f64>, tol: f64) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| lattice_distance(*x, *y) <= tol)
}

/// Generates the orbit of a position.
///
/// Every operator of the group is applied to the position and the image folded into the unit
/// cell. An image within tolerance of an earlier image, modulo lattice translations, is a
/// duplicate: it is dropped, or recorded with its duplicate flag set if
/// [`OrbitParams::allow_duplicates`] is set.
///
/// # Arguments
///
/// * `position` - The fractional coordinates.
/// * `group` - The expanded space group.
/// * `params` - The orbit parameters.
///
/// # Returns
///
/// The orbit.
pub fn generate_orbit(
    position: &Vector3<f64>,
    group: &ExpandedGroup,
    params: &OrbitParams,
) -> Orbit {
    let tol = params.tolerance;
    let mut members: Vec<OrbitMember> = Vec::with_capacity(group.len());
    for (operator_index, op) in group.operators.iter().enumerate() {
        let image = op.operator.apply(position);
        let mut folded = Vector3::zeros();
        let mut cell_shift = Vector3::zeros();
        for i in 0..3 {
            let (frac, cell) = fold_unit(image[i], tol);
            folded[i] = frac;
            cell_shift[i] = cell;
        }
        let duplicate = members
            .iter()
            .any(|member| !member.duplicate && same_site(&member.position, &folded, tol));
        if duplicate && !params.allow_duplicates {
            continue;
        }
        members.push(OrbitMember {
            position: folded,
            operator_index,
            signed_index: op.signed_index(),
            duplicate,
            fixes_input: same_site(&folded, position, tol),
            cell_shift,
            uij: params
                .uij
                .as_ref()
                .map(|uij| transform_uij(&op.operator.rotation, uij)),
        });
    }
    Orbit {
        origin: *position,
        members,
    }
}
