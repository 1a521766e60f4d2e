//! Parameter constraints imposed on atomic positions and anisotropic displacement parameters by
//! site symmetry.
//!
//! A constraint pattern assigns each component a one-based slot in the reduced parameter list
//! (zero for a component fixed at zero) and a multiplier: component $`i`$ equals
//! `multiplier[i]` times parameter `index[i]`, plus any extra terms recorded for it when it
//! depends on more than one parameter. Patterns are found as the reduced row echelon form of a
//! basis of the subspace left invariant by every rotation of the site-symmetry group, so the
//! component at the pivot of each parameter always equals that parameter alone.

use std::fmt;

use fraction;
use itertools::Itertools;
use log;
use nalgebra::{Matrix3, Vector3};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::site::site_symmetry::{ClassificationPrecision, SiteSymmetry};
use crate::site::site_symmetry_table::{rotation_closure, SITE_SYMMETRY_TABLE};
use crate::symmetry::SymmetryError;

#[cfg(test)]
#[path = "constraints_tests.rs"]
mod constraints_tests;

type F = fraction::Fraction;

/// Uij component order used throughout.
pub const UIJ_COMPONENTS: [&str; 6] = ["U11", "U22", "U33", "U12", "U13", "U23"];

const UIJ_PAIRS: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (0, 2), (1, 2)];

// =====================
// Rational derivation
// =====================

/// A constraint pattern with exact multipliers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RationalPattern {
    pub(crate) indices: Vec<usize>,
    pub(crate) multipliers: Vec<F>,

    /// Further `(component, slot, multiplier)` terms of components depending on several
    /// parameters.
    pub(crate) extra_terms: Vec<(usize, usize, F)>,
}

impl RationalPattern {
    /// Returns the multipliers as floats.
    fn float_multipliers(&self) -> Vec<f64> {
        self.multipliers
            .iter()
            .map(|m| m.to_f64().unwrap_or(f64::NAN))
            .collect()
    }

    /// Returns the extra terms with float multipliers.
    fn float_extra_terms(&self) -> Vec<ExtraTerm> {
        self.extra_terms
            .iter()
            .map(|(component, index, multiplier)| ExtraTerm {
                component: *component,
                index: *index,
                multiplier: multiplier.to_f64().unwrap_or(f64::NAN),
            })
            .collect()
    }
}

fn int_to_fraction(n: i32) -> F {
    if n < 0 {
        F::new_neg(n.unsigned_abs() as u64, 1u64)
    } else {
        F::new(n as u64, 1u64)
    }
}

/// Returns the action of a rotation on the six Uij components, $`\mathbf{U}' =
/// \mathbf{R}\mathbf{U}\mathbf{R}^{\mathsf{T}}`$, as a $`6 \times 6`$ integer matrix.
fn uij_action(rotation: &Matrix3<i32>) -> Vec<Vec<i32>> {
    UIJ_PAIRS
        .iter()
        .map(|&(a, b)| {
            UIJ_PAIRS
                .iter()
                .map(|&(c, d)| {
                    if c == d {
                        rotation[(a, c)] * rotation[(b, c)]
                    } else {
                        rotation[(a, c)] * rotation[(b, d)] + rotation[(a, d)] * rotation[(b, c)]
                    }
                })
                .collect()
        })
        .collect()
}

/// Reduces rows to reduced row echelon form and drops zero rows.
fn reduced_row_echelon(mut rows: Vec<Vec<F>>) -> Vec<Vec<F>> {
    let n_cols = rows.first().map_or(0, Vec::len);
    let mut rank = 0;
    for col in 0..n_cols {
        let Some(pivot) = (rank..rows.len()).find(|&i| !rows[i][col].is_zero()) else {
            continue;
        };
        rows.swap(rank, pivot);
        let scale = rows[rank][col].clone();
        rows[rank] = rows[rank].iter().map(|x| x.clone() / scale.clone()).collect();
        for i in 0..rows.len() {
            if i != rank && !rows[i][col].is_zero() {
                let factor = rows[i][col].clone();
                rows[i] = rows[i]
                    .iter()
                    .zip(rows[rank].iter())
                    .map(|(x, p)| x.clone() - factor.clone() * p.clone())
                    .collect();
            }
        }
        rank += 1;
        if rank == rows.len() {
            break;
        }
    }
    rows.truncate(rank);
    rows
}

/// Derives the constraint pattern of a group of integer matrices acting on a `dim`-dimensional
/// parameter space.
fn invariant_pattern(actions: &[Vec<Vec<i32>>], dim: usize) -> RationalPattern {
    // Projector onto the invariant subspace, transposed so that its rows span the subspace.
    let n = int_to_fraction(actions.len() as i32);
    let projector_t = (0..dim)
        .map(|j| {
            (0..dim)
                .map(|i| {
                    actions
                        .iter()
                        .fold(F::zero(), |acc, m| acc + int_to_fraction(m[i][j]))
                        / n.clone()
                })
                .collect_vec()
        })
        .collect_vec();
    let basis = reduced_row_echelon(projector_t);

    let mut indices = vec![0; dim];
    let mut multipliers = vec![F::zero(); dim];
    let mut extra_terms = vec![];
    for col in 0..dim {
        let mut nonzero = basis.iter().positions(|row| !row[col].is_zero());
        if let Some(row) = nonzero.next() {
            indices[col] = row + 1;
            multipliers[col] = basis[row][col].clone();
        }
        for row in nonzero {
            log::debug!("Component {} also depends on parameter {}.", col + 1, row + 1);
            extra_terms.push((col, row + 1, basis[row][col].clone()));
        }
    }
    RationalPattern {
        indices,
        multipliers,
        extra_terms,
    }
}

/// Derives the position constraint pattern of a group of rotations.
pub(crate) fn position_pattern(rotations: &[Matrix3<i32>]) -> RationalPattern {
    let actions = rotations
        .iter()
        .map(|r| (0..3).map(|i| (0..3).map(|j| r[(i, j)]).collect()).collect())
        .collect_vec();
    invariant_pattern(&actions, 3)
}

/// Derives the Uij constraint pattern of a group of rotations.
pub(crate) fn uij_pattern(rotations: &[Matrix3<i32>]) -> RationalPattern {
    let actions = rotations.iter().map(uij_action).collect_vec();
    invariant_pattern(&actions, 6)
}

// ================
// Constraint table
// ================

/// A further contribution to a component depending on more than one reduced parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtraTerm {
    /// Zero-based index of the component.
    pub component: usize,

    /// One-based reduced-parameter slot.
    pub index: usize,

    /// Coefficient of the component on the slot.
    pub multiplier: f64,
}

/// A structure holding the constraints on the three position components and the six Uij
/// components of an atom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintTable {
    /// The site-symmetry label the constraints belong to.
    pub label: String,

    /// One-based reduced-parameter slot of each position component, zero if fixed.
    pub position_indices: [usize; 3],

    /// Coefficient of each position component on its slot.
    pub position_multipliers: [f64; 3],

    /// Further terms of position components depending on several parameters.
    #[serde(default)]
    pub position_extra_terms: Vec<ExtraTerm>,

    /// One-based reduced-parameter slot of each Uij component, zero if fixed at zero.
    pub uij_indices: [usize; 6],

    /// Coefficient of each Uij component on its slot.
    pub uij_multipliers: [f64; 6],

    /// Further terms of Uij components depending on several parameters.
    #[serde(default)]
    pub uij_extra_terms: Vec<ExtraTerm>,

    /// The codes of the shared position and Uij patterns, or `None` if the constraints were
    /// derived directly from an unclassified stabiliser.
    pub pattern_codes: Option<(usize, usize)>,
}

impl ConstraintTable {
    fn from_patterns(
        label: &str,
        position: &RationalPattern,
        uij: &RationalPattern,
        pattern_codes: Option<(usize, usize)>,
    ) -> Self {
        let mut position_indices = [0; 3];
        let mut position_multipliers = [0.0; 3];
        position_indices.copy_from_slice(&position.indices);
        position_multipliers.copy_from_slice(&position.float_multipliers());
        let mut uij_indices = [0; 6];
        let mut uij_multipliers = [0.0; 6];
        uij_indices.copy_from_slice(&uij.indices);
        uij_multipliers.copy_from_slice(&uij.float_multipliers());
        Self {
            label: label.to_string(),
            position_indices,
            position_multipliers,
            position_extra_terms: position.float_extra_terms(),
            uij_indices,
            uij_multipliers,
            uij_extra_terms: uij.float_extra_terms(),
            pattern_codes,
        }
    }

    /// Returns the constraints of a tabulated site-symmetry label.
    ///
    /// # Errors
    ///
    /// Errors with [`SymmetryError::DegradedClassification`] if the label is not tabulated.
    pub fn for_label(label: &str) -> Result<Self, SymmetryError> {
        let table = &*SITE_SYMMETRY_TABLE;
        let site = table.lookup_label(label).ok_or_else(|| {
            SymmetryError::DegradedClassification(format!(
                "no constraint pattern for site symmetry `{label}`"
            ))
        })?;
        let position = table
            .position_patterns
            .get_index(site.position_code)
            .unwrap_or_else(|| panic!("Position pattern {} missing.", site.position_code));
        let uij = table
            .uij_patterns
            .get_index(site.uij_code)
            .unwrap_or_else(|| panic!("Uij pattern {} missing.", site.uij_code));
        Ok(Self::from_patterns(
            site.label,
            position,
            uij,
            Some((site.position_code, site.uij_code)),
        ))
    }

    /// Returns the constraints of a classified site.
    ///
    /// Exactly classified sites use the shared patterns of their label. Degraded sites have
    /// their constraints derived from the group generated by the rotations of their stabiliser.
    pub fn for_site(site: &SiteSymmetry) -> Self {
        if site.precision == ClassificationPrecision::Exact {
            if let Ok(table) = Self::for_label(&site.label) {
                return table;
            }
        }
        let rotations = rotation_closure(
            &site
                .stabiliser_rotations
                .iter()
                .map(|m| m.map(|x| x.round() as i32))
                .collect_vec(),
        );
        Self::from_patterns(
            &site.label,
            &position_pattern(&rotations),
            &uij_pattern(&rotations),
            None,
        )
    }

    /// Returns the number of distinct tabulated position and Uij patterns.
    pub fn n_shared_patterns() -> (usize, usize) {
        let table = &*SITE_SYMMETRY_TABLE;
        (table.position_patterns.len(), table.uij_patterns.len())
    }

    /// Returns the number of free position parameters.
    pub fn n_free_position(&self) -> usize {
        self.position_indices.iter().copied().max().unwrap_or(0)
    }

    /// Returns the number of free Uij parameters.
    pub fn n_free_uij(&self) -> usize {
        self.uij_indices.iter().copied().max().unwrap_or(0)
    }

    /// Builds a position shift from the reduced position parameters.
    ///
    /// # Returns
    ///
    /// The shift, or `None` if the number of parameters does not match
    /// [`Self::n_free_position`].
    pub fn expand_position(&self, params: &[f64]) -> Option<Vector3<f64>> {
        if params.len() != self.n_free_position() {
            return None;
        }
        let expanded = expand(
            &self.position_indices,
            &self.position_multipliers,
            &self.position_extra_terms,
            params,
        );
        Some(Vector3::from_column_slice(&expanded))
    }

    /// Builds the six Uij components from the reduced Uij parameters.
    ///
    /// # Returns
    ///
    /// The components, or `None` if the number of parameters does not match
    /// [`Self::n_free_uij`].
    pub fn expand_uij(&self, params: &[f64]) -> Option<[f64; 6]> {
        if params.len() != self.n_free_uij() {
            return None;
        }
        let mut uij = [0.0; 6];
        uij.copy_from_slice(&expand(
            &self.uij_indices,
            &self.uij_multipliers,
            &self.uij_extra_terms,
            params,
        ));
        Some(uij)
    }
}

fn expand(
    indices: &[usize],
    multipliers: &[f64],
    extra_terms: &[ExtraTerm],
    params: &[f64],
) -> Vec<f64> {
    let mut values = indices
        .iter()
        .zip(multipliers.iter())
        .map(|(&index, &mult)| {
            if index == 0 {
                0.0
            } else {
                mult * params[index - 1]
            }
        })
        .collect_vec();
    for term in extra_terms {
        values[term.component] += term.multiplier * params[term.index - 1];
    }
    values
}

impl fmt::Display for ConstraintTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let term = |index: usize, mult: f64| {
            if (mult - 1.0).abs() < 1e-12 {
                format!("p{index}")
            } else {
                format!("{mult:+.4}·p{index}")
            }
        };
        let describe = |component: usize, index: usize, mult: f64, extra: &[ExtraTerm]| {
            if index == 0 {
                return "0".to_string();
            }
            std::iter::once(term(index, mult))
                .chain(
                    extra
                        .iter()
                        .filter(|t| t.component == component)
                        .map(|t| format!("{:+.4}·p{}", t.multiplier, t.index)),
                )
                .join(" ")
        };
        writeln!(f, "Constraints for site symmetry {}:", self.label)?;
        writeln!(
            f,
            "  Position: {}",
            ["x", "y", "z"]
                .iter()
                .zip(self.position_indices.iter().zip(self.position_multipliers.iter()))
                .enumerate()
                .map(|(k, (c, (&i, &m)))| {
                    format!("{c} = {}", describe(k, i, m, &self.position_extra_terms))
                })
                .join(", ")
        )?;
        writeln!(
            f,
            "  Uij: {}",
            UIJ_COMPONENTS
                .iter()
                .zip(self.uij_indices.iter().zip(self.uij_multipliers.iter()))
                .enumerate()
                .map(|(k, (c, (&i, &m)))| {
                    format!("{c} = {}", describe(k, i, m, &self.uij_extra_terms))
                })
                .join(", ")
        )?;
        Ok(())
    }
}
