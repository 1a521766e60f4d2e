//! (3+1)-dimensional superspace groups built from a space group and a superspace symbol.

use std::fmt;

use itertools::Itertools;
use log;
use nalgebra::{Matrix3, RowVector3, RowVector4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::auxiliary::misc::{fold_unit, is_integral, lattice_distance, FRACTION_TOLERANCE};
use crate::group::expansion::ExpandedGroup;
use crate::group::group_classes::{Centering, LaueClass, PointGroup, UniqueAxis};
use crate::superspace::modulation::{ModulationVector, SuperspaceSymbol};
use crate::symmetry::rotation_table::element_matrices;
use crate::symmetry::symmetry_operator::{SuperspaceOperator, SymmetryOperator};
use crate::symmetry::symmetry_operator_text::format_fraction;
use crate::symmetry::{SymbolDiagnostic, SymmetryError};

#[cfg(test)]
#[path = "superspace_group_tests.rs"]
mod superspace_group_tests;

/// Upper bound on the number of passes of the closure extension. Every pass that does not
/// terminate the loop fixes at least one operator, so this exceeds the order of any
/// non-cubic space group.
const MAX_EXTENSION_PASSES: usize = 64;

const MATCH_TOLERANCE: f64 = 1.0e-4;

// ==================
// Struct definitions
// ==================

/// A superspace group: a space group whose operators are lifted into (3+1)-dimensional
/// superspace for a given modulation wave vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuperspaceGroupDescriptor {
    /// The symbol of the underlying space group.
    pub base_symbol: String,

    /// The Laue class of the underlying space group.
    pub laue_class: LaueClass,

    /// The lattice centering of the underlying space group.
    pub centering: Centering,

    /// The point group of the underlying space group.
    pub point_group: PointGroup,

    /// The unique axis of the underlying space group.
    pub unique_axis: UniqueAxis,

    /// The modulation wave vector.
    pub modulation: ModulationVector,

    /// The generator letters as given, padded with `0` to one letter per symmetry direction.
    pub generator_symbol: String,

    /// The $`\epsilon`$ value of each symmetry direction of the point-group symbol.
    pub kl: Vec<i8>,

    /// The (3+1)-dimensional centering translations, the origin first.
    pub centering_vectors: Vec<Vector4<f64>>,

    /// The lifted generators, in the order of the space-group generators.
    pub generators: Vec<SuperspaceOperator>,

    /// All lifted operators, in the order of the expanded space group.
    pub operators: Vec<SuperspaceOperator>,
}

// ================
// Operator lifting
// ================

/// Returns the bottom row $`(\mathbf{H}, \epsilon)`$ of the superspace rotation lifting a
/// three-dimensional rotation, from $`\mathbf{q}\mathbf{R} = \epsilon\mathbf{q} + \mathbf{H}`$.
///
/// Every incommensurate component must be mapped onto $`\pm`$ itself, with the same sign for all
/// of them, and the commensurate part must leave an integer $`\mathbf{H}`$.
///
/// # Errors
///
/// Errors if the rotation is incompatible with the modulation vector.
pub fn lift_rotation(
    rotation: &Matrix3<f64>,
    modulation: &ModulationVector,
) -> Result<(RowVector3<f64>, f64), SymmetryError> {
    let incompatible = || {
        SymmetryError::Symbol(SymbolDiagnostic::Superspace(format!(
            "rotation {} is incompatible with modulation vector {modulation}",
            SymmetryOperator::new(*rotation, Vector3::zeros())
        )))
    };
    let free_axes = modulation.free_axes();
    let first = *free_axes.first().ok_or_else(incompatible)?;
    let epsilon = rotation[(first, first)].round();
    let keeps_free = free_axes.iter().all(|&f| {
        (0..3).all(|j| {
            let expected = if j == f { epsilon } else { 0.0 };
            (rotation[(f, j)] - expected).abs() < MATCH_TOLERANCE
        })
    });
    if !keeps_free || epsilon.abs() != 1.0 {
        return Err(incompatible());
    }
    let r = modulation.rational_part().transpose();
    let h_row = r * rotation - r * epsilon;
    if !h_row.iter().all(|x| is_integral(*x, MATCH_TOLERANCE)) {
        return Err(incompatible());
    }
    Ok((h_row.map(f64::round), epsilon))
}

/// An operator being lifted, together with whether its internal translation is settled.
#[derive(Clone, Debug)]
struct LiftedOperator {
    operator: SuperspaceOperator,
    fixed: bool,
}

fn fold_tau(tau: f64) -> f64 {
    fold_unit(tau, FRACTION_TOLERANCE).0
}

fn find_spatial(ops: &[LiftedOperator], target: &SymmetryOperator) -> Option<usize> {
    ops.iter().position(|op| {
        op.operator
            .spatial_part()
            .approx_eq_mod_lattice(target, MATCH_TOLERANCE)
    })
}

/// Extends the settled internal translations by closure.
///
/// Every product of two settled operators is compared with the operator sharing its
/// three-dimensional part: an unsettled one takes over the product's internal translation, a
/// settled one must agree with it modulo one. The loop runs until no operator changes.
///
/// # Errors
///
/// Errors with [`SymmetryError::ClosureConflict`] if two settled translations disagree or a
/// product has no counterpart.
///
/// # Panics
///
/// Panics if the loop does not settle within [`MAX_EXTENSION_PASSES`] passes.
fn extend_operators(ops: &mut [LiftedOperator]) -> Result<(), SymmetryError> {
    for pass in 0..MAX_EXTENSION_PASSES {
        let mut changed = false;
        for i in 0..ops.len() {
            for j in 0..ops.len() {
                if !(ops[i].fixed && ops[j].fixed) {
                    continue;
                }
                let product = ops[i].operator.compose(&ops[j].operator);
                let k = find_spatial(ops, &product.spatial_part()).ok_or_else(|| {
                    SymmetryError::ClosureConflict(format!(
                        "product {product} of {} and {} is not in the group",
                        ops[i].operator, ops[j].operator
                    ))
                })?;
                if ops[k].fixed {
                    if lattice_distance(product.tau(), ops[k].operator.tau()) > MATCH_TOLERANCE {
                        return Err(SymmetryError::ClosureConflict(format!(
                            "{product} conflicts with {}",
                            ops[k].operator
                        )));
                    }
                } else {
                    ops[k].operator.translation[3] = fold_tau(product.tau());
                    ops[k].fixed = true;
                    changed = true;
                }
            }
        }
        if !changed {
            log::debug!("Superspace closure settled after {} passes.", pass + 1);
            return Ok(());
        }
    }
    panic!("Superspace closure extension did not settle after {MAX_EXTENSION_PASSES} passes.");
}

/// Settles the internal translation of one operator and extends by closure.
fn install(ops: &mut [LiftedOperator], index: usize, tau: f64) -> Result<(), SymmetryError> {
    let op = &mut ops[index];
    if op.fixed {
        if lattice_distance(op.operator.tau(), tau) > MATCH_TOLERANCE {
            return Err(SymmetryError::ClosureConflict(format!(
                "{} cannot take internal translation {tau:.4}",
                op.operator
            )));
        }
        return Ok(());
    }
    op.operator.translation[3] = fold_tau(tau);
    op.fixed = true;
    extend_operators(ops)
}

// =================
// Symbol directions
// =================

fn monoclinic_axis(unique_axis: UniqueAxis) -> &'static str {
    match unique_axis {
        UniqueAxis::A => "x",
        UniqueAxis::C => "z",
        UniqueAxis::B | UniqueAxis::None => "y",
    }
}

/// Returns the rotation element named by each symmetry direction of the point-group symbol,
/// in symbol order. The generator letters of a superspace symbol follow the same order.
fn symbol_directions(point_group: PointGroup, unique_axis: UniqueAxis) -> Vec<String> {
    let axis = monoclinic_axis(unique_axis);
    let names: &[&str] = match point_group {
        PointGroup::P1 | PointGroup::PBar1 => &[],
        PointGroup::P2 => return vec![format!("2({axis})")],
        PointGroup::Pm => return vec![format!("m({axis})")],
        PointGroup::P2OverM => return vec![format!("2({axis})"), format!("m({axis})")],
        PointGroup::P222 => &["2(x)", "2(y)", "2(z)"],
        PointGroup::Pmm2 => &["m(x)", "m(y)", "2(z)"],
        PointGroup::Pm2m => &["m(x)", "2(y)", "m(z)"],
        PointGroup::P2mm => &["2(x)", "m(y)", "m(z)"],
        PointGroup::Pmmm => &["m(x)", "m(y)", "m(z)"],
        PointGroup::P4 => &["4(z)"],
        PointGroup::PBar4 => &["-4(z)"],
        PointGroup::P4OverM => &["4(z)", "m(z)"],
        PointGroup::P422 => &["4(z)", "2(x)", "2(110)"],
        PointGroup::P4mm => &["4(z)", "m(x)", "m(110)"],
        PointGroup::PBar42m => &["-4(z)", "2(x)", "m(110)"],
        PointGroup::PBar4m2 => &["-4(z)", "m(x)", "2(110)"],
        PointGroup::P4OverMmm => &["4(z)", "m(z)", "m(x)", "m(110)"],
        PointGroup::P3 => &["3(z)"],
        PointGroup::PBar3 => &["-3(z)"],
        // Rhombohedral axes only, rejected before dispatch.
        PointGroup::P32 | PointGroup::P3m | PointGroup::PBar3m => &[],
        PointGroup::P321 => &["3(z)", "2(100)", "1"],
        PointGroup::P312 => &["3(z)", "1", "2(1-10)"],
        PointGroup::P3m1 => &["3(z)", "m(100)", "1"],
        PointGroup::P31m => &["3(z)", "1", "m(1-10)"],
        PointGroup::PBar3m1 => &["-3(z)", "m(100)", "1"],
        PointGroup::PBar31m => &["-3(z)", "1", "m(1-10)"],
        PointGroup::P6 => &["6(z)"],
        PointGroup::PBar6 => &["-6(z)"],
        PointGroup::P6OverM => &["6(z)", "m(z)"],
        PointGroup::P622 => &["6(z)", "2(100)", "2(1-10)"],
        PointGroup::P6mm => &["6(z)", "m(100)", "m(1-10)"],
        PointGroup::PBar6m2 => &["-6(z)", "m(100)", "2(1-10)"],
        PointGroup::PBar62m => &["-6(z)", "2(100)", "m(1-10)"],
        PointGroup::P6OverMmm => &["6(z)", "m(z)", "m(100)", "m(1-10)"],
        // Cubic, rejected before dispatch.
        PointGroup::P23
        | PointGroup::PmBar3
        | PointGroup::P432
        | PointGroup::PBar43m
        | PointGroup::PmBar3m => &[],
    };
    names.iter().map(|name| name.to_string()).collect()
}

/// Finds the operator without centering translation whose rotation is the named element,
/// preferring the first tabulated matrix of elements with two.
fn find_direction(group: &ExpandedGroup, name: &str) -> Option<usize> {
    element_matrices(name).iter().find_map(|matrix| {
        group.operators.iter().position(|op| {
            op.centering_index == 0 && (op.operator.rotation - matrix).amax() < MATCH_TOLERANCE
        })
    })
}

// ==============
// Implementation
// ==============

impl SuperspaceGroupDescriptor {
    /// Builds a superspace group from an expanded space group and a superspace symbol.
    ///
    /// Every operator is lifted with the bottom row given by [`lift_rotation`]. Pure centering
    /// translations $`\mathbf{c}`$ take the internal translation $`\mathbf{r}\cdot\mathbf{c}`$
    /// modulo one, where $`\mathbf{r}`$ is the commensurate part of the wave vector. Each
    /// nonzero generator letter then settles the internal translation of the operator of its
    /// symmetry direction, followed by closure extension. A `0` letter leaves its operator free
    /// to be settled by closure. Operators left unsettled take zero internal translation, one at
    /// a time, and the result is checked for closure.
    ///
    /// # Arguments
    ///
    /// * `group` - The expanded space group.
    /// * `symbol` - The superspace symbol, *e.g.* `(a0g)0s`.
    ///
    /// # Errors
    ///
    /// * [`SymmetryError::UnsupportedCombination`] for cubic groups and groups on rhombohedral
    ///   axes.
    /// * [`SymmetryError::Symbol`] for an unparsable symbol, a modulation vector incompatible with
    ///   the point group, or too many generator letters.
    /// * [`SymmetryError::ClosureConflict`] if the generator letters are mutually inconsistent.
    pub fn build(group: &ExpandedGroup, symbol: &str) -> Result<Self, SymmetryError> {
        if group.laue_class.is_cubic() || group.laue_class.uses_rhombohedral_axes() {
            return Err(SymmetryError::UnsupportedCombination(format!(
                "superspace groups are not available for `{}` in Laue class {}",
                group.symbol, group.laue_class
            )));
        }
        let parsed = symbol.parse::<SuperspaceSymbol>()?;
        let modulation = parsed.modulation;
        let directions = symbol_directions(group.point_group, group.unique_axis);
        if parsed.offsets.len() > directions.len() {
            return Err(SymmetryError::Symbol(SymbolDiagnostic::Superspace(format!(
                "`{symbol}` has {} generator letters but point group {} has {} symmetry directions",
                parsed.offsets.len(),
                group.point_group,
                directions.len()
            ))));
        }

        let r = modulation.rational_part();
        let centering_vectors = group
            .centering_vectors
            .iter()
            .map(|c| Vector4::new(c[0], c[1], c[2], fold_tau(r.dot(c))))
            .collect_vec();

        let mut ops = group
            .operators
            .iter()
            .map(|op| {
                let (h_row, epsilon) = lift_rotation(&op.operator.rotation, &modulation)?;
                let is_translation = op.operator.rotation == Matrix3::identity();
                let tau = if is_translation {
                    centering_vectors[op.centering_index][3]
                } else {
                    0.0
                };
                Ok(LiftedOperator {
                    operator: SuperspaceOperator::from_spatial(&op.operator, &h_row, epsilon, tau),
                    fixed: is_translation,
                })
            })
            .collect::<Result<Vec<_>, SymmetryError>>()?;
        extend_operators(&mut ops)?;

        let mut kl = Vec::with_capacity(directions.len());
        let mut generator_symbol = String::with_capacity(directions.len());
        for (i, name) in directions.iter().enumerate() {
            let index = find_direction(group, name).ok_or_else(|| {
                SymmetryError::Symbol(SymbolDiagnostic::Superspace(format!(
                    "`{}` has no operator for symmetry direction {name}",
                    group.symbol
                )))
            })?;
            kl.push(ops[index].operator.epsilon() as i8);
            let letter = parsed.generator_symbol.chars().nth(i).unwrap_or('0');
            generator_symbol.push(letter);
            let tau = parsed.offsets.get(i).copied().unwrap_or(0.0);
            if tau > 0.0 {
                log::debug!("Setting internal translation {tau:.4} on {name}.");
                install(&mut ops, index, tau)?;
            }
        }
        while let Some(index) = ops.iter().position(|op| !op.fixed) {
            install(&mut ops, index, 0.0)?;
        }

        let operators = ops.into_iter().map(|op| op.operator).collect_vec();
        let generators = group
            .operators
            .iter()
            .zip(operators.iter())
            .filter(|(op, _)| op.centering_index == 0 && !op.inverted)
            .map(|(_, lifted)| lifted.clone())
            .collect_vec();
        let descriptor = Self {
            base_symbol: group.symbol.clone(),
            laue_class: group.laue_class,
            centering: group.centering,
            point_group: group.point_group,
            unique_axis: group.unique_axis,
            modulation,
            generator_symbol,
            kl,
            centering_vectors,
            generators,
            operators,
        };
        if !descriptor.is_closed() {
            return Err(SymmetryError::ClosureConflict(format!(
                "superspace group {} is not closed",
                descriptor.symbol()
            )));
        }
        log::debug!(
            "Built superspace group {} with {} operators.",
            descriptor.symbol(),
            descriptor.operators.len()
        );
        Ok(descriptor)
    }

    /// Returns the full superspace symbol, *e.g.* `P 2/m(a0g)0s`.
    pub fn symbol(&self) -> String {
        format!(
            "{}{}{}",
            self.base_symbol,
            self.modulation.symbol(),
            self.generator_symbol
        )
    }

    /// Checks if the operator list is closed under composition modulo superspace lattice
    /// translations.
    pub fn is_closed(&self) -> bool {
        self.operators
            .iter()
            .cartesian_product(self.operators.iter())
            .all(|(a, b)| {
                let product = a.compose(b);
                self.operators
                    .iter()
                    .any(|op| op.approx_eq_mod_lattice(&product, MATCH_TOLERANCE))
            })
    }

    /// Checks if a reflection $`(h, k, l, m)`$ is systematically absent: some operator leaves the
    /// index vector invariant while giving it a non-integral phase.
    pub fn is_systematically_absent(&self, hklm: &[i32; 4]) -> bool {
        let h = RowVector4::from_fn(|_, j| f64::from(hklm[j]));
        self.operators.iter().any(|op| {
            let image = h * op.rotation;
            (image - h).amax() < MATCH_TOLERANCE
                && !is_integral((h * op.translation)[(0, 0)], MATCH_TOLERANCE)
        })
    }
}

impl fmt::Display for SuperspaceGroupDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Superspace group: {}", self.symbol())?;
        writeln!(
            f,
            "  Kl: [{}]",
            self.kl.iter().map(|k| format!("{k:+}")).join(", ")
        )?;
        writeln!(
            f,
            "  Centering: {}",
            self.centering_vectors
                .iter()
                .map(|c| format!(
                    "({})",
                    c.iter()
                        .map(|x| format_fraction(*x))
                        .join(", ")
                ))
                .join(" ")
        )?;
        let width = self.operators.len().to_string().len();
        writeln!(f, "  Operators ({}):", self.operators.len())?;
        for (i, op) in self.operators.iter().enumerate() {
            writeln!(f, "    {:>width$}  {op}", i + 1)?;
        }
        Ok(())
    }
}
