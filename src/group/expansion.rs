//! Expansion of a group descriptor into its full list of operators.

use std::fmt;

use itertools::Itertools;
use log;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::group::descriptor::{GroupDescriptor, ReflectionConditions};
use crate::group::group_classes::{Centering, LaueClass, PointGroup, UniqueAxis};
use crate::symmetry::rotation_table::{lookup_rotation, pack_rotation, RotationElement};
use crate::symmetry::symmetry_operator::SymmetryOperator;

#[cfg(test)]
#[path = "expansion_tests.rs"]
mod expansion_tests;

/// Tolerance for matching operators during the closure check.
const CLOSURE_TOLERANCE: f64 = 1.0e-4;

// ==================
// Struct definitions
// ==================

/// An operator of an expanded group together with its provenance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpandedOperator {
    /// The operator, with its translation folded into $`[0, 1)`$.
    pub operator: SymmetryOperator,

    /// Index of the generator this operator derives from.
    pub generator_index: usize,

    /// Index of the centering vector that was added.
    pub centering_index: usize,

    /// Boolean indicating if the generator was combined with the inversion.
    pub inverted: bool,

    /// The integer lattice translation removed when folding.
    pub cell_offset: Vector3<i32>,

    /// The packed identifier of the rotation part, if its entries are all in
    /// $`\{-1, 0, 1\}`$.
    pub packed_id: Option<u32>,
}

impl ExpandedOperator {
    /// Returns the named rotation element of this operator, if tabulated.
    pub fn element(&self) -> Option<&'static RotationElement> {
        lookup_rotation(&self.operator.rotation)
    }

    /// Returns the signed duplicate index of the operator: the one-based generator index, negated
    /// for inverted operators, plus 100 times the centering index.
    pub fn signed_index(&self) -> i32 {
        let sign = if self.inverted { -1 } else { 1 };
        (self.generator_index as i32 + 1) * sign + 100 * self.centering_index as i32
    }
}

/// The full operator list of a space group.
///
/// The list is ordered by centering vector, then by the sign $`\pm 1`$ applied to the generator,
/// then by generator, and is independent of the descriptor it was built from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpandedGroup {
    /// The normalised symbol of the group.
    pub symbol: String,

    /// The Laue class.
    pub laue_class: LaueClass,

    /// The lattice centering.
    pub centering: Centering,

    /// The point group.
    pub point_group: PointGroup,

    /// The unique axis.
    pub unique_axis: UniqueAxis,

    /// Boolean indicating if the inversion was combined with the generators.
    pub inversion: bool,

    /// The number of generators.
    pub n_generators: usize,

    /// The centering translations.
    pub centering_vectors: Vec<Vector3<f64>>,

    /// The expanded operators.
    pub operators: Vec<ExpandedOperator>,
}

impl ExpandedGroup {
    /// Expands a descriptor.
    ///
    /// For every centering vector $`\mathbf{c}`$, every sign $`s`$ ($`+1`$, and $`-1`$ if the
    /// group is centrosymmetric) and every generator $`\{\mathbf{M}|\mathbf{T}\}`$, the operator
    /// $`\{s\mathbf{M}|s\mathbf{T} + \mathbf{c}\}`$ is formed and its translation folded into
    /// $`[0, 1)`$.
    ///
    /// # Panics
    ///
    /// Panics if the number of operators produced differs from
    /// [`GroupDescriptor::operator_count`].
    pub fn from_descriptor(descriptor: &GroupDescriptor) -> Self {
        let signs: &[bool] = if descriptor.inversion {
            &[false, true]
        } else {
            &[false]
        };
        let operators = descriptor
            .centering_vectors
            .iter()
            .enumerate()
            .cartesian_product(signs.iter())
            .cartesian_product(descriptor.generators.iter().enumerate())
            .map(|(((centering_index, cen), inverted), (generator_index, gen))| {
                let signed = if *inverted { gen.inverted() } else { gen.clone() };
                let shifted = SymmetryOperator::new(signed.rotation, signed.translation + cen);
                let (operator, cell_offset) = shifted.folded();
                let packed_id = pack_rotation(&operator.rotation);
                ExpandedOperator {
                    operator,
                    generator_index,
                    centering_index,
                    inverted: *inverted,
                    cell_offset,
                    packed_id,
                }
            })
            .collect_vec();
        assert_eq!(
            operators.len(),
            descriptor.operator_count(),
            "Unexpected number of operators after expanding `{}`.",
            descriptor.symbol
        );
        log::debug!(
            "Expanded `{}` into {} operators.",
            descriptor.symbol,
            operators.len()
        );
        Self {
            symbol: descriptor.symbol.clone(),
            laue_class: descriptor.laue_class,
            centering: descriptor.centering,
            point_group: descriptor.point_group,
            unique_axis: descriptor.unique_axis,
            inversion: descriptor.inversion,
            n_generators: descriptor.generators.len(),
            centering_vectors: descriptor.centering_vectors.clone(),
            operators,
        }
    }

    /// Returns the number of operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Checks if the group has no operators.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Returns the generator operators, *i.e.* the operators built with the origin centering
    /// vector and without the inversion.
    pub fn generators(&self) -> impl Iterator<Item = &ExpandedOperator> {
        self.operators
            .iter()
            .filter(|op| op.centering_index == 0 && !op.inverted)
    }

    /// Finds the operator equal to a given one modulo lattice translations.
    pub fn find(&self, operator: &SymmetryOperator, tol: f64) -> Option<usize> {
        self.operators
            .iter()
            .position(|op| op.operator.approx_eq_mod_lattice(operator, tol))
    }

    /// Checks if the operator list is closed under composition modulo lattice translations.
    pub fn is_closed(&self) -> bool {
        self.operators
            .iter()
            .cartesian_product(self.operators.iter())
            .all(|(a, b)| {
                let product = a.operator.compose(&b.operator);
                self.find(&product, CLOSURE_TOLERANCE).is_some()
            })
    }

    /// Returns the parts of the group that govern reflection enumeration.
    pub fn reflection_conditions(&self) -> ReflectionConditions {
        ReflectionConditions {
            laue_class: self.laue_class,
            centering: self.centering,
            unique_axis: self.unique_axis,
        }
    }

    /// Checks if every operator is distinct modulo lattice translations.
    pub fn is_duplicate_free(&self) -> bool {
        self.operators.iter().enumerate().all(|(i, a)| {
            self.operators[i + 1..]
                .iter()
                .all(|b| !a.operator.approx_eq_mod_lattice(&b.operator, CLOSURE_TOLERANCE))
        })
    }
}

impl fmt::Display for ExpandedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.operators.len().to_string().len();
        writeln!(f, "Operators of {} ({}):", self.symbol, self.operators.len())?;
        for (i, op) in self.operators.iter().enumerate() {
            writeln!(
                f,
                "  {:>width$}  {:<30} {:<10} {:>5}",
                i + 1,
                op.operator.to_xyz_string(),
                op.element().map_or("-", |element| element.name),
                op.signed_index(),
            )?;
        }
        Ok(())
    }
}
