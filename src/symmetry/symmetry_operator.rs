//! Crystallographic symmetry operators acting on fractional coordinates.

use std::fmt;
use std::ops::Mul;

use duplicate::duplicate_item;
use nalgebra::{Matrix3, Matrix4, RowVector3, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::auxiliary::misc::{fold_unit, lattice_distance, FRACTION_TOLERANCE};
use crate::symmetry::symmetry_operator_text::{format_operator_rows, AXES_3D, AXES_4D};

#[cfg(test)]
#[path = "symmetry_operator_tests.rs"]
mod symmetry_operator_tests;

// ==================
// Struct definitions
// ==================

/// A space-group operator $`\{\mathbf{R} | \mathbf{t}\}`$ acting on fractional coordinates as
/// $`\mathbf{x}' = \mathbf{R}\mathbf{x} + \mathbf{t}`$.
///
/// The rotation part holds small integers stored as floats and has determinant $`\pm 1`$.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymmetryOperator {
    /// The rotation part.
    pub rotation: Matrix3<f64>,

    /// The translation part, in fractions of the lattice vectors.
    pub translation: Vector3<f64>,
}

/// A (3+1)-dimensional superspace operator.
///
/// The rotation part has the block form
/// ```math
/// \begin{pmatrix} \mathbf{R} & \mathbf{0} \\ \mathbf{H} & \epsilon \end{pmatrix}
/// ```
/// where $`\mathbf{R}`$ is the three-dimensional rotation, $`\mathbf{H}`$ an integer row and
/// $`\epsilon = \pm 1`$ tells whether the modulation wave vector is kept or reversed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuperspaceOperator {
    /// The $`4 \times 4`$ rotation part.
    pub rotation: Matrix4<f64>,

    /// The translation part; the fourth component is the internal-space phase shift.
    pub translation: Vector4<f64>,
}

// =====================
// Trait implementations
// =====================

#[duplicate_item(
    [
        op_ [ SymmetryOperator ]
        mat_ [ Matrix3<f64> ]
        vec_ [ Vector3<f64> ]
        ivec_ [ Vector3<i32> ]
        axes_ [ AXES_3D ]
        dim_ [ 3 ]
    ]
    [
        op_ [ SuperspaceOperator ]
        mat_ [ Matrix4<f64> ]
        vec_ [ Vector4<f64> ]
        ivec_ [ Vector4<i32> ]
        axes_ [ AXES_4D ]
        dim_ [ 4 ]
    ]
)]
impl op_ {
    /// Constructs an operator from its rotation and translation parts.
    pub fn new(rotation: mat_, translation: vec_) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Returns the identity operator.
    pub fn identity() -> Self {
        Self::new(<mat_>::identity(), <vec_>::zeros())
    }

    /// Returns the determinant of the rotation part, rounded to an integer.
    pub fn determinant(&self) -> i32 {
        self.rotation.determinant().round() as i32
    }

    /// Checks if the rotation part is proper.
    pub fn is_proper(&self) -> bool {
        self.determinant() > 0
    }

    /// Checks if the operator is the identity modulo lattice translations.
    pub fn is_identity(&self) -> bool {
        self.approx_eq_mod_lattice(&Self::identity(), FRACTION_TOLERANCE)
    }

    /// Applies the operator to a fractional coordinate.
    pub fn apply(&self, x: &vec_) -> vec_ {
        self.rotation * x + self.translation
    }

    /// Composes two operators. The result applies `other` first, then `self`:
    /// $`\{\mathbf{R}_1|\mathbf{t}_1\}\{\mathbf{R}_2|\mathbf{t}_2\} =
    /// \{\mathbf{R}_1\mathbf{R}_2|\mathbf{R}_1\mathbf{t}_2 + \mathbf{t}_1\}`$.
    pub fn compose(&self, other: &Self) -> Self {
        Self::new(
            self.rotation * other.rotation,
            self.rotation * other.translation + self.translation,
        )
    }

    /// Returns the inverse operator $`\{\mathbf{R}^{-1}|-\mathbf{R}^{-1}\mathbf{t}\}`$, or `None`
    /// if the rotation part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let rinv = self.rotation.try_inverse()?.map(f64::round);
        let tinv = -(rinv * self.translation);
        Some(Self::new(rinv, tinv))
    }

    /// Folds the translation part into $`[0, 1)`$.
    ///
    /// # Returns
    ///
    /// The folded operator together with the integer lattice offset that was removed, such that
    /// the original translation equals the folded one plus the offset.
    pub fn folded(&self) -> (Self, ivec_) {
        let mut translation = <vec_>::zeros();
        let mut offset = <ivec_>::zeros();
        for i in 0..dim_ {
            let (frac, cell) = fold_unit(self.translation[i], FRACTION_TOLERANCE);
            translation[i] = frac;
            offset[i] = cell;
        }
        (Self::new(self.rotation, translation), offset)
    }

    /// Checks if two operators have the same rotation part.
    pub fn same_rotation(&self, other: &Self, tol: f64) -> bool {
        (self.rotation - other.rotation).amax() < tol
    }

    /// Checks if two operators are equal modulo lattice translations.
    pub fn approx_eq_mod_lattice(&self, other: &Self, tol: f64) -> bool {
        self.same_rotation(other, tol)
            && self
                .translation
                .iter()
                .zip(other.translation.iter())
                .all(|(a, b)| lattice_distance(*a, *b) < tol)
    }

    /// Returns the operator in the conventional comma-separated coordinate-triplet notation,
    /// *e.g.* `-y, x-y, z+1/3`.
    pub fn to_xyz_string(&self) -> String {
        format_operator_rows(
            (0..dim_).map(|i| {
                (
                    (0..dim_).map(|j| self.rotation[(i, j)]).collect::<Vec<_>>(),
                    self.translation[i],
                )
            }),
            &axes_,
        )
    }
}

#[duplicate_item(
    [ op_ [ SymmetryOperator ] ]
    [ op_ [ SuperspaceOperator ] ]
)]
impl Mul<&'_ op_> for &op_ {
    type Output = op_;

    fn mul(self, rhs: &op_) -> Self::Output {
        self.compose(rhs)
    }
}

#[duplicate_item(
    [ op_ [ SymmetryOperator ] ]
    [ op_ [ SuperspaceOperator ] ]
)]
impl fmt::Display for op_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_xyz_string())
    }
}

// ===============================
// Superspace-specific behaviours
// ===============================

impl SuperspaceOperator {
    /// Lifts a three-dimensional operator into superspace.
    ///
    /// # Arguments
    ///
    /// * `op` - The three-dimensional operator $`\{\mathbf{R}|\mathbf{t}\}`$.
    /// * `h_row` - The integer row $`\mathbf{H}`$ in the bottom-left block.
    /// * `epsilon` - The bottom-right entry, $`\pm 1`$.
    /// * `tau` - The internal-space translation $`\tau_4`$.
    pub fn from_spatial(
        op: &SymmetryOperator,
        h_row: &RowVector3<f64>,
        epsilon: f64,
        tau: f64,
    ) -> Self {
        let mut rotation = Matrix4::<f64>::zeros();
        rotation.fixed_view_mut::<3, 3>(0, 0).copy_from(&op.rotation);
        rotation.fixed_view_mut::<1, 3>(3, 0).copy_from(h_row);
        rotation[(3, 3)] = epsilon;
        let translation = Vector4::new(
            op.translation[0],
            op.translation[1],
            op.translation[2],
            tau,
        );
        Self::new(rotation, translation)
    }

    /// Returns the three-dimensional operator obtained by dropping the internal coordinate.
    pub fn spatial_part(&self) -> SymmetryOperator {
        SymmetryOperator::new(
            self.rotation.fixed_view::<3, 3>(0, 0).into_owned(),
            self.translation.fixed_rows::<3>(0).into_owned(),
        )
    }

    /// Returns the bottom-left integer row $`\mathbf{H}`$.
    pub fn h_row(&self) -> RowVector3<f64> {
        self.rotation.fixed_view::<1, 3>(3, 0).into_owned()
    }

    /// Returns the bottom-right entry $`\epsilon`$.
    pub fn epsilon(&self) -> f64 {
        self.rotation[(3, 3)]
    }

    /// Returns the internal-space translation $`\tau_4`$.
    pub fn tau(&self) -> f64 {
        self.translation[3]
    }
}

impl SymmetryOperator {
    /// Returns the operator $`\{-\mathbf{R}|-\mathbf{t}\}`$, the product with the inversion
    /// through the origin.
    pub fn inverted(&self) -> Self {
        Self::new(-self.rotation, -self.translation)
    }

    /// Checks if the operator maps a position onto itself modulo lattice translations.
    pub fn fixes(&self, x: &Vector3<f64>, tol: f64) -> bool {
        let y = self.apply(x);
        (0..3).all(|i| lattice_distance(y[i], x[i]) < tol)
    }
}
