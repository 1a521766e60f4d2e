//! Unit-cell and metric-tensor arithmetic.
//!
//! The reciprocal metric is carried as the six-element A-tensor
//! $`(G^*_{11}, G^*_{22}, G^*_{33}, 2G^*_{12}, 2G^*_{13}, 2G^*_{23})`$ so that
//! $`1/d^2 = A_0h^2 + A_1k^2 + A_2l^2 + A_3hk + A_4hl + A_5kl`$.

use std::fmt;

use approx::relative_eq;
use log;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::symmetry::SymmetryError;

#[cfg(test)]
#[path = "lattice_tests.rs"]
mod lattice_tests;

/// The six independent elements of the reciprocal metric tensor.
pub type ATensor = [f64; 6];

/// A unit cell given by its edge lengths (Å) and interaxial angles (degrees).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitCell {
    /// The edge lengths $`(a, b, c)`$.
    pub lengths: [f64; 3],

    /// The angles $`(\alpha, \beta, \gamma)`$ in degrees.
    pub angles: [f64; 3],
}

impl UnitCell {
    /// Constructs and validates a unit cell.
    ///
    /// # Errors
    ///
    /// Errors if an edge length is not positive, an angle lies outside $`(0°, 180°)`$, or the
    /// angles do not span a three-dimensional cell.
    pub fn new(lengths: [f64; 3], angles: [f64; 3]) -> Result<Self, SymmetryError> {
        if lengths.iter().any(|&x| !(x > 0.0) || !x.is_finite()) {
            return Err(SymmetryError::InvalidCell(format!(
                "edge lengths {lengths:?} must be positive"
            )));
        }
        if angles.iter().any(|&x| !(x > 0.0 && x < 180.0)) {
            return Err(SymmetryError::InvalidCell(format!(
                "angles {angles:?} must lie strictly between 0 and 180 degrees"
            )));
        }
        let cell = Self { lengths, angles };
        let det = cell.direct_metric().determinant();
        if !(det > 0.0) {
            return Err(SymmetryError::InvalidCell(format!(
                "angles {angles:?} do not span a cell (metric determinant {det:.3e})"
            )));
        }
        Ok(cell)
    }

    /// Constructs a cubic cell of edge `a`.
    pub fn cubic(a: f64) -> Result<Self, SymmetryError> {
        Self::new([a; 3], [90.0; 3])
    }

    /// Returns the direct metric tensor $`\mathbf{G}`$.
    pub fn direct_metric(&self) -> Matrix3<f64> {
        let [a, b, c] = self.lengths;
        let [ca, cb, cg] = self.angles.map(|x| x.to_radians().cos());
        Matrix3::new(
            a * a,
            a * b * cg,
            a * c * cb,
            a * b * cg,
            b * b,
            b * c * ca,
            a * c * cb,
            b * c * ca,
            c * c,
        )
    }

    /// Returns the cell volume in Å³.
    pub fn volume(&self) -> f64 {
        self.direct_metric().determinant().sqrt()
    }

    /// Returns the A-tensor of this cell.
    pub fn to_a_tensor(&self) -> Result<ATensor, SymmetryError> {
        let g = self
            .direct_metric()
            .try_inverse()
            .ok_or_else(|| SymmetryError::InvalidCell(format!("singular metric for {self}")))?;
        Ok([
            g[(0, 0)],
            g[(1, 1)],
            g[(2, 2)],
            2.0 * g[(0, 1)],
            2.0 * g[(0, 2)],
            2.0 * g[(1, 2)],
        ])
    }

    /// Builds the unit cell described by an A-tensor.
    pub fn from_a_tensor(a: &ATensor) -> Result<Self, SymmetryError> {
        let g = reciprocal_metric(a).try_inverse().ok_or_else(|| {
            SymmetryError::InvalidCell(format!("singular reciprocal metric {a:?}"))
        })?;
        if (0..3).any(|i| !(g[(i, i)] > 0.0)) {
            return Err(SymmetryError::InvalidCell(format!(
                "A-tensor {a:?} is not positive definite"
            )));
        }
        let lengths = [g[(0, 0)].sqrt(), g[(1, 1)].sqrt(), g[(2, 2)].sqrt()];
        let angle = |i: usize, j: usize| {
            (g[(i, j)] / (lengths[i] * lengths[j]))
                .clamp(-1.0, 1.0)
                .acos()
                .to_degrees()
        };
        Self::new(lengths, [angle(1, 2), angle(0, 2), angle(0, 1)])
    }

    /// Returns the maximum index along each reciprocal axis for a resolution limit, *i.e.*
    /// $`\mathrm{round}(a_i / d_\mathrm{min})`$.
    pub fn max_indices(&self, dmin: f64) -> [i32; 3] {
        self.lengths.map(|x| (x / dmin).round() as i32)
    }

    /// Converts a rhombohedral cell ($`a = b = c`$, $`\alpha = \beta = \gamma`$) to the obverse
    /// hexagonal setting.
    pub fn rhombohedral_to_hexagonal(&self) -> Result<Self, SymmetryError> {
        let ar = self.lengths[0];
        let alpha = self.angles[0];
        if !(relative_eq!(self.lengths[1], ar, max_relative = 1e-6)
            && relative_eq!(self.lengths[2], ar, max_relative = 1e-6)
            && relative_eq!(self.angles[1], alpha, max_relative = 1e-6)
            && relative_eq!(self.angles[2], alpha, max_relative = 1e-6))
        {
            return Err(SymmetryError::InvalidCell(format!("{self} is not rhombohedral")));
        }
        let ah = 2.0 * ar * (alpha.to_radians() / 2.0).sin();
        let ch = ar * (3.0 * (1.0 + 2.0 * alpha.to_radians().cos())).sqrt();
        log::debug!("Rhombohedral cell {self} has hexagonal axes a = {ah:.5}, c = {ch:.5}.");
        Self::new([ah, ah, ch], [90.0, 90.0, 120.0])
    }

    /// Converts an obverse hexagonal cell to the primitive rhombohedral setting.
    pub fn hexagonal_to_rhombohedral(&self) -> Result<Self, SymmetryError> {
        let [ah, bh, ch] = self.lengths;
        if !relative_eq!(ah, bh, max_relative = 1e-6)
            || !relative_eq!(self.angles[2], 120.0, epsilon = 1e-6)
        {
            return Err(SymmetryError::InvalidCell(format!("{self} is not hexagonal")));
        }
        let ar = (3.0 * ah * ah + ch * ch).sqrt() / 3.0;
        let alpha = (2.0 * (ah / (2.0 * ar)).asin()).to_degrees();
        Self::new([ar; 3], [alpha; 3])
    }
}

impl fmt::Display for UnitCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.4}, {:.4}, {:.4}, {:.3}, {:.3}, {:.3})",
            self.lengths[0],
            self.lengths[1],
            self.lengths[2],
            self.angles[0],
            self.angles[1],
            self.angles[2]
        )
    }
}

/// Returns the reciprocal metric tensor $`\mathbf{G}^*`$ of an A-tensor.
pub fn reciprocal_metric(a: &ATensor) -> Matrix3<f64> {
    Matrix3::new(
        a[0],
        a[3] / 2.0,
        a[4] / 2.0,
        a[3] / 2.0,
        a[1],
        a[5] / 2.0,
        a[4] / 2.0,
        a[5] / 2.0,
        a[2],
    )
}

/// Returns $`1/d^2`$ for a reflection.
pub fn inverse_d_squared(hkl: &[i32; 3], a: &ATensor) -> f64 {
    let [h, k, l] = hkl.map(f64::from);
    h * h * a[0] + k * k * a[1] + l * l * a[2] + h * k * a[3] + h * l * a[4] + k * l * a[5]
}

/// Returns $`1/d^2`$ for a general reciprocal vector, such as a satellite
/// $`\mathbf{H} + m\mathbf{q}`$.
pub fn inverse_d_squared_vector(h: &Vector3<f64>, a: &ATensor) -> f64 {
    (h.transpose() * reciprocal_metric(a) * h)[(0, 0)]
}

/// Converts hexagonal (obverse) reflection indices to rhombohedral ones.
///
/// # Returns
///
/// The rhombohedral indices with a nonnegative first index, or `None` if $`-h + k + l`$ is not
/// a multiple of three.
pub fn hexagonal_to_rhombohedral_indices(hkl: &[i32; 3]) -> Option<[i32; 3]> {
    let [h, k, l] = *hkl;
    let itk = -h + k + l;
    if itk.rem_euclid(3) != 0 {
        return None;
    }
    let k_r = itk / 3;
    let rh = [k_r + h, k_r, k_r - k];
    if rh[0] < 0 {
        Some(rh.map(|x| -x))
    } else {
        Some(rh)
    }
}

/// Converts rhombohedral reflection indices to hexagonal (obverse) ones.
pub fn rhombohedral_to_hexagonal_indices(hkl: &[i32; 3]) -> [i32; 3] {
    let [h, k, l] = *hkl;
    [h - k, k - l, h + k + l]
}
