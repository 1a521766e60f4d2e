//! Enumeration of symmetry-unique reflections.
//!
//! Reflections are generated inside an asymmetric domain of reciprocal space chosen by the Laue
//! class, filtered by lattice centering and resolution, and sorted by descending d-spacing.
//! Optional space-group and superspace-group absence tests remove further systematically absent
//! reflections.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use derive_builder::Builder;
use log;
use nalgebra::{RowVector4, Vector3};
use serde::{Deserialize, Serialize};

use crate::auxiliary::lattice::{
    hexagonal_to_rhombohedral_indices, inverse_d_squared, inverse_d_squared_vector, ATensor,
    UnitCell,
};
use crate::auxiliary::misc::is_integral;
use crate::group::descriptor::ReflectionConditions;
use crate::group::expansion::ExpandedGroup;
use crate::group::group_classes::{LaueClass, UniqueAxis};
use crate::superspace::superspace_group::SuperspaceGroupDescriptor;
use crate::symmetry::SymmetryError;


const PHASE_TOLERANCE: f64 = 1.0e-4;

/// Relative slack on the resolution limit, absorbing rounding in the A-tensor.
const DMIN_SLACK: f64 = 1.0e-10;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for reflection enumeration.
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReflectionParams {
    /// The resolution limit $`d_\mathrm{min}`$ in Å.
    pub dmin: f64,

    /// Boolean indicating if reflections with the same d-spacing as an earlier one are to be
    /// dropped.
    #[builder(default = "false")]
    pub suppress_equal_d: bool,

    /// Boolean indicating if the list is to be returned in ascending d-spacing order.
    #[builder(default = "false")]
    pub reverse: bool,

    /// Tolerance for two d-spacings to be considered equal.
    #[builder(default = "1.0e-5")]
    pub tolerance: f64,
}

impl ReflectionParams {
    /// Returns a builder to construct a [`ReflectionParams`] structure.
    pub fn builder() -> ReflectionParamsBuilder {
        ReflectionParamsBuilder::default()
    }
}

/// A structure containing control parameters for satellite reflections.
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct SatelliteParams {
    /// The modulation wave vector $`\mathbf{q}`$ in reciprocal lattice units.
    pub modulation_vector: [f64; 3],

    /// The largest satellite order $`|m|`$.
    #[builder(default = "1")]
    pub max_order: u32,
}

impl SatelliteParams {
    /// Returns a builder to construct a [`SatelliteParams`] structure.
    pub fn builder() -> SatelliteParamsBuilder {
        SatelliteParamsBuilder::default()
    }
}

// ------
// Record
// ------

/// A reflection together with its d-spacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReflectionRecord {
    /// The Miller indices.
    pub hkl: [i32; 3],

    /// The d-spacing in Å.
    pub d: f64,

    /// Boolean indicating if later reflections with the same d-spacing were dropped in favour of
    /// this one.
    pub duplicate_suppressed: bool,

    /// The satellite order, for superspace reflections.
    pub m: Option<i32>,
}

impl ReflectionRecord {
    fn new(hkl: [i32; 3], d: f64) -> Self {
        Self {
            hkl,
            d,
            duplicate_suppressed: false,
            m: None,
        }
    }

    fn sort_key(&self) -> (i32, i32, i32, i32) {
        (self.hkl[0], self.hkl[1], self.hkl[2], self.m.unwrap_or(0))
    }
}

impl fmt::Display for ReflectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [h, k, l] = self.hkl;
        match self.m {
            Some(m) => write!(f, "{h:>4} {k:>4} {l:>4} {m:>4}  {:>10.5}", self.d)?,
            None => write!(f, "{h:>4} {k:>4} {l:>4}  {:>10.5}", self.d)?,
        }
        if self.duplicate_suppressed {
            write!(f, "  *")?;
        }
        Ok(())
    }
}

// ========================
// Laue asymmetric domains
// ========================

/// Cyclically permutes indices so that the monoclinic unique axis comes first (`forward`) or
/// undoes that permutation.
fn cycle_unique_axis(unique_axis: UniqueAxis, hkl: [i32; 3], forward: bool) -> [i32; 3] {
    let [a, b, c] = hkl;
    match (unique_axis, forward) {
        (UniqueAxis::A, _) => hkl,
        (UniqueAxis::B | UniqueAxis::None, true) | (UniqueAxis::C, false) => [b, c, a],
        (UniqueAxis::B | UniqueAxis::None, false) | (UniqueAxis::C, true) => [c, a, b],
    }
}

/// Generates the candidate indices of the asymmetric domain of a Laue class.
///
/// # Arguments
///
/// * `laue_class` - The Laue class.
/// * `unique_axis` - The unique axis, used by $`2/m`$.
/// * `hmax` - The largest index along each axis (hexagonal axes for rhombohedral classes).
///
/// # Returns
///
/// The candidate indices, before any centering or resolution test.
fn laue_domain(laue_class: LaueClass, unique_axis: UniqueAxis, hmax: [i32; 3]) -> Vec<[i32; 3]> {
    let mut hkls = vec![];
    match laue_class {
        LaueClass::Bar1 => {
            for l in -hmax[2]..=hmax[2] {
                for k in -hmax[1]..=hmax[1] {
                    let hmin = if k < 0 || (k == 0 && l < 0) { 1 } else { 0 };
                    for h in hmin..=hmax[0] {
                        hkls.push([h, k, l]);
                    }
                }
            }
        }
        LaueClass::TwoOverM => {
            let smax = cycle_unique_axis(unique_axis, hmax, true);
            for h in 0..=smax[0] {
                for k in -smax[1]..=smax[1] {
                    let lmin = if k < 0 { 1 } else { 0 };
                    for l in lmin..=smax[2] {
                        hkls.push(cycle_unique_axis(unique_axis, [h, k, l], false));
                    }
                }
            }
        }
        LaueClass::Mmm | LaueClass::FourOverM | LaueClass::SixOverM => {
            for l in 0..=hmax[2] {
                for h in 0..=hmax[0] {
                    let kmin = if laue_class == LaueClass::Mmm || h == 0 { 0 } else { 1 };
                    for k in kmin..=hmax[1] {
                        hkls.push([h, k, l]);
                    }
                }
            }
        }
        LaueClass::FourOverMmm | LaueClass::SixOverMmm => {
            for l in 0..=hmax[2] {
                for h in 0..=hmax[0] {
                    for k in 0..=h.min(hmax[1]) {
                        hkls.push([h, k, l]);
                    }
                }
            }
        }
        LaueClass::Three
        | LaueClass::ThreeR
        | LaueClass::ThreeM1
        | LaueClass::ThreeMR
        | LaueClass::Three1M => {
            for l in -hmax[2]..=hmax[2] {
                let hmin = if l < 0 { 1 } else { 0 };
                for h in hmin..=hmax[0] {
                    let (kmin, kmax) = match laue_class {
                        LaueClass::Three | LaueClass::ThreeR => (-((h - 1) / 2), h),
                        LaueClass::ThreeM1 | LaueClass::ThreeMR if l < 0 => (0, h - 1),
                        LaueClass::Three1M if l < 0 => (1, h),
                        _ => (0, h),
                    };
                    for k in kmin..=kmax.min(hmax[1]) {
                        hkls.push([h, k, l]);
                    }
                }
            }
        }
        LaueClass::M3 | LaueClass::M3m => {
            for h in 0..=hmax[0] {
                for k in 0..=h {
                    let lmax = match laue_class {
                        LaueClass::M3 if h == k => h,
                        LaueClass::M3 => h - 1,
                        _ => k,
                    };
                    for l in 0..=lmax {
                        hkls.push([h, k, l]);
                    }
                }
            }
        }
    }
    hkls
}

// ===========
// Enumeration
// ===========

/// Sorts reflections by descending d-spacing, then descending indices, and applies equal-d
/// suppression and reversal.
fn finalise(
    mut records: Vec<ReflectionRecord>,
    params: &ReflectionParams,
) -> Vec<ReflectionRecord> {
    records.sort_by(|a, b| {
        b.d.partial_cmp(&a.d)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.sort_key().cmp(&a.sort_key()))
    });
    if params.suppress_equal_d {
        let mut kept: Vec<ReflectionRecord> = Vec::with_capacity(records.len());
        for record in records {
            match kept.last_mut() {
                Some(last) if (last.d - record.d).abs() < params.tolerance => {
                    last.duplicate_suppressed = true;
                }
                _ => kept.push(record),
            }
        }
        records = kept;
    }
    if params.reverse {
        records.reverse();
    }
    records
}

fn check_dmin(dmin: f64) -> Result<(), SymmetryError> {
    if dmin > 0.0 && dmin.is_finite() {
        Ok(())
    } else {
        Err(SymmetryError::InvalidCell(format!(
            "resolution limit {dmin} must be positive"
        )))
    }
}

/// Generates the reflections of the asymmetric domain allowed by lattice centering, without
/// sorting.
fn generate_reflections(
    conditions: &ReflectionConditions,
    a: &ATensor,
    dmin: f64,
) -> Result<Vec<ReflectionRecord>, SymmetryError> {
    check_dmin(dmin)?;
    let cell = UnitCell::from_a_tensor(a)?;
    let rhombohedral = conditions.laue_class.uses_rhombohedral_axes();
    let hmax = if rhombohedral {
        cell.rhombohedral_to_hexagonal()?.max_indices(dmin)
    } else {
        cell.max_indices(dmin)
    };
    let limit = (1.0 + DMIN_SLACK) / (dmin * dmin);
    let records = laue_domain(conditions.laue_class, conditions.unique_axis, hmax)
        .into_iter()
        .filter_map(|hkl| {
            let hkl = if rhombohedral {
                // Obverse condition -h + k + l = 3n.
                hexagonal_to_rhombohedral_indices(&hkl)?
            } else {
                if !conditions.centering.allows_reflection(&hkl) {
                    return None;
                }
                hkl
            };
            let rdsq = inverse_d_squared(&hkl, a);
            (rdsq > 0.0 && rdsq <= limit).then(|| ReflectionRecord::new(hkl, 1.0 / rdsq.sqrt()))
        })
        .collect::<Vec<_>>();
    log::debug!(
        "Generated {} reflections for Laue class {} with centering {}, dmin = {dmin}.",
        records.len(),
        conditions.laue_class,
        conditions.centering
    );
    Ok(records)
}

/// Enumerates the symmetry-unique reflections of a Laue class and lattice centering.
///
/// # Arguments
///
/// * `conditions` - The Laue class, centering and unique axis.
/// * `a` - The A-tensor of the cell.
/// * `params` - The enumeration parameters.
///
/// # Returns
///
/// The reflections with $`0 < 1/d^2 \le 1/d_\mathrm{min}^2`$, sorted by descending d-spacing with
/// ties broken by descending $`(h, k, l)`$. Rhombohedral-axis Laue classes give rhombohedral
/// indices. The list may be empty.
///
/// # Errors
///
/// Errors with [`SymmetryError::InvalidCell`] if the A-tensor does not describe a cell, the cell
/// is not rhombohedral for a rhombohedral-axis Laue class, or `dmin` is not positive.
pub fn enumerate_reflections(
    conditions: &ReflectionConditions,
    a: &ATensor,
    params: &ReflectionParams,
) -> Result<Vec<ReflectionRecord>, SymmetryError> {
    let records = generate_reflections(conditions, a, params.dmin)?;
    Ok(finalise(records, params))
}

/// Checks if a reflection is systematically absent in a space group: some operator
/// $`\{\mathbf{R}|\mathbf{t}\}`$ has $`\mathbf{h}\mathbf{R} = \mathbf{h}`$ while
/// $`\mathbf{h}\cdot\mathbf{t}`$ is not an integer.
pub fn is_systematically_absent(hkl: &[i32; 3], group: &ExpandedGroup) -> bool {
    let h = Vector3::from_fn(|i, _| f64::from(hkl[i]));
    group.operators.iter().any(|op| {
        let image = op.operator.rotation.transpose() * h;
        (image - h).amax() < PHASE_TOLERANCE
            && !is_integral(h.dot(&op.operator.translation), PHASE_TOLERANCE)
    })
}

/// Enumerates the symmetry-unique reflections of a space group, removing those made absent by
/// glide planes and screw axes as well as by centering.
///
/// # Errors
///
/// As for [`enumerate_reflections`].
pub fn enumerate_allowed_reflections(
    group: &ExpandedGroup,
    a: &ATensor,
    params: &ReflectionParams,
) -> Result<Vec<ReflectionRecord>, SymmetryError> {
    let records = generate_reflections(&group.reflection_conditions(), a, params.dmin)?
        .into_iter()
        .filter(|record| !is_systematically_absent(&record.hkl, group))
        .collect();
    Ok(finalise(records, params))
}

/// Enumerates main and satellite reflections $`\mathbf{h} + m\mathbf{q}`$ for a modulated
/// structure.
///
/// Parents are taken from the asymmetric domain, together with the origin, out to the widened
/// limit $`1/d_\mathrm{vec} = m_\mathrm{max}|\mathbf{q}^*| + 1/d_\mathrm{min}`$, so that a
/// satellite inside the resolution limit is found even when its parent lies beyond it. Each
/// parent is combined with every order $`|m| \le m_\mathrm{max}`$ and every satellite is then
/// filtered by its own d-spacing. Reflections absent in the superspace group, if one is given, are
/// dropped.
///
/// Symmetry-equivalent index vectors $`(h, k, l, m)`$ are reduced to one: under the operators
/// of the superspace group and the inversion if a group is given, and under the inversion
/// alone otherwise. Positive satellite orders are preferred as representatives, so an operator
/// with $`\mathbf{h}\mathbf{R} + m\mathbf{H} = \mathbf{h}`$ and $`\epsilon = -1`$ leaves only
/// $`m > 0`$.
///
/// # Arguments
///
/// * `conditions` - The Laue class, centering and unique axis.
/// * `a` - The A-tensor of the cell.
/// * `params` - The enumeration parameters.
/// * `satellites` - The modulation wave vector and the largest satellite order.
/// * `group` - An optional superspace group for the absence test and the reduction.
///
/// # Errors
///
/// As for [`enumerate_reflections`].
pub fn enumerate_superspace_reflections(
    conditions: &ReflectionConditions,
    a: &ATensor,
    params: &ReflectionParams,
    satellites: &SatelliteParams,
    group: Option<&SuperspaceGroupDescriptor>,
) -> Result<Vec<ReflectionRecord>, SymmetryError> {
    check_dmin(params.dmin)?;
    let limit = (1.0 + DMIN_SLACK) / (params.dmin * params.dmin);
    let q = Vector3::from(satellites.modulation_vector);
    let max_m = satellites.max_order as i32;
    let q_star = inverse_d_squared_vector(&q, a).max(0.0).sqrt();
    let dvec = 1.0 / (f64::from(max_m) * q_star + 1.0 / params.dmin);
    let parents = std::iter::once([0, 0, 0])
        .chain(
            generate_reflections(conditions, a, dvec)?
                .into_iter()
                .map(|record| record.hkl),
        )
        .collect::<Vec<_>>();

    let point_operators = group.map_or_else(Vec::new, |g| {
        g.operators
            .iter()
            .map(|op| op.rotation.map(|x| x.round() as i32))
            .collect::<Vec<_>>()
    });
    let orbit = |hklm: &[i32; 4]| {
        let h = RowVector4::from_fn(|_, j| hklm[j]);
        let mut images = point_operators
            .iter()
            .map(|w| h * w)
            .chain(std::iter::once(h))
            .flat_map(|image| [image, -image])
            .map(|image| [image[0], image[1], image[2], image[3]])
            .collect::<Vec<_>>();
        images.sort_unstable();
        images.dedup();
        images
    };

    // Non-negative orders first, so that an orbit is represented by a positive order if it has
    // one among the candidates.
    let orders = (0..=max_m).chain((1..=max_m).map(|m| -m)).collect::<Vec<_>>();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(parents.len() * orders.len());
    for &m in orders.iter() {
        for hkl in parents.iter() {
            let hklm = [hkl[0], hkl[1], hkl[2], m];
            if seen.contains(&hklm) {
                continue;
            }
            let h = Vector3::from_fn(|i, _| f64::from(hkl[i]));
            let rdsq = inverse_d_squared_vector(&(h + q * f64::from(m)), a);
            if !(rdsq > 0.0 && rdsq <= limit) {
                continue;
            }
            seen.extend(orbit(&hklm));
            if group.is_some_and(|g| g.is_systematically_absent(&hklm)) {
                continue;
            }
            records.push(ReflectionRecord {
                hkl: *hkl,
                d: 1.0 / rdsq.sqrt(),
                duplicate_suppressed: false,
                m: Some(m),
            });
        }
    }
    log::debug!(
        "Generated {} main and satellite reflections up to order {max_m} from {} parents with \
        d >= {dvec:.4}.",
        records.len(),
        parents.len()
    );
    Ok(finalise(records, params))
}
