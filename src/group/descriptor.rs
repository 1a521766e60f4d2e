//! Space-group descriptors built from resolver output.

use std::fmt;

use itertools::Itertools;
use log;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::group::group_classes::{Centering, LaueClass, PointGroup, PolarAxis, UniqueAxis};
use crate::group::resolver::{normalise_symbol, ResolvedSymbol, SymbolResolver};
use crate::symmetry::rotation_table::lookup_rotation;
use crate::symmetry::symmetry_operator::SymmetryOperator;
use crate::symmetry::{SymbolDiagnostic, SymmetryError};

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod descriptor_tests;

/// The largest number of generator matrices a resolver may return.
pub const MAX_GENERATORS: usize = 24;

// ==================
// Struct definitions
// ==================

/// A structure describing a space group by its classification and generator operators.
///
/// The generator operators exclude the inversion and the centering translations, which are
/// recorded separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    /// The normalised symbol.
    pub symbol: String,

    /// The setting suffix, if any.
    pub setting: Option<String>,

    /// Boolean indicating if the group is a grey group (`1'` marker).
    pub gray: bool,

    /// The Laue class.
    pub laue_class: LaueClass,

    /// The lattice centering.
    pub centering: Centering,

    /// The centering translations, the origin first.
    pub centering_vectors: Vec<Vector3<f64>>,

    /// Boolean indicating if the inversion is to be combined with the generators.
    pub inversion: bool,

    /// The unique axis of monoclinic groups.
    pub unique_axis: UniqueAxis,

    /// The point group.
    pub point_group: PointGroup,

    /// The default superspace $`\epsilon`$ values for the symmetry directions of the point-group
    /// symbol.
    pub kl: Vec<i8>,

    /// The polar directions. Empty for centrosymmetric groups.
    pub polar_axes: Vec<PolarAxis>,

    /// The generator operators.
    pub generators: Vec<SymmetryOperator>,
}

/// The parts of a group descriptor that govern reflection enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionConditions {
    pub laue_class: LaueClass,
    pub centering: Centering,
    pub unique_axis: UniqueAxis,
}

impl GroupDescriptor {
    /// Resolves a symbol with an external resolver and builds its descriptor.
    pub fn resolve<R: SymbolResolver + ?Sized>(
        symbol: &str,
        resolver: &R,
    ) -> Result<Self, SymmetryError> {
        let normalised = normalise_symbol(symbol);
        let resolved = resolver.resolve(&normalised);
        Self::from_resolved(symbol, &resolved)
    }

    /// Builds a descriptor from a symbol and the resolver output for it.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The symbol as written by the user.
    /// * `resolved` - The resolver output for the symbol.
    ///
    /// # Returns
    ///
    /// The descriptor, or a symbol error if the resolver reported an error or returned
    /// inconsistent data.
    pub fn from_resolved(symbol: &str, resolved: &ResolvedSymbol) -> Result<Self, SymmetryError> {
        let normalised = normalise_symbol(symbol);
        if resolved.error_code != 0 {
            log::debug!(
                "Resolver rejected `{}` with code {}.",
                normalised.symbol,
                resolved.error_code
            );
            return Err(SymbolDiagnostic::Resolver(resolved.error_code).into());
        }

        let malformed = |msg: String| SymmetryError::Symbol(SymbolDiagnostic::MalformedOutput(msg));
        let laue_class = LaueClass::from_index(resolved.laue_index).ok_or_else(|| {
            malformed(format!("Laue index {} out of range", resolved.laue_index))
        })?;
        let centering = Centering::from_index(resolved.centering_index).ok_or_else(|| {
            malformed(format!(
                "centering index {} out of range",
                resolved.centering_index
            ))
        })?;
        let unique_axis = UniqueAxis::from_index(resolved.unique_axis_index);

        if resolved.n_ops == 0
            || resolved.n_ops != resolved.rotations.len()
            || resolved.n_ops != resolved.translations.len()
        {
            return Err(malformed(format!(
                "{} operators announced but {} rotations and {} translations given",
                resolved.n_ops,
                resolved.rotations.len(),
                resolved.translations.len()
            )));
        }
        if resolved.n_ops > MAX_GENERATORS {
            return Err(SymbolDiagnostic::Resolver(15).into());
        }

        let generators = resolved
            .rotations
            .iter()
            .zip(resolved.translations.iter())
            .map(|(rot, trans)| {
                let rotation = Matrix3::from_fn(|i, j| rot[i][j]);
                if rotation.iter().any(|m| (m - m.round()).abs() > 1e-6) {
                    return Err(malformed(format!("non-integral rotation {rot:?}")));
                }
                let op = SymmetryOperator::new(rotation, Vector3::from_fn(|i, _| trans[i]));
                if op.determinant().abs() != 1 {
                    return Err(malformed(format!(
                        "rotation of operator `{op}` has determinant {}",
                        op.determinant()
                    )));
                }
                Ok(op)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if !generators[0].is_identity() {
            return Err(malformed(format!(
                "first generator `{}` is not the identity",
                generators[0]
            )));
        }

        let polar_axes = polar_axes(&generators, resolved.inversion);
        let point_group = point_group_from_symbol(laue_class, &normalised.fields())
            .unwrap_or_else(|| {
                log::debug!(
                    "Point group of `{}` deduced from its operators.",
                    normalised.symbol
                );
                point_group_from_operators(
                    laue_class,
                    &generators,
                    resolved.inversion,
                    &polar_axes,
                )
            });

        let descriptor = Self {
            symbol: normalised.symbol,
            setting: normalised.setting,
            gray: normalised.gray,
            laue_class,
            centering,
            centering_vectors: centering.vectors(),
            inversion: resolved.inversion,
            unique_axis,
            point_group,
            kl: point_group.default_kl().to_vec(),
            polar_axes,
            generators,
        };
        log::debug!(
            "Built descriptor for `{}`: Laue class {}, point group {}, {} operators.",
            descriptor.symbol,
            descriptor.laue_class,
            descriptor.point_group,
            descriptor.operator_count()
        );
        Ok(descriptor)
    }

    /// Returns the number of operators in the full group: generators × centerings × (1 or 2).
    pub fn operator_count(&self) -> usize {
        self.generators.len() * self.centering_vectors.len() * if self.inversion { 2 } else { 1 }
    }

    /// Returns the reflection conditions of the group.
    pub fn reflection_conditions(&self) -> ReflectionConditions {
        ReflectionConditions {
            laue_class: self.laue_class,
            centering: self.centering,
            unique_axis: self.unique_axis,
        }
    }

    /// Returns the key under which this descriptor is cached.
    pub fn key(&self) -> String {
        let key = match self.setting.as_ref() {
            Some(setting) => format!("{}:{setting}", self.symbol),
            None => self.symbol.clone(),
        };
        if self.gray {
            format!("{key} 1'")
        } else {
            key
        }
    }
}

impl fmt::Display for GroupDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Space group: {}{}{}",
            self.symbol,
            self.setting
                .as_ref()
                .map(|s| format!(" (setting {s})"))
                .unwrap_or_default(),
            if self.gray { " 1'" } else { "" }
        )?;
        writeln!(
            f,
            "  Laue class: {} ({})",
            self.laue_class,
            self.laue_class.crystal_system()
        )?;
        writeln!(f, "  Point group: {}", self.point_group)?;
        writeln!(f, "  Lattice centering: {}", self.centering)?;
        writeln!(
            f,
            "  Centrosymmetric: {}",
            if self.inversion { "yes" } else { "no" }
        )?;
        if self.unique_axis != UniqueAxis::None {
            writeln!(f, "  Unique axis: {}", self.unique_axis.letter())?;
        }
        writeln!(
            f,
            "  Polar axes: {}",
            if self.polar_axes.is_empty() {
                "none".to_string()
            } else {
                self.polar_axes.iter().join(", ")
            }
        )?;
        writeln!(f, "  Number of operators: {}", self.operator_count())?;
        Ok(())
    }
}

// ================
// Helper functions
// ================

/// Determines the polar directions of a group from its generators.
///
/// Axis $`i`$ is polar unless some generator has $`M_{ii} \le 0`$. The body diagonal is polar if
/// no crystal axis is and every generator fixes $`[111]`$. Centrosymmetric groups have no polar
/// direction.
fn polar_axes(generators: &[SymmetryOperator], inversion: bool) -> Vec<PolarAxis> {
    if inversion {
        return vec![];
    }
    let mut axes = [PolarAxis::X, PolarAxis::Y, PolarAxis::Z]
        .into_iter()
        .enumerate()
        .filter(|(i, _)| generators.iter().all(|op| op.rotation[(*i, *i)] > 0.0))
        .map(|(_, axis)| axis)
        .collect_vec();
    if axes.is_empty() {
        let diagonal = Vector3::new(1.0, 1.0, 1.0);
        if generators
            .iter()
            .all(|op| (op.rotation * diagonal - diagonal).amax() < 1e-6)
        {
            axes.push(PolarAxis::Diagonal111);
        }
    }
    axes
}

fn starts_with_two(field: Option<&&str>) -> bool {
    field.map_or(false, |f| f.starts_with('2'))
}

/// Deduces the point group from the Laue class and the fields of a short Hermann–Mauguin symbol.
///
/// # Arguments
///
/// * `laue` - The Laue class.
/// * `fields` - The whitespace-separated fields of the symbol, lattice letter first.
///
/// # Returns
///
/// The point group, or `None` if the symbol is not written with separated fields.
pub(crate) fn point_group_from_symbol(laue: LaueClass, fields: &[&str]) -> Option<PointGroup> {
    let f = fields.get(1..).filter(|f| !f.is_empty())?;
    let slash = f.iter().any(|t| t.contains('/'));
    let bar = f[0].starts_with('-');
    let pg = match laue {
        LaueClass::Bar1 => {
            if bar {
                PointGroup::PBar1
            } else {
                PointGroup::P1
            }
        }
        LaueClass::TwoOverM => {
            if slash {
                PointGroup::P2OverM
            } else if f.iter().any(|t| t.starts_with('2')) {
                PointGroup::P2
            } else {
                PointGroup::Pm
            }
        }
        LaueClass::Mmm => {
            if slash {
                PointGroup::Pmmm
            } else {
                if f.len() != 3 {
                    return None;
                }
                let twos = f.iter().positions(|t| t.starts_with('2')).collect_vec();
                match twos.as_slice() {
                    [_, _, _] => PointGroup::P222,
                    [0] => PointGroup::P2mm,
                    [1] => PointGroup::Pm2m,
                    [2] => PointGroup::Pmm2,
                    _ => PointGroup::Pmmm,
                }
            }
        }
        LaueClass::FourOverM => {
            if slash {
                PointGroup::P4OverM
            } else if bar {
                PointGroup::PBar4
            } else {
                PointGroup::P4
            }
        }
        LaueClass::FourOverMmm => {
            if slash {
                PointGroup::P4OverMmm
            } else if f.len() < 3 {
                return None;
            } else if bar {
                if starts_with_two(f.get(1)) {
                    PointGroup::PBar42m
                } else {
                    PointGroup::PBar4m2
                }
            } else if starts_with_two(f.get(1)) {
                PointGroup::P422
            } else {
                PointGroup::P4mm
            }
        }
        LaueClass::ThreeR | LaueClass::Three => {
            if bar {
                PointGroup::PBar3
            } else {
                PointGroup::P3
            }
        }
        LaueClass::ThreeMR => {
            if f.len() < 2 {
                return None;
            } else if starts_with_two(f.get(1)) {
                PointGroup::P32
            } else if bar {
                PointGroup::PBar3m
            } else {
                PointGroup::P3m
            }
        }
        LaueClass::ThreeM1 => {
            if f.len() < 2 {
                return None;
            } else if starts_with_two(f.get(1)) {
                PointGroup::P321
            } else if bar {
                PointGroup::PBar3m1
            } else {
                PointGroup::P3m1
            }
        }
        LaueClass::Three1M => {
            if f.len() < 3 {
                return None;
            } else if starts_with_two(f.get(2)) {
                PointGroup::P312
            } else if bar {
                PointGroup::PBar31m
            } else {
                PointGroup::P31m
            }
        }
        LaueClass::SixOverM => {
            if slash {
                PointGroup::P6OverM
            } else if bar {
                PointGroup::PBar6
            } else {
                PointGroup::P6
            }
        }
        LaueClass::SixOverMmm => {
            if slash {
                PointGroup::P6OverMmm
            } else if f.len() < 3 {
                return None;
            } else if bar {
                if starts_with_two(f.get(1)) {
                    PointGroup::PBar62m
                } else {
                    PointGroup::PBar6m2
                }
            } else if starts_with_two(f.get(1)) {
                PointGroup::P622
            } else {
                PointGroup::P6mm
            }
        }
        LaueClass::M3 => {
            if f[0].starts_with(|c: char| c.is_ascii_digit()) {
                PointGroup::P23
            } else {
                PointGroup::PmBar3
            }
        }
        LaueClass::M3m => {
            if bar {
                PointGroup::PBar43m
            } else if f[0].starts_with(|c: char| c.is_ascii_digit()) {
                PointGroup::P432
            } else {
                PointGroup::PmBar3m
            }
        }
    };
    Some(pg)
}

/// Deduces the point group from the Laue class and the generator operators.
pub(crate) fn point_group_from_operators(
    laue: LaueClass,
    generators: &[SymmetryOperator],
    inversion: bool,
    polar_axes: &[PolarAxis],
) -> PointGroup {
    let all_proper = generators.iter().all(SymmetryOperator::is_proper);
    let has = |name: &str| {
        generators.iter().any(|op| {
            lookup_rotation(&op.rotation).map_or(false, |element| element.name == name)
        })
    };
    match laue {
        LaueClass::Bar1 if inversion => PointGroup::PBar1,
        LaueClass::Bar1 => PointGroup::P1,
        LaueClass::TwoOverM if inversion => PointGroup::P2OverM,
        LaueClass::TwoOverM if all_proper => PointGroup::P2,
        LaueClass::TwoOverM => PointGroup::Pm,
        LaueClass::Mmm if inversion => PointGroup::Pmmm,
        LaueClass::Mmm if all_proper => PointGroup::P222,
        LaueClass::Mmm => match polar_axes.first() {
            Some(PolarAxis::X) => PointGroup::P2mm,
            Some(PolarAxis::Y) => PointGroup::Pm2m,
            _ => PointGroup::Pmm2,
        },
        LaueClass::FourOverM if inversion => PointGroup::P4OverM,
        LaueClass::FourOverM if all_proper => PointGroup::P4,
        LaueClass::FourOverM => PointGroup::PBar4,
        LaueClass::FourOverMmm if inversion => PointGroup::P4OverMmm,
        LaueClass::FourOverMmm if all_proper => PointGroup::P422,
        LaueClass::FourOverMmm if has("4(z)") => PointGroup::P4mm,
        LaueClass::FourOverMmm if has("2(x)") => PointGroup::PBar42m,
        LaueClass::FourOverMmm => PointGroup::PBar4m2,
        LaueClass::ThreeR | LaueClass::Three if inversion => PointGroup::PBar3,
        LaueClass::ThreeR | LaueClass::Three => PointGroup::P3,
        LaueClass::ThreeMR if inversion => PointGroup::PBar3m,
        LaueClass::ThreeMR if all_proper => PointGroup::P32,
        LaueClass::ThreeMR => PointGroup::P3m,
        LaueClass::ThreeM1 if inversion => PointGroup::PBar3m1,
        LaueClass::ThreeM1 if all_proper => PointGroup::P321,
        LaueClass::ThreeM1 => PointGroup::P3m1,
        LaueClass::Three1M if inversion => PointGroup::PBar31m,
        LaueClass::Three1M if all_proper => PointGroup::P312,
        LaueClass::Three1M => PointGroup::P31m,
        LaueClass::SixOverM if inversion => PointGroup::P6OverM,
        LaueClass::SixOverM if all_proper => PointGroup::P6,
        LaueClass::SixOverM => PointGroup::PBar6,
        LaueClass::SixOverMmm if inversion => PointGroup::P6OverMmm,
        LaueClass::SixOverMmm if all_proper => PointGroup::P622,
        LaueClass::SixOverMmm if has("6(z)") => PointGroup::P6mm,
        LaueClass::SixOverMmm if has("2(100)") => PointGroup::PBar62m,
        LaueClass::SixOverMmm => PointGroup::PBar6m2,
        LaueClass::M3 if inversion => PointGroup::PmBar3,
        LaueClass::M3 => PointGroup::P23,
        LaueClass::M3m if inversion => PointGroup::PmBar3m,
        LaueClass::M3m if all_proper => PointGroup::P432,
        LaueClass::M3m => PointGroup::PBar43m,
    }
}
