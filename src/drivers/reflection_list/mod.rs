//! Driver for listing the symmetry-unique reflections of a crystal.

use std::fmt;

use anyhow::{self, bail, format_err};
use derive_builder::Builder;
use log;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::auxiliary::lattice::UnitCell;
use crate::drivers::SsgSymDriver;
use crate::group::expansion::ExpandedGroup;
use crate::io::format::{log_subtitle, log_title, nice_bool, ssgsym_output, SsgSymOutput};
use crate::io::{write_ssgsym_binary, SsgSymFileType};
use crate::reflection::{
    enumerate_allowed_reflections, enumerate_reflections, enumerate_superspace_reflections,
    is_systematically_absent, ReflectionParams, ReflectionRecord, SatelliteParams,
};
use crate::superspace::superspace_group::SuperspaceGroupDescriptor;


/// Tolerance for a numerical modulation vector to match the commensurate part of a superspace
/// symbol.
const MODULATION_TOLERANCE: f64 = 1.0e-4;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for reflection listing.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct ReflectionListParams {
    /// The enumeration parameters.
    pub reflection: ReflectionParams,

    /// Boolean indicating if reflections made absent by glide planes and screw axes are to be
    /// removed.
    #[builder(default = "true")]
    pub space_group_absences: bool,

    /// Satellite parameters. If `None`, only main reflections are listed.
    #[builder(default = "None")]
    pub satellites: Option<SatelliteParams>,

    /// Optional superspace symbol, *e.g.* `(a0g)0s`, whose group removes absent satellites.
    #[builder(default = "None")]
    pub superspace_symbol: Option<String>,

    /// Optional name for saving the result as a binary file of type [`SsgSymFileType::Ref`]. If
    /// `None`, the result will not be saved.
    #[builder(default = "None")]
    pub result_save_name: Option<String>,
}

impl ReflectionListParams {
    /// Returns a builder to construct a [`ReflectionListParams`] structure.
    pub fn builder() -> ReflectionListParamsBuilder {
        ReflectionListParamsBuilder::default()
    }
}

impl fmt::Display for ReflectionListParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolution limit: {:.4} Å", self.reflection.dmin)?;
        writeln!(
            f,
            "Suppress equal d-spacings: {} (tolerance {:.1e})",
            nice_bool(self.reflection.suppress_equal_d),
            self.reflection.tolerance
        )?;
        writeln!(
            f,
            "Ascending d-spacings: {}",
            nice_bool(self.reflection.reverse)
        )?;
        writeln!(
            f,
            "Remove space-group absences: {}",
            nice_bool(self.space_group_absences)
        )?;
        if let Some(satellites) = self.satellites.as_ref() {
            let [q1, q2, q3] = satellites.modulation_vector;
            writeln!(
                f,
                "Satellites: q = ({q1:.4}, {q2:.4}, {q3:.4}), |m| ≤ {}",
                satellites.max_order
            )?;
            writeln!(
                f,
                "Superspace symbol: {}",
                self.superspace_symbol.as_deref().unwrap_or("--")
            )?;
        }
        writeln!(
            f,
            "Save reflection list to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{name}.{}", SsgSymFileType::Ref.ext())
            } else {
                nice_bool(false).to_string()
            }
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain a reflection list.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct ReflectionListResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: ReflectionListParams,

    /// The symbol of the space group, or of the superspace group if one was used.
    pub group_symbol: String,

    /// The unit cell.
    pub cell: UnitCell,

    /// The reflections.
    pub reflections: Vec<ReflectionRecord>,
}

impl ReflectionListResult {
    fn builder() -> ReflectionListResultBuilder {
        ReflectionListResultBuilder::default()
    }
}

impl fmt::Display for ReflectionListResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Group: {}", self.group_symbol)?;
        writeln!(f, "Cell: {}", self.cell)?;
        writeln!(f, "Number of reflections: {}", self.reflections.len())?;
        writeln!(f)?;
        let satellites = self.reflections.iter().any(|record| record.m.is_some());
        let width = if satellites { 32 } else { 27 };
        writeln!(f, "{}", "┈".repeat(width))?;
        if satellites {
            writeln!(f, "{:>4} {:>4} {:>4} {:>4}  {:>10}", "h", "k", "l", "m", "d (Å)")?;
        } else {
            writeln!(f, "{:>4} {:>4} {:>4}  {:>10}", "h", "k", "l", "d (Å)")?;
        }
        writeln!(f, "{}", "┈".repeat(width))?;
        for record in self.reflections.iter() {
            writeln!(f, "{record}")?;
        }
        writeln!(f, "{}", "┈".repeat(width))?;
        if self.reflections.iter().any(|record| record.duplicate_suppressed) {
            writeln!(f, "(* Later reflections with the same d-spacing were suppressed.)")?;
        }
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for reflection listing.
#[derive(Clone, Builder)]
pub struct ReflectionListDriver<'a> {
    /// The control parameters for reflection listing.
    parameters: &'a ReflectionListParams,

    /// The expanded space group.
    group: &'a ExpandedGroup,

    /// The unit cell.
    cell: &'a UnitCell,

    /// The reflection list.
    #[builder(setter(skip), default = "None")]
    result: Option<ReflectionListResult>,
}

impl<'a> ReflectionListDriver<'a> {
    /// Returns a builder to construct a [`ReflectionListDriver`] structure.
    pub fn builder() -> ReflectionListDriverBuilder<'a> {
        ReflectionListDriverBuilder::default()
    }

    /// Lists main and satellite reflections, removing absences of the superspace group if a
    /// symbol is given and otherwise those of the space group on main reflections only.
    fn list_satellites(
        &self,
        satellites: &SatelliteParams,
    ) -> Result<(String, Vec<ReflectionRecord>), anyhow::Error> {
        let params = self.parameters;
        let a = self.cell.to_a_tensor()?;
        let ssg = params
            .superspace_symbol
            .as_ref()
            .map(|symbol| SuperspaceGroupDescriptor::build(self.group, symbol))
            .transpose()?;
        if let Some(ssg) = ssg.as_ref() {
            let q = Vector3::from(satellites.modulation_vector);
            if !ssg.modulation.is_compatible(&q, MODULATION_TOLERANCE) {
                bail!(
                    "Modulation vector ({}, {}, {}) does not match {}.",
                    q[0],
                    q[1],
                    q[2],
                    ssg.modulation
                );
            }
        }
        let mut records = enumerate_superspace_reflections(
            &self.group.reflection_conditions(),
            &a,
            &params.reflection,
            satellites,
            ssg.as_ref(),
        )?;
        if ssg.is_none() && params.space_group_absences {
            records.retain(|record| {
                record.m != Some(0) || !is_systematically_absent(&record.hkl, self.group)
            });
        }
        let symbol = ssg.map_or_else(|| self.group.symbol.clone(), |ssg| ssg.symbol());
        Ok((symbol, records))
    }

    fn list_reflections(&mut self) -> Result<(), anyhow::Error> {
        log_title("Reflection List");
        ssgsym_output!("");
        let params = self.parameters;
        params.log_output_display();

        let (group_symbol, reflections) = match params.satellites.as_ref() {
            Some(satellites) => self.list_satellites(satellites)?,
            None => {
                let a = self.cell.to_a_tensor()?;
                let records = if params.space_group_absences {
                    enumerate_allowed_reflections(self.group, &a, &params.reflection)?
                } else {
                    enumerate_reflections(
                        &self.group.reflection_conditions(),
                        &a,
                        &params.reflection,
                    )?
                };
                (self.group.symbol.clone(), records)
            }
        };
        log::debug!(
            "Listed {} reflections for {group_symbol}.",
            reflections.len()
        );

        let result = ReflectionListResult::builder()
            .parameters(params.clone())
            .group_symbol(group_symbol)
            .cell(*self.cell)
            .reflections(reflections)
            .build()
            .map_err(|err| format_err!(err))?;

        log_subtitle(&format!("Reflections of {}", result.group_symbol));
        ssgsym_output!("");
        result.log_output_display();
        ssgsym_output!("");
        if let Some(name) = params.result_save_name.as_ref() {
            write_ssgsym_binary(name, SsgSymFileType::Ref, &result)?;
            ssgsym_output!(
                "Reflection list saved as {name}.{}.",
                SsgSymFileType::Ref.ext()
            );
            ssgsym_output!("");
        }
        self.result = Some(result);
        Ok(())
    }
}

impl SsgSymDriver for ReflectionListDriver<'_> {
    type Params = ReflectionListParams;

    type Outcome = ReflectionListResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No reflection list found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.list_reflections()
    }
}
