//! Driver for site-symmetry analysis of the atoms of a structure.

use std::fmt;

use anyhow::{self, format_err};
use derive_builder::Builder;
use itertools::Itertools;
use log;
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::drivers::SsgSymDriver;
use crate::group::expansion::ExpandedGroup;
use crate::io::format::{
    log_subtitle, log_title, nice_bool, ssgsym_output, ssgsym_warn, write_subtitle, SsgSymOutput,
};
use crate::io::{write_ssgsym_binary, SsgSymFileType};
use crate::site::constraints::{ConstraintTable, UIJ_COMPONENTS};
use crate::site::orbit::{generate_orbit, Orbit, OrbitParams};
use crate::site::site_symmetry::{classify_site, SiteSymmetry};
use crate::symmetry::SymmetryError;

#[cfg(test)]
#[path = "site_analysis_tests.rs"]
mod site_analysis_tests;

// ==================
// Struct definitions
// ==================

// -----
// Atoms
// -----

/// An atom of the asymmetric unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomSite {
    /// The atom label.
    pub label: String,

    /// The fractional coordinates.
    pub position: [f64; 3],

    /// The anisotropic displacement parameters
    /// $`(U_{11}, U_{22}, U_{33}, U_{12}, U_{13}, U_{23})`$, if refined anisotropically.
    #[serde(default)]
    pub uij: Option<[f64; 6]>,
}

impl AtomSite {
    /// Constructs an isotropic atom.
    pub fn new(label: &str, position: [f64; 3]) -> Self {
        Self {
            label: label.to_string(),
            position,
            uij: None,
        }
    }
}

// ----------
// Parameters
// ----------

/// A structure containing control parameters for site-symmetry analysis.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct SiteAnalysisParams {
    /// Tolerance for two images to be considered the same position modulo lattice translations.
    #[builder(default = "2.0e-4")]
    pub tolerance: f64,

    /// Boolean indicating if an unclassified site is an error rather than a warning.
    #[builder(default = "false")]
    pub require_exact: bool,

    /// Boolean indicating if the orbit of each atom is to be written to the output.
    #[builder(default = "false")]
    pub write_orbits: bool,

    /// Optional name for saving the result as a binary file of type [`SsgSymFileType::Sit`]. If
    /// `None`, the result will not be saved.
    #[builder(default = "None")]
    pub result_save_name: Option<String>,
}

impl SiteAnalysisParams {
    /// Returns a builder to construct a [`SiteAnalysisParams`] structure.
    pub fn builder() -> SiteAnalysisParamsBuilder {
        SiteAnalysisParamsBuilder::default()
    }
}

impl Default for SiteAnalysisParams {
    fn default() -> Self {
        Self {
            tolerance: 2.0e-4,
            require_exact: false,
            write_orbits: false,
            result_save_name: None,
        }
    }
}

impl fmt::Display for SiteAnalysisParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Coincidence tolerance: {:.3e}", self.tolerance)?;
        writeln!(
            f,
            "Unclassified sites are errors: {}",
            nice_bool(self.require_exact)
        )?;
        writeln!(f, "Report orbits: {}", nice_bool(self.write_orbits))?;
        writeln!(
            f,
            "Save site analysis to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{name}.{}", SsgSymFileType::Sit.ext())
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

/// The analysis of a single atom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomSiteAnalysis {
    /// The atom that was analysed.
    pub atom: AtomSite,

    /// The site symmetry of the atom.
    pub site: SiteSymmetry,

    /// The position and Uij constraints implied by the site symmetry.
    pub constraints: ConstraintTable,

    /// The orbit of the atom.
    pub orbit: Orbit,
}

/// A structure to contain site-symmetry analysis results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct SiteAnalysisResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: SiteAnalysisParams,

    /// The symbol of the space group.
    pub group_symbol: String,

    /// The analyses in input order.
    pub sites: Vec<AtomSiteAnalysis>,
}

impl SiteAnalysisResult {
    fn builder() -> SiteAnalysisResultBuilder {
        SiteAnalysisResultBuilder::default()
    }

    /// Returns the number of atoms in the unit cell.
    pub fn n_atoms_in_cell(&self) -> usize {
        self.sites.iter().map(|analysis| analysis.site.multiplicity).sum()
    }
}

impl fmt::Display for SiteAnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .sites
            .iter()
            .map(|analysis| analysis.atom.label.chars().count())
            .max()
            .unwrap_or(5)
            .max(5);
        let rule = "┈".repeat(label_width + 66);
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<label_width$} {:>27}  {:>8} {:>5} {:>9} {:>4} {:>4}",
            "Label", "Position", "Site", "Mult", "Precision", "xyz", "Uij"
        )?;
        writeln!(f, "{rule}")?;
        for analysis in self.sites.iter() {
            writeln!(
                f,
                "{:<label_width$} {:>27}  {:>8} {:>5} {:>9} {:>4} {:>4}",
                analysis.atom.label,
                analysis
                    .atom
                    .position
                    .iter()
                    .map(|x| format!("{x:+.5}"))
                    .join(" "),
                analysis.site.label,
                analysis.site.multiplicity,
                analysis.site.precision.to_string(),
                analysis.constraints.n_free_position(),
                analysis.constraints.n_free_uij(),
            )?;
        }
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Atoms in the unit cell of {}: {}",
            self.group_symbol,
            self.n_atoms_in_cell()
        )?;
        writeln!(f)?;

        write_subtitle(f, "Constraints")?;
        for analysis in self.sites.iter() {
            writeln!(f, "{}:", analysis.atom.label)?;
            write!(f, "{}", analysis.constraints)?;
        }
        writeln!(f)?;

        if self.parameters.write_orbits {
            write_subtitle(f, "Orbits")?;
            for analysis in self.sites.iter() {
                writeln!(f, "{}:", analysis.atom.label)?;
                write!(f, "{}", analysis.orbit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for site-symmetry analysis.
#[derive(Clone, Builder)]
pub struct SiteAnalysisDriver<'a> {
    /// The control parameters for site-symmetry analysis.
    parameters: &'a SiteAnalysisParams,

    /// The expanded space group.
    group: &'a ExpandedGroup,

    /// The atoms of the asymmetric unit.
    atoms: &'a [AtomSite],

    /// The result of the analysis.
    #[builder(setter(skip), default = "None")]
    result: Option<SiteAnalysisResult>,
}

impl<'a> SiteAnalysisDriver<'a> {
    /// Returns a builder to construct a [`SiteAnalysisDriver`] structure.
    pub fn builder() -> SiteAnalysisDriverBuilder<'a> {
        SiteAnalysisDriverBuilder::default()
    }

    /// Classifies, constrains and expands a single atom.
    fn analyse_atom(&self, atom: &AtomSite) -> Result<AtomSiteAnalysis, SymmetryError> {
        let params = self.parameters;
        let position = Vector3::from(atom.position);
        let site = classify_site(&position, self.group, params.tolerance);
        let site = if params.require_exact {
            site.require_exact()?
        } else {
            site
        };
        let orbit_params = OrbitParams {
            tolerance: params.tolerance,
            allow_duplicates: false,
            uij: atom.uij,
        };
        let orbit = generate_orbit(&position, self.group, &orbit_params);
        let constraints = site.constraints();
        log::debug!(
            "Atom {} at ({}) has site symmetry {}.",
            atom.label,
            atom.position.iter().map(|x| format!("{x:.5}")).join(", "),
            site.label
        );
        Ok(AtomSiteAnalysis {
            atom: atom.clone(),
            site,
            constraints,
            orbit,
        })
    }

    fn analyse_sites(&mut self) -> Result<(), anyhow::Error> {
        log_title("Site-Symmetry Analysis");
        ssgsym_output!("");
        let params = self.parameters;
        params.log_output_display();

        let sites = self
            .atoms
            .par_iter()
            .map(|atom| {
                self.analyse_atom(atom)
                    .map_err(|err| format_err!("Atom {}: {err}", atom.label))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for analysis in sites.iter().filter(|analysis| !analysis.site.is_exact()) {
            ssgsym_warn!(
                "Site symmetry of atom {} is not tabulated; constraints were derived from its stabiliser.",
                analysis.atom.label
            );
        }
        for analysis in sites.iter() {
            if let Some(uij) = analysis.atom.uij {
                let violations = uij_violations(&analysis.constraints, &uij);
                if !violations.is_empty() {
                    ssgsym_warn!(
                        "Uij of atom {} violate the site constraints on {}.",
                        analysis.atom.label,
                        violations.join(", ")
                    );
                }
            }
        }

        let result = SiteAnalysisResult::builder()
            .parameters(params.clone())
            .group_symbol(self.group.symbol.clone())
            .sites(sites)
            .build()
            .map_err(|err| format_err!(err))?;

        log_subtitle(&format!("Sites in {}", result.group_symbol));
        ssgsym_output!("");
        result.log_output_display();
        if let Some(name) = params.result_save_name.as_ref() {
            write_ssgsym_binary(name, SsgSymFileType::Sit, &result)?;
            ssgsym_output!(
                "Site analysis saved as {name}.{}.",
                SsgSymFileType::Sit.ext()
            );
            ssgsym_output!("");
        }
        self.result = Some(result);
        Ok(())
    }
}

impl SsgSymDriver for SiteAnalysisDriver<'_> {
    type Params = SiteAnalysisParams;

    type Outcome = SiteAnalysisResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No site-symmetry analysis results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.analyse_sites()
    }
}

// =========
// Functions
// =========

/// Returns the names of the Uij components that differ from their constrained values.
fn uij_violations(constraints: &ConstraintTable, uij: &[f64; 6]) -> Vec<&'static str> {
    // Each free parameter is read off the first component carrying it.
    let mut params: Vec<Option<f64>> = vec![None; constraints.n_free_uij()];
    for ((slot, mult), u) in constraints
        .uij_indices
        .iter()
        .zip(constraints.uij_multipliers.iter())
        .zip(uij.iter())
    {
        if *slot > 0 && *mult != 0.0 {
            params[*slot - 1].get_or_insert(u / mult);
        }
    }
    let params = params.into_iter().map(|p| p.unwrap_or(0.0)).collect_vec();
    let Some(expected) = constraints.expand_uij(&params) else {
        return vec![];
    };
    UIJ_COMPONENTS
        .iter()
        .zip(expected.iter().zip(uij.iter()))
        .filter(|(_, (e, u))| (*e - *u).abs() > 1.0e-4 * u.abs().max(1.0e-3))
        .map(|(name, _)| *name)
        .collect()
}
