//! YAML input files for the `ssgsym` binary.

use anyhow::{self, bail, Context};
use serde::{Deserialize, Serialize};

use crate::auxiliary::lattice::UnitCell;
use crate::drivers::reflection_list::{ReflectionListDriver, ReflectionListParams};
use crate::drivers::site_analysis::{AtomSite, SiteAnalysisDriver, SiteAnalysisParams};
use crate::drivers::space_group::{SpaceGroupDriver, SpaceGroupParams, SpaceGroupResult};
use crate::drivers::superspace_group::{SuperspaceGroupDriver, SuperspaceGroupParams};
use crate::drivers::SsgSymDriver;
use crate::group::cache::GroupCache;
use crate::group::resolver::{ResolvedSymbol, TabulatedSymbolResolver};
use crate::interfaces::InputHandle;
use crate::io::format::ssgsym_output;
use crate::io::{read_ssgsym_binary, SsgSymFileType};
use crate::reflection::ReflectionParams;


// ================
// Resolver entries
// ================

/// Generator operators of a space group written as coordinate triplets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatorDefinition {
    /// One-based Laue-class index.
    pub laue_index: u8,

    /// Boolean indicating if the inversion is to be added to the generators.
    pub inversion: bool,

    /// One-based centering index.
    pub centering_index: u8,

    /// Unique-axis index, zero if there is none.
    #[serde(default)]
    pub unique_axis_index: u8,

    /// The generator operators, *e.g.* `-x, y+1/2, -z+1/2`.
    pub operators: Vec<String>,
}

/// An enumerated type for the ways a resolver entry can be given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolverDefinition {
    /// Variant for generators written as coordinate triplets.
    Operators(OperatorDefinition),

    /// Variant for the resolver output tuple with rotation matrices.
    Resolved(ResolvedSymbol),
}

/// A symbol together with its resolver output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolverEntry {
    /// The space-group symbol.
    pub symbol: String,

    /// The resolver output for the symbol.
    pub definition: ResolverDefinition,
}

/// Builds a resolver from input entries.
///
/// # Errors
///
/// Errors if an operator of an entry cannot be parsed.
pub fn build_resolver(
    entries: &[ResolverEntry],
) -> Result<TabulatedSymbolResolver, anyhow::Error> {
    let mut resolver = TabulatedSymbolResolver::new();
    for entry in entries {
        let resolved = match &entry.definition {
            ResolverDefinition::Operators(def) => ResolvedSymbol::from_operator_strings(
                def.laue_index,
                def.inversion,
                def.centering_index,
                def.unique_axis_index,
                &def.operators,
            )
            .with_context(|| format!("Unable to parse the operators of `{}`", entry.symbol))?,
            ResolverDefinition::Resolved(resolved) => resolved.clone(),
        };
        resolver.insert(&entry.symbol, resolved);
    }
    Ok(resolver)
}

// =====
// Input
// =====

/// An enumerated type representing possible input kinds for the space group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SpaceGroupInputKind {
    /// Variant indicating that the space group is to be resolved and expanded.
    Parameters(SpaceGroupParams),

    /// Variant indicating that the expanded space group will be read in from a binary file of
    /// type [`SsgSymFileType::Grp`]. The associated string gives the name of the file without
    /// its `.ssgsym.grp` extension.
    FromFile(String),
}

/// The atoms of a structure and the parameters for their analysis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StructureInput {
    /// The atoms of the asymmetric unit.
    pub atoms: Vec<AtomSite>,

    /// The parameters for site-symmetry analysis.
    #[serde(default)]
    pub site_analysis: SiteAnalysisParams,
}

/// A structure containing `SsgSym` input parameters which can be serialised into and deserialised
/// from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// Symbols known to the resolver, with their generators.
    #[serde(default)]
    pub resolver: Vec<ResolverEntry>,

    /// Specification for the space group.
    pub space_group: SpaceGroupInputKind,

    /// The unit cell. Required for reflection listing.
    #[serde(default)]
    pub cell: Option<UnitCell>,

    /// The structure for site-symmetry analysis. If `None`, no site analysis will be performed.
    #[serde(default)]
    pub structure: Option<StructureInput>,

    /// Specification for superspace-group construction. If `None`, no superspace group will be
    /// built.
    #[serde(default)]
    pub superspace_group: Option<SuperspaceGroupParams>,

    /// Specification for reflection listing. If `None`, no reflections will be listed.
    #[serde(default)]
    pub reflections: Option<ReflectionListParams>,
}

impl Default for Input {
    fn default() -> Self {
        let p21c = OperatorDefinition {
            laue_index: 2,
            inversion: true,
            centering_index: 1,
            unique_axis_index: 2,
            operators: vec!["x, y, z".to_string(), "-x, y+1/2, -z+1/2".to_string()],
        };
        Input {
            resolver: vec![ResolverEntry {
                symbol: "P 21/c".to_string(),
                definition: ResolverDefinition::Operators(p21c),
            }],
            space_group: SpaceGroupInputKind::Parameters(SpaceGroupParams {
                symbol: "P 21/c".to_string(),
                write_operators: true,
                result_save_name: None,
            }),
            cell: Some(UnitCell {
                lengths: [5.0, 6.0, 7.0],
                angles: [90.0, 100.0, 90.0],
            }),
            structure: Some(StructureInput {
                atoms: vec![
                    AtomSite::new("Fe1", [0.0, 0.0, 0.0]),
                    AtomSite::new("O1", [0.1, 0.2, 0.3]),
                ],
                site_analysis: SiteAnalysisParams::default(),
            }),
            superspace_group: None,
            reflections: Some(ReflectionListParams {
                reflection: ReflectionParams {
                    dmin: 2.0,
                    suppress_equal_d: false,
                    reverse: false,
                    tolerance: 1.0e-5,
                },
                space_group_absences: true,
                satellites: None,
                superspace_symbol: None,
                result_save_name: None,
            }),
        }
    }
}

impl InputHandle for Input {
    /// Handles the `SsgSym` input specification and runs the requested drivers in turn.
    fn handle(&self) -> Result<(), anyhow::Error> {
        let resolver = build_resolver(&self.resolver)?;
        let cache = GroupCache::new();

        let space_group = match &self.space_group {
            SpaceGroupInputKind::Parameters(sg_params) => {
                let mut sg_driver = SpaceGroupDriver::builder()
                    .parameters(sg_params)
                    .resolver(&resolver)
                    .cache(&cache)
                    .build()
                    .with_context(|| "Unable to construct a space-group driver")?;
                sg_driver
                    .run()
                    .with_context(|| "Unable to run the space-group driver successfully")?;
                sg_driver
                    .result()
                    .with_context(|| "Unable to retrieve the space-group result")?
                    .clone()
            }
            SpaceGroupInputKind::FromFile(name) => {
                let sg_res: SpaceGroupResult = read_ssgsym_binary(name, SsgSymFileType::Grp)
                    .with_context(|| {
                        format!("Unable to read `{name}.{}`", SsgSymFileType::Grp.ext())
                    })?;
                ssgsym_output!(
                    "Expanded space group read from {name}.{}.",
                    SsgSymFileType::Grp.ext()
                );
                ssgsym_output!("");
                sg_res
            }
        };
        let group = &space_group.group;

        if let Some(structure) = self.structure.as_ref() {
            let mut sa_driver = SiteAnalysisDriver::builder()
                .parameters(&structure.site_analysis)
                .group(group)
                .atoms(&structure.atoms)
                .build()
                .with_context(|| "Unable to construct a site-analysis driver")?;
            sa_driver
                .run()
                .with_context(|| "Unable to run the site-analysis driver successfully")?;
        }

        if let Some(ssg_params) = self.superspace_group.as_ref() {
            let mut ssg_driver = SuperspaceGroupDriver::builder()
                .parameters(ssg_params)
                .group(group)
                .build()
                .with_context(|| "Unable to construct a superspace-group driver")?;
            ssg_driver
                .run()
                .with_context(|| "Unable to run the superspace-group driver successfully")?;
        }

        if let Some(rl_params) = self.reflections.as_ref() {
            let Some(cell) = self.cell.as_ref() else {
                bail!("A unit cell is required for reflection listing.");
            };
            let mut rl_driver = ReflectionListDriver::builder()
                .parameters(rl_params)
                .group(group)
                .cell(cell)
                .build()
                .with_context(|| "Unable to construct a reflection-list driver")?;
            rl_driver
                .run()
                .with_context(|| "Unable to run the reflection-list driver successfully")?;
        }
        Ok(())
    }
}
