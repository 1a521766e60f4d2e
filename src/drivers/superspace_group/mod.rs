//! Driver for building a superspace group from a space group and a superspace symbol.

use std::fmt;

use anyhow::{self, format_err};
use derive_builder::Builder;
use log;
use serde::{Deserialize, Serialize};

use crate::drivers::SsgSymDriver;
use crate::group::expansion::ExpandedGroup;
use crate::io::format::{log_subtitle, log_title, nice_bool, ssgsym_output, SsgSymOutput};
use crate::io::{write_ssgsym_binary, SsgSymFileType};
use crate::superspace::superspace_group::SuperspaceGroupDescriptor;


// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for superspace-group construction.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct SuperspaceGroupParams {
    /// The superspace part of the symbol, *e.g.* `(a0g)0s`.
    pub superspace_symbol: String,

    /// Optional name for saving the result as a binary file of type [`SsgSymFileType::Ssg`]. If
    /// `None`, the result will not be saved.
    #[builder(default = "None")]
    pub result_save_name: Option<String>,
}

impl SuperspaceGroupParams {
    /// Returns a builder to construct a [`SuperspaceGroupParams`] structure.
    pub fn builder() -> SuperspaceGroupParamsBuilder {
        SuperspaceGroupParamsBuilder::default()
    }
}

impl fmt::Display for SuperspaceGroupParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Superspace symbol: {}", self.superspace_symbol)?;
        writeln!(
            f,
            "Save superspace group to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{name}.{}", SsgSymFileType::Ssg.ext())
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

/// A structure to contain a superspace group.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct SuperspaceGroupResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: SuperspaceGroupParams,

    /// The superspace group.
    pub superspace_group: SuperspaceGroupDescriptor,
}

impl SuperspaceGroupResult {
    fn builder() -> SuperspaceGroupResultBuilder {
        SuperspaceGroupResultBuilder::default()
    }
}

impl fmt::Display for SuperspaceGroupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.superspace_group)?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for superspace-group construction.
#[derive(Clone, Builder)]
pub struct SuperspaceGroupDriver<'a> {
    /// The control parameters for superspace-group construction.
    parameters: &'a SuperspaceGroupParams,

    /// The expanded space group to lift.
    group: &'a ExpandedGroup,

    /// The superspace group.
    #[builder(setter(skip), default = "None")]
    result: Option<SuperspaceGroupResult>,
}

impl<'a> SuperspaceGroupDriver<'a> {
    /// Returns a builder to construct a [`SuperspaceGroupDriver`] structure.
    pub fn builder() -> SuperspaceGroupDriverBuilder<'a> {
        SuperspaceGroupDriverBuilder::default()
    }

    fn build_superspace_group(&mut self) -> Result<(), anyhow::Error> {
        log_title("Superspace-Group Construction");
        ssgsym_output!("");
        let params = self.parameters;
        params.log_output_display();

        let superspace_group =
            SuperspaceGroupDescriptor::build(self.group, &params.superspace_symbol).map_err(
                |err| {
                    format_err!(
                        "Unable to build `{}{}`: {err}",
                        self.group.symbol,
                        params.superspace_symbol
                    )
                },
            )?;
        log::debug!(
            "Built superspace group {} with {} operators.",
            superspace_group.symbol(),
            superspace_group.operators.len()
        );

        let result = SuperspaceGroupResult::builder()
            .parameters(params.clone())
            .superspace_group(superspace_group)
            .build()
            .map_err(|err| format_err!(err))?;

        log_subtitle(&format!(
            "Superspace group {}",
            result.superspace_group.symbol()
        ));
        ssgsym_output!("");
        result.log_output_display();
        if let Some(name) = params.result_save_name.as_ref() {
            write_ssgsym_binary(name, SsgSymFileType::Ssg, &result)?;
            ssgsym_output!(
                "Superspace group saved as {name}.{}.",
                SsgSymFileType::Ssg.ext()
            );
            ssgsym_output!("");
        }
        self.result = Some(result);
        Ok(())
    }
}

impl SsgSymDriver for SuperspaceGroupDriver<'_> {
    type Params = SuperspaceGroupParams;

    type Outcome = SuperspaceGroupResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No superspace group found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.build_superspace_group()
    }
}
