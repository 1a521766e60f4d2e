//! Driver for resolving and expanding a space-group symbol.

use std::fmt;

use anyhow::{self, format_err};
use derive_builder::Builder;
use log;
use serde::{Deserialize, Serialize};

use crate::drivers::SsgSymDriver;
use crate::group::cache::GroupCache;
use crate::group::descriptor::GroupDescriptor;
use crate::group::expansion::ExpandedGroup;
use crate::group::resolver::SymbolResolver;
use crate::io::format::{
    log_subtitle, log_title, nice_bool, ssgsym_output, ssgsym_warn, SsgSymOutput,
};
use crate::io::{write_ssgsym_binary, SsgSymFileType};

#[cfg(test)]
#[path = "space_group_tests.rs"]
mod space_group_tests;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for space-group expansion.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct SpaceGroupParams {
    /// The space-group symbol, *e.g.* `P 21/c`.
    pub symbol: String,

    /// Boolean indicating if the full operator list is to be written to the output.
    #[builder(default = "true")]
    pub write_operators: bool,

    /// Optional name for saving the result as a binary file of type [`SsgSymFileType::Grp`]. If
    /// `None`, the result will not be saved.
    #[builder(default = "None")]
    pub result_save_name: Option<String>,
}

impl SpaceGroupParams {
    /// Returns a builder to construct a [`SpaceGroupParams`] structure.
    pub fn builder() -> SpaceGroupParamsBuilder {
        SpaceGroupParamsBuilder::default()
    }
}

impl fmt::Display for SpaceGroupParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Space-group symbol: {}", self.symbol)?;
        writeln!(f, "Report operators: {}", nice_bool(self.write_operators))?;
        writeln!(
            f,
            "Save expanded group to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{name}.{}", SsgSymFileType::Grp.ext())
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

/// A structure to contain space-group expansion results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct SpaceGroupResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: SpaceGroupParams,

    /// The descriptor built from the resolver output.
    pub descriptor: GroupDescriptor,

    /// The expanded group.
    pub group: ExpandedGroup,
}

impl SpaceGroupResult {
    fn builder() -> SpaceGroupResultBuilder {
        SpaceGroupResultBuilder::default()
    }
}

impl fmt::Display for SpaceGroupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor)?;
        writeln!(f)?;
        if self.parameters.write_operators {
            write!(f, "{}", self.group)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for space-group expansion.
#[derive(Clone, Builder)]
pub struct SpaceGroupDriver<'a> {
    /// The control parameters for space-group expansion.
    parameters: &'a SpaceGroupParams,

    /// The resolver turning symbols into generator operators.
    resolver: &'a dyn SymbolResolver,

    /// The cache holding descriptors and expanded groups.
    cache: &'a GroupCache,

    /// The result of the expansion.
    #[builder(setter(skip), default = "None")]
    result: Option<SpaceGroupResult>,
}

impl<'a> SpaceGroupDriver<'a> {
    /// Returns a builder to construct a [`SpaceGroupDriver`] structure.
    pub fn builder() -> SpaceGroupDriverBuilder<'a> {
        SpaceGroupDriverBuilder::default()
    }

    fn expand_space_group(&mut self) -> Result<(), anyhow::Error> {
        log_title("Space-Group Expansion");
        ssgsym_output!("");
        let params = self.parameters;
        params.log_output_display();

        let descriptor = self
            .cache
            .descriptor(&params.symbol, self.resolver)
            .map_err(|err| format_err!("Unable to resolve `{}`: {err}", params.symbol))?;
        let group = self.cache.expansion(&descriptor);
        log::debug!(
            "Expanded `{}` into {} operators.",
            descriptor.symbol,
            group.len()
        );
        if !group.is_closed() {
            ssgsym_warn!(
                "The operators of `{}` are not closed under composition.",
                descriptor.symbol
            );
        }

        let result = SpaceGroupResult::builder()
            .parameters(params.clone())
            .descriptor((*descriptor).clone())
            .group((*group).clone())
            .build()
            .map_err(|err| format_err!(err))?;

        log_subtitle(&format!("Space group {}", result.descriptor.symbol));
        ssgsym_output!("");
        result.log_output_display();
        if let Some(name) = params.result_save_name.as_ref() {
            write_ssgsym_binary(name, SsgSymFileType::Grp, &result)?;
            ssgsym_output!(
                "Expanded space group saved as {name}.{}.",
                SsgSymFileType::Grp.ext()
            );
            ssgsym_output!("");
        }
        self.result = Some(result);
        Ok(())
    }
}

impl SsgSymDriver for SpaceGroupDriver<'_> {
    type Params = SpaceGroupParams;

    type Outcome = SpaceGroupResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No space-group expansion results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.expand_space_group()
    }
}
