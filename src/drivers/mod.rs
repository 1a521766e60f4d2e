//! Drivers to carry out `SsgSym` functionalities.

use anyhow;

pub mod reflection_list;
pub mod site_analysis;
pub mod space_group;
pub mod superspace_group;

// =================
// Trait definitions
// =================

/// Trait defining behaviours of `SsgSym` drivers.
pub trait SsgSymDriver {
    /// The type of the parameter structure controlling the driver.
    type Params;

    /// The type of the successful outcome when executing the driver.
    type Outcome;

    /// Executes the driver and stores the result internally.
    fn run(&mut self) -> Result<(), anyhow::Error>;

    /// Returns the result of the driver execution.
    fn result(&self) -> Result<&Self::Outcome, anyhow::Error>;
}
