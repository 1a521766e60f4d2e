//! Reading and writing `SsgSym` binary and YAML files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{self, format_err};
use bincode;
use serde::{de::DeserializeOwned, Serialize};
use serde_yaml;

pub(crate) mod format;

#[cfg(test)]
#[path = "io_tests.rs"]
mod io_tests;

/// An enumerated type for `SsgSym` file types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SsgSymFileType {
    /// Variant for binary files containing expanded space groups.
    Grp,

    /// Variant for binary files containing site analyses.
    Sit,

    /// Variant for binary files containing reflection lists.
    Ref,

    /// Variant for binary files containing superspace groups.
    Ssg,
}

impl SsgSymFileType {
    /// Returns the extension of the file type.
    pub fn ext(&self) -> String {
        match self {
            SsgSymFileType::Grp => "ssgsym.grp".to_string(),
            SsgSymFileType::Sit => "ssgsym.sit".to_string(),
            SsgSymFileType::Ref => "ssgsym.ref".to_string(),
            SsgSymFileType::Ssg => "ssgsym.ssg".to_string(),
        }
    }
}

/// Reads an `SsgSym` binary file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (without `SsgSym`-specific extensions).
/// * `file_type` - The type of the `SsgSym` file to be read in.
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_ssgsym_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: SsgSymFileType,
) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut reader = BufReader::new(
        File::open(&path).map_err(|err| format_err!("Unable to open {}: {err}", path.display()))?,
    );
    bincode::deserialize_from(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises a structure and writes it into an `SsgSym` binary file.
///
/// # Arguments
///
/// * `name` - The name of the file to be written (without `SsgSym`-specific extensions).
/// * `file_type` - The type of the `SsgSym` file to be written.
/// * `value` - The structure to be serialised.
pub fn write_ssgsym_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: SsgSymFileType,
    value: &T,
) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, value).map_err(|err| format_err!(err))
}

/// Reads an `SsgSym` configuration YAML file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (with its `.yml` or `.yaml` extension).
pub fn read_ssgsym_yaml<T, P: AsRef<Path>>(name: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut reader = BufReader::new(File::open(name).map_err(|err| format_err!(err))?);
    serde_yaml::from_reader(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises a structure and writes it into an `SsgSym` configuration YAML file.
///
/// # Arguments
///
/// * `name` - The name of the YAML file to be written (without extensions). The resulting file
/// will have the `.yml` extension.
pub fn write_ssgsym_yaml<T, P: AsRef<Path>>(name: P, value: &T) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension("yml");
    let mut writer = BufWriter::new(File::create(path)?);
    serde_yaml::to_writer(&mut writer, value).map_err(|err| format_err!(err))
}
