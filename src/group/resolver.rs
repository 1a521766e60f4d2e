//! Symbol resolution: the interface to the external lookup that turns a Hermann–Mauguin symbol
//! into Laue class, centering and generator matrices.

use std::fmt;

use indexmap::IndexMap;
use log;
use serde::{Deserialize, Serialize};

use crate::symmetry::symmetry_operator::SymmetryOperator;
use crate::symmetry::SymmetryError;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;

/// Resolver error code for a symbol that is not known.
pub const SPACE_GROUP_NOT_FOUND: u8 = 14;

// ===================
// Symbol normalisation
// ===================

/// A space-group symbol after normalisation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalisedSymbol {
    /// The symbol with surrounding whitespace trimmed, internal runs of whitespace collapsed and
    /// the setting suffix and grey marker removed.
    pub symbol: String,

    /// The setting suffix following `:`, if any.
    pub setting: Option<String>,

    /// Boolean indicating if the symbol carried the `1'` grey (time-reversal) marker.
    pub gray: bool,
}

impl NormalisedSymbol {
    /// Returns the key identifying this symbol and setting.
    pub fn key(&self) -> String {
        match self.setting.as_ref() {
            Some(setting) => format!("{}:{setting}", self.symbol),
            None => self.symbol.clone(),
        }
    }

    /// Returns the key identifying this symbol, setting and grey marker.
    pub fn cache_key(&self) -> String {
        if self.gray {
            format!("{} 1'", self.key())
        } else {
            self.key()
        }
    }

    /// Returns the whitespace-separated fields of the symbol. The first field is the lattice
    /// letter.
    pub fn fields(&self) -> Vec<&str> {
        self.symbol.split_whitespace().collect()
    }
}

impl fmt::Display for NormalisedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())?;
        if self.gray {
            write!(f, " 1'")?;
        }
        Ok(())
    }
}

/// Normalises a space-group symbol.
///
/// Surrounding whitespace is trimmed, runs of whitespace are collapsed, a `:` setting suffix is
/// split off and a `1'` grey marker is removed and recorded.
pub fn normalise_symbol(raw: &str) -> NormalisedSymbol {
    let (body, setting) = match raw.split_once(':') {
        Some((body, setting)) => {
            let setting = setting.trim();
            (
                body,
                if setting.is_empty() {
                    None
                } else {
                    Some(setting.to_string())
                },
            )
        }
        None => (raw, None),
    };
    let mut gray = false;
    let mut fields: Vec<&str> = vec![];
    for (i, field) in body.split_whitespace().enumerate() {
        if i >= 2 && field == "1'" {
            gray = true;
        } else {
            fields.push(field);
        }
    }
    // A grey marker glued to the last field, as in `P21/c1'`.
    if !gray {
        let n_fields = fields.len();
        if let Some(last) = fields.last_mut() {
            if let Some(stripped) = last.strip_suffix("1'") {
                if stripped.len() > 1 || (n_fields > 1 && !stripped.is_empty()) {
                    *last = stripped;
                    gray = true;
                }
            }
        }
    }
    NormalisedSymbol {
        symbol: fields.join(" "),
        setting,
        gray,
    }
}

// ======================
// Resolver output tuple
// ======================

/// The output of an external symbol resolver.
///
/// Indices are one-based as returned by the resolver: the Laue index counts
/// `-1, 2/m, mmm, 4/m, 4/mmm, 3R, 3mR, 3, 3m1, 31m, 6/m, 6/mmm, m3, m3m`, the centering index
/// counts `P, A, B, C, I, F, R` and the unique-axis index is 1, 2, 3 for `a`, `b`, `c`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSymbol {
    pub laue_index: u8,
    pub inversion: bool,
    pub centering_index: u8,
    pub unique_axis_index: u8,
    pub n_ops: usize,
    pub rotations: Vec<[[f64; 3]; 3]>,
    pub translations: Vec<[f64; 3]>,
    pub error_code: u8,
}

impl ResolvedSymbol {
    /// Returns a resolver output carrying only an error code.
    pub fn error(code: u8) -> Self {
        Self {
            laue_index: 0,
            inversion: false,
            centering_index: 0,
            unique_axis_index: 0,
            n_ops: 0,
            rotations: vec![],
            translations: vec![],
            error_code: code,
        }
    }

    /// Constructs a successful resolver output from generator operators written as coordinate
    /// triplets.
    ///
    /// # Arguments
    ///
    /// * `laue_index` - One-based Laue-class index.
    /// * `inversion` - Boolean indicating if the inversion is to be added to the generators.
    /// * `centering_index` - One-based centering index.
    /// * `unique_axis_index` - Unique-axis index.
    /// * `operators` - Generator operators such as `-x, y+1/2, -z+1/2`.
    ///
    /// # Returns
    ///
    /// The resolver output, or a symbol error if an operator cannot be parsed.
    pub fn from_operator_strings<S: AsRef<str>>(
        laue_index: u8,
        inversion: bool,
        centering_index: u8,
        unique_axis_index: u8,
        operators: &[S],
    ) -> Result<Self, SymmetryError> {
        let ops = operators
            .iter()
            .map(|op| op.as_ref().parse::<SymmetryOperator>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            laue_index,
            inversion,
            centering_index,
            unique_axis_index,
            n_ops: ops.len(),
            rotations: ops
                .iter()
                .map(|op| {
                    let mut rows = [[0.0; 3]; 3];
                    for (i, row) in rows.iter_mut().enumerate() {
                        for (j, entry) in row.iter_mut().enumerate() {
                            *entry = op.rotation[(i, j)];
                        }
                    }
                    rows
                })
                .collect(),
            translations: ops
                .iter()
                .map(|op| [op.translation[0], op.translation[1], op.translation[2]])
                .collect(),
            error_code: 0,
        })
    }
}

// =========
// Resolvers
// =========

/// Trait for external symbol resolvers.
pub trait SymbolResolver {
    /// Resolves a normalised symbol. Failures are reported through
    /// [`ResolvedSymbol::error_code`].
    fn resolve(&self, symbol: &NormalisedSymbol) -> ResolvedSymbol;
}

/// A resolver backed by an explicit table of symbols, typically filled from an input file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TabulatedSymbolResolver {
    entries: IndexMap<String, ResolvedSymbol>,
}

impl TabulatedSymbolResolver {
    /// Constructs an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. The symbol is normalised before being stored.
    pub fn insert(&mut self, symbol: &str, resolved: ResolvedSymbol) -> &mut Self {
        let key = normalise_symbol(symbol).key();
        if self.entries.insert(key.clone(), resolved).is_some() {
            log::debug!("Replaced resolver entry for `{key}`.");
        }
        self
    }

    /// Returns the number of tabulated symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the tabulated symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

impl SymbolResolver for TabulatedSymbolResolver {
    fn resolve(&self, symbol: &NormalisedSymbol) -> ResolvedSymbol {
        self.entries
            .get(&symbol.key())
            .cloned()
            .unwrap_or_else(|| ResolvedSymbol::error(SPACE_GROUP_NOT_FOUND))
    }
}
