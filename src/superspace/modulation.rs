//! Modulation wave vectors and the symbols that describe them.
//!
//! A superspace symbol such as `(a0g)0s` has a modulation part in parentheses, giving each
//! component of the wave vector $`\mathbf{q}`$, followed by a generator part giving the
//! internal-space translation of each symmetry direction of the point-group symbol.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::symmetry::{SymbolDiagnostic, SymmetryError};

#[cfg(test)]
#[path = "modulation_tests.rs"]
mod modulation_tests;

/// Letters standing for incommensurate components, by axis.
const FREE_LETTERS: [char; 3] = ['a', 'b', 'g'];

fn superspace_error(msg: String) -> SymmetryError {
    SymmetryError::Symbol(SymbolDiagnostic::Superspace(msg))
}

// ====================
// Modulation component
// ====================

/// An enumerated type for one component of a modulation wave vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModulationComponent {
    /// A commensurate component $`p/q`$.
    Rational(i32, i32),

    /// An incommensurate component, written with the letter of its own axis.
    Free,
}

impl ModulationComponent {
    /// Returns the rational value of the component, zero for free components.
    pub fn rational_value(&self) -> f64 {
        match self {
            ModulationComponent::Rational(p, q) => f64::from(*p) / f64::from(*q),
            ModulationComponent::Free => 0.0,
        }
    }

    fn token(&self, axis: usize) -> String {
        match self {
            ModulationComponent::Rational(p, 1) => format!("{p}"),
            ModulationComponent::Rational(p, q) => format!("{p}/{q}"),
            ModulationComponent::Free => FREE_LETTERS[axis].to_string(),
        }
    }
}

// =================
// Modulation vector
// =================

/// A modulation wave vector described symbolically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModulationVector {
    pub components: [ModulationComponent; 3],
}

impl ModulationVector {
    /// Returns the commensurate part $`\mathbf{r}`$ of the wave vector.
    pub fn rational_part(&self) -> Vector3<f64> {
        Vector3::from_fn(|i, _| self.components[i].rational_value())
    }

    /// Returns the axes carrying incommensurate components.
    pub fn free_axes(&self) -> Vec<usize> {
        self.components
            .iter()
            .positions(|c| *c == ModulationComponent::Free)
            .collect()
    }

    /// Checks if a numerical wave vector agrees with this one on every commensurate component.
    pub fn is_compatible(&self, q: &Vector3<f64>, tol: f64) -> bool {
        self.components
            .iter()
            .zip(q.iter())
            .all(|(component, x)| match component {
                ModulationComponent::Rational(..) => {
                    (component.rational_value() - x).abs() < tol
                }
                ModulationComponent::Free => true,
            })
    }

    /// Returns the symbol of the wave vector, *e.g.* `(a0g)` or `(1/2 0 g)`.
    pub fn symbol(&self) -> String {
        let tokens = self
            .components
            .iter()
            .enumerate()
            .map(|(axis, c)| c.token(axis))
            .collect_vec();
        let sep = if tokens.iter().any(|t| t.len() > 1) { " " } else { "" };
        format!("({})", tokens.join(sep))
    }
}

impl FromStr for ModulationVector {
    type Err = SymmetryError;

    /// Parses the contents of a modulation symbol, with or without the enclosing parentheses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let chars = inner
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect_vec();
        let mut components = Vec::with_capacity(3);
        let mut i = 0;
        while i < chars.len() {
            let axis = components.len();
            if axis == 3 {
                return Err(superspace_error(format!(
                    "modulation symbol `{s}` has more than three components"
                )));
            }
            let component = match chars[i] {
                '0' => ModulationComponent::Rational(0, 1),
                '1' if chars.get(i + 1) == Some(&'/') => {
                    let den = chars
                        .get(i + 2)
                        .and_then(|c| c.to_digit(10))
                        .filter(|d| *d == 2 || *d == 3)
                        .ok_or_else(|| {
                            superspace_error(format!(
                                "unsupported fraction in modulation symbol `{s}`"
                            ))
                        })?;
                    i += 2;
                    ModulationComponent::Rational(1, den as i32)
                }
                '1' => ModulationComponent::Rational(1, 1),
                c if c == FREE_LETTERS[axis] => ModulationComponent::Free,
                c if FREE_LETTERS.contains(&c) => {
                    return Err(superspace_error(format!(
                        "`{c}` is out of place in modulation symbol `{s}`"
                    )));
                }
                c => {
                    return Err(superspace_error(format!(
                        "illegal character `{c}` in modulation symbol `{s}`"
                    )));
                }
            };
            components.push(component);
            i += 1;
        }
        let components: [ModulationComponent; 3] = components.try_into().map_err(|_| {
            superspace_error(format!(
                "modulation symbol `{s}` does not have three components"
            ))
        })?;
        let vector = Self { components };
        if vector.free_axes().is_empty() {
            return Err(superspace_error(format!(
                "modulation symbol `{s}` has no incommensurate component"
            )));
        }
        Ok(vector)
    }
}

impl fmt::Display for ModulationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// =================
// Generator offsets
// =================

/// Returns the internal-space translation named by a generator-symbol letter.
pub fn generator_offset(letter: char) -> Option<f64> {
    match letter {
        '0' => Some(0.0),
        's' => Some(1.0 / 2.0),
        't' => Some(1.0 / 3.0),
        'q' => Some(1.0 / 4.0),
        'h' => Some(1.0 / 6.0),
        _ => None,
    }
}

/// A parsed superspace symbol: a modulation vector and the generator offsets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuperspaceSymbol {
    /// The modulation wave vector.
    pub modulation: ModulationVector,

    /// The generator letters as written.
    pub generator_symbol: String,

    /// The internal-space translation for each generator letter.
    pub offsets: Vec<f64>,
}

impl FromStr for SuperspaceSymbol {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (Some(open), Some(close)) = (trimmed.find('('), trimmed.find(')')) else {
            return Err(superspace_error(format!(
                "`{s}` has no parenthesised modulation part"
            )));
        };
        if open != 0 || close < open {
            return Err(superspace_error(format!(
                "`{s}` must start with the parenthesised modulation part"
            )));
        }
        let modulation = trimmed[open..=close].parse::<ModulationVector>()?;
        let generator_symbol = trimmed[close + 1..]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>();
        let offsets = generator_symbol
            .chars()
            .map(|c| {
                generator_offset(c).ok_or_else(|| {
                    superspace_error(format!("illegal generator letter `{c}` in `{s}`"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            modulation,
            generator_symbol,
            offsets,
        })
    }
}

impl fmt::Display for SuperspaceSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.modulation, self.generator_symbol)
    }
}
