//! Coordinate-triplet text for symmetry operators, such as `-x+y, y, -z+1/2`.

use std::str::FromStr;

use itertools::Itertools;
use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

use crate::auxiliary::misc::{gcd, is_integral};
use crate::symmetry::symmetry_operator::{SuperspaceOperator, SymmetryOperator};
use crate::symmetry::{SymbolDiagnostic, SymmetryError};

#[cfg(test)]
#[path = "symmetry_operator_text_tests.rs"]
mod symmetry_operator_text_tests;

/// Axis names for three-dimensional operators.
pub const AXES_3D: [&str; 3] = ["x", "y", "z"];

/// Axis names for (3+1)-dimensional operators.
pub const AXES_4D: [&str; 4] = ["x", "y", "z", "t"];

const TEXT_TOLERANCE: f64 = 1.0e-4;

/// Formats a value as a fraction with a denominator dividing 12, such as `1/6`, `2/3` or `3/4`.
///
/// Values that are not multiples of $`1/12`$ are written as decimals.
pub fn format_fraction(value: f64) -> String {
    let twelfths = value * 12.0;
    if !is_integral(twelfths, TEXT_TOLERANCE * 12.0) {
        return format!("{value:.4}");
    }
    let num = twelfths.round() as i64;
    let div = gcd(num, 12).max(1);
    let (num, den) = (num / div, 12 / div);
    if den == 1 {
        format!("{num}")
    } else {
        format!("{num}/{den}")
    }
}

/// Formats the rows of an operator.
///
/// # Arguments
///
/// * `rows` - An iterator over `(rotation row, translation component)` pairs.
/// * `axes` - The names of the coordinate axes.
///
/// # Returns
///
/// The comma-separated coordinate-triplet string.
pub(crate) fn format_operator_rows<I>(rows: I, axes: &[&str]) -> String
where
    I: Iterator<Item = (Vec<f64>, f64)>,
{
    rows.map(|(coeffs, t)| {
        let mut row = String::new();
        for (c, axis) in coeffs.iter().zip(axes.iter()) {
            if c.abs() < TEXT_TOLERANCE {
                continue;
            }
            let sign = if *c < 0.0 {
                "-"
            } else if row.is_empty() {
                ""
            } else {
                "+"
            };
            let magnitude = if (c.abs() - 1.0).abs() < TEXT_TOLERANCE {
                String::new()
            } else {
                format_fraction(c.abs())
            };
            row.push_str(&format!("{sign}{magnitude}{axis}"));
        }
        if t.abs() >= TEXT_TOLERANCE {
            let sign = if t < 0.0 {
                "-"
            } else if row.is_empty() {
                ""
            } else {
                "+"
            };
            row.push_str(&format!("{sign}{}", format_fraction(t.abs())));
        }
        if row.is_empty() {
            "0".to_string()
        } else {
            row
        }
    })
    .join(", ")
}

fn malformed(msg: String) -> SymmetryError {
    SymmetryError::Symbol(SymbolDiagnostic::MalformedOutput(msg))
}

fn parse_number(text: &str) -> Result<f64, SymmetryError> {
    let parsed = match text.split_once('/') {
        Some((num, den)) => num
            .parse::<f64>()
            .ok()
            .zip(den.parse::<f64>().ok())
            .filter(|(_, d)| *d != 0.0)
            .map(|(n, d)| n / d),
        None => text.parse::<f64>().ok(),
    };
    parsed.ok_or_else(|| malformed(format!("cannot read number `{text}`")))
}

/// Parses a coordinate-triplet string into rotation rows and translation components.
///
/// # Arguments
///
/// * `text` - The operator string, with one comma-separated term per axis.
/// * `axes` - The names of the coordinate axes.
///
/// # Returns
///
/// The rotation rows and translation components, or a symbol error if the text is malformed.
pub fn parse_operator_rows(
    text: &str,
    axes: &[&str],
) -> Result<(Vec<Vec<f64>>, Vec<f64>), SymmetryError> {
    let row_texts = text.split(',').collect_vec();
    if row_texts.len() != axes.len() {
        return Err(malformed(format!(
            "operator `{text}` has {} components instead of {}",
            row_texts.len(),
            axes.len()
        )));
    }
    let mut rows = Vec::with_capacity(axes.len());
    let mut translations = Vec::with_capacity(axes.len());
    for row_text in row_texts {
        let compact = row_text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if compact.is_empty() {
            return Err(malformed(format!("empty component in operator `{text}`")));
        }

        // Split into signed terms.
        let mut terms: Vec<String> = vec![];
        for ch in compact.chars() {
            if (ch == '+' || ch == '-') && terms.last().map_or(false, |t| !t.is_empty()) {
                terms.push(String::new());
            } else if terms.is_empty() {
                terms.push(String::new());
            }
            if let Some(term) = terms.last_mut() {
                term.push(ch);
            }
        }

        let mut row = vec![0.0; axes.len()];
        let mut t = 0.0;
        for term in terms {
            let (sign, body) = match term.strip_prefix('-') {
                Some(rest) => (-1.0, rest),
                None => (1.0, term.strip_prefix('+').unwrap_or(&term)),
            };
            let split = body
                .find(|c: char| c.is_ascii_alphabetic())
                .unwrap_or(body.len());
            let (num_text, axis_text) = body.split_at(split);
            let num_text = num_text.trim_end_matches('*');
            if axis_text.is_empty() {
                t += sign * parse_number(num_text)?;
            } else {
                let axis = axes
                    .iter()
                    .position(|a| *a == axis_text)
                    .ok_or_else(|| malformed(format!("unknown axis `{axis_text}` in `{text}`")))?;
                let coeff = if num_text.is_empty() {
                    1.0
                } else {
                    parse_number(num_text)?
                };
                row[axis] += sign * coeff;
            }
        }
        rows.push(row);
        translations.push(t);
    }
    Ok((rows, translations))
}

impl FromStr for SymmetryOperator {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rows, translations) = parse_operator_rows(s, &AXES_3D)?;
        Ok(SymmetryOperator::new(
            Matrix3::from_fn(|i, j| rows[i][j]),
            Vector3::from_fn(|i, _| translations[i]),
        ))
    }
}

impl FromStr for SuperspaceOperator {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rows, translations) = parse_operator_rows(s, &AXES_4D)?;
        Ok(SuperspaceOperator::new(
            Matrix4::from_fn(|i, j| rows[i][j]),
            Vector4::from_fn(|i, _| translations[i]),
        ))
    }
}
