//! Formatted `SsgSym` output.
//!
//! Driver output goes to the `ssgsym-output` log target, which the binary routes to the console
//! or to an output file. Titles and subtitles are rendered once into lines and then either logged
//! or written to a formatter.

use std::fmt;

use log;

#[cfg(test)]
#[path = "format_tests.rs"]
mod format_tests;

/// Minimum inner width of a title banner.
const TITLE_WIDTH: usize = 83;

/// Logs a warning to the `ssgsym-output` logger.
macro_rules! ssgsym_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::warn!(target: "ssgsym-output", $fmt, $($($arg)*)?); }
}

/// Logs a main output line to the `ssgsym-output` logger.
macro_rules! ssgsym_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "ssgsym-output", $fmt, $($($arg)*)?) }
}

pub(crate) use {ssgsym_output, ssgsym_warn};

/// Renders a boxed section title, centred in a banner at least [`TITLE_WIDTH`] wide.
fn title_lines(title: &str) -> [String; 3] {
    let width = title.chars().count().max(TITLE_WIDTH);
    let rule = "─".repeat(width + 4);
    [
        format!("┌{rule}┐"),
        format!("│§ {title:^width$} §│"),
        format!("└{rule}┘"),
    ]
}

/// Renders a subtitle underlined to its own length.
fn subtitle_lines(subtitle: &str) -> [String; 2] {
    [
        subtitle.to_string(),
        "═".repeat(subtitle.chars().count()),
    ]
}

/// Logs a section title to the `ssgsym-output` logger.
pub(crate) fn log_title(title: &str) {
    title_lines(title)
        .iter()
        .for_each(|line| ssgsym_output!("{line}"));
}

/// Logs a subtitle to the `ssgsym-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    subtitle_lines(subtitle)
        .iter()
        .for_each(|line| ssgsym_output!("{line}"));
}

/// Writes a subtitle into a [`fmt::Display`] implementation.
pub(crate) fn write_subtitle(f: &mut fmt::Formatter<'_>, subtitle: &str) -> fmt::Result {
    subtitle_lines(subtitle)
        .iter()
        .try_for_each(|line| writeln!(f, "{line}"))
}

/// Turns a boolean into `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// A trait for logging the [`fmt::Display`] output of parameters and results line by line.
pub(crate) trait SsgSymOutput: fmt::Display {
    fn log_output_display(&self) {
        self.to_string()
            .lines()
            .for_each(|line| ssgsym_output!("{line}"));
    }
}

impl<T> SsgSymOutput for T where T: fmt::Display {}
