//! Command-line interface of the `ssgsym` binary.

use std::path::PathBuf;

use anyhow::{self, format_err};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::io::format::ssgsym_output;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs the `SsgSym` heading to the `ssgsym-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    let width = 85;
    let bar = "─".repeat(width + 2);
    ssgsym_output!("╭{bar}╮");
    for line in [
        "",
        "S S G S Y M",
        "",
        "Space groups and (3+1)-dimensional superspace groups",
        "for crystal structure analysis",
        "",
        version.as_str(),
        "",
    ] {
        ssgsym_output!("│ {line:^width$} │");
    }
    ssgsym_output!("╰{bar}╯");
    ssgsym_output!("");
}

/// Command-line arguments of the `ssgsym` binary.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML input file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the output file. If absent, output goes to the console only.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Writes a template input file to the given path (without extension) and exits.
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Diagnostic verbosity on standard error. May be given twice.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Builds the logging configuration for the `ssgsym` binary.
///
/// Messages on the `ssgsym-output` target go to the console, or to `output` if given, without
/// decoration. All other messages go to standard error at a level set by `verbose`.
pub fn logging_config(output: Option<&PathBuf>, verbose: u8) -> Result<Config, anyhow::Error> {
    let output_appender = if let Some(path) = output {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .append(false)
            .build(path)
            .map_err(|err| format_err!("Unable to open {}: {err}", path.display()))?;
        Appender::builder().build("output", Box::new(file))
    } else {
        let console = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .build();
        Appender::builder().build("output", Box::new(console))
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l:<5})} {t} - {m}{n}")))
        .build();
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Config::builder()
        .appender(output_appender)
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(
            Logger::builder()
                .appender("output")
                .additive(false)
                .build("ssgsym-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|err| format_err!(err))
}
