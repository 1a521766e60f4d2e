use std::process;

use anyhow::{self, Context};
use clap::Parser;

use ssgsym::interfaces::cli::{log_heading, logging_config, Cli};
use ssgsym::interfaces::input::Input;
use ssgsym::interfaces::InputHandle;
use ssgsym::io::{read_ssgsym_yaml, write_ssgsym_yaml};

fn run(cli: &Cli) -> Result<(), anyhow::Error> {
    if let Some(template) = cli.template.as_ref() {
        write_ssgsym_yaml(template, &Input::default())
            .with_context(|| "Unable to write the template input file")?;
        println!(
            "Template input written to {}.",
            template.with_extension("yml").display()
        );
        return Ok(());
    }

    let Some(config) = cli.config.as_ref() else {
        anyhow::bail!("No input file given. Use `--config` or `--template`.");
    };
    log4rs::init_config(logging_config(cli.output.as_ref(), cli.verbose)?)
        .with_context(|| "Unable to initialise logging")?;
    log_heading();
    let input: Input = read_ssgsym_yaml(config)
        .with_context(|| format!("Unable to read {}", config.display()))?;
    input.handle()
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}
