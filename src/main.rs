//! anvil - a really simple static site generator.
//!
//! Reads a declarative `project.yaml`, renders every page in its buildlist
//! through tera templates, copies static assets into the output directory,
//! and optionally watches the project tree to rebuild on change.

mod assets;
mod build;
mod cli;
mod errors;
mod logger;
mod manifest;
mod paths;
mod project;
mod render;
mod watch;

use anyhow::Result;
use build::Anvil;
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use watch::watch_for_changes_blocking;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Fatal failures print one line, `<path>: error: <message>`.
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let anvil = Anvil::new(&cli.project_path, &cli.output, cli.is_clean_build())?;
    anvil.build()?;

    if cli.watch {
        watch_for_changes_blocking(&cli.project_path, &cli.output)?;
    }

    Ok(())
}
