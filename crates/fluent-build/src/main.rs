//! Fluent Build - Entry point

use anyhow::Context;
use clap::Parser;
use tracing::error;

use fluent_build::{run, Cli};
use fluent_telemetry::init_logging;

fn setup(cli: &Cli) -> anyhow::Result<()> {
    init_logging(&cli.log_config()).context("failed to initialize logging")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    match run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            error!(command = ?cli.command, "Command failed: {}", e);
            eprintln!("{}", e.render());
            std::process::exit(1);
        }
    }
}
