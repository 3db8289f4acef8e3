mod cli;
mod commands;
mod config;

use clap::Parser;
use site_logging::site_error;

use crate::cli::Cli;

/// Exits non-zero only when the configuration cannot be loaded; failures
/// inside a command are logged and the process still succeeds.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    site_logging::initialize(cli.log_destination(), cli.log_level());

    let config = config::load_config(cli.config.as_deref())?;
    if let Err(err) = commands::run(cli.command, &config) {
        site_error!("{:#}", err);
    }
    Ok(())
}
