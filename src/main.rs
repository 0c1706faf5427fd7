mod analysis;
mod app;
mod chat;
mod check;
mod cli;
mod config;
mod consts;
mod error;
mod generator;
mod output;
mod telemetry;
mod utils;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use cli::Cli;
use config::Config;
use utils::init_logging;

fn main() {
    let cli = Cli::parse();

    if cli.command.is_some() && cli.has_mode_flag() {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "mode flags cannot be combined with the `generate` subcommand",
            )
            .exit();
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // CLI args take precedence over config file
    let cli = cli.with_config(&config);
    init_logging(cli.debug);

    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }
    if let Some(path) = &config.source {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    if let Err(e) = app::run(&cli, &config) {
        tracing::debug!(error = ?e, "run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
