// Entrypoint for the CLI application.
// - Keeps `main` small: load credentials, build the API client and hand it
//   to the workflow.
// - This is the only place that turns errors and outcomes into exit codes.

use chrono::Utc;
use clap::Parser;
use inactive_sensors::{
    api::ApiClient,
    cli::Cli,
    config::{self, DEFAULT_CONFIG_PATH},
    ui::{Operator, Terminal},
    workflow::{self, Outcome},
};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Warnings and errors only, unless RUST_LOG asks for more.
    if let Err(e) = SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
    {
        eprintln!("Failed to initialize logger: {e}");
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    let config = config::load_config(Path::new(DEFAULT_CONFIG_PATH))?;
    let api = ApiClient::new(&config)?;

    let mut operator = Terminal;
    let days = match cli.days {
        Some(days) => days,
        None => operator.ask_days()?,
    };

    // The deletion log lands in the working directory.
    workflow::run(&api, &mut operator, days, Path::new("."), Utc::now())
}
