use std::process::ExitCode;

use clap::Parser;

use review_insights::cli::Cli;
use review_insights::config::{self, PipelineSettings};
use review_insights::runner::{run_stage, Stage};

fn main() -> ExitCode {
    let cli = Cli::parse();
    review_insights::init_tracing();
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let settings = match PipelineSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let stage = Stage::from(cli.command);
    let outcome = run_stage(&stage, &settings);

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Cannot render run outcome: {e}"),
    }

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
