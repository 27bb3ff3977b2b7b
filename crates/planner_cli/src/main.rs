//! Build Planner - command line

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use planner_cli::cli::{run, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout carries only the plan.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match run(&cli.command) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
