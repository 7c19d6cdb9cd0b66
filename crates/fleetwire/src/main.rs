mod cli;
mod commands;
mod config;
mod error;
mod status;

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        if let Some(help) = err.help() {
            eprintln!("  {help}");
        }
        std::process::exit(err.exit_code());
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    tracing::debug!(command = ?cli.command, "dispatching command");
    match cli.command {
        Command::Setup => commands::setup::run(&cli.global).await,
        Command::Proxy => commands::proxy::run(&cli.global).await,
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fleetwire", &mut std::io::stdout());
            Ok(())
        }
    }
}
