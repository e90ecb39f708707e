//! Binary entry point: parse the CLI, snapshot the environment, run the
//! orchestrator, and surface its exit code to the process.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use statewatch::orchestrator::{self, RunOptions};

#[derive(Parser)]
#[command(
    name = "statewatch",
    about = "Bootstrap and state-watch orchestrator",
    version
)]
struct Cli {
    /// Path to a TOML configuration override file.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print the merged configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    orchestrator::run(RunOptions {
        config_path: cli.config,
        env: statewatch::config::process_env(),
        print_config: cli.print_config,
    })
    .await
}
