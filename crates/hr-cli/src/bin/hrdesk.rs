use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use hr_cli::{cli::Cli, commands, init_tracing};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    if commands::run(cli).await? { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::FAILURE) }
}
