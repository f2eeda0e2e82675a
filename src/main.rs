mod cli;

use clap::Parser;
use std::process::ExitCode;

use seo_health_check::lifecycle;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    lifecycle::init_logging(&cli.log_level);

    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
