// src/main.rs

use clap::Parser;

use stagehand::cli::CliArgs;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if let Err(e) = stagehand::logging::init_logging(args.log_level) {
        eprintln!("failed to initialise logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = stagehand::run(args).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
