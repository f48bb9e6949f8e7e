mod app_error;
mod cli;
mod commander;
mod config;
mod file_processor;
mod file_updater;
mod llm;
mod logger;
mod response_parser;


use crate::app_error::AppError;
use std::process::exit;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(_) => {
            println!("Workflow completed successfully.");
            exit(0);
        }
        Err(e) => {
            eprintln!("An error occurred: {e}");
            exit(1);
        }
    }
}

async fn run() -> Result<(), AppError> {
    let cli_args = cli::parse_cli_args()?;
    let logger = logger::Logger::new()?;
    println!("Run log directory: {}", logger.log_dir().display());

    let result = commander::run(&logger, cli_args).await;

    if let Err(e) = &result {
        let _ = logger.log_text("final_error.txt", &e.to_string());
    }

    result
}
