use mmv_core::logging::{self, LogSink};

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    if let LogSink::Stderr(err) = logging::init_logging() {
        tracing::warn!("file logging unavailable ({:#}); logging to stderr", err);
    }

    match CliCommand::run_from_args().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("mmv error: {:#}", err);
            std::process::exit(1);
        }
    }
}
