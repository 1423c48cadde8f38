// src/main.rs
use std::process::ExitCode;

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    poll_site::init_tracing();

    match poll_site::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
