//! # Pool Server - Entry Point
//! src/main.rs
//!
//! `./server <port> <threads> <queue_size>`
//!
//! Los logs van a stderr; stdout solo lleva la línea final de apagado.

use pool_server::config::Config;
use pool_server::error::ServerError;
use pool_server::server::Server;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::new();

    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config) {
        error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}

fn init_logging(filter: &str) -> Result<(), ServerError> {
    let filter = EnvFilter::try_new(filter).map_err(|e| ServerError::Logging(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}

fn run(config: Config) -> Result<(), ServerError> {
    let server = Server::bind(config)?;

    let handle = server.shutdown_handle()?;
    ctrlc::set_handler(move || {
        info!("termination signal received");
        handle.shutdown();
    })?;

    let summary = server.run()?;

    println!(
        "Server stopped. Last request: {}",
        summary.last_path.as_deref().unwrap_or("none")
    );

    match serde_json::to_string(&summary) {
        Ok(json) => info!(summary = %json, "final statistics"),
        Err(e) => warn!(error = %e, "could not serialize statistics"),
    }
    Ok(())
}
