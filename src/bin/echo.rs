use anyhow::Result;
use clap::Parser;
use colored::*;
use lbstats::client::init_logging_with_config;
use lbstats::server::{EchoServer, ServerConfig};
use tracing::{error, info};

fn main() {
    let config = ServerConfig::parse();

    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        eprintln!("{} {}", "Configuration error:".red().bold(), e);
        std::process::exit(1);
    }

    if let Err(e) = run(config) {
        error!(error = %e, "Echo server failed");
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(config: ServerConfig) -> Result<()> {
    let addr = config.address();

    let server = EchoServer::bind(&addr, config.packet_size).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            anyhow::anyhow!(
                "Failed to bind to {}: Address already in use. Try a different port or ensure no other process is using it.",
                addr
            )
        } else {
            anyhow::Error::new(e).context(format!("Failed to bind to {}", addr))
        }
    })?;

    info!(
        address = %server.local_addr()?,
        packet_size = config.packet_size,
        "lbstats echo peer listening"
    );

    server.run();
    Ok(())
}
