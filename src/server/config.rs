//! Echo peer configuration module
//!
//! Provides CLI argument parsing and validation for `lbstats-echo`.

use crate::protocol::PACKET_HEADER_SIZE;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "lbstats-echo")]
#[command(about = "TCP echo peer that closes the lbstats measurement loop")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Bind port
    #[arg(long, default_value_t = 9000)]
    pub port: u16,

    /// Packet size in bytes, must match the client's PACKETSIZE
    #[arg(long, default_value_t = 64)]
    pub packet_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl ServerConfig {
    /// Returns the full bind address as a string (bind:port)
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.port == 0 {
            return Err("port must be > 0".into());
        }

        if self.packet_size < PACKET_HEADER_SIZE {
            return Err(format!("packet_size must be >= {}", PACKET_HEADER_SIZE));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            ));
        }

        debug!("Server configuration validated successfully");
        Ok(())
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.to_lowercase() == "json"
    }
}
