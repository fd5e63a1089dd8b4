use crate::client::error::{ClientError, Result};
use crate::protocol::PACKET_HEADER_SIZE;
use clap::Parser;
use tracing::debug;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Parser, Debug, Clone)]
#[command(name = "lbstats")]
#[command(about = "Round-trip latency meter for TCP paths, proxies and load balancers")]
pub struct Config {
    /// Target as HOST:PORT, or PORT alone for localhost
    #[arg(value_name = "[HOST:]PORT")]
    pub address: String,

    /// Size of every packet in bytes (at least 8)
    #[arg(value_name = "PACKETSIZE", allow_negative_numbers = true)]
    pub packet_size: i64,

    /// Number of packets averaged per report
    #[arg(value_name = "STATSPERIOD")]
    pub stats_period: usize,

    /// Arguments past STATSPERIOD are ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,

    /// Also report p50/p99/max latency for every window
    #[arg(long)]
    pub percentiles: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl Config {
    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        if self.packet_size < PACKET_HEADER_SIZE as i64 {
            return Err(ClientError::PacketTooSmall {
                minimum: PACKET_HEADER_SIZE,
                actual: self.packet_size,
            });
        }
        if self.stats_period == 0 {
            return Err(ClientError::Argument("STATSPERIOD must be > 0".into()));
        }
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ClientError::Argument(format!(
                "log_level must be one of: {}",
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        debug!("Configuration validated successfully");
        Ok(())
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.to_lowercase() == "json"
    }
}
