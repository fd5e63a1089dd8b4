use crate::client::constants::*;
use crate::protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Argument error: {0}")]
    Argument(String),

    #[error("Packet size must be at least {minimum} bytes, got {actual}")]
    PacketTooSmall { minimum: usize, actual: i64 },

    #[error("Failed to resolve {endpoint}: {reason}")]
    Resolution { endpoint: String, reason: String },

    #[error("Failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation}() transferred {actual} bytes, expected {expected}")]
    ProtocolViolation {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("No data, connection closed by peer")]
    PeerClosed,

    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Measurement error: {0}")]
    Measurement(String),
}

impl ClientError {
    /// Process exit code for a failure that ends the program
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::PacketTooSmall { .. } => EXIT_PACKET_TOO_SMALL,
            ClientError::Resolution { .. } | ClientError::Connect { .. } => EXIT_CONNECTION_FAILED,
            _ => EXIT_ARGUMENTS,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
