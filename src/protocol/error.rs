use thiserror::Error;

/// Protocol-level errors for packet buffers
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid packet size: expected at least {minimum}, got {actual}")]
    InvalidPacketSize { minimum: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
