//! Wire format shared by the latency client and the echo peer

pub mod error;
pub mod message;

pub use error::ProtocolError;
pub use message::{PacketBuffer, PACKET_HEADER_SIZE};
