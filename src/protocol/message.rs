use crate::protocol::error::{ProtocolError, Result};
use tracing::debug;

/// Size of the timestamp header at the start of every packet
pub const PACKET_HEADER_SIZE: usize = 8;

/// Reusable buffer holding one fixed-size packet.
///
/// Bytes `[0, 8)` carry the sender's monotonic timestamp in nanoseconds, in
/// host-native byte order. The remaining bytes are padding and are never
/// interpreted; a peer is expected to echo them back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketBuffer {
    bytes: Vec<u8>,
}

impl PacketBuffer {
    /// Allocate a zeroed packet of `size` bytes
    pub fn new(size: usize) -> Result<Self> {
        if size < PACKET_HEADER_SIZE {
            debug!(
                minimum = PACKET_HEADER_SIZE,
                actual = size,
                "Invalid packet size"
            );
            return Err(ProtocolError::InvalidPacketSize {
                minimum: PACKET_HEADER_SIZE,
                actual: size,
            });
        }
        Ok(Self {
            bytes: vec![0u8; size],
        })
    }

    /// Write the send timestamp into the header, leaving the padding untouched
    pub fn stamp(&mut self, timestamp_ns: i64) {
        self.bytes[..PACKET_HEADER_SIZE].copy_from_slice(&timestamp_ns.to_ne_bytes());
    }

    /// Timestamp currently held in the header
    pub fn timestamp(&self) -> i64 {
        let mut header = [0u8; PACKET_HEADER_SIZE];
        header.copy_from_slice(&self.bytes[..PACKET_HEADER_SIZE]);
        i64::from_ne_bytes(header)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
