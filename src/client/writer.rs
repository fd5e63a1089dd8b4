use crate::client::clock::Clock;
use crate::client::constants::PACING_INTERVAL;
use crate::client::error::{ClientError, Result};
use crate::client::logging::Logger;
use crate::client::socket::PacketSink;
use crate::protocol::PacketBuffer;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, Level};

/// Outbound half of the client: paces, stamps and sends packets
pub struct Writer<S, C> {
    sink: S,
    clock: C,
    packet: PacketBuffer,
    pacing: Duration,
    packets_sent: u64,
    logger: Arc<dyn Logger>,
}

impl<S: PacketSink, C: Clock> Writer<S, C> {
    pub fn new(sink: S, clock: C, packet_size: usize, logger: Arc<dyn Logger>) -> Result<Self> {
        Ok(Self {
            sink,
            clock,
            packet: PacketBuffer::new(packet_size)?,
            pacing: PACING_INTERVAL,
            packets_sent: 0,
            logger,
        })
    }

    /// Override the pause between sends
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Send one stamped packet
    pub fn step(&mut self) -> Result<()> {
        if !self.pacing.is_zero() {
            thread::sleep(self.pacing);
        }

        let timestamp_ns = self.clock.now_ns();
        self.packet.stamp(timestamp_ns);

        let written = self.sink.send_packet(self.packet.as_bytes())?;
        if written != self.packet.len() {
            return Err(ClientError::ProtocolViolation {
                operation: "send",
                expected: self.packet.len(),
                actual: written,
            });
        }

        self.packets_sent += 1;
        debug!(
            timestamp_ns = timestamp_ns,
            packets_sent = self.packets_sent,
            "Packet stamped and sent"
        );
        Ok(())
    }

    /// Send until the first fault, which is logged and returned
    pub fn run(mut self) -> ClientError {
        let fault = loop {
            if let Err(e) = self.step() {
                break e;
            }
        };
        self.logger.log(Level::ERROR, &fault.to_string());
        self.logger.log(Level::INFO, "writer has stopped");
        fault
    }

    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }
}
