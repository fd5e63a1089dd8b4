use crate::client::clock::Clock;
use crate::client::error::{ClientError, Result};
use crate::client::logging::Logger;
use crate::client::socket::PacketSource;
use crate::client::statistics::{StatsWindow, WindowReport};
use crate::protocol::PacketBuffer;
use std::sync::Arc;
use tracing::{debug, Level};

/// Inbound half of the client: receives echoed packets and measures them
pub struct Reader<S, C> {
    source: S,
    clock: C,
    packet: PacketBuffer,
    window: StatsWindow,
    logger: Arc<dyn Logger>,
}

impl<S: PacketSource, C: Clock> Reader<S, C> {
    pub fn new(
        source: S,
        clock: C,
        packet_size: usize,
        window: StatsWindow,
        logger: Arc<dyn Logger>,
    ) -> Result<Self> {
        Ok(Self {
            source,
            clock,
            packet: PacketBuffer::new(packet_size)?,
            window,
            logger,
        })
    }

    /// Receive and account for one packet.
    ///
    /// A window is reported when the packet after its last one arrives; that
    /// packet is then counted as the first of the next window.
    pub fn step(&mut self) -> Result<Option<WindowReport>> {
        let expected = self.packet.len();
        let read = self.source.recv_packet(self.packet.as_mut_bytes())?;
        if read == 0 {
            return Err(ClientError::PeerClosed);
        }
        if read != expected {
            return Err(ClientError::ProtocolViolation {
                operation: "recv",
                expected,
                actual: read,
            });
        }

        let report = if self.window.is_complete() {
            let report = self.window.take_report();
            self.logger.log(Level::INFO, &report.to_string());
            Some(report)
        } else {
            None
        };

        let sent_ns = self.packet.timestamp();
        let elapsed_ns = self.clock.now_ns().wrapping_sub(sent_ns);
        self.window.record(elapsed_ns);
        debug!(
            elapsed_ns = elapsed_ns,
            packets_seen = self.window.packets_seen(),
            "Packet measured"
        );

        Ok(report)
    }

    /// Receive until the first fault, which is logged and returned
    pub fn run(mut self) -> ClientError {
        let fault = loop {
            if let Err(e) = self.step() {
                break e;
            }
        };
        match fault {
            ClientError::PeerClosed => self
                .logger
                .log(Level::WARN, "no data, connection closed?"),
            ref e => self.logger.log(Level::ERROR, &e.to_string()),
        }
        self.logger.log(Level::INFO, "reader has stopped");
        fault
    }

    pub fn window(&self) -> &StatsWindow {
        &self.window
    }
}
