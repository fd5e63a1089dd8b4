use crate::client::clock::MonotonicClock;
use crate::client::config::Config;
use crate::client::error::{ClientError, Result};
use crate::client::logging::Logger;
use crate::client::reader::Reader;
use crate::client::socket::{connect, split, Endpoint};
use crate::client::statistics::StatsWindow;
use crate::client::writer::Writer;
use std::sync::Arc;
use std::thread;
use tracing::{debug, Level};

/// Why each half of the client stopped
#[derive(Debug)]
pub struct RunOutcome {
    pub writer: ClientError,
    pub reader: ClientError,
}

/// Connects to the target and drives one writer and one reader over the
/// same connection until both have faulted
pub struct Runner {
    address: String,
    packet_size: usize,
    stats_period: usize,
    percentiles: bool,
    logger: Arc<dyn Logger>,
}

impl Runner {
    pub fn new(config: &Config, logger: Arc<dyn Logger>) -> Self {
        Self {
            address: config.address.clone(),
            packet_size: usize::try_from(config.packet_size).unwrap_or(0),
            stats_period: config.stats_period,
            percentiles: config.percentiles,
            logger,
        }
    }

    /// Blocks until both the writer and the reader have stopped.
    ///
    /// Only resolution, connection and thread startup failures are returned
    /// as errors; faults on the established connection end up in the outcome.
    pub fn run(&self) -> Result<RunOutcome> {
        let endpoint = Endpoint::parse(&self.address);
        self.logger.log(
            Level::INFO,
            &format!(
                "opening connection to host = {}, port = {}",
                endpoint.host, endpoint.port
            ),
        );

        let addr = endpoint.resolve()?;
        let stream = connect(addr)?;
        self.logger
            .log(Level::INFO, &format!("connected to {}", self.address));

        let (read_half, write_half) = split(stream)?;
        let window = if self.percentiles {
            StatsWindow::with_percentiles(self.stats_period)?
        } else {
            StatsWindow::new(self.stats_period)?
        };
        let writer = Writer::new(
            write_half,
            MonotonicClock,
            self.packet_size,
            Arc::clone(&self.logger),
        )?;
        let reader = Reader::new(
            read_half,
            MonotonicClock,
            self.packet_size,
            window,
            Arc::clone(&self.logger),
        )?;

        self.logger.log(Level::INFO, "starting writer");
        let writer_handle = thread::Builder::new()
            .name("writer".into())
            .spawn(move || writer.run())?;

        self.logger.log(Level::INFO, "starting reader");
        let reader_handle = thread::Builder::new()
            .name("reader".into())
            .spawn(move || reader.run())?;

        let writer = writer_handle
            .join()
            .unwrap_or_else(|_| ClientError::Measurement("writer thread panicked".into()));
        debug!(reason = %writer, "Writer joined");
        let reader = reader_handle
            .join()
            .unwrap_or_else(|_| ClientError::Measurement("reader thread panicked".into()));
        debug!(reason = %reader, "Reader joined");

        self.logger.log(Level::INFO, "finished");
        Ok(RunOutcome { writer, reader })
    }
}
