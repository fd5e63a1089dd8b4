//! Client side of lbstats: resolves the target, connects, and runs the
//! writer and reader halves over one TCP connection

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod reader;
pub mod runner;
pub mod socket;
pub mod statistics;
pub mod writer;

pub use clock::{Clock, MonotonicClock};
pub use config::Config;
pub use constants::*;
pub use error::{ClientError, Result};
pub use logging::{init_logging, init_logging_with_config, Logger, MemoryLogger, TracingLogger};
pub use reader::Reader;
pub use runner::{RunOutcome, Runner};
pub use socket::{connect, split, Endpoint, PacketSink, PacketSource};
pub use statistics::{Percentiles, StatsWindow, WindowReport};
pub use writer::Writer;
