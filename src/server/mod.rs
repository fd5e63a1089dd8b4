//! Echo peer for closing the measurement loop

pub mod config;
pub mod echo;

pub use config::ServerConfig;
pub use echo::{echo_packets, EchoCounters, EchoServer};
