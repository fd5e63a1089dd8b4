//! Constants used throughout the client

use std::time::Duration;

/// Pause between two consecutive packet sends
pub const PACING_INTERVAL: Duration = Duration::from_micros(100);

/// Host used when the address carries no `host:` part
pub const DEFAULT_HOST: &str = "localhost";

/// Nanoseconds per microsecond
pub const NANOS_PER_MICRO: i64 = 1_000;

/// Histogram lower bound in nanoseconds
pub const HISTOGRAM_LOW_BOUND_NS: u64 = 1;

/// Histogram upper bound in nanoseconds
pub const HISTOGRAM_HIGH_BOUND_NS: u64 = 60_000_000_000;

/// Histogram significant digits for precision
pub const HISTOGRAM_SIGNIFICANT_DIGITS: u8 = 3;

/// Exit code for missing or invalid arguments
pub const EXIT_ARGUMENTS: i32 = 1;

/// Exit code for a packet size below the header size
pub const EXIT_PACKET_TOO_SMALL: i32 = 2;

/// Exit code for resolution or connection failures
pub const EXIT_CONNECTION_FAILED: i32 = 3;

/// Usage line printed on argument errors
pub const USAGE: &str = "usage: lbstats [HOST:]PORT PACKETSIZE STATSPERIOD";
