use std::sync::OnceLock;
use std::time::Instant;

/// Source of monotonic timestamps in nanoseconds
pub trait Clock {
    fn now_ns(&self) -> i64;
}

static ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Monotonic clock shared by every thread of the process.
///
/// All instances measure from one process-wide origin, so a timestamp taken
/// by the writer thread can be subtracted from one taken by the reader thread.
/// Unaffected by wall-clock adjustments.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now_ns(&self) -> i64 {
        let elapsed = ORIGIN.get_or_init(Instant::now).elapsed().as_nanos();
        i64::try_from(elapsed).unwrap_or(i64::MAX)
    }
}
