use crate::client::constants::*;
use crate::client::error::{ClientError, Result};
use hdrhistogram::Histogram;
use std::fmt;
use tracing::{debug, warn};

/// Latency distribution of one window, in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percentiles {
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Summary emitted when a window closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowReport {
    pub packets: u64,
    pub average_us: i64,
    pub percentiles: Option<Percentiles>,
}

impl fmt::Display for WindowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "packet average lifespan: {:>10} us", self.average_us)?;
        if let Some(p) = self.percentiles {
            write!(
                f,
                ", p50: {} us, p99: {} us, max: {} us",
                p.p50_us, p.p99_us, p.max_us
            )?;
        }
        Ok(())
    }
}

/// Round-trip counters for the current packet window.
///
/// Owned by the reader. Elapsed values are signed: a packet that appears to
/// arrive before it was sent is counted as-is.
pub struct StatsWindow {
    period: u64,
    packets_seen: u64,
    total_elapsed_ns: i64,
    hist: Option<Histogram<u64>>,
}

impl StatsWindow {
    /// Window that reports the average only
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(ClientError::Argument("stats period must be > 0".into()));
        }
        Ok(Self {
            period: period as u64,
            packets_seen: 0,
            total_elapsed_ns: 0,
            hist: None,
        })
    }

    /// Window that also tracks the latency distribution
    pub fn with_percentiles(period: usize) -> Result<Self> {
        let mut window = Self::new(period)?;
        let hist = Histogram::<u64>::new_with_bounds(
            HISTOGRAM_LOW_BOUND_NS,
            HISTOGRAM_HIGH_BOUND_NS,
            HISTOGRAM_SIGNIFICANT_DIGITS,
        )
        .map_err(|e| ClientError::Measurement(format!("Failed to create histogram: {}", e)))?;
        window.hist = Some(hist);
        Ok(window)
    }

    /// True once `period` packets have been recorded
    pub fn is_complete(&self) -> bool {
        self.packets_seen == self.period
    }

    /// Count one packet
    pub fn record(&mut self, elapsed_ns: i64) {
        self.packets_seen += 1;
        self.total_elapsed_ns = self.total_elapsed_ns.saturating_add(elapsed_ns);

        if let Some(hist) = self.hist.as_mut() {
            let clamped = (elapsed_ns.max(0) as u64)
                .clamp(HISTOGRAM_LOW_BOUND_NS, HISTOGRAM_HIGH_BOUND_NS);
            if let Err(e) = hist.record(clamped) {
                warn!(elapsed_ns = elapsed_ns, error = %e, "Failed to record latency");
            }
        }
    }

    /// Close the window: compute its summary and reset every counter
    pub fn take_report(&mut self) -> WindowReport {
        let average_ns = self.total_elapsed_ns / self.period as i64;
        let percentiles = self.hist.as_mut().map(|hist| {
            let p = Percentiles {
                p50_us: hist.value_at_quantile(0.50) / NANOS_PER_MICRO as u64,
                p99_us: hist.value_at_quantile(0.99) / NANOS_PER_MICRO as u64,
                max_us: hist.max() / NANOS_PER_MICRO as u64,
            };
            hist.reset();
            p
        });

        let report = WindowReport {
            packets: self.packets_seen,
            average_us: average_ns / NANOS_PER_MICRO,
            percentiles,
        };
        debug!(
            packets = report.packets,
            total_elapsed_ns = self.total_elapsed_ns,
            average_us = report.average_us,
            "Window closed"
        );

        self.packets_seen = 0;
        self.total_elapsed_ns = 0;
        report
    }

    pub fn packets_seen(&self) -> u64 {
        self.packets_seen
    }

    pub fn total_elapsed_ns(&self) -> i64 {
        self.total_elapsed_ns
    }
}
