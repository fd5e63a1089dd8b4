//! lbstats - Round-trip latency measurement for TCP paths
//!
//! This library keeps a single TCP connection under continuous fixed-rate load:
//! a writer thread stamps fixed-size packets with a monotonic send time, a reader
//! thread receives the echoed packets back on the same connection and reports the
//! average round-trip time over a window of packets. Useful for benchmarking
//! network paths, proxies and load balancers that echo the stream back.

pub mod client;
pub mod protocol;
pub mod server;
