//! Packet echo loop and connection counters

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

/// Counters shared by every connection thread.
///
/// Updated with relaxed atomics from the echo loops; read for summaries only.
#[derive(Debug, Default)]
pub struct EchoCounters {
    packets_received: AtomicU64,
    packets_sent: AtomicU64,
    errors: AtomicU64,
}

impl EchoCounters {
    pub fn increment_received(&self) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sent(&self) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn packets_received(&self) -> u64 {
        self.packets_received.load(Ordering::Relaxed)
    }

    pub fn packets_sent(&self) -> u64 {
        self.packets_sent.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

/// Echo fixed-size packets back verbatim until the client goes away.
///
/// Returns the number of packets echoed on this connection. A clean
/// disconnect on a packet boundary is not an error.
pub fn echo_packets<S: Read + Write>(
    stream: &mut S,
    packet_size: usize,
    counters: &EchoCounters,
) -> io::Result<u64> {
    let mut buf = vec![0u8; packet_size];
    let mut echoed = 0u64;

    loop {
        // TCP is stream-based, so read_exact assembles exactly one packet
        match stream.read_exact(&mut buf) {
            Ok(()) => counters.increment_received(),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(echoed),
            Err(e) => {
                counters.increment_error();
                return Err(e);
            }
        }

        if let Err(e) = stream.write_all(&buf) {
            counters.increment_error();
            return Err(e);
        }
        counters.increment_sent();
        echoed += 1;
    }
}

/// TCP echo peer for the latency client
pub struct EchoServer {
    listener: TcpListener,
    packet_size: usize,
    counters: Arc<EchoCounters>,
}

impl EchoServer {
    pub fn bind(addr: &str, packet_size: usize) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self {
            listener,
            packet_size,
            counters: Arc::new(EchoCounters::default()),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn counters(&self) -> Arc<EchoCounters> {
        Arc::clone(&self.counters)
    }

    /// Accept clients forever, one thread per connection
    pub fn run(self) {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => {
                    self.counters.increment_error();
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn spawn_connection(&self, mut stream: TcpStream) {
        let peer_addr = stream.peer_addr().ok();
        info!(peer = ?peer_addr, "New client connected");

        let counters = Arc::clone(&self.counters);
        let packet_size = self.packet_size;
        thread::spawn(move || match echo_packets(&mut stream, packet_size, &counters) {
            Ok(echoed) => {
                info!(
                    peer = ?peer_addr,
                    packets_echoed = echoed,
                    total_received = counters.packets_received(),
                    total_sent = counters.packets_sent(),
                    "Client disconnected"
                );
            }
            Err(e) => {
                error!(
                    error = %e,
                    peer = ?peer_addr,
                    total_errors = counters.errors(),
                    "Connection failed"
                );
            }
        });
        debug!("Connection thread spawned");
    }
}
