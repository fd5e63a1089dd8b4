use crate::client::constants::DEFAULT_HOST;
use crate::client::error::{ClientError, Result};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use tracing::{debug, warn};

/// Outbound direction of a connection
pub trait PacketSink {
    /// Hand the whole packet to the transport in a single send call,
    /// returning the number of bytes the transport accepted
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize>;
}

/// Inbound direction of a connection
pub trait PacketSource {
    /// Read until `buf` is full or the stream ends.
    ///
    /// Returns the number of bytes assembled: `buf.len()` for a complete
    /// packet, `0` when the peer closed before sending anything, or a short
    /// count when the stream ended mid-packet.
    fn recv_packet(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl PacketSink for TcpStream {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        let bytes_sent = self.write(packet)?;
        debug!(bytes_sent = bytes_sent, "Packet sent");
        Ok(bytes_sent)
    }
}

impl PacketSource for TcpStream {
    fn recv_packet(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        debug!(bytes_received = filled, "Packet received");
        Ok(filled)
    }
}

/// Target as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: String,
}

impl Endpoint {
    /// Split `host:port` on the first colon; a bare `port` targets localhost
    pub fn parse(address: &str) -> Self {
        match address.split_once(':') {
            Some((host, port)) => Self {
                host: host.to_string(),
                port: port.to_string(),
            },
            None => Self {
                host: DEFAULT_HOST.to_string(),
                port: address.to_string(),
            },
        }
    }

    /// Resolve to the first IPv4 address of the host
    pub fn resolve(&self) -> Result<SocketAddr> {
        debug!(host = %self.host, port = %self.port, "Resolving endpoint");
        let port: u16 = self
            .port
            .parse()
            .map_err(|e| self.resolution_error(format!("invalid port: {}", e)))?;

        let mut addrs = (self.host.as_str(), port)
            .to_socket_addrs()
            .map_err(|e| {
                warn!(error = %e, "Address lookup failed");
                self.resolution_error(e.to_string())
            })?;

        let addr = addrs
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| self.resolution_error("no IPv4 address found".into()))?;
        debug!(addr = %addr, "Endpoint resolved");
        Ok(addr)
    }

    fn resolution_error(&self, reason: String) -> ClientError {
        ClientError::Resolution {
            endpoint: self.to_string(),
            reason,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Open a TCP connection to `addr`, relying on the OS connect timeout
pub fn connect(addr: SocketAddr) -> Result<TcpStream> {
    debug!(addr = %addr, "Connecting TCP socket");
    let stream = TcpStream::connect(addr).map_err(|e| {
        warn!(error = %e, "Failed to connect socket");
        ClientError::Connect {
            endpoint: addr.to_string(),
            source: e,
        }
    })?;
    debug!("Socket connected successfully");
    Ok(stream)
}

/// Split a connected stream into its read and write handles.
///
/// Both handles refer to the same socket; each direction is used by exactly
/// one thread.
pub fn split(stream: TcpStream) -> Result<(TcpStream, TcpStream)> {
    let reader = stream.try_clone().map_err(|e| ClientError::Connect {
        endpoint: stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "peer".to_string()),
        source: e,
    })?;
    Ok((reader, stream))
}


#[cfg(test)]
pub use tests::{MockPacketSink, MockPacketSource};
