use clap::Parser;
use lbstats::client::{
    connect, split, ClientError, Clock, Config, MemoryLogger, MonotonicClock, PacketSink,
    PacketSource, Reader, Result, Runner, StatsWindow, Writer,
};
use lbstats::protocol::{PacketBuffer, PACKET_HEADER_SIZE};
use lbstats::server::EchoServer;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const PACKET_SIZE: usize = 64;

/// Test helper: drain whatever the client still sends for a while, then drop
/// the stream so further sends fail
fn drain_and_close(mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_millis(20)));
    let deadline = Instant::now() + Duration::from_millis(200);
    let mut sink = vec![0u8; 4096];
    while Instant::now() < deadline {
        match stream.read(&mut sink) {
            Ok(0) => break,
            Ok(_) | Err(_) => {}
        }
    }
}

/// Test helper: echo exactly `count` packets, half-close, then go away
fn spawn_counting_echo_peer(count: usize) -> (SocketAddr, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test peer");
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; PACKET_SIZE];
        for _ in 0..count {
            stream.read_exact(&mut buf).unwrap();
            stream.write_all(&buf).unwrap();
        }
        stream.shutdown(Shutdown::Write).unwrap();
        drain_and_close(stream);
    });
    (addr, handle)
}

/// Sink that always accepts one byte less than asked
struct ShortSink;

impl PacketSink for ShortSink {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        Ok(packet.len() - 1)
    }
}

/// Monotonic clock that remembers every timestamp it hands out
#[derive(Clone, Default)]
struct RecordingClock {
    stamps: Arc<Mutex<Vec<i64>>>,
}

impl Clock for RecordingClock {
    fn now_ns(&self) -> i64 {
        let now = MonotonicClock.now_ns();
        self.stamps.lock().unwrap().push(now);
        now
    }
}

/// Clock frozen at one instant
struct FixedClock(i64);

impl Clock for FixedClock {
    fn now_ns(&self) -> i64 {
        self.0
    }
}

#[test]
fn test_single_window_then_peer_close() -> Result<()> {
    let (addr, peer) = spawn_counting_echo_peer(11);

    let address = addr.to_string();
    let config = Config::try_parse_from(["lbstats", address.as_str(), "64", "10"]).unwrap();
    let logger = Arc::new(MemoryLogger::new());
    let outcome = Runner::new(&config, logger.clone()).run()?;
    peer.join().unwrap();

    assert!(matches!(outcome.reader, ClientError::PeerClosed));
    assert!(matches!(outcome.writer, ClientError::Io(_)));

    // Packets 1-10 form the only complete window; packet 11 opened the next one
    assert_eq!(logger.count_containing("packet average lifespan"), 1);
    assert_eq!(logger.count_containing("connection closed"), 1);
    assert_eq!(logger.count_containing("reader has stopped"), 1);
    assert_eq!(logger.count_containing("writer has stopped"), 1);
    assert_eq!(logger.count_containing("finished"), 1);

    let report = logger
        .lines()
        .into_iter()
        .map(|(_, line)| line)
        .find(|line| line.starts_with("packet average lifespan"))
        .unwrap();
    let average: i64 = report
        .trim_start_matches("packet average lifespan:")
        .trim_end_matches("us")
        .trim()
        .parse()
        .unwrap();
    assert!(average >= 0);
    Ok(())
}

#[test]
fn test_header_survives_round_trip() -> Result<()> {
    let server = EchoServer::bind("127.0.0.1:0", PACKET_SIZE)?;
    let addr = server.local_addr()?;
    let counters = server.counters();
    thread::spawn(move || server.run());

    let mut stream = connect(addr)?;
    let clock = MonotonicClock;
    let mut sent = PacketBuffer::new(PACKET_SIZE)?;
    sent.as_mut_bytes()[PACKET_HEADER_SIZE..].fill(0xAB);

    for _ in 0..5 {
        sent.stamp(clock.now_ns());
        assert_eq!(stream.send_packet(sent.as_bytes())?, PACKET_SIZE);

        let mut received = PacketBuffer::new(PACKET_SIZE)?;
        assert_eq!(stream.recv_packet(received.as_mut_bytes())?, PACKET_SIZE);
        assert_eq!(received.timestamp(), sent.timestamp());
        assert_eq!(received, sent);
    }
    assert_eq!(counters.packets_received(), 5);
    Ok(())
}

#[test]
fn test_writer_stamps_reach_reader() -> Result<()> {
    const PACKETS: usize = 20;
    const READ_AT_NS: i64 = 1_000_000_000_000;

    let server = EchoServer::bind("127.0.0.1:0", PACKET_SIZE)?;
    let addr = server.local_addr()?;
    thread::spawn(move || server.run());

    let stream = connect(addr)?;
    let control = stream.try_clone()?;
    let (read_half, write_half) = split(stream)?;

    let logger = Arc::new(MemoryLogger::new());
    let clock = RecordingClock::default();
    let stamps = Arc::clone(&clock.stamps);
    let writer = Writer::new(write_half, clock, PACKET_SIZE, logger.clone())?;
    let writer_handle = thread::spawn(move || writer.run());

    let mut reader = Reader::new(
        read_half,
        FixedClock(READ_AT_NS),
        PACKET_SIZE,
        StatsWindow::new(1_000)?,
        logger.clone(),
    )?;
    for _ in 0..PACKETS {
        assert_eq!(reader.step()?, None);
    }

    // Every echoed header carries exactly the stamp the writer put on it, in order
    let expected: i64 = stamps.lock().unwrap()[..PACKETS]
        .iter()
        .map(|stamp| READ_AT_NS - stamp)
        .sum();
    assert_eq!(reader.window().packets_seen(), PACKETS as u64);
    assert_eq!(reader.window().total_elapsed_ns(), expected);

    control.shutdown(Shutdown::Both)?;
    let writer_fault = writer_handle.join().unwrap();
    assert!(matches!(writer_fault, ClientError::Io(_)));
    Ok(())
}

#[test]
fn test_percentiles_in_report_line() -> Result<()> {
    let (addr, peer) = spawn_counting_echo_peer(11);

    let address = addr.to_string();
    let config = Config::try_parse_from([
        "lbstats",
        "--percentiles",
        address.as_str(),
        "64",
        "10",
    ])
    .unwrap();
    let logger = Arc::new(MemoryLogger::new());
    Runner::new(&config, logger.clone()).run()?;
    peer.join().unwrap();

    assert_eq!(logger.count_containing("packet average lifespan"), 1);
    assert_eq!(logger.count_containing("p50:"), 1);
    assert_eq!(logger.count_containing("p99:"), 1);
    assert_eq!(logger.count_containing("max:"), 1);
    Ok(())
}

#[test]
fn test_short_write_leaves_reader_running() -> Result<()> {
    // Peer produces its own stamped packets; the client's writer never gets one out
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let peer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut packet = PacketBuffer::new(PACKET_SIZE).unwrap();
        for _ in 0..25 {
            packet.stamp(MonotonicClock.now_ns());
            stream.write_all(packet.as_bytes()).unwrap();
            thread::sleep(Duration::from_millis(1));
        }
    });

    let (read_half, _write_half) = split(connect(addr)?)?;
    let logger = Arc::new(MemoryLogger::new());
    let writer = Writer::new(ShortSink, MonotonicClock, PACKET_SIZE, logger.clone())?;
    let reader = Reader::new(
        read_half,
        MonotonicClock,
        PACKET_SIZE,
        StatsWindow::new(10)?,
        logger.clone(),
    )?;

    let writer_fault = thread::spawn(move || writer.run()).join().unwrap();
    assert!(matches!(
        writer_fault,
        ClientError::ProtocolViolation {
            operation: "send",
            ..
        }
    ));

    let reader_fault = thread::spawn(move || reader.run()).join().unwrap();
    peer.join().unwrap();

    assert!(matches!(reader_fault, ClientError::PeerClosed));
    // 25 packets close windows at packets 11 and 21
    assert_eq!(logger.count_containing("packet average lifespan"), 2);
    assert_eq!(logger.count_containing("writer has stopped"), 1);
    assert_eq!(logger.count_containing("reader has stopped"), 1);
    Ok(())
}

#[test]
fn test_peer_close_leaves_writer_running() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let (reader_done_tx, reader_done_rx) = mpsc::channel::<()>();
    let peer = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.shutdown(Shutdown::Write).unwrap();
        reader_done_rx.recv().unwrap();

        // The writer keeps delivering whole packets after the reader stopped
        let mut buf = [0u8; PACKET_SIZE];
        for _ in 0..50 {
            stream.read_exact(&mut buf).unwrap();
        }
        drain_and_close(stream);
    });

    let (read_half, write_half) = split(connect(addr)?)?;
    let logger = Arc::new(MemoryLogger::new());
    let writer = Writer::new(write_half, MonotonicClock, PACKET_SIZE, logger.clone())?;
    let reader = Reader::new(
        read_half,
        MonotonicClock,
        PACKET_SIZE,
        StatsWindow::new(10)?,
        logger.clone(),
    )?;

    let writer_handle = thread::spawn(move || writer.run());
    let reader_fault = thread::spawn(move || reader.run()).join().unwrap();
    assert!(matches!(reader_fault, ClientError::PeerClosed));
    assert_eq!(logger.count_containing("writer has stopped"), 0);
    reader_done_tx.send(()).unwrap();

    peer.join().unwrap();
    let writer_fault = writer_handle.join().unwrap();
    assert!(matches!(writer_fault, ClientError::Io(_)));
    assert_eq!(logger.count_containing("writer has stopped"), 1);
    Ok(())
}
