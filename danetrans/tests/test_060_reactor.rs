mod test_utils;

use danetrans::{
    ContentType, EnvelopeRequest, MessageCodec, PosixFrame, ReactorConfiguration, ReactorEvent,
    ReactorEventLoop, ReactorMailBox, ResponseStatus, SerializeConfig, TransClient, TransResult,
    ENVELOPE_VERSION,
};
use danetrans::parts::TestRequest;
use log::*;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn test_060_reactor() -> TransResult<()> {
    let mut _log_handle = test_utils::init_logger();
    echo_roundtrip()?;
    responses_keep_order_on_one_connection()?;
    unhandled_path_yields_not_implemented()?;
    subscriber_sees_the_connection_lifecycle()?;
    peer_close_mid_write_does_not_panic()?;
    stop_under_load_returns_promptly()?;
    info!("reactor tests passed");
    Ok(())
}

// Scenario "Echo": request and response carry the same id and message.
fn echo_roundtrip() -> TransResult<()> {
    let server = test_utils::start_echo_server(ReactorConfiguration::default())?;
    let client = TransClient::connect(
        &test_utils::server_url(&server),
        ReactorConfiguration::default(),
    )?;

    let request_id = client.send_test_request("hello")?;
    let response = client.recv_response()?;
    assert_eq!(response.request_id, request_id);
    assert_eq!(response.status, ResponseStatus::Ok);
    let test = client.codec().try_parse_test_response(&response.body)?;
    assert_eq!(test.message, "hello");

    client.stop()?;
    server.stop()
}

// Property "Outbound ordering": with a single worker, responses leave in the
// order the requests arrived.
fn responses_keep_order_on_one_connection() -> TransResult<()> {
    let config = ReactorConfiguration::default().with_worker_count(1);
    let server = test_utils::start_echo_server(config.clone())?;
    let client = TransClient::connect(&test_utils::server_url(&server), config)?;

    let mut expected = Vec::new();
    for i in 0..20 {
        expected.push(client.send_test_request(&format!("message-{i}"))?);
    }
    for request_id in expected {
        let response = client.recv_response()?;
        assert_eq!(response.request_id, request_id);
        assert_eq!(response.status, ResponseStatus::Ok);
    }

    client.stop()?;
    server.stop()
}

// A well-formed envelope on a path nobody handles earns NotImplemented.
fn unhandled_path_yields_not_implemented() -> TransResult<()> {
    let server = test_utils::start_echo_server(ReactorConfiguration::default())?;
    let client = TransClient::connect(
        &test_utils::server_url(&server),
        ReactorConfiguration::default(),
    )?;

    let request = EnvelopeRequest {
        version: ENVELOPE_VERSION,
        request_id: 77,
        request_type: 9,
        path: "/upload".to_string(),
        content_type: ContentType::DaneJoe,
        body: Vec::new(),
    };
    client.send_request(&request)?;
    let response = client.recv_response()?;
    assert_eq!(response.request_id, 77);
    assert_eq!(response.status, ResponseStatus::NotImplemented);
    assert!(response.body.is_empty());

    client.stop()?;
    server.stop()
}

// Drives the reactor directly, without the facades: a raw TCP peer connects
// and sends one frame; the subscriber channel reports the lifecycle and the
// frame lands in the inbound mailbox.
fn subscriber_sees_the_connection_lifecycle() -> TransResult<()> {
    let config = ReactorConfiguration::default();
    let mailbox = Arc::new(ReactorMailBox::new(config.inbound_queue_capacity()));
    let mut reactor = ReactorEventLoop::new_server(
        "127.0.0.1:0".parse().unwrap(),
        Arc::clone(&mailbox),
        config,
    )?;
    let addr = reactor.local_addr().unwrap();
    let events = reactor.subscribe();
    let handle = reactor.handle();
    let reactor_thread = std::thread::spawn(move || reactor.run());

    let codec = MessageCodec::new(SerializeConfig::default());
    let frame_bytes = codec.build_test_request(
        &TestRequest {
            message: "raw peer".to_string(),
        },
        1,
    )?;

    let mut peer = std::net::TcpStream::connect(addr).unwrap();
    let connect_id = match events.recv_timeout(EVENT_TIMEOUT).unwrap() {
        ReactorEvent::ConnectionOpened { connect_id, .. } => connect_id,
        other => panic!("expected ConnectionOpened, got {other:?}"),
    };

    peer.write_all(&frame_bytes).unwrap();
    peer.flush().unwrap();
    match events.recv_timeout(EVENT_TIMEOUT).unwrap() {
        ReactorEvent::FrameReceived { connect_id: id, bytes } => {
            assert_eq!(id, connect_id);
            assert_eq!(bytes, frame_bytes);
        }
        other => panic!("expected FrameReceived, got {other:?}"),
    }
    let inbound = mailbox.pop_from_to_server_frame()?;
    assert_eq!(inbound.connect_id, connect_id);
    assert_eq!(inbound.payload, frame_bytes);

    drop(peer);
    match events.recv_timeout(EVENT_TIMEOUT).unwrap() {
        ReactorEvent::ConnectionClosed { connect_id: id } => assert_eq!(id, connect_id),
        other => panic!("expected ConnectionClosed, got {other:?}"),
    }

    handle.stop();
    reactor_thread.join().unwrap()
}

// Scenario "Peer close mid-write": a large response pushed after the peer
// vanished is dropped with the connection; nothing panics.
fn peer_close_mid_write_does_not_panic() -> TransResult<()> {
    let config = ReactorConfiguration::default();
    let mailbox = Arc::new(ReactorMailBox::new(config.inbound_queue_capacity()));
    let mut reactor = ReactorEventLoop::new_server(
        "127.0.0.1:0".parse().unwrap(),
        Arc::clone(&mailbox),
        config,
    )?;
    let addr = reactor.local_addr().unwrap();
    let events = reactor.subscribe();
    let handle = reactor.handle();
    let reactor_thread = std::thread::spawn(move || reactor.run());

    let peer = std::net::TcpStream::connect(addr).unwrap();
    let connect_id = match events.recv_timeout(EVENT_TIMEOUT).unwrap() {
        ReactorEvent::ConnectionOpened { connect_id, .. } => connect_id,
        other => panic!("expected ConnectionOpened, got {other:?}"),
    };
    drop(peer);

    // 1 MiB of outbound data towards a gone peer; either the push finds the
    // queue already removed or the write path fails and removes the connection
    mailbox.push_to_client_frame(PosixFrame::new(connect_id, vec![0x55; 1024 * 1024]))?;

    match events.recv_timeout(EVENT_TIMEOUT).unwrap() {
        ReactorEvent::ConnectionClosed { connect_id: id } => assert_eq!(id, connect_id),
        other => panic!("expected ConnectionClosed, got {other:?}"),
    }

    handle.stop();
    reactor_thread.join().unwrap()
}

// Scenario "Stop under load": stopping while requests are in flight returns
// promptly and cleanly.
fn stop_under_load_returns_promptly() -> TransResult<()> {
    let config = ReactorConfiguration::default().with_worker_count(2);
    let server = test_utils::start_echo_server(config.clone())?;
    let client = TransClient::connect(&test_utils::server_url(&server), config)?;

    for i in 0..200 {
        client.send_test_request(&format!("load-{i}"))?;
    }

    let stop_started = Instant::now();
    server.stop()?;
    assert!(
        stop_started.elapsed() < Duration::from_secs(5),
        "stop took {:?}",
        stop_started.elapsed()
    );

    // drain whatever made it back; well-formed or nothing
    let deadline = Instant::now() + Duration::from_millis(500);
    let mut received = 0;
    while Instant::now() < deadline {
        match client.try_recv_response() {
            Ok(Some(response)) => {
                assert_eq!(response.status, ResponseStatus::Ok);
                received += 1;
            }
            Ok(None) => std::thread::sleep(Duration::from_millis(10)),
            Err(_) => break,
        }
    }
    info!("received {received} of 200 responses before the stop took effect");
    assert!(received <= 200);

    client.stop()
}
