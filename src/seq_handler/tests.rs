//! Integration tests for the Seq handler against a mock HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use rstest::{fixture, rstest};
use serde_json::Value;

use crate::handler::{BatchHandler, Delivery, DeliveryError};
use crate::handlers::{HandlerBuilderTrait, SeqHandlerBuilder};
use crate::log_event::LoggingEvent;
use crate::parameter::Parameter;
use crate::value::PropertyValue;

use super::SeqHandler;

#[derive(Debug)]
struct CapturedRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn parse_header_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.split_once(':')
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
}

fn read_http_request(stream: &mut TcpStream) -> CapturedRequest {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    let parts: Vec<&str> = request_line.trim().split(' ').collect();
    let method = parts.first().unwrap_or(&"").to_string();
    let path = parts.get(1).unwrap_or(&"").to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header");
        if line.trim().is_empty() {
            break;
        }
        let Some((key, value)) = parse_header_line(&line) else {
            continue;
        };
        if key == "content-length" {
            content_length = value.parse().unwrap_or(0);
        }
        headers.push((key, value));
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).expect("read body");
    }

    CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

/// Spawn a mock Seq server answering each request with the next
/// `(status, body)` pair.
fn spawn_mock_server(
    listener: TcpListener,
    responses: Vec<(u16, &'static str)>,
) -> (SocketAddr, mpsc::Receiver<CapturedRequest>) {
    let addr = listener.local_addr().expect("listener has address");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            let captured = read_http_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                status_text(status),
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = tx.send(captured);
        }
    });

    (addr, rx)
}

/// Spawn a server that reads the request but never answers.
fn spawn_silent_server(listener: TcpListener, hold: Duration) -> SocketAddr {
    let addr = listener.local_addr().expect("listener has address");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = read_http_request(&mut stream);
            thread::sleep(hold);
        }
    });
    addr
}

#[fixture]
fn tcp_listener() -> TcpListener {
    TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener")
}

type Reports = Arc<Mutex<Vec<String>>>;

fn recording_builder(addr: SocketAddr) -> (SeqHandlerBuilder, Reports) {
    let reports: Reports = Arc::default();
    let sink = Arc::clone(&reports);
    let builder = SeqHandlerBuilder::new()
        .with_server_url(format!("http://{addr}"))
        .with_timeout_ms(5_000)
        .with_environment_name("Test")
        .with_error_handler(move |message: &str| sink.lock().push(message.to_owned()));
    (builder, reports)
}

fn info_batch(message: &str) -> Vec<LoggingEvent> {
    vec![LoggingEvent::new("app.orders", "INFO", message).with_property("OrderId", 7)]
}

#[rstest]
fn posts_batch_to_raw_events_endpoint(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![(201, "")]);
    let (builder, reports) = recording_builder(addr);
    let handler = builder.with_api_key("A1B2C3").build_inner().expect("build");

    let mut batch = info_batch("Order {OrderId} placed");
    handler.send_buffer(&mut batch);

    let captured = rx.recv_timeout(Duration::from_secs(5)).expect("request");
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.path, "/api/events/raw");
    assert_eq!(
        captured.header("content-type"),
        Some("application/json; charset=utf-8")
    );
    assert_eq!(captured.header("x-seq-apikey"), Some("A1B2C3"));

    let body = captured.json();
    let events = body["events"].as_array().expect("events array");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["Level"], "Information");
    assert_eq!(events[0]["EventType"], 67145);
    assert_eq!(events[0]["MessageTemplate"], "Order {{OrderId}} placed");
    assert_eq!(events[0]["Properties"]["OrderId"], 7);
    assert_eq!(events[0]["Properties"]["Environment"], "Test");
    assert_eq!(events[0]["Properties"]["log4net_Logger"], "app.orders");
    assert!(reports.lock().is_empty());
}

#[rstest]
fn sets_environment_on_caller_events(tcp_listener: TcpListener) {
    let (addr, _rx) = spawn_mock_server(tcp_listener, vec![(200, "")]);
    let (builder, _reports) = recording_builder(addr);
    let handler = builder.build_inner().expect("build");

    let mut batch = info_batch("hello");
    let outcome = handler.deliver(&mut batch).expect("delivered");
    assert_eq!(outcome, Delivery::Delivered { status: 200 });
    assert_eq!(
        batch[0].property("Environment"),
        Some(&PropertyValue::from("Test"))
    );
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("  "))]
fn blank_api_key_sends_no_header(tcp_listener: TcpListener, #[case] key: Option<&str>) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![(200, "")]);
    let (mut builder, _reports) = recording_builder(addr);
    if let Some(key) = key {
        builder = builder.with_api_key(key);
    }
    let handler = builder.build_inner().expect("build");
    handler.send_buffer(&mut info_batch("no key"));

    let captured = rx.recv_timeout(Duration::from_secs(5)).expect("request");
    assert_eq!(captured.header("x-seq-apikey"), None);
}

#[rstest]
fn parameters_are_rendered_into_payload(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![(200, "")]);
    let (builder, _reports) = recording_builder(addr);
    let handler = builder
        .with_parameter(Parameter::constant("Application", "shop"))
        .build_inner()
        .expect("build");
    handler.send_buffer(&mut info_batch("with parameter"));

    let captured = rx.recv_timeout(Duration::from_secs(5)).expect("request");
    assert_eq!(captured.json()["events"][0]["Properties"]["Application"], "shop");
    assert!(
        captured
            .body
            .contains(r#""Properties":{"Application":"shop","log4net_Logger":"app.orders""#)
    );
}

#[rstest]
fn failed_status_is_reported_with_body(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![(500, "server error")]);
    let (builder, reports) = recording_builder(addr);
    let handler = builder.build_inner().expect("build");

    handler.send_buffer(&mut info_batch("will fail"));

    rx.recv_timeout(Duration::from_secs(5)).expect("request");
    assert_eq!(
        reports.lock().as_slice(),
        ["Received failed result 500: server error"]
    );
}

#[rstest]
fn failed_status_surfaces_from_deliver(tcp_listener: TcpListener) {
    let (addr, _rx) = spawn_mock_server(tcp_listener, vec![(401, "bad key")]);
    let (builder, _reports) = recording_builder(addr);
    let handler = builder.build_inner().expect("build");

    let err = handler
        .deliver(&mut info_batch("unauthorised"))
        .expect_err("should fail");
    assert!(matches!(
        err,
        DeliveryError::FailedResult { status: 401, ref body } if body == "bad key"
    ));
}

#[rstest]
fn connection_refused_is_reported(tcp_listener: TcpListener) {
    let addr = tcp_listener.local_addr().expect("listener has address");
    drop(tcp_listener);
    let (builder, reports) = recording_builder(addr);
    let handler = builder.build_inner().expect("build");

    handler.send_buffer(&mut info_batch("nobody home"));

    let reports = reports.lock();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("Failed to send events: "));
}

#[rstest]
fn timeout_is_reported(tcp_listener: TcpListener) {
    let addr = spawn_silent_server(tcp_listener, Duration::from_secs(2));
    let (builder, reports) = recording_builder(addr);
    let handler = builder.with_timeout_ms(200).build_inner().expect("build");

    handler.send_buffer(&mut info_batch("slow server"));

    let reports = reports.lock();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("Failed to send events: "));
}

#[test]
fn no_server_skips_delivery() {
    let reports: Reports = Arc::default();
    let sink = Arc::clone(&reports);
    let handler = SeqHandlerBuilder::new()
        .with_environment_name("Test")
        .with_error_handler(move |message: &str| sink.lock().push(message.to_owned()))
        .build_inner()
        .expect("build");

    let mut batch = info_batch("dropped quietly");
    let outcome = handler.deliver(&mut batch).expect("skipped");
    assert_eq!(outcome, Delivery::Skipped);
    assert_eq!(batch[0].property("Environment"), None);

    handler.send_buffer(&mut batch);
    assert!(reports.lock().is_empty());
}

#[rstest]
fn empty_batch_is_not_posted(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![(200, "")]);
    let (builder, reports) = recording_builder(addr);
    let handler = builder.build_inner().expect("build");

    let outcome = handler.deliver(&mut []).expect("skipped");
    assert_eq!(outcome, Delivery::Skipped);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    assert!(reports.lock().is_empty());
}

#[rstest]
fn send_after_close_is_reported(tcp_listener: TcpListener) {
    let (addr, _rx) = spawn_mock_server(tcp_listener, vec![(200, "")]);
    let (builder, reports) = recording_builder(addr);
    let handler: SeqHandler = builder.build_inner().expect("build");

    handler.close();
    assert!(handler.is_closed());
    handler.close();

    handler.send_buffer(&mut info_batch("too late"));
    assert_eq!(reports.lock().as_slice(), ["handler is closed"]);
}

#[rstest]
fn handler_is_shareable_across_threads(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![(200, ""), (200, "")]);
    let (builder, reports) = recording_builder(addr);
    let handler = Arc::new(builder.build_inner().expect("build"));

    let workers: Vec<_> = (0..2)
        .map(|i| {
            let handler = Arc::clone(&handler);
            thread::spawn(move || handler.send_buffer(&mut info_batch(&format!("thread {i}"))))
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker thread");
    }

    for _ in 0..2 {
        let body = rx.recv_timeout(Duration::from_secs(5)).expect("request").json();
        assert_eq!(body["events"].as_array().map(Vec::len), Some(1));
    }
    assert!(reports.lock().is_empty());
}
