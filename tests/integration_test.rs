//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero con un
//! directorio de contenido temporal, y le habla con `TcpStream` crudos.

use pool_server::config::Config;
use pool_server::server::{Server, ServerSummary, ShutdownHandle};
use regex::Regex;
use std::fs;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;

const HOME_CONTENT: &str = "<html><body><h1>home</h1></body></html>";

/// Servidor corriendo en background
struct TestServer {
    addr: SocketAddr,
    handle: ShutdownHandle,
    runner: JoinHandle<ServerSummary>,
    root: TempDir,
}

impl TestServer {
    fn start(threads: usize, queue_size: usize) -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("home.html"), HOME_CONTENT).unwrap();
        fs::write(root.path().join("file.gif"), "I am gif").unwrap();
        fs::write(root.path().join("file.jpg"), "I am jpg").unwrap();
        fs::write(root.path().join("file.txt"), "I am plain").unwrap();

        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 0;
        config.threads = threads;
        config.queue_size = queue_size;
        config.public_dir = root.path().display().to_string();

        let server = Server::bind(config).unwrap();
        let addr = server.local_addr().unwrap();
        let handle = server.shutdown_handle().unwrap();
        let runner = thread::spawn(move || server.run().unwrap());

        Self { addr, handle, runner, root }
    }

    fn root(&self) -> String {
        self.root.path().display().to_string()
    }

    fn stop(self) -> ServerSummary {
        self.handle.shutdown();
        self.runner.join().unwrap()
    }
}

/// Helper: envía bytes crudos y retorna todo lo que responda el servidor
fn exchange(addr: SocketAddr, raw: &[u8]) -> io::Result<Vec<u8>> {
    let mut stream = TcpStream::connect(addr)?;
    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
    stream.write_all(raw)?;
    stream.flush()?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;
    Ok(response)
}

fn get(addr: SocketAddr, path: &str) -> String {
    let raw = format!("GET {} HTTP/1.0\r\n\r\n", path);
    String::from_utf8_lossy(&exchange(addr, raw.as_bytes()).unwrap()).into_owned()
}

fn post(addr: SocketAddr, path: &str) -> String {
    let raw = format!("POST {} HTTP/1.0\r\nContent-Length: 0\r\n\r\n", path);
    String::from_utf8_lossy(&exchange(addr, raw.as_bytes()).unwrap()).into_owned()
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

/// Valores del bloque `Stat-*`
#[derive(Debug, PartialEq)]
struct Stats {
    thread_id: u64,
    count: u64,
    static_count: u64,
    dynamic_count: u64,
    post_count: u64,
    dispatch: f64,
}

fn stats_regex() -> Regex {
    Regex::new(concat!(
        r"Stat-Req-Arrival:: \d+\.\d{6}\r\n",
        r"Stat-Req-Dispatch:: (\d+\.\d{6})\r\n",
        r"Stat-Thread-Id:: (\d+)\r\n",
        r"Stat-Thread-Count:: (\d+)\r\n",
        r"Stat-Thread-Static:: (\d+)\r\n",
        r"Stat-Thread-Dynamic:: (\d+)\r\n",
        r"Stat-Thread-Post:: (\d+)\r\n\r\n",
    ))
    .unwrap()
}

fn parse_stats(response: &str) -> Stats {
    let caps = stats_regex()
        .captures(response)
        .unwrap_or_else(|| panic!("no stats block in: {:?}", response));
    let num = |i: usize| caps[i].parse::<u64>().unwrap();

    Stats {
        dispatch: caps[1].parse().unwrap(),
        thread_id: num(2),
        count: num(3),
        static_count: num(4),
        dynamic_count: num(5),
        post_count: num(6),
    }
}

/// Las siete líneas `Stat-*` tal como quedan en el log
fn stats_entry(response: &str) -> String {
    let start = response.find("Stat-Req-Arrival").unwrap();
    let end = response.find("\r\n\r\n").unwrap();
    response[start..end].to_string()
}

fn counters(response: &str) -> (u64, u64, u64, u64) {
    let s = parse_stats(response);
    (s.count, s.static_count, s.dynamic_count, s.post_count)
}

#[test]
fn test_static_mime_types() {
    let server = TestServer::start(2, 4);

    for (path, mime, body) in [
        ("/file.gif", "image/gif", "I am gif"),
        ("/file.jpg", "image/jpeg", "I am jpg"),
        ("/file.txt", "text/plain", "I am plain"),
    ] {
        let response = get(server.addr, path);
        let expected_head = format!(
            "HTTP/1.0 200 OK\r\nServer: OS-HW3 Web Server\r\nContent-Length: {}\r\nContent-Type: {}\r\n",
            body.len(),
            mime
        );
        assert!(response.starts_with(&expected_head), "got: {}", response);
        assert_eq!(extract_body(&response), body);
    }

    server.stop();
}

#[test]
fn test_static_slash_is_idempotent() {
    let server = TestServer::start(1, 4);

    let first = get(server.addr, "/");
    let second = get(server.addr, "/");
    assert_eq!(extract_body(&first), HOME_CONTENT);
    assert_eq!(extract_body(&first), extract_body(&second));
    assert_eq!(counters(&first), (1, 1, 0, 0));
    assert_eq!(counters(&second), (2, 2, 0, 0));

    server.stop();
}

#[test]
fn test_not_found_echoes_resolved_path() {
    let server = TestServer::start(1, 4);

    let response = get(server.addr, "/not_exist.html");
    assert!(response.starts_with("HTTP/1.0 404 Not found\r\nContent-Type: text/html\r\nContent-Length: "));

    let body = extract_body(&response);
    assert!(body.starts_with("<html><title>OS-HW3 Error</title>"));
    assert!(body.contains("404: Not found"));
    assert!(body.contains(&format!("{}//not_exist.html", server.root())));

    server.stop();
}

#[test]
fn test_unsupported_method_is_501() {
    let server = TestServer::start(1, 4);

    let response =
        String::from_utf8_lossy(&exchange(server.addr, b"PUT /home.html HTTP/1.0\r\n\r\n").unwrap())
            .into_owned();
    assert!(response.starts_with("HTTP/1.0 501 Not Implemented\r\n"));
    assert_eq!(counters(&response), (1, 0, 0, 0));

    server.stop();
}

#[test]
fn test_statistics_sequence_and_post_report() {
    let server = TestServer::start(1, 4);
    let mut logged = Vec::new();

    let r1 = get(server.addr, "/");
    assert_eq!(counters(&r1), (1, 1, 0, 0));
    logged.push(stats_entry(&r1));

    let r2 = post(server.addr, "/not_exist.html");
    assert!(r2.starts_with("HTTP/1.0 200 OK\r\nServer: OS-HW3 Web Server\r\n"));
    assert!(r2.contains("Content-Type: text/plain\r\n"));
    assert_eq!(counters(&r2), (2, 1, 0, 1));
    assert_eq!(extract_body(&r2), format!("{}\r\n\r\n", logged[0]));

    let r3 = get(server.addr, "/not_exist.html");
    assert_eq!(counters(&r3), (3, 1, 0, 1));

    let r4 = get(server.addr, "/");
    assert_eq!(counters(&r4), (4, 2, 0, 1));
    logged.push(stats_entry(&r4));

    let r5 = post(server.addr, "/");
    let expected = format!("{}\r\n\r\n", logged.join("\r\n\r\n\n"));
    assert_eq!(extract_body(&r5), expected);
    assert!(r5.contains(&format!("Content-Length: {}\r\n", expected.len())));
    assert_eq!(counters(&r5), (5, 2, 0, 2));

    let r6 = get(server.addr, "/output.cgi?0.1");
    assert_eq!(counters(&r6), (6, 2, 1, 2));
    assert_eq!(
        extract_body(&r6),
        "<p>Welcome to the dynamic CGI program</p>\r\n\
         <p>Requests served: 5 Static: 2 Dynamic: 0</p>\r\n\
         <p>I slept for 0.1 seconds</p>\r\n"
    );

    let summary = server.stop();
    assert_eq!(summary.stats.total_requests, 6);
    assert_eq!(summary.stats.post_requests, 2);
    assert_eq!(summary.served_per_worker, vec![6]);
    assert_eq!(summary.last_path.as_deref(), Some("/output.cgi"));
}

#[test]
fn test_dispatch_time_reflects_queue_wait() {
    let server = TestServer::start(2, 4);
    let addr = server.addr;

    let clients: Vec<_> = (0..4)
        .map(|_| thread::spawn(move || get(addr, "/output.cgi?0.3")))
        .collect();
    let responses: Vec<String> = clients.into_iter().map(|c| c.join().unwrap()).collect();

    let mut dispatches: Vec<f64> = responses.iter().map(|r| parse_stats(r).dispatch).collect();
    dispatches.sort_by(|a, b| a.partial_cmp(b).unwrap());

    assert!(dispatches[0] < 0.15, "dispatches: {:?}", dispatches);
    assert!(dispatches[1] < 0.15, "dispatches: {:?}", dispatches);
    assert!(dispatches[2] > 0.2 && dispatches[2] < 0.6, "dispatches: {:?}", dispatches);
    assert!(dispatches[3] > 0.2 && dispatches[3] < 0.6, "dispatches: {:?}", dispatches);

    let ids: Vec<u64> = responses.iter().map(|r| parse_stats(r).thread_id).collect();
    assert!(ids.iter().all(|id| *id == 1 || *id == 2));

    server.stop();
}

#[test]
fn test_full_queue_drops_connection() {
    let server = TestServer::start(1, 1);
    let addr = server.addr;

    // Ocupa al único worker
    let busy = thread::spawn(move || get(addr, "/output.cgi?0.5"));
    thread::sleep(Duration::from_millis(100));

    // Ocupa el único lugar de la cola
    let queued = thread::spawn(move || get(addr, "/"));
    thread::sleep(Duration::from_millis(100));

    // No hay lugar: se cierra sin respuesta
    let dropped = exchange(addr, b"GET / HTTP/1.0\r\n\r\n");
    match dropped {
        Ok(bytes) => assert!(bytes.is_empty(), "got: {:?}", String::from_utf8_lossy(&bytes)),
        Err(e) => assert!(
            matches!(e.kind(), io::ErrorKind::ConnectionReset | io::ErrorKind::BrokenPipe),
            "unexpected error: {}",
            e
        ),
    }

    assert!(busy.join().unwrap().starts_with("HTTP/1.0 200 OK"));
    assert!(queued.join().unwrap().starts_with("HTTP/1.0 200 OK"));

    let summary = server.stop();
    assert_eq!(summary.stats.total_requests, 2);
}

#[test]
fn test_no_drops_when_queue_is_large_enough() {
    let server = TestServer::start(2, 16);
    let addr = server.addr;

    let clients: Vec<_> = (0..8).map(|_| thread::spawn(move || get(addr, "/"))).collect();
    for client in clients {
        let response = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.0 200 OK"), "got: {}", response);
    }

    let summary = server.stop();
    assert_eq!(summary.stats.total_requests, 8);
    assert_eq!(summary.stats.static_requests, 8);
    assert_eq!(summary.served_per_worker.iter().sum::<u64>(), 8);
    assert_eq!(summary.served_per_worker.len(), 2);
}

#[test]
fn test_parent_path_is_forbidden() {
    let server = TestServer::start(1, 4);

    let response = get(server.addr, "/../secret.txt");
    assert!(response.starts_with("HTTP/1.0 403 Forbidden\r\n"));
    assert!(extract_body(&response).contains("could not read this file"));

    server.stop();
}

#[test]
fn test_existing_unknown_script_is_forbidden() {
    let server = TestServer::start(1, 4);
    fs::write(server.root.path().join("nocgi.cgi"), "#!/bin/bash\necho hi\n").unwrap();

    let response = get(server.addr, "/nocgi.cgi");
    assert!(response.starts_with("HTTP/1.0 403 Forbidden\r\n"), "got: {}", response);
    assert!(extract_body(&response).contains(&format!("{}//nocgi.cgi", server.root())));
    assert_eq!(counters(&response), (1, 0, 0, 0));

    server.stop();
}

#[test]
fn test_unknown_script_is_not_found() {
    let server = TestServer::start(1, 4);

    let response = get(server.addr, "/missing.cgi?1");
    assert!(response.starts_with("HTTP/1.0 404 Not found\r\n"));
    assert_eq!(counters(&response), (1, 0, 0, 0));

    server.stop();
}
