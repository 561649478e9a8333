use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alpho_core::sink::ConsoleWriter;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn read_request(stream: &mut TcpStream) {
    let mut request: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
        if request.windows(4).any(|w| w == b"\r\n\r\n") {
            return;
        }
    }
}

fn response(status_line: &str) -> String {
    format!("HTTP/1.1 {status_line}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
}

/// Answers every request with `status_line`.
pub async fn http_server(status_line: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut stream).await;
                let _ = stream.write_all(response(status_line).as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    addr
}

/// Requests currently being served, and the most ever served at once.
#[derive(Default)]
pub struct Concurrency {
    current: AtomicUsize,
    pub peak: AtomicUsize,
}

/// Holds each request for `delay` before answering `200 OK`.
pub async fn slow_server(delay: Duration, seen: Arc<Concurrency>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                read_request(&mut stream).await;
                let now = seen.current.fetch_add(1, Ordering::SeqCst) + 1;
                seen.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                seen.current.fetch_sub(1, Ordering::SeqCst);
                let _ = stream.write_all(response("200 OK").as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    addr
}

/// Accepts connections and never answers.
pub async fn silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held: Vec<TcpStream> = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// A port that was just released, so connecting to it is refused.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("alpho-it-{}-{name}", std::process::id()))
}

pub fn capture() -> (ConsoleWriter, Arc<Mutex<Vec<String>>>) {
    let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let lines_ref = lines.clone();
    let writer: ConsoleWriter = Box::new(move |line| lines_ref.lock().unwrap().push(line.to_string()));
    (writer, lines)
}

pub fn sorted_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    lines.sort();
    lines
}
