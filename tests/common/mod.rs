// Shared helpers for integration tests: a tiny HTTP server with canned
// responses, so no test depends on the internet.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Endpoints:
///   /ok, /              200
///   /missing            404
///   /error              500
///   /redirect           302 -> /ok
///   /redirect-missing   302 -> /missing
///   /huge-header        200 with a ~1MB header line
///   /slow               200 after 2 seconds
///   /pause              200 after 300ms
///   /held/<anything>    200 after 100ms, counted in `peak_in_flight`
///   anything else       404
pub struct TestServer {
    addr: SocketAddr,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (counter, high_water) = (in_flight.clone(), peak.clone());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(handle(stream, counter.clone(), high_water.clone()));
            }
        });

        Self {
            addr,
            in_flight,
            peak,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Most /held/ requests the server was serving at the same moment
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// A URL on a port nothing listens on
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/", addr)
}

async fn handle(mut stream: TcpStream, in_flight: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

    let response = match path.as_str() {
        "/" | "/ok" => simple(200, "OK"),
        "/missing" => simple(404, "Not Found"),
        "/error" => simple(500, "Internal Server Error"),
        "/redirect" => redirect("/ok"),
        "/redirect-missing" => redirect("/missing"),
        "/huge-header" => format!(
            "HTTP/1.1 200 OK\r\nX-Padding: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            "a".repeat(1_000_000)
        ),
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            simple(200, "OK")
        }
        "/pause" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            simple(200, "OK")
        }
        held if held.starts_with("/held/") => {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            simple(200, "OK")
        }
        _ => simple(404, "Not Found"),
    };

    // The client may hang up early (e.g. on the huge header); that's fine
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn simple(code: u16, reason: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        code,
        reason,
        reason.len(),
        reason
    )
}

fn redirect(location: &str) -> String {
    format!(
        "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        location
    )
}
