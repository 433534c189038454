// Loopback HTTP server with canned responses for adapter tests
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One scripted reply
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Content-Length to announce; larger than `body` cuts the stream short
    pub declared_len: Option<usize>,
}

impl Canned {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into().into_bytes(),
            declared_len: None,
        }
    }

    pub fn bytes(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            declared_len: None,
        }
    }

    /// Announce more bytes than are sent, then hang up
    pub fn truncated(mut self, declared_len: usize) -> Self {
        self.declared_len = Some(declared_len);
        self
    }
}

/// Bound but not yet serving; the base URL is known before routes are built
pub struct CannedServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl CannedServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        Self { listener, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer every request whose path starts with a route prefix; unmatched paths get 404
    pub fn serve(self, routes: Vec<(&'static str, Canned)>) -> String {
        let base_url = self.base_url();
        let routes = Arc::new(routes);
        tokio::spawn(async move {
            while let Ok((stream, _)) = self.listener.accept().await {
                let routes = Arc::clone(&routes);
                tokio::spawn(async move {
                    let _ = respond(stream, &routes).await;
                });
            }
        });
        base_url
    }
}

/// Serve a single reply on every path
pub async fn serve_one(reply: Canned) -> String {
    CannedServer::bind().await.serve(vec![("/", reply)])
}

/// Base URL of a port with nothing listening
pub async fn closed_port() -> String {
    let server = CannedServer::bind().await;
    let url = server.base_url();
    drop(server);
    url
}

async fn respond(mut stream: TcpStream, routes: &[(&'static str, Canned)]) -> std::io::Result<()> {
    let path = read_request(&mut stream).await?;
    let reply = routes
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map(|(_, reply)| reply.clone())
        .unwrap_or_else(|| Canned::json(404, r#"{"error":"no route"}"#));

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.content_type,
        reply.declared_len.unwrap_or(reply.body.len()),
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&reply.body).await?;
    stream.flush().await?;
    stream.shutdown().await
}

/// Read headers and body; returns the request path
async fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let body_len = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }

    let request = String::from_utf8_lossy(&buf);
    Ok(request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
