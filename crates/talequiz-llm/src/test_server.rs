//! Minimal loopback HTTP server replaying canned chat-completion responses.
//!
//! Each accepted connection consumes the next canned response; once the queue
//! is exhausted the listener is dropped and further connections are refused.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// One scripted HTTP response
#[derive(Debug, Clone)]
pub struct CannedResponse {
    status: u16,
    body: String,
}

impl CannedResponse {
    /// 200 with a well-formed envelope carrying `content`
    #[must_use]
    pub fn ok_content(content: &str) -> Self {
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        });
        Self::ok_body(&body.to_string())
    }

    /// 200 with an arbitrary body
    #[must_use]
    pub fn ok_body(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    /// Error status with an empty JSON body
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: "{}".to_string(),
        }
    }
}

/// Loopback server handle
pub struct TestServer {
    addr: SocketAddr,
    bodies: Arc<Mutex<Vec<String>>>,
    headers: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Bind to an ephemeral port and start serving `responses` in order.
    ///
    /// # Panics
    ///
    /// Panics if no loopback port can be bound.
    pub async fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let headers = Arc::new(Mutex::new(Vec::new()));

        let (bodies_task, headers_task) = (Arc::clone(&bodies), Arc::clone(&headers));
        tokio::spawn(async move {
            for response in responses {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                if let Some((head, body)) = serve_one(stream, &response).await {
                    headers_task.lock().await.push(head);
                    bodies_task.lock().await.push(body);
                }
            }
        });

        Self {
            addr,
            bodies,
            headers,
        }
    }

    /// Full chat-completions URL for this server
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/v1/chat/completions", self.addr)
    }

    /// Base URL (what `[llm] base_url` would hold)
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Request bodies received so far
    pub async fn requests(&self) -> Vec<String> {
        self.bodies.lock().await.clone()
    }

    /// Raw request heads received so far
    pub async fn headers(&self) -> Vec<String> {
        self.headers.lock().await.clone()
    }
}

async fn serve_one(mut stream: TcpStream, response: &CannedResponse) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(head_end + content_length);
    let body = String::from_utf8_lossy(&buf[head_end..body_end]).to_string();

    let reply = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    );
    stream.write_all(reply.as_bytes()).await.ok()?;
    let _ = stream.shutdown().await;

    Some((head, body))
}
