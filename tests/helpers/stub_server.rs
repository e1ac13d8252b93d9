use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One HTTP request as the stub received it. Header names are lowercase.
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn json_body(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("Request body is not JSON")
    }
}

/// HTTP server on a loopback port that answers a single request with a fixed
/// status and body, then hands back what it received.
pub struct StubServer {
    pub url: String,
    handle: JoinHandle<Result<CapturedRequest>>,
}

impl StubServer {
    pub async fn respond_once(status: u16, body: &str) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind stub server")?;
        let addr = listener.local_addr()?;
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;
            let request = read_request(&mut stream).await?;

            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;
            Ok::<_, anyhow::Error>(request)
        });

        Ok(Self {
            url: format!("http://{addr}"),
            handle,
        })
    }

    /// Wait for the request to have been served
    pub async fn received(self) -> Result<CapturedRequest> {
        self.handle.await.context("Stub server task failed")?
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

async fn read_request(stream: &mut TcpStream) -> Result<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            bail!("Connection closed before headers were complete");
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next().context("Missing request line")?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().context("Missing method")?.to_string();
    let path = parts.next().context("Missing path")?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let content_length = match headers.get("content-length") {
        Some(len) => len.parse::<usize>().context("Invalid content-length")?,
        None => 0,
    };

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            bail!("Connection closed before body was complete");
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(CapturedRequest {
        method,
        path,
        headers,
        body: buf[header_end..header_end + content_length].to_vec(),
    })
}
