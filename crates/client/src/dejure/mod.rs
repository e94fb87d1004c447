//! dejure.org linking service client.
//!
//! ### Protocol
//!
//! - **Endpoint**: `POST https://rechtsnetz.dejure.org/dienste/vernetzung/vernetzen`
//! - **Body**: form-encoded [`VernetzungForm`] carrying the original text and
//!   link rendering options.
//! - **Response**: the annotated text, status 200. Anything else is an error.
//!
//! ### Time bounds
//!
//! - `connect_timeout` covers connecting, sending and receiving the response head.
//! - `read_timeout` covers each wait for the next body chunk.
//!
//! A single attempt is made. Partial bodies are never returned.

pub mod error;
pub mod request;

pub use error::{TimeoutPhase, TransportError};
pub use request::{CLIENT_VERSION, VernetzungForm};

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use dejure_core::AnnotationConfig;
use dejure_core::config::DEFAULT_ENDPOINT;
use reqwest::{StatusCode, Url, header};

/// Upper bound on the response body.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Upper bound on preallocation from a Content-Length header.
const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

/// Raw successful response from the linking service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub body: String,
    pub status: u16,
    /// Time taken for the round-trip in milliseconds.
    pub fetch_ms: u64,
}

/// Bounded-time remote annotation capability.
#[async_trait::async_trait]
pub trait AnnotationClient: Send + Sync {
    /// Send `text` for annotation. One attempt, no retries.
    async fn send(&self, text: &str, config: &AnnotationConfig) -> Result<RawResponse, TransportError>;
}

/// Linking service client configuration.
#[derive(Debug, Clone)]
pub struct DejureConfig {
    /// Endpoint URL (default: https://rechtsnetz.dejure.org/dienste/vernetzung/vernetzen).
    ///
    /// Time bounds are not set here; each call enforces its own `AnnotationConfig` bounds.
    pub endpoint: String,
}

impl Default for DejureConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.to_string() }
    }
}

/// reqwest-backed client for the dejure.org linking service.
#[derive(Debug, Clone)]
pub struct DejureClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl DejureClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DejureConfig) -> Result<Self, TransportError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|e| TransportError::InvalidEndpoint(format!("{}: {e}", config.endpoint)))?;

        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| TransportError::Network(Arc::new(e)))?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn user_agent(config: &AnnotationConfig) -> String {
        if config.provider_id.is_empty() {
            format!("dejure-rs/{}", env!("CARGO_PKG_VERSION"))
        } else {
            format!("{} (dejure-rs {})", config.provider_id, env!("CARGO_PKG_VERSION"))
        }
    }
}

#[async_trait::async_trait]
impl AnnotationClient for DejureClient {
    async fn send(&self, text: &str, config: &AnnotationConfig) -> Result<RawResponse, TransportError> {
        let start = Instant::now();
        let form = VernetzungForm::new(text, config);

        let request = self
            .http
            .post(self.endpoint.clone())
            .header(header::USER_AGENT, Self::user_agent(config))
            .form(&form)
            .send();

        let response = tokio::time::timeout(config.connect_timeout, request)
            .await
            .map_err(|_| TransportError::Timeout { phase: TimeoutPhase::Connect, after: config.connect_timeout })??;

        let status = response.status();
        tracing::debug!("dejure.org response status: {}", status);

        if status != StatusCode::OK {
            return Err(TransportError::Status { status: status.as_u16() });
        }

        let body = read_body(response, config.read_timeout).await?;
        let body = String::from_utf8(body).map_err(|_| TransportError::Decode)?;

        let fetch_ms = start.elapsed().as_millis() as u64;
        tracing::debug!("annotated {} bytes -> {} bytes in {}ms", form.original_text.len(), body.len(), fetch_ms);

        Ok(RawResponse { body, status: status.as_u16(), fetch_ms })
    }
}

/// Read the body chunk by chunk, bounding each wait by `read_timeout`.
async fn read_body(mut response: reqwest::Response, read_timeout: Duration) -> Result<Vec<u8>, TransportError> {
    let capacity = response
        .content_length()
        .map_or(0, |len| (len as usize).min(MAX_PREALLOC_BYTES));
    let mut body = BytesMut::with_capacity(capacity);

    loop {
        let chunk = tokio::time::timeout(read_timeout, response.chunk())
            .await
            .map_err(|_| TransportError::Timeout { phase: TimeoutPhase::Read, after: read_timeout })?
            .map_err(|e| TransportError::Body(Arc::new(e)))?;

        match chunk {
            Some(chunk) => {
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(TransportError::TooLarge { limit: MAX_BODY_BYTES });
                }
                body.extend_from_slice(&chunk);
            }
            None => return Ok(body.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dejure_core::LinkStyle;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// One step of a scripted HTTP response.
    enum Step {
        Write(Vec<u8>),
        Sleep(Duration),
    }

    fn ok_response(body: &str) -> Vec<u8> {
        format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}", body.len(), body).into_bytes()
    }

    /// Read one full request (head plus Content-Length body) from the socket.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serve one scripted response on a loopback port; the handle yields the raw request.
    async fn serve_once(script: Vec<Step>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/dienste/vernetzung/vernetzen", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            for step in script {
                match step {
                    Step::Write(bytes) => {
                        if socket.write_all(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Step::Sleep(duration) => tokio::time::sleep(duration).await,
                }
            }
            let _ = socket.shutdown().await;
            request
        });

        (endpoint, handle)
    }

    fn client(endpoint: &str) -> DejureClient {
        DejureClient::new(DejureConfig { endpoint: endpoint.to_string() }).unwrap()
    }

    fn fast_config() -> AnnotationConfig {
        AnnotationConfig {
            connect_timeout: Duration::from_millis(300),
            read_timeout: Duration::from_millis(300),
            ..Default::default()
        }
    }

    #[test]
    fn test_dejure_config_default() {
        let config = DejureConfig::default();
        assert_eq!(config.endpoint, "https://rechtsnetz.dejure.org/dienste/vernetzung/vernetzen");
    }

    #[test]
    fn test_client_new_invalid_endpoint() {
        let result = DejureClient::new(DejureConfig { endpoint: "not a url".into() });
        assert!(matches!(result, Err(TransportError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_user_agent() {
        let config = AnnotationConfig { provider_id: "example.com".into(), ..Default::default() };
        assert!(DejureClient::user_agent(&config).starts_with("example.com (dejure-rs "));
        assert!(DejureClient::user_agent(&AnnotationConfig::default()).starts_with("dejure-rs/"));
    }

    #[tokio::test]
    async fn test_send_posts_form_and_returns_body() {
        let annotated = r#"<a href="https://dejure.org/gesetze/BGB/433.html">§ 433 BGB</a>"#;
        let (endpoint, server) = serve_once(vec![Step::Write(ok_response(annotated))]).await;

        let config = AnnotationConfig {
            link_style: LinkStyle::Narrow,
            provider_id: "example.com".into(),
            contact_email: "webmaster@example.com".into(),
            ..fast_config()
        };
        let response = client(&endpoint).send("§ 433 BGB", &config).await.unwrap();
        assert_eq!(response.body, annotated);
        assert_eq!(response.status, 200);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /dienste/vernetzung/vernetzen HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.to_lowercase().contains("user-agent: example.com (dejure-rs "));
        assert!(request.contains("Originaltext=%C2%A7+433+BGB"));
        assert!(request.contains("format=schmal"));
        assert!(request.contains("Anbieterkennung=example.com-webmaster%40example.com"));
        assert!(request.contains("buzer=1"));
        assert!(request.contains("version=rust-"));
    }

    #[tokio::test]
    async fn test_send_non_200_is_error() {
        let response = b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec();
        let (endpoint, _server) = serve_once(vec![Step::Write(response)]).await;

        let result = client(&endpoint).send("§ 433 BGB", &fast_config()).await;
        assert!(matches!(result, Err(TransportError::Status { status: 503 })));
    }

    #[tokio::test]
    async fn test_send_head_timeout() {
        let (endpoint, _server) = serve_once(vec![Step::Sleep(Duration::from_secs(2))]).await;

        let result = client(&endpoint).send("§ 433 BGB", &fast_config()).await;
        assert!(matches!(result, Err(TransportError::Timeout { phase: TimeoutPhase::Connect, .. })));
    }

    #[tokio::test]
    async fn test_send_honors_longer_per_call_connect_bound() {
        let (endpoint, _server) =
            serve_once(vec![Step::Sleep(Duration::from_millis(700)), Step::Write(ok_response("§ 433 BGB"))]).await;

        let config = AnnotationConfig { connect_timeout: Duration::from_secs(5), ..fast_config() };
        let response = client(&endpoint).send("§ 433 BGB", &config).await.unwrap();
        assert_eq!(response.body, "§ 433 BGB");
    }

    #[tokio::test]
    async fn test_send_read_timeout_discards_partial_body() {
        let head = b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n<a href=".to_vec();
        let (endpoint, _server) = serve_once(vec![Step::Write(head), Step::Sleep(Duration::from_secs(2))]).await;

        let result = client(&endpoint).send("§ 433 BGB", &fast_config()).await;
        assert!(matches!(result, Err(TransportError::Timeout { phase: TimeoutPhase::Read, .. })));
    }

    #[tokio::test]
    async fn test_send_invalid_utf8() {
        let mut response = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n".to_vec();
        response.extend_from_slice(&[0xff, 0xfe]);
        let (endpoint, _server) = serve_once(vec![Step::Write(response)]).await;

        let result = client(&endpoint).send("§ 433 BGB", &fast_config()).await;
        assert!(matches!(result, Err(TransportError::Decode)));
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let result = client(&endpoint).send("§ 433 BGB", &fast_config()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore = "requires network access to dejure.org"]
    async fn test_live_service() {
        let client = DejureClient::new(DejureConfig::default()).unwrap();
        let config = AnnotationConfig {
            provider_id: "localhost".into(),
            contact_email: "webmaster@localhost".into(),
            ..Default::default()
        };

        let response = client.send("Der Kaufvertrag ist in § 433 BGB geregelt.", &config).await.unwrap();
        assert!(response.body.contains("dejure.org"));
    }
}
