use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};

use crate::error::{DdnsError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends a single bodyless request and hands back status and body.
///
/// Non-2xx statuses are returned as-is; interpreting them is up to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, method: Method, url: Url) -> Result<HttpResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DdnsError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, method: Method, url: Url) -> Result<HttpResponse> {
        let url_str = url.to_string();

        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(|source| DdnsError::Transport {
                url: url_str.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| DdnsError::Transport {
                url: url_str,
                source,
            })?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("ispconfig-ddns/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new().unwrap();
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{}/ddns/update.php", port)).unwrap();

        let err = transport.send(Method::POST, url).await.unwrap_err();
        assert!(matches!(err, DdnsError::Transport { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_truncated_body_is_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Promise 100 bytes, send 2, then hang up
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nOK")
                .await;
            let _ = socket.shutdown().await;
        });

        let transport = ReqwestTransport::new().unwrap();
        let url = Url::parse(&format!("http://{}/ddns/update.php", addr)).unwrap();

        let err = transport.send(Method::POST, url).await.unwrap_err();
        match err {
            DdnsError::Transport { url, .. } => assert!(url.ends_with("/ddns/update.php")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
