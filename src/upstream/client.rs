use std::io::Read;
use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use crate::server::config::UpstreamConfig;
use crate::upstream::{Fetch, UpstreamError};

/// Upper bound on a provider response we are willing to cache
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// Blocking `getMonitors` client
///
/// ureq is synchronous, so each request runs on tokio's blocking pool.
#[derive(Clone)]
pub struct UptimeRobotClient {
    agent: ureq::Agent,
    api_url: String,
}

impl UptimeRobotClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        Self {
            agent,
            api_url: config.api_url.clone(),
        }
    }

    fn post(agent: &ureq::Agent, url: &str, body: &[u8]) -> Result<Bytes, UpstreamError> {
        let response = match agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_bytes(body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => return Err(UpstreamError::Http(status)),
            Err(ureq::Error::Transport(e)) => return Err(UpstreamError::Transport(e.to_string())),
        };

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(UpstreamError::Http(status));
        }

        let mut buf = Vec::new();
        response
            .into_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut buf)
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        if buf.iter().all(u8::is_ascii_whitespace) {
            return Err(UpstreamError::EmptyBody);
        }
        Ok(Bytes::from(buf))
    }
}

#[async_trait]
impl Fetch for UptimeRobotClient {
    async fn fetch(&self, body: Bytes) -> Result<Bytes, UpstreamError> {
        let agent = self.agent.clone();
        let url = self.api_url.clone();

        tracing::debug!("POST {} ({} bytes)", url, body.len());
        tokio::task::spawn_blocking(move || Self::post(&agent, &url, &body))
            .await
            .map_err(|e| UpstreamError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};

    /// Serves `app` on an ephemeral loopback port and returns its URL.
    async fn spawn_provider(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v2/getMonitors", addr)
    }

    fn client_for(url: String) -> UptimeRobotClient {
        UptimeRobotClient::new(&UpstreamConfig {
            api_url: url,
            connect_timeout_secs: 2,
            timeout_secs: 3,
            ..UpstreamConfig::default()
        })
    }

    #[tokio::test]
    async fn test_success_echoes_body() {
        let app = Router::new().route(
            "/v2/getMonitors",
            post(|body: Bytes| async move { body }),
        );
        let client = client_for(spawn_provider(app).await);

        let body = Bytes::from_static(br#"{"stat":"ok","monitors":[]}"#);
        let got = client.fetch(body.clone()).await.unwrap();
        assert_eq!(got, body);
    }

    #[tokio::test]
    async fn test_non_2xx_is_http_error() {
        let app = Router::new().route(
            "/v2/getMonitors",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
        );
        let client = client_for(spawn_provider(app).await);

        let err = client.fetch(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Http(503)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_empty_body() {
        let app = Router::new().route("/v2/getMonitors", post(|| async { "" }));
        let client = client_for(spawn_provider(app).await);

        let err = client.fetch(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, UpstreamError::EmptyBody), "{:?}", err);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // bind and drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/v2/getMonitors", addr));
        let err = client.fetch(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)), "{:?}", err);
    }
}
