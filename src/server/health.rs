//! Server readiness polling
//!
//! The chat loop must not start before the server answers its health
//! endpoint, so startup blocks here until 200 OK or the deadline passes.

use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

/// Per-request timeout while polling.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from readiness polling
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("server failed to become ready within {0:?}")]
    Timeout(Duration),
}

/// Poll `{base_url}/health` until it returns 200 or `deadline` elapses.
///
/// Connection errors, probe timeouts, and non-200 statuses all mean the
/// same thing: not ready yet. A progress dot goes to stderr per attempt.
pub async fn wait_for_ready(
    client: &reqwest::Client,
    base_url: &str,
    deadline: Duration,
    interval: Duration,
) -> Result<(), HealthError> {
    let url = format!("{base_url}/health");
    let start = Instant::now();

    while start.elapsed() < deadline {
        match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("health probe succeeded after {:?}", start.elapsed());
                return Ok(());
            }
            Ok(response) => {
                tracing::trace!(status = %response.status(), "server not ready");
            }
            Err(e) => {
                tracing::trace!("health probe failed: {e}");
            }
        }

        eprint!(".");
        let _ = std::io::stderr().flush();
        tokio::time::sleep(interval).await;
    }

    Err(HealthError::Timeout(deadline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned HTTP responses on an ephemeral port.
    async fn stub_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_ready_server_returns_ok() {
        let base_url = stub_server("200 OK").await;
        let client = reqwest::Client::new();

        let result = wait_for_ready(
            &client,
            &base_url,
            Duration::from_secs(5),
            Duration::from_millis(50),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unhealthy_server_times_out() {
        let base_url = stub_server("503 Service Unavailable").await;
        let client = reqwest::Client::new();

        let result = wait_for_ready(
            &client,
            &base_url,
            Duration::from_millis(200),
            Duration::from_millis(50),
        )
        .await;
        assert!(matches!(result, Err(HealthError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_times_out() {
        // Bind-then-drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = reqwest::Client::new();
        let result = wait_for_ready(
            &client,
            &format!("http://{addr}"),
            Duration::from_millis(200),
            Duration::from_millis(50),
        )
        .await;
        assert!(result.is_err());
    }
}
