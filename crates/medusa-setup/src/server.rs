//! Dev-server launch, readiness polling, and browser hand-off

use std::process::Stdio;
use std::time::Duration;

use camino::Utf8Path;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Health endpoint exposed by the Medusa dev server
pub const HEALTH_URL: &str = "http://localhost:9000/health";

/// Admin dashboard URL opened once the server is healthy
pub const ADMIN_URL: &str = "http://localhost:9000/app";

/// How long to poll the health endpoint before giving up
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Delay between health probes
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Per-probe budget so a stalled request cannot outlive the overall bound
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Start the Medusa dev server rooted at the project directory
///
/// The child's stdout/stderr stream straight to the parent terminal. This
/// call does not wait for the server to exit; the caller decides when to
/// reap or kill it.
pub fn start_server(directory: &Utf8Path) -> Result<Child> {
    info!("Starting Medusa dev server in {}", directory);

    let child = Command::new("npx")
        .args(["-y", "@medusajs/medusa-cli@latest", "develop"])
        .current_dir(directory)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::command_not_found("npx")
            } else {
                Error::Io(e)
            }
        })?;

    Ok(child)
}

/// Poll a health endpoint until it answers successfully
///
/// Returns `true` once the endpoint responds with a success status, `false`
/// when the bound elapses or the token is cancelled first. Never an error:
/// the server process itself already started, so an unhealthy endpoint is a
/// soft failure for the caller to warn about.
pub async fn wait_for_health(url: &str, timeout: Duration, cancel: &CancellationToken) -> bool {
    // The per-request timeout keeps a server that accepts connections but
    // never answers from pinning the poll past its bound.
    let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Could not build health-check client: {}", e);
            return false;
        }
    };
    let deadline = tokio::time::Instant::now() + timeout;

    debug!("Waiting for {} (up to {:?})", url, timeout);

    loop {
        if tokio::time::Instant::now() >= deadline {
            warn!("Health endpoint {} never became ready", url);
            return false;
        }

        tokio::select! {
            result = client.get(url).send() => match result {
                Ok(response) if response.status().is_success() => {
                    info!("Health endpoint {} is ready", url);
                    return true;
                }
                Ok(response) => debug!("Health probe returned {}", response.status()),
                Err(e) => debug!("Health probe failed: {}", e),
            },
            _ = cancel.cancelled() => {
                debug!("Health polling cancelled");
                return false;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            _ = cancel.cancelled() => {
                debug!("Health polling cancelled");
                return false;
            }
        }
    }
}

/// Open the admin dashboard in the default browser
///
/// Best effort; a headless environment just gets a warning.
pub fn open_admin_dashboard() {
    if let Err(e) = open::that(ADMIN_URL) {
        warn!("Could not open browser at {}: {}", ADMIN_URL, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_wait_for_health_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/health", server.uri());
        let token = CancellationToken::new();
        assert!(wait_for_health(&url, Duration::from_secs(5), &token).await);
    }

    #[tokio::test]
    async fn test_wait_for_health_recovers_after_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/health", server.uri());
        let token = CancellationToken::new();
        assert!(wait_for_health(&url, Duration::from_secs(10), &token).await);
    }

    #[tokio::test]
    async fn test_wait_for_health_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = format!("{}/health", server.uri());
        let token = CancellationToken::new();
        assert!(!wait_for_health(&url, Duration::from_millis(900), &token).await);
    }

    #[tokio::test]
    async fn test_wait_for_health_cancellation_during_stalled_request() {
        // Server accepts the connection but never answers; cancelling must
        // end the poll while the request is still in flight.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(60)))
            .mount(&server)
            .await;

        let url = format!("{}/health", server.uri());
        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        let start = std::time::Instant::now();
        let healthy = wait_for_health(&url, Duration::from_secs(30), &token).await;
        assert!(!healthy);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_wait_for_health_bound_holds_during_stalled_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(60)))
            .mount(&server)
            .await;

        let url = format!("{}/health", server.uri());
        let token = CancellationToken::new();

        let start = std::time::Instant::now();
        let healthy = wait_for_health(&url, Duration::from_secs(1), &token).await;
        assert!(!healthy);
        // Bound plus at most one per-probe budget, never the server's delay.
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_wait_for_health_cancellation() {
        // Unreachable endpoint; cancellation must end the poll before the bound.
        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        let start = std::time::Instant::now();
        let healthy =
            wait_for_health("http://127.0.0.1:1/health", Duration::from_secs(30), &token).await;
        assert!(!healthy);
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
