//! Stream Readiness Probing
//!
//! Bounded-retry GET against the downstream playback URL. A 200 means the
//! endpoint is serving the playlist; any other status, and any transport
//! error, consumes one attempt and is retried after a fixed delay. Failures
//! are not surfaced as errors, but the last one travels with the outcome so
//! callers can say why the stream never became ready.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Result;

/// Default attempt budget (~20 s worst case at the default delay).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Prober configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    /// Attempt budget per probe run
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay between attempts, milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl ProbeConfig {
    /// Inter-attempt delay as a `Duration`.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Why the most recent attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeFailure {
    /// Endpoint answered with a non-200 status
    Status { code: u16 },
    /// Request failed before a response arrived
    Network { message: String },
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { code } => write!(f, "status {}", code),
            Self::Network { message } => write!(f, "network error: {}", message),
        }
    }
}

/// Result of a probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Endpoint returned 200
    Ready {
        /// Attempts used, including the successful one
        attempts: u32,
    },
    /// Budget exhausted without a 200
    NotReady {
        /// Attempts issued
        attempts: u32,
        /// Failure recorded on the final attempt, if any request went out
        last_failure: Option<ProbeFailure>,
    },
    /// Consumer tore down mid-probe
    Cancelled,
}

impl ProbeOutcome {
    /// Whether playback can start.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Readiness prober over a shared HTTP client.
#[derive(Debug, Clone)]
pub struct StreamProber {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl StreamProber {
    /// Build a prober with its own client.
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Probe with the configured attempt budget.
    pub async fn probe(&self, url: &str, cancel: &CancellationToken) -> ProbeOutcome {
        self.probe_with_budget(url, self.config.max_attempts, cancel)
            .await
    }

    /// Probe with an explicit attempt budget.
    ///
    /// A zero budget resolves `NotReady` without issuing any request.
    /// Cancellation is observed both between attempts and mid-request, so a
    /// torn-down consumer stops the probe instead of letting it run to
    /// exhaustion.
    pub async fn probe_with_budget(
        &self,
        url: &str,
        max_attempts: u32,
        cancel: &CancellationToken,
    ) -> ProbeOutcome {
        let mut last_failure = None;

        for attempt in 1..=max_attempts {
            // Wait between attempts, never before the first.
            if attempt > 1 {
                tokio::select! {
                    _ = cancel.cancelled() => return ProbeOutcome::Cancelled,
                    _ = tokio::time::sleep(self.config.retry_delay()) => {}
                }
            }

            let request = self.client.get(url).send();
            let response = tokio::select! {
                _ = cancel.cancelled() => return ProbeOutcome::Cancelled,
                response = request => response,
            };

            match response {
                Ok(response) if response.status().as_u16() == 200 => {
                    debug!(url, attempt, "stream endpoint ready");
                    return ProbeOutcome::Ready { attempts: attempt };
                }
                Ok(response) => {
                    let code = response.status().as_u16();
                    debug!(url, attempt, status = code, "stream endpoint not ready");
                    last_failure = Some(ProbeFailure::Status { code });
                }
                Err(err) => {
                    debug!(url, attempt, error = %err, "probe request failed");
                    last_failure = Some(ProbeFailure::Network {
                        message: err.to_string(),
                    });
                }
            }
        }

        ProbeOutcome::NotReady {
            attempts: max_attempts,
            last_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[derive(Clone)]
    struct FixtureState {
        hits: Arc<AtomicUsize>,
        responses: Arc<Vec<u16>>,
    }

    async fn playlist(State(state): State<FixtureState>) -> StatusCode {
        let n = state.hits.fetch_add(1, Ordering::SeqCst);
        let code = state
            .responses
            .get(n)
            .or_else(|| state.responses.last())
            .copied()
            .unwrap_or(404);
        StatusCode::from_u16(code).unwrap()
    }

    /// Serve `/stream.m3u8` answering with the given statuses in order
    /// (the last one repeats).
    async fn spawn_fixture(responses: Vec<u16>) -> (SocketAddr, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = FixtureState {
            hits: hits.clone(),
            responses: Arc::new(responses),
        };
        let app = Router::new()
            .route("/stream.m3u8", get(playlist))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, hits)
    }

    fn fast_prober(max_attempts: u32) -> StreamProber {
        StreamProber::new(ProbeConfig {
            max_attempts,
            retry_delay_ms: 20,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_not_ready_after_exact_budget() {
        let (addr, hits) = spawn_fixture(vec![404]).await;
        let prober = fast_prober(3);
        let url = format!("http://{addr}/stream.m3u8");

        let started = Instant::now();
        let outcome = prober.probe(&url, &CancellationToken::new()).await;

        assert_eq!(
            outcome,
            ProbeOutcome::NotReady {
                attempts: 3,
                last_failure: Some(ProbeFailure::Status { code: 404 }),
            }
        );
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        // Two inter-attempt delays for three attempts.
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_ready_on_second_attempt() {
        let (addr, hits) = spawn_fixture(vec![404, 200]).await;
        let prober = fast_prober(5);
        let url = format!("http://{addr}/stream.m3u8");

        let started = Instant::now();
        let outcome = prober.probe(&url, &CancellationToken::new()).await;

        assert_eq!(outcome, ProbeOutcome::Ready { attempts: 2 });
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_ready_immediately_skips_delay() {
        let (addr, hits) = spawn_fixture(vec![200]).await;
        let prober = fast_prober(5);
        let url = format!("http://{addr}/stream.m3u8");

        let outcome = prober.probe(&url, &CancellationToken::new()).await;
        assert_eq!(outcome, ProbeOutcome::Ready { attempts: 1 });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_budget_issues_no_requests() {
        let (addr, hits) = spawn_fixture(vec![200]).await;
        let prober = fast_prober(5);
        let url = format!("http://{addr}/stream.m3u8");

        let outcome = prober
            .probe_with_budget(&url, 0, &CancellationToken::new())
            .await;
        assert_eq!(
            outcome,
            ProbeOutcome::NotReady {
                attempts: 0,
                last_failure: None,
            }
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_network_errors_consume_attempts() {
        // Bind then drop so the port refuses connections.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let prober = fast_prober(2);
        let url = format!("http://{addr}/stream.m3u8");
        let outcome = prober.probe(&url, &CancellationToken::new()).await;

        match outcome {
            ProbeOutcome::NotReady {
                attempts: 2,
                last_failure: Some(ProbeFailure::Network { .. }),
            } => {}
            other => panic!("expected NotReady with a network failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_during_retry_wait() {
        let (addr, hits) = spawn_fixture(vec![404]).await;
        let prober = StreamProber::new(ProbeConfig {
            max_attempts: 10,
            retry_delay_ms: 5000,
        })
        .unwrap();
        let cancel = CancellationToken::new();
        let url = format!("http://{addr}/stream.m3u8");

        let handle = {
            let prober = prober.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { prober.probe(&url, &cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();

        assert_eq!(handle.await.unwrap(), ProbeOutcome::Cancelled);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
