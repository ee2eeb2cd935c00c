//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `probe <url>` -- check stream readiness with bounded retry
//! - `summarize <poll.json>` -- compute and print a poll summary
//! - `mock-hls` -- serve a local endpoint that turns ready after N requests

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Headless meeting side-panel tools.
#[derive(Parser, Debug)]
#[command(
    name = "meetpanel",
    version = env!("CARGO_PKG_VERSION"),
    about = "meetpanel: poll summaries and HLS stream readiness"
)]
pub struct Cli {
    /// Path to a JSON config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe a stream URL for readiness.
    Probe {
        /// Playback URL to probe.
        url: String,

        /// Attempt budget (default: from config, 20).
        #[arg(short, long)]
        attempts: Option<u32>,

        /// Delay between attempts in milliseconds (default: from config, 1000).
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Compute and print the summary for a poll JSON file.
    Summarize {
        /// Path to the poll JSON.
        poll: PathBuf,

        /// Participant id used for the "your submission" lookup.
        #[arg(short = 'p', long, default_value = "")]
        participant: String,
    },

    /// Serve a mock HLS endpoint that turns ready after N requests.
    MockHls {
        /// Port to listen on.
        #[arg(short = 'P', long, default_value_t = 8787)]
        port: u16,

        /// Requests answered 404 before the endpoint turns ready.
        #[arg(long, default_value_t = 5)]
        ready_after: u64,
    },
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::MeetpanelConfig;
use crate::hls::{ProbeOutcome, StreamProber};
use crate::polls::{now_millis, Poll, PollSummary};

/// Run the `probe` subcommand. Returns whether the stream is ready.
pub async fn handle_probe(
    config: &MeetpanelConfig,
    url: &str,
    attempts: Option<u32>,
    delay_ms: Option<u64>,
) -> Result<bool, Box<dyn std::error::Error>> {
    // Fail fast on unparseable URLs instead of burning the attempt budget.
    let url = url::Url::parse(url).map_err(crate::hls::HlsError::InvalidUrl)?;

    let mut probe_config = config.prober.clone();
    if let Some(attempts) = attempts {
        probe_config.max_attempts = attempts;
    }
    if let Some(delay_ms) = delay_ms {
        probe_config.retry_delay_ms = delay_ms;
    }

    let prober = StreamProber::new(probe_config)?;
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let outcome = prober.probe(url.as_str(), &cancel).await;
    match &outcome {
        ProbeOutcome::Ready { attempts } => {
            println!("ready after {} attempt(s)", attempts);
        }
        ProbeOutcome::NotReady {
            attempts,
            last_failure,
        } => match last_failure {
            Some(failure) => println!("not ready after {} attempt(s): {}", attempts, failure),
            None => println!("not ready: zero attempt budget"),
        },
        ProbeOutcome::Cancelled => println!("cancelled"),
    }
    Ok(outcome.is_ready())
}

/// Run the `summarize` subcommand.
pub fn handle_summarize(
    poll_path: &PathBuf,
    participant: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(poll_path)?;
    let poll: Poll = serde_json::from_str(&raw)?;
    let summary = PollSummary::compute(&poll, participant, now_millis());

    println!("Poll {} ({})", poll.index, summary.status);
    println!("{}", poll.question);
    for (option, tally) in poll.options.iter().zip(&summary.tallies) {
        let marker = if tally.highlighted { " *" } else { "" };
        let yours = if summary.local_submitted_option.as_deref() == Some(&option.option_id) {
            "  (your submission)"
        } else {
            ""
        };
        println!(
            "  {:<24} {:>3} vote(s)  {:>3}%{}{}",
            option.option,
            tally.count,
            tally.display_percent(),
            marker,
            yours
        );
    }
    println!("{} submission(s) total", summary.total_submissions);
    Ok(())
}

#[derive(Clone)]
struct MockHlsState {
    hits: Arc<AtomicU64>,
    ready_after: u64,
}

async fn mock_playlist(State(state): State<MockHlsState>) -> Response {
    let n = state.hits.fetch_add(1, Ordering::SeqCst);
    if n < state.ready_after {
        StatusCode::NOT_FOUND.into_response()
    } else {
        (
            [(header::CONTENT_TYPE, "application/vnd.apple.mpegurl")],
            "#EXTM3U\n#EXT-X-VERSION:3\n",
        )
            .into_response()
    }
}

/// Run the `mock-hls` subcommand.
pub async fn handle_mock_hls(
    port: u16,
    ready_after: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = MockHlsState {
        hits: Arc::new(AtomicU64::new(0)),
        ready_after,
    };
    let app = Router::new()
        .route("/stream.m3u8", get(mock_playlist))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!(port, ready_after, "mock HLS endpoint listening");
    axum::serve(listener, app).await?;
    Ok(())
}
