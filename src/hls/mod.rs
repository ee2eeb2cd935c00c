//! HLS Viewer Module
//!
//! Stream readiness probing and viewer display-state derivation. The media
//! decode/playback pipeline is an opaque collaborator behind `PlaybackSink`.

pub mod probe;
pub mod viewer;

pub use probe::{ProbeConfig, ProbeFailure, ProbeOutcome, StreamProber};
pub use viewer::{select_backend, PlaybackSink, PlayerBackend, PlayerView, ViewerPanel};

use thiserror::Error;

/// HLS module errors
#[derive(Error, Debug)]
pub enum HlsError {
    #[error("invalid stream url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("playback attach failed: {0}")]
    Attach(String),
}

/// Result type for HLS operations
pub type Result<T> = std::result::Result<T, HlsError>;
