//! Viewer Display State
//!
//! Derives what the stream viewer surface shows from the meeting context and
//! the latest probe outcome, and hands a ready URL to the playback sink.
//! The sink (media-source library or native fallback) does the actual
//! decoding; nothing here touches media.

use super::probe::ProbeOutcome;
use super::Result;
use crate::context::{HlsJoinState, MeetingContext};
use crate::events::{PubSubBus, UiEvent};

/// What the viewer surface renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerView {
    /// Stream is ready; attach the URL and play
    Playing {
        url: String,
        controls_visible: bool,
    },
    /// Host explicitly stopped the live stream
    Stopped,
    /// Stream never started, or is not ready yet
    Waiting,
}

impl PlayerView {
    /// Derive the view from context plus the latest probe outcome (if a
    /// probe has run).
    pub fn derive(ctx: &MeetingContext, probe: Option<&ProbeOutcome>) -> Self {
        if let (Some(url), Some(outcome)) = (&ctx.downstream_url, probe) {
            if outcome.is_ready() {
                return Self::Playing {
                    url: url.clone(),
                    controls_visible: ctx.hls_player_controls_visible,
                };
            }
        }
        if ctx.hls_join_state == HlsJoinState::Stopped {
            Self::Stopped
        } else {
            Self::Waiting
        }
    }
}

/// Playback backends available to the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerBackend {
    /// Media-source playback through the streaming library
    MediaSource,
    /// Native playback when the library is unsupported
    Native,
}

/// Pick the playback backend for the host surface.
pub fn select_backend(media_source_supported: bool) -> PlayerBackend {
    if media_source_supported {
        PlayerBackend::MediaSource
    } else {
        PlayerBackend::Native
    }
}

/// Opaque playback collaborator. The decode pipeline lives behind it.
pub trait PlaybackSink {
    /// Attach a stream URL and begin playback.
    fn attach(&mut self, url: &str) -> Result<()>;
}

/// Viewer panel glue: fullscreen signal and playback handoff.
pub struct ViewerPanel<'a> {
    bus: &'a PubSubBus,
}

impl<'a> ViewerPanel<'a> {
    pub fn new(bus: &'a PubSubBus) -> Self {
        Self { bus }
    }

    /// Double-click toggles fullscreen on the host surface.
    pub fn on_double_click(&self) {
        self.bus.emit_ui(UiEvent::ToggleFullscreen);
    }

    /// Attach a ready stream to the sink. Returns whether playback started.
    pub fn hand_off(&self, view: &PlayerView, sink: &mut dyn PlaybackSink) -> Result<bool> {
        match view {
            PlayerView::Playing { url, .. } => {
                sink.attach(url)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
