//! Meeting Context
//!
//! Host-owned state handed to the panel components as plain values. The
//! components never mutate it in place; they publish intents on the bus and
//! the host applies them here. Single writer per field, read-many.

use serde::{Deserialize, Serialize};

use crate::events::OutboundEvent;
use crate::polls::config::Poll;

/// Appearance mode selected by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppTheme {
    Dark,
    Light,
    #[default]
    Default,
}

/// HLS state observed after the local participant joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HlsJoinState {
    /// Host never started (or has not yet started) the stream
    #[default]
    NotStarted,
    /// Stream is (or was) running
    Playing,
    /// Host explicitly stopped the stream
    Stopped,
}

/// Shared application context consumed by the panel components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingContext {
    /// Published polls, in display order
    pub polls: Vec<Poll>,
    /// Drafts awaiting promotion, in display order
    pub draft_polls: Vec<Poll>,
    /// Playback URL for the live stream, when one exists
    pub downstream_url: Option<String>,
    /// Whether the viewer surface shows player controls
    pub hls_player_controls_visible: bool,
    /// Stream state observed after joining
    pub hls_join_state: HlsJoinState,
    /// Appearance mode
    pub theme: AppTheme,
}

impl MeetingContext {
    /// Host-side reducer: apply a published event to the owned collections.
    pub fn apply(&mut self, event: &OutboundEvent) {
        match event {
            OutboundEvent::CreatePoll(poll) => self.polls.push(poll.clone()),
            OutboundEvent::RemovePollFromDraft { poll_id } => {
                self.draft_polls.retain(|p| p.id != *poll_id);
            }
            OutboundEvent::EndPoll { poll_id } => {
                if let Some(poll) = self.polls.iter_mut().find(|p| p.id == *poll_id) {
                    poll.is_active = false;
                }
            }
        }
    }
}
