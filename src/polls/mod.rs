//! Poll Panel Module
//!
//! Aggregation, countdown, and intent builders for the poll side panel.
//! Rendering stays with the host application; this module only computes
//! display state and returns outbound intents.

pub mod actions;
pub mod aggregate;
pub mod config;
pub mod countdown;

pub use actions::{end_poll, promote_draft, DraftPromotion};
pub use aggregate::{format_mm_ss, OptionTally, PollStatus, PollSummary};
pub use config::{now_millis, Poll, PollOption, Submission};
pub use countdown::{CountdownState, PollCountdown};
