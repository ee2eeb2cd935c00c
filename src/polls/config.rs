//! Poll Data Model
//!
//! Shapes shared between the aggregator, the intent builders, and the wire
//! events. Submissions are append-only; one per participant is expected but
//! not enforced at this layer.

use serde::{Deserialize, Serialize};

/// A single answer choice within a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    /// Option ID (unique within the poll)
    pub option_id: String,
    /// Option text/label
    pub option: String,
    /// Whether this is the correct answer (quiz-style polls)
    #[serde(default)]
    pub is_correct: bool,
}

impl PollOption {
    /// Create a new poll option
    pub fn new(option_id: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            option_id: option_id.into(),
            option: option.into(),
            is_correct: false,
        }
    }

    /// Mark as correct answer
    pub fn correct(mut self) -> Self {
        self.is_correct = true;
        self
    }
}

/// One participant's submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Participant who submitted
    pub participant_id: String,
    /// Option they picked
    pub option_id: String,
}

impl Submission {
    /// Create a new submission
    pub fn new(participant_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            option_id: option_id.into(),
        }
    }
}

/// A poll, or a draft poll pre-publication; the shape is shared.
///
/// Liveness is decided by exactly one of two mechanisms, selected by
/// `has_timer`: the deadline `created_at + timeout * 1000`, or the
/// host-controlled `is_active` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    /// Poll ID (opaque, unique)
    pub id: String,
    /// Question text
    pub question: String,
    /// Ordered answer choices
    pub options: Vec<PollOption>,
    /// Submitted answers, append-only
    #[serde(default)]
    pub submissions: Vec<Submission>,
    /// Whether the poll ends on a countdown rather than manually
    #[serde(default)]
    pub has_timer: bool,
    /// Countdown duration in seconds (timer polls)
    #[serde(default)]
    pub timeout: u64,
    /// When the poll went live (unix ms)
    pub created_at: i64,
    /// Whether options carry a correctness flag
    #[serde(default)]
    pub has_correct_answer: bool,
    /// Host-controlled active flag; authoritative only when `has_timer` is false
    #[serde(default)]
    pub is_active: bool,
    /// Display ordinal
    #[serde(default)]
    pub index: u32,
}

impl Poll {
    /// Create a new poll
    pub fn new(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            options: Vec::new(),
            submissions: Vec::new(),
            has_timer: false,
            timeout: 0,
            created_at: now_millis(),
            has_correct_answer: false,
            is_active: false,
            index: 0,
        }
    }

    /// Set options
    pub fn with_options(mut self, options: Vec<PollOption>) -> Self {
        self.options = options;
        self
    }

    /// Enable the countdown with a duration in seconds
    pub fn with_timer(mut self, timeout_secs: u64) -> Self {
        self.has_timer = true;
        self.timeout = timeout_secs;
        self
    }

    /// Mark that options carry a correctness flag
    pub fn with_correct_answer(mut self) -> Self {
        self.has_correct_answer = true;
        self
    }

    /// Set the manual active flag
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Set the creation timestamp (unix ms)
    pub fn created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the display ordinal
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Append a submission
    pub fn with_submission(mut self, submission: Submission) -> Self {
        self.submissions.push(submission);
        self
    }

    /// Absolute countdown deadline (unix ms); None for manual polls
    pub fn deadline_ms(&self) -> Option<i64> {
        self.has_timer
            .then(|| self.created_at + self.timeout as i64 * 1000)
    }
}

/// Current wall-clock time as unix milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
