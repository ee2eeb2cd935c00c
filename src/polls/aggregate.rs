//! Poll Aggregation
//!
//! Pure summary computation for a poll at a given wall-clock instant:
//! per-option tallies, leading options, and live/draft/ended status.
//! No mutation happens here; the host re-runs this on every tick.

use std::collections::HashMap;
use std::fmt;

use super::config::Poll;

/// Lifecycle status shown next to a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// Active without a timer; the host ends it manually
    Live,
    /// Active with a running countdown (seconds left)
    EndsIn(u64),
    /// Not yet published
    Draft,
    /// No longer accepting submissions
    Ended,
}

impl fmt::Display for PollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "Live"),
            Self::EndsIn(secs) => write!(f, "Ends in {}", format_mm_ss(*secs)),
            Self::Draft => write!(f, "Draft"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

/// Format whole seconds as zero-padded `mm:ss`.
pub fn format_mm_ss(total_secs: u64) -> String {
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Per-option display tally.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionTally {
    /// Option this tally belongs to
    pub option_id: String,
    /// Submissions for this option
    pub count: u32,
    /// `count / total * 100`; 0.0 when the poll has no submissions
    pub percentage: f64,
    /// Correct option when the poll has a correct answer, else a current leader
    pub highlighted: bool,
}

impl OptionTally {
    /// Percentage truncated for display (66.6 -> 66)
    pub fn display_percent(&self) -> u32 {
        self.percentage.floor() as u32
    }
}

/// Snapshot of everything the poll panel renders for one poll.
#[derive(Debug, Clone)]
pub struct PollSummary {
    /// Option id of the viewing participant's first submission, if any
    pub local_submitted_option: Option<String>,
    /// Count of all submissions
    pub total_submissions: u32,
    /// Submission count per option id; zero-count options are absent
    pub grouped_submission_count: HashMap<String, u32>,
    /// All option ids tied for the highest count, in option declaration order
    pub max_submitted_options: Vec<String>,
    /// One tally per option, in option declaration order
    pub tallies: Vec<OptionTally>,
    /// Whether the poll currently accepts submissions
    pub active: bool,
    /// Seconds until the deadline (timer polls only)
    pub time_left_secs: Option<u64>,
    /// Status label for the header
    pub status: PollStatus,
}

impl PollSummary {
    /// Summarize a published poll as of `now_ms`.
    pub fn compute(poll: &Poll, local_participant_id: &str, now_ms: i64) -> Self {
        Self::build(poll, local_participant_id, now_ms, false)
    }

    /// Summarize a draft poll. Drafts are never active and have no countdown.
    pub fn compute_draft(poll: &Poll) -> Self {
        Self::build(poll, "", 0, true)
    }

    fn build(poll: &Poll, local_participant_id: &str, now_ms: i64, is_draft: bool) -> Self {
        let local_submitted_option = poll
            .submissions
            .iter()
            .find(|s| s.participant_id == local_participant_id)
            .map(|s| s.option_id.clone());

        let total_submissions = poll.submissions.len() as u32;

        let mut grouped_submission_count: HashMap<String, u32> = HashMap::new();
        for submission in &poll.submissions {
            *grouped_submission_count
                .entry(submission.option_id.clone())
                .or_insert(0) += 1;
        }

        // All ties for the max are leaders. Collected in option declaration
        // order; submissions for unknown option ids never become leaders.
        let max_count = grouped_submission_count.values().copied().max().unwrap_or(0);
        let max_submitted_options: Vec<String> = poll
            .options
            .iter()
            .filter(|o| grouped_submission_count.get(&o.option_id) == Some(&max_count))
            .map(|o| o.option_id.clone())
            .collect();

        let (active, time_left_secs) = if is_draft {
            (false, None)
        } else if poll.has_timer {
            let deadline = poll.deadline_ms().unwrap_or(now_ms);
            let left_ms = (deadline - now_ms).max(0);
            (left_ms > 0, Some(left_ms as u64 / 1000))
        } else {
            (poll.is_active, None)
        };

        let tallies = poll
            .options
            .iter()
            .map(|option| {
                let count = grouped_submission_count
                    .get(&option.option_id)
                    .copied()
                    .unwrap_or(0);
                let percentage = if total_submissions > 0 {
                    count as f64 / total_submissions as f64 * 100.0
                } else {
                    0.0
                };
                let highlighted = if poll.has_correct_answer {
                    option.is_correct
                } else {
                    max_submitted_options.contains(&option.option_id)
                };
                OptionTally {
                    option_id: option.option_id.clone(),
                    count,
                    percentage,
                    highlighted,
                }
            })
            .collect();

        let status = if active {
            if poll.has_timer {
                PollStatus::EndsIn(time_left_secs.unwrap_or(0))
            } else {
                PollStatus::Live
            }
        } else if is_draft {
            PollStatus::Draft
        } else {
            PollStatus::Ended
        };

        Self {
            local_submitted_option,
            total_submissions,
            grouped_submission_count,
            max_submitted_options,
            tallies,
            active,
            time_left_secs,
            status,
        }
    }
}
