//! Poll Countdown
//!
//! 1 Hz recomputation driver for timer polls. The countdown is monotonic:
//! once it reaches zero it publishes a terminal inactive state and the tick
//! task exits; a poll instance never reactivates. Teardown cancels the task
//! through an owned token instead of letting it run to exhaustion.

use tokio::sync::watch;
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::config::Poll;

/// State published on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    /// Whole seconds until the deadline
    pub time_left_secs: u64,
    /// Whether the poll is still accepting submissions
    pub active: bool,
}

fn remaining(deadline_ms: i64, now_ms: i64) -> CountdownState {
    let left_ms = (deadline_ms - now_ms).max(0);
    CountdownState {
        time_left_secs: left_ms as u64 / 1000,
        active: left_ms > 0,
    }
}

/// Handle to a running poll countdown.
///
/// Dropping the handle cancels the tick task.
#[derive(Debug)]
pub struct PollCountdown {
    rx: watch::Receiver<CountdownState>,
    cancel: CancellationToken,
}

impl PollCountdown {
    /// Start a countdown for a timer poll, seeded with `now_ms`.
    ///
    /// Polls whose deadline already passed (and polls without a timer) get
    /// the terminal state immediately and no tick task.
    pub fn start(poll: &Poll, now_ms: i64) -> Self {
        let deadline_ms = poll.deadline_ms().unwrap_or(now_ms);
        let initial = remaining(deadline_ms, now_ms);
        let (tx, rx) = watch::channel(initial);
        let cancel = CancellationToken::new();

        if initial.active {
            let token = cancel.clone();
            let poll_id = poll.id.clone();
            // The tick clock is the tokio clock; wall time only seeds it.
            let started = Instant::now();
            tokio::spawn(async move {
                let mut ticker = time::interval(Duration::from_secs(1));
                ticker.tick().await;
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = ticker.tick() => {
                            let now = now_ms + started.elapsed().as_millis() as i64;
                            let state = remaining(deadline_ms, now);
                            if tx.send(state).is_err() {
                                break;
                            }
                            if !state.active {
                                debug!(poll_id = %poll_id, "poll countdown reached zero");
                                break;
                            }
                        }
                    }
                }
            });
        }

        Self { rx, cancel }
    }

    /// Latest published state.
    pub fn state(&self) -> CountdownState {
        *self.rx.borrow()
    }

    /// Receiver for tick-by-tick updates.
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.rx.clone()
    }

    /// Stop the tick task. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PollCountdown {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polls::config::Poll;

    #[tokio::test(start_paused = true)]
    async fn test_countdown_runs_to_terminal_state() {
        let poll = Poll::new("p1", "Q?").created_at(0).with_timer(3);
        let countdown = PollCountdown::start(&poll, 0);
        let mut rx = countdown.subscribe();

        assert_eq!(
            countdown.state(),
            CountdownState {
                time_left_secs: 3,
                active: true
            }
        );

        // The paused clock auto-advances through the 1 s ticks.
        while rx.borrow().active {
            rx.changed().await.unwrap();
        }
        let terminal = *rx.borrow();
        assert_eq!(terminal.time_left_secs, 0);
        assert!(!terminal.active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_state_never_reactivates() {
        let poll = Poll::new("p1", "Q?").created_at(0).with_timer(1);
        let countdown = PollCountdown::start(&poll, 0);
        let mut rx = countdown.subscribe();

        while rx.borrow().active {
            rx.changed().await.unwrap();
        }

        // The sender side hung up after the terminal tick; no further states.
        assert!(rx.changed().await.is_err());
        assert!(!countdown.state().active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_expired_poll_is_terminal_immediately() {
        let poll = Poll::new("p1", "Q?").created_at(0).with_timer(10);
        let countdown = PollCountdown::start(&poll, 60_000);
        assert_eq!(
            countdown.state(),
            CountdownState {
                time_left_secs: 0,
                active: false
            }
        );

        let mut rx = countdown.subscribe();
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_the_tick_task() {
        let poll = Poll::new("p1", "Q?").created_at(0).with_timer(600);
        let countdown = PollCountdown::start(&poll, 0);
        let mut rx = countdown.subscribe();

        rx.changed().await.unwrap();
        let seen = *rx.borrow();
        assert!(seen.active);

        countdown.stop();
        // Task exits without publishing a terminal state; the poll simply
        // stops being observed.
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_without_timer_gets_no_task() {
        let poll = Poll::new("p1", "Q?").active(true);
        let countdown = PollCountdown::start(&poll, 0);
        assert!(!countdown.state().active);

        let mut rx = countdown.subscribe();
        assert!(rx.changed().await.is_err());
    }
}
