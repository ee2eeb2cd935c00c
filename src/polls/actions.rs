//! Poll Intents
//!
//! Builders for the outbound poll actions. Components return these intents;
//! the host publishes them (persisted) and applies the mutations through
//! `MeetingContext::apply`.

use uuid::Uuid;

use crate::events::OutboundEvent;
use crate::polls::config::{now_millis, Poll};

/// Events produced by promoting a draft, in publish order.
#[derive(Debug, Clone)]
pub struct DraftPromotion {
    /// Drop the source draft first
    pub remove: OutboundEvent,
    /// Then publish the new live poll
    pub create: OutboundEvent,
}

impl DraftPromotion {
    /// The two events in publish order.
    pub fn into_events(self) -> [OutboundEvent; 2] {
        [self.remove, self.create]
    }
}

/// Promote a draft to a live poll.
///
/// The new poll gets a fresh id, empty submissions, `is_active` set, a
/// creation timestamp stamped now, and the next display ordinal
/// (`current_poll_count + 1`). Question, options, and timer settings carry
/// over unchanged.
pub fn promote_draft(draft: &Poll, current_poll_count: usize) -> DraftPromotion {
    let poll = Poll {
        id: Uuid::new_v4().to_string(),
        question: draft.question.clone(),
        options: draft.options.clone(),
        submissions: Vec::new(),
        has_timer: draft.has_timer,
        timeout: draft.timeout,
        created_at: now_millis(),
        has_correct_answer: draft.has_correct_answer,
        is_active: true,
        index: current_poll_count as u32 + 1,
    };
    DraftPromotion {
        remove: OutboundEvent::RemovePollFromDraft {
            poll_id: draft.id.clone(),
        },
        create: OutboundEvent::CreatePoll(poll),
    }
}

/// End intent for a manually controlled poll.
///
/// Only currently-active polls without a timer can be ended by the host;
/// timer polls end on their own.
pub fn end_poll(poll: &Poll) -> Option<OutboundEvent> {
    (!poll.has_timer && poll.is_active).then(|| OutboundEvent::EndPoll {
        poll_id: poll.id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polls::config::PollOption;

    fn draft() -> Poll {
        Poll::new("draft-1", "Favorite color?")
            .with_timer(30)
            .with_options(vec![
                PollOption::new("o1", "Red"),
                PollOption::new("o2", "Blue"),
            ])
    }

    #[test]
    fn test_promote_draft_builds_fresh_poll() {
        let source = draft();
        let promotion = promote_draft(&source, 2);

        let OutboundEvent::CreatePoll(poll) = &promotion.create else {
            panic!("expected CreatePoll");
        };
        assert_ne!(poll.id, source.id);
        assert_eq!(poll.question, source.question);
        assert_eq!(poll.options, source.options);
        assert_eq!(poll.timeout, 30);
        assert!(poll.has_timer);
        assert!(poll.is_active);
        assert!(poll.submissions.is_empty());
        assert_eq!(poll.index, 3);

        assert_eq!(
            promotion.remove,
            OutboundEvent::RemovePollFromDraft {
                poll_id: "draft-1".to_string()
            }
        );
    }

    #[test]
    fn test_promotions_get_distinct_ids() {
        let source = draft();
        let first = promote_draft(&source, 0);
        let second = promote_draft(&source, 0);
        let (OutboundEvent::CreatePoll(a), OutboundEvent::CreatePoll(b)) =
            (&first.create, &second.create)
        else {
            panic!("expected CreatePoll");
        };
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_promotion_event_order() {
        let promotion = promote_draft(&draft(), 0);
        let [first, second] = promotion.into_events();
        assert_eq!(first.topic(), "REMOVE_POLL_FROM_DRAFT");
        assert_eq!(second.topic(), "CREATE_POLL");
    }

    #[test]
    fn test_end_poll_only_for_active_manual_polls() {
        let manual_active = Poll::new("p1", "Q?").active(true);
        assert_eq!(
            end_poll(&manual_active),
            Some(OutboundEvent::EndPoll {
                poll_id: "p1".to_string()
            })
        );

        let manual_ended = Poll::new("p2", "Q?").active(false);
        assert_eq!(end_poll(&manual_ended), None);

        let timer_poll = Poll::new("p3", "Q?").with_timer(30).active(true);
        assert_eq!(end_poll(&timer_poll), None);
    }
}
