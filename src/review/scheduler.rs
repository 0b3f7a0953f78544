//! Due-date transitions for the four review actions
//!
//! Intervals here are fixed offsets, not an adaptive algorithm:
//! `soon` reschedules for tomorrow, `later` for a week out, `repeat`
//! drops the card back into the learning queue so it comes up again
//! in the same session, and `complete` suspends it until reactivated.

use super::models::{Card, CardQueue, CardStatus, ReviewAction, TimeSnapshot};

/// Day offset applied by `soon`
const SOON_DAYS: i64 = 1;

/// Day offset applied by `later`
const LATER_DAYS: i64 = 7;

/// Scheduling fields a card takes after an action
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub queue: CardQueue,
    pub status: CardStatus,
    pub due: i64,
    pub interval: i32,
}

/// Compute the schedule an action moves a card to.
///
/// `repeat` lands in the learning queue with `due = now`, so the card
/// is already due again the moment it is rescheduled. `soon`/`later`
/// move to the review queue with a day-index due value. `complete`
/// suspends and leaves every other scheduling field untouched.
pub fn schedule_action(card: &Card, action: ReviewAction, at: &TimeSnapshot) -> ActionOutcome {
    match action {
        ReviewAction::Repeat => ActionOutcome {
            queue: CardQueue::Learning,
            status: CardStatus::Learning,
            due: at.now,
            interval: 0,
        },
        ReviewAction::Soon => ActionOutcome {
            queue: CardQueue::Review,
            status: CardStatus::Review,
            due: at.day_number + SOON_DAYS,
            interval: SOON_DAYS as i32,
        },
        ReviewAction::Later => ActionOutcome {
            queue: CardQueue::Review,
            status: CardStatus::Review,
            due: at.day_number + LATER_DAYS,
            interval: LATER_DAYS as i32,
        },
        ReviewAction::Complete => ActionOutcome {
            queue: CardQueue::Suspended,
            status: card.status,
            due: card.due,
            interval: card.interval,
        },
    }
}

/// Apply an action to a card in place.
///
/// Bumps the action counter and the modification timestamp on every
/// transition. `lapse_count` is carried but never incremented; no
/// action is a distinct failure rating.
pub fn apply_action(card: &mut Card, action: ReviewAction, at: &TimeSnapshot) {
    let outcome = schedule_action(card, action, at);

    card.queue = outcome.queue;
    card.status = outcome.status;
    card.due = outcome.due;
    card.interval = outcome.interval;
    card.review_count += 1;
    card.updated_at = at.now;
}
