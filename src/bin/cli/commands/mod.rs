pub mod add;
pub mod card;
pub mod decks;
pub mod queue;
pub mod review;
pub mod stats;

use mneme::review::CardQueue;

/// Short label for a queue, used in tables and confirmations
pub(crate) fn queue_label(queue: CardQueue) -> &'static str {
    match queue {
        CardQueue::Suspended => "suspended",
        CardQueue::New => "new",
        CardQueue::Learning => "learning",
        CardQueue::Review => "review",
        CardQueue::Relearning => "relearning",
    }
}

/// Render a Unix timestamp as a calendar date
pub(crate) fn format_day(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts.to_string())
}
