//! Data models for decks, cards, and review scheduling state

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Seconds per collection day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// A deck is a named collection of cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub card_count: usize,
    /// Unix seconds
    pub created_at: i64,
    pub updated_at: i64,
}

impl Deck {
    pub fn new(name: String) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            card_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Learning phase of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    New,
    /// In initial learning phase
    Learning,
    /// Regular spaced review
    Review,
    /// Failed and re-learning
    Relearning,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::New
    }
}

impl CardStatus {
    /// Stored integer code
    pub fn code(self) -> i64 {
        match self {
            CardStatus::New => 0,
            CardStatus::Learning => 1,
            CardStatus::Review => 2,
            CardStatus::Relearning => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(CardStatus::New),
            1 => Some(CardStatus::Learning),
            2 => Some(CardStatus::Review),
            3 => Some(CardStatus::Relearning),
            _ => None,
        }
    }
}

/// Which queue a card sits in. Determines both eligibility and the
/// unit of `due`: a day index for `Review`, Unix seconds for
/// `Learning`/`Relearning`, ignored for `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardQueue {
    /// Excluded from review until externally reactivated
    Suspended,
    New,
    Learning,
    Review,
    Relearning,
}

impl Default for CardQueue {
    fn default() -> Self {
        Self::New
    }
}

impl CardQueue {
    /// Stored integer code
    pub fn code(self) -> i64 {
        match self {
            CardQueue::Suspended => -1,
            CardQueue::New => 0,
            CardQueue::Learning => 1,
            CardQueue::Review => 2,
            CardQueue::Relearning => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(CardQueue::Suspended),
            0 => Some(CardQueue::New),
            1 => Some(CardQueue::Learning),
            2 => Some(CardQueue::Review),
            3 => Some(CardQueue::Relearning),
            _ => None,
        }
    }

    /// Queue a card returns to when a suspension is lifted
    pub fn for_status(status: CardStatus) -> Self {
        match status {
            CardStatus::New => CardQueue::New,
            CardStatus::Learning => CardQueue::Learning,
            CardStatus::Review => CardQueue::Review,
            CardStatus::Relearning => CardQueue::Relearning,
        }
    }
}

/// Wall-clock snapshot taken once per engine call.
///
/// Every card evaluated within one call sees the same `now` and
/// `day_number`, so a due boundary cannot flicker mid-call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSnapshot {
    /// Current Unix timestamp in seconds
    pub now: i64,
    /// Whole days elapsed since the collection epoch
    pub day_number: i64,
}

impl TimeSnapshot {
    pub fn at(now: i64, epoch: i64) -> Self {
        Self {
            now,
            day_number: (now - epoch).div_euclid(SECONDS_PER_DAY),
        }
    }

    pub fn capture(epoch: i64) -> Self {
        Self::at(Utc::now().timestamp(), epoch)
    }
}

/// A flashcard with its scheduling state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default)]
    pub queue: CardQueue,
    /// Unit depends on `queue` (day index or Unix seconds)
    #[serde(default)]
    pub due: i64,
    /// Last computed spacing in days
    #[serde(default)]
    pub interval: i32,
    /// Total number of recorded actions
    #[serde(default)]
    pub review_count: i32,
    #[serde(default)]
    pub lapse_count: i32,
    /// Unix seconds
    pub created_at: i64,
    pub updated_at: i64,
}

impl Card {
    pub fn new(deck_id: Uuid, front: String, back: String) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front,
            back,
            status: CardStatus::default(),
            queue: CardQueue::default(),
            due: 0,
            interval: 0,
            review_count: 0,
            lapse_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the card is due at the given snapshot
    pub fn is_due(&self, at: &TimeSnapshot) -> bool {
        match self.queue {
            CardQueue::Suspended => false,
            CardQueue::New => true,
            CardQueue::Learning | CardQueue::Relearning => self.due <= at.now,
            CardQueue::Review => self.due <= at.day_number,
        }
    }
}

/// User response to a reviewed card.
///
/// The serialized names are the wire vocabulary: exactly the four
/// lowercase literals `repeat`, `soon`, `later`, `complete`. Anything
/// else is rejected before any state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    /// Show again this session
    Repeat,
    /// Due again tomorrow
    Soon,
    /// Due again in a week
    Later,
    /// Done with this card; suspend it
    Complete,
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewAction::Repeat => "repeat",
            ReviewAction::Soon => "soon",
            ReviewAction::Later => "later",
            ReviewAction::Complete => "complete",
        }
    }
}

#[derive(Error, Debug)]
#[error("Unknown review action: {0:?}")]
pub struct InvalidAction(pub String);

impl std::str::FromStr for ReviewAction {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat" => Ok(ReviewAction::Repeat),
            "soon" => Ok(ReviewAction::Soon),
            "later" => Ok(ReviewAction::Later),
            "complete" => Ok(ReviewAction::Complete),
            _ => Err(InvalidAction(s.to_string())),
        }
    }
}

/// Statistics for a deck or the whole collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub suspended_cards: usize,
    pub due_cards: usize,
}

impl Default for ReviewStats {
    fn default() -> Self {
        Self {
            total_cards: 0,
            new_cards: 0,
            learning_cards: 0,
            review_cards: 0,
            suspended_cards: 0,
            due_cards: 0,
        }
    }
}
