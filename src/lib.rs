//! Mneme — review queue over a spaced-repetition card collection
//!
//! The collection is a single SQLite file holding decks and cards.
//! Cards become due by queue-specific rules (day index for review
//! cards, Unix seconds for learning cards, always for new cards), a
//! configured blocking deck preempts the queue while it has due
//! cards, and four fixed actions (`repeat`, `soon`, `later`,
//! `complete`) advance a card's schedule.

pub mod config;
pub mod review;
