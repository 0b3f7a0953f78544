//! SQLite-backed store for the card collection
//!
//! One database file holds the collection epoch, decks, and cards.
//! The epoch row is written on first open and never rewritten; it is
//! the zero point for review-queue day numbers.

use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

use super::models::*;
use super::queue::{build_deck_queue, build_queue};
use super::scheduler::apply_action;

#[derive(Error, Debug)]
pub enum CardStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, CardStoreError>;

/// Column list shared by every card SELECT so row mapping stays in
/// one place
const CARD_COLUMNS: &str =
    "id, deck_id, front, back, status, queue, due, interval, review_count, lapse_count, created_at, updated_at";

/// Store for decks, cards, and the collection epoch
pub struct CardStore {
    conn: Connection,
    creation_time: i64,
    db_path: PathBuf,
}

impl CardStore {
    /// Open (or initialize) the collection at the given path
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;

        conn.execute_batch(
            r#"
            -- Singleton row holding the collection creation epoch
            CREATE TABLE IF NOT EXISTS collection (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS decks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            -- due is a day index for queue 2 (review) and Unix seconds
            -- for queues 1/3 (learning/relearning)
            CREATE TABLE IF NOT EXISTS cards (
                id TEXT PRIMARY KEY,
                deck_id TEXT NOT NULL,
                front TEXT NOT NULL,
                back TEXT NOT NULL,
                status INTEGER NOT NULL,
                queue INTEGER NOT NULL,
                due INTEGER NOT NULL,
                interval INTEGER NOT NULL,
                review_count INTEGER NOT NULL,
                lapse_count INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY (deck_id) REFERENCES decks(id)
            );

            CREATE INDEX IF NOT EXISTS idx_cards_deck_id ON cards(deck_id);
            CREATE INDEX IF NOT EXISTS idx_cards_queue ON cards(queue);
            "#,
        )?;

        let creation_time: Option<i64> = conn
            .query_row("SELECT created_at FROM collection WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let creation_time = match creation_time {
            Some(t) => t,
            None => {
                let now = Utc::now().timestamp();
                conn.execute(
                    "INSERT INTO collection (id, created_at) VALUES (1, ?1)",
                    params![now],
                )?;
                log::info!("Initialized card collection at {:?}", db_path);
                now
            }
        };

        Ok(Self {
            conn,
            creation_time,
            db_path,
        })
    }

    /// Collection creation epoch (Unix seconds), fixed at first open
    pub fn creation_time(&self) -> i64 {
        self.creation_time
    }

    /// Get the database path
    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Take the wall-clock snapshot used for one queue or action call
    fn snapshot(&self) -> TimeSnapshot {
        TimeSnapshot::capture(self.creation_time)
    }

    // ==================== Deck Operations ====================

    /// Create a new deck
    pub fn create_deck(&self, name: String, description: Option<String>) -> Result<Deck> {
        let mut deck = Deck::new(name);
        deck.description = description;

        self.conn.execute(
            "INSERT INTO decks (id, name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                deck.id.to_string(),
                deck.name,
                deck.description,
                deck.created_at,
                deck.updated_at,
            ],
        )?;

        log::info!("Created deck '{}' ({})", deck.name, deck.id);
        Ok(deck)
    }

    /// List all decks with their card counts
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.id, d.name, d.description, d.created_at, d.updated_at,
                   (SELECT COUNT(*) FROM cards c WHERE c.deck_id = d.id)
            FROM decks d
            ORDER BY d.name
            "#,
        )?;

        let decks = stmt
            .query_map([], deck_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(decks)
    }

    /// Get a specific deck
    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        self.conn
            .query_row(
                r#"
                SELECT d.id, d.name, d.description, d.created_at, d.updated_at,
                       (SELECT COUNT(*) FROM cards c WHERE c.deck_id = d.id)
                FROM decks d
                WHERE d.id = ?1
                "#,
                params![deck_id.to_string()],
                deck_from_row,
            )
            .optional()?
            .ok_or(CardStoreError::DeckNotFound(deck_id))
    }

    /// Rename a deck
    pub fn rename_deck(&self, deck_id: Uuid, name: String) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE decks SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![name, Utc::now().timestamp(), deck_id.to_string()],
        )?;
        if changed == 0 {
            return Err(CardStoreError::DeckNotFound(deck_id));
        }
        Ok(())
    }

    /// Delete a deck and all its cards
    pub fn delete_deck(&mut self, deck_id: Uuid) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM cards WHERE deck_id = ?1",
            params![deck_id.to_string()],
        )?;
        let changed = tx.execute(
            "DELETE FROM decks WHERE id = ?1",
            params![deck_id.to_string()],
        )?;
        if changed == 0 {
            return Err(CardStoreError::DeckNotFound(deck_id));
        }

        tx.commit()?;
        Ok(())
    }

    // ==================== Card Operations ====================

    /// Create a new card in a deck. Starts in the new queue, due
    /// immediately.
    pub fn create_card(&self, deck_id: Uuid, front: String, back: String) -> Result<Card> {
        // SQLite does not enforce the foreign key by default
        self.get_deck(deck_id)?;

        let card = Card::new(deck_id, front, back);
        self.insert_card(&card)?;
        Ok(card)
    }

    fn insert_card(&self, card: &Card) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO cards ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                CARD_COLUMNS
            ),
            params![
                card.id.to_string(),
                card.deck_id.to_string(),
                card.front,
                card.back,
                card.status.code(),
                card.queue.code(),
                card.due,
                card.interval,
                card.review_count,
                card.lapse_count,
                card.created_at,
                card.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a specific card
    pub fn get_card(&self, card_id: Uuid) -> Result<Card> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM cards WHERE id = ?1", CARD_COLUMNS),
                params![card_id.to_string()],
                card_from_row,
            )
            .optional()?
            .ok_or(CardStoreError::CardNotFound(card_id))
    }

    /// List all cards in a deck
    pub fn list_cards(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM cards WHERE deck_id = ?1 ORDER BY created_at",
            CARD_COLUMNS
        ))?;

        let cards = stmt
            .query_map(params![deck_id.to_string()], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    /// List all cards across all decks
    pub fn list_all_cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM cards ORDER BY created_at", CARD_COLUMNS))?;

        let cards = stmt
            .query_map([], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    /// Write every mutable field of a card back to its row
    pub fn update_card(&self, card: &Card) -> Result<()> {
        let changed = self.conn.execute(
            r#"
            UPDATE cards
            SET deck_id = ?1, front = ?2, back = ?3, status = ?4, queue = ?5,
                due = ?6, interval = ?7, review_count = ?8, lapse_count = ?9,
                updated_at = ?10
            WHERE id = ?11
            "#,
            params![
                card.deck_id.to_string(),
                card.front,
                card.back,
                card.status.code(),
                card.queue.code(),
                card.due,
                card.interval,
                card.review_count,
                card.lapse_count,
                card.updated_at,
                card.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(CardStoreError::CardNotFound(card.id));
        }
        Ok(())
    }

    /// Update a card's text
    pub fn edit_card(&self, card_id: Uuid, front: String, back: String) -> Result<Card> {
        let mut card = self.get_card(card_id)?;
        card.front = front;
        card.back = back;
        card.updated_at = Utc::now().timestamp();
        self.update_card(&card)?;
        Ok(card)
    }

    /// Delete a card
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM cards WHERE id = ?1",
            params![card_id.to_string()],
        )?;
        if changed == 0 {
            return Err(CardStoreError::CardNotFound(card_id));
        }
        Ok(())
    }

    /// Move a card to another deck. Scheduling state travels with it.
    pub fn move_card(&self, card_id: Uuid, deck_id: Uuid) -> Result<Card> {
        self.get_deck(deck_id)?;

        let mut card = self.get_card(card_id)?;
        card.deck_id = deck_id;
        card.updated_at = Utc::now().timestamp();
        self.update_card(&card)?;
        Ok(card)
    }

    /// Lift a suspension, returning the card to the queue matching
    /// its status. Cards that are not suspended are left untouched.
    pub fn resume_card(&self, card_id: Uuid) -> Result<Card> {
        let mut card = self.get_card(card_id)?;
        if card.queue == CardQueue::Suspended {
            card.queue = CardQueue::for_status(card.status);
            card.updated_at = Utc::now().timestamp();
            self.update_card(&card)?;
        }
        Ok(card)
    }

    // ==================== Review Operations ====================

    /// Build the review queue. While the blocking deck has due cards
    /// they are returned alone (unless `include_all` overrides);
    /// order is freshly shuffled on every call.
    pub fn review_queue(&self, blocking_deck: Option<Uuid>, include_all: bool) -> Result<Vec<Card>> {
        let at = self.snapshot();
        let cards = self.list_all_cards()?;
        Ok(build_queue(
            cards,
            blocking_deck,
            include_all,
            &at,
            &mut rand::thread_rng(),
        ))
    }

    /// Build the queue for a single deck, bypassing the blocking gate
    pub fn deck_queue(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        self.get_deck(deck_id)?;

        let at = self.snapshot();
        let cards = self.list_cards(deck_id)?;
        Ok(build_deck_queue(cards, deck_id, &at, &mut rand::thread_rng()))
    }

    /// Apply a review action to a card and persist the result
    pub fn submit_action(&self, card_id: Uuid, action: ReviewAction) -> Result<Card> {
        let at = self.snapshot();
        let mut card = self.get_card(card_id)?;

        apply_action(&mut card, action, &at);
        self.update_card(&card)?;

        Ok(card)
    }

    /// Review statistics for one deck or the whole collection
    pub fn review_stats(&self, deck_id: Option<Uuid>) -> Result<ReviewStats> {
        let cards = match deck_id {
            Some(id) => self.list_cards(id)?,
            None => self.list_all_cards()?,
        };

        let at = self.snapshot();
        let mut stats = ReviewStats::default();
        stats.total_cards = cards.len();

        for card in &cards {
            match card.queue {
                CardQueue::Suspended => stats.suspended_cards += 1,
                CardQueue::New => stats.new_cards += 1,
                CardQueue::Learning | CardQueue::Relearning => stats.learning_cards += 1,
                CardQueue::Review => stats.review_cards += 1,
            }

            if card.is_due(&at) {
                stats.due_cards += 1;
            }
        }

        Ok(stats)
    }
}

/// Code stored for a status or queue column was outside the enum
#[derive(Error, Debug)]
#[error("Invalid {field} code: {code}")]
struct InvalidCode {
    field: &'static str,
    code: i64,
}

fn uuid_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn status_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<CardStatus> {
    let code: i64 = row.get(idx)?;
    CardStatus::from_code(code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            Box::new(InvalidCode { field: "status", code }),
        )
    })
}

fn queue_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<CardQueue> {
    let code: i64 = row.get(idx)?;
    CardQueue::from_code(code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            Box::new(InvalidCode { field: "queue", code }),
        )
    })
}

/// Map a row in CARD_COLUMNS order to a Card
fn card_from_row(row: &rusqlite::Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: uuid_column(row, 0)?,
        deck_id: uuid_column(row, 1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        status: status_column(row, 4)?,
        queue: queue_column(row, 5)?,
        due: row.get(6)?,
        interval: row.get(7)?,
        review_count: row.get(8)?,
        lapse_count: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// Map a deck row (with trailing card count) to a Deck
fn deck_from_row(row: &rusqlite::Row) -> rusqlite::Result<Deck> {
    Ok(Deck {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        card_count: row.get::<_, i64>(5)? as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, CardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CardStore::open(dir.path().join("collection.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_epoch_fixed_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.db");

        let first = CardStore::open(path.clone()).unwrap().creation_time();
        let second = CardStore::open(path).unwrap().creation_time();
        assert_eq!(first, second);
    }

    #[test]
    fn test_deck_crud() {
        let (_dir, mut store) = open_store();

        let deck = store.create_deck("Spanish".into(), Some("vocab".into())).unwrap();
        store.create_deck("Chemistry".into(), None).unwrap();

        let decks = store.list_decks().unwrap();
        assert_eq!(decks.len(), 2);
        // Sorted by name
        assert_eq!(decks[0].name, "Chemistry");
        assert_eq!(decks[1].name, "Spanish");
        assert_eq!(decks[1].description.as_deref(), Some("vocab"));

        store.rename_deck(deck.id, "Español".into()).unwrap();
        assert_eq!(store.get_deck(deck.id).unwrap().name, "Español");

        store.create_card(deck.id, "hola".into(), "hello".into()).unwrap();
        assert_eq!(store.get_deck(deck.id).unwrap().card_count, 1);

        store.delete_deck(deck.id).unwrap();
        assert!(matches!(
            store.get_deck(deck.id),
            Err(CardStoreError::DeckNotFound(_))
        ));
        // Cards went with the deck
        assert!(store.list_all_cards().unwrap().is_empty());
    }

    #[test]
    fn test_new_card_defaults_and_is_queued() {
        let (_dir, store) = open_store();
        let deck = store.create_deck("Default".into(), None).unwrap();

        let card = store.create_card(deck.id, "front".into(), "back".into()).unwrap();
        assert_eq!(card.status, CardStatus::New);
        assert_eq!(card.queue, CardQueue::New);
        assert_eq!(card.review_count, 0);
        assert_eq!(card.lapse_count, 0);

        let queue = store.review_queue(None, false).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, card.id);
    }

    #[test]
    fn test_create_card_unknown_deck() {
        let (_dir, store) = open_store();
        let result = store.create_card(Uuid::new_v4(), "f".into(), "b".into());
        assert!(matches!(result, Err(CardStoreError::DeckNotFound(_))));
    }

    #[test]
    fn test_submit_later_persists() {
        let (_dir, store) = open_store();
        let deck = store.create_deck("Default".into(), None).unwrap();
        let card = store.create_card(deck.id, "front".into(), "back".into()).unwrap();

        let day = TimeSnapshot::capture(store.creation_time()).day_number;
        let updated = store.submit_action(card.id, ReviewAction::Later).unwrap();

        assert_eq!(updated.queue, CardQueue::Review);
        assert_eq!(updated.status, CardStatus::Review);
        assert_eq!(updated.due, day + 7);
        assert_eq!(updated.interval, 7);
        assert_eq!(updated.review_count, 1);

        // Persisted, and no longer due today
        let reloaded = store.get_card(card.id).unwrap();
        assert_eq!(reloaded.due, day + 7);
        assert!(store.review_queue(None, false).unwrap().is_empty());
    }

    #[test]
    fn test_submit_unknown_card() {
        let (_dir, store) = open_store();
        let result = store.submit_action(Uuid::new_v4(), ReviewAction::Soon);
        assert!(matches!(result, Err(CardStoreError::CardNotFound(_))));
    }

    #[test]
    fn test_repeat_reenters_queue() {
        let (_dir, store) = open_store();
        let deck = store.create_deck("Default".into(), None).unwrap();
        let card = store.create_card(deck.id, "front".into(), "back".into()).unwrap();

        store.submit_action(card.id, ReviewAction::Repeat).unwrap();

        let queue = store.review_queue(None, false).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].queue, CardQueue::Learning);
    }

    #[test]
    fn test_complete_is_sticky_until_resumed() {
        let (_dir, store) = open_store();
        let deck = store.create_deck("Default".into(), None).unwrap();
        let card = store.create_card(deck.id, "front".into(), "back".into()).unwrap();

        store.submit_action(card.id, ReviewAction::Complete).unwrap();

        assert!(store.review_queue(None, false).unwrap().is_empty());
        assert!(store.review_queue(None, true).unwrap().is_empty());
        assert!(store.deck_queue(deck.id).unwrap().is_empty());

        let resumed = store.resume_card(card.id).unwrap();
        assert_eq!(resumed.queue, CardQueue::New);
        assert_eq!(store.review_queue(None, false).unwrap().len(), 1);
    }

    #[test]
    fn test_blocking_gate_through_store() {
        let (_dir, store) = open_store();
        let blocking = store.create_deck("Urgent".into(), None).unwrap();
        let other = store.create_deck("Backlog".into(), None).unwrap();

        let urgent = store.create_card(blocking.id, "u".into(), "u".into()).unwrap();
        store.create_card(other.id, "b".into(), "b".into()).unwrap();

        let queue = store.review_queue(Some(blocking.id), false).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, urgent.id);

        // Draining the blocking deck releases the rest
        store.submit_action(urgent.id, ReviewAction::Complete).unwrap();
        let queue = store.review_queue(Some(blocking.id), false).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].deck_id, other.id);
    }

    #[test]
    fn test_move_card() {
        let (_dir, store) = open_store();
        let from = store.create_deck("From".into(), None).unwrap();
        let to = store.create_deck("To".into(), None).unwrap();
        let card = store.create_card(from.id, "f".into(), "b".into()).unwrap();

        let moved = store.move_card(card.id, to.id).unwrap();
        assert_eq!(moved.deck_id, to.id);
        assert_eq!(store.list_cards(to.id).unwrap().len(), 1);
        assert!(store.list_cards(from.id).unwrap().is_empty());

        assert!(matches!(
            store.move_card(card.id, Uuid::new_v4()),
            Err(CardStoreError::DeckNotFound(_))
        ));
    }

    #[test]
    fn test_edit_and_delete_card() {
        let (_dir, store) = open_store();
        let deck = store.create_deck("Default".into(), None).unwrap();
        let card = store.create_card(deck.id, "f".into(), "b".into()).unwrap();

        let edited = store.edit_card(card.id, "front".into(), "back".into()).unwrap();
        assert_eq!(edited.front, "front");
        assert_eq!(store.get_card(card.id).unwrap().back, "back");

        store.delete_card(card.id).unwrap();
        assert!(matches!(
            store.get_card(card.id),
            Err(CardStoreError::CardNotFound(_))
        ));
    }

    #[test]
    fn test_review_stats() {
        let (_dir, store) = open_store();
        let deck = store.create_deck("Default".into(), None).unwrap();

        let a = store.create_card(deck.id, "a".into(), "a".into()).unwrap();
        let b = store.create_card(deck.id, "b".into(), "b".into()).unwrap();
        store.create_card(deck.id, "c".into(), "c".into()).unwrap();

        store.submit_action(a.id, ReviewAction::Later).unwrap();
        store.submit_action(b.id, ReviewAction::Complete).unwrap();

        let stats = store.review_stats(Some(deck.id)).unwrap();
        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.new_cards, 1);
        assert_eq!(stats.review_cards, 1);
        assert_eq!(stats.suspended_cards, 1);
        assert_eq!(stats.due_cards, 1);
    }
}
