//! Due-card selection and queue ordering
//!
//! Queue order is a fresh uniform shuffle on every build: due and
//! overdue cards are equally urgent, so no oldest-first sort is
//! applied. The blocking deck is a two-tier gate — while it has due
//! cards, the queue contains only those; once it drains, every due
//! card across all decks is visible.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::models::{Card, TimeSnapshot};

/// Filter to the cards due at the given snapshot
pub fn due_cards(cards: Vec<Card>, at: &TimeSnapshot) -> Vec<Card> {
    cards.into_iter().filter(|c| c.is_due(at)).collect()
}

/// Build the global review queue.
///
/// If the blocking deck has due cards and `include_all` is false,
/// only those are returned. Otherwise the full due set is returned,
/// blocking-deck cards included. With no blocking deck configured the
/// gate is skipped entirely.
pub fn build_queue<R: Rng>(
    cards: Vec<Card>,
    blocking_deck: Option<Uuid>,
    include_all: bool,
    at: &TimeSnapshot,
    rng: &mut R,
) -> Vec<Card> {
    let mut due = due_cards(cards, at);

    if !include_all {
        if let Some(deck_id) = blocking_deck {
            let mut blocking: Vec<Card> = due
                .iter()
                .filter(|c| c.deck_id == deck_id)
                .cloned()
                .collect();
            if !blocking.is_empty() {
                blocking.shuffle(rng);
                return blocking;
            }
        }
    }

    due.shuffle(rng);
    due
}

/// Build the queue for a single deck, bypassing the blocking gate
pub fn build_deck_queue<R: Rng>(
    cards: Vec<Card>,
    deck_id: Uuid,
    at: &TimeSnapshot,
    rng: &mut R,
) -> Vec<Card> {
    let mut due: Vec<Card> = due_cards(cards, at)
        .into_iter()
        .filter(|c| c.deck_id == deck_id)
        .collect();
    due.shuffle(rng);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::models::CardQueue;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const AT: TimeSnapshot = TimeSnapshot { now: 1_000_000, day_number: 50 };

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn card(deck_id: Uuid, queue: CardQueue, due: i64) -> Card {
        let mut card = Card::new(deck_id, "front".into(), "back".into());
        card.queue = queue;
        card.due = due;
        card
    }

    fn ids(cards: &[Card]) -> HashSet<Uuid> {
        cards.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_due_filter_mixes_units() {
        let deck = Uuid::new_v4();
        let cards = vec![
            card(deck, CardQueue::Review, 50),
            card(deck, CardQueue::Review, 51),
            card(deck, CardQueue::Learning, 999_999),
            card(deck, CardQueue::Learning, 1_000_001),
            card(deck, CardQueue::New, 9_999_999),
            card(deck, CardQueue::Suspended, 0),
        ];
        let expected: HashSet<Uuid> = [cards[0].id, cards[2].id, cards[4].id].into_iter().collect();

        let due = due_cards(cards, &AT);
        assert_eq!(ids(&due), expected);
    }

    #[test]
    fn test_blocking_deck_dominates() {
        let blocking = Uuid::new_v4();
        let other = Uuid::new_v4();
        let cards = vec![
            card(blocking, CardQueue::New, 0),
            card(blocking, CardQueue::Review, 10),
            card(other, CardQueue::New, 0),
            card(other, CardQueue::Review, 10),
        ];
        let blocking_ids: HashSet<Uuid> = [cards[0].id, cards[1].id].into_iter().collect();

        let queue = build_queue(cards, Some(blocking), false, &AT, &mut rng());
        assert_eq!(ids(&queue), blocking_ids);
    }

    #[test]
    fn test_blocking_release_shows_everything() {
        let blocking = Uuid::new_v4();
        let other = Uuid::new_v4();
        let cards = vec![
            // Blocking deck has cards, but none due
            card(blocking, CardQueue::Review, 51),
            card(blocking, CardQueue::Suspended, 0),
            card(other, CardQueue::New, 0),
            card(other, CardQueue::Review, 49),
        ];
        let expected: HashSet<Uuid> = [cards[2].id, cards[3].id].into_iter().collect();

        let queue = build_queue(cards, Some(blocking), false, &AT, &mut rng());
        assert_eq!(ids(&queue), expected);
    }

    #[test]
    fn test_include_all_override() {
        let blocking = Uuid::new_v4();
        let other = Uuid::new_v4();
        let cards = vec![
            card(blocking, CardQueue::New, 0),
            card(other, CardQueue::New, 0),
        ];
        let all: HashSet<Uuid> = [cards[0].id, cards[1].id].into_iter().collect();

        let queue = build_queue(cards, Some(blocking), true, &AT, &mut rng());
        assert_eq!(ids(&queue), all);
    }

    #[test]
    fn test_no_blocking_deck_configured() {
        let deck = Uuid::new_v4();
        let cards = vec![card(deck, CardQueue::New, 0), card(deck, CardQueue::Review, 50)];
        let all: HashSet<Uuid> = [cards[0].id, cards[1].id].into_iter().collect();

        let queue = build_queue(cards, None, false, &AT, &mut rng());
        assert_eq!(ids(&queue), all);
    }

    #[test]
    fn test_shuffle_is_a_bijection() {
        let deck = Uuid::new_v4();
        let cards: Vec<Card> = (0..100).map(|_| card(deck, CardQueue::New, 0)).collect();
        let expected = ids(&cards);

        let queue = build_queue(cards, None, false, &AT, &mut rng());
        assert_eq!(queue.len(), 100);
        assert_eq!(ids(&queue), expected);
    }

    #[test]
    fn test_deck_queue_ignores_blocking_gate() {
        let blocking = Uuid::new_v4();
        let other = Uuid::new_v4();
        let cards = vec![
            card(blocking, CardQueue::New, 0),
            card(other, CardQueue::New, 0),
            card(other, CardQueue::Review, 51),
        ];
        let expected: HashSet<Uuid> = [cards[1].id].into_iter().collect();

        let queue = build_deck_queue(cards, other, &AT, &mut rng());
        assert_eq!(ids(&queue), expected);
    }
}
