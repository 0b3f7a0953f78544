use std::collections::HashMap;

use anyhow::Result;
use uuid::Uuid;

use mneme::review::{Card, CardQueue, SECONDS_PER_DAY};

use crate::app::App;
use crate::OutputFormat;

use super::{format_day, queue_label};

pub fn run(app: &App, deck: Option<&str>, all: bool, format: &OutputFormat) -> Result<()> {
    let cards = match deck {
        Some(name) => {
            let deck = app.find_deck(name)?;
            app.store.deck_queue(deck.id)?
        }
        None => app.store.review_queue(app.config.blocking_deck, all)?,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards due.");
                return Ok(());
            }

            let deck_names: HashMap<Uuid, String> = app.store.list_decks()?
                .into_iter()
                .map(|d| (d.id, d.name))
                .collect();

            let front_width = 40;
            let deck_width = 16;
            let queue_width = 10;

            println!("{:<fw$} {:<dw$} {:<qw$} {}",
                "Front", "Deck", "Queue", "Due",
                fw = front_width, dw = deck_width, qw = queue_width);
            println!("{} {} {} {}",
                "\u{2500}".repeat(front_width),
                "\u{2500}".repeat(deck_width),
                "\u{2500}".repeat(queue_width),
                "\u{2500}".repeat(10));

            for card in &cards {
                let front = if card.front.len() > front_width {
                    format!("{}...", &card.front[..front_width - 3])
                } else {
                    card.front.clone()
                };

                let deck_name = deck_names.get(&card.deck_id)
                    .map(String::as_str)
                    .unwrap_or("?");

                println!("{:<fw$} {:<dw$} {:<qw$} {}",
                    front, deck_name, queue_label(card.queue),
                    format_due(card, app.store.creation_time()),
                    fw = front_width, dw = deck_width, qw = queue_width);
            }

            println!("\n{} cards due", cards.len());
        }
    }

    Ok(())
}

/// Render a card's due value in its own unit: review cards carry a
/// day index from the collection epoch, learning cards a timestamp
fn format_due(card: &Card, epoch: i64) -> String {
    match card.queue {
        CardQueue::New => "now".to_string(),
        CardQueue::Learning | CardQueue::Relearning => {
            chrono::DateTime::from_timestamp(card.due, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| card.due.to_string())
        }
        CardQueue::Review => format_day(epoch + card.due * SECONDS_PER_DAY),
        CardQueue::Suspended => "suspended".to_string(),
    }
}
