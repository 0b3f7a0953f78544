use anyhow::Result;
use uuid::Uuid;

use crate::app::App;

use super::queue_label;

pub fn run_move(app: &App, card_id: Uuid, deck_name: &str) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let card = app.store.move_card(card_id, deck.id)?;
    println!("Moved card {} to \"{}\"", card.id, deck.name);
    Ok(())
}

pub fn run_resume(app: &App, card_id: Uuid) -> Result<()> {
    let card = app.store.resume_card(card_id)?;
    println!("Card {} is in the {} queue", card.id, queue_label(card.queue));
    Ok(())
}
