use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, deck_name: &str, front: String, back: String, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let card = app.store.create_card(deck.id, front, back)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": card.id.to_string(),
                "deckId": card.deck_id.to_string(),
                "front": card.front,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Added card to \"{}\"", deck.name);
            println!("  ID: {}", card.id);
        }
    }

    Ok(())
}
