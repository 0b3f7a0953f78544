use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, deck: Option<&str>, format: &OutputFormat) -> Result<()> {
    let (label, deck_id) = match deck {
        Some(name) => {
            let deck = app.find_deck(name)?;
            (deck.name.clone(), Some(deck.id))
        }
        None => ("all decks".to_string(), None),
    };

    let stats = app.store.review_stats(deck_id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Stats for {}:", label);
            println!("  Total:      {}", stats.total_cards);
            println!("  New:        {}", stats.new_cards);
            println!("  Learning:   {}", stats.learning_cards);
            println!("  Review:     {}", stats.review_cards);
            println!("  Suspended:  {}", stats.suspended_cards);
            println!("  Due now:    {}", stats.due_cards);
        }
    }

    Ok(())
}
