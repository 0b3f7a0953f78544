use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

use super::format_day;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let decks = app.store.list_decks()?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = decks.iter().map(|deck| {
                serde_json::json!({
                    "id": deck.id.to_string(),
                    "name": deck.name,
                    "description": deck.description,
                    "cardCount": deck.card_count,
                    "createdAt": deck.created_at,
                })
            }).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("No decks. Create one with: mneme-cli decks new <name>");
                return Ok(());
            }

            let name_width = decks.iter().map(|d| d.name.len()).max().unwrap_or(4).max(4);

            println!("{:<nw$} {:>5} {}", "Name", "Cards", "Created", nw = name_width);
            println!("{} {} {}",
                "\u{2500}".repeat(name_width),
                "\u{2500}".repeat(5),
                "\u{2500}".repeat(10));

            for deck in &decks {
                println!("{:<nw$} {:>5} {}",
                    deck.name, deck.card_count, format_day(deck.created_at),
                    nw = name_width);
            }
        }
    }

    Ok(())
}

pub fn run_new(app: &App, name: &str, description: Option<String>, format: &OutputFormat) -> Result<()> {
    let deck = app.store.create_deck(name.to_string(), description)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": deck.id.to_string(),
                "name": deck.name,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Created deck \"{}\"", deck.name);
            println!("  ID: {}", deck.id);
        }
    }

    Ok(())
}

pub fn run_rename(app: &App, name: &str, new_name: &str) -> Result<()> {
    let deck = app.find_deck(name)?;
    app.store.rename_deck(deck.id, new_name.to_string())?;
    println!("Renamed \"{}\" to \"{}\"", deck.name, new_name);
    Ok(())
}

pub fn run_delete(app: &mut App, name: &str) -> Result<()> {
    let deck = app.find_deck(name)?;
    app.store.delete_deck(deck.id)?;
    println!("Deleted deck \"{}\" and its {} cards", deck.name, deck.card_count);
    Ok(())
}
