use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use mneme::config::Config;
use mneme::review::{CardStore, Deck};

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub store: CardStore,
}

impl App {
    /// Initialize from the data directory
    pub fn new(data_dir: Option<&str>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(path) => PathBuf::from(path),
            None => Config::default_data_dir().context("Failed to get data directory")?,
        };

        let config = Config::load(&data_dir).context("Failed to load configuration")?;
        let store = CardStore::open(config.collection_path(&data_dir))
            .context("Failed to open card collection")?;

        Ok(Self { config, store })
    }

    /// Find a deck by name (case-insensitive prefix match)
    pub fn find_deck(&self, name: &str) -> Result<Deck> {
        let decks = self.store.list_decks().context("Failed to list decks")?;

        let name_lower = name.to_lowercase();

        // Exact match first
        if let Some(deck) = decks.iter().find(|d| d.name.to_lowercase() == name_lower) {
            return Ok(deck.clone());
        }

        // Prefix match
        let matches: Vec<&Deck> = decks.iter()
            .filter(|d| d.name.to_lowercase().starts_with(&name_lower))
            .collect();

        match matches.len() {
            0 => bail!("No deck matching '{}'. Available decks:\n{}", name,
                decks.iter().map(|d| format!("  - {}", d.name)).collect::<Vec<_>>().join("\n")),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous deck name '{}'. Matches:\n{}", name,
                matches.iter().map(|d| format!("  - {}", d.name)).collect::<Vec<_>>().join("\n")),
        }
    }
}
