mod app;
mod commands;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "mneme-cli", about = "Mneme flashcard review CLI", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Deck management
    #[command(subcommand)]
    Decks(DecksCommand),

    /// Add a card to a deck
    Add {
        /// Deck name (case-insensitive prefix match)
        deck: String,
        /// Question side
        front: String,
        /// Answer side
        back: String,
    },

    /// Print the current review queue
    Queue {
        /// Restrict to one deck, bypassing the blocking deck
        #[arg(long)]
        deck: Option<String>,
        /// Show every due card even while the blocking deck has some
        #[arg(long)]
        all: bool,
    },

    /// Review due cards interactively
    Review {
        /// Restrict to one deck, bypassing the blocking deck
        #[arg(long)]
        deck: Option<String>,
    },

    /// Show review statistics
    Stats {
        /// Restrict to one deck
        #[arg(long)]
        deck: Option<String>,
    },

    /// Move a card to another deck
    Move {
        /// Card ID
        card: Uuid,
        /// Target deck name
        deck: String,
    },

    /// Reactivate a completed (suspended) card
    Resume {
        /// Card ID
        card: Uuid,
    },
}

#[derive(Subcommand)]
enum DecksCommand {
    /// List decks with card counts
    List,

    /// Create a new deck
    New {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Rename a deck
    Rename {
        name: String,
        new_name: String,
    },

    /// Delete a deck and all its cards
    Delete {
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Decks(subcmd) => {
            let mut app = app::App::new(cli.data_dir.as_deref())?;
            match subcmd {
                DecksCommand::List => commands::decks::run_list(&app, &cli.format)?,
                DecksCommand::New { name, description } => {
                    commands::decks::run_new(&app, &name, description, &cli.format)?;
                }
                DecksCommand::Rename { name, new_name } => {
                    commands::decks::run_rename(&app, &name, &new_name)?;
                }
                DecksCommand::Delete { name } => {
                    commands::decks::run_delete(&mut app, &name)?;
                }
            }
        }
        Command::Add { deck, front, back } => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::add::run(&app, &deck, front, back, &cli.format)?;
        }
        Command::Queue { deck, all } => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::queue::run(&app, deck.as_deref(), all, &cli.format)?;
        }
        Command::Review { deck } => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::review::run(&app, deck.as_deref())?;
        }
        Command::Stats { deck } => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::stats::run(&app, deck.as_deref(), &cli.format)?;
        }
        Command::Move { card, deck } => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::card::run_move(&app, card, &deck)?;
        }
        Command::Resume { card } => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::card::run_resume(&app, card)?;
        }
    }

    Ok(())
}
