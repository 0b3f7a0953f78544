use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use uuid::Uuid;

use mneme::review::{Card, ReviewAction};

use crate::app::App;

/// Interactive review session.
///
/// Walks the queue one card at a time, then re-fetches: a `repeat`
/// card comes back within the same session, and draining the
/// blocking deck releases the remaining decks on the next fetch.
pub fn run(app: &App, deck: Option<&str>) -> Result<()> {
    let deck_id = match deck {
        Some(name) => Some(app.find_deck(name)?.id),
        None => None,
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut reviewed = 0usize;

    loop {
        let queue = fetch_queue(app, deck_id)?;
        if queue.is_empty() {
            break;
        }

        for card in queue {
            if !review_one(app, &card, &mut input)? {
                println!("\nStopped. {} cards reviewed.", reviewed);
                return Ok(());
            }
            reviewed += 1;
        }
    }

    if reviewed == 0 {
        println!("No cards due.");
    } else {
        println!("\nQueue empty. {} cards reviewed.", reviewed);
    }
    Ok(())
}

fn fetch_queue(app: &App, deck_id: Option<Uuid>) -> Result<Vec<Card>> {
    let queue = match deck_id {
        Some(id) => app.store.deck_queue(id)?,
        None => app.store.review_queue(app.config.blocking_deck, false)?,
    };
    Ok(queue)
}

/// Show one card and submit the chosen action. Returns false when
/// the user quits.
fn review_one(app: &App, card: &Card, input: &mut impl BufRead) -> Result<bool> {
    println!();
    println!("Q: {}", card.front);
    print!("(Enter to reveal, q to quit) ");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    if line.trim() == "q" {
        return Ok(false);
    }

    println!("A: {}", card.back);

    loop {
        print!("[repeat / soon / later / complete / quit] > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        let answer = line.trim();
        if answer == "quit" || answer == "q" {
            return Ok(false);
        }

        match ReviewAction::from_str(answer) {
            Ok(action) => {
                app.store.submit_action(card.id, action)?;
                return Ok(true);
            }
            Err(e) => {
                println!("{}. Valid actions: repeat, soon, later, complete.", e);
            }
        }
    }
}
