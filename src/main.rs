// src/main.rs
//
// Terminal front end for the rules engine: read a move, attempt it, print
// the board and any rejection reason. All chess knowledge lives in the
// library; this loop only shuttles text.

use chess_core::GameState;
use std::error::Error;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn Error>> {
    println!("Minimal chess. Coordinate moves like e2e4; no castling or en passant.");
    let mut game = GameState::new();

    loop {
        println!();
        println!("{}", game);
        print!("Enter move (e2e4, q=quit): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            // EOF, same as quitting.
            println!();
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit") {
            break;
        }
        if let Err(e) = game.attempt_move(input) {
            println!("{}", e);
        }
    }

    println!("Game session finished.");
    Ok(())
}
