//! Replays a PGN game and prints where it ended.
//!
//! Usage: `variant_chess [FILE]`; reads standard input without a file.
//! Set `RUST_LOG=debug` to follow the engine move by move.

use std::io::{self, Read};
use std::process::ExitCode;
use std::{env, fs};

use log::error;

use variant_chess::utils::render_game_state::render_game_state;
use variant_chess::Game;

fn read_input() -> io::Result<String> {
    match env::args().nth(1) {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let text = match read_input() {
        Ok(text) => text,
        Err(err) => {
            error!("cannot read PGN input: {err}");
            return ExitCode::FAILURE;
        }
    };

    let game = match Game::from_pgn(&text) {
        Ok(game) => game,
        Err(err) => {
            error!("PGN replay failed: {err}");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let state = game.state();
    println!("{}", render_game_state(state));
    println!();
    println!("Variants: {}", state.variants);
    println!("FEN:      {}", game.fen());
    println!("Moves:    {}", state.move_history.len());
    println!("Status:   {:?}", state.status);
    match state.result {
        Some(result) => println!("Result:   {result} ({})", result.pgn_token()),
        None => println!("Result:   *"),
    }
    ExitCode::SUCCESS
}
