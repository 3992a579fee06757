use std::io::{self, Write};
use std::sync::mpsc;

use super::TerminalDisplay;
use crate::BoardDisplay;
use crate::board::BoardChange;
use crate::coordinate::Coordinate;
use crate::feedback::{BoardFeedback, compute_feedback};
use crate::game_logic::Game;
use crate::piece::PieceId;

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

/// Runs an interactive terminal front-end for the move engine.
///
/// Plays the role of the presentation layer: selects pieces, shows their
/// destinations, requests moves and re-renders on board changes.
pub fn run_interactive_terminal() {
    let mut game = Game::new();
    let (tx, rx) = mpsc::channel::<BoardChange>();
    game.subscribe(tx);

    let mut display = TerminalDisplay::new();
    let mut selected: Option<PieceId> = None;
    let mut feedback = BoardFeedback::new();

    clear_screen();
    draw_interface(&mut display, &game, &feedback);

    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("Failed to flush stdout: {}", e);
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        let mut message = None;
        match parts[0] {
            "s" => match parts.get(1).map(|s| s.parse::<Coordinate>()) {
                None => message = Some("Usage: s <square>".to_string()),
                Some(Err(e)) => message = Some(format!("Invalid square: {e}")),
                Some(Ok(square)) => match game.piece_at(square).map(|p| p.id()) {
                    None => message = Some(format!("No piece on {square}")),
                    Some(id) if !game.is_movable(id) => {
                        message = Some(format!("{} to move", game.side_to_move()))
                    }
                    Some(id) => match game.select(id) {
                        Ok(moves) => {
                            if let Some(piece) = game.board().piece(id) {
                                feedback = compute_feedback(game.board(), piece, &moves);
                            }
                            selected = Some(id);
                        }
                        Err(e) => message = Some(e.to_string()),
                    },
                },
            },
            "m" => {
                let squares: Option<Vec<Coordinate>> = parts
                    .get(1..3)
                    .map(|args| args.iter().filter_map(|s| s.parse().ok()).collect());
                match squares.as_deref() {
                    Some(&[from, to]) => match game.piece_at(from).map(|p| p.id()) {
                        Some(id) => match game.execute(id, to) {
                            Ok(_) => {
                                selected = None;
                                feedback = BoardFeedback::new();
                            }
                            Err(e) => message = Some(format!("❌ {e}")),
                        },
                        None => message = Some(format!("No piece on {from}")),
                    },
                    _ => message = Some("Usage: m <from> <to>".to_string()),
                }
            }
            "r" => {
                selected = None;
                feedback = BoardFeedback::new();
                message = Some(match game.reset() {
                    Ok(()) => "🔄 Reset to initial position".to_string(),
                    Err(e) => format!("❌ Reset failed: {e}"),
                });
            }
            "p" => {}
            "q" => break,
            _ => message = Some("Unknown command".to_string()),
        }

        let changes: Vec<BoardChange> = rx.try_iter().collect();
        if let Some(id) = selected
            && !changes.is_empty()
            && game.board().piece(id).is_none()
        {
            selected = None;
            feedback = BoardFeedback::new();
        }

        clear_screen();
        draw_interface(&mut display, &game, &feedback);
        if !changes.is_empty() {
            println!("Board changes: {}", changes.len());
        }
        if let Some(message) = message {
            println!("\n{message}");
        }
    }
}

/// Draws the complete interface: help text, side to move, and board.
fn draw_interface(display: &mut TerminalDisplay, game: &Game, feedback: &BoardFeedback) {
    println!("♟️  Chess Move Engine");
    println!();
    println!("Commands: s <square> | m <from> <to> | r (reset) | p (refresh) | q (quit)");
    println!();
    println!("{} to move", game.side_to_move());
    if let Err(e) = display.show(game.board(), feedback) {
        eprintln!("Failed to draw board: {e}");
    }
}
