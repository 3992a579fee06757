use std::io::{self, Write};

use shakmaty::{File, Rank, Square};

use crate::BoardDisplay;
use crate::board::Board;
use crate::coordinate::Coordinate;
use crate::feedback::{BoardFeedback, SquareFeedback};

/// Terminal-based board display for development and testing.
///
/// Renders the board as an 8×8 grid of piece letters, with ANSI
/// background colors matching the selection feedback.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    /// Create a new terminal display.
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardDisplay for TerminalDisplay {
    type Error = DisplayError;

    fn show(&mut self, board: &Board, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        render_board(&mut io::stdout(), board, feedback)
    }
}

/// Render the board to any writer. Extracted for testability.
pub(crate) fn render_board(
    w: &mut impl Write,
    board: &Board,
    feedback: &BoardFeedback,
) -> Result<(), DisplayError> {
    for rank in Rank::ALL.iter().rev() {
        write!(w, " {} ", rank.char())?;
        for file in File::ALL {
            let coord = Coordinate::from(Square::from_coords(file, *rank));
            let symbol = board.piece_at(coord).map_or('·', |piece| piece.symbol());
            write!(w, "{}", format_square(symbol, feedback.get(coord)))?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    w.flush()?;
    Ok(())
}

/// Wrap a cell symbol in the ANSI background for its feedback.
fn format_square(symbol: char, feedback: Option<SquareFeedback>) -> String {
    match feedback {
        Some(SquareFeedback::Destination) => format!("\x1b[44m {symbol} \x1b[0m"),
        Some(SquareFeedback::Capture) => format!("\x1b[41m {symbol} \x1b[0m"),
        Some(SquareFeedback::Origin) => format!("\x1b[42m {symbol} \x1b[0m"),
        None => format!(" {symbol} "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::Game;

    fn render_to_string(board: &Board, feedback: &BoardFeedback) -> String {
        let mut buf = Vec::new();
        render_board(&mut buf, board, feedback).expect("rendering to buffer should succeed");
        String::from_utf8(buf).expect("output should be valid UTF-8")
    }

    fn sq(notation: &str) -> Coordinate {
        notation.parse().unwrap()
    }

    #[test]
    fn show_start_position_rows() {
        let game = Game::new();

        let output = render_to_string(game.board(), &BoardFeedback::new());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], " 8  r  n  b  q  k  b  n  r ");
        assert_eq!(lines[1], " 7  p  p  p  p  p  p  p  p ");
        assert_eq!(lines[3], " 5  ·  ·  ·  ·  ·  ·  ·  · ");
        assert_eq!(lines[7], " 1  R  N  B  Q  K  B  N  R ");
        assert!(lines[8].contains("a  b  c  d  e  f  g  h"));
    }

    #[test]
    fn show_destination_uses_blue_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("e4"), SquareFeedback::Destination);

        let output = render_to_string(&Board::new(), &feedback);

        assert!(
            output.contains("\x1b[44m · \x1b[0m"),
            "destination should use blue ANSI background"
        );
    }

    #[test]
    fn show_capture_uses_red_background() {
        let game = Game::new();
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("d7"), SquareFeedback::Capture);

        let output = render_to_string(game.board(), &feedback);

        assert!(
            output.contains("\x1b[41m p \x1b[0m"),
            "capture should use red ANSI background"
        );
    }

    #[test]
    fn show_origin_uses_green_background() {
        let game = Game::new();
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("e2"), SquareFeedback::Origin);

        let output = render_to_string(game.board(), &feedback);

        assert!(
            output.contains("\x1b[42m P \x1b[0m"),
            "origin should use green ANSI background"
        );
    }

    #[test]
    fn empty_feedback_has_no_ansi_codes() {
        let output = render_to_string(&Board::new(), &BoardFeedback::new());

        assert!(
            !output.contains("\x1b[4"),
            "empty feedback should have no ANSI background codes"
        );
    }
}
