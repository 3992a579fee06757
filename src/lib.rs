use std::sync::mpsc;

use board::{Board, BoardChange};

pub mod board;
pub mod coordinate;
pub mod feedback;
pub mod game_logic;
pub mod mock;
pub mod movegen;
pub mod piece;
pub mod turn;

pub use coordinate::{Coordinate, OutOfRange};
pub use game_logic::{Game, GameState, MoveError, MoveOutcome};
pub use piece::{Color, Piece, PieceId, PieceKind};

/// Trait for receiving board change notifications.
///
/// Called synchronously after every placement, removal and move, before
/// the mutating call returns. The presentation layer uses it to decide
/// when to re-render.
pub trait BoardObserver {
    fn board_changed(&mut self, change: &BoardChange);
}

impl<F> BoardObserver for F
where
    F: FnMut(&BoardChange),
{
    fn board_changed(&mut self, change: &BoardChange) {
        self(change)
    }
}

/// Forwards changes to a channel. A dropped receiver only loses the change.
impl BoardObserver for mpsc::Sender<BoardChange> {
    fn board_changed(&mut self, change: &BoardChange) {
        if let Err(mpsc::SendError(change)) = self.send(*change) {
            log::debug!("Board change for {} dropped: receiver gone", change.subject);
        }
    }
}

/// Trait for displaying the board and selection feedback to the player.
///
/// Abstracts over the terminal renderer and whatever front-end embeds the
/// engine, keeping rendering out of the move logic.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the board with the given selection highlights.
    fn show(
        &mut self,
        board: &Board,
        feedback: &feedback::BoardFeedback,
    ) -> Result<(), Self::Error>;
}
