use std::collections::BTreeSet;

use crate::board::Board;
use crate::coordinate::Coordinate;
use crate::piece::{Piece, PieceKind};

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Square of the selected piece
    Origin,
    /// Empty square the selected piece may move to
    Destination,
    /// Moving here captures an opponent piece (directly or en passant)
    Capture,
}

/// Contains the set of squares and their associated feedback types for a selection.
///
/// `BoardFeedback` is computed by [`compute_feedback()`] and consumed by the
/// presentation layer to highlight the selected piece and its destinations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Coordinate, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    /// Get all square feedback entries
    #[inline]
    pub fn squares(&self) -> &[(Coordinate, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, coord: Coordinate) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(c, _)| *c == coord)
            .map(|(_, feedback)| *feedback)
    }

    /// Set feedback for a square, replacing any previous entry
    pub fn set(&mut self, coord: Coordinate, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(c, _)| *c == coord) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((coord, feedback)),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl From<Vec<(Coordinate, SquareFeedback)>> for BoardFeedback {
    fn from(squares: Vec<(Coordinate, SquareFeedback)>) -> Self {
        Self { squares }
    }
}

/// Classify the destinations of a selected piece for highlighting.
///
/// `moves` is what [`Game::select`](crate::game_logic::Game::select) returned
/// for `piece`.
pub fn compute_feedback(
    board: &Board,
    piece: &Piece,
    moves: &BTreeSet<Coordinate>,
) -> BoardFeedback {
    std::iter::once((piece.coordinate(), SquareFeedback::Origin))
        .chain(moves.iter().map(|&to| classify_move(board, piece, to)))
        .collect::<Vec<_>>()
        .into()
}

/// Classify a move as either a capture or regular destination
fn classify_move(board: &Board, piece: &Piece, to: Coordinate) -> (Coordinate, SquareFeedback) {
    let direct_capture = board.piece_at(to).is_some_and(|p| p.is_enemy_of(piece));
    // A pawn only changes column when capturing.
    let en_passant =
        piece.kind() == PieceKind::Pawn && to.column() != piece.coordinate().column();

    if direct_capture || en_passant {
        (to, SquareFeedback::Capture)
    } else {
        (to, SquareFeedback::Destination)
    }
}
