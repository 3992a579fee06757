use crate::board::Board;
use crate::piece::{Color, Piece, PieceId};

/// Strict alternation of the side allowed to move. There is no terminal
/// state: the gate flips on every executed move, forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnGate {
    #[default]
    WhiteToMove,
    BlackToMove,
}

impl TurnGate {
    #[inline]
    pub const fn side_to_move(self) -> Color {
        match self {
            TurnGate::WhiteToMove => Color::White,
            TurnGate::BlackToMove => Color::Black,
        }
    }

    /// Advance to the other side's turn.
    #[inline]
    pub fn flip(&mut self) {
        *self = match self {
            TurnGate::WhiteToMove => TurnGate::BlackToMove,
            TurnGate::BlackToMove => TurnGate::WhiteToMove,
        };
    }

    /// Whether the presentation layer should accept input for `piece`.
    #[inline]
    pub fn is_movable(self, piece: &Piece) -> bool {
        piece.color() == self.side_to_move()
    }

    /// Ids of the side to move, in live-collection order.
    pub fn movable_pieces(self, board: &Board) -> Vec<PieceId> {
        board
            .pieces()
            .filter(|piece| self.is_movable(piece))
            .map(Piece::id)
            .collect()
    }
}

impl From<Color> for TurnGate {
    fn from(color: Color) -> Self {
        match color {
            Color::White => TurnGate::WhiteToMove,
            Color::Black => TurnGate::BlackToMove,
        }
    }
}
