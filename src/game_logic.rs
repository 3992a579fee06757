use std::collections::BTreeSet;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::BoardObserver;
use crate::board::{Board, InvariantViolation};
use crate::coordinate::Coordinate;
use crate::movegen;
use crate::piece::{Color, PawnStep, Piece, PieceId, PieceKind};
use crate::turn::TurnGate;

/// Back-rank arrangement from column 0 to column 7.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Errors returned by the move engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    /// Destination is not among the piece's valid moves, or it is not
    /// that piece's turn. The board is left unchanged.
    #[error("illegal move of {piece} to {destination}")]
    IllegalMove {
        piece: PieceId,
        destination: Coordinate,
    },

    /// The id no longer refers to a live piece (captured, or the game was reset).
    #[error("piece {0} is not on the board")]
    UnknownPiece(PieceId),

    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),
}

/// Whose move it is and which piece moved last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameState {
    turn: TurnGate,
    last_moved: Option<PieceId>,
}

impl GameState {
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.turn.side_to_move()
    }

    #[inline]
    pub fn turn(&self) -> TurnGate {
        self.turn
    }

    /// The piece moved by the last successful `execute`, if any.
    #[inline]
    pub fn last_moved_piece(&self) -> Option<PieceId> {
        self.last_moved
    }
}

/// Summary of an executed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub piece: PieceId,
    pub from: Coordinate,
    pub to: Coordinate,
    pub captured: Option<Piece>,
    pub en_passant: bool,
}

/// Core move engine: owns the board and game state and is the only
/// component that mutates them.
#[derive(Debug)]
pub struct Game {
    board: Board,
    state: GameState,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game in the standard starting position, White to move.
    pub fn new() -> Self {
        let mut game = Self::empty();
        // 32 distinct on-board cells of an empty board: placement cannot fail.
        let setup = game.setup_standard();
        debug_assert!(setup.is_ok(), "standard setup failed: {setup:?}");
        game
    }

    /// A game with an empty board, White to move.
    #[inline]
    pub fn empty() -> Self {
        Self {
            board: Board::new(),
            state: GameState::default(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move()
    }

    /// Get the piece at a given coordinate, if any
    #[inline]
    pub fn piece_at(&self, coord: Coordinate) -> Option<&Piece> {
        self.board.piece_at(coord)
    }

    /// Register an observer for board change notifications.
    pub fn subscribe(&mut self, observer: impl BoardObserver + 'static) {
        self.board.subscribe(observer);
    }

    /// Put a new piece on the board (setup only, not a move).
    pub fn place(
        &mut self,
        color: Color,
        kind: PieceKind,
        coord: Coordinate,
    ) -> Result<PieceId, MoveError> {
        Ok(self.board.place(color, kind, coord)?)
    }

    /// Override whose turn it is (setup only).
    pub fn set_side_to_move(&mut self, color: Color) {
        self.state.turn = TurnGate::from(color);
    }

    /// Clear the board and restore the standard starting position.
    pub fn reset(&mut self) -> Result<(), MoveError> {
        info!("Resetting game");
        self.board.clear();
        self.state = GameState::default();
        self.setup_standard().inspect_err(|e| error!("Standard setup failed: {e}"))?;
        Ok(())
    }

    fn setup_standard(&mut self) -> Result<(), InvariantViolation> {
        for (color, back_row, pawn_row) in [(Color::Black, 0, 1), (Color::White, 7, 6)] {
            for (column, kind) in (0..).zip(BACK_RANK) {
                self.place_at(color, kind, back_row, column)?;
            }
            for column in 0..8 {
                self.place_at(color, PieceKind::Pawn, pawn_row, column)?;
            }
        }
        Ok(())
    }

    fn place_at(
        &mut self,
        color: Color,
        kind: PieceKind,
        row: i32,
        column: i32,
    ) -> Result<PieceId, InvariantViolation> {
        let coord = Coordinate::new(row, column).map_err(|e| InvariantViolation(e.to_string()))?;
        self.board.place(color, kind, coord)
    }

    /// Whether the presentation layer should accept input for `id`.
    pub fn is_movable(&self, id: PieceId) -> bool {
        self.board
            .piece(id)
            .is_some_and(|piece| self.state.turn.is_movable(piece))
    }

    /// Ids of the pieces belonging to the side to move.
    pub fn movable_pieces(&self) -> Vec<PieceId> {
        self.state.turn.movable_pieces(&self.board)
    }

    /// Recompute and return the destinations of `id`, including en-passant.
    ///
    /// Does not check whose turn it is; the presentation layer only offers
    /// movable pieces for selection.
    pub fn select(&mut self, id: PieceId) -> Result<BTreeSet<Coordinate>, MoveError> {
        let piece = self.board.piece(id).ok_or(MoveError::UnknownPiece(id))?;
        let moves = self.compute_moves(piece);
        debug!("Selected {piece}: {} destinations", moves.len());

        if let Some(piece) = self.board.piece_mut(id) {
            piece.valid_moves = Some(moves.clone());
        }
        Ok(moves)
    }

    /// Destinations for `piece` given the current board and last move.
    fn compute_moves(&self, piece: &Piece) -> BTreeSet<Coordinate> {
        let mut moves = movegen::valid_moves(&self.board, piece);
        if let Some(target) = self.en_passant_target(piece) {
            moves.insert(target);
        }
        moves
    }

    /// The square behind an enemy pawn that just advanced two rows next to `piece`.
    fn en_passant_target(&self, piece: &Piece) -> Option<Coordinate> {
        if piece.kind() != PieceKind::Pawn {
            return None;
        }
        let enemy = self.board.piece(self.state.last_moved?)?;
        if enemy.kind() != PieceKind::Pawn || !enemy.is_enemy_of(piece) {
            return None;
        }
        let step = enemy.last_step()?;
        let (ours, theirs) = (piece.coordinate(), step.last_move_to);
        if !step.is_double_advance()
            || theirs.row() != ours.row()
            || (theirs.column() - ours.column()).abs() != 1
        {
            return None;
        }
        theirs
            .offset(piece.color().pawn_direction(), 0)
            .filter(|&behind| self.board.is_empty_at(behind))
    }

    /// Move `id` to `destination`, capturing as needed, then pass the turn.
    ///
    /// All checks run before the board is touched, so an error leaves the
    /// game unchanged.
    pub fn execute(
        &mut self,
        id: PieceId,
        destination: Coordinate,
    ) -> Result<MoveOutcome, MoveError> {
        let piece = self.board.piece(id).ok_or(MoveError::UnknownPiece(id))?;
        let illegal = MoveError::IllegalMove {
            piece: id,
            destination,
        };

        if !self.state.turn.is_movable(piece) {
            warn!(
                "Rejected {piece} -> {destination}: {} to move",
                self.side_to_move()
            );
            return Err(illegal);
        }
        if !self.compute_moves(piece).contains(&destination) {
            warn!("Rejected {piece} -> {destination}: not a valid destination");
            return Err(illegal);
        }

        let origin = piece.coordinate();
        let kind = piece.kind();
        if self.board.piece_at(origin).map(Piece::id) != Some(id) {
            let violation =
                InvariantViolation(format!("{id} is recorded on {origin} but the grid disagrees"));
            error!("{violation}");
            return Err(violation.into());
        }

        let victim_square = match self.board.piece_at(destination) {
            Some(occupant) if occupant.is_enemy_of(piece) => Some(destination),
            Some(occupant) => {
                return Err(InvariantViolation(format!(
                    "{destination} holds allied {occupant} but was offered as a move"
                ))
                .into());
            }
            None if kind == PieceKind::Pawn && destination.column() != origin.column() => {
                let behind = Coordinate::new(origin.row(), destination.column())
                    .map_err(|e| InvariantViolation(e.to_string()))?;
                match self.board.piece_at(behind) {
                    Some(pawn) if pawn.kind() == PieceKind::Pawn && pawn.is_enemy_of(piece) => {
                        Some(behind)
                    }
                    _ => {
                        return Err(InvariantViolation(format!(
                            "diagonal pawn move to empty {destination} without a pawn on {behind}"
                        ))
                        .into());
                    }
                }
            }
            None => None,
        };
        let en_passant = victim_square.is_some_and(|square| square != destination);

        let captured = victim_square.and_then(|square| self.board.remove(square));
        self.board.relocate(origin, destination)?;

        if kind == PieceKind::Pawn
            && let Some(pawn) = self.board.piece_mut(id)
        {
            pawn.last_step = Some(PawnStep {
                previous: origin,
                last_move_to: destination,
            });
        }
        self.state.last_moved = Some(id);
        self.state.turn.flip();

        match &captured {
            Some(victim) if en_passant => {
                info!("{kind} {origin} -> {destination} captures {victim} en passant")
            }
            Some(victim) => info!("{kind} {origin} -> {destination} captures {victim}"),
            None => info!("{kind} {origin} -> {destination}"),
        }

        Ok(MoveOutcome {
            piece: id,
            from: origin,
            to: destination,
            captured,
            en_passant,
        })
    }
}
