//! Per-kind destination generation.
//!
//! Generators only see the board. En-passant depends on the previous move
//! and is added by the game logic on top of [`valid_moves`].

use std::collections::BTreeSet;

use crate::board::Board;
use crate::coordinate::Coordinate;
use crate::piece::{Piece, PieceKind};

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const ORTHOGONALS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Destinations for `piece` on `board`, ignoring en-passant.
pub fn valid_moves(board: &Board, piece: &Piece) -> BTreeSet<Coordinate> {
    let mut moves = BTreeSet::new();
    match piece.kind() {
        PieceKind::Pawn => pawn_moves(board, piece, &mut moves),
        PieceKind::Knight => step_moves(board, piece, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => ray_moves(board, piece, &DIAGONALS, &mut moves),
        PieceKind::Rook => ray_moves(board, piece, &ORTHOGONALS, &mut moves),
        PieceKind::Queen => {
            ray_moves(board, piece, &DIAGONALS, &mut moves);
            ray_moves(board, piece, &ORTHOGONALS, &mut moves);
        }
        PieceKind::King => step_moves(board, piece, &KING_OFFSETS, &mut moves),
    }
    moves
}

/// Whether `target` is empty or holds an enemy of `piece`.
fn is_open_to(board: &Board, piece: &Piece, target: Coordinate) -> bool {
    board
        .piece_at(target)
        .is_none_or(|occupant| occupant.is_enemy_of(piece))
}

fn pawn_moves(board: &Board, piece: &Piece, moves: &mut BTreeSet<Coordinate>) {
    let from = piece.coordinate();
    let dir = piece.color().pawn_direction();

    // The double step is only tried when the single step was free.
    if let Some(single) = from.offset(dir, 0).filter(|&c| board.is_empty_at(c)) {
        moves.insert(single);
        if from.row() == piece.color().pawn_start_row()
            && let Some(double) = from.offset(2 * dir, 0).filter(|&c| board.is_empty_at(c))
        {
            moves.insert(double);
        }
    }

    for column_delta in [-1, 1] {
        if let Some(target) = from.offset(dir, column_delta)
            && board
                .piece_at(target)
                .is_some_and(|occupant| occupant.is_enemy_of(piece))
        {
            moves.insert(target);
        }
    }
}

fn step_moves(
    board: &Board,
    piece: &Piece,
    offsets: &[(i32, i32)],
    moves: &mut BTreeSet<Coordinate>,
) {
    let from = piece.coordinate();
    moves.extend(
        offsets
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&target| is_open_to(board, piece, target)),
    );
}

/// Walk each ray until the edge or the first occupied square, which is
/// included only when it holds an enemy.
fn ray_moves(
    board: &Board,
    piece: &Piece,
    directions: &[(i32, i32)],
    moves: &mut BTreeSet<Coordinate>,
) {
    for &(dr, dc) in directions {
        let mut current = piece.coordinate();
        while let Some(next) = current.offset(dr, dc) {
            match board.piece_at(next) {
                None => {
                    moves.insert(next);
                    current = next;
                }
                Some(occupant) => {
                    if occupant.is_enemy_of(piece) {
                        moves.insert(next);
                    }
                    break;
                }
            }
        }
    }
}
