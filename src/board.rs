use std::collections::BTreeMap;

use log::trace;
use thiserror::Error;

use crate::BoardObserver;
use crate::coordinate::Coordinate;
use crate::piece::{Color, Piece, PieceId, PieceKind};

/// The grid and the live-piece collection disagree, or a move would
/// break exclusive occupancy. Indicates a bug, never a user error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("board invariant violated: {0}")]
pub struct InvariantViolation(pub String);

/// Notification emitted after every board mutation.
///
/// `old: None` is a placement, `new: None` a removal, both set a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardChange {
    pub subject: PieceId,
    pub old: Option<Coordinate>,
    pub new: Option<Coordinate>,
}

/// 8×8 occupancy grid plus the ordered collection of live pieces.
///
/// A piece is in the grid at exactly one cell iff it is in the collection.
/// Every mutation discards all cached move sets and then notifies the
/// registered observers before returning.
#[derive(Default)]
pub struct Board {
    grid: [[Option<PieceId>; 8]; 8],
    /// Keyed by id; ids are monotonic so iteration is creation order.
    pieces: BTreeMap<PieceId, Piece>,
    next_id: u32,
    observers: Vec<Box<dyn BoardObserver>>,
}

impl Board {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for [`BoardChange`] notifications.
    pub fn subscribe(&mut self, observer: impl BoardObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Get the piece at a given coordinate, if any
    #[inline]
    pub fn piece_at(&self, coord: Coordinate) -> Option<&Piece> {
        self.id_at(coord).and_then(|id| self.pieces.get(&id))
    }

    #[inline]
    fn id_at(&self, coord: Coordinate) -> Option<PieceId> {
        self.grid[coord.row() as usize][coord.column() as usize]
    }

    #[inline]
    fn cell_mut(&mut self, coord: Coordinate) -> &mut Option<PieceId> {
        &mut self.grid[coord.row() as usize][coord.column() as usize]
    }

    #[inline]
    pub fn is_empty_at(&self, coord: Coordinate) -> bool {
        self.id_at(coord).is_none()
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    /// Live pieces in creation order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Snapshot of the live pieces in creation order.
    ///
    /// The snapshot is detached from the board, so callers may capture
    /// pieces while walking it.
    pub fn all_pieces(&self) -> Vec<Piece> {
        self.pieces.values().cloned().collect()
    }

    /// Snapshot of the live piece ids in creation order.
    pub fn piece_ids(&self) -> Vec<PieceId> {
        self.pieces.keys().copied().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Create a piece at `coord` and append it to the live collection.
    pub fn place(
        &mut self,
        color: Color,
        kind: PieceKind,
        coord: Coordinate,
    ) -> Result<PieceId, InvariantViolation> {
        if let Some(occupant) = self.id_at(coord) {
            return Err(InvariantViolation(format!(
                "cannot place {color} {kind} on {coord}: occupied by {occupant}"
            )));
        }

        let id = PieceId(self.next_id);
        self.next_id += 1;
        *self.cell_mut(coord) = Some(id);
        self.pieces.insert(id, Piece::new(id, color, kind, coord));

        self.notify(BoardChange {
            subject: id,
            old: None,
            new: Some(coord),
        });
        Ok(id)
    }

    /// Remove the piece at `coord`, returning it. Removing from an empty
    /// cell is a no-op and emits nothing.
    pub fn remove(&mut self, coord: Coordinate) -> Option<Piece> {
        let id = self.cell_mut(coord).take()?;
        let piece = self.pieces.remove(&id)?;

        self.notify(BoardChange {
            subject: id,
            old: Some(coord),
            new: None,
        });
        Some(piece)
    }

    /// Move the piece on `from` to the empty cell `to` as one change.
    pub fn relocate(
        &mut self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<BoardChange, InvariantViolation> {
        let id = self
            .id_at(from)
            .ok_or_else(|| InvariantViolation(format!("no piece on {from} to move")))?;
        if let Some(occupant) = self.id_at(to) {
            return Err(InvariantViolation(format!(
                "cannot move {id} to {to}: occupied by {occupant}"
            )));
        }
        let piece = self
            .pieces
            .get_mut(&id)
            .ok_or_else(|| InvariantViolation(format!("{id} on {from} is not a live piece")))?;
        if piece.coordinate() != from {
            return Err(InvariantViolation(format!(
                "{id} is recorded on {} but found on {from}",
                piece.coordinate()
            )));
        }

        piece.set_coordinate(to);
        *self.cell_mut(from) = None;
        *self.cell_mut(to) = Some(id);

        let change = BoardChange {
            subject: id,
            old: Some(from),
            new: Some(to),
        };
        self.notify(change);
        Ok(change)
    }

    /// Remove every piece. Observers see one removal per piece.
    pub fn clear(&mut self) {
        for id in self.piece_ids() {
            if let Some(piece) = self.pieces.remove(&id) {
                let coord = piece.coordinate();
                *self.cell_mut(coord) = None;
                self.notify(BoardChange {
                    subject: id,
                    old: Some(coord),
                    new: None,
                });
            }
        }
        self.grid = Default::default();
    }

    fn notify(&mut self, change: BoardChange) {
        for piece in self.pieces.values_mut() {
            piece.valid_moves = None;
        }
        trace!(
            "board changed: {} {:?} -> {:?}",
            change.subject, change.old, change.new
        );
        for observer in &mut self.observers {
            observer.board_changed(&change);
        }
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<String> = (0..8)
            .map(|row| {
                self.grid[row]
                    .iter()
                    .map(|cell| {
                        cell.and_then(|id| self.pieces.get(&id))
                            .map_or('.', Piece::symbol)
                    })
                    .collect()
            })
            .collect();
        f.debug_struct("Board")
            .field("grid", &rows)
            .field("pieces", &self.pieces.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    fn coord(row: i32, column: i32) -> Coordinate {
        Coordinate::new(row, column).unwrap()
    }

    fn recording_board() -> (Board, Rc<RefCell<Vec<BoardChange>>>) {
        let mut board = Board::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        board.subscribe(move |change: &BoardChange| sink.borrow_mut().push(*change));
        (board, log)
    }

    #[test]
    fn test_place_then_lookup() {
        let (mut board, log) = recording_board();
        let c = coord(4, 4);

        let id = board.place(Color::White, PieceKind::Rook, c).unwrap();

        let piece = board.piece_at(c).expect("piece placed");
        assert_eq!(piece.id(), id);
        assert_eq!(piece.coordinate(), c);
        assert!(board.all_pieces().iter().any(|p| p.id() == id));
        assert_eq!(
            log.borrow().as_slice(),
            &[BoardChange {
                subject: id,
                old: None,
                new: Some(c)
            }]
        );
    }

    #[test]
    fn test_place_on_occupied_cell_fails() {
        let mut board = Board::new();
        board.place(Color::White, PieceKind::Rook, coord(0, 0)).unwrap();

        let result = board.place(Color::Black, PieceKind::Knight, coord(0, 0));

        assert!(result.is_err());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_remove_clears_grid_and_collection() {
        let (mut board, log) = recording_board();
        let c = coord(2, 5);
        let id = board.place(Color::Black, PieceKind::Bishop, c).unwrap();

        let removed = board.remove(c).expect("piece removed");

        assert_eq!(removed.id(), id);
        assert!(board.piece_at(c).is_none());
        assert!(board.piece(id).is_none());
        assert!(board.all_pieces().is_empty());
        assert_eq!(
            log.borrow().last(),
            Some(&BoardChange {
                subject: id,
                old: Some(c),
                new: None
            })
        );
    }

    #[test]
    fn test_remove_empty_is_noop() {
        let (mut board, log) = recording_board();

        assert!(board.remove(coord(3, 3)).is_none());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_relocate_emits_single_change() {
        let (mut board, log) = recording_board();
        let from = coord(7, 1);
        let to = coord(5, 2);
        let id = board.place(Color::White, PieceKind::Knight, from).unwrap();
        log.borrow_mut().clear();

        let change = board.relocate(from, to).unwrap();

        assert_eq!(change.subject, id);
        assert_eq!(log.borrow().as_slice(), &[change]);
        assert!(board.is_empty_at(from));
        assert_eq!(board.piece_at(to).map(Piece::coordinate), Some(to));
    }

    #[test]
    fn test_relocate_onto_occupied_fails_without_mutation() {
        let mut board = Board::new();
        board.place(Color::White, PieceKind::Rook, coord(0, 0)).unwrap();
        board.place(Color::Black, PieceKind::Rook, coord(0, 7)).unwrap();

        assert!(board.relocate(coord(0, 0), coord(0, 7)).is_err());
        assert_eq!(board.piece_at(coord(0, 0)).map(Piece::color), Some(Color::White));
        assert_eq!(board.piece_at(coord(0, 7)).map(Piece::color), Some(Color::Black));
    }

    #[test]
    fn test_relocate_from_empty_fails() {
        let mut board = Board::new();
        assert!(board.relocate(coord(0, 0), coord(1, 1)).is_err());
    }

    #[test]
    fn test_pieces_in_creation_order() {
        let mut board = Board::new();
        let a = board.place(Color::White, PieceKind::King, coord(7, 4)).unwrap();
        let b = board.place(Color::Black, PieceKind::King, coord(0, 4)).unwrap();
        let c = board.place(Color::White, PieceKind::Pawn, coord(6, 0)).unwrap();

        assert_eq!(board.piece_ids(), vec![a, b, c]);
    }

    #[test]
    fn test_snapshot_tolerates_removal_during_traversal() {
        let mut board = Board::new();
        for column in 0..8 {
            board.place(Color::Black, PieceKind::Pawn, coord(1, column)).unwrap();
        }

        for piece in board.all_pieces() {
            board.remove(piece.coordinate());
        }

        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_empties_board() {
        let (mut board, log) = recording_board();
        board.place(Color::White, PieceKind::Queen, coord(7, 3)).unwrap();
        board.place(Color::Black, PieceKind::Queen, coord(0, 3)).unwrap();
        log.borrow_mut().clear();

        board.clear();

        assert!(board.is_empty());
        assert!(Coordinate::all().all(|c| board.is_empty_at(c)));
        assert_eq!(log.borrow().len(), 2);
        assert!(log.borrow().iter().all(|change| change.new.is_none()));
    }

    #[test]
    fn test_change_invalidates_cached_moves() {
        let mut board = Board::new();
        let id = board.place(Color::White, PieceKind::Rook, coord(7, 0)).unwrap();
        board.piece_mut(id).unwrap().valid_moves = Some(BTreeSet::new());

        board.place(Color::Black, PieceKind::Rook, coord(0, 0)).unwrap();

        assert_eq!(board.piece(id).unwrap().valid_moves(), None);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut board = Board::new();
        let first = board.place(Color::White, PieceKind::Pawn, coord(6, 0)).unwrap();
        board.clear();

        let second = board.place(Color::White, PieceKind::Pawn, coord(6, 0)).unwrap();

        assert_ne!(first, second);
    }
}
