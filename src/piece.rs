use std::collections::BTreeSet;
use std::fmt;

use crate::coordinate::Coordinate;

/// Side of a piece. Exactly one side moves per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn advance: White moves up the grid, Black down.
    #[inline]
    pub const fn pawn_direction(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row from which a pawn of this color may advance two squares.
    #[inline]
    pub const fn pawn_start_row(self) -> i32 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Bishop, Rook and Queen move along rays until blocked.
    #[inline]
    pub const fn is_ray(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        f.write_str(name)
    }
}

/// Stable identity of a piece, distinct even for pieces with equal attributes.
///
/// Ids are handed out by the [`Board`](crate::board::Board) in increasing
/// order, so sorting by id yields creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The most recent move of a pawn, kept for en-passant detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PawnStep {
    pub previous: Coordinate,
    pub last_move_to: Coordinate,
}

impl PawnStep {
    /// Whether this step was a two-row advance.
    #[inline]
    pub fn is_double_advance(&self) -> bool {
        (self.last_move_to.row() - self.previous.row()).abs() == 2
            && self.last_move_to.column() == self.previous.column()
    }
}

/// A live piece on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    color: Color,
    kind: PieceKind,
    coordinate: Coordinate,
    /// Cached destinations; `None` once any board change made them stale.
    pub(crate) valid_moves: Option<BTreeSet<Coordinate>>,
    /// Set only for pawns that have moved at least once.
    pub(crate) last_step: Option<PawnStep>,
}

impl Piece {
    pub(crate) fn new(id: PieceId, color: Color, kind: PieceKind, coordinate: Coordinate) -> Self {
        Self {
            id,
            color,
            kind,
            coordinate,
            valid_moves: None,
            last_step: None,
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub(crate) fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = coordinate;
    }

    /// Destinations from the last selection, unless a board change invalidated them.
    #[inline]
    pub fn valid_moves(&self) -> Option<&BTreeSet<Coordinate>> {
        self.valid_moves.as_ref()
    }

    /// The pawn's most recent move, if this is a pawn that has moved.
    #[inline]
    pub fn last_step(&self) -> Option<PawnStep> {
        self.last_step
    }

    #[inline]
    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.color != other.color
    }

    /// Single-letter symbol: uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.color, self.kind, self.coordinate)
    }
}
