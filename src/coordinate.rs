use std::fmt;
use std::str::FromStr;

use shakmaty::{File, Rank, Square};
use thiserror::Error;

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: i32 = 8;

/// Coordinate construction with an axis outside `[0, 7]`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("coordinate ({row}, {column}) is outside the board")]
pub struct OutOfRange {
    pub row: i32,
    pub column: i32,
}

/// Error when parsing algebraic square notation such as `"e2"`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid square notation: '{0}'")]
pub struct ParseCoordinateError(String);

/// A validated `(row, column)` cell of the 8×8 grid.
///
/// Row 0 is Black's back rank and row 7 is White's, so White pawns
/// advance towards decreasing rows. Column 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    row: u8,
    column: u8,
}

impl Coordinate {
    /// Creates a coordinate, failing when either axis is outside `[0, 7]`.
    pub fn new(row: i32, column: i32) -> Result<Self, OutOfRange> {
        if Self::is_valid(row, column) {
            Ok(Self {
                row: row as u8,
                column: column as u8,
            })
        } else {
            Err(OutOfRange { row, column })
        }
    }

    /// Whether `(row, column)` would be accepted by [`Coordinate::new`].
    #[inline]
    pub const fn is_valid(row: i32, column: i32) -> bool {
        row >= 0 && row < BOARD_SIZE && column >= 0 && column < BOARD_SIZE
    }

    #[inline]
    pub const fn row(self) -> i32 {
        self.row as i32
    }

    #[inline]
    pub const fn column(self) -> i32 {
        self.column as i32
    }

    /// The coordinate shifted by `(row_delta, column_delta)`, if still on the board.
    #[inline]
    pub fn offset(self, row_delta: i32, column_delta: i32) -> Option<Self> {
        Self::new(self.row() + row_delta, self.column() + column_delta).ok()
    }

    /// Iterates all 64 coordinates row by row.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|row| {
            (0..BOARD_SIZE).map(move |column| Coordinate {
                row: row as u8,
                column: column as u8,
            })
        })
    }
}

impl From<Coordinate> for Square {
    fn from(coord: Coordinate) -> Self {
        Square::from_coords(
            File::new(u32::from(coord.column)),
            Rank::new(7 - u32::from(coord.row)),
        )
    }
}

impl From<Square> for Coordinate {
    fn from(square: Square) -> Self {
        let file = square.file().char() as u8 - b'a';
        let rank = square.rank().char() as u8 - b'1';
        Coordinate {
            row: 7 - rank,
            column: file,
        }
    }
}

/// Parse algebraic notation like "e2" into a coordinate.
impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .to_ascii_lowercase()
            .parse::<Square>()
            .map(Coordinate::from)
            .map_err(|_| ParseCoordinateError(s.to_string()))
    }
}

/// Display in algebraic notation (e.g., "e2").
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Square::from(*self))
    }
}
