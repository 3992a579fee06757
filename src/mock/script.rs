use std::collections::VecDeque;

use thiserror::Error;

use crate::coordinate::Coordinate;
use crate::game_logic::{Game, MoveError, MoveOutcome};

/// Error when parsing or playing a move script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("invalid square notation: '{0}'")]
    Parse(String),

    #[error("move {0} must name exactly two squares, found {1}")]
    Malformed(usize, usize),

    #[error("no piece on {0}")]
    EmptySquare(Coordinate),

    #[error("move {from}{to} rejected: {source}")]
    Rejected {
        from: Coordinate,
        to: Coordinate,
        #[source]
        source: MoveError,
    },
}

/// A scripted player that drives a [`Game`] the way the presentation
/// layer would: select the piece on the origin, then execute.
///
/// New script can be appended at any time for interactive use.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    pending: VecDeque<(Coordinate, Coordinate)>,
}

impl ScriptedPlayer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and queue additional script for execution.
    ///
    /// Format:
    /// - Squares are 2 characters (e.g., "e2", "a1")
    /// - A move is an origin square followed by a destination square
    /// - Periods (".") end a move
    ///
    /// Examples:
    /// - `"e2e4."` - Move e2 to e4
    /// - `"e2 e4. d7d5."` - Two moves
    pub fn push_script(&mut self, script: &str) -> Result<(), ScriptError> {
        let moves = parse_script(script)?;
        self.pending.extend(moves);
        Ok(())
    }

    /// Number of moves still queued.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Play the next queued move. Returns None if nothing is pending.
    pub fn step(&mut self, game: &mut Game) -> Option<Result<MoveOutcome, ScriptError>> {
        let (from, to) = self.pending.pop_front()?;
        Some(play_move(game, from, to))
    }

    /// Queue `script` and play every pending move, stopping at the first error.
    pub fn run(&mut self, game: &mut Game, script: &str) -> Result<Vec<MoveOutcome>, ScriptError> {
        self.push_script(script)?;
        let mut outcomes = Vec::with_capacity(self.pending.len());
        while let Some(result) = self.step(game) {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    self.pending.clear();
                    return Err(e);
                }
            }
        }
        Ok(outcomes)
    }
}

fn play_move(game: &mut Game, from: Coordinate, to: Coordinate) -> Result<MoveOutcome, ScriptError> {
    let id = game
        .piece_at(from)
        .map(|piece| piece.id())
        .ok_or(ScriptError::EmptySquare(from))?;
    let rejected = |source| ScriptError::Rejected { from, to, source };
    game.select(id).map_err(rejected)?;
    game.execute(id, to).map_err(rejected)
}

/// Parse a move script into (origin, destination) pairs.
fn parse_script(script: &str) -> Result<Vec<(Coordinate, Coordinate)>, ScriptError> {
    let mut batches: Vec<Vec<Coordinate>> = vec![Vec::new()];
    let mut current_token = String::new();

    for ch in script.chars() {
        match ch {
            '.' => {
                flush_token(&mut current_token, &mut batches)?;
                batches.push(Vec::new());
            }
            c if c.is_whitespace() => {
                flush_token(&mut current_token, &mut batches)?;
            }
            _ => {
                current_token.push(ch);

                // Squares are exactly 2 characters (e.g., "e2", "a1")
                if current_token.len() == 2 {
                    flush_token(&mut current_token, &mut batches)?;
                }
            }
        }
    }

    flush_token(&mut current_token, &mut batches)?;

    batches
        .into_iter()
        .filter(|b| !b.is_empty())
        .enumerate()
        .map(|(i, batch)| match batch.as_slice() {
            &[from, to] => Ok((from, to)),
            other => Err(ScriptError::Malformed(i + 1, other.len())),
        })
        .collect()
}

/// Add current token to the last batch and clear it.
fn flush_token(token: &mut String, batches: &mut [Vec<Coordinate>]) -> Result<(), ScriptError> {
    if !token.is_empty() {
        let coord: Coordinate = token
            .trim()
            .parse()
            .map_err(|_| ScriptError::Parse(token.clone()))?;
        if let Some(batch) = batches.last_mut() {
            batch.push(coord);
        }
        token.clear();
    }
    Ok(())
}
