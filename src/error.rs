//! This module defines general error types used throughout the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for converting integers to (C like) enums using TryFrom
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TryFromIntToEnumError {
    /// attempted to convert integer into enum value, but integer was out of bounds
    #[error("attempted to convert integer into enum value, but integer was out of bounds")]
    OutOfBounds,
}

/// Error for a move token that is not part of the move alphabet.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseMoveError {
    /// The offending token.
    #[error("invalid move in sequence: {0:?}")]
    InvalidMove(String),
}

/// Errors raised while persisting or reloading a pattern table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file does not exist, so it has to be generated.
    #[error("table file {} does not exist", .0.display())]
    NotFound(PathBuf),
    /// Tables are never overwritten; stale files have to be removed by hand.
    #[error("refusing to overwrite existing table file {}", .0.display())]
    AlreadyExists(PathBuf),
    /// An empty table cannot be a complete enumeration of the puzzle, so it is neither written
    /// nor accepted when read.
    #[error("empty pattern table for {}", .0.display())]
    Empty(PathBuf),
    /// A line of the table file is not a `fingerprint depth` pair.
    #[error("corrupt table file {}: line {line} is {content:?}", path.display())]
    Corrupt {
        /// The table file.
        path: PathBuf,
        /// One based line number.
        line: usize,
        /// The unparseable line.
        content: String,
    },
    /// Any other failure reading or writing the table file.
    #[error("i/o error on table file {}", path.display())]
    Io {
        /// The table file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the solvers.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum SolveError {
    /// The solution was requested before a successful search.
    #[error("solution requested before the cube was solved")]
    Unsolved,
    /// Every reachable state was searched without finding a solved one. This cannot happen for a
    /// cube scrambled with legal moves.
    #[error("search space exhausted without reaching a solved state")]
    Exhausted,
}
