// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkers Core - Game Rules and Board Logic
//!
//! This crate provides the core game functionality including:
//! - 8x8 board representation with an arena of pieces
//! - Move legality, forced captures and multi-jump chaining
//! - The click-driven selection state machine
//! - Wire-friendly move records for network play

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod piece;
pub mod rules;

use serde::{Deserialize, Serialize};

/// Number of rows and columns of the board.
pub const BOARD_SIZE: i32 = 8;

/// Player color in a checkers game (White or Black)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// White player (starts on rows 5-7, moves toward row 0, plays first)
    White,
    /// Black player (starts on rows 0-2, moves toward row 7)
    Black,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta a man of this color advances by.
    pub fn forward_dir(&self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The farthest row from this color's starting rows; a man ending a
    /// move there becomes a king.
    pub fn crown_row(&self) -> i32 {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }
}

/// Check if a square lies on the board.
pub fn on_board(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE).contains(&row) && (0..BOARD_SIZE).contains(&col)
}

/// Check if a square is a dark (playable) square.
pub fn is_dark_square(row: i32, col: i32) -> bool {
    (row + col) % 2 == 1
}

/// A single move as transmitted between peers.
///
/// Four board coordinates in fixed order; the all `-1` sentinel means
/// "nothing available".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from_row: i32,
    pub from_col: i32,
    pub to_row: i32,
    pub to_col: i32,
}

impl MoveRecord {
    /// Sentinel returned when no move is available.
    pub const INVALID: MoveRecord = MoveRecord {
        from_row: -1,
        from_col: -1,
        to_row: -1,
        to_col: -1,
    };

    /// Create a new move record
    pub fn new(from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> Self {
        Self {
            from_row,
            from_col,
            to_row,
            to_col,
        }
    }

    /// Whether every coordinate lies on the board.
    pub fn is_valid(&self) -> bool {
        on_board(self.from_row, self.from_col) && on_board(self.to_row, self.to_col)
    }
}

/// Outcome of one interaction with the selection state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveResult {
    /// A move was completed.
    pub moved: bool,
    /// The completed move captured a piece.
    pub captured: bool,
    /// The mover has a further capture; the turn has not passed.
    pub can_chain: bool,
}

// Re-exports for convenience
pub use board::Board;
pub use piece::{Piece, PieceId};
