// SPDX-License-Identifier: MIT OR Apache-2.0

//! Piece identity and state

use serde::{Deserialize, Serialize};

use crate::Color;

/// Stable identifier of a piece in the board's arena.
///
/// Assigned at setup and valid for the lifetime of the game; a captured
/// piece keeps its slot with `alive` cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(pub(crate) usize);

/// A single checkers piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    row: i32,
    col: i32,
    color: Color,
    king: bool,
    alive: bool,
}

impl Piece {
    pub(crate) fn new(row: i32, col: i32, color: Color) -> Self {
        Self {
            row,
            col,
            color,
            king: false,
            alive: true,
        }
    }

    pub fn row(&self) -> i32 {
        self.row
    }

    pub fn col(&self) -> i32 {
        self.col
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_king(&self) -> bool {
        self.king
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether this piece sits on the given square.
    pub fn is_at(&self, row: i32, col: i32) -> bool {
        self.row == row && self.col == col
    }

    pub(crate) fn relocate(&mut self, row: i32, col: i32) {
        self.row = row;
        self.col = col;
    }

    /// Promotion is permanent; promoting a king is a no-op.
    pub(crate) fn promote(&mut self) {
        self.king = true;
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) fn set_king(&mut self, king: bool) {
        self.king = king;
    }
}
