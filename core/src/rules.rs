// SPDX-License-Identifier: MIT OR Apache-2.0

//! Move legality and capture detection
//!
//! All checks are pure reads over a borrowed [`Board`]. The king path
//! walk, king capture search and man jump check all go through one
//! diagonal-scan primitive so forced-capture gating cannot disagree
//! between them.

use crate::board::Board;
use crate::piece::PieceId;
use crate::{is_dark_square, on_board, Color};

/// The four diagonal step directions.
pub(crate) const DIAGONAL_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Outcome of walking the open diagonal between two squares.
struct DiagScan {
    /// Square of the single opponent piece on the path, if any.
    opponent: Option<(i32, i32)>,
    /// Path holds no own piece and at most one opponent.
    clear: bool,
}

/// Validates moves against a board position.
pub struct MoveRules<'a> {
    board: &'a Board,
}

impl<'a> MoveRules<'a> {
    /// Create a new rules validator
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Check if a move is legal. Pure predicate, no mutation.
    pub fn is_valid_move(&self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> bool {
        if !on_board(to_row, to_col) {
            return false;
        }
        if self.board.piece_at(to_row, to_col).is_some() {
            return false;
        }
        if !is_dark_square(to_row, to_col) {
            return false;
        }
        let Some(id) = self.board.piece_at(from_row, from_col) else {
            return false;
        };
        let piece = self.board.piece(id);
        let row_diff = to_row - from_row;
        let col_diff = to_col - from_col;
        // Pieces only move diagonally
        if row_diff.abs() != col_diff.abs() || row_diff == 0 {
            return false;
        }
        if !piece.is_king() {
            match row_diff.abs() {
                // A quiet step must go forward, and only when the side
                // has no capture anywhere (forced-capture rule).
                1 => {
                    row_diff == piece.color().forward_dir()
                        && !self.player_has_any_capture(piece.color())
                }
                2 => self.capture_target(id, to_row, to_col).is_some(),
                _ => false,
            }
        } else {
            let scan = self.scan_diagonal(
                piece.color(),
                (from_row, from_col),
                (to_row, to_col),
            );
            if !scan.clear {
                return false;
            }
            match scan.opponent {
                Some(_) => true,
                // A quiet slide is also subject to the forced-capture rule.
                None => !self.player_has_any_capture(piece.color()),
            }
        }
    }

    /// The square of the piece a move would capture, if the move is a
    /// well-formed capture.
    ///
    /// For a man the displacement must be exactly two squares with an
    /// opponent at the midpoint; for a king the open diagonal must hold
    /// exactly one opponent with empty squares on both sides of it.
    /// Checks destination bounds and emptiness itself, so it is safe to
    /// call on candidate squares directly.
    pub fn capture_target(&self, id: PieceId, to_row: i32, to_col: i32) -> Option<(i32, i32)> {
        let piece = self.board.piece(id);
        if !piece.is_alive() || !on_board(to_row, to_col) {
            return None;
        }
        if self.board.piece_at(to_row, to_col).is_some() {
            return None;
        }
        let row_diff = to_row - piece.row();
        let col_diff = to_col - piece.col();
        if row_diff.abs() != col_diff.abs() || row_diff == 0 {
            return None;
        }
        if !piece.is_king() && row_diff.abs() != 2 {
            return None;
        }
        let scan = self.scan_diagonal(
            piece.color(),
            (piece.row(), piece.col()),
            (to_row, to_col),
        );
        if scan.clear {
            scan.opponent
        } else {
            None
        }
    }

    /// Whether this piece has at least one legal capture.
    pub fn has_valid_capture(&self, id: PieceId) -> bool {
        let piece = self.board.piece(id);
        if !piece.is_alive() {
            return false;
        }
        let (row, col) = (piece.row(), piece.col());
        if !piece.is_king() {
            DIAGONAL_DIRS.iter().any(|&(dr, dc)| {
                self.capture_target(id, row + 2 * dr, col + 2 * dc).is_some()
            })
        } else {
            DIAGONAL_DIRS.iter().any(|&(dr, dc)| {
                // First empty square past a lone opponent on this diagonal.
                let mut r = row + dr;
                let mut c = col + dc;
                let mut found_opponent = false;
                while on_board(r, c) {
                    match self.board.piece_at(r, c) {
                        Some(other) => {
                            if self.board.piece(other).color() == piece.color() || found_opponent {
                                break;
                            }
                            found_opponent = true;
                        }
                        None if found_opponent => return true,
                        None => {}
                    }
                    r += dr;
                    c += dc;
                }
                false
            })
        }
    }

    /// Whether this piece has any legal move at all (capture or quiet).
    pub fn has_valid_moves(&self, id: PieceId) -> bool {
        let piece = self.board.piece(id);
        if !piece.is_alive() {
            return false;
        }
        if self.has_valid_capture(id) {
            return true;
        }
        // A quiet slide needs a clear path, so a single step is the
        // minimal witness for kings as well.
        let (row, col) = (piece.row(), piece.col());
        DIAGONAL_DIRS
            .iter()
            .any(|&(dr, dc)| self.is_valid_move(row, col, row + dr, col + dc))
    }

    /// True if any live piece of the color has a legal capture.
    pub fn player_has_any_capture(&self, color: Color) -> bool {
        self.board
            .piece_ids()
            .filter(|&id| {
                let p = self.board.piece(id);
                p.is_alive() && p.color() == color
            })
            .any(|id| self.has_valid_capture(id))
    }

    /// Walk the diagonal between two squares, endpoints excluded.
    fn scan_diagonal(&self, mover: Color, from: (i32, i32), to: (i32, i32)) -> DiagScan {
        let step_row = (to.0 - from.0).signum();
        let step_col = (to.1 - from.1).signum();
        let mut opponent = None;
        let (mut r, mut c) = (from.0 + step_row, from.1 + step_col);
        while (r, c) != to {
            if let Some(id) = self.board.piece_at(r, c) {
                // Blocked by an own piece or a second opponent.
                if self.board.piece(id).color() == mover || opponent.is_some() {
                    return DiagScan {
                        opponent,
                        clear: false,
                    };
                }
                opponent = Some((r, c));
            }
            r += step_row;
            c += step_col;
        }
        DiagScan {
            opponent,
            clear: true,
        }
    }
}
