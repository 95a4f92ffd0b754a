// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board state: the arena of pieces, move execution and the selection
//! state machine.
//!
//! The board owns every piece of the game in a flat arena. Captured
//! pieces stay in their slot with `alive` cleared, so a [`PieceId`]
//! handed out at setup never dangles. Square occupancy is derived by
//! scanning the arena, not stored separately.

use crate::piece::{Piece, PieceId};
use crate::rules::MoveRules;
use crate::{is_dark_square, on_board, Color, MoveRecord, MoveResult, BOARD_SIZE};

/// Translate a point in board-pixel space to a cell, for presentation
/// layers that deliver raw click coordinates.
pub fn cell_at_point(x: f32, y: f32, cell_size: f32) -> Option<(i32, i32)> {
    if cell_size <= 0.0 || x < 0.0 || y < 0.0 {
        return None;
    }
    let col = (x / cell_size) as i32;
    let row = (y / cell_size) as i32;
    if on_board(row, col) {
        Some((row, col))
    } else {
        None
    }
}

/// The rule engine: owns the pieces and the interaction state.
#[derive(Debug, Clone)]
pub struct Board {
    pieces: Vec<Piece>,
    selected: Option<PieceId>,
    last_move: Option<MoveRecord>,
}

struct AppliedMove {
    id: PieceId,
    captured: bool,
}

impl Board {
    /// Create a board in the standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.reset();
        board
    }

    /// Create a board with no pieces, for setting up positions.
    pub fn empty() -> Self {
        Self {
            pieces: Vec::new(),
            selected: None,
            last_move: None,
        }
    }

    /// Restore the standard starting position: 12 men per side on the
    /// dark squares of the first three rows.
    pub fn reset(&mut self) {
        self.pieces.clear();
        self.selected = None;
        self.last_move = None;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if !is_dark_square(row, col) {
                    continue;
                }
                if row < 3 {
                    self.pieces.push(Piece::new(row, col, Color::Black));
                } else if row > 4 {
                    self.pieces.push(Piece::new(row, col, Color::White));
                }
            }
        }
    }

    /// Place a piece on an empty dark square. Returns its id, or `None`
    /// if the square is off-board, light, or occupied.
    pub fn place_piece(&mut self, row: i32, col: i32, color: Color, king: bool) -> Option<PieceId> {
        if !on_board(row, col) || !is_dark_square(row, col) {
            return None;
        }
        if self.piece_at(row, col).is_some() {
            return None;
        }
        let id = PieceId(self.pieces.len());
        let mut piece = Piece::new(row, col, color);
        piece.set_king(king);
        self.pieces.push(piece);
        Some(id)
    }

    /// Id of the live piece occupying a square, if any.
    pub fn piece_at(&self, row: i32, col: i32) -> Option<PieceId> {
        self.pieces
            .iter()
            .position(|p| p.is_alive() && p.is_at(row, col))
            .map(PieceId)
    }

    /// Look up a piece by id (dead pieces included).
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    /// All ids in the arena, dead pieces included.
    pub fn piece_ids(&self) -> impl Iterator<Item = PieceId> {
        (0..self.pieces.len()).map(PieceId)
    }

    /// Live pieces, for rendering and snapshots.
    pub fn live_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| p.is_alive())
    }

    /// Number of live pieces of a color.
    pub fn live_count(&self, color: Color) -> usize {
        self.live_pieces().filter(|p| p.color() == color).count()
    }

    /// The currently selected square, for highlighting.
    pub fn selected_square(&self) -> Option<(i32, i32)> {
        let piece = self.piece(self.selected?);
        Some((piece.row(), piece.col()))
    }

    /// The last completed move, for network dispatch.
    pub fn last_move(&self) -> Option<MoveRecord> {
        self.last_move
    }

    /// Check if a move is legal. Pure predicate, no mutation.
    pub fn is_valid_move(&self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> bool {
        MoveRules::new(self).is_valid_move(from_row, from_col, to_row, to_col)
    }

    /// The square a move by this piece would capture, if it is a
    /// well-formed capture.
    pub fn can_capture(&self, id: PieceId, to_row: i32, to_col: i32) -> Option<(i32, i32)> {
        MoveRules::new(self).capture_target(id, to_row, to_col)
    }

    /// Whether this piece has at least one legal capture.
    pub fn has_valid_capture(&self, id: PieceId) -> bool {
        MoveRules::new(self).has_valid_capture(id)
    }

    /// Whether this piece has any legal move at all.
    pub fn has_valid_moves(&self, id: PieceId) -> bool {
        MoveRules::new(self).has_valid_moves(id)
    }

    /// True if any live piece of the color has a legal capture.
    pub fn player_has_any_capture(&self, color: Color) -> bool {
        MoveRules::new(self).player_has_any_capture(color)
    }

    /// True if no live piece of the color has a legal move.
    pub fn is_game_over(&self, color: Color) -> bool {
        let rules = MoveRules::new(self);
        !self
            .piece_ids()
            .filter(|&id| {
                let p = self.piece(id);
                p.is_alive() && p.color() == color
            })
            .any(|id| rules.has_valid_moves(id))
    }

    /// Validate and execute a move. Returns `false` without side effects
    /// if the move is illegal.
    pub fn move_piece(&mut self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> bool {
        self.apply_move(from_row, from_col, to_row, to_col).is_some()
    }

    fn apply_move(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Option<AppliedMove> {
        if !self.is_valid_move(from_row, from_col, to_row, to_col) {
            return None;
        }
        let id = self.piece_at(from_row, from_col)?;
        // The captured piece is removed first, then the mover relocates.
        let victim_square = self.can_capture(id, to_row, to_col);
        if let Some((victim_row, victim_col)) = victim_square {
            if let Some(victim) = self.piece_at(victim_row, victim_col) {
                self.pieces[victim.0].kill();
                tracing::debug!(
                    row = victim_row,
                    col = victim_col,
                    "captured piece"
                );
            }
        }
        let piece = &mut self.pieces[id.0];
        piece.relocate(to_row, to_col);
        if !piece.is_king() && to_row == piece.color().crown_row() {
            piece.promote();
            tracing::debug!(row = to_row, col = to_col, "promoted to king");
        }
        self.last_move = Some(MoveRecord::new(from_row, from_col, to_row, to_col));
        Some(AppliedMove {
            id,
            captured: victim_square.is_some(),
        })
    }

    /// Drive the two-phase selection state machine with one click on a
    /// board cell.
    ///
    /// Selecting is restricted to live pieces of `current_player`, and,
    /// when the side has a mandatory capture, to pieces that can capture.
    /// After a capture that leaves the mover with a further capture the
    /// selection stays on the mover and `can_chain` is set; the caller
    /// must not pass the turn until a move returns `can_chain == false`.
    pub fn handle_click(&mut self, row: i32, col: i32, current_player: Color) -> MoveResult {
        let mut result = MoveResult::default();
        if !on_board(row, col) {
            return result;
        }

        let Some(selected) = self.selected else {
            if let Some(id) = self.piece_at(row, col) {
                if self.piece(id).color() == current_player && self.selectable(id, current_player) {
                    self.selected = Some(id);
                }
            }
            return result;
        };

        // Guard against a selection left over from the other side, or a
        // piece captured by a remote move in the meantime.
        let piece = self.piece(selected);
        if !piece.is_alive() || piece.color() != current_player {
            self.selected = None;
            return result;
        }
        let (from_row, from_col) = (piece.row(), piece.col());

        // Clicking the selected square deselects it.
        if (row, col) == (from_row, from_col) {
            self.selected = None;
            return result;
        }

        // Clicking another piece switches the selection, subject to the
        // same mandatory-capture gating.
        if let Some(other) = self.piece_at(row, col) {
            if self.piece(other).color() == current_player && self.selectable(other, current_player)
            {
                self.selected = Some(other);
            }
            return result;
        }

        // Otherwise treat the click as a destination. An illegal move is
        // ignored and the selection stays.
        if let Some(applied) = self.apply_move(from_row, from_col, row, col) {
            result.moved = true;
            result.captured = applied.captured;
            if applied.captured && self.has_valid_capture(applied.id) {
                // Chain continues: keep the mover selected.
                self.selected = Some(applied.id);
                result.can_chain = true;
            } else {
                self.selected = None;
            }
        }
        result
    }

    fn selectable(&self, id: PieceId, color: Color) -> bool {
        !self.player_has_any_capture(color) || self.has_valid_capture(id)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
