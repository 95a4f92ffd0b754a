// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn orchestration around the rule engine
//!
//! The session decides whose turn it is, when the turn passes (not
//! during a capture chain), and when the game is over. It owns the
//! board; the network channel stays outside and only exchanges
//! [`MoveRecord`]s.

use checkers_core::{Board, Color, MoveRecord, MoveResult};
use tracing::{info, warn};

/// How this session is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Both sides on this machine
    Local,
    /// Network game, this endpoint hosted and plays White
    NetworkHost,
    /// Network game, this endpoint joined and plays Black
    NetworkClient,
}

/// Orchestrates turn order and win detection around a [`Board`].
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    mode: GameMode,
    current_player: Color,
    my_turn: bool,
    winner: Option<Color>,
}

impl GameSession {
    /// Start a session in the standard position; White moves first, and
    /// in a network game the host plays White.
    pub fn new(mode: GameMode) -> Self {
        Self::with_board(Board::new(), mode)
    }

    /// Start a session from a prepared position, White to move.
    pub fn with_board(board: Board, mode: GameMode) -> Self {
        Self {
            board,
            mode,
            current_player: Color::White,
            my_turn: mode != GameMode::NetworkClient,
            winner: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    /// Whether input from this endpoint is accepted right now. Always
    /// true in a local game.
    pub fn my_turn(&self) -> bool {
        self.my_turn
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// The color this endpoint controls, if the game is networked.
    pub fn local_color(&self) -> Option<Color> {
        match self.mode {
            GameMode::Local => None,
            GameMode::NetworkHost => Some(Color::White),
            GameMode::NetworkClient => Some(Color::Black),
        }
    }

    /// Restart with a fresh board; the starting side moves first again.
    pub fn restart(&mut self) {
        self.board.reset();
        self.current_player = Color::White;
        self.my_turn = self.mode != GameMode::NetworkClient;
        self.winner = None;
        info!("session restarted");
    }

    /// Feed one click into the selection state machine for the side to
    /// move.
    ///
    /// On a completed move with no pending capture chain the turn
    /// passes to the other side. Input is ignored once the game is over
    /// or while waiting for the opponent.
    pub fn click(&mut self, row: i32, col: i32) -> MoveResult {
        if self.is_over() || !self.my_turn {
            return MoveResult::default();
        }
        let result = self.board.handle_click(row, col, self.current_player);
        if result.moved && !result.can_chain {
            self.pass_turn();
        }
        result
    }

    /// The record of the segment just played, for network dispatch.
    pub fn last_move(&self) -> Option<MoveRecord> {
        self.board.last_move()
    }

    /// Apply one move segment received from the peer.
    ///
    /// The turn passes back only when the segment does not leave the
    /// remote mover with a further capture (chain segments arrive as
    /// separate records).
    pub fn apply_remote_move(&mut self, record: MoveRecord) -> bool {
        if self.is_over() || !record.is_valid() {
            return false;
        }
        let capture_shaped = (record.to_row - record.from_row).abs() > 1;
        if !self
            .board
            .move_piece(record.from_row, record.from_col, record.to_row, record.to_col)
        {
            warn!(?record, "peer sent an illegal move");
            return false;
        }
        let chain_pending = capture_shaped
            && self
                .board
                .piece_at(record.to_row, record.to_col)
                .map(|id| self.board.has_valid_capture(id))
                .unwrap_or(false);
        if !chain_pending {
            self.pass_turn();
        }
        true
    }

    fn pass_turn(&mut self) {
        self.current_player = self.current_player.opposite();
        if self.mode != GameMode::Local {
            self.my_turn = !self.my_turn;
        }
        if self.board.is_game_over(self.current_player) {
            let winner = self.current_player.opposite();
            self.winner = Some(winner);
            info!(?winner, "game over");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_alternates_on_completed_moves() {
        let mut session = GameSession::new(GameMode::Local);
        assert_eq!(session.current_player(), Color::White);

        session.click(5, 0);
        let result = session.click(4, 1);
        assert!(result.moved);
        assert_eq!(session.current_player(), Color::Black);

        session.click(2, 1);
        let result = session.click(3, 0);
        assert!(result.moved);
        assert_eq!(session.current_player(), Color::White);
    }

    #[test]
    fn clicks_for_the_waiting_side_are_ignored() {
        let mut session = GameSession::new(GameMode::NetworkClient);
        assert!(!session.my_turn());

        let result = session.click(2, 1);
        assert!(!result.moved);
        assert!(session.board().selected_square().is_none());
    }

    #[test]
    fn remote_move_passes_the_turn_back() {
        let mut session = GameSession::new(GameMode::NetworkClient);
        assert!(session.apply_remote_move(MoveRecord::new(5, 0, 4, 1)));
        assert!(session.my_turn());
        assert_eq!(session.current_player(), Color::Black);
    }

    #[test]
    fn invalid_remote_moves_are_rejected() {
        let mut session = GameSession::new(GameMode::NetworkClient);
        assert!(!session.apply_remote_move(MoveRecord::INVALID));
        assert!(!session.apply_remote_move(MoveRecord::new(5, 0, 3, 2)));
        assert!(!session.my_turn());
        assert_eq!(session.current_player(), Color::White);
    }

    #[test]
    fn chain_holds_the_turn_until_finished() {
        let mut board = Board::empty();
        board.place_piece(5, 2, Color::White, false).unwrap();
        board.place_piece(4, 3, Color::Black, false).unwrap();
        board.place_piece(2, 5, Color::Black, false).unwrap();
        let mut session = GameSession::with_board(board, GameMode::Local);

        session.click(5, 2);
        let first = session.click(3, 4);
        assert!(first.moved && first.captured && first.can_chain);
        // The turn has not passed
        assert_eq!(session.current_player(), Color::White);

        let second = session.click(1, 6);
        assert!(second.moved && second.captured && !second.can_chain);

        // Black has nothing left: the game is over and White won.
        assert!(session.is_over());
        assert_eq!(session.winner(), Some(Color::White));
    }

    #[test]
    fn remote_chain_segments_hold_the_turn() {
        let mut board = Board::empty();
        board.place_piece(5, 2, Color::White, false).unwrap();
        board.place_piece(4, 3, Color::Black, false).unwrap();
        board.place_piece(2, 5, Color::Black, false).unwrap();
        board.place_piece(0, 1, Color::Black, false).unwrap();
        let mut session = GameSession::with_board(board, GameMode::NetworkClient);

        // First segment of White's double jump: the turn stays remote.
        assert!(session.apply_remote_move(MoveRecord::new(5, 2, 3, 4)));
        assert!(!session.my_turn());
        assert_eq!(session.current_player(), Color::White);

        // Final segment: now it is Black's turn locally.
        assert!(session.apply_remote_move(MoveRecord::new(3, 4, 1, 6)));
        assert!(session.my_turn());
        assert_eq!(session.current_player(), Color::Black);
    }
}
