// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use checkers_core::{is_dark_square, Board, Color, BOARD_SIZE};

/// Render the board as ASCII art, White at the bottom.
pub fn render_board(board: &Board) -> String {
    let mut output = String::new();

    output.push_str("   ");
    for col in 0..BOARD_SIZE {
        output.push_str(&format!(" {}", column_char(col)));
    }
    output.push('\n');

    for row in 0..BOARD_SIZE {
        // Ranks count up from White's side: row 0 prints as rank 8.
        let rank = BOARD_SIZE - row;
        output.push_str(&format!("{:2} ", rank));

        for col in 0..BOARD_SIZE {
            let symbol = match board.piece_at(row, col) {
                Some(id) => {
                    let piece = board.piece(id);
                    match (piece.color(), piece.is_king()) {
                        (Color::White, false) => '○',
                        (Color::White, true) => '♔',
                        (Color::Black, false) => '●',
                        (Color::Black, true) => '♚',
                    }
                }
                None if is_dark_square(row, col) => '.',
                None => ' ',
            };
            output.push_str(&format!(" {}", symbol));
        }

        output.push_str(&format!(" {}", rank));
        output.push('\n');
    }

    output.push_str("   ");
    for col in 0..BOARD_SIZE {
        output.push_str(&format!(" {}", column_char(col)));
    }
    output.push('\n');

    if let Some((row, col)) = board.selected_square() {
        output.push_str(&format!("Selected: {}\n", square_name(row, col)));
    }

    output
}

/// Convert a column index to its file character (a-h).
fn column_char(col: i32) -> char {
    (b'a' + col as u8) as char
}

/// Algebraic name of a square, e.g. `(5, 0)` -> "a3".
pub fn square_name(row: i32, col: i32) -> String {
    format!("{}{}", column_char(col), BOARD_SIZE - row)
}

/// Parse an algebraic square name back into `(row, col)`.
pub fn parse_square(input: &str) -> Option<(i32, i32)> {
    let mut chars = input.trim().chars();
    let file = chars.next()?.to_ascii_lowercase();
    let rank: i32 = chars.as_str().parse().ok()?;
    if !('a'..='h').contains(&file) || !(1..=BOARD_SIZE).contains(&rank) {
        return None;
    }
    Some((BOARD_SIZE - rank, file as i32 - 'a' as i32))
}
