// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire encoding of move records
//!
//! One move is four big-endian `i32`s in fixed order
//! `from_row, from_col, to_row, to_col`. Records are fixed-size, so the
//! byte stream needs no further framing: the receiver accumulates bytes
//! and drains complete 16-byte records.

use checkers_core::MoveRecord;

/// Encoded length of one move record.
pub const MOVE_FRAME_LEN: usize = 16;

/// Encode a record as one wire frame.
pub fn encode_move(record: &MoveRecord) -> [u8; MOVE_FRAME_LEN] {
    let mut frame = [0u8; MOVE_FRAME_LEN];
    let fields = [
        record.from_row,
        record.from_col,
        record.to_row,
        record.to_col,
    ];
    for (chunk, value) in frame.chunks_exact_mut(4).zip(fields) {
        chunk.copy_from_slice(&value.to_be_bytes());
    }
    frame
}

/// Decode one complete wire frame.
pub fn decode_move(frame: &[u8; MOVE_FRAME_LEN]) -> MoveRecord {
    let field = |i: usize| {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&frame[i * 4..(i + 1) * 4]);
        i32::from_be_bytes(bytes)
    };
    MoveRecord::new(field(0), field(1), field(2), field(3))
}

/// Accumulates stream bytes and yields complete move records in order.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes read from the transport.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next record once it has fully arrived.
    pub fn next_record(&mut self) -> Option<MoveRecord> {
        if self.buf.len() < MOVE_FRAME_LEN {
            return None;
        }
        let mut frame = [0u8; MOVE_FRAME_LEN];
        frame.copy_from_slice(&self.buf[..MOVE_FRAME_LEN]);
        self.buf.drain(..MOVE_FRAME_LEN);
        Some(decode_move(&frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_survive_arbitrary_fragmentation() {
        let first = MoveRecord::new(2, 1, 3, 2);
        let second = MoveRecord::new(5, 0, 4, 1);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&encode_move(&first));
        bytes.extend_from_slice(&encode_move(&second));

        // Deliver the stream one byte at a time
        let mut frames = FrameBuffer::new();
        let mut decoded = Vec::new();
        for byte in bytes {
            frames.extend(&[byte]);
            while let Some(record) = frames.next_record() {
                decoded.push(record);
            }
        }

        assert_eq!(decoded, vec![first, second]);
    }

    #[test]
    fn incomplete_frame_yields_nothing() {
        let mut frames = FrameBuffer::new();
        frames.extend(&encode_move(&MoveRecord::new(2, 1, 3, 2))[..15]);
        assert!(frames.next_record().is_none());
    }

    #[test]
    fn sentinel_encodes_and_decodes() {
        let frame = encode_move(&MoveRecord::INVALID);
        assert_eq!(decode_move(&frame), MoveRecord::INVALID);
    }
}
