//! Tile codec: structured level <-> flat raw level string.
//!
//! ## Raw format
//!   One symbol per cell, row-major, no separators:
//!   `e` floor, `w` wall, `t` target, `h` box on target, `b` box, `p` worker.
//!   Row and column come purely from the character index
//!   (`row = i / width`, `col = i % width`).
//!
//! `encode` always produces exactly `width * height` symbols.
//! `decode` accepts longer input and ignores the tail.

use thiserror::Error;

use crate::domain::entity::{Board, BoardSize, Boxes, Level, Position, PushBox, Worker};
use crate::domain::tile::{Terrain, Tile};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("raw level has {actual} symbols, expected at least {expected}")]
    TooShort { expected: usize, actual: usize },
    #[error("unknown tile symbol {symbol:?} at index {index}")]
    UnknownSymbol { symbol: char, index: usize },
}

// ══════════════════════════════════════════════════════════════
// Encode
// ══════════════════════════════════════════════════════════════

/// Flatten a board, its boxes and (optionally) the worker into a raw level.
///
/// Terrain is written first, then boxes (`h` over a target, `b` elsewhere),
/// then the worker, which overwrites whatever symbol its cell held.
///
/// # Panics
/// If `board` was built for a different size, or a box or the worker lies
/// outside `size`. Positions are the caller's responsibility.
pub fn encode(size: BoardSize, board: &Board, boxes: &Boxes, worker: Option<&Worker>) -> String {
    assert_eq!(board.size(), size, "board dimensions differ from the encode size");
    let mut cells = vec![Tile::Empty; size.cell_count()];

    for (y, row) in board.rows().iter().enumerate() {
        for (x, terrain) in row.iter().enumerate() {
            cells[size.index(Position::new(x, y))] = terrain.tile();
        }
    }

    for b in boxes {
        let i = size.index(b.position);
        cells[i] = if cells[i] == Tile::Target { Tile::BoxOnTarget } else { Tile::Box };
    }

    if let Some(w) = worker {
        cells[size.index(w.position)] = Tile::Worker;
    }

    cells.into_iter().map(Tile::symbol).collect()
}

/// Encode a whole level, worker included.
pub fn encode_level(size: BoardSize, level: &Level) -> String {
    encode(size, &level.board, &level.boxes, Some(&level.worker))
}

// ══════════════════════════════════════════════════════════════
// Decode
// ══════════════════════════════════════════════════════════════

/// Rebuild the structured level from a raw string.
///
/// A missing `p` leaves the worker at `(0, 0)`; an editor may not have
/// placed one yet. If several `p` symbols occur the last one wins.
///
/// # Errors
/// `TooShort` when `raw` has fewer than `width * height` symbols.
/// `UnknownSymbol` for any character outside the six tile symbols within
/// that prefix; the board only holds floor, wall and target, so such a
/// character cannot be carried through.
pub fn decode(size: BoardSize, raw: &str) -> Result<Level, CodecError> {
    let expected = size.cell_count();
    let actual = raw.chars().count();
    if actual < expected {
        return Err(CodecError::TooShort { expected, actual });
    }

    let mut board = Board::new(size);
    let mut worker = Worker::default();
    let mut boxes = Boxes::new();

    for (index, symbol) in raw.chars().take(expected).enumerate() {
        let pos = size.position(index);
        let tile = Tile::from_symbol(symbol).ok_or(CodecError::UnknownSymbol { symbol, index })?;
        match tile {
            Tile::Worker => {
                worker.position = pos;
                board.set(pos, Terrain::Empty);
            }
            Tile::Box => {
                boxes.push(PushBox { position: pos, on_target: false });
                board.set(pos, Terrain::Empty);
            }
            Tile::BoxOnTarget => {
                boxes.push(PushBox { position: pos, on_target: true });
                board.set(pos, Terrain::Target);
            }
            Tile::Empty  => board.set(pos, Terrain::Empty),
            Tile::Wall   => board.set(pos, Terrain::Wall),
            Tile::Target => board.set(pos, Terrain::Target),
        }
    }

    Ok(Level { board, worker, boxes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::Terrain::{Empty as E, Target as T, Wall as W};

    fn small() -> BoardSize {
        BoardSize::new(3, 2)
    }

    #[test]
    fn decodes_mixed_row() {
        let level = decode(small(), "wtpbhe").unwrap();
        assert_eq!(level.board.rows(), &[vec![W, T, E], vec![E, T, E]]);
        assert_eq!(level.worker, Worker::new(2, 0));
        assert_eq!(
            level.boxes.as_slice(),
            &[PushBox::new(0, 1, false), PushBox::new(1, 1, true)]
        );
    }

    #[test]
    fn reencode_reproduces_raw() {
        let level = decode(small(), "wtpbhe").unwrap();
        assert_eq!(encode_level(small(), &level), "wtpbhe");
    }

    #[test]
    fn encode_without_worker_leaves_terrain() {
        let level = decode(small(), "wtpbhe").unwrap();
        let raw = encode(small(), &level.board, &level.boxes, None);
        assert_eq!(raw, "wtebhe");
    }

    #[test]
    fn box_on_plain_floor_encodes_as_b_even_if_flag_says_on_target() {
        let board = Board::new(small());
        let boxes = Boxes::from(vec![PushBox::new(1, 0, true)]);
        assert_eq!(encode(small(), &board, &boxes, None), "ebeeee");
    }

    #[test]
    fn worker_overwrites_target() {
        let mut board = Board::new(small());
        board.set(Position::new(0, 0), Terrain::Target);
        let raw = encode(small(), &board, &Boxes::new(), Some(&Worker::new(0, 0)));
        assert_eq!(raw, "peeeee");
    }

    #[test]
    #[should_panic(expected = "board dimensions differ")]
    fn encode_rejects_board_of_another_size() {
        let board = Board::new(BoardSize::new(2, 3));
        encode(small(), &board, &Boxes::new(), None);
    }

    #[test]
    fn missing_worker_defaults_to_origin() {
        let level = decode(small(), "wwwbte").unwrap();
        assert_eq!(level.worker.position, Position::new(0, 0));
    }

    #[test]
    fn trailing_characters_are_ignored() {
        let level = decode(small(), "eeeeepXYZ\n").unwrap();
        assert_eq!(level.worker, Worker::new(2, 1));
    }

    #[test]
    fn short_input_is_rejected() {
        assert_eq!(
            decode(small(), "eee"),
            Err(CodecError::TooShort { expected: 6, actual: 3 })
        );
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        assert_eq!(
            decode(small(), "eeXeee"),
            Err(CodecError::UnknownSymbol { symbol: 'X', index: 2 })
        );
    }

    #[test]
    fn round_trip_preserves_every_cell_kind() {
        let size = BoardSize::new(4, 3);
        let mut board = Board::new(size);
        for x in 0..4 {
            board.set(Position::new(x, 0), Terrain::Wall);
        }
        board.set(Position::new(1, 1), Terrain::Target);
        board.set(Position::new(2, 2), Terrain::Target);
        board.set(Position::new(3, 2), Terrain::Target);
        let boxes = Boxes::from(vec![
            PushBox::new(1, 1, true),
            PushBox::new(0, 2, false),
            PushBox::new(3, 2, true),
        ]);
        let worker = Worker::new(3, 1);

        let raw = encode(size, &board, &boxes, Some(&worker));
        assert_eq!(raw.len(), size.cell_count());

        let level = decode(size, &raw).unwrap();
        assert_eq!(level.board, board);
        assert_eq!(level.worker, worker);
        assert_eq!(level.boxes, boxes);
    }
}
