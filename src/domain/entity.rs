//! Value types shared by the codec, the catalog and save records:
//! Position, Worker, PushBox, Boxes, Board and the assembled Level.
//! These carry no behaviour beyond what the interchange layer needs.

use serde::{Deserialize, Serialize};

use crate::domain::tile::Terrain;

/// Fixed grid dimensions. Every raw level string is `width * height` symbols.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BoardSize {
    pub width: usize,
    pub height: usize,
}

impl BoardSize {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 8;
    pub const DEFAULT: BoardSize = BoardSize { width: Self::WIDTH, height: Self::HEIGHT };

    pub fn new(width: usize, height: usize) -> Self {
        BoardSize { width, height }
    }

    pub fn cell_count(self) -> usize {
        self.width * self.height
    }

    /// Flat index of a cell: `row * width + col`.
    pub fn index(self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    /// Inverse of `index`; wraps to the next row after `width` columns.
    pub fn position(self, index: usize) -> Position {
        Position { x: index % self.width, y: index / self.width }
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        BoardSize::DEFAULT
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Worker {
    pub position: Position,
}

impl Worker {
    pub fn new(x: usize, y: usize) -> Self {
        Worker { position: Position::new(x, y) }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushBox {
    pub position: Position,
    pub on_target: bool,
}

impl PushBox {
    pub fn new(x: usize, y: usize, on_target: bool) -> Self {
        PushBox { position: Position::new(x, y), on_target }
    }
}

/// Ordered box collection. Order follows the raw level scan (row-major).
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Boxes(Vec<PushBox>);

impl Boxes {
    pub fn new() -> Self {
        Boxes(Vec::new())
    }

    pub fn push(&mut self, b: PushBox) {
        self.0.push(b);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PushBox> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Box occupying `pos`, if any.
    pub fn at(&self, pos: Position) -> Option<&PushBox> {
        self.0.iter().find(|b| b.position == pos)
    }

    pub fn as_slice(&self) -> &[PushBox] {
        &self.0
    }
}

impl From<Vec<PushBox>> for Boxes {
    fn from(v: Vec<PushBox>) -> Self {
        Boxes(v)
    }
}

impl<'a> IntoIterator for &'a Boxes {
    type Item = &'a PushBox;
    type IntoIter = std::slice::Iter<'a, PushBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Terrain grid. Boxes and the worker are never stored here.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    size: BoardSize,
    rows: Vec<Vec<Terrain>>,
}

impl Board {
    pub fn new(size: BoardSize) -> Self {
        Board {
            size,
            rows: vec![vec![Terrain::Empty; size.width]; size.height],
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<Terrain>] {
        &self.rows
    }

    /// Terrain at `pos`. Out-of-bounds reads as `Wall`.
    pub fn get(&self, pos: Position) -> Terrain {
        self.rows
            .get(pos.y)
            .and_then(|r| r.get(pos.x))
            .copied()
            .unwrap_or(Terrain::Wall)
    }

    /// # Panics
    /// If `pos` lies outside the board.
    pub fn set(&mut self, pos: Position, terrain: Terrain) {
        self.rows[pos.y][pos.x] = terrain;
    }

    /// Positions of every target cell, occupied or not.
    pub fn targets(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, t)| **t == Terrain::Target)
                .map(move |(x, _)| Position::new(x, y))
        })
    }
}

/// A decoded level, ready to hand to a game session.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Level {
    pub board: Board,
    pub worker: Worker,
    pub boxes: Boxes,
}
