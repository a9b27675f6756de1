//! Terminal level preview.
//!
//! Each cell is drawn two columns wide so the grid looks square in a
//! terminal. All commands are batched with `queue!` and flushed once.
//! The preview goes through the codec so it shows exactly what the
//! raw level says, occupancy included.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::domain::entity::{BoardSize, Level};
use crate::domain::tile::Tile;
use crate::sim::codec;

/// Two-column glyph plus colours for one tile.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Glyph {
    pub left: char,
    pub right: char,
    pub fg: Color,
    pub bg: Color,
}

pub fn glyph(tile: Tile) -> Glyph {
    let (left, right, fg, bg) = match tile {
        Tile::Empty       => (' ', ' ', Color::Reset, Color::Reset),
        Tile::Wall        => ('█', '█', Color::Rgb { r: 120, g: 120, b: 120 }, Color::Rgb { r: 70, g: 70, b: 70 }),
        Tile::Target      => ('·', '·', Color::Rgb { r: 255, g: 80, b: 80 }, Color::Reset),
        Tile::Box         => ('[', ']', Color::Rgb { r: 180, g: 120, b: 60 }, Color::Reset),
        Tile::BoxOnTarget => ('[', ']', Color::Rgb { r: 80, g: 220, b: 80 }, Color::Rgb { r: 20, g: 60, b: 20 }),
        Tile::Worker      => ('@', ' ', Color::Rgb { r: 100, g: 200, b: 255 }, Color::Reset),
    };
    Glyph { left, right, fg, bg }
}

/// Draw `level` row by row into `out`.
pub fn render(out: &mut impl Write, size: BoardSize, level: &Level) -> io::Result<()> {
    let raw = codec::encode_level(size, level);
    let symbols: Vec<char> = raw.chars().collect();

    for row in symbols.chunks(size.width) {
        for &symbol in row {
            let tile = Tile::from_symbol(symbol).unwrap_or(Tile::Empty);
            let g = glyph(tile);
            queue!(
                out,
                SetForegroundColor(g.fg),
                SetBackgroundColor(g.bg),
                Print(g.left),
                Print(g.right),
            )?;
        }
        queue!(out, ResetColor, Print("\r\n"))?;
    }
    out.flush()
}
