//! Level rules: solved check and raw-level validation.
//!
//! Pure functions, no side effects. The codec decodes whatever it is
//! given; these rules decide whether a raw level is fit to be stored.
//!
//! ## Validation table
//! ┌───────────────────────────────┬──────────────────────┐
//! │ Condition                     │ Result               │
//! ├───────────────────────────────┼──────────────────────┤
//! │ length != width * height      │ WrongLength          │
//! │ symbol outside `ewthbp`       │ UnknownSymbol        │
//! │ more than one `p`             │ MultipleWorkers      │
//! │ no `p`                        │ MissingWorker        │
//! │ no `h` / `b`                  │ NoBoxes              │
//! │ boxes != targets (`t` + `h`)  │ BoxTargetMismatch    │
//! │ otherwise                     │ Ok                   │
//! └───────────────────────────────┴──────────────────────┘

use thiserror::Error;

use crate::domain::entity::{BoardSize, Level};
use crate::domain::tile::Tile;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelIssue {
    #[error("level has {actual} symbols, expected exactly {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("unknown tile symbol {symbol:?} at index {index}")]
    UnknownSymbol { symbol: char, index: usize },
    #[error("level places {0} workers")]
    MultipleWorkers(usize),
    #[error("level has no worker")]
    MissingWorker,
    #[error("level has no boxes")]
    NoBoxes,
    #[error("level has {boxes} boxes but {targets} targets")]
    BoxTargetMismatch { boxes: usize, targets: usize },
}

/// Check a raw level against the full symbol-string invariant.
pub fn validate(size: BoardSize, raw: &str) -> Result<(), LevelIssue> {
    let expected = size.cell_count();
    let actual = raw.chars().count();
    if actual != expected {
        return Err(LevelIssue::WrongLength { expected, actual });
    }

    let mut workers = 0;
    let mut boxes = 0;
    let mut targets = 0;
    for (index, symbol) in raw.chars().enumerate() {
        let tile = Tile::from_symbol(symbol).ok_or(LevelIssue::UnknownSymbol { symbol, index })?;
        if tile == Tile::Worker {
            workers += 1;
        }
        if tile.is_box() {
            boxes += 1;
        }
        if tile.is_target() {
            targets += 1;
        }
    }

    match workers {
        0 => return Err(LevelIssue::MissingWorker),
        1 => {}
        n => return Err(LevelIssue::MultipleWorkers(n)),
    }
    if boxes == 0 {
        return Err(LevelIssue::NoBoxes);
    }
    if boxes != targets {
        return Err(LevelIssue::BoxTargetMismatch { boxes, targets });
    }
    Ok(())
}

/// A level is solved when every target cell holds a box.
pub fn is_solved(level: &Level) -> bool {
    level.board.targets().all(|pos| level.boxes.at(pos).is_some())
}

/// Boxes still waiting for a target.
pub fn boxes_remaining(level: &Level) -> usize {
    level.boxes.iter().filter(|b| !b.on_target).count()
}
