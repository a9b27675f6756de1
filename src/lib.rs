//! Sokoban level interchange: the raw tile-symbol codec, the level
//! catalog (difficulty, numbered and custom pools) and persistence of
//! custom levels and game progress in a namespaced key/value store.

pub mod config;
pub mod domain;
pub mod sim;
pub mod store;
pub mod ui;

pub use domain::entity::{Board, BoardSize, Boxes, Level, Position, PushBox, Worker};
pub use domain::tile::{Terrain, Tile};
pub use sim::codec::{decode, encode, CodecError};
pub use sim::level::{BundledSources, CatalogError, Difficulty, LevelCatalog, SelectedLevel, Selector};
