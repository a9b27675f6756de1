//! Game-progress save records.
//!
//! ## Two save shapes, one core:
//!
//!   **Sequential-mode save** (`save/<name>`):
//!     worker, boxes, move history + `currentLevel` and `score`.
//!
//!   **Custom-mode save** (`custom_save/<name>`):
//!     worker, boxes, move history + `levelName`. No score.
//!
//! Terrain is never saved: it is recovered from the level itself
//! (by number or by name) and the core is laid back on top.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{Board, Boxes, Level, Position, PushBox, Worker};
use crate::store::progress::{SaveKind, SaveRecord};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// One step of the session's move history.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Move {
    pub direction: Direction,
    pub pushed: bool, // a box moved with the worker
}

/// State shared by both save shapes.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCore {
    pub worker: Position,
    pub boxes: Vec<PushBox>,
    #[serde(default)]
    pub moves_made: Vec<Move>,
    #[serde(default)]
    pub moves_undone: Vec<Move>,
}

impl SaveCore {
    /// Capture the occupancy half of a running level.
    pub fn capture(level: &Level, moves_made: Vec<Move>, moves_undone: Vec<Move>) -> Self {
        SaveCore {
            worker: level.worker.position,
            boxes: level.boxes.as_slice().to_vec(),
            moves_made,
            moves_undone,
        }
    }

    /// Lay the saved worker and boxes back over `board`.
    pub fn restore(&self, board: &Board) -> Level {
        Level {
            board: board.clone(),
            worker: Worker { position: self.worker },
            boxes: Boxes::from(self.boxes.clone()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequentialSave {
    pub current_level: usize,
    #[serde(flatten)]
    pub core: SaveCore,
    pub score: u32,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSave {
    pub level_name: String,
    #[serde(flatten)]
    pub core: SaveCore,
}

impl SaveRecord for SequentialSave {
    const KIND: SaveKind = SaveKind::Sequential;
}

impl SaveRecord for CustomSave {
    const KIND: SaveKind = SaveKind::Custom;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::BoardSize;
    use crate::sim::codec::decode;

    fn sample_core() -> SaveCore {
        SaveCore {
            worker: Position::new(2, 0),
            boxes: vec![PushBox::new(0, 1, false)],
            moves_made: vec![Move { direction: Direction::Left, pushed: true }],
            moves_undone: vec![],
        }
    }

    #[test]
    fn sequential_save_uses_interchange_field_names() {
        let save = SequentialSave { current_level: 3, core: sample_core(), score: 120 };
        let value = serde_json::to_value(&save).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["currentLevel", "worker", "boxes", "movesMade", "movesUndone", "score"]
        );
        assert_eq!(value["movesMade"][0]["direction"], "left");
        assert_eq!(value["boxes"][0]["onTarget"], false);
    }

    #[test]
    fn custom_save_has_level_name_and_no_score() {
        let save = CustomSave { level_name: "spiral".into(), core: sample_core() };
        let value = serde_json::to_value(&save).unwrap();
        assert_eq!(value["levelName"], "spiral");
        assert!(value.get("score").is_none());

        let back: CustomSave = serde_json::from_value(value).unwrap();
        assert_eq!(back, save);
    }

    #[test]
    fn missing_move_history_defaults_to_empty() {
        let json = r#"{"levelName":"x","worker":{"x":1,"y":0},"boxes":[]}"#;
        let save: CustomSave = serde_json::from_str(json).unwrap();
        assert!(save.core.moves_made.is_empty());
        assert!(save.core.moves_undone.is_empty());
    }

    #[test]
    fn capture_then_restore_rebuilds_level() {
        let level = decode(BoardSize::new(3, 2), "wtpbhe").unwrap();
        let core = SaveCore::capture(&level, vec![], vec![]);
        assert_eq!(core.restore(&level.board), level);
    }
}
