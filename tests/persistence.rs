use std::sync::Arc;

use sokoban::domain::entity::{BoardSize, Position};
use sokoban::sim::codec::decode;
use sokoban::sim::level::{BundledSources, LevelCatalog};
use sokoban::sim::save::{CustomSave, Direction, Move, SaveCore, SequentialSave};
use sokoban::store::file::FileStore;
use sokoban::store::levels::LevelStore;
use sokoban::store::progress::{ProgressStore, SaveKind};
use sokoban::store::KeyValueStore;

const SMALL: BoardSize = BoardSize { width: 3, height: 2 };

fn open(dir: &std::path::Path) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::open(dir).unwrap())
}

#[test]
fn same_name_in_every_namespace_does_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    let levels = LevelStore::new(store.clone());
    let progress = ProgressStore::new(store);

    let level = decode(SMALL, "wtpbhe").unwrap();
    let core = SaveCore::capture(&level, vec![], vec![]);
    levels.save("X", "wtpbhe").unwrap();
    progress
        .save("X", &SequentialSave { current_level: 4, core: core.clone(), score: 300 })
        .unwrap();
    progress
        .save("X", &CustomSave { level_name: "X".into(), core })
        .unwrap();

    assert_eq!(levels.get("X").unwrap().as_deref(), Some("wtpbhe"));
    assert_eq!(levels.list_all().unwrap().len(), 1);

    let seq: SequentialSave = progress.load("X").unwrap().unwrap();
    assert_eq!((seq.current_level, seq.score), (4, 300));
    let custom: CustomSave = progress.load("X").unwrap().unwrap();
    assert_eq!(custom.level_name, "X");
}

#[test]
fn saves_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let level = decode(SMALL, "wtpbhe").unwrap();
    let history = vec![
        Move { direction: Direction::Right, pushed: false },
        Move { direction: Direction::Down, pushed: true },
    ];
    {
        let progress = ProgressStore::new(open(dir.path()));
        let core = SaveCore::capture(&level, history.clone(), vec![]);
        progress
            .save("slot1", &SequentialSave { current_level: 1, core, score: 50 })
            .unwrap();
    }

    let progress = ProgressStore::new(open(dir.path()));
    let stored = progress.list_all(SaveKind::Sequential).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "slot1");

    let save: SequentialSave = stored[0].parse().unwrap();
    assert_eq!(save.core.moves_made, history);
    assert_eq!(save.core.worker, Position::new(2, 0));
    assert_eq!(save.core.restore(&level.board), level);
    assert!(progress.list_all(SaveKind::Custom).unwrap().is_empty());
}

#[test]
fn overwrite_keeps_a_single_entry() {
    let dir = tempfile::tempdir().unwrap();
    let levels = LevelStore::new(open(dir.path()));
    levels.save("dup", "wtpbhe").unwrap();
    levels.save("dup", "ptbeee").unwrap();

    let reopened = LevelStore::new(open(dir.path()));
    let all = reopened.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].raw, "ptbeee");
}

#[tokio::test]
async fn custom_level_authored_in_one_session_loads_in_the_next() {
    let dir = tempfile::tempdir().unwrap();
    LevelStore::new(open(dir.path())).save("mine", "wtpbhe").unwrap();

    let levels = LevelStore::new(open(dir.path()));
    let catalog = LevelCatalog::open(levels, SMALL, &BundledSources::embedded())
        .await
        .unwrap();
    assert_eq!(catalog.list_names(), vec!["mine"]);
    let picked = catalog.by_name("mine").unwrap();
    assert_eq!(picked.level.boxes.len(), 2);
}
