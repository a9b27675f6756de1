//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.
//!
//! ```toml
//! [board]
//! width = 10
//! height = 8
//!
//! [storage]
//! dir = "data"            # relative paths resolve against the CWD
//!
//! [levels]
//! difficulty = "levels/difficulty.json"   # omit to use the built-in set
//! sequential = "levels/sequential.json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::domain::entity::BoardSize;
use crate::sim::level::{BundledSources, LevelSource};

const APP_DIR: &str = ".local/share/sokoban";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub board: BoardSize,
    pub storage_dir: PathBuf,
    pub difficulty_levels: Option<PathBuf>,
    pub sequential_levels: Option<PathBuf>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    storage: TomlStorage,
    #[serde(default)]
    levels: TomlLevels,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_width")]
    width: usize,
    #[serde(default = "default_height")]
    height: usize,
}

#[derive(Deserialize, Debug, Default)]
struct TomlStorage {
    #[serde(default)]
    dir: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlLevels {
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    sequential: Option<String>,
}

// ── Defaults ──

fn default_width() -> usize { BoardSize::WIDTH }
fn default_height() -> usize { BoardSize::HEIGHT }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), Path::new("."))
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/sokoban`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        for dir in &search_dirs {
            let path = dir.join("config.toml");
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        GameConfig::default()
    }

    /// Load a specific config file. Relative level paths resolve against
    /// the file's directory.
    pub fn load_from(path: &Path) -> Self {
        let base = path.parent().unwrap_or(Path::new("."));
        match std::fs::read_to_string(path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => GameConfig::from_toml(cfg, base),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "config parse error, using defaults");
                    GameConfig::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config, using defaults");
                GameConfig::default()
            }
        }
    }

    /// Parse a config document directly. Relative paths resolve against `base`.
    pub fn from_toml_str(text: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(cfg, base))
    }

    fn from_toml(cfg: TomlConfig, base: &Path) -> Self {
        let resolve = |p: String| {
            let path = PathBuf::from(p);
            if path.is_absolute() { path } else { base.join(path) }
        };

        let board = if cfg.board.width == 0 || cfg.board.height == 0 {
            warn!(
                width = cfg.board.width,
                height = cfg.board.height,
                "board dimensions must be non-zero, using defaults"
            );
            BoardSize::DEFAULT
        } else {
            BoardSize::new(cfg.board.width, cfg.board.height)
        };

        GameConfig {
            board,
            storage_dir: cfg
                .storage
                .dir
                .map(PathBuf::from)
                .unwrap_or_else(default_storage_dir),
            difficulty_levels: cfg.levels.difficulty.map(resolve),
            sequential_levels: cfg.levels.sequential.map(resolve),
        }
    }

    /// Bundled sources: configured files where given, embedded otherwise.
    pub fn bundled_sources(&self) -> BundledSources {
        let embedded = BundledSources::embedded();
        BundledSources {
            difficulty: self
                .difficulty_levels
                .clone()
                .map_or(embedded.difficulty, LevelSource::File),
            sequential: self
                .sequential_levels
                .clone()
                .map_or(embedded.sequential, LevelSource::File),
        }
    }
}

/// Where the persistent store lives when the config does not say.
///   1. `~/.local/share/sokoban` (created on demand)
///   2. CWD
pub fn default_storage_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(APP_DIR);
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Directories that may hold `config.toml`, first match wins: next to the
/// installed binary, the directory `sokoban` was started from, then the
/// data directory that also holds the store.
fn candidate_dirs() -> Vec<PathBuf> {
    let beside_binary = std::env::current_exe()
        .ok()
        .map(|exe| exe.canonicalize().unwrap_or(exe))
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let launch_dir = std::env::current_dir().ok();
    let data_dir = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(APP_DIR))
        .filter(|dir| dir.is_dir());

    let mut dirs: Vec<PathBuf> = Vec::with_capacity(3);
    for dir in [beside_binary, launch_dir, data_dir].into_iter().flatten() {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}
