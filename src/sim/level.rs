//! Level catalog: three level pools behind one selection API.
//!
//! ## Pools
//!   1. By difficulty: bundled `{easy: {name: raw}, intermediate: .., hard: ..}`,
//!      selection picks a random entry from the bucket.
//!   2. By number: bundled `{"0": raw, "1": raw, ..}`, selection is by index
//!      and clamps to the last level past the end.
//!   3. Custom: player-authored levels read from the `LevelStore`,
//!      selection is by exact name.
//!
//! ## Lifecycle
//!   `new` reads the custom pool synchronously and leaves the catalog
//!   `Loading`. `load` fetches both bundled documents concurrently and
//!   moves to `Ready` once both have parsed. Selecting before that is
//!   `CatalogError::NotReady`. The built-in pools never change after
//!   `load`; the custom pool is replaced wholesale by `refresh_custom`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::entity::{BoardSize, Level};
use crate::sim::codec::{self, CodecError};
use crate::store::levels::LevelStore;
use crate::store::StoreError;

const EMBEDDED_DIFFICULTY: &str = include_str!("../../levels/difficulty.json");
const EMBEDDED_SEQUENTIAL: &str = include_str!("../../levels/sequential.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("level catalog is still loading")]
    NotReady,
    #[error("level catalog is already loaded")]
    AlreadyLoaded,
    #[error("no custom level named {0:?}")]
    NotFound(String),
    #[error("{0} pool has no levels")]
    EmptyPool(String),
    #[error("reading level source {origin}: {source}")]
    Fetch {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("level source {origin} is not valid JSON: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("level source {origin}: {reason}")]
    MalformedSource { origin: String, reason: String },
    #[error("level {name:?}: {source}")]
    Codec {
        name: String,
        #[source]
        source: CodecError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ══════════════════════════════════════════════════════════════
// Public types
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Difficulty {
    Easy,
    Intermediate,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Intermediate, Difficulty::Hard];

    /// Key used in the bundled difficulty document.
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.key() == s)
            .ok_or_else(|| format!("unknown difficulty {s:?} (expected easy, intermediate or hard)"))
    }
}

/// A named raw level in one of the pools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelEntry {
    pub name: String,
    pub raw: String,
}

/// What a selection hands back: the entry name and its decoded level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedLevel {
    pub name: String,
    pub level: Level,
}

/// One selection request, whichever pool it addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Difficulty(Difficulty), // random within the bucket
    Number(usize),          // clamped to the last level
    Name(String),           // exact match in the custom pool
}

/// Where a bundled document comes from.
#[derive(Clone, Debug)]
pub enum LevelSource {
    Embedded(&'static str),
    File(PathBuf),
}

impl LevelSource {
    fn origin(&self) -> String {
        match self {
            LevelSource::Embedded(_) => "<embedded>".to_string(),
            LevelSource::File(path) => path.display().to_string(),
        }
    }

    async fn fetch(&self) -> Result<String, CatalogError> {
        match self {
            LevelSource::Embedded(text) => Ok((*text).to_string()),
            LevelSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogError::Fetch { origin: self.origin(), source }),
        }
    }
}

/// The two bundled documents the catalog loads at startup.
#[derive(Clone, Debug)]
pub struct BundledSources {
    pub difficulty: LevelSource,
    pub sequential: LevelSource,
}

impl BundledSources {
    /// The level sets compiled into the binary.
    pub fn embedded() -> Self {
        BundledSources {
            difficulty: LevelSource::Embedded(EMBEDDED_DIFFICULTY),
            sequential: LevelSource::Embedded(EMBEDDED_SEQUENTIAL),
        }
    }
}

impl Default for BundledSources {
    fn default() -> Self {
        Self::embedded()
    }
}

// ══════════════════════════════════════════════════════════════
// Catalog
// ══════════════════════════════════════════════════════════════

struct BuiltinPools {
    by_difficulty: BTreeMap<Difficulty, Vec<LevelEntry>>,
    by_number: Vec<LevelEntry>,
}

enum CatalogState {
    Loading,
    Ready(BuiltinPools),
}

pub struct LevelCatalog {
    size: BoardSize,
    levels: LevelStore,
    custom: Vec<LevelEntry>,
    state: CatalogState,
    rng: StdRng,
}

impl LevelCatalog {
    /// Enter `Loading` with the custom pool already read.
    pub fn new(levels: LevelStore, size: BoardSize) -> Result<Self, CatalogError> {
        let mut catalog = LevelCatalog {
            size,
            levels,
            custom: vec![],
            state: CatalogState::Loading,
            rng: StdRng::from_entropy(),
        };
        catalog.refresh_custom()?;
        Ok(catalog)
    }

    /// Construct and load in one step.
    pub async fn open(
        levels: LevelStore,
        size: BoardSize,
        sources: &BundledSources,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(levels, size)?;
        catalog.load(sources).await?;
        Ok(catalog)
    }

    /// Replace the random source, for reproducible difficulty picks.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Fetch both bundled documents and move to `Ready`.
    /// On failure the catalog stays `Loading`.
    pub async fn load(&mut self, sources: &BundledSources) -> Result<(), CatalogError> {
        if self.is_ready() {
            return Err(CatalogError::AlreadyLoaded);
        }

        let (by_difficulty, by_number) = tokio::try_join!(
            load_difficulty(&sources.difficulty),
            load_sequential(&sources.sequential),
        )?;

        info!(
            easy = bucket_len(&by_difficulty, Difficulty::Easy),
            intermediate = bucket_len(&by_difficulty, Difficulty::Intermediate),
            hard = bucket_len(&by_difficulty, Difficulty::Hard),
            numbered = by_number.len(),
            custom = self.custom.len(),
            "level catalog ready"
        );
        self.state = CatalogState::Ready(BuiltinPools { by_difficulty, by_number });
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, CatalogState::Ready(_))
    }

    pub fn board_size(&self) -> BoardSize {
        self.size
    }

    /// Re-read the custom pool. Call after any save/remove through the
    /// `LevelStore`; the catalog does not watch the store.
    pub fn refresh_custom(&mut self) -> Result<(), CatalogError> {
        self.custom = self
            .levels
            .list_all()?
            .into_iter()
            .map(|stored| LevelEntry { name: stored.name, raw: stored.raw })
            .collect();
        debug!(count = self.custom.len(), "custom pool refreshed");
        Ok(())
    }

    /// Names in the custom pool, in pool order.
    pub fn list_names(&self) -> Vec<&str> {
        self.custom.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn select(&mut self, selector: &Selector) -> Result<SelectedLevel, CatalogError> {
        match selector {
            Selector::Difficulty(d) => self.by_difficulty(*d),
            Selector::Number(n) => self.by_number(*n),
            Selector::Name(name) => self.by_name(name),
        }
    }

    /// Uniformly random entry from the bucket.
    pub fn by_difficulty(&mut self, difficulty: Difficulty) -> Result<SelectedLevel, CatalogError> {
        let CatalogState::Ready(pools) = &self.state else {
            return Err(CatalogError::NotReady);
        };
        let bucket = pools
            .by_difficulty
            .get(&difficulty)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| CatalogError::EmptyPool(difficulty.to_string()))?;
        let index = self.rng.gen_range(0..bucket.len());
        self.decode_entry(&bucket[index])
    }

    /// Entry `n`, or the last entry once `n` runs past the end.
    pub fn by_number(&self, n: usize) -> Result<SelectedLevel, CatalogError> {
        let pools = self.pools()?;
        let last = pools
            .by_number
            .len()
            .checked_sub(1)
            .ok_or_else(|| CatalogError::EmptyPool("numbered".to_string()))?;
        if n > last {
            debug!(requested = n, served = last, "level number past end, clamping");
        }
        self.decode_entry(&pools.by_number[n.min(last)])
    }

    pub fn by_name(&self, name: &str) -> Result<SelectedLevel, CatalogError> {
        self.pools()?;
        let entry = self
            .custom
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        self.decode_entry(entry)
    }

    /// Number of levels reachable through `by_number` without clamping.
    pub fn sequential_len(&self) -> Result<usize, CatalogError> {
        Ok(self.pools()?.by_number.len())
    }

    pub fn difficulty_len(&self, difficulty: Difficulty) -> Result<usize, CatalogError> {
        Ok(bucket_len(&self.pools()?.by_difficulty, difficulty))
    }

    fn pools(&self) -> Result<&BuiltinPools, CatalogError> {
        match &self.state {
            CatalogState::Ready(pools) => Ok(pools),
            CatalogState::Loading => Err(CatalogError::NotReady),
        }
    }

    fn decode_entry(&self, entry: &LevelEntry) -> Result<SelectedLevel, CatalogError> {
        let level = codec::decode(self.size, &entry.raw).map_err(|source| CatalogError::Codec {
            name: entry.name.clone(),
            source,
        })?;
        Ok(SelectedLevel { name: entry.name.clone(), level })
    }
}

fn bucket_len(pools: &BTreeMap<Difficulty, Vec<LevelEntry>>, difficulty: Difficulty) -> usize {
    pools.get(&difficulty).map_or(0, Vec::len)
}

// ══════════════════════════════════════════════════════════════
// Bundled document parsing
// ══════════════════════════════════════════════════════════════

async fn load_difficulty(
    source: &LevelSource,
) -> Result<BTreeMap<Difficulty, Vec<LevelEntry>>, CatalogError> {
    let text = source.fetch().await?;
    parse_difficulty(&text, &source.origin())
}

async fn load_sequential(source: &LevelSource) -> Result<Vec<LevelEntry>, CatalogError> {
    let text = source.fetch().await?;
    parse_sequential(&text, &source.origin())
}

fn parse_object(text: &str, origin: &str) -> Result<Map<String, Value>, CatalogError> {
    let value: Value = serde_json::from_str(text).map_err(|source| CatalogError::Json {
        origin: origin.to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CatalogError::MalformedSource {
            origin: origin.to_string(),
            reason: "top level is not an object".to_string(),
        }),
    }
}

/// `{name: raw, ...}` in document order.
fn entries_from(map: Map<String, Value>, origin: &str) -> Result<Vec<LevelEntry>, CatalogError> {
    map.into_iter()
        .map(|(name, value)| match value {
            Value::String(raw) => Ok(LevelEntry { name, raw }),
            _ => Err(CatalogError::MalformedSource {
                origin: origin.to_string(),
                reason: format!("level {name:?} is not a string"),
            }),
        })
        .collect()
}

fn parse_difficulty(
    text: &str,
    origin: &str,
) -> Result<BTreeMap<Difficulty, Vec<LevelEntry>>, CatalogError> {
    let mut pools = BTreeMap::new();
    for (key, bucket) in parse_object(text, origin)? {
        let Ok(difficulty) = key.parse::<Difficulty>() else {
            warn!(origin, key = %key, "ignoring unknown difficulty bucket");
            continue;
        };
        let Value::Object(levels) = bucket else {
            return Err(CatalogError::MalformedSource {
                origin: origin.to_string(),
                reason: format!("bucket {key:?} is not an object"),
            });
        };
        pools.insert(difficulty, entries_from(levels, origin)?);
    }
    Ok(pools)
}

/// Keys are level numbers; document order is level order.
fn parse_sequential(text: &str, origin: &str) -> Result<Vec<LevelEntry>, CatalogError> {
    entries_from(parse_object(text, origin)?, origin)
}
