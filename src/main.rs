//! Entry point: terminal front end for the level catalog and stores.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sokoban::config::GameConfig;
use sokoban::domain::rules;
use sokoban::sim::level::{Difficulty, LevelCatalog, Selector};
use sokoban::sim::save::{CustomSave, SequentialSave};
use sokoban::store::file::FileStore;
use sokoban::store::levels::LevelStore;
use sokoban::store::progress::{ProgressStore, SaveKind};
use sokoban::store::KeyValueStore;
use sokoban::ui::preview;

#[derive(Parser, Debug)]
#[command(name = "sokoban", about = "Browse, import and inspect Sokoban levels")]
struct Cli {
    /// Config file to use instead of searching for `config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List custom level names.
    List,
    /// Draw a level from one of the pools.
    Show(ShowArgs),
    /// Validate a raw level file and store it as a custom level.
    Import { name: String, file: PathBuf },
    /// Delete a custom level.
    Remove { name: String },
    /// List stored game progress.
    Saves,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ShowArgs {
    #[arg(long)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    number: Option<usize>,
    #[arg(long)]
    name: Option<String>,
}

impl ShowArgs {
    fn selector(self) -> Option<Selector> {
        self.difficulty
            .map(Selector::Difficulty)
            .or(self.number.map(Selector::Number))
            .or(self.name.map(Selector::Name))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let config = match &cli.config {
        Some(path) => GameConfig::load_from(path),
        None => GameConfig::load(),
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.storage_dir)
            .with_context(|| format!("opening store in {}", config.storage_dir.display()))?,
    );
    let levels = LevelStore::new(store.clone());

    match cli.command {
        Command::List => {
            let catalog = LevelCatalog::new(levels, config.board)?;
            let names = catalog.list_names();
            if names.is_empty() {
                println!("No custom levels.");
            }
            for name in names {
                println!("{name}");
            }
        }
        Command::Show(args) => {
            let Some(selector) = args.selector() else {
                bail!("choose one of --difficulty, --number or --name");
            };
            let mut catalog =
                LevelCatalog::open(levels, config.board, &config.bundled_sources()).await?;
            let selected = catalog.select(&selector)?;
            println!("{}", selected.name);
            preview::render(&mut io::stdout(), config.board, &selected.level)?;
            let remaining = rules::boxes_remaining(&selected.level);
            if rules::is_solved(&selected.level) {
                println!("Solved.");
            } else {
                println!("{remaining} box(es) left to place.");
            }
        }
        Command::Import { name, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let raw: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            rules::validate(config.board, &raw)
                .with_context(|| format!("{} is not a valid level", file.display()))?;

            let mut catalog = LevelCatalog::new(levels.clone(), config.board)?;
            levels.save(&name, &raw)?;
            catalog.refresh_custom()?;
            println!("Saved {name:?} ({} custom levels).", catalog.list_names().len());
        }
        Command::Remove { name } => {
            levels.remove(&name)?;
            println!("Removed {name:?}.");
        }
        Command::Saves => {
            let progress = ProgressStore::new(store);
            print_saves(&progress)?;
        }
    }

    Ok(())
}

fn print_saves(progress: &ProgressStore) -> Result<()> {
    println!("Sequential saves:");
    for stored in progress.list_all(SaveKind::Sequential)? {
        match stored.parse::<SequentialSave>() {
            Ok(save) => println!(
                "  {:<16} level {:>3}  score {:>6}  moves {}",
                stored.name,
                save.current_level,
                save.score,
                save.core.moves_made.len()
            ),
            Err(e) => println!("  {:<16} unreadable: {e}", stored.name),
        }
    }

    println!("Custom saves:");
    for stored in progress.list_all(SaveKind::Custom)? {
        match stored.parse::<CustomSave>() {
            Ok(save) => println!(
                "  {:<16} level {:?}  moves {}",
                stored.name,
                save.level_name,
                save.core.moves_made.len()
            ),
            Err(e) => println!("  {:<16} unreadable: {e}", stored.name),
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
