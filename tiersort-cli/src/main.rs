mod command;
mod config;
mod output;
mod prompt;
mod shell;
mod source;

use clap::Parser;
use std::path::PathBuf;
use tiersort_core::{parse_snapshot, FileStore, ItemStore, Ranker, Tier};
use tracing_subscriber::EnvFilter;

use crate::config::{StoreKind, TiersortConfig};
use crate::source::{ListSource, RemoteSource, Source};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "tiersort", version, about = "Rank a collection into tiers by answering pairwise comparisons")]
struct Cli {
    /// Path to config file (default: ~/.config/tiersort/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where rankings are kept: "local" (a file) or "session" (memory only)
    #[arg(long, global = true)]
    store: Option<String>,

    /// Path of the local store file (default: ~/.local/share/tiersort/rankings.json)
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start an interactive ranking session
    Play(PlayArgs),
    /// Create a default config file at ~/.config/tiersort/config.toml
    Init,
    /// Print how many items each tier and topic holds
    Stats {
        /// Collection size to report against (default: config `total`, else the ranked count)
        #[arg(long)]
        total: Option<usize>,
    },
    /// Print the rankings of every tier, or of one
    List {
        /// Tier symbol (s, a, b, c, d or f)
        tier: Option<String>,
    },
    /// Write all tier lists to a JSON snapshot
    Export {
        /// Output file (default: tiersort-<unix-seconds>.json in the export directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Restore tier lists from a JSON snapshot
    Import {
        file: PathBuf,
    },
    /// Delete every stored ranking
    Clear,
}

#[derive(Parser)]
struct PlayArgs {
    /// Rank titles from a file (one per line or a JSON array) instead of the item API
    #[arg(long)]
    items: Option<PathBuf>,

    /// Base URL of the item API (default: https://xkcd.com)
    #[arg(long)]
    endpoint: Option<String>,

    /// Max retries per item fetch. Default: 3. Set to 0 to disable.
    #[arg(long)]
    retries: Option<usize>,

    /// Directory where `save` writes snapshots (default: current directory)
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Open the store chosen by CLI args, then config, then the local default.
fn open_store(kind: Option<&str>, path: Option<PathBuf>, cfg: &TiersortConfig) -> ItemStore {
    let kind = match kind.or(cfg.store.as_deref()) {
        None => StoreKind::Local,
        Some(name) => StoreKind::parse(name)
            .unwrap_or_else(|| bail(format!("Unknown store \"{name}\". Use \"local\" or \"session\"."))),
    };

    match kind {
        StoreKind::Session => ItemStore::in_memory(),
        StoreKind::Local => {
            let path = path
                .or_else(|| cfg.store_path.as_deref().map(config::expand_path))
                .unwrap_or_else(config::default_store_path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
            }
            let backend = FileStore::open(&path).unwrap_or_else(|e| bail(e));
            tracing::debug!("Using store at {}", backend.path().display());
            ItemStore::new(backend)
        }
    }
}

fn export_dir(cli_value: Option<PathBuf>, cfg: &TiersortConfig) -> PathBuf {
    cli_value
        .or_else(|| cfg.export_dir.as_deref().map(config::expand_path))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() {
    let Cli {
        config: config_arg,
        store: store_kind,
        store_path,
        verbose,
        command,
    } = Cli::parse();
    init_logging(verbose);

    // Load config file, merge with CLI args (CLI wins)
    let config_path = config_arg.unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);
    let open = || open_store(store_kind.as_deref(), store_path.clone(), &cfg);

    match command {
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default store, endpoint, etc.");
        }
        Commands::Play(args) => run_play(args, open(), &cfg).await,
        Commands::Stats { total } => {
            let mut ranker = Ranker::new(open(), 0);
            let total = total
                .or(cfg.total)
                .unwrap_or_else(|| ranker.stats().ranked.len());
            ranker.set_total_expected(total);
            output::print_lines(&ranker.stats().summary());
        }
        Commands::List { tier } => {
            let tier: Option<Tier> = tier.map(|symbol| symbol.parse().unwrap_or_else(|e| bail(e)));
            let stats = Ranker::new(open(), 0).stats();
            output::print_lines(&output::format_list(&stats, tier));
        }
        Commands::Export { out } => {
            let snapshot = open().export_snapshot();
            let path = match out {
                Some(path) => output::write_snapshot(&snapshot, &path).map(|()| path),
                None => output::write_snapshot_to_dir(&snapshot, &export_dir(None, &cfg)),
            }
            .unwrap_or_else(|e| bail(e));
            println!("Wrote {}", path.display());
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .unwrap_or_else(|e| bail(format!("Failed to read {}: {e}", file.display())));
            let (snapshot, skipped) = parse_snapshot(&json).unwrap_or_else(|e| bail(e));
            let mut ranker = Ranker::new(open(), 0);
            let written = ranker.import_snapshot(snapshot).unwrap_or_else(|e| bail(e));
            println!("Restored {written} entries from {}", file.display());
            if skipped > 0 {
                println!("Skipped {skipped} unreadable entries");
            }
        }
        Commands::Clear => {
            let mut ranker = Ranker::new(open(), 0);
            let stats = ranker.clear_all().unwrap_or_else(|e| bail(e));
            println!("Cleared all rankings ({} items left)", stats.ranked.len());
        }
    }
}

async fn run_play(args: PlayArgs, store: ItemStore, cfg: &TiersortConfig) {
    let items_path = args.items.clone().or_else(|| cfg.items.as_deref().map(config::expand_path));

    let source = match items_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
            let titles = source::parse_titles(&content).unwrap_or_else(|e| bail(e));
            if titles.is_empty() {
                bail(format!("No items found in {}", path.display()));
            }
            Source::List(ListSource::new(titles))
        }
        None => {
            let endpoint = args
                .endpoint
                .clone()
                .or_else(|| cfg.endpoint.clone())
                .unwrap_or_else(|| source::DEFAULT_ENDPOINT.to_string());
            let retries = args.retries.or(cfg.retries).unwrap_or(3);
            let remote = RemoteSource::connect(&endpoint, retries)
                .await
                .unwrap_or_else(|e| bail(e));
            Source::Remote(remote)
        }
    };

    let total = source.latest() as usize;
    tracing::debug!("Ranking a collection of {total} items");
    let ranker = Ranker::new(store, total);
    let mut shell = shell::Shell::new(ranker, source, export_dir(args.export_dir, cfg));
    shell
        .run()
        .await
        .unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")));
}
