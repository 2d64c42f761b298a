//! SkipKV CLI
//!
//! Operates on a snapshot file: load it, run one command, save it back if
//! the command changed anything.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use skipkv::config::DEFAULT_SNAPSHOT_PATH;
use skipkv::{Config, LoadPolicy, Result, SkipListIndex};
use tracing_subscriber::{fmt, EnvFilter};

/// SkipKV CLI
#[derive(Parser, Debug)]
#[command(name = "skipkv-cli")]
#[command(about = "Ordered key-value index backed by a skip list snapshot")]
#[command(version)]
struct Args {
    /// Snapshot file
    #[arg(short, long, default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,

    /// Maximum skip list height
    #[arg(short, long, default_value = "32")]
    max_level: usize,

    /// Skip malformed snapshot lines instead of failing
    #[arg(long)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert or update a key
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print every pair in key order
    List,

    /// Print the number of keys
    Size,

    /// Print each skip list level
    Levels,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,skipkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let policy = if args.lenient {
        LoadPolicy::Lenient
    } else {
        LoadPolicy::Strict
    };

    let config = Config::builder()
        .max_level(args.max_level)
        .snapshot_path(&args.snapshot)
        .load_policy(policy)
        .build();

    let index: SkipListIndex<String, String> = SkipListIndex::open(config)?;

    match args.command {
        Commands::Put { key, value } => {
            index.insert(key, value);
            index.persist()?;
        }
        Commands::Get { key } => match index.search(&key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("(not found)");
                process::exit(2);
            }
        },
        Commands::Del { key } => {
            if index.delete(&key) {
                index.persist()?;
                println!("deleted");
            } else {
                println!("(not found)");
            }
        }
        Commands::List => {
            for (key, value) in index.entries() {
                println!("{}:{}", key, value);
            }
        }
        Commands::Size => println!("{}", index.size()),
        Commands::Levels => print!("{}", index.display_levels()),
    }

    Ok(())
}
