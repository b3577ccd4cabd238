//! copy-to-play: publish curated puzzles.
//!
//! Copies approved puzzles with a playable line from the build collection
//! (`puzzle2`) into the play collection (`puzzle2_puzzle`), seeding each with
//! an initial Glicko rating and zeroed counters. Running it again only adds
//! puzzles that are not in the play collection yet.
//!
//! With no subcommand the copy pass runs against the configured database (see
//! [`config`] for the environment variables).

mod config;
mod migrate;
mod persistence;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use puzzle::PuzzleId;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use persistence::sqlite::{
    import_build_documents, Database, SqlitePlayRepository, SqliteSourceRepository,
};

#[derive(Parser)]
#[command(name = "copy-to-play", about = "Copy curated puzzles into the play collection")]
struct Cli {
    /// Directory holding the puzzle database. Overrides PUZZLER_DATA_DIR.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Database file. Overrides PUZZLER_DB_PATH and --data-dir.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Build puzzles fetched per query. Overrides PUZZLER_PAGE_SIZE.
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: Option<u32>,

    /// Also write daily rolling log files here. Overrides PUZZLER_LOG_DIR.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy eligible build puzzles into the play collection (default).
    Copy,
    /// Load a newline-delimited JSON export into the build collection.
    Import {
        /// One JSON document per line, each with an `_id`.
        file: PathBuf,
    },
    /// Print document counts for both collections.
    Stats,
    /// Print one play puzzle as JSON.
    Show {
        id: String,
    },
    /// Write the play collection as newline-delimited JSON.
    Export {
        /// Output file; stdout when omitted.
        file: Option<PathBuf>,
    },
}

fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "copy-to-play");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().or_else(config::get_log_dir);
    let _guard = init_tracing(log_dir.as_deref())?;

    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db_path = match cli.db {
        Some(path) => path,
        None => {
            let data_dir = cli.data_dir.unwrap_or_else(config::get_data_dir);
            config::get_db_path(&data_dir)
        }
    };

    tracing::info!(db = %db_path.display(), "Opening puzzle database");
    let db = Database::open(&db_path)
        .await
        .with_context(|| format!("opening database {}", db_path.display()))?;

    match cli.command.unwrap_or(Commands::Copy) {
        Commands::Copy => {
            let page_size = match cli.page_size {
                Some(n) => n,
                None => config::get_page_size()?,
            };
            let source = SqliteSourceRepository::new(db.pool().clone());
            let play = SqlitePlayRepository::new(db.pool().clone());
            let report = migrate::copy_to_play(&source, &play, page_size).await?;
            println!(
                "scanned {}, copied {}, ineligible {}, malformed {}, already present {}, failed {}",
                report.scanned,
                report.copied,
                report.ineligible,
                report.malformed,
                report.duplicates,
                report.failed
            );
        }
        Commands::Import { file } => {
            let report = import_build_documents(db.pool(), &file)
                .await
                .with_context(|| format!("importing {}", file.display()))?;
            println!("imported {} build documents", report.documents);
        }
        Commands::Stats => {
            let build = SqliteSourceRepository::new(db.pool().clone()).count().await?;
            let play = SqlitePlayRepository::new(db.pool().clone()).count().await?;
            println!("puzzle2: {build}");
            println!("puzzle2_puzzle: {play}");
        }
        Commands::Show { id } => {
            let play = SqlitePlayRepository::new(db.pool().clone());
            match play.load_puzzle(&PuzzleId::new(id.clone())).await? {
                Some(puzzle) => println!("{}", serde_json::to_string_pretty(&puzzle)?),
                None => anyhow::bail!("puzzle {id} is not in the play collection"),
            }
        }
        Commands::Export { file } => {
            let play = SqlitePlayRepository::new(db.pool().clone());
            let puzzles = play.list_puzzles().await?;
            let mut out: Box<dyn Write> = match &file {
                Some(path) => Box::new(std::io::BufWriter::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?,
                )),
                None => Box::new(std::io::stdout().lock()),
            };
            for puzzle in &puzzles {
                serde_json::to_writer(&mut out, puzzle)?;
                writeln!(out)?;
            }
            out.flush()?;
            tracing::info!(puzzles = puzzles.len(), "Exported play collection");
        }
    }

    db.pool().close().await;
    Ok(())
}
