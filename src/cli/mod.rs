//! Command-line interface for feedstore.
//!
//! Two entry points: `ingest` runs one export through the ingestion engine,
//! `status` renders a read-only summary of the store and its bookkeeping.
//! Invoking with no arguments prints usage and exits non-zero.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::ingest;
use crate::store::{DocumentStore, Stats, VisitedLedger, WorkQueue};

/// feedstore - crawl-export ingestion into a normalized document store
#[derive(Parser, Debug)]
#[command(name = "feedstore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest one crawl export file into the document store
    Ingest {
        /// Path to the export file (e.g. output/topic_123_<timestamp>/result.json)
        export: PathBuf,

        /// Store root directory (overrides env/config resolution)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Show a read-only summary of store contents and bookkeeping
    Status {
        /// Store root directory (overrides env/config resolution)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Ingest { export, data_dir } => run_ingest(&export, data_dir).await,
            Commands::Status { data_dir } => show_status(data_dir).await,
        }
    }
}

fn open_store(data_dir: Option<PathBuf>) -> Result<DocumentStore> {
    match data_dir {
        Some(dir) => Ok(DocumentStore::new(dir)),
        None => DocumentStore::open_default(),
    }
}

/// Run ingestion and print the per-run / total summary
async fn run_ingest(export: &Path, data_dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(data_dir)?;
    let summary = ingest::ingest_export(&store, export).await?;

    let stats = Stats::load(&store.stats_path()).await?;
    let queue_count = WorkQueue::new(store.queue_path()).count().await?;
    let ledger = VisitedLedger::load(store.visited_path()).await?;

    println!();
    println!("{}", "=".repeat(50));
    println!("Ingest complete");
    println!("{}", "=".repeat(50));
    println!();
    println!("This run ({} items read):", summary.items_read);
    println!("  questions: {}", summary.new_questions);
    println!("  answers:   {}", summary.new_answers);
    println!("  articles:  {}", summary.new_articles);
    println!("  authors:   {}", summary.new_authors);
    println!();
    println!("Store totals:");
    println!("  questions: {}", stats.questions);
    println!("  answers:   {}", stats.answers);
    println!("  articles:  {}", stats.articles);
    println!("  authors:   {}", stats.authors);
    println!();
    println!("Pending queue: {} records", queue_count);
    println!("Visited: {} keys", ledger.len());

    Ok(())
}

/// Read-only status report. Tolerates a completely uninitialized store.
async fn show_status(data_dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(data_dir)?;

    let stats = Stats::load(&store.stats_path()).await?;
    let records = WorkQueue::new(store.queue_path()).load().await?;
    let ledger = VisitedLedger::load(store.visited_path()).await?;

    println!();
    println!("{}", "=".repeat(60));
    println!("Store status ({})", store.root().display());
    println!("{}", "=".repeat(60));
    println!("Questions: {}", stats.questions);
    println!("Answers:   {}", stats.answers);
    println!("Articles:  {}", stats.articles);
    println!("Authors:   {}", stats.authors);

    if let Some(updated) = stats.last_updated {
        println!();
        println!("Last updated: {}", updated);
    }
    if !stats.sources.is_empty() {
        println!();
        println!("Sources merged:");
        for source in &stats.sources {
            println!("  {}", source);
        }
    }

    println!();
    println!("Pending queue: {} records", records.len());
    if !records.is_empty() {
        let mut by_source: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &records {
            *by_source.entry(record.source.as_str()).or_default() += 1;
        }
        println!("Queue by source:");
        for (source, count) in by_source {
            println!("  {}: {}", source, count);
        }
    }

    println!("Visited: {} keys", ledger.len());
    println!();

    Ok(())
}
