// ABOUTME: Entry point for the packd operator CLI.
// ABOUTME: Restores a snapshot and re-emits both persisted formats into a target directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use packd_core::{NamedStore, UnnamedStore};
use packd_store::{LogStrategy, PersistenceGateway};

/// Restore a packd snapshot and write it back out as both persisted formats.
#[derive(Debug, Parser)]
#[command(name = "packd")]
struct Cli {
    /// Snapshot document to restore.
    snapshot: PathBuf,

    /// Directory the .log and .json outputs are written into.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Write the log report one line at a time instead of in one shot.
    #[arg(long)]
    append: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "packd=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let strategy = if cli.append {
        LogStrategy::Append
    } else {
        LogStrategy::Atomic
    };
    let gateway = PersistenceGateway::new(strategy);

    let mut named = NamedStore::new();
    let mut unnamed = UnnamedStore::new();

    let elapsed = gateway
        .load_json(&cli.snapshot, &mut named, &mut unnamed)
        .with_context(|| format!("loading {}", cli.snapshot.display()))?;
    tracing::info!(
        "restored {} named entries and {} packets in {:?}",
        named.len(),
        unnamed.len(),
        elapsed
    );

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating {}", cli.out.display()))?;
    gateway
        .save_json(&cli.out, &named, &unnamed)
        .context("saving snapshot")?;
    gateway
        .save_log(&cli.out, &named, &unnamed)
        .context("saving log report")?;

    Ok(())
}
