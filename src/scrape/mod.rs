use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::snapshot::{self, WaitlistSnapshot};

pub mod extract;
pub mod fetch;
pub mod orchestrator;
pub mod types;

use fetch::HttpLineSource;
use types::Target;

/// waitline scrape (one-shot run against the live site)
#[derive(clap::Args)]
pub struct ScrapeCmd {
    #[arg(long, default_value_t = orchestrator::DEFAULT_CONCURRENCY)]
    concurrency: usize,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Also write the snapshot file here
    #[arg(long)]
    out: Option<PathBuf>,
}

pub async fn run(targets: Vec<Target>, json_mode: bool, args: ScrapeCmd) -> Result<()> {
    let source = HttpLineSource::new(Duration::from_secs(args.timeout_secs))
        .context("build HTTP client")?;

    let batch = orchestrator::run_batch(&source, &targets, args.concurrency).await;
    let snap = WaitlistSnapshot::from_batch(&batch);

    if let Some(out) = &args.out {
        snapshot::write(out, &snap)?;
    }

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&snap)?);
        return Ok(());
    }

    println!("Current waitlist ({:.1}s):", snap.scrape_duration_seconds);
    for row in &snap.restaurants {
        match row.parties_in_line {
            Some(n) => println!("{} - {} parties ({})", row.name, n, row.address),
            None => println!("{} - unavailable ({})", row.name, row.address),
        }
    }
    Ok(())
}
