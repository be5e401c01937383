use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod config;
mod scrape;
mod server;
mod snapshot;
mod targets;
mod telemetry;

#[derive(Parser)]
#[command(name = "waitline", about = "Big Way waitlist watcher")]
struct Cli {
    /// Path to a JSON target list; falls back to WAITLINE_TARGETS,
    /// ./targets.json, then the built-in locations
    #[arg(global = true, long)]
    targets: Option<PathBuf>,
    /// Emit JSON to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve(server::ServeCmd),
    Scrape(scrape::ScrapeCmd),
    Targets(targets::TargetsCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    // initialize logging/tracing (stderr). Respect RUST_LOG and WAITLINE_LOG_FORMAT
    telemetry::config::init_tracing();

    let target_list = config::load_targets(cli.targets.as_deref())?;

    match cli.command {
        Commands::Serve(args) => server::run(target_list, args).await?,
        Commands::Scrape(args) => scrape::run(target_list, cli.json, args).await?,
        Commands::Targets(args) => targets::run(&target_list, args)?,
    }

    Ok(())
}
