use anyhow::Result;
use clap::{Args, Subcommand};

use crate::scrape::types::Target;

/// waitline targets ls
#[derive(Args)]
pub struct TargetsCmd {
    #[command(subcommand)]
    pub cmd: TargetsSub,
}

#[derive(Subcommand)]
pub enum TargetsSub {
    // list configured targets (no network)
    Ls,
}

pub fn run(targets: &[Target], args: TargetsCmd) -> Result<()> {
    match args.cmd {
        TargetsSub::Ls => {
            println!("📍 Targets:");
            for t in targets {
                println!("[{}] {} ({})", t.store_id, t.name(), t.address);
            }
        }
    }
    Ok(())
}
