use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::scrape::types::Target;

/// Default config file looked for in the working directory.
const TARGETS_FILE: &str = "targets.json";

/// Resolve the target list: explicit --targets path, then WAITLINE_TARGETS,
/// then ./targets.json if present, then the built-in locations. An explicit
/// file that is missing, malformed, or empty is a startup error rather than
/// a silent fallback.
pub fn load_targets(flag: Option<&Path>) -> Result<Vec<Target>> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| env::var("WAITLINE_TARGETS").ok().map(PathBuf::from))
        .or_else(|| {
            let default = Path::new(TARGETS_FILE);
            default.exists().then(|| default.to_path_buf())
        });

    match path {
        Some(path) => read_targets_file(&path),
        None => Ok(default_targets()),
    }
}

fn read_targets_file(path: &Path) -> Result<Vec<Target>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read targets file {}", path.display()))?;
    let targets: Vec<Target> = serde_json::from_str(&raw)
        .with_context(|| format!("parse targets file {}", path.display()))?;
    if targets.is_empty() {
        bail!("targets file {} lists no targets", path.display());
    }
    Ok(targets)
}

/// The known Big Way locations, used when no config file is found.
pub fn default_targets() -> Vec<Target> {
    let locations = [
        (2979, "Burnaby", "#7-4300 Kingsway, Burnaby, BC V5H 1Z8"),
        (7289, "Kingsway", "4250 Kingsway #5, Burnaby, BC V5H 4V6"),
        (8273, "Richmond", "4940 Number 3 Rd #123, Richmond, BC V6X 3A5"),
        (9043, "Robson", "778 Robson St, Vancouver, BC V6Z 1N4"),
        (9371, "Kerrisdale", "2145 W 41st Ave, Vancouver, BC V6M 1Z6"),
        (2863, "Ackroyd", "8100 Ackroyd Rd Unit 175, Richmond, BC V6X 3K2"),
        (
            7862,
            "New Westminster",
            "800 Carnarvon St #344 (3rd Floor New Westminster Station), New Westminster, BC V3M 0G3",
        ),
        (4561, "West End", "1479 Robson St, Vancouver, BC V6G 1C1"),
        (5065, "Coquitlam", "2929 Barnet Hwy Unit 2660, Coquitlam, BC V3B 5R5"),
        (2980, "UBC", "2155 Allison Rd #222, Vancouver, BC V6T 1T5"),
        (5540, "Langley", "20202 66 Ave #130, Langley Twp, BC V2Y 1P3"),
    ];
    locations
        .into_iter()
        .map(|(store_id, city, address)| Target {
            store_id,
            city: city.to_string(),
            address: address.to_string(),
        })
        .collect()
}
