use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scrape::types::ObservationBatch;

/// One restaurant row of the published shape, shared by the HTTP response
/// and the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantRow {
    pub name: String,
    pub city: String,
    pub address: String,
    pub store_id: u32,
    pub parties_in_line: Option<u32>,
}

/// Published shape of one run: HTTP success body and snapshot file contents.
#[derive(Debug, Serialize, Deserialize)]
pub struct WaitlistSnapshot {
    pub success: bool,
    pub last_updated: DateTime<Utc>,
    pub scrape_duration_seconds: f64,
    pub restaurants: Vec<RestaurantRow>,
}

impl WaitlistSnapshot {
    pub fn from_batch(batch: &ObservationBatch) -> Self {
        let restaurants = batch
            .observations
            .iter()
            .map(|obs| RestaurantRow {
                name: obs.target.name(),
                city: obs.target.city.clone(),
                address: obs.target.address.clone(),
                store_id: obs.target.store_id,
                parties_in_line: obs.parties_in_line,
            })
            .collect();
        WaitlistSnapshot {
            success: true,
            last_updated: batch.started_at,
            scrape_duration_seconds: batch.duration_seconds,
            restaurants,
        }
    }
}

/// Overwrite the snapshot file with this run's result. Last run wins, no
/// history is kept.
pub fn write(path: &Path, snapshot: &WaitlistSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json).with_context(|| format!("write snapshot {}", path.display()))?;
    Ok(())
}
