use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fixed location to poll. The list is configuration (see crate::config);
/// nothing in the scrape path ever mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub store_id: u32,
    pub city: String,
    pub address: String,
}

impl Target {
    pub fn name(&self) -> String {
        format!("Big Way {}", self.city)
    }
}

/// Per-target result of one polling run.
/// `parties_in_line` is `None` on retrieval failure; `Some(0)` means nobody
/// is waiting. The two must never be conflated.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub target: Target,
    pub parties_in_line: Option<u32>,
    pub observed_at: DateTime<Utc>,
}

/// Complete result of one orchestration run. Observations are sorted by
/// city ascending, independent of task completion order.
#[derive(Debug, Serialize)]
pub struct ObservationBatch {
    pub started_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub observations: Vec<Observation>,
}
