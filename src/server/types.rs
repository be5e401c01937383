use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::snapshot::RestaurantRow;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub total_restaurants: usize,
}

/// 500 body for a run that could not complete at the batch level.
/// Per-target failures never land here; they ride along as null counts in a
/// successful response.
#[derive(Serialize)]
pub struct RunFailure {
    pub success: bool,
    pub error: String,
    pub restaurants: Vec<RestaurantRow>,
}

impl RunFailure {
    pub fn new(error: String) -> Self {
        RunFailure { success: false, error, restaurants: Vec::new() }
    }
}
