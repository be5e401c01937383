use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::warn;

use super::extract;
use super::fetch::LineSource;
use super::types::{Observation, ObservationBatch, Target};

/// Upper bound on simultaneous retrievals. Matches the current target count
/// so the common case runs fully parallel; tune freely.
pub const DEFAULT_CONCURRENCY: usize = 11;

fn effective_limit(requested: usize, targets: usize) -> usize {
    requested.max(1).min(targets.max(1))
}

/// Run one full scrape: one retrieval+extraction task per target, at most
/// `concurrency` in flight at once.
///
/// Per-target failures are data (`parties_in_line: None`), never errors:
/// every submitted target yields exactly one observation and no target can
/// abort or delay its siblings. The returned batch is sorted by city, so the
/// output order is independent of completion order.
pub async fn run_batch(
    source: &dyn LineSource,
    targets: &[Target],
    concurrency: usize,
) -> ObservationBatch {
    let started_at = Utc::now();
    let clock = Instant::now();

    let mut observations: Vec<Observation> = stream::iter(targets.iter().cloned())
        .map(|target| observe_one(source, target))
        .buffer_unordered(effective_limit(concurrency, targets.len()))
        .collect()
        .await;

    observations.sort_by(|a, b| a.target.city.cmp(&b.target.city));

    ObservationBatch {
        started_at,
        duration_seconds: clock.elapsed().as_secs_f64(),
        observations,
    }
}

async fn observe_one(source: &dyn LineSource, target: Target) -> Observation {
    let parties_in_line = match source.fetch_line_text(&target).await {
        Ok(text) => {
            let extraction = extract::parse_line_count(&text);
            if extraction.ambiguous {
                warn!(
                    store_id = target.store_id,
                    city = %target.city,
                    text = %text,
                    "no party count in line text, assuming 0"
                );
            }
            Some(extraction.parties)
        }
        Err(err) => {
            warn!(
                store_id = target.store_id,
                city = %target.city,
                error = %err,
                "failed to retrieve line status"
            );
            None
        }
    };
    Observation {
        target,
        parties_in_line,
        observed_at: Utc::now(),
    }
}
