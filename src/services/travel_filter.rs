//! Travel-time feasibility filter
//!
//! The only stage that rejects items. For each candidate the mode tiers
//! are checked in strict order — walk, then transit, then drive — against
//! the bucket's travel ceiling; the first feasible mode decides the
//! travel-tier fitness (20/15/10) and the chosen travel time. An item no
//! mode can reach in time is dropped for good.

use std::sync::Arc;

use tokio::time::{timeout_at, Instant};

use crate::{
    config::{KeywordDistanceTable, PipelineConfig},
    models::{ActivityItem, Context, Preferences, TravelTimes},
    services::travel_time::{ResolvedTravel, TravelTimeResolver},
};

pub struct TravelFilterOutcome {
    pub items: Vec<ActivityItem>,
    pub provider_errors: usize,
    pub rejected: usize,
}

pub struct TravelTimeFilter {
    resolver: Arc<TravelTimeResolver>,
}

impl TravelTimeFilter {
    pub fn new(resolver: Arc<TravelTimeResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve travel times for every item in paced batches and keep the
    /// feasible ones, in input order. Items whose resolution misses the
    /// stage deadline fall back to the fixed default estimates — the
    /// stage never fails as a whole.
    pub async fn filter(
        &self,
        items: Vec<ActivityItem>,
        prefs: &Preferences,
        ctx: &Context,
        config: &PipelineConfig,
    ) -> TravelFilterOutcome {
        let total = items.len();
        let (_, max_travel) = prefs.time_bucket.travel_window_minutes();
        let deadline = Instant::now() + config.travel_stage_timeout;

        let mut kept = Vec::new();
        let mut provider_errors = 0;
        let mut remaining = items;

        while !remaining.is_empty() {
            let take = config.travel_batch_size.min(remaining.len());
            let batch: Vec<ActivityItem> = remaining.drain(..take).collect();

            let mut tasks = Vec::new();
            for item in batch {
                let resolver = Arc::clone(&self.resolver);
                let ctx = ctx.clone();
                tasks.push(tokio::spawn(async move {
                    let resolved = match timeout_at(
                        deadline,
                        resolver.resolve(&ctx, &item.name, item.coords),
                    )
                    .await
                    {
                        Ok(resolved) => resolved,
                        // Deadline hit: this item's calls count as failed
                        // and the fixed defaults stand in
                        Err(_) => ResolvedTravel {
                            times: KeywordDistanceTable::unknown_estimate(),
                            provider_errors: 1,
                        },
                    };
                    (item, resolved)
                }));
            }

            for task in tasks {
                match task.await {
                    Ok((item, resolved)) => {
                        provider_errors += resolved.provider_errors;
                        let name = item.name.clone();
                        match admit(item, resolved.times, max_travel) {
                            Some(item) => kept.push(item),
                            None => {
                                tracing::debug!(
                                    place = %name,
                                    max_travel,
                                    "Rejected: no mode within the travel ceiling"
                                );
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Travel filter task join error");
                    }
                }
            }

            if !remaining.is_empty() {
                tokio::time::sleep(config.travel_batch_pause).await;
            }
        }

        tracing::info!(
            stage = "travel_filter",
            items_in = total,
            items_out = kept.len(),
            rejected = total - kept.len(),
            provider_errors,
            "Travel-time filtering completed"
        );

        TravelFilterOutcome {
            rejected: total - kept.len(),
            items: kept,
            provider_errors,
        }
    }
}

/// The per-item state machine; first feasible mode wins
fn admit(mut item: ActivityItem, times: TravelTimes, max_travel: u32) -> Option<ActivityItem> {
    let (fitness, chosen) = if times.walk_min <= max_travel {
        (20.0, times.walk_min)
    } else if times.transit_min <= max_travel {
        (15.0, times.transit_min)
    } else if times.drive_min <= max_travel {
        (10.0, times.drive_min)
    } else {
        return None;
    };

    item.travel_time_min = Some(chosen);
    if item.distance_meters.is_none() && times.distance_meters > 0 {
        item.distance_meters = Some(times.distance_meters);
    }
    item.travel = Some(times);
    item.time_fitness_score = Some(fitness);
    Some(item)
}
