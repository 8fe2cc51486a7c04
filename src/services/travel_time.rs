//! Tiered multi-modal travel-time resolution
//!
//! Precise routing APIs may be unavailable or rate-limited, so estimates
//! degrade through a cascade: precision routing → simpler directions →
//! name-keyword distance table → fixed unknown-distance defaults. The
//! pipeline never blocks or fails just because travel time is unknown.

use std::sync::Arc;

use tokio::time::timeout;

use crate::{
    config::{KeywordDistanceTable, PipelineConfig},
    error::AppResult,
    geo,
    models::{Context, Coordinates, TravelTimes},
    services::providers::{RouteEndpoint, RouteLeg, RoutingProvider, TravelMode},
};

/// Cascade outcome: the estimates plus how many provider calls failed on
/// the way there (reported in pipeline metadata).
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTravel {
    pub times: TravelTimes,
    pub provider_errors: usize,
}

pub struct TravelTimeResolver {
    /// Routing tiers in priority order; the first tier that answers wins
    tiers: Vec<Arc<dyn RoutingProvider>>,
    keyword_distances: KeywordDistanceTable,
    routing_timeout: std::time::Duration,
}

impl TravelTimeResolver {
    pub fn new(tiers: Vec<Arc<dyn RoutingProvider>>, config: &PipelineConfig) -> Self {
        Self {
            tiers,
            keyword_distances: config.keyword_distances.clone(),
            routing_timeout: config.routing_timeout,
        }
    }

    /// Resolve walk/drive/transit minutes and distance for one destination.
    /// Total over its input: always returns an estimate.
    pub async fn resolve(
        &self,
        ctx: &Context,
        destination_name: &str,
        destination_coords: Option<Coordinates>,
    ) -> ResolvedTravel {
        let baseline = self.baseline(ctx, destination_name, destination_coords);
        let (origin, destination) = endpoints(ctx, destination_name, destination_coords);

        let mut provider_errors = 0;
        for tier in &self.tiers {
            match self
                .try_tier(tier.as_ref(), &origin, &destination, baseline)
                .await
            {
                Ok(times) => {
                    tracing::debug!(
                        provider = tier.name(),
                        destination = %destination_name,
                        walk_min = times.walk_min,
                        "Travel times resolved"
                    );
                    return ResolvedTravel {
                        times,
                        provider_errors,
                    };
                }
                Err(tier_errors) => {
                    provider_errors += tier_errors;
                    tracing::debug!(
                        provider = tier.name(),
                        destination = %destination_name,
                        "Routing tier failed, trying next"
                    );
                }
            }
        }

        ResolvedTravel {
            times: baseline,
            provider_errors,
        }
    }

    /// One routing tier: all three modes in parallel, each with its own
    /// timeout. A tier succeeds if at least one mode resolves; modes it
    /// could not answer keep the baseline estimate.
    async fn try_tier(
        &self,
        provider: &dyn RoutingProvider,
        origin: &RouteEndpoint,
        destination: &RouteEndpoint,
        baseline: TravelTimes,
    ) -> Result<TravelTimes, usize> {
        let (walk, drive, transit) = tokio::join!(
            timeout(
                self.routing_timeout,
                provider.route(origin, destination, TravelMode::Walk)
            ),
            timeout(
                self.routing_timeout,
                provider.route(origin, destination, TravelMode::Drive)
            ),
            timeout(
                self.routing_timeout,
                provider.route(origin, destination, TravelMode::Transit)
            ),
        );

        let mut errors = 0;
        let mut settle = |leg: Result<AppResult<RouteLeg>, _>| match leg {
            Ok(Ok(leg)) => Some(leg),
            _ => {
                errors += 1;
                None
            }
        };

        let walk = settle(walk);
        let drive = settle(drive);
        let transit = settle(transit);

        if walk.is_none() && drive.is_none() && transit.is_none() {
            return Err(errors);
        }

        let distance = [walk, drive, transit]
            .iter()
            .flatten()
            .map(|leg| leg.distance_meters)
            .find(|d| *d > 0)
            .unwrap_or(baseline.distance_meters);

        Ok(TravelTimes {
            walk_min: walk.map_or(baseline.walk_min, |leg| leg.duration_min),
            drive_min: drive.map_or(baseline.drive_min, |leg| leg.duration_min),
            transit_min: transit.map_or(baseline.transit_min, |leg| leg.duration_min),
            distance_meters: distance,
        })
    }

    /// The estimate used when no routing tier answers, and the seed for
    /// modes a tier leaves unanswered. Coordinates beat name keywords
    /// beat the fixed unknown default.
    fn baseline(
        &self,
        ctx: &Context,
        destination_name: &str,
        destination_coords: Option<Coordinates>,
    ) -> TravelTimes {
        if let Some(coords) = destination_coords {
            return geo::estimates_from_distance(geo::distance_meters(ctx.coords, coords));
        }
        self.keyword_distances
            .estimate_for_name(destination_name)
            .unwrap_or_else(KeywordDistanceTable::unknown_estimate)
    }
}

/// Route endpoints: precise coordinates when both ends have them,
/// otherwise free-text names ("<place>, <city>") the providers geocode
/// themselves.
fn endpoints(
    ctx: &Context,
    destination_name: &str,
    destination_coords: Option<Coordinates>,
) -> (RouteEndpoint, RouteEndpoint) {
    match destination_coords {
        Some(coords) => (
            RouteEndpoint::Point(ctx.coords),
            RouteEndpoint::Point(coords),
        ),
        None => (
            RouteEndpoint::Address(ctx.location_label.clone()),
            RouteEndpoint::Address(format!("{}, {}", destination_name, ctx.city_hint())),
        ),
    }
}
