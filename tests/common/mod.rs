//! Shared stub collaborators for integration tests

use std::sync::Mutex;

use gaptime_api::config::PipelineConfig;
use gaptime_api::error::{AppError, AppResult};
use gaptime_api::models::{
    Candidate, Context, Coordinates, Preferences, PriceLevel, Theme, TimeBucket, Weather,
    WeatherCondition,
};
use gaptime_api::services::normalize::Normalizer;
use gaptime_api::services::providers::{
    QuerySpec, RouteEndpoint, RouteLeg, RoutingProvider, SearchProvider, TravelMode,
};
use gaptime_api::services::search::SearchService;
use gaptime_api::services::travel_filter::TravelTimeFilter;
use gaptime_api::services::travel_time::TravelTimeResolver;
use gaptime_api::services::RecommendationPipeline;
use std::sync::Arc;

/// Search stub that yields its canned hits exactly once, so fanned-out
/// queries do not multiply the candidate set
pub struct StubSearch {
    hits: Mutex<Option<Vec<Candidate>>>,
}

impl StubSearch {
    pub fn with_hits(hits: Vec<Candidate>) -> Self {
        Self {
            hits: Mutex::new(Some(hits)),
        }
    }

    pub fn empty() -> Self {
        Self {
            hits: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for StubSearch {
    async fn search_places(&self, _query: &QuerySpec) -> AppResult<Vec<Candidate>> {
        Ok(self.hits.lock().unwrap().take().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "stub_search"
    }
}

/// Routing stub with fixed per-mode durations
pub struct StubRouting {
    pub walk_min: u32,
    pub drive_min: u32,
    pub transit_min: u32,
    pub distance_meters: u32,
}

#[async_trait::async_trait]
impl RoutingProvider for StubRouting {
    async fn route(
        &self,
        _origin: &RouteEndpoint,
        _destination: &RouteEndpoint,
        mode: TravelMode,
    ) -> AppResult<RouteLeg> {
        let duration_min = match mode {
            TravelMode::Walk => self.walk_min,
            TravelMode::Drive => self.drive_min,
            TravelMode::Transit => self.transit_min,
        };
        Ok(RouteLeg {
            duration_min,
            distance_meters: self.distance_meters,
        })
    }

    fn name(&self) -> &'static str {
        "stub_routing"
    }
}

/// Routing stub that always fails, pushing the cascade to its estimates
pub struct DownRouting;

#[async_trait::async_trait]
impl RoutingProvider for DownRouting {
    async fn route(
        &self,
        _origin: &RouteEndpoint,
        _destination: &RouteEndpoint,
        _mode: TravelMode,
    ) -> AppResult<RouteLeg> {
        Err(AppError::ExternalApi("routing unavailable".to_string()))
    }

    fn name(&self) -> &'static str {
        "down_routing"
    }
}

pub fn ccib_context() -> Context {
    Context {
        location_label: "Centre de Convencions Internacional de Barcelona".to_string(),
        coords: Coordinates::new(41.4095, 2.2184),
        weather: Weather {
            condition: WeatherCondition::Sunny,
            temp_c: Some(24),
        },
        local_time_iso: "2026-08-06T10:00:00".to_string(),
    }
}

pub fn relax_prefs(bucket: TimeBucket) -> Preferences {
    Preferences {
        time_bucket: bucket,
        budget_level: PriceLevel::Low,
        themes: vec![Theme::Relax],
        natural_hint: None,
    }
}

/// A pipeline over stub collaborators
pub fn stub_pipeline(
    search: Option<StubSearch>,
    routing: Option<Arc<dyn RoutingProvider>>,
) -> RecommendationPipeline {
    let config = PipelineConfig::default();
    let tiers: Vec<Arc<dyn RoutingProvider>> = routing.into_iter().collect();
    let resolver = Arc::new(TravelTimeResolver::new(tiers, &config));
    RecommendationPipeline::new(
        SearchService::new(
            search.map(|s| Arc::new(s) as Arc<dyn SearchProvider>),
            None,
        ),
        Normalizer::new(None, &config),
        TravelTimeFilter::new(resolver),
        config,
    )
}

pub fn hit(title: &str, place_type: &str, rating: f32, coords: Coordinates) -> Candidate {
    Candidate {
        title: title.to_string(),
        place_type: Some(place_type.to_string()),
        rating: Some(rating),
        reviews: Some("200 reviews".to_string()),
        coords: Some(coords),
        open_state: Some("Open now".to_string()),
        ..Candidate::default()
    }
}
