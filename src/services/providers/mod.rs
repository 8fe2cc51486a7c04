use serde::{Deserialize, Serialize};

/// External collaborator abstractions
///
/// This module provides a pluggable architecture for the three kinds of
/// third parties the pipeline talks to: place search, routing/directions,
/// and coordinate lookup. Concrete implementations wrap specific vendor
/// APIs; the pipeline only ever sees these traits, so tests can substitute
/// stubs and a missing API key just means a tier is skipped.
use crate::{
    error::AppResult,
    models::{Candidate, Coordinates},
};

pub mod google_directions;
pub mod google_places;
pub mod google_routes;
pub mod serp_maps;
pub mod web_search;

pub use google_directions::GoogleDirectionsProvider;
pub use google_places::GooglePlacesProvider;
pub use google_routes::GoogleRoutesProvider;
pub use serp_maps::SerpMapsProvider;
pub use web_search::WebSearchProvider;

/// One search instruction handed to a search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub q: String,
    /// BCP-47-ish locale hint, e.g. "es-ES" or "en"
    pub locale: String,
    pub radius_meters: u32,
    /// Center of the search, from the request context
    pub center: Coordinates,
}

/// Travel mode for routing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Walk,
    Drive,
    Transit,
}

/// Origin or destination of a routing request
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEndpoint {
    /// Free-text address or place name
    Address(String),
    Point(Coordinates),
}

/// A resolved route leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLeg {
    pub duration_min: u32,
    pub distance_meters: u32,
}

/// Precise place details from a coordinate/places lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    pub coords: Option<Coordinates>,
    pub rating: Option<f32>,
    pub review_count: Option<u32>,
    pub place_id: Option<String>,
}

/// Trait for place-search providers
///
/// May return zero results; must come back within the caller's timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query and return raw place records
    async fn search_places(&self, query: &QuerySpec) -> AppResult<Vec<Candidate>>;

    /// Provider name for logging and source stats
    fn name(&self) -> &'static str;
}

/// Trait for routing/directions providers
///
/// Implementations form the travel-time cascade's tiers: a failure here is
/// normal and simply moves the cascade to the next tier.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Duration and distance for one origin→destination leg in one mode
    async fn route(
        &self,
        origin: &RouteEndpoint,
        destination: &RouteEndpoint,
        mode: TravelMode,
    ) -> AppResult<RouteLeg>;

    fn name(&self) -> &'static str;
}

/// Trait for coordinate/places lookup providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlacesLookup: Send + Sync {
    /// Best-effort details for a named place near a location hint
    async fn lookup(&self, name: &str, location_hint: &str) -> AppResult<Option<PlaceDetails>>;

    fn name(&self) -> &'static str;
}
