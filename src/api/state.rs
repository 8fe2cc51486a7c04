use std::sync::Arc;

use crate::{
    config::{Config, PipelineConfig},
    models::Context,
    services::{
        normalize::Normalizer,
        providers::{
            GoogleDirectionsProvider, GooglePlacesProvider, GoogleRoutesProvider, PlacesLookup,
            RoutingProvider, SearchProvider, SerpMapsProvider, WebSearchProvider,
        },
        search::SearchService,
        travel_filter::TravelTimeFilter,
        travel_time::TravelTimeResolver,
        RecommendationPipeline,
    },
};

/// Shared application state
///
/// The pipeline and the default context are both immutable after
/// startup; per-request state lives entirely inside one pipeline run.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RecommendationPipeline>,
    pub default_context: Context,
}

impl AppState {
    /// Wires the real providers from whatever API keys are configured.
    /// A missing key disables that provider; the pipeline degrades to
    /// its estimate tiers instead of failing.
    pub fn from_config(config: &Config) -> Self {
        let pipeline_config = PipelineConfig::default();

        let maps = config.serpapi_key.clone().map(|key| {
            Arc::new(SerpMapsProvider::new(key, config.serpapi_url.clone()))
                as Arc<dyn SearchProvider>
        });
        let web = config.bing_api_key.clone().map(|key| {
            Arc::new(WebSearchProvider::new(key, config.bing_url.clone()))
                as Arc<dyn SearchProvider>
        });

        let mut routing_tiers: Vec<Arc<dyn RoutingProvider>> = Vec::new();
        if let Some(key) = &config.google_api_key {
            routing_tiers.push(Arc::new(GoogleRoutesProvider::new(key.clone())));
            routing_tiers.push(Arc::new(GoogleDirectionsProvider::new(key.clone())));
        }

        let places = config
            .google_api_key
            .clone()
            .map(|key| Arc::new(GooglePlacesProvider::new(key)) as Arc<dyn PlacesLookup>);

        tracing::info!(
            maps_search = maps.is_some(),
            web_search = web.is_some(),
            routing_tiers = routing_tiers.len(),
            places_lookup = places.is_some(),
            "Providers wired"
        );

        let resolver = Arc::new(TravelTimeResolver::new(routing_tiers, &pipeline_config));
        let pipeline = RecommendationPipeline::new(
            SearchService::new(maps, web),
            Normalizer::new(places, &pipeline_config),
            TravelTimeFilter::new(resolver),
            pipeline_config,
        );

        Self {
            pipeline: Arc::new(pipeline),
            default_context: config.default_context(),
        }
    }

    /// State around a pre-built pipeline; used by tests to inject stub
    /// providers
    pub fn with_pipeline(pipeline: RecommendationPipeline, default_context: Context) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            default_context,
        }
    }
}
