//! The recommendation pipeline
//!
//! Fixed-order stages: search → normalize → travel-time filter →
//! time-fitness classify → score/rank → diversity-select →
//! fallback-augment. Each stage consumes the whole collection its
//! predecessor produced; only the search, normalize and travel-filter
//! stages perform I/O, and every environmental failure inside them
//! degrades locally. A well-formed request therefore always yields a
//! result set; only invalid preferences are rejected.

use std::time::Instant;

use uuid::Uuid;

use crate::{
    config::PipelineConfig,
    error::AppResult,
    models::{Context, PipelineMeta, Preferences, RecommendationSet},
    services::{
        diversity, fallback,
        normalize::Normalizer,
        ranking,
        search::{build_queries, SearchService},
        time_fitness,
        travel_filter::TravelTimeFilter,
    },
};

pub struct RecommendationPipeline {
    search: SearchService,
    normalizer: Normalizer,
    travel_filter: TravelTimeFilter,
    config: PipelineConfig,
}

impl RecommendationPipeline {
    pub fn new(
        search: SearchService,
        normalizer: Normalizer,
        travel_filter: TravelTimeFilter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            search,
            normalizer,
            travel_filter,
            config,
        }
    }

    /// Run the full pipeline for one request
    pub async fn run(
        &self,
        prefs: &Preferences,
        ctx: &Context,
    ) -> AppResult<RecommendationSet> {
        prefs.validate()?;

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        tracing::info!(
            %request_id,
            time_bucket = ?prefs.time_bucket,
            budget = ?prefs.budget_level,
            themes = prefs.themes.len(),
            location = %ctx.location_label,
            "Recommendation pipeline started"
        );

        let queries = build_queries(prefs, ctx, self.config.max_queries);
        let search_outcome = self.search.gather(&queries, &self.config).await;
        let mut provider_errors = search_outcome.provider_errors;

        let normalize_outcome = self
            .normalizer
            .normalize(search_outcome.hits, ctx, &self.config)
            .await;
        provider_errors += normalize_outcome.provider_errors;

        let filter_outcome = self
            .travel_filter
            .filter(normalize_outcome.items, prefs, ctx, &self.config)
            .await;
        provider_errors += filter_outcome.provider_errors;

        let mut items = filter_outcome.items;
        time_fitness::classify(&mut items, prefs);
        ranking::rank(&mut items, prefs, ctx);

        let mut selected = diversity::select(items, self.config.target_count);
        let fallback_used =
            fallback::augment(&mut selected, prefs, ctx, self.config.target_count);

        let meta = PipelineMeta {
            request_id,
            source_counts: search_outcome.counts,
            provider_errors,
            fallback_used,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        tracing::info!(
            %request_id,
            items = selected.len(),
            fallback_used,
            provider_errors,
            elapsed_ms = meta.elapsed_ms,
            "Recommendation pipeline completed"
        );

        Ok(RecommendationSet {
            items: selected,
            meta,
        })
    }
}
