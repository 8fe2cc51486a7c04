//! Query building and the search fan-out
//!
//! Queries are built deterministically from the theme/budget keyword
//! tables. The maps provider is the primary source; the web provider is
//! only consulted when the primary comes back thin. Provider failures
//! never fail the stage — they are counted and the pipeline continues
//! with whatever arrived.

use std::sync::Arc;

use tokio::time::{timeout_at, Instant};

use crate::{
    config::PipelineConfig,
    models::{Candidate, Context, Preferences, PriceLevel, SourceCounts, SourceKind, Theme},
    services::providers::{QuerySpec, SearchProvider},
};

/// Raw search hits tagged with the collaborator that produced them
pub struct SearchOutcome {
    pub hits: Vec<(SourceKind, Candidate)>,
    pub counts: SourceCounts,
    pub provider_errors: usize,
}

/// Spanish and English search phrases per theme
fn theme_keywords(theme: Theme) -> (&'static [&'static str], &'static [&'static str]) {
    match theme {
        Theme::Relax => (
            &["cafe acogedor", "parque tranquilo", "mirador"],
            &["cozy cafe", "quiet park", "viewpoint"],
        ),
        Theme::Shopping => (
            &["mercado local", "tienda vintage", "papelería"],
            &["local market", "vintage shop", "stationery store"],
        ),
        Theme::Food => (
            &["comida barata", "bar de tapas", "panadería"],
            &["cheap eats", "tapas bar", "bakery"],
        ),
        Theme::Activity => (
            &["museo pequeño", "galería de arte", "espectáculo callejero"],
            &["small museum", "art gallery", "street performance"],
        ),
    }
}

/// Budget hint appended to queries; empty for the unknown tier
fn budget_keywords(level: PriceLevel) -> (&'static str, &'static str) {
    match level {
        PriceLevel::Low => ("barato", "budget"),
        PriceLevel::Mid => ("moderado", "moderate"),
        PriceLevel::High => ("fino", "fine"),
        PriceLevel::Unknown => ("", ""),
    }
}

/// Builds the search queries for one request: per-theme Spanish and
/// English phrases around the current location, deduplicated, capped,
/// with generic fallback queries guaranteeing at least two.
pub fn build_queries(prefs: &Preferences, ctx: &Context, max_queries: usize) -> Vec<QuerySpec> {
    let radius = prefs.time_bucket.search_radius_meters();
    let (budget_es, budget_en) = budget_keywords(prefs.budget_level);
    let location = ctx.location_label.as_str();

    let mut queries: Vec<QuerySpec> = Vec::new();
    let push_unique = |queries: &mut Vec<QuerySpec>, q: String, locale: &str| {
        let q = q.trim().to_string();
        if queries.len() < max_queries && !queries.iter().any(|existing| existing.q == q) {
            queries.push(QuerySpec {
                q,
                locale: locale.to_string(),
                radius_meters: radius,
                center: ctx.coords,
            });
        }
    };

    for theme in &prefs.themes {
        let (es_words, en_words) = theme_keywords(*theme);
        for word in es_words.iter().take(2) {
            push_unique(
                &mut queries,
                format!("{} cerca de {} {}", word, location, budget_es),
                "es-ES",
            );
        }
        for word in en_words.iter().take(1) {
            push_unique(
                &mut queries,
                format!("{} near {} {}", word, location, budget_en),
                "en",
            );
        }
    }

    // Guarantee at least two queries even for a degenerate request
    if queries.len() < 2 {
        push_unique(
            &mut queries,
            format!("lugares interesantes cerca de {}", location),
            "es-ES",
        );
        push_unique(&mut queries, format!("things to do near {}", location), "en");
    }

    queries
}

pub struct SearchService {
    maps: Option<Arc<dyn SearchProvider>>,
    web: Option<Arc<dyn SearchProvider>>,
}

impl SearchService {
    pub fn new(
        maps: Option<Arc<dyn SearchProvider>>,
        web: Option<Arc<dyn SearchProvider>>,
    ) -> Self {
        Self { maps, web }
    }

    /// Fan all queries out to the primary provider, fall back to the
    /// secondary when results are thin, and keep whatever completed
    /// before the aggregate deadline.
    pub async fn gather(&self, queries: &[QuerySpec], config: &PipelineConfig) -> SearchOutcome {
        let deadline = Instant::now() + config.search_timeout;
        let mut outcome = SearchOutcome {
            hits: Vec::new(),
            counts: SourceCounts::default(),
            provider_errors: 0,
        };

        if let Some(maps) = &self.maps {
            let (hits, errors) =
                run_provider_batch(Arc::clone(maps), queries, deadline).await;
            outcome.counts.maps = hits.len();
            outcome.provider_errors += errors;
            outcome
                .hits
                .extend(hits.into_iter().map(|c| (SourceKind::Maps, c)));
        }

        // Secondary provider only when the primary came back thin
        if outcome.hits.len() < config.secondary_search_threshold {
            if let Some(web) = &self.web {
                let (hits, errors) = run_provider_batch(Arc::clone(web), queries, deadline).await;
                outcome.counts.web = hits.len();
                outcome.provider_errors += errors;
                outcome
                    .hits
                    .extend(hits.into_iter().map(|c| (SourceKind::Web, c)));
            }
        }

        tracing::info!(
            stage = "search",
            queries = queries.len(),
            maps_hits = outcome.counts.maps,
            web_hits = outcome.counts.web,
            provider_errors = outcome.provider_errors,
            "Search fan-out completed"
        );

        outcome
    }
}

/// One provider, all queries in parallel. Each task races the shared
/// deadline so an aggregate timeout only loses the stragglers, never the
/// completed calls. Hit order follows query order for determinism.
async fn run_provider_batch(
    provider: Arc<dyn SearchProvider>,
    queries: &[QuerySpec],
    deadline: Instant,
) -> (Vec<Candidate>, usize) {
    let mut tasks = Vec::new();
    for query in queries.iter().cloned() {
        let provider = Arc::clone(&provider);
        tasks.push(tokio::spawn(async move {
            timeout_at(deadline, provider.search_places(&query)).await
        }));
    }

    let mut hits = Vec::new();
    let mut errors = 0;
    for task in tasks {
        match task.await {
            Ok(Ok(Ok(batch))) => hits.extend(batch),
            Ok(Ok(Err(e))) => {
                tracing::warn!(provider = provider.name(), error = %e, "Search query failed");
                errors += 1;
            }
            Ok(Err(_elapsed)) => {
                tracing::warn!(provider = provider.name(), "Search query timed out");
                errors += 1;
            }
            Err(e) => {
                tracing::error!(provider = provider.name(), error = %e, "Task join error");
                errors += 1;
            }
        }
    }

    (hits, errors)
}
