//! Candidate normalization
//!
//! Converts heterogeneous raw search hits into canonical
//! [`ActivityItem`]s: category and theme classification, chain detection,
//! review-count and open-state parsing, and a concurrent coordinate
//! lookup for hits that arrived without GPS data. Hits without a title
//! are dropped; everything else survives with whatever fields could be
//! filled.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tokio::time::timeout;

use crate::{
    category,
    config::PipelineConfig,
    geo,
    models::{ActivityItem, Candidate, Context, LocaleHints, PriceLevel, SourceKind},
    services::providers::PlacesLookup,
};

/// Normalization result: items in input order plus failed lookup count
pub struct NormalizeOutcome {
    pub items: Vec<ActivityItem>,
    pub provider_errors: usize,
}

pub struct Normalizer {
    places: Option<Arc<dyn PlacesLookup>>,
    lookup_timeout: std::time::Duration,
}

impl Normalizer {
    pub fn new(places: Option<Arc<dyn PlacesLookup>>, config: &PipelineConfig) -> Self {
        Self {
            places,
            lookup_timeout: config.lookup_timeout,
        }
    }

    /// Normalize up to `max_candidates` hits concurrently, preserving
    /// input order. Lookup failures degrade to coordinate-less items.
    pub async fn normalize(
        &self,
        hits: Vec<(SourceKind, Candidate)>,
        ctx: &Context,
        config: &PipelineConfig,
    ) -> NormalizeOutcome {
        let total = hits.len();
        let mut tasks = Vec::new();

        for (source, candidate) in hits.into_iter().take(config.max_candidates) {
            let places = self.places.clone();
            let ctx = ctx.clone();
            let lookup_timeout = self.lookup_timeout;
            tasks.push(tokio::spawn(async move {
                normalize_one(source, candidate, &ctx, places, lookup_timeout).await
            }));
        }

        let mut items = Vec::new();
        let mut provider_errors = 0;
        for task in tasks {
            match task.await {
                Ok(Some((item, errors))) => {
                    provider_errors += errors;
                    items.push(item);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Normalization task join error");
                }
            }
        }

        tracing::info!(
            stage = "normalize",
            items_in = total,
            items_out = items.len(),
            provider_errors,
            "Candidates normalized"
        );

        NormalizeOutcome {
            items,
            provider_errors,
        }
    }
}

/// Normalize one candidate. `None` means the hit was unusable (no
/// title); the usize counts failed lookup calls.
async fn normalize_one(
    source: SourceKind,
    candidate: Candidate,
    ctx: &Context,
    places: Option<Arc<dyn PlacesLookup>>,
    lookup_timeout: std::time::Duration,
) -> Option<(ActivityItem, usize)> {
    let title = candidate.title.trim();
    if title.is_empty() {
        return None;
    }
    let title = title.to_string();

    let classification_text = format!(
        "{} {} {}",
        title,
        candidate.place_type.as_deref().unwrap_or(""),
        candidate.description.as_deref().unwrap_or("")
    );
    let category = category::category_from_text(&classification_text);

    let mut coords = candidate.coords;
    let mut rating = candidate.rating;
    let mut review_count = candidate.reviews.as_deref().and_then(parse_review_count);
    let mut place_id = candidate.place_id;
    let mut lookup_errors = 0;

    // Hits without GPS data get one shot at a precise coordinate lookup
    if coords.is_none() {
        if let Some(places) = places {
            match timeout(lookup_timeout, places.lookup(&title, ctx.city_hint())).await {
                Ok(Ok(Some(details))) => {
                    coords = details.coords;
                    rating = rating.or(details.rating);
                    review_count = review_count.or(details.review_count);
                    place_id = place_id.or(details.place_id);
                }
                Ok(Ok(None)) => {
                    tracing::debug!(place = %title, "No coordinates found, keeping estimate path");
                }
                Ok(Err(e)) => {
                    tracing::warn!(place = %title, error = %e, "Coordinate lookup failed");
                    lookup_errors += 1;
                }
                Err(_) => {
                    tracing::warn!(place = %title, "Coordinate lookup timed out");
                    lookup_errors += 1;
                }
            }
        }
    }

    let chain = category::is_chain_establishment(&title);
    let open_now = candidate
        .open_state
        .as_deref()
        .map(|state| state.to_lowercase().contains("open"));

    let item = ActivityItem {
        id: mint_id(source, &title),
        name: title.clone(),
        category,
        // Price starts unknown; review-based analysis is an out-of-scope
        // enrichment
        price_level: PriceLevel::Unknown,
        rating,
        review_count,
        open_now,
        indoor_outdoor: category.indoor_outdoor(),
        coords,
        distance_meters: coords.map(|c| geo::distance_meters(ctx.coords, c)),
        travel_time_min: None,
        travel: None,
        expected_wait_min: None,
        expected_dwell_min: None,
        theme_tags: category::theme_tags_from_text(&classification_text, category),
        locale_hints: LocaleHints {
            chain,
            local_vibe: !chain,
        },
        source,
        total_score: None,
        time_fitness_score: None,
        reason_text: String::new(),
        directions_link: geo::directions_link(&ctx.location_label, &title),
        place_id,
        review_summary: None,
        top_reviews: None,
        photos: None,
    };

    Some((item, lookup_errors))
}

/// Stable item id: source tag plus a short hash of the place name
fn mint_id(source: SourceKind, title: &str) -> String {
    let mut hasher = std::hash::DefaultHasher::new();
    title.hash(&mut hasher);
    let tag = match source {
        SourceKind::Maps => "maps",
        SourceKind::Web => "web",
        SourceKind::Fallback => "fallback",
    };
    format!("{}:{:05}", tag, hasher.finish() % 100_000)
}

/// Pulls the count out of review text like "1,024 reviews" or "156"
fn parse_review_count(text: &str) -> Option<u32> {
    let cleaned: String = text.replace(',', "");
    let digits: String = cleaned
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
