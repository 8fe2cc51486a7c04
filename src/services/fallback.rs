//! Fallback top-up from the static catalog
//!
//! The pipeline's terminal safety net: a short, versioned list of
//! known-safe, low-cost public places that can always be recommended.
//! When the diversity selector comes up short, catalog entries are
//! scored with a simplified formula and appended until the target count
//! is reached. This stage works even over zero upstream results.

use crate::{
    geo,
    models::{
        ActivityItem, Category, Context, Coordinates, IndoorOutdoor, LocaleHints, Preferences,
        PriceLevel, SourceKind, Theme,
    },
};

const BASE_SCORE: f32 = 60.0;

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    category: Category,
    coords: Coordinates,
    indoor_outdoor: IndoorOutdoor,
    themes: &'static [Theme],
    reason: &'static str,
}

/// Known-safe public places around the default location
const FALLBACK_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "fallback_1",
        name: "Plaça de Catalunya benches",
        category: Category::Park,
        coords: Coordinates {
            lat: 41.3874,
            lng: 2.1686,
        },
        indoor_outdoor: IndoorOutdoor::Outdoor,
        themes: &[Theme::Relax],
        reason: "Open square with plenty of benches, free. Good for a short breather.",
    },
    CatalogEntry {
        id: "fallback_2",
        name: "Passeig de Gràcia window shopping",
        category: Category::Shopping,
        coords: Coordinates {
            lat: 41.3910,
            lng: 2.1649,
        },
        indoor_outdoor: IndoorOutdoor::Mixed,
        themes: &[Theme::Shopping],
        reason: "Stroll the flagship stores, free to browse. Good for window shopping.",
    },
    CatalogEntry {
        id: "fallback_3",
        name: "El Born alley photo spot",
        category: Category::Viewpoint,
        coords: Coordinates {
            lat: 41.3839,
            lng: 2.1823,
        },
        indoor_outdoor: IndoorOutdoor::Outdoor,
        themes: &[Theme::Activity],
        reason: "Narrow medieval lanes, free. Perfect for a few photos.",
    },
    CatalogEntry {
        id: "fallback_4",
        name: "Ciutadella park short stroll",
        category: Category::Park,
        coords: Coordinates {
            lat: 41.3888,
            lng: 2.1872,
        },
        indoor_outdoor: IndoorOutdoor::Outdoor,
        themes: &[Theme::Relax, Theme::Activity],
        reason: "Green paths and a lake, free. Good for a short walk among trees.",
    },
    CatalogEntry {
        id: "fallback_5",
        name: "La Boqueria market browse",
        category: Category::Market,
        coords: Coordinates {
            lat: 41.3816,
            lng: 2.1722,
        },
        indoor_outdoor: IndoorOutdoor::Indoor,
        themes: &[Theme::Food, Theme::Shopping],
        reason: "Covered market stalls, cheap snacks. Good for tasting local food.",
    },
    CatalogEntry {
        id: "fallback_6",
        name: "Gothic Quarter alleys",
        category: Category::Landmark,
        coords: Coordinates {
            lat: 41.3828,
            lng: 2.1761,
        },
        indoor_outdoor: IndoorOutdoor::Outdoor,
        themes: &[Theme::Activity],
        reason: "Historic old-town lanes, free. Good for soaking up the atmosphere.",
    },
];

/// Top the result list up to `target` items. Returns whether any
/// catalog entry was appended.
pub fn augment(
    items: &mut Vec<ActivityItem>,
    prefs: &Preferences,
    ctx: &Context,
    target: usize,
) -> bool {
    let needed = target.saturating_sub(items.len());
    if needed == 0 {
        tracing::info!(stage = "fallback", items = items.len(), "No top-up needed");
        return false;
    }

    let mut scored: Vec<ActivityItem> = FALLBACK_CATALOG
        .iter()
        .map(|entry| build_item(entry, prefs, ctx))
        .collect();
    scored.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let appended = scored.len().min(needed);
    items.extend(scored.into_iter().take(needed));

    tracing::info!(
        stage = "fallback",
        appended,
        items_out = items.len(),
        "Topped up from the fallback catalog"
    );

    true
}

fn build_item(entry: &CatalogEntry, prefs: &Preferences, ctx: &Context) -> ActivityItem {
    let distance = geo::distance_meters(ctx.coords, entry.coords);
    let travel = geo::estimates_from_distance(distance);

    let mut item = ActivityItem {
        id: entry.id.to_string(),
        name: entry.name.to_string(),
        category: entry.category,
        // Catalog places are free or close to it
        price_level: PriceLevel::Low,
        rating: None,
        review_count: None,
        open_now: Some(true),
        indoor_outdoor: entry.indoor_outdoor,
        coords: Some(entry.coords),
        distance_meters: Some(distance),
        travel_time_min: Some(travel.walk_min),
        travel: Some(travel),
        expected_wait_min: Some(0),
        expected_dwell_min: Some(20),
        theme_tags: entry.themes.to_vec(),
        locale_hints: LocaleHints {
            chain: false,
            local_vibe: true,
        },
        source: SourceKind::Fallback,
        total_score: None,
        time_fitness_score: None,
        reason_text: entry.reason.to_string(),
        directions_link: geo::directions_link(&ctx.location_label, entry.name),
        place_id: None,
        review_summary: None,
        top_reviews: None,
        photos: None,
    };
    item.total_score = Some(fallback_score(&item, prefs, ctx));
    item
}

/// Simplified score: base 60 + distance bonus + theme overlap + weather
/// fit. Deliberately below what a good live search hit earns.
fn fallback_score(item: &ActivityItem, prefs: &Preferences, ctx: &Context) -> f32 {
    let mut score = BASE_SCORE;

    match item.distance_meters {
        Some(d) if d <= 500 => score += 15.0,
        Some(d) if d <= 1000 => score += 10.0,
        Some(_) => score += 5.0,
        None => {}
    }

    let overlap = item
        .theme_tags
        .iter()
        .filter(|tag| prefs.themes.contains(tag))
        .count();
    score += 5.0 * overlap as f32;

    if ctx.weather.is_raining() {
        match item.indoor_outdoor {
            IndoorOutdoor::Indoor => score += 10.0,
            IndoorOutdoor::Outdoor => score -= 5.0,
            _ => {}
        }
    } else if item.indoor_outdoor == IndoorOutdoor::Outdoor {
        score += 5.0;
    }

    score
}
