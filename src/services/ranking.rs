//! Multi-factor scoring and ranking
//!
//! Every surviving item gets a total score in [0, 100], summed from
//! independently bounded sub-scores: distance decay, time fitness,
//! budget match, rating, weather fit, theme overlap and a local-vibe
//! bonus, minus a penalty for places known to be closed. The sort is
//! stable so ties keep their upstream order and reruns are reproducible.

use std::cmp::Ordering;

use crate::models::{
    ActivityItem, Context, IndoorOutdoor, Preferences, PriceLevel, Theme, Weather,
};

const MAX_SCORE: f32 = 100.0;

/// Score, annotate and sort the items in place, best first
pub fn rank(items: &mut [ActivityItem], prefs: &Preferences, ctx: &Context) {
    for item in items.iter_mut() {
        let score = total_score(item, prefs, ctx);
        item.total_score = Some(score);
        item.reason_text = reason_text(item, prefs);
    }

    items.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(Ordering::Equal)
    });

    tracing::info!(
        stage = "rank",
        items = items.len(),
        top_score = items.first().and_then(|i| i.total_score),
        "Items scored and ranked"
    );
}

fn total_score(item: &ActivityItem, prefs: &Preferences, ctx: &Context) -> f32 {
    let mut total = distance_score(item.distance_meters)
        + item.time_fitness_score.unwrap_or(15.0)
        + budget_score(item.price_level, prefs.budget_level)
        + rating_score(item.rating)
        + weather_score(item.indoor_outdoor, &ctx.weather)
        + theme_score(&item.theme_tags, &prefs.themes)
        + local_vibe_score(item);

    if item.open_now == Some(false) {
        total -= 15.0;
    }

    total.clamp(0.0, MAX_SCORE)
}

/// Exponential decay with distance, capped at 20; unknown distance gets
/// a neutral 10
fn distance_score(distance_meters: Option<u32>) -> f32 {
    match distance_meters {
        Some(meters) => (20.0 * (-f64::from(meters) / 1000.0).exp() as f32).min(20.0),
        None => 10.0,
    }
}

/// 15 for an exact tier match, 8 for an adjacent tier, 7 when the item's
/// tier is unknown, 0 otherwise
fn budget_score(item_price: PriceLevel, user_budget: PriceLevel) -> f32 {
    if item_price == PriceLevel::Unknown {
        return 7.0;
    }
    if item_price == user_budget {
        return 15.0;
    }
    match (item_price.ordinal(), user_budget.ordinal()) {
        (Some(a), Some(b)) if a.abs_diff(b) == 1 => 8.0,
        _ => 0.0,
    }
}

fn rating_score(rating: Option<f32>) -> f32 {
    match rating {
        Some(r) => (r / 5.0) * 15.0,
        None => 7.0,
    }
}

/// Rain pushes travelers indoors; good weather gives outdoor places a
/// small boost
fn weather_score(indoor_outdoor: IndoorOutdoor, weather: &Weather) -> f32 {
    if weather.is_raining() {
        match indoor_outdoor {
            IndoorOutdoor::Indoor => 10.0,
            IndoorOutdoor::Outdoor => 2.0,
            IndoorOutdoor::Mixed | IndoorOutdoor::Unknown => 7.0,
        }
    } else {
        match indoor_outdoor {
            IndoorOutdoor::Outdoor => 10.0,
            _ => 7.0,
        }
    }
}

/// 6 base, +3 per overlapping theme, capped at 15
fn theme_score(item_tags: &[Theme], user_themes: &[Theme]) -> f32 {
    let overlap = item_tags
        .iter()
        .filter(|tag| user_themes.contains(tag))
        .count();
    if overlap == 0 {
        6.0
    } else {
        (6.0 + 3.0 * overlap as f32).min(15.0)
    }
}

fn local_vibe_score(item: &ActivityItem) -> f32 {
    if item.locale_hints.chain {
        0.0
    } else {
        5.0
    }
}

fn theme_phrase(theme: Theme) -> &'static str {
    match theme {
        Theme::Relax => "unwinding",
        Theme::Shopping => "browsing",
        Theme::Food => "a bite",
        Theme::Activity => "exploring",
    }
}

fn price_phrase(price: PriceLevel) -> Option<&'static str> {
    match price {
        PriceLevel::Low => Some("Budget-friendly"),
        PriceLevel::Mid => Some("Mid-priced"),
        PriceLevel::High => Some("Upscale"),
        PriceLevel::Unknown => None,
    }
}

/// One-line English reason: travel time, category, rating, price if
/// known, and the first matching theme
fn reason_text(item: &ActivityItem, prefs: &Preferences) -> String {
    let travel = item.travel_time_min.unwrap_or(5);

    let rating_part = match item.rating {
        Some(r) => format!("rated {:.1}/5", r),
        None => "no rating yet".to_string(),
    };

    let theme = item
        .theme_tags
        .iter()
        .find(|tag| prefs.themes.contains(tag))
        .copied()
        .map(theme_phrase)
        .unwrap_or("a quick stop");

    match price_phrase(item.price_level) {
        Some(price) => format!(
            "[{} min walk] {} · {}. {}, good for {} right now.",
            travel,
            item.category.label(),
            rating_part,
            price,
            theme
        ),
        None => format!(
            "[{} min walk] {} · {}. Good for {} right now.",
            travel,
            item.category.label(),
            rating_part,
            theme
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Category, Coordinates, LocaleHints, SourceKind, TimeBucket, TravelTimes, WeatherCondition,
    };

    fn sunny_context() -> Context {
        Context {
            location_label: "CCIB, Barcelona".to_string(),
            coords: Coordinates::new(41.4095, 2.2184),
            weather: Weather {
                condition: WeatherCondition::Sunny,
                temp_c: Some(24),
            },
            local_time_iso: "2026-08-06T10:00:00".to_string(),
        }
    }

    fn rainy_context() -> Context {
        let mut ctx = sunny_context();
        ctx.weather.condition = WeatherCondition::Rain;
        ctx
    }

    fn prefs() -> Preferences {
        Preferences {
            time_bucket: TimeBucket::Under30,
            budget_level: PriceLevel::Low,
            themes: vec![Theme::Relax],
            natural_hint: None,
        }
    }

    fn park_400m() -> ActivityItem {
        ActivityItem {
            id: "maps:00001".to_string(),
            name: "Parc del Centre del Poblenou".to_string(),
            category: Category::Park,
            price_level: PriceLevel::Low,
            rating: Some(4.5),
            review_count: Some(320),
            open_now: Some(true),
            indoor_outdoor: IndoorOutdoor::Outdoor,
            coords: Some(Coordinates::new(41.4069, 2.2014)),
            distance_meters: Some(400),
            travel_time_min: Some(5),
            travel: Some(TravelTimes {
                walk_min: 5,
                drive_min: 3,
                transit_min: 5,
                distance_meters: 400,
            }),
            expected_wait_min: Some(0),
            expected_dwell_min: Some(15),
            theme_tags: vec![Theme::Relax],
            locale_hints: LocaleHints {
                chain: false,
                local_vibe: true,
            },
            source: SourceKind::Maps,
            total_score: None,
            time_fitness_score: Some(20.0),
            reason_text: String::new(),
            directions_link: String::new(),
            place_id: None,
            review_summary: None,
            top_reviews: None,
            photos: None,
        }
    }

    #[test]
    fn test_distance_score_decay() {
        let at_400 = distance_score(Some(400));
        assert!((at_400 - 13.4).abs() < 0.1, "got {at_400}");
        assert_eq!(distance_score(Some(0)), 20.0);
        assert_eq!(distance_score(None), 10.0);
        assert!(distance_score(Some(5000)) < 1.0);
    }

    #[test]
    fn test_budget_score_tiers() {
        assert_eq!(budget_score(PriceLevel::Low, PriceLevel::Low), 15.0);
        assert_eq!(budget_score(PriceLevel::Mid, PriceLevel::Low), 8.0);
        assert_eq!(budget_score(PriceLevel::High, PriceLevel::Mid), 8.0);
        assert_eq!(budget_score(PriceLevel::High, PriceLevel::Low), 0.0);
        assert_eq!(budget_score(PriceLevel::Unknown, PriceLevel::Low), 7.0);
        // User with no declared budget matches nothing but unknown items
        assert_eq!(budget_score(PriceLevel::Low, PriceLevel::Unknown), 0.0);
    }

    #[test]
    fn test_rating_score() {
        assert_eq!(rating_score(Some(5.0)), 15.0);
        assert_eq!(rating_score(Some(4.5)), 13.5);
        assert_eq!(rating_score(None), 7.0);
    }

    #[test]
    fn test_weather_score_rain_flips_preference() {
        let rain = Weather {
            condition: WeatherCondition::Rain,
            temp_c: Some(15),
        };
        let sun = Weather::default();

        assert_eq!(weather_score(IndoorOutdoor::Indoor, &rain), 10.0);
        assert_eq!(weather_score(IndoorOutdoor::Outdoor, &rain), 2.0);
        assert_eq!(weather_score(IndoorOutdoor::Mixed, &rain), 7.0);
        assert_eq!(weather_score(IndoorOutdoor::Outdoor, &sun), 10.0);
        assert_eq!(weather_score(IndoorOutdoor::Indoor, &sun), 7.0);
    }

    #[test]
    fn test_theme_score_overlap_cap() {
        let user = vec![Theme::Relax, Theme::Food, Theme::Shopping, Theme::Activity];
        assert_eq!(theme_score(&[], &user), 6.0);
        assert_eq!(theme_score(&[Theme::Relax], &user), 9.0);
        assert_eq!(theme_score(&[Theme::Relax, Theme::Food], &user), 12.0);
        assert_eq!(
            theme_score(
                &[Theme::Relax, Theme::Food, Theme::Shopping, Theme::Activity],
                &user
            ),
            15.0
        );
    }

    #[test]
    fn test_sunny_park_scenario_scores_near_the_top() {
        // ≤30 bucket, low budget, relax theme, sunny: a well-rated park
        // 400 m away should land in the mid-80s
        let mut items = vec![park_400m()];
        rank(&mut items, &prefs(), &sunny_context());

        let score = items[0].total_score.unwrap();
        assert!((75.0..=90.0).contains(&score), "got {score}");
        // distance ≈13.4 + fitness 20 + budget 15 + rating 13.5
        // + weather 10 + theme 9 + vibe 5 ≈ 85.9
        assert!((score - 85.9).abs() < 0.2, "got {score}");
    }

    #[test]
    fn test_closed_place_takes_penalty() {
        let mut open = vec![park_400m()];
        rank(&mut open, &prefs(), &sunny_context());

        let mut closed_item = park_400m();
        closed_item.open_now = Some(false);
        let mut closed = vec![closed_item];
        rank(&mut closed, &prefs(), &sunny_context());

        let diff = open[0].total_score.unwrap() - closed[0].total_score.unwrap();
        assert_eq!(diff, 15.0);
    }

    #[test]
    fn test_chain_loses_vibe_bonus() {
        let mut chain_item = park_400m();
        chain_item.locale_hints = LocaleHints {
            chain: true,
            local_vibe: false,
        };
        let mut items = vec![park_400m(), chain_item];
        rank(&mut items, &prefs(), &sunny_context());

        assert!(!items[0].locale_hints.chain);
        let diff = items[0].total_score.unwrap() - items[1].total_score.unwrap();
        assert_eq!(diff, 5.0);
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let mut worst = park_400m();
        worst.distance_meters = Some(50_000);
        worst.time_fitness_score = Some(0.0);
        worst.rating = Some(0.0);
        worst.price_level = PriceLevel::High;
        worst.open_now = Some(false);
        worst.locale_hints.chain = true;
        worst.theme_tags.clear();
        worst.indoor_outdoor = IndoorOutdoor::Outdoor;

        let mut items = vec![worst];
        rank(&mut items, &prefs(), &rainy_context());
        let score = items[0].total_score.unwrap();
        assert!((0.0..=100.0).contains(&score));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let mut variant = park_400m();
        variant.id = "maps:00002".to_string();
        variant.rating = Some(3.8);

        let mut first = vec![park_400m(), variant.clone()];
        rank(&mut first, &prefs(), &sunny_context());
        let order: Vec<String> = first.iter().map(|i| i.id.clone()).collect();
        let scores: Vec<f32> = first.iter().filter_map(|i| i.total_score).collect();

        rank(&mut first, &prefs(), &sunny_context());
        assert_eq!(
            order,
            first.iter().map(|i| i.id.clone()).collect::<Vec<_>>()
        );
        assert_eq!(
            scores,
            first.iter().filter_map(|i| i.total_score).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let mut a = park_400m();
        a.id = "maps:a".to_string();
        let mut b = park_400m();
        b.id = "maps:b".to_string();

        let mut items = vec![a, b];
        rank(&mut items, &prefs(), &sunny_context());
        assert_eq!(items[0].id, "maps:a");
        assert_eq!(items[1].id, "maps:b");
    }

    #[test]
    fn test_reason_text_mentions_the_essentials() {
        let mut items = vec![park_400m()];
        rank(&mut items, &prefs(), &sunny_context());
        let reason = &items[0].reason_text;

        assert!(reason.contains("[5 min walk]"));
        assert!(reason.contains("park"));
        assert!(reason.contains("4.5/5"));
        assert!(reason.contains("unwinding"));
    }

    #[test]
    fn test_reason_text_without_price_or_rating() {
        let mut item = park_400m();
        item.rating = None;
        item.price_level = PriceLevel::Unknown;
        let mut items = vec![item];
        rank(&mut items, &prefs(), &sunny_context());

        let reason = &items[0].reason_text;
        assert!(reason.contains("no rating yet"));
        assert!(!reason.contains("Budget-friendly"));
    }
}
