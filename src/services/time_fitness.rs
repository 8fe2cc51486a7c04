//! Total-trip-time classification
//!
//! Fills in the category-default wait and dwell minutes, compares the
//! whole trip (travel + wait + dwell) against the bucket's ceiling, and
//! adjusts the fitness score the travel filter assigned. This stage
//! never rejects — rejection already happened — it only reshapes the
//! score that feeds ranking.

use crate::models::{ActivityItem, Preferences, TimeBucket};

/// Penalty weight per overtime minute
const OVERTIME_WEIGHT: f32 = 2.0;
/// Extra penalty for overshooting with unverified coordinates
const NO_COORDS_PENALTY: f32 = 10.0;
/// Strict ≤30 bucket: fitness caps at small fixed ceilings once the
/// overage passes +5 and +10 minutes
const STRICT_SOFT_CAP: f32 = 8.0;
const STRICT_HARD_CAP: f32 = 2.0;

/// Classify every surviving item in place
pub fn classify(items: &mut [ActivityItem], prefs: &Preferences) {
    let ceiling = prefs.time_bucket.total_ceiling_minutes();
    let mut over_count = 0;

    for item in items.iter_mut() {
        item.expected_wait_min = Some(item.category.expected_wait_minutes());
        item.expected_dwell_min = Some(item.category.expected_dwell_minutes());

        let total = item.total_trip_minutes();
        let fitness = item.time_fitness_score.unwrap_or(20.0);

        let adjusted = match ceiling {
            None => fitness,
            Some(limit) if total <= limit => fitness,
            Some(limit) => {
                over_count += 1;
                let overtime = (total - limit) as f32;
                let mut score = (fitness - OVERTIME_WEIGHT * overtime).max(0.0);

                if prefs.time_bucket == TimeBucket::Under30 {
                    if overtime > 10.0 {
                        score = score.min(STRICT_HARD_CAP);
                    } else if overtime > 5.0 {
                        score = score.min(STRICT_SOFT_CAP);
                    }
                }

                // Overshooting on an estimated location is doubly suspect
                if item.coords.is_none() {
                    score = (score - NO_COORDS_PENALTY).max(0.0);
                }

                score
            }
        };

        item.time_fitness_score = Some(adjusted);
    }

    tracing::info!(
        stage = "time_fitness",
        items = items.len(),
        over_ceiling = over_count,
        ceiling = ?prefs.time_bucket.total_ceiling_minutes(),
        "Time fitness classified"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Category, Coordinates, IndoorOutdoor, LocaleHints, PriceLevel, SourceKind, Theme,
        TravelTimes,
    };

    fn classified_item(category: Category, travel_min: u32) -> ActivityItem {
        ActivityItem {
            id: "maps:00001".to_string(),
            name: "Test Place".to_string(),
            category,
            price_level: PriceLevel::Unknown,
            rating: None,
            review_count: None,
            open_now: None,
            indoor_outdoor: category.indoor_outdoor(),
            coords: Some(Coordinates::new(41.40, 2.20)),
            distance_meters: Some(800),
            travel_time_min: Some(travel_min),
            travel: Some(TravelTimes {
                walk_min: travel_min,
                drive_min: 5,
                transit_min: 8,
                distance_meters: 800,
            }),
            expected_wait_min: None,
            expected_dwell_min: None,
            theme_tags: vec![Theme::Relax],
            locale_hints: LocaleHints::default(),
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

    fn prefs(bucket: TimeBucket) -> Preferences {
        Preferences {
            time_bucket: bucket,
            budget_level: PriceLevel::Low,
            themes: vec![Theme::Relax],
            natural_hint: None,
        }
    }

    #[test]
    fn test_within_ceiling_keeps_travel_tier_fitness() {
        // Park: 0 wait + 15 dwell; travel 8 → total 23 ≤ 30
        let mut items = vec![classified_item(Category::Park, 8)];
        items[0].time_fitness_score = Some(15.0);
        classify(&mut items, &prefs(TimeBucket::Under30));

        assert_eq!(items[0].time_fitness_score, Some(15.0));
        assert_eq!(items[0].expected_wait_min, Some(0));
        assert_eq!(items[0].expected_dwell_min, Some(15));
    }

    #[test]
    fn test_open_bucket_never_penalizes() {
        // Museum: 15 wait + 60 dwell + 45 travel = 120, no ceiling
        let mut items = vec![classified_item(Category::Museum, 45)];
        classify(&mut items, &prefs(TimeBucket::Over120));
        assert_eq!(items[0].time_fitness_score, Some(20.0));
    }

    #[test]
    fn test_overtime_penalty_is_doubled() {
        // Cafe: 5 wait + 20 dwell; travel 10 → total 35, ceiling 30,
        // overtime 5 → 20 − 10 = 10 (within the +5 strict grace)
        let mut items = vec![classified_item(Category::Cafe, 10)];
        classify(&mut items, &prefs(TimeBucket::Under30));
        assert_eq!(items[0].time_fitness_score, Some(10.0));
    }

    #[test]
    fn test_strict_bucket_soft_cap() {
        // Park: 0 + 15; travel 22 → total 37, overtime 7 → raw 6,
        // soft cap 8 leaves it at 6; overtime ≤ 10 so no hard cap
        let mut items = vec![classified_item(Category::Park, 22)];
        classify(&mut items, &prefs(TimeBucket::Under30));
        assert_eq!(items[0].time_fitness_score, Some(6.0));
    }

    #[test]
    fn test_strict_bucket_hard_cap_beyond_ten_minutes() {
        // Restaurant: 10 wait + 45 dwell; travel 8 → total 63,
        // overtime 33 → raw 0, hard cap makes the ceiling 2; score 0
        let mut items = vec![classified_item(Category::Restaurant, 8)];
        classify(&mut items, &prefs(TimeBucket::Under30));
        assert!(items[0].time_fitness_score.unwrap() <= 2.0);
    }

    #[test]
    fn test_hard_cap_applies_even_with_high_travel_fitness() {
        // Cafe: 5 + 20 wait+dwell; travel 16 → total 41, more than
        // ten minutes over the 30-minute ceiling → fitness ends ≤ 2
        let mut items = vec![classified_item(Category::Cafe, 16)];
        classify(&mut items, &prefs(TimeBucket::Under30));
        assert!(items[0].time_fitness_score.unwrap() <= 2.0);
    }

    #[test]
    fn test_missing_coords_overshoot_takes_extra_penalty() {
        // Cafe travel 10 → total 35, overtime 5 → 10; no coords → 0
        let mut with_coords = vec![classified_item(Category::Cafe, 10)];
        classify(&mut with_coords, &prefs(TimeBucket::Under30));

        let mut without_coords = vec![classified_item(Category::Cafe, 10)];
        without_coords[0].coords = None;
        classify(&mut without_coords, &prefs(TimeBucket::Under30));

        assert_eq!(with_coords[0].time_fitness_score, Some(10.0));
        assert_eq!(without_coords[0].time_fitness_score, Some(0.0));
    }

    #[test]
    fn test_unset_fitness_defaults_to_maximum() {
        let mut items = vec![classified_item(Category::Park, 5)];
        items[0].time_fitness_score = None;
        classify(&mut items, &prefs(TimeBucket::Between30And60));
        assert_eq!(items[0].time_fitness_score, Some(20.0));
    }
}
