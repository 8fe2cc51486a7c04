//! Diversity-constrained selection
//!
//! One greedy pass over the ranked list: duplicate chain names are
//! skipped, each category may appear at most twice, and selection stops
//! at the target count. A lower-scored item can win over a higher-scored
//! one that violates a constraint — variety over raw score.

use std::collections::{HashMap, HashSet};

use crate::models::{ActivityItem, Category};

const MAX_PER_CATEGORY: usize = 2;

/// Select up to `target` items from the ranked input
pub fn select(items: Vec<ActivityItem>, target: usize) -> Vec<ActivityItem> {
    let total = items.len();
    let mut kept: Vec<ActivityItem> = Vec::with_capacity(target);
    let mut seen_chain_names: HashSet<String> = HashSet::new();
    let mut category_counts: HashMap<Category, usize> = HashMap::new();

    for item in items {
        if kept.len() >= target {
            break;
        }

        if item.locale_hints.chain {
            let key = item.name.to_lowercase();
            if !seen_chain_names.insert(key) {
                tracing::debug!(place = %item.name, "Skipped: duplicate chain name");
                continue;
            }
        }

        let count = category_counts.entry(item.category).or_insert(0);
        if *count >= MAX_PER_CATEGORY {
            tracing::debug!(place = %item.name, category = ?item.category, "Skipped: category cap");
            continue;
        }
        *count += 1;

        kept.push(item);
    }

    tracing::info!(
        stage = "diversity",
        items_in = total,
        items_out = kept.len(),
        "Diversity selection completed"
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndoorOutdoor, LocaleHints, PriceLevel, SourceKind};

    fn scored_item(name: &str, category: Category, score: f32, chain: bool) -> ActivityItem {
        ActivityItem {
            id: format!("maps:{name}"),
            name: name.to_string(),
            category,
            price_level: PriceLevel::Unknown,
            rating: None,
            review_count: None,
            open_now: None,
            indoor_outdoor: IndoorOutdoor::Unknown,
            coords: None,
            distance_meters: None,
            travel_time_min: Some(10),
            travel: None,
            expected_wait_min: None,
            expected_dwell_min: None,
            theme_tags: Vec::new(),
            locale_hints: LocaleHints {
                chain,
                local_vibe: !chain,
            },
            source: SourceKind::Maps,
            total_score: Some(score),
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
    fn test_select_stops_at_target() {
        let items: Vec<ActivityItem> = (0..8)
            .map(|i| {
                let category = if i % 4 == 0 {
                    Category::Cafe
                } else if i % 4 == 1 {
                    Category::Park
                } else if i % 4 == 2 {
                    Category::Museum
                } else {
                    Category::Market
                };
                scored_item(&format!("p{i}"), category, 90.0 - i as f32, false)
            })
            .collect();

        let selected = select(items, 4);
        assert_eq!(selected.len(), 4);
        assert_eq!(selected[0].name, "p0");
    }

    #[test]
    fn test_select_caps_categories_at_two() {
        let items = vec![
            scored_item("cafe1", Category::Cafe, 90.0, false),
            scored_item("cafe2", Category::Cafe, 85.0, false),
            scored_item("cafe3", Category::Cafe, 80.0, false),
            scored_item("park1", Category::Park, 60.0, false),
        ];

        let selected = select(items, 4);
        let cafes = selected
            .iter()
            .filter(|i| i.category == Category::Cafe)
            .count();
        assert_eq!(cafes, 2);
        // The lower-scored park wins the slot the third cafe lost
        assert!(selected.iter().any(|i| i.name == "park1"));
    }

    #[test]
    fn test_select_dedupes_chain_names_case_insensitive() {
        let items = vec![
            scored_item("Starbucks", Category::Cafe, 90.0, true),
            scored_item("STARBUCKS", Category::Cafe, 88.0, true),
            scored_item("Local Roasters", Category::Cafe, 70.0, false),
        ];

        let selected = select(items, 4);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name, "Starbucks");
        assert_eq!(selected[1].name, "Local Roasters");
    }

    #[test]
    fn test_select_allows_same_name_non_chains() {
        // Two independent places that happen to share a name both stay
        let items = vec![
            scored_item("El Raco", Category::Restaurant, 90.0, false),
            scored_item("el raco", Category::Restaurant, 85.0, false),
        ];

        let selected = select(items, 4);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_select_short_input_passes_through() {
        let items = vec![scored_item("only", Category::Park, 50.0, false)];
        let selected = select(items, 4);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_select_empty_input() {
        assert!(select(Vec::new(), 4).is_empty());
    }
}
