use serde::{Deserialize, Serialize};

use super::preferences::Theme;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Closed category enum for recommendable places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cafe,
    Park,
    Viewpoint,
    Market,
    Museum,
    Shopping,
    Restaurant,
    Landmark,
    Other,
}

impl Category {
    /// Short label used in reason texts
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cafe => "cafe",
            Category::Park => "park",
            Category::Viewpoint => "viewpoint",
            Category::Market => "market",
            Category::Museum => "museum",
            Category::Shopping => "shopping",
            Category::Restaurant => "restaurant",
            Category::Landmark => "landmark",
            Category::Other => "spot",
        }
    }
}

/// Price tier of a place (or the user's budget)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceLevel {
    Low,
    Mid,
    High,
    Unknown,
}

impl PriceLevel {
    /// Ordinal position on the low..high axis; `Unknown` has none.
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            PriceLevel::Low => Some(0),
            PriceLevel::Mid => Some(1),
            PriceLevel::High => Some(2),
            PriceLevel::Unknown => None,
        }
    }
}

/// Whether a place is sheltered from the weather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndoorOutdoor {
    Indoor,
    Outdoor,
    Mixed,
    Unknown,
}

/// Which collaborator produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Maps,
    Web,
    Fallback,
}

/// Soft signals about the character of a place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocaleHints {
    /// Part of a multi-location commercial brand
    pub chain: bool,
    /// Independent/local establishment (inverse of `chain` at normalization)
    pub local_vibe: bool,
}

/// Per-mode travel estimates in minutes, plus the underlying distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelTimes {
    pub walk_min: u32,
    pub drive_min: u32,
    pub transit_min: u32,
    pub distance_meters: u32,
}

/// A raw, provider-specific search hit
///
/// Produced by a search collaborator and consumed only by the normalizer;
/// everything downstream works on [`ActivityItem`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    #[serde(default)]
    pub place_type: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    /// Raw review-count text, e.g. "1,024 reviews"
    #[serde(default)]
    pub reviews: Option<String>,
    #[serde(default)]
    pub coords: Option<Coordinates>,
    /// Raw open-state text, e.g. "Open now" / "Closed"
    #[serde(default)]
    pub open_state: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
}

/// The canonical unit flowing through the pipeline from normalization onward
///
/// Created once by the normalizer and enriched in place by every later
/// stage: travel times by the travel-time filter, wait/dwell and fitness by
/// the time classifier, `total_score` and `reason_text` by the ranker.
/// Fallback entries are built directly from the static catalog instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub price_level: PriceLevel,
    pub rating: Option<f32>,
    pub review_count: Option<u32>,
    pub open_now: Option<bool>,
    pub indoor_outdoor: IndoorOutdoor,
    pub coords: Option<Coordinates>,
    pub distance_meters: Option<u32>,
    /// Travel time of the mode chosen by the travel-time filter
    pub travel_time_min: Option<u32>,
    pub travel: Option<TravelTimes>,
    pub expected_wait_min: Option<u32>,
    pub expected_dwell_min: Option<u32>,
    pub theme_tags: Vec<Theme>,
    pub locale_hints: LocaleHints,
    pub source: SourceKind,
    /// In [0, 100] once the ranker has run
    pub total_score: Option<f32>,
    /// Travel/total-time feasibility sub-score, bounded 0–20
    pub time_fitness_score: Option<f32>,
    pub reason_text: String,
    pub directions_link: String,
    #[serde(default)]
    pub place_id: Option<String>,
    // Enrichment filled by out-of-scope collaborators, absent by default
    #[serde(default)]
    pub review_summary: Option<String>,
    #[serde(default)]
    pub top_reviews: Option<Vec<String>>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
}

impl ActivityItem {
    /// Total expected trip time: travel + wait + dwell, with the
    /// classifier's conservative defaults for anything unset.
    pub fn total_trip_minutes(&self) -> u32 {
        self.travel_time_min.unwrap_or(5)
            + self.expected_wait_min.unwrap_or(0)
            + self.expected_dwell_min.unwrap_or(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_level_ordinals() {
        assert_eq!(PriceLevel::Low.ordinal(), Some(0));
        assert_eq!(PriceLevel::High.ordinal(), Some(2));
        assert_eq!(PriceLevel::Unknown.ordinal(), None);
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Viewpoint).unwrap();
        assert_eq!(json, r#""viewpoint""#);

        let parsed: Category = serde_json::from_str(r#""cafe""#).unwrap();
        assert_eq!(parsed, Category::Cafe);
    }

    #[test]
    fn test_candidate_deserializes_from_sparse_record() {
        let json = r#"{
            "title": "Parc del Centre del Poblenou",
            "rating": 4.4,
            "reviews": "1,024 reviews",
            "coords": {"lat": 41.4069, "lng": 2.2014},
            "open_state": "Open now"
        }"#;

        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.title, "Parc del Centre del Poblenou");
        assert_eq!(candidate.rating, Some(4.4));
        assert!(candidate.address.is_none());
        assert!(candidate.place_id.is_none());
    }

    #[test]
    fn test_total_trip_minutes_defaults() {
        let item = ActivityItem {
            id: "maps:1".to_string(),
            name: "Somewhere".to_string(),
            category: Category::Other,
            price_level: PriceLevel::Unknown,
            rating: None,
            review_count: None,
            open_now: None,
            indoor_outdoor: IndoorOutdoor::Unknown,
            coords: None,
            distance_meters: None,
            travel_time_min: None,
            travel: None,
            expected_wait_min: None,
            expected_dwell_min: None,
            theme_tags: Vec::new(),
            locale_hints: LocaleHints::default(),
            source: SourceKind::Maps,
            total_score: None,
            time_fitness_score: None,
            reason_text: String::new(),
            directions_link: String::new(),
            place_id: None,
            review_summary: None,
            top_reviews: None,
            photos: None,
        };

        // 5 travel + 0 wait + 20 dwell
        assert_eq!(item.total_trip_minutes(), 25);
    }
}
