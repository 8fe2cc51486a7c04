use std::time::Duration;

use serde::Deserialize;

use crate::models::{Context, Coordinates, TravelTimes, Weather, WeatherCondition};

/// Application configuration loaded from environment variables
///
/// All provider keys are optional: a missing key simply disables that
/// provider and the pipeline degrades along its fallback tiers.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SerpAPI key for maps search and the directions fallback tier
    #[serde(default)]
    pub serpapi_key: Option<String>,

    /// SerpAPI base URL
    #[serde(default = "default_serpapi_url")]
    pub serpapi_url: String,

    /// Google API key for the Routes/Directions/Places providers
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Bing Web Search key for the secondary search provider
    #[serde(default)]
    pub bing_api_key: Option<String>,

    /// Bing Web Search base URL
    #[serde(default = "default_bing_url")]
    pub bing_url: String,

    /// Label of the traveler's default location
    #[serde(default = "default_location_label")]
    pub location_label: String,

    #[serde(default = "default_location_lat")]
    pub location_lat: f64,

    #[serde(default = "default_location_lng")]
    pub location_lng: f64,

    #[serde(default = "default_weather_condition")]
    pub weather_condition: WeatherCondition,

    #[serde(default = "default_temp_c")]
    pub temp_c: i32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_serpapi_url() -> String {
    "https://serpapi.com/search.json".to_string()
}

fn default_bing_url() -> String {
    "https://api.bing.microsoft.com/v7.0/search".to_string()
}

fn default_location_label() -> String {
    "Centre de Convencions Internacional de Barcelona".to_string()
}

fn default_location_lat() -> f64 {
    41.4095
}

fn default_location_lng() -> f64 {
    2.2184
}

fn default_weather_condition() -> WeatherCondition {
    WeatherCondition::Sunny
}

fn default_temp_c() -> i32 {
    24
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// The default request context built once from config. Per-request
    /// overrides are merged on top of this; nothing mutates it.
    pub fn default_context(&self) -> Context {
        Context {
            location_label: self.location_label.clone(),
            coords: Coordinates::new(self.location_lat, self.location_lng),
            weather: Weather {
                condition: self.weather_condition,
                temp_c: Some(self.temp_c),
            },
            local_time_iso: chrono::Local::now().to_rfc3339(),
        }
    }
}

/// Immutable tuning knobs for one pipeline run, passed explicitly into the
/// pipeline entry point.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How many recommendations the pipeline must produce when possible
    pub target_count: usize,
    /// Cap on candidates taken into normalization
    pub max_candidates: usize,
    /// Consult the secondary web provider only below this many raw hits
    pub secondary_search_threshold: usize,
    /// Cap on generated search queries
    pub max_queries: usize,
    /// Aggregate budget for the whole search fan-out
    pub search_timeout: Duration,
    /// Budget for a single routing/directions call
    pub routing_timeout: Duration,
    /// Budget for a single coordinate lookup
    pub lookup_timeout: Duration,
    /// Travel-time filter fan-out batch size
    pub travel_batch_size: usize,
    /// Pause between travel-time batches, to stay friendly with
    /// third-party rate limits
    pub travel_batch_pause: Duration,
    /// Aggregate budget for the travel-time filter stage
    pub travel_stage_timeout: Duration,
    /// Name-fragment distance estimates, the cascade's last tier
    pub keyword_distances: KeywordDistanceTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_count: 4,
            max_candidates: 15,
            secondary_search_threshold: 5,
            max_queries: 5,
            search_timeout: Duration::from_millis(2400),
            routing_timeout: Duration::from_secs(8),
            lookup_timeout: Duration::from_secs(5),
            travel_batch_size: 5,
            travel_batch_pause: Duration::from_millis(500),
            travel_stage_timeout: Duration::from_secs(45),
            keyword_distances: KeywordDistanceTable::default(),
        }
    }
}

/// Static place-name fragments mapped to distance rings around the
/// configured location, with fixed per-ring travel estimates. Used when
/// neither routing provider answered and no coordinates are known.
#[derive(Debug, Clone)]
pub struct KeywordDistanceTable {
    pub near_fragments: Vec<String>,
    pub mid_fragments: Vec<String>,
    pub far_fragments: Vec<String>,
}

impl KeywordDistanceTable {
    /// Ring estimates for a place name, or `None` when nothing matches
    pub fn estimate_for_name(&self, name: &str) -> Option<TravelTimes> {
        let name_lower = name.to_lowercase();
        let ring = |fragments: &[String]| fragments.iter().any(|f| name_lower.contains(f.as_str()));

        if ring(&self.near_fragments) {
            Some(TravelTimes {
                walk_min: 15,
                drive_min: 5,
                transit_min: 10,
                distance_meters: 1_500,
            })
        } else if ring(&self.mid_fragments) {
            Some(TravelTimes {
                walk_min: 35,
                drive_min: 10,
                transit_min: 20,
                distance_meters: 3_500,
            })
        } else if ring(&self.far_fragments) {
            Some(TravelTimes {
                walk_min: 60,
                drive_min: 15,
                transit_min: 25,
                distance_meters: 6_500,
            })
        } else {
            None
        }
    }

    /// The fixed unknown-distance estimate
    pub fn unknown_estimate() -> TravelTimes {
        TravelTimes {
            walk_min: 25,
            drive_min: 8,
            transit_min: 15,
            distance_meters: 2_000,
        }
    }
}

impl Default for KeywordDistanceTable {
    /// Neighborhood fragments around the CCIB default location. Another
    /// deployment swaps this table, not the cascade.
    fn default() -> Self {
        let to_vec = |s: &[&str]| s.iter().map(|f| (*f).to_string()).collect();
        Self {
            near_fragments: to_vec(&[
                "poblenou",
                "diagonal mar",
                "llull",
                "forum",
                "maresme",
                "besòs",
            ]),
            mid_fragments: to_vec(&["sagrada familia", "eixample", "fort pienc", "sant martí"]),
            far_fragments: to_vec(&[
                "gracia",
                "gothic",
                "born",
                "raval",
                "sarria",
                "les corts",
                "sants",
                "montjuic",
                "ciutadella",
                "barrio gotico",
                "el born",
                "catalunya",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table_matches_rings() {
        let table = KeywordDistanceTable::default();

        let near = table.estimate_for_name("Vintage Poblenou").unwrap();
        assert_eq!(near.walk_min, 15);

        let mid = table.estimate_for_name("Cafe near Sagrada Familia").unwrap();
        assert_eq!(mid.walk_min, 35);

        let far = table.estimate_for_name("Gothic Quarter walking spot").unwrap();
        assert_eq!((far.walk_min, far.drive_min, far.transit_min), (60, 15, 25));
    }

    #[test]
    fn test_keyword_table_unmatched_is_none() {
        let table = KeywordDistanceTable::default();
        assert!(table.estimate_for_name("Mystery Location").is_none());
    }

    #[test]
    fn test_unknown_estimate_constants() {
        let est = KeywordDistanceTable::unknown_estimate();
        assert_eq!(
            (est.walk_min, est.drive_min, est.transit_min, est.distance_meters),
            (25, 8, 15, 2_000)
        );
    }

    #[test]
    fn test_pipeline_config_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.target_count, 4);
        assert_eq!(cfg.max_candidates, 15);
        assert_eq!(cfg.travel_batch_size, 5);
    }
}
