use serde::{Deserialize, Serialize};

use super::activity::Coordinates;

/// Weather condition reported by whatever observation the caller has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rain,
    Windy,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub condition: WeatherCondition,
    pub temp_c: Option<i32>,
}

impl Weather {
    pub fn is_raining(&self) -> bool {
        self.condition == WeatherCondition::Rain
    }
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            condition: WeatherCondition::Sunny,
            temp_c: Some(24),
        }
    }
}

/// Where the traveler is right now
///
/// Read-only input to every stage that needs distance or weather fit;
/// threaded explicitly through the pipeline rather than living in any
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub location_label: String,
    pub coords: Coordinates,
    pub weather: Weather,
    pub local_time_iso: String,
}

/// Per-request overrides merged over the configured default context
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextOverride {
    pub location_label: Option<String>,
    pub coords: Option<Coordinates>,
    pub weather: Option<Weather>,
}

impl Context {
    /// City portion of the location label, used to disambiguate place
    /// names in provider queries ("Decent Cafe, Barcelona")
    pub fn city_hint(&self) -> &str {
        self.location_label
            .rsplit(',')
            .next()
            .unwrap_or(&self.location_label)
            .trim()
    }

    pub fn with_override(mut self, over: ContextOverride) -> Self {
        if let Some(label) = over.location_label {
            self.location_label = label;
        }
        if let Some(coords) = over.coords {
            self.coords = coords;
        }
        if let Some(weather) = over.weather {
            self.weather = weather;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        Context {
            location_label: "Centre de Convencions Internacional de Barcelona".to_string(),
            coords: Coordinates::new(41.4095, 2.2184),
            weather: Weather::default(),
            local_time_iso: "2026-08-06T10:00:00".to_string(),
        }
    }

    #[test]
    fn test_override_replaces_only_given_fields() {
        let ctx = base_context().with_override(ContextOverride {
            weather: Some(Weather {
                condition: WeatherCondition::Rain,
                temp_c: Some(17),
            }),
            ..Default::default()
        });

        assert!(ctx.weather.is_raining());
        assert_eq!(ctx.coords.lat, 41.4095);
        assert_eq!(
            ctx.location_label,
            "Centre de Convencions Internacional de Barcelona"
        );
    }

    #[test]
    fn test_default_weather_is_not_raining() {
        assert!(!Weather::default().is_raining());
    }
}
