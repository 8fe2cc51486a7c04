/// Google Places text-search provider
///
/// Coordinate lookup for search hits that came back without GPS data.
/// Only the first hit is used; no hit at all is a normal `Ok(None)`.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Coordinates,
    services::providers::{PlaceDetails, PlacesLookup},
};

const TEXTSEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct GooglePlacesProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GooglePlacesProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, TEXTSEARCH_URL.to_string())
    }

    pub fn with_url(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            api_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<TextSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl From<TextSearchResult> for PlaceDetails {
    fn from(result: TextSearchResult) -> Self {
        PlaceDetails {
            coords: result
                .geometry
                .map(|g| Coordinates::new(g.location.lat, g.location.lng)),
            rating: result.rating,
            review_count: result.user_ratings_total,
            place_id: result.place_id,
        }
    }
}

#[async_trait::async_trait]
impl PlacesLookup for GooglePlacesProvider {
    async fn lookup(&self, name: &str, location_hint: &str) -> AppResult<Option<PlaceDetails>> {
        let query = format!("{} {}", name, location_hint);

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("query", query.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "Places API returned status {}",
                status
            )));
        }

        let parsed: TextSearchResponse = response.json().await?;
        if parsed.status != "OK" {
            tracing::debug!(
                place = %name,
                status = %parsed.status,
                provider = "google_places",
                "Lookup returned no usable result"
            );
            return Ok(None);
        }

        Ok(parsed.results.into_iter().next().map(PlaceDetails::from))
    }

    fn name(&self) -> &'static str {
        "google_places"
    }
}
