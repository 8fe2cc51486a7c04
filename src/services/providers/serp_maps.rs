/// SerpAPI Google Maps search provider
///
/// Primary candidate source. One `local_results` entry maps onto one raw
/// [`Candidate`]; anything the engine omits stays `None` and is filled in
/// (or estimated) further down the pipeline.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Candidate, Coordinates},
    services::providers::{QuerySpec, SearchProvider},
};

const REQUEST_TIMEOUT: Duration = Duration::from_millis(1800);
const MAX_RESULTS: usize = 10;

#[derive(Clone)]
pub struct SerpMapsProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl SerpMapsProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
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

/// One entry of SerpAPI's `local_results`
#[derive(Debug, Deserialize)]
struct SerpLocalResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    rating: Option<f32>,
    /// Review count, either a bare number or a "1,024 reviews" string
    #[serde(default)]
    reviews: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    place_type: Option<String>,
    #[serde(default)]
    gps_coordinates: Option<SerpGps>,
    #[serde(default)]
    open_state: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpGps {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct SerpSearchResponse {
    #[serde(default)]
    local_results: Vec<SerpLocalResult>,
}

impl From<SerpLocalResult> for Candidate {
    fn from(result: SerpLocalResult) -> Self {
        Candidate {
            title: result.title,
            place_type: result.place_type,
            rating: result.rating,
            reviews: result.reviews.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            coords: result
                .gps_coordinates
                .map(|gps| Coordinates::new(gps.lat, gps.lng)),
            open_state: result.open_state,
            address: result.address,
            description: result.description,
            url: None,
            place_id: result.place_id,
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for SerpMapsProvider {
    async fn search_places(&self, query: &QuerySpec) -> AppResult<Vec<Candidate>> {
        let ll = format!("@{},{},12z", query.center.lat, query.center.lng);

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("engine", "google_maps"),
                ("q", query.q.as_str()),
                ("api_key", self.api_key.as_str()),
                ("ll", ll.as_str()),
                ("type", "search"),
                ("hl", query.locale.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "SerpAPI returned status {}: {}",
                status, body
            )));
        }

        let parsed: SerpSearchResponse = response.json().await?;

        let candidates: Vec<Candidate> = parsed
            .local_results
            .into_iter()
            .take(MAX_RESULTS)
            .map(Candidate::from)
            .collect();

        tracing::info!(
            query = %query.q,
            results = candidates.len(),
            provider = "serp_maps",
            "Place search completed"
        );

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "serp_maps"
    }
}
