/// Google Routes API provider
///
/// The precision tier of the travel-time cascade. Speaks the
/// `computeRoutes` endpoint: origin/destination either as free-text
/// addresses or as lat/lng, durations come back as `"1519s"` strings.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::providers::{RouteEndpoint, RouteLeg, RoutingProvider, TravelMode},
};

const ROUTES_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";
const FIELD_MASK: &str = "routes.duration,routes.distanceMeters";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone)]
pub struct GoogleRoutesProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GoogleRoutesProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, ROUTES_URL.to_string())
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

    fn endpoint_payload(endpoint: &RouteEndpoint) -> serde_json::Value {
        match endpoint {
            RouteEndpoint::Address(address) => json!({ "address": address }),
            RouteEndpoint::Point(coords) => json!({
                "location": {
                    "latLng": { "latitude": coords.lat, "longitude": coords.lng }
                }
            }),
        }
    }

    fn mode_name(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Walk => "WALK",
            TravelMode::Drive => "DRIVE",
            TravelMode::Transit => "TRANSIT",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoutesResponse {
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    #[serde(default)]
    duration: Option<String>,
    #[serde(rename = "distanceMeters", default)]
    distance_meters: Option<u32>,
}

/// Parses the API's `"1519s"` duration form into whole minutes, floored
/// at one minute
fn duration_minutes(duration: &str) -> Option<u32> {
    let seconds: u32 = duration.strip_suffix('s')?.parse().ok()?;
    Some((seconds / 60).max(1))
}

#[async_trait::async_trait]
impl RoutingProvider for GoogleRoutesProvider {
    async fn route(
        &self,
        origin: &RouteEndpoint,
        destination: &RouteEndpoint,
        mode: TravelMode,
    ) -> AppResult<RouteLeg> {
        let mut payload = json!({
            "origin": Self::endpoint_payload(origin),
            "destination": Self::endpoint_payload(destination),
            "travelMode": Self::mode_name(mode),
        });
        // routingPreference is only legal for DRIVE
        if mode == TravelMode::Drive {
            payload["routingPreference"] = json!("TRAFFIC_AWARE");
        }

        let response = self
            .http_client
            .post(&self.api_url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "Routes API returned status {}",
                status
            )));
        }

        let parsed: RoutesResponse = response.json().await?;
        let route = parsed
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ExternalApi("Routes API returned no routes".to_string()))?;

        let duration_min = route
            .duration
            .as_deref()
            .and_then(duration_minutes)
            .ok_or_else(|| AppError::ExternalApi("Routes API returned no duration".to_string()))?;

        Ok(RouteLeg {
            duration_min,
            distance_meters: route.distance_meters.unwrap_or(0),
        })
    }

    fn name(&self) -> &'static str {
        "google_routes"
    }
}
