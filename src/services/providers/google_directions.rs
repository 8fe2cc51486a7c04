/// Google Directions API provider
///
/// The simpler middle tier of the travel-time cascade: free quota, plain
/// GET, status field in the body. Coordinates are serialized as
/// "lat,lng" strings since the endpoint takes both forms in one
/// parameter.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::{RouteEndpoint, RouteLeg, RoutingProvider, TravelMode},
};

const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone)]
pub struct GoogleDirectionsProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GoogleDirectionsProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DIRECTIONS_URL.to_string())
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

    fn endpoint_param(endpoint: &RouteEndpoint) -> String {
        match endpoint {
            RouteEndpoint::Address(address) => address.clone(),
            RouteEndpoint::Point(coords) => format!("{},{}", coords.lat, coords.lng),
        }
    }

    fn mode_name(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Walk => "walking",
            TravelMode::Drive => "driving",
            TravelMode::Transit => "transit",
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    duration: ValueField,
    distance: ValueField,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    /// Seconds for durations, meters for distances
    value: u32,
}

#[async_trait::async_trait]
impl RoutingProvider for GoogleDirectionsProvider {
    async fn route(
        &self,
        origin: &RouteEndpoint,
        destination: &RouteEndpoint,
        mode: TravelMode,
    ) -> AppResult<RouteLeg> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("origin", Self::endpoint_param(origin).as_str()),
                ("destination", Self::endpoint_param(destination).as_str()),
                ("mode", Self::mode_name(mode)),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "Directions API returned status {}",
                status
            )));
        }

        let parsed: DirectionsResponse = response.json().await?;
        if parsed.status != "OK" {
            return Err(AppError::ExternalApi(format!(
                "Directions API status {}",
                parsed.status
            )));
        }

        let leg = parsed
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .ok_or_else(|| AppError::ExternalApi("Directions API returned no legs".to_string()))?;

        Ok(RouteLeg {
            duration_min: (leg.duration.value / 60).max(1),
            distance_meters: leg.distance.value,
        })
    }

    fn name(&self) -> &'static str {
        "google_directions"
    }
}
