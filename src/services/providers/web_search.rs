/// Bing Web Search provider
///
/// Secondary candidate source, only consulted when the maps provider
/// comes back thin. Web hits carry no coordinates or ratings; the
/// normalizer routes them through the places lookup and the
/// distance-estimation tier.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Candidate,
    services::providers::{QuerySpec, SearchProvider},
};

const REQUEST_TIMEOUT: Duration = Duration::from_millis(1200);
const MAX_RESULTS: usize = 10;

#[derive(Clone)]
pub struct WebSearchProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl WebSearchProvider {
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

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages", default)]
    web_pages: Option<BingWebPages>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingPage>,
}

#[derive(Debug, Deserialize)]
struct BingPage {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl From<BingPage> for Candidate {
    fn from(page: BingPage) -> Self {
        Candidate {
            title: page.name,
            description: page.snippet,
            url: page.url,
            ..Candidate::default()
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for WebSearchProvider {
    async fn search_places(&self, query: &QuerySpec) -> AppResult<Vec<Candidate>> {
        let response = self
            .http_client
            .get(&self.api_url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("q", query.q.as_str()),
                ("count", "10"),
                ("mkt", query.locale.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Bing API returned status {}: {}",
                status, body
            )));
        }

        let parsed: BingResponse = response.json().await?;

        let candidates: Vec<Candidate> = parsed
            .web_pages
            .map(|pages| pages.value)
            .unwrap_or_default()
            .into_iter()
            .take(MAX_RESULTS)
            .map(Candidate::from)
            .collect();

        tracing::info!(
            query = %query.q,
            results = candidates.len(),
            provider = "web_search",
            "Web search completed"
        );

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "web_search"
    }
}
