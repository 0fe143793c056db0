use crate::app_config::Api;
use crate::domain::Itinerary;
use crate::itinerary::serialized_route::SerializedRoute;
use crate::itinerary::source::{ItineraryError, ItinerarySource};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, instrument};

const RETRY_ATTEMPTS: usize = 3;

/// Request/response route lookup against the route catalog service.
pub struct HttpItinerarySource {
    client: Client,
    base_url: String,
    retry_ms: u64,
    retry_max_delay: Duration,
}

impl HttpItinerarySource {
    pub fn new(api: &Api) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(api.request_timeout_ms()).build()?;

        Ok(HttpItinerarySource {
            client,
            base_url: api.url().trim_end_matches('/').to_string(),
            retry_ms: api.retry_ms(),
            retry_max_delay: api.retry_max_delay_ms(),
        })
    }

    /// Fetches with exponential backoff on transient failures; a not-found is
    /// final and never retried.
    async fn fetch_text(&self, url: &str) -> Result<String, reqwest::Error> {
        let strategy = ExponentialBackoff::from_millis(self.retry_ms)
            .factor(2)
            .max_delay(self.retry_max_delay)
            .map(jitter)
            .take(RETRY_ATTEMPTS);

        RetryIf::spawn(
            strategy,
            || async { self.client.get(url).send().await?.error_for_status()?.text().await },
            |error: &reqwest::Error| error.status() != Some(StatusCode::NOT_FOUND),
        )
        .await
    }
}

#[async_trait]
impl ItinerarySource for HttpItinerarySource {
    #[instrument(skip(self))]
    async fn itinerary(&self, route_id: &str) -> Result<Itinerary, ItineraryError> {
        info!("🗺️ Retrieving route '{}'...", route_id);

        let url = format!("{}/routes/{}", self.base_url, route_id);
        let body = self.fetch_text(&url).await.map_err(|error| {
            if error.status() == Some(StatusCode::NOT_FOUND) {
                ItineraryError::MissingData(route_id.to_string())
            } else {
                ItineraryError::Http(error)
            }
        })?;

        let route = serde_json::from_str::<SerializedRoute>(&body).map_err(|source| ItineraryError::Malformed { source, path: None })?;
        let route_name = route.name.clone();

        let itinerary = route.into_itinerary();
        if itinerary.is_empty() {
            return Err(ItineraryError::MissingData(route_id.to_string()));
        }

        info!("🗺️ Retrieving route '{}'... OK, '{}' with {} waypoint(s)", route_id, route_name, itinerary.waypoint_count());
        Ok(itinerary)
    }

    #[instrument(skip(self))]
    async fn keyframes(&self, asset_ref: &str) -> Result<String, ItineraryError> {
        let url = format!("{}/assets/{}", self.base_url, asset_ref);
        Ok(self.fetch_text(&url).await?)
    }
}
