//! HTTP client for the guide content API
//!
//! Retrieves complete city dumps as JSON. Failures propagate to the
//! caller unchanged; there is no retry at this layer.

use crate::Result;
use crate::config::ApiConfig;
use crate::error::GuideError;
use crate::models::CityData;
use crate::source::CityDataSource;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

/// Client for the guide content API
pub struct CityApiClient {
    client: Client,
    base_url: String,
}

impl CityApiClient {
    /// Create a new client from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GuideError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn dump_url(&self, city_id: &str) -> String {
        format!(
            "{}/city/{}/dump/",
            self.base_url,
            urlencoding::encode(&city_id.to_lowercase())
        )
    }
}

#[async_trait]
impl CityDataSource for CityApiClient {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, city_id: &str) -> Result<CityData> {
        let url = self.dump_url(city_id);
        debug!("City dump request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GuideError::network(format!("City dump request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(
                "City dump request for {} returned {}: {}",
                city_id, status, body
            );
            return Err(GuideError::network(format!(
                "Guide API error {status} for city {city_id}"
            )));
        }

        let data: CityData = response.json().await.map_err(|e| {
            GuideError::parse(format!("Failed to parse city dump for {city_id}: {e}"))
        })?;

        info!(
            "Fetched guide for {} with {} points of interest",
            data.city.name,
            data.points_of_interest.len()
        );
        Ok(data)
    }
}
