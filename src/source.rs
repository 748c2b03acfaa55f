//! City data sources
//!
//! A guide payload comes either from the network ([`crate::CityApiClient`])
//! or from data bundled with the application, behind one async abstraction
//! so the cache does not care which is configured.

use crate::Result;
use crate::error::GuideError;
use crate::models::CityData;
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of complete city guide payloads
#[async_trait]
pub trait CityDataSource: Send + Sync {
    /// Fetch the full guide payload for a city identifier.
    async fn fetch(&self, city_id: &str) -> Result<CityData>;
}

/// In-memory fallback used when the application ships its guides bundled
/// and is configured to avoid the network.
#[derive(Default)]
pub struct BundledSource {
    cities: HashMap<String, CityData>,
}

impl BundledSource {
    /// Create an empty bundled source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundled payload under a city identifier.
    #[must_use]
    pub fn with_city(mut self, city_id: &str, data: CityData) -> Self {
        self.cities.insert(city_id.to_lowercase(), data);
        self
    }

    /// Parse and register a bundled JSON dump.
    pub fn with_city_json(self, city_id: &str, json: &str) -> Result<Self> {
        let data = serde_json::from_str(json).map_err(|e| {
            GuideError::parse(format!("Bundled guide for {city_id} is malformed: {e}"))
        })?;
        Ok(self.with_city(city_id, data))
    }
}

#[async_trait]
impl CityDataSource for BundledSource {
    async fn fetch(&self, city_id: &str) -> Result<CityData> {
        self.cities
            .get(&city_id.to_lowercase())
            .cloned()
            .ok_or_else(|| GuideError::validation(format!("No bundled guide for city: {city_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CityInfo;

    fn tiny_city(name: &str) -> CityData {
        CityData {
            city: CityInfo {
                name: name.to_string(),
                country: String::new(),
                latitude: None,
                longitude: None,
                image_url: None,
                about: String::new(),
            },
            districts: vec![],
            points_of_interest: vec![],
            poi_lists: vec![],
        }
    }

    #[tokio::test]
    async fn test_bundled_fetch_is_case_insensitive() {
        let source = BundledSource::new().with_city("Paris", tiny_city("Paris"));
        let data = source.fetch("PARIS").await.expect("bundled hit");
        assert_eq!(data.city.name, "Paris");
    }

    #[tokio::test]
    async fn test_bundled_fetch_unknown_city_fails() {
        let source = BundledSource::new();
        let result = source.fetch("Atlantis").await;
        assert!(matches!(result, Err(GuideError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_bundled_json_registration() {
        let source = BundledSource::new()
            .with_city_json("lisbon", r#"{"city": {"name": "Lisbon"}}"#)
            .expect("valid JSON");
        let data = source.fetch("lisbon").await.expect("bundled hit");
        assert_eq!(data.city.name, "Lisbon");

        let bad = BundledSource::new().with_city_json("oops", "{not json");
        assert!(matches!(bad, Err(GuideError::Parse { .. })));
    }
}
