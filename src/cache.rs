//! In-memory cache over the active city's guide data
//!
//! Holds at most one city at a time. `load` consults the persistent store
//! first and falls back to the configured source on a miss; loading a
//! different city replaces the active data wholesale.

use crate::Result;
use crate::geometry;
use crate::models::{CityData, Coordinate, PointOfInterest, PoiList};
use crate::source::CityDataSource;
use crate::store::GuideStore;
use tracing::{debug, info};

/// Filter value that returns the full POI set unfiltered
pub const ALL_CATEGORIES: &str = "all";

/// Session-scoped cache of one city's guide data with filter views
pub struct CityCache {
    store: GuideStore,
    source: Box<dyn CityDataSource>,
    fallback_center: Coordinate,
    city_id: Option<String>,
    current: Option<CityData>,
}

impl CityCache {
    /// Create a cache over a store and a guide source.
    #[must_use]
    pub fn new(
        store: GuideStore,
        source: Box<dyn CityDataSource>,
        fallback_center: Coordinate,
    ) -> Self {
        Self {
            store,
            source,
            fallback_center,
            city_id: None,
            current: None,
        }
    }

    /// Load a city's guide data and adopt it as current.
    ///
    /// Returns the stored copy when one exists; otherwise fetches from the
    /// configured source and persists the result before adopting it.
    /// Fetch, parse and storage errors propagate unchanged; there is no
    /// retry.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self, city_id: &str) -> Result<&CityData> {
        let data = match self.store.get_city(city_id).await? {
            Some(stored) => {
                debug!("Guide for {} served from store", city_id);
                stored
            }
            None => {
                info!("Guide for {} not stored, fetching", city_id);
                let fetched = self.source.fetch(city_id).await?;
                self.store.put_city(city_id, &fetched).await?;
                fetched
            }
        };

        self.city_id = Some(city_id.to_lowercase());
        Ok(self.current.insert(data))
    }

    /// The active city's guide data, if one is loaded.
    #[must_use]
    pub fn current(&self) -> Option<&CityData> {
        self.current.as_ref()
    }

    /// The active city identifier (lowercased), if one is loaded.
    #[must_use]
    pub fn city_id(&self) -> Option<&str> {
        self.city_id.as_deref()
    }

    fn pois(&self) -> &[PointOfInterest] {
        self.current
            .as_ref()
            .map_or(&[], |data| data.points_of_interest.as_slice())
    }

    /// POIs whose category matches, case-insensitively.
    ///
    /// The literal `"all"` (any case) returns the full set unfiltered, in
    /// original order.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&PointOfInterest> {
        if category.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return self.pois().iter().collect();
        }
        let needle = category.to_lowercase();
        self.pois()
            .iter()
            .filter(|poi| poi.category.to_lowercase() == needle)
            .collect()
    }

    /// POIs within a district, matched case-insensitively.
    #[must_use]
    pub fn by_district(&self, district: &str) -> Vec<&PointOfInterest> {
        let needle = district.to_lowercase();
        self.pois()
            .iter()
            .filter(|poi| poi.district.to_lowercase() == needle)
            .collect()
    }

    /// POIs ranked at or above the given threshold.
    #[must_use]
    pub fn by_min_rank(&self, min_rank: u32) -> Vec<&PointOfInterest> {
        self.pois()
            .iter()
            .filter(|poi| poi.rank >= min_rank)
            .collect()
    }

    /// Case-insensitive substring search over name, category and district.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&PointOfInterest> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.pois()
            .iter()
            .filter(|poi| {
                poi.name.to_lowercase().contains(&needle)
                    || poi.category.to_lowercase().contains(&needle)
                    || poi.district.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Curated POI list lookup by title, case-insensitive.
    #[must_use]
    pub fn poi_list(&self, title: &str) -> Option<&PoiList> {
        self.current.as_ref().and_then(|data| {
            data.poi_lists
                .iter()
                .find(|list| list.title.eq_ignore_ascii_case(title))
        })
    }

    /// Mean coordinate of the active city's valid POIs.
    ///
    /// Returns the configured fallback center when no city is loaded or
    /// no record validates.
    #[must_use]
    pub fn centroid(&self) -> Coordinate {
        geometry::centroid(self.pois(), self.fallback_center)
    }

    /// Drop the active city from memory and from the store.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<()> {
        if let Some(city_id) = self.city_id.take() {
            self.store.clear_city(&city_id).await?;
        }
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CityInfo;
    use crate::source::BundledSource;
    use std::collections::BTreeSet;

    fn poi(name: &str, district: &str, category: &str, rank: u32) -> PointOfInterest {
        PointOfInterest {
            name: name.to_string(),
            district: district.to_string(),
            category: category.to_string(),
            sub_category: String::new(),
            description: String::new(),
            latitude: 48.85,
            longitude: 2.35,
            address: String::new(),
            phone: None,
            website: None,
            image_url: None,
            hours: None,
            rank,
        }
    }

    fn paris() -> CityData {
        CityData {
            city: CityInfo {
                name: "Paris".to_string(),
                country: "France".to_string(),
                latitude: Some(48.8566),
                longitude: Some(2.3522),
                image_url: None,
                about: String::new(),
            },
            districts: vec![],
            points_of_interest: vec![
                poi("Louvre", "1st", "Museum", 5),
                poi("Le Comptoir", "6th", "Restaurant", 3),
                poi("Orsay", "7th", "museum", 4),
            ],
            poi_lists: vec![PoiList {
                title: "Top 10".to_string(),
                pois: vec![],
            }],
        }
    }

    async fn loaded_cache() -> (CityCache, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = GuideStore::open(dir.path()).expect("store should open");
        let source = BundledSource::new().with_city("paris", paris());
        let mut cache = CityCache::new(store, Box::new(source), Coordinate::new(0.0, 0.0));
        cache.load("paris").await.expect("bundled load");
        (cache, dir)
    }

    #[tokio::test]
    async fn test_by_category_all_returns_everything_in_order() {
        let (cache, _dir) = loaded_cache().await;
        let all = cache.by_category("all");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Louvre");
        assert_eq!(all[2].name, "Orsay");

        // Same for mixed case
        assert_eq!(cache.by_category("ALL").len(), 3);
    }

    #[tokio::test]
    async fn test_by_category_is_case_insensitive_and_partitions() {
        let (cache, _dir) = loaded_cache().await;
        let museums = cache.by_category("MUSEUM");
        assert_eq!(museums.len(), 2);

        // Union over distinct categories reconstructs the set exactly
        let categories: BTreeSet<String> = cache
            .by_category("all")
            .iter()
            .map(|poi| poi.category.to_lowercase())
            .collect();
        let total: usize = categories
            .iter()
            .map(|category| cache.by_category(category).len())
            .sum();
        assert_eq!(total, cache.by_category("all").len());
    }

    #[tokio::test]
    async fn test_by_district_and_min_rank() {
        let (cache, _dir) = loaded_cache().await;
        assert_eq!(cache.by_district("6TH").len(), 1);
        assert_eq!(cache.by_min_rank(4).len(), 2);
        assert_eq!(cache.by_min_rank(0).len(), 3);
        assert!(cache.by_min_rank(6).is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_name_category_and_district() {
        let (cache, _dir) = loaded_cache().await;
        assert_eq!(cache.search("louvre").len(), 1);
        assert_eq!(cache.search("museum").len(), 2);
        assert_eq!(cache.search("6th").len(), 1);
        assert!(cache.search("  ").is_empty());
        assert!(cache.search("nowhere").is_empty());
    }

    #[tokio::test]
    async fn test_poi_list_lookup() {
        let (cache, _dir) = loaded_cache().await;
        assert!(cache.poi_list("top 10").is_some());
        assert!(cache.poi_list("Rainy day").is_none());
    }

    #[tokio::test]
    async fn test_filters_before_load_are_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = GuideStore::open(dir.path()).expect("store should open");
        let cache = CityCache::new(
            store,
            Box::new(BundledSource::new()),
            Coordinate::new(47.0, 8.0),
        );
        assert!(cache.by_category("all").is_empty());
        assert!(cache.current().is_none());
        assert_eq!(cache.centroid(), Coordinate::new(47.0, 8.0));
    }

    #[tokio::test]
    async fn test_clear_drops_memory_and_store() {
        let (mut cache, _dir) = loaded_cache().await;
        cache.clear().await.expect("clear");
        assert!(cache.current().is_none());
        assert!(cache.city_id().is_none());
        assert!(cache.by_category("all").is_empty());

        // The stored blob is gone as well, so a reload must hit the source
        cache.load("paris").await.expect("reload from source");
        assert_eq!(cache.current().expect("loaded").city.name, "Paris");
    }
}
