//! Observable favorites, persisted per city
//!
//! Mutations write through to the store and only commit in memory once
//! storage acknowledges, so memory never runs ahead of disk. Subscribers
//! receive each committed list over a watch channel.

use crate::Result;
use crate::error::GuideError;
use crate::models::PointOfInterest;
use crate::store::GuideStore;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Per-city favorites list, keyed by `(name, district)`
pub struct Favorites {
    store: GuideStore,
    city_id: Option<String>,
    items: Vec<PointOfInterest>,
    publisher: watch::Sender<Vec<PointOfInterest>>,
}

impl Favorites {
    /// Create a favorites service with no city loaded.
    #[must_use]
    pub fn new(store: GuideStore) -> Self {
        let (publisher, _) = watch::channel(Vec::new());
        Self {
            store,
            city_id: None,
            items: Vec::new(),
            publisher,
        }
    }

    /// Replace the in-memory state with the stored favorites for a city.
    #[instrument(skip(self))]
    pub async fn load(&mut self, city_id: &str) -> Result<()> {
        let stored = self.store.get_favorites(city_id).await?.unwrap_or_default();
        debug!("Loaded {} favorites for {}", stored.len(), city_id);
        self.city_id = Some(city_id.to_lowercase());
        self.commit(stored);
        Ok(())
    }

    /// Add a POI to the current city's favorites.
    ///
    /// No-op when the `(name, district)` key is already present. The new
    /// list is persisted before memory updates; a storage failure leaves
    /// the current state untouched.
    pub async fn add(&mut self, poi: &PointOfInterest) -> Result<()> {
        if self.is_favorite(poi) {
            return Ok(());
        }
        let city_id = self.loaded_city()?;
        let mut candidate = self.items.clone();
        candidate.push(poi.clone());
        self.store.put_favorites(&city_id, &candidate).await?;
        self.commit(candidate);
        Ok(())
    }

    /// Remove a POI from the current city's favorites.
    ///
    /// No-op when the key is absent; commits like [`Favorites::add`].
    pub async fn remove(&mut self, poi: &PointOfInterest) -> Result<()> {
        if !self.is_favorite(poi) {
            return Ok(());
        }
        let city_id = self.loaded_city()?;
        let target = poi.key();
        let mut candidate = self.items.clone();
        candidate.retain(|item| item.key() != target);
        self.store.put_favorites(&city_id, &candidate).await?;
        self.commit(candidate);
        Ok(())
    }

    /// Membership by `(name, district)` key against the current city.
    #[must_use]
    pub fn is_favorite(&self, poi: &PointOfInterest) -> bool {
        let key = poi.key();
        self.items.iter().any(|item| item.key() == key)
    }

    /// Current favorites in insertion order.
    #[must_use]
    pub fn all(&self) -> &[PointOfInterest] {
        &self.items
    }

    /// Watch the committed favorites list. The receiver starts with the
    /// current state and sees every committed mutation afterwards.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<PointOfInterest>> {
        self.publisher.subscribe()
    }

    fn loaded_city(&self) -> Result<String> {
        self.city_id
            .clone()
            .ok_or_else(|| GuideError::validation("No city loaded for favorites"))
    }

    fn commit(&mut self, items: Vec<PointOfInterest>) {
        self.items = items;
        self.publisher.send_replace(self.items.clone());
    }
}
