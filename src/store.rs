//! Persistent key-value store for guide data
//!
//! City dumps, favorites and the owned-cities set live in an embedded
//! fjall keyspace, encoded with postcard. Every storage call runs on the
//! blocking pool so async callers never stall the runtime. Entries carry
//! no expiry; they persist until explicitly removed or cleared.

use crate::Result;
use crate::error::GuideError;
use crate::models::{CityData, PointOfInterest};
use fjall::Keyspace;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use tokio::task;

const OWNED_CITIES_KEY: &str = "owned_cities";

fn city_key(city_id: &str) -> Vec<u8> {
    format!("city_{}", city_id.to_lowercase()).into_bytes()
}

fn favorites_key(city_id: &str) -> Vec<u8> {
    format!("favorites_{}", city_id.to_lowercase()).into_bytes()
}

fn storage_error(context: &str, error: impl std::fmt::Display) -> GuideError {
    GuideError::storage(format!("{context}: {error}"))
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    let value = store
        .get(key)
        .map_err(|e| storage_error("Failed to read stored value", e))?;
    Ok(value.map(|v| v.to_vec()))
}

/// Durable store for guide blobs, keyed per city.
///
/// Cloning is cheap and clones share the same underlying keyspace, so one
/// open store can back several services in a session.
#[derive(Clone)]
pub struct GuideStore {
    store: Keyspace,
}

impl GuideStore {
    /// Open (or create) the store under the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path)
            .open()
            .map_err(|e| storage_error("Failed to open store database", e))?;
        let entries = db
            .keyspace("guide", fjall::KeyspaceCreateOptions::default)
            .map_err(|e| storage_error("Failed to open guide keyspace", e))?;
        Ok(GuideStore { store: entries })
    }

    /// Persist a serializable value under a key.
    async fn put_raw<T: Serialize>(&self, key: Vec<u8>, value: &T) -> Result<()> {
        let bytes =
            postcard::to_stdvec(value).map_err(|e| storage_error("Failed to encode value", e))?;
        let store = self.store.clone();
        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(|e| storage_error("Storage task failed", e))?
            .map_err(|e| storage_error("Failed to write value", e))?;
        Ok(())
    }

    /// Retrieve and decode a value; `None` when the key is absent.
    async fn get_raw<T: DeserializeOwned>(&self, key: Vec<u8>) -> Result<Option<T>> {
        let store = self.store.clone();
        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key))
                .await
                .map_err(|e| storage_error("Storage task failed", e))??;

        match maybe_bytes {
            Some(bytes) => {
                let value = postcard::from_bytes(&bytes)
                    .map_err(|e| storage_error("Failed to decode stored value", e))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn remove_raw(&self, key: Vec<u8>) -> Result<()> {
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(|e| storage_error("Storage task failed", e))?
            .map_err(|e| storage_error("Failed to remove value", e))?;
        Ok(())
    }

    /// Persist a city's guide payload.
    #[tracing::instrument(name = "put_city", level = "debug", skip(self, data))]
    pub async fn put_city(&self, city_id: &str, data: &CityData) -> Result<()> {
        self.put_raw(city_key(city_id), data).await
    }

    /// Retrieve a city's guide payload, if stored.
    #[tracing::instrument(name = "get_city", level = "debug", skip(self))]
    pub async fn get_city(&self, city_id: &str) -> Result<Option<CityData>> {
        self.get_raw(city_key(city_id)).await
    }

    /// Remove a city's guide payload.
    pub async fn remove_city(&self, city_id: &str) -> Result<()> {
        self.remove_raw(city_key(city_id)).await
    }

    /// Persist a city's favorites list.
    #[tracing::instrument(name = "put_favorites", level = "debug", skip(self, favorites))]
    pub async fn put_favorites(
        &self,
        city_id: &str,
        favorites: &[PointOfInterest],
    ) -> Result<()> {
        self.put_raw(favorites_key(city_id), &favorites).await
    }

    /// Retrieve a city's favorites list, if stored.
    #[tracing::instrument(name = "get_favorites", level = "debug", skip(self))]
    pub async fn get_favorites(&self, city_id: &str) -> Result<Option<Vec<PointOfInterest>>> {
        self.get_raw(favorites_key(city_id)).await
    }

    /// Persist the owned-cities set.
    pub async fn put_owned_cities(&self, cities: &[String]) -> Result<()> {
        self.put_raw(OWNED_CITIES_KEY.into(), &cities).await
    }

    /// Retrieve the owned-cities set, if stored.
    pub async fn get_owned_cities(&self) -> Result<Option<Vec<String>>> {
        self.get_raw(OWNED_CITIES_KEY.into()).await
    }

    /// Drop everything stored for one city: its guide payload and its
    /// favorites.
    #[tracing::instrument(name = "clear_city", level = "debug", skip(self))]
    pub async fn clear_city(&self, city_id: &str) -> Result<()> {
        self.remove_raw(city_key(city_id)).await?;
        self.remove_raw(favorites_key(city_id)).await?;
        Ok(())
    }
}
