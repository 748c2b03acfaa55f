//! Guide entitlement reconciliation
//!
//! The set of owned city guides lives in three places: the local store,
//! the commerce provider's purchase records, and a remote per-user record.
//! Reconciliation is a monotonic union over all three; each sync step
//! fails independently without rolling back the others, and re-running a
//! pass is always safe.

use crate::Result;
use crate::store::GuideStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use tracing::{info, instrument, warn};

/// One completed purchase reported by the commerce provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub product_id: String,
    pub purchased_at: DateTime<Utc>,
}

/// Commerce-side view of the user's completed purchases
#[async_trait]
pub trait PurchaseProvider: Send + Sync {
    /// All purchases the provider knows to be completed for this user.
    async fn completed_purchases(&self) -> Result<Vec<PurchaseRecord>>;
}

/// Remote per-user entitlement record
#[async_trait]
pub trait RemoteEntitlements: Send + Sync {
    /// Entries the remote record lists as owned. Entries may be city
    /// identifiers or store product identifiers.
    async fn owned_cities(&self) -> Result<Vec<String>>;

    /// Add a city to the remote record; idempotent on the remote side.
    async fn record_city(&self, city_id: &str) -> Result<()>;
}

/// Product identifier suffix → city identifier for purchasable guides.
///
/// Store-qualified product ids arrive as `com.vendor.app.guide.paris`;
/// matching is on the trailing guide segment.
static PRODUCT_CITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("guide.amsterdam", "Amsterdam"),
        ("guide.barcelona", "Barcelona"),
        ("guide.berlin", "Berlin"),
        ("guide.lisbon", "Lisbon"),
        ("guide.london", "London"),
        ("guide.madrid", "Madrid"),
        ("guide.paris", "Paris"),
        ("guide.prague", "Prague"),
        ("guide.rome", "Rome"),
        ("guide.vienna", "Vienna"),
    ])
});

/// Map a commerce product id to its city, if the product is known.
#[must_use]
pub fn city_for_product(product_id: &str) -> Option<&'static str> {
    for (product, city) in PRODUCT_CITIES.iter() {
        if product_id == *product || product_id.ends_with(&format!(".{product}")) {
            return Some(*city);
        }
    }
    None
}

/// Monotonic merge of owned-city sets: the union, never smaller than
/// either input. Idempotent, so reconciliation may re-run at any time.
#[must_use]
pub fn merge(local: &BTreeSet<String>, remote: &BTreeSet<String>) -> BTreeSet<String> {
    local.union(remote).cloned().collect()
}

/// Reconciles the owned-cities set across store, commerce provider and
/// remote record
pub struct EntitlementSync {
    store: GuideStore,
    provider: Box<dyn PurchaseProvider>,
    remote: Box<dyn RemoteEntitlements>,
    free_cities: Vec<String>,
    owned: BTreeSet<String>,
}

impl EntitlementSync {
    /// Create a sync service. `free_cities` are guides the app ships
    /// without purchase; they are always owned.
    #[must_use]
    pub fn new(
        store: GuideStore,
        provider: Box<dyn PurchaseProvider>,
        remote: Box<dyn RemoteEntitlements>,
        free_cities: Vec<String>,
    ) -> Self {
        Self {
            store,
            provider,
            remote,
            free_cities,
            owned: BTreeSet::new(),
        }
    }

    /// Cities currently known to be owned.
    #[must_use]
    pub fn owned(&self) -> &BTreeSet<String> {
        &self.owned
    }

    /// Whether a city guide is owned, matched case-insensitively.
    #[must_use]
    pub fn is_owned(&self, city_id: &str) -> bool {
        self.owned
            .iter()
            .any(|city| city.eq_ignore_ascii_case(city_id))
    }

    /// Grant one city on a purchase-completion signal; idempotent.
    #[instrument(skip(self))]
    pub async fn grant(&mut self, city_id: &str) -> Result<()> {
        if !self.owned.insert(city_id.to_string()) {
            return Ok(());
        }
        info!("Granted guide for {}", city_id);
        self.persist().await
    }

    /// One reconciliation pass across store, provider and remote record.
    ///
    /// Every contribution is a union into the owned set; a failing step
    /// logs a warning and the pass continues with the remaining sources.
    #[instrument(skip(self))]
    pub async fn reconcile(&mut self) -> &BTreeSet<String> {
        match self.store.get_owned_cities().await {
            Ok(stored) => self.owned.extend(stored.unwrap_or_default()),
            Err(e) => warn!("Skipping stored owned cities: {}", e),
        }

        self.owned.extend(self.free_cities.iter().cloned());

        match self.provider.completed_purchases().await {
            Ok(purchases) => {
                for purchase in purchases {
                    match city_for_product(&purchase.product_id) {
                        Some(city) => {
                            self.owned.insert(city.to_string());
                        }
                        None => warn!(
                            "Unknown product id in purchase record: {}",
                            purchase.product_id
                        ),
                    }
                }
            }
            Err(e) => warn!("Skipping commerce purchases: {}", e),
        }

        let mut remote_known = BTreeSet::new();
        match self.remote.owned_cities().await {
            Ok(entries) => {
                remote_known = entries
                    .into_iter()
                    .map(|entry| match city_for_product(&entry) {
                        Some(known) => known.to_string(),
                        None => entry,
                    })
                    .collect();
                self.owned = merge(&self.owned, &remote_known);
            }
            Err(e) => warn!("Skipping remote entitlement record: {}", e),
        }

        if let Err(e) = self.persist().await {
            warn!("Failed to persist owned cities: {}", e);
        }

        for city in &self.owned {
            if !remote_known.contains(city) {
                if let Err(e) = self.remote.record_city(city).await {
                    warn!("Failed to record {} remotely: {}", city, e);
                }
            }
        }

        info!(
            "Entitlement reconciliation complete: {} owned cities",
            self.owned.len()
        );
        &self.owned
    }

    async fn persist(&self) -> Result<()> {
        let cities: Vec<String> = self.owned.iter().cloned().collect();
        self.store.put_owned_cities(&cities).await
    }
}
