//! `CityGuide` - data services for a city travel-guide application
//!
//! This library provides the data layer shared by the guide's user
//! interfaces: city and point-of-interest models, a persistent store,
//! an in-memory city cache with filtering, favorites, and guide
//! entitlement reconciliation.

pub mod api;
pub mod cache;
pub mod config;
pub mod entitlements;
pub mod error;
pub mod favorites;
pub mod geometry;
pub mod logging;
pub mod models;
pub mod source;
pub mod store;

// Re-export core types for public API
pub use api::CityApiClient;
pub use cache::CityCache;
pub use config::GuideConfig;
pub use entitlements::{EntitlementSync, PurchaseProvider, PurchaseRecord, RemoteEntitlements};
pub use error::GuideError;
pub use favorites::Favorites;
pub use geometry::BoundingBox;
pub use models::{CityData, CityInfo, Coordinate, District, PointOfInterest, PoiKey, PoiList};
pub use source::{BundledSource, CityDataSource};
pub use store::GuideStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GuideError>;
