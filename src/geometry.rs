//! Geometry utilities over point-of-interest collections
//!
//! Pure functions. Records without valid coordinates are skipped rather
//! than raised; coordinate validation never fails a caller.

use crate::models::{Coordinate, PointOfInterest};
use std::cmp::Ordering;

/// Minimal axis-aligned lat/lng rectangle containing a POI set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

/// Reduce a POI collection to its bounding box.
///
/// Returns `None` when no record carries valid coordinates; callers must
/// handle the absence explicitly instead of assuming a box exists. A set
/// of identical coordinates yields a zero-area box.
#[must_use]
pub fn bounding_box(pois: &[PointOfInterest]) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    for poi in pois.iter().filter(|poi| poi.has_valid_coordinates()) {
        match bounds.as_mut() {
            Some(b) => {
                b.min_lng = b.min_lng.min(poi.longitude);
                b.max_lng = b.max_lng.max(poi.longitude);
                b.min_lat = b.min_lat.min(poi.latitude);
                b.max_lat = b.max_lat.max(poi.latitude);
            }
            None => {
                bounds = Some(BoundingBox {
                    min_lng: poi.longitude,
                    max_lng: poi.longitude,
                    min_lat: poi.latitude,
                    max_lat: poi.latitude,
                });
            }
        }
    }
    bounds
}

/// Arithmetic mean coordinate of all valid POIs, used as a default map
/// center. Returns `fallback` when nothing validates; never NaN.
#[must_use]
pub fn centroid(pois: &[PointOfInterest], fallback: Coordinate) -> Coordinate {
    let mut lat_sum = 0.0;
    let mut lng_sum = 0.0;
    let mut count: u32 = 0;

    for poi in pois.iter().filter(|poi| poi.has_valid_coordinates()) {
        lat_sum += poi.latitude;
        lng_sum += poi.longitude;
        count += 1;
    }

    if count == 0 {
        return fallback;
    }
    Coordinate::new(lat_sum / f64::from(count), lng_sum / f64::from(count))
}

/// Great-circle distance between two coordinates in kilometers
#[must_use]
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        haversine::Location {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        haversine::Units::Kilometers,
    )
}

/// Sort POIs by great-circle distance from an origin, nearest first.
///
/// Records without valid coordinates sort after every valid record and
/// keep their relative order.
#[must_use]
pub fn sort_by_distance(pois: &[PointOfInterest], origin: Coordinate) -> Vec<PointOfInterest> {
    let mut keyed: Vec<(PointOfInterest, Option<f64>)> = pois
        .iter()
        .map(|poi| {
            let distance = poi
                .has_valid_coordinates()
                .then(|| distance_km(poi.coordinate(), origin));
            (poi.clone(), distance)
        })
        .collect();

    keyed.sort_by(|a, b| match (a.1, b.1) {
        (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(poi, _)| poi).collect()
}
