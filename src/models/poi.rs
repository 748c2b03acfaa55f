//! Point-of-interest model and coordinate validation

use serde::{Deserialize, Deserializer, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// De-duplication identity for a POI: the `(name, district)` pair.
///
/// Not globally unique across a guide; an accepted limitation of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoiKey {
    pub name: String,
    pub district: String,
}

/// A single place record within a city guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub description: String,
    /// Latitude in decimal degrees; NaN when the feed value is unusable
    #[serde(default = "unusable", deserialize_with = "lenient_coordinate")]
    pub latitude: f64,
    /// Longitude in decimal degrees; NaN when the feed value is unusable
    #[serde(default = "unusable", deserialize_with = "lenient_coordinate")]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub hours: Option<String>,
    #[serde(default)]
    pub rank: u32,
}

impl PointOfInterest {
    /// Whether both coordinates are numeric and within WGS84 range.
    ///
    /// Records failing this check stay in list views but are excluded
    /// from map rendering and geometry operations.
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// De-duplication key for this record
    #[must_use]
    pub fn key(&self) -> PoiKey {
        PoiKey {
            name: self.name.clone(),
            district: self.district.clone(),
        }
    }

    /// The record's coordinate pair (possibly invalid)
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

fn unusable() -> f64 {
    f64::NAN
}

/// The upstream feed is inconsistently typed: coordinates arrive as JSON
/// numbers, numeric strings, or null. Unusable values become NaN and are
/// filtered by `has_valid_coordinates`.
///
/// Binary formats (the local store) write coordinates as plain floats, so
/// the lenient path only applies to self-describing input.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    if !deserializer.is_human_readable() {
        return f64::deserialize(deserializer);
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => value,
        Some(Raw::Text(text)) => text.trim().parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn poi_from_json(json: &str) -> PointOfInterest {
        serde_json::from_str(json).expect("POI should deserialize")
    }

    #[test]
    fn test_lenient_coordinates_accept_numbers_and_strings() {
        let poi = poi_from_json(r#"{"name": "Louvre", "latitude": 48.8606, "longitude": "2.3376"}"#);
        assert_eq!(poi.latitude, 48.8606);
        assert_eq!(poi.longitude, 2.3376);
    }

    #[test]
    fn test_lenient_coordinates_null_and_missing_become_nan() {
        let poi = poi_from_json(r#"{"name": "Mystery", "latitude": null}"#);
        assert!(poi.latitude.is_nan());
        assert!(poi.longitude.is_nan());
        assert!(!poi.has_valid_coordinates());
    }

    #[test]
    fn test_lenient_coordinates_garbage_string_becomes_nan() {
        let poi = poi_from_json(r#"{"name": "Typo", "latitude": "48,86", "longitude": 2.33}"#);
        assert!(poi.latitude.is_nan());
        assert!(!poi.has_valid_coordinates());
    }

    #[rstest]
    #[case(48.85, 2.35, true)]
    #[case(-90.0, -180.0, true)]
    #[case(90.0, 180.0, true)]
    #[case(91.0, 0.0, false)]
    #[case(0.0, 180.5, false)]
    #[case(f64::NAN, 2.35, false)]
    #[case(48.85, f64::INFINITY, false)]
    fn test_coordinate_validation(#[case] lat: f64, #[case] lon: f64, #[case] valid: bool) {
        let poi = PointOfInterest {
            name: "Test".to_string(),
            district: String::new(),
            category: String::new(),
            sub_category: String::new(),
            description: String::new(),
            latitude: lat,
            longitude: lon,
            address: String::new(),
            phone: None,
            website: None,
            image_url: None,
            hours: None,
            rank: 0,
        };
        assert_eq!(poi.has_valid_coordinates(), valid);
    }

    #[test]
    fn test_key_identity_is_name_and_district() {
        let a = poi_from_json(r#"{"name": "Cafe Central", "district": "Innere Stadt"}"#);
        let mut b = a.clone();
        b.category = "cafe".to_string();
        assert_eq!(a.key(), b.key());

        b.district = "Leopoldstadt".to_string();
        assert_ne!(a.key(), b.key());
    }
}
