//! City guide payload models

use super::poi::PointOfInterest;
use serde::{Deserialize, Serialize};

/// City metadata shown on the guide's landing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub about: String,
}

/// Administrative district; `parent_district` nests sub-districts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub name: String,
    pub parent_district: Option<String>,
}

/// Curated, titled POI collection ("Top 10", "Rainy day", ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiList {
    pub title: String,
    #[serde(default)]
    pub pois: Vec<PointOfInterest>,
}

/// Complete guide payload for one city.
///
/// One instance is active at a time; loading another city replaces it
/// wholesale, never merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityData {
    pub city: CityInfo,
    #[serde(default)]
    pub districts: Vec<District>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
    #[serde(default)]
    pub poi_lists: Vec<PoiList>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS_DUMP: &str = r#"{
        "city": {
            "name": "Paris",
            "country": "France",
            "latitude": 48.8566,
            "longitude": 2.3522,
            "image_url": "https://img.example/paris.jpg",
            "about": "The city of light."
        },
        "districts": [
            {"name": "Le Marais", "parent_district": null},
            {"name": "Haut Marais", "parent_district": "Le Marais"}
        ],
        "points_of_interest": [
            {
                "name": "Louvre",
                "district": "1st",
                "category": "Museum",
                "latitude": 48.8606,
                "longitude": 2.3376,
                "rank": 5
            }
        ],
        "poi_lists": [
            {"title": "Top 10", "pois": []}
        ]
    }"#;

    #[test]
    fn test_city_dump_deserializes() {
        let data: CityData = serde_json::from_str(PARIS_DUMP).expect("dump should parse");
        assert_eq!(data.city.name, "Paris");
        assert_eq!(data.districts.len(), 2);
        assert_eq!(
            data.districts[1].parent_district.as_deref(),
            Some("Le Marais")
        );
        assert_eq!(data.points_of_interest.len(), 1);
        assert_eq!(data.points_of_interest[0].rank, 5);
        assert_eq!(data.poi_lists[0].title, "Top 10");
    }

    #[test]
    fn test_city_dump_tolerates_missing_sections() {
        let data: CityData =
            serde_json::from_str(r#"{"city": {"name": "Nowhere"}}"#).expect("dump should parse");
        assert!(data.districts.is_empty());
        assert!(data.points_of_interest.is_empty());
        assert!(data.poi_lists.is_empty());
        assert!(data.city.latitude.is_none());
    }
}
