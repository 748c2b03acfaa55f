//! Data models for cities and points of interest

mod city;
mod poi;

pub use city::{CityData, CityInfo, District, PoiList};
pub use poi::{Coordinate, PointOfInterest, PoiKey};
