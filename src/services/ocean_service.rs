use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::AppError;

pub const DEFAULT_DATE: &str = "2024-01-01";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Place {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
    pub country: String,
    pub region: String,
    pub city: String,
}

struct KnownPlace {
    lat: f64,
    lon: f64,
    place_name: &'static str,
    country: &'static str,
    region: &'static str,
    city: &'static str,
}

const POPULAR_PLACES: [(&str, f64, f64); 10] = [
    ("Monterey Bay", 36.7783, -119.4179),
    ("Great Barrier Reef", -18.2871, 147.6992),
    ("Maldives", 3.2028, 73.2207),
    ("Hawaiian Islands", 19.8968, -155.5828),
    ("Mediterranean Sea", 35.0, 18.0),
    ("Caribbean Sea", 15.0, -75.0),
    ("Red Sea", 22.0, 38.0),
    ("Bermuda Triangle", 25.0, -71.0),
    ("Mariana Trench", 11.35, 142.2),
    ("Antarctic Ocean", -60.0, 0.0),
];

lazy_static! {
    /// Lowercase query -> known place
    static ref GEOCODING: HashMap<&'static str, KnownPlace> = {
        let entries = [
            ("miami beach", KnownPlace { lat: 25.7907, lon: -80.1300, place_name: "Miami Beach, FL, USA", country: "USA", region: "Florida", city: "Miami Beach" }),
            ("monterey bay", KnownPlace { lat: 36.7783, lon: -119.4179, place_name: "Monterey Bay, CA, USA", country: "USA", region: "California", city: "Monterey" }),
            ("great barrier reef", KnownPlace { lat: -18.2871, lon: 147.6992, place_name: "Great Barrier Reef, Australia", country: "Australia", region: "Queensland", city: "Cairns" }),
            ("maldives", KnownPlace { lat: 3.2028, lon: 73.2207, place_name: "Maldives", country: "Maldives", region: "Indian Ocean", city: "Malé" }),
            ("hawaii", KnownPlace { lat: 19.8968, lon: -155.5828, place_name: "Hawaiian Islands, USA", country: "USA", region: "Hawaii", city: "Honolulu" }),
            ("mediterranean", KnownPlace { lat: 35.0, lon: 18.0, place_name: "Mediterranean Sea", country: "International Waters", region: "Mediterranean", city: "Mediterranean Sea" }),
            ("caribbean", KnownPlace { lat: 15.0, lon: -75.0, place_name: "Caribbean Sea", country: "International Waters", region: "Caribbean", city: "Caribbean Sea" }),
            ("red sea", KnownPlace { lat: 22.0, lon: 38.0, place_name: "Red Sea", country: "International Waters", region: "Red Sea", city: "Red Sea" }),
            ("bermuda", KnownPlace { lat: 25.0, lon: -71.0, place_name: "Bermuda Triangle", country: "International Waters", region: "North Atlantic", city: "Bermuda Triangle" }),
            ("mariana trench", KnownPlace { lat: 11.35, lon: 142.2, place_name: "Mariana Trench", country: "International Waters", region: "Pacific Ocean", city: "Mariana Trench" }),
        ];
        entries.into_iter().collect()
    };
}

pub fn popular_places() -> Vec<Place> {
    POPULAR_PLACES
        .iter()
        .map(|(name, lat, lon)| Place {
            name: name.to_string(),
            lat: *lat,
            lon: *lon,
        })
        .collect()
}

pub fn geocode(place: &str) -> Result<GeocodeResult, AppError> {
    let key = place.trim().to_lowercase();
    if key.is_empty() {
        return Err(AppError::InvalidRequest("Place parameter is required".to_string()));
    }

    GEOCODING
        .get(key.as_str())
        .map(|p| GeocodeResult {
            latitude: p.lat,
            longitude: p.lon,
            place_name: p.place_name.to_string(),
            country: p.country.to_string(),
            region: p.region.to_string(),
            city: p.city.to_string(),
        })
        .ok_or_else(|| AppError::NotFound(format!("Place '{}' not found in our database", place.trim())))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DepthProfile {
    pub surface: f64,
    pub depth_100m: f64,
    pub depth_500m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Plankton {
    pub chlorophyll_a: f64,
    pub phytoplankton_biomass: f64,
    pub zooplankton_biomass: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WaterQualityReading {
    pub ph: f64,
    pub dissolved_oxygen: f64,
    pub turbidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Currents {
    pub surface_speed: f64,
    pub surface_direction: f64,
    pub deep_current_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Waves {
    pub height: f64,
    pub period: f64,
    pub direction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Bathymetry {
    pub depth: f64,
    pub seafloor_type: String,
}

/// Demonstration conditions for a coordinate. Deterministic in lat/lon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OceanConditions {
    pub coordinates: Coordinates,
    pub temperature: DepthProfile,
    pub salinity: DepthProfile,
    pub plankton: Plankton,
    pub water_quality: WaterQualityReading,
    pub ocean_currents: Currents,
    pub wave_data: Waves,
    pub bathymetry: Bathymetry,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn ocean_conditions(lat: f64, lon: f64, date: Option<&str>) -> Result<OceanConditions, AppError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::InvalidRequest("lat must be between -90 and 90".to_string()));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::InvalidRequest("lon must be between -180 and 180".to_string()));
    }

    let date = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DATE)
        .to_string();

    Ok(OceanConditions {
        coordinates: Coordinates { latitude: lat, longitude: lon, date },
        temperature: DepthProfile {
            surface: round_to(20.0 + lat * 0.1 + lon * 0.05, 1),
            depth_100m: round_to(15.0 + lat * 0.08 + lon * 0.03, 1),
            depth_500m: round_to(8.0 + lat * 0.05 + lon * 0.02, 1),
        },
        salinity: DepthProfile {
            surface: round_to(35.0 + lat * 0.01, 2),
            depth_100m: round_to(35.2 + lat * 0.008, 2),
            depth_500m: round_to(34.8 + lat * 0.005, 2),
        },
        plankton: Plankton {
            chlorophyll_a: round_to(0.5 + lat * 0.01, 3),
            phytoplankton_biomass: round_to(100.0 + lat * 2.0, 1),
            zooplankton_biomass: round_to(50.0 + lat * 1.5, 1),
        },
        water_quality: WaterQualityReading {
            ph: round_to(7.8 + lat * 0.001, 2),
            dissolved_oxygen: round_to(6.5 + lat * 0.01, 1),
            turbidity: round_to(0.3 + lat * 0.005, 2),
        },
        ocean_currents: Currents {
            surface_speed: round_to(0.5 + lat * 0.01, 2),
            surface_direction: round_to(180.0 + lon * 0.5, 1),
            deep_current_speed: round_to(0.2 + lat * 0.005, 2),
        },
        wave_data: Waves {
            height: round_to(1.0 + lat * 0.02, 1),
            period: round_to(8.0 + lat * 0.1, 1),
            direction: round_to(270.0 + lon * 0.3, 1),
        },
        bathymetry: Bathymetry {
            depth: round_to(2000.0 + lat * 50.0, 0),
            seafloor_type: if lat > 30.0 { "Abyssal plain" } else { "Continental slope" }.to_string(),
        },
    })
}
