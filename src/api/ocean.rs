use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::services::ocean_service::{self, GeocodeResult, OceanConditions};

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub place: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OceanDataQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub date: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ocean/places",
    tag = "Ocean",
    responses(
        (status = 200, description = "Popular ocean locations under `places`")
    )
)]
pub async fn popular_places() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "places": ocean_service::popular_places()
    }))
}

#[utoipa::path(
    get,
    path = "/api/ocean/geocode",
    tag = "Ocean",
    params(
        ("place" = String, Query, description = "Place name, case-insensitive")
    ),
    responses(
        (status = 200, description = "Coordinates of the place", body = GeocodeResult),
        (status = 400, description = "Missing place"),
        (status = 404, description = "Unknown place")
    )
)]
pub async fn geocode(query: web::Query<GeocodeQuery>) -> HttpResponse {
    let place = query.place.as_deref().unwrap_or("");
    log::info!("📍 GET /api/ocean/geocode - place: {}", place);

    match ocean_service::geocode(place) {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "latitude": result.latitude,
            "longitude": result.longitude,
            "place_name": result.place_name,
            "country": result.country,
            "region": result.region,
            "city": result.city
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/ocean/data",
    tag = "Ocean",
    params(
        ("lat" = f64, Query, description = "Latitude, -90..90"),
        ("lon" = f64, Query, description = "Longitude, -180..180"),
        ("date" = Option<String>, Query, description = "Defaults to 2024-01-01")
    ),
    responses(
        (status = 200, description = "Ocean conditions", body = OceanConditions),
        (status = 400, description = "Missing or invalid coordinates")
    )
)]
pub async fn ocean_data(query: web::Query<OceanDataQuery>) -> HttpResponse {
    let (lat, lon) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "lat and lon query parameters are required"
            }))
        }
    };

    log::info!("🌊 GET /api/ocean/data - lat: {}, lon: {}", lat, lon);

    match ocean_service::ocean_conditions(lat, lon, query.date.as_deref()) {
        Ok(conditions) => HttpResponse::Ok().json(conditions),
        Err(e) => e.error_response(),
    }
}
