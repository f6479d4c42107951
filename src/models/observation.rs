use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaterQuality {
    pub ph: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// PSU
    pub salinity: f64,
    /// mg/L
    pub dissolved_oxygen: f64,
    /// NTU
    pub turbidity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Demo observation stored in `species_observations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesObservation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub region: String,
    pub species: String,
    /// Individuals observed
    pub count: i64,
    pub water_quality: WaterQuality,
    pub location: GeoPoint,
    pub observed_at: i64,
    pub created_at: i64,
}

/// Filter for listing observations on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct ObservationFilter {
    pub region: Option<String>,
    pub species: Option<String>,
    pub limit: i64,
}

/// Observation as returned by the API (hex id instead of an extended-JSON oid).
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObservationView {
    pub id: String,
    pub region: String,
    pub species: String,
    pub count: i64,
    pub water_quality: WaterQuality,
    pub location: GeoPoint,
    pub observed_at: i64,
}

impl From<SpeciesObservation> for ObservationView {
    fn from(obs: SpeciesObservation) -> Self {
        Self {
            id: obs.id.map(|id| id.to_hex()).unwrap_or_default(),
            region: obs.region,
            species: obs.species,
            count: obs.count,
            water_quality: obs.water_quality,
            location: obs.location,
            observed_at: obs.observed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub region: String,
    pub observations: u64,
    pub individuals: i64,
    pub avg_ph: f64,
    pub avg_temperature: f64,
    pub avg_dissolved_oxygen: f64,
}

impl RegionSummary {
    /// Averages are rounded to two decimals.
    pub fn new(
        region: String,
        observations: u64,
        individuals: i64,
        avg_ph: f64,
        avg_temperature: f64,
        avg_dissolved_oxygen: f64,
    ) -> Self {
        Self {
            region,
            observations,
            individuals,
            avg_ph: round2(avg_ph),
            avg_temperature: round2(avg_temperature),
            avg_dissolved_oxygen: round2(avg_dissolved_oxygen),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SpeciesTotal {
    pub species: String,
    pub individuals: i64,
}

/// Aggregates over the whole `species_observations` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_observations: u64,
    pub total_individuals: i64,
    pub distinct_species: u64,
    pub regions: Vec<RegionSummary>,
    pub top_species: Vec<SpeciesTotal>,
    pub latest_observed_at: Option<i64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
