use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::database::ObservationStore;
use crate::models::{ObservationFilter, ObservationView, SpeciesObservation};
use crate::utils::AppError;

pub use crate::models::{DashboardSummary, RegionSummary, SpeciesTotal};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;
pub const TOP_SPECIES: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct ObservationQuery {
    pub region: Option<String>,
    pub species: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ObservationListResponse {
    pub success: bool,
    pub observations: Vec<ObservationView>,
    pub total: usize,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ObservationQuery {
    pub fn to_filter(&self) -> ObservationFilter {
        ObservationFilter {
            region: non_blank(&self.region),
            species: non_blank(&self.species),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

pub async fn list_observations(
    store: &dyn ObservationStore,
    query: &ObservationQuery,
) -> Result<ObservationListResponse, AppError> {
    let observations: Vec<ObservationView> = store
        .list(&query.to_filter())
        .await?
        .into_iter()
        .map(ObservationView::from)
        .collect();

    Ok(ObservationListResponse {
        success: true,
        total: observations.len(),
        observations,
    })
}

/// Aggregates over every stored observation.
pub async fn dashboard_summary(store: &dyn ObservationStore) -> Result<DashboardSummary, AppError> {
    store.summary(TOP_SPECIES).await
}

pub async fn regions(store: &dyn ObservationStore) -> Result<Vec<String>, AppError> {
    store.regions().await
}

#[derive(Default)]
struct RegionAccumulator {
    observations: u64,
    individuals: i64,
    ph: f64,
    temperature: f64,
    dissolved_oxygen: f64,
}

/// In-process equivalent of the MongoDB aggregation, for a loaded set of
/// observations.
pub fn summarize(observations: &[SpeciesObservation], top_n: usize) -> DashboardSummary {
    let mut regions: BTreeMap<&str, RegionAccumulator> = BTreeMap::new();
    let mut species: BTreeMap<&str, i64> = BTreeMap::new();

    for obs in observations {
        let acc = regions.entry(obs.region.as_str()).or_default();
        acc.observations += 1;
        acc.individuals += obs.count;
        acc.ph += obs.water_quality.ph;
        acc.temperature += obs.water_quality.temperature;
        acc.dissolved_oxygen += obs.water_quality.dissolved_oxygen;

        *species.entry(obs.species.as_str()).or_default() += obs.count;
    }

    let regions: Vec<RegionSummary> = regions
        .into_iter()
        .map(|(region, acc)| {
            let n = acc.observations as f64;
            RegionSummary::new(
                region.to_string(),
                acc.observations,
                acc.individuals,
                acc.ph / n,
                acc.temperature / n,
                acc.dissolved_oxygen / n,
            )
        })
        .collect();

    let distinct_species = species.len() as u64;
    let mut top_species: Vec<SpeciesTotal> = species
        .into_iter()
        .map(|(species, individuals)| SpeciesTotal {
            species: species.to_string(),
            individuals,
        })
        .collect();
    // Stable sort keeps alphabetical order between ties
    top_species.sort_by(|a, b| b.individuals.cmp(&a.individuals));
    top_species.truncate(top_n);

    DashboardSummary {
        total_observations: observations.len() as u64,
        total_individuals: observations.iter().map(|o| o.count).sum(),
        distinct_species,
        regions,
        top_species,
        latest_observed_at: observations.iter().map(|o| o.observed_at).max(),
    }
}

/// Distinct region names present in a set of observations, sorted.
pub fn regions_of(observations: &[SpeciesObservation]) -> Vec<String> {
    observations
        .iter()
        .map(|o| o.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
