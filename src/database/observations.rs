use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::Deserialize;

use super::{MongoDB, OBSERVATIONS_COLLECTION};
use crate::models::{
    DashboardSummary, ObservationFilter, RegionSummary, SpeciesObservation, SpeciesTotal,
};
use crate::utils::AppError;

#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Newest first, at most `filter.limit` documents.
    async fn list(&self, filter: &ObservationFilter) -> Result<Vec<SpeciesObservation>, AppError>;

    async fn insert_many(&self, observations: &[SpeciesObservation]) -> Result<usize, AppError>;

    /// Removes every observation whose id is not in `keep`, returning how
    /// many were deleted.
    async fn delete_except(&self, keep: &[ObjectId]) -> Result<u64, AppError>;

    /// Totals over the whole collection, with the `top_n` species by
    /// individuals.
    async fn summary(&self, top_n: usize) -> Result<DashboardSummary, AppError>;

    /// Distinct region names, sorted.
    async fn regions(&self) -> Result<Vec<String>, AppError>;
}

fn filter_document(filter: &ObservationFilter) -> Document {
    let mut query = Document::new();
    if let Some(region) = &filter.region {
        query.insert("region", region.as_str());
    }
    if let Some(species) = &filter.species {
        query.insert("species", species.as_str());
    }
    query
}

fn region_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$region",
                "observations": { "$sum": 1 },
                "individuals": { "$sum": "$count" },
                "avgPh": { "$avg": "$waterQuality.ph" },
                "avgTemperature": { "$avg": "$waterQuality.temperature" },
                "avgDissolvedOxygen": { "$avg": "$waterQuality.dissolvedOxygen" },
                "latest": { "$max": "$observedAt" },
            }
        },
        doc! { "$sort": { "_id": 1 } },
    ]
}

fn species_pipeline(top_n: usize) -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$species", "individuals": { "$sum": "$count" } } },
        doc! { "$sort": { "individuals": -1, "_id": 1 } },
        doc! { "$limit": top_n as i64 },
    ]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionGroup {
    #[serde(rename = "_id")]
    region: String,
    observations: i64,
    individuals: i64,
    avg_ph: Option<f64>,
    avg_temperature: Option<f64>,
    avg_dissolved_oxygen: Option<f64>,
    latest: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SpeciesGroup {
    #[serde(rename = "_id")]
    species: String,
    individuals: i64,
}

fn decode<T: serde::de::DeserializeOwned>(document: Document) -> Result<T, AppError> {
    mongodb::bson::from_document(document)
        .map_err(|e| AppError::DatabaseError(format!("Unexpected aggregation result: {}", e)))
}

fn region_names(values: Vec<Bson>) -> Vec<String> {
    let mut names: Vec<String> = values
        .into_iter()
        .filter_map(|value| match value {
            Bson::String(name) => Some(name),
            _ => None,
        })
        .collect();
    names.sort();
    names
}

#[async_trait]
impl ObservationStore for MongoDB {
    async fn list(&self, filter: &ObservationFilter) -> Result<Vec<SpeciesObservation>, AppError> {
        let cursor = self
            .collection::<SpeciesObservation>(OBSERVATIONS_COLLECTION)
            .find(filter_document(filter))
            .sort(doc! { "observedAt": -1 })
            .limit(filter.limit)
            .await?;

        let observations: Vec<SpeciesObservation> = cursor.try_collect().await?;
        Ok(observations)
    }

    async fn insert_many(&self, observations: &[SpeciesObservation]) -> Result<usize, AppError> {
        if observations.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection::<SpeciesObservation>(OBSERVATIONS_COLLECTION)
            .insert_many(observations)
            .await?;

        Ok(result.inserted_ids.len())
    }

    async fn delete_except(&self, keep: &[ObjectId]) -> Result<u64, AppError> {
        let result = self
            .collection::<SpeciesObservation>(OBSERVATIONS_COLLECTION)
            .delete_many(doc! { "_id": { "$nin": keep.to_vec() } })
            .await?;

        Ok(result.deleted_count)
    }

    async fn summary(&self, top_n: usize) -> Result<DashboardSummary, AppError> {
        let collection = self.collection::<Document>(OBSERVATIONS_COLLECTION);

        let total_observations = collection.count_documents(doc! {}).await?;
        let distinct_species = collection.distinct("species", doc! {}).await?.len() as u64;

        let groups: Vec<Document> = collection.aggregate(region_pipeline()).await?.try_collect().await?;
        let groups = groups
            .into_iter()
            .map(decode::<RegionGroup>)
            .collect::<Result<Vec<_>, _>>()?;

        let top: Vec<Document> = collection.aggregate(species_pipeline(top_n)).await?.try_collect().await?;
        let top_species = top
            .into_iter()
            .map(|document| {
                decode::<SpeciesGroup>(document).map(|group| SpeciesTotal {
                    species: group.species,
                    individuals: group.individuals,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total_individuals = groups.iter().map(|g| g.individuals).sum();
        let latest_observed_at = groups.iter().filter_map(|g| g.latest).max();

        let regions = groups
            .into_iter()
            .map(|g| {
                RegionSummary::new(
                    g.region,
                    g.observations.max(0) as u64,
                    g.individuals,
                    g.avg_ph.unwrap_or_default(),
                    g.avg_temperature.unwrap_or_default(),
                    g.avg_dissolved_oxygen.unwrap_or_default(),
                )
            })
            .collect();

        Ok(DashboardSummary {
            total_observations,
            total_individuals,
            distinct_species,
            regions,
            top_species,
            latest_observed_at,
        })
    }

    async fn regions(&self) -> Result<Vec<String>, AppError> {
        let values = self
            .collection::<Document>(OBSERVATIONS_COLLECTION)
            .distinct("region", doc! {})
            .await?;

        Ok(region_names(values))
    }
}
