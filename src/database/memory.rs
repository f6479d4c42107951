//! In-memory stores for handler tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Mutex;

use super::{ObservationStore, UserStore};
use crate::models::{DashboardSummary, ObservationFilter, SpeciesObservation, User};
use crate::services::observation_service::{regions_of, summarize};
use crate::utils::AppError;

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn with_users(users: Vec<User>) -> Self {
        Self { users: Mutex::new(users) }
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn insert(&self, user: &User) -> Result<ObjectId, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("An account with this email already exists".into()));
        }
        let id = user.id.unwrap_or_else(ObjectId::new);
        let mut stored = user.clone();
        stored.id = Some(id);
        users.push(stored);
        Ok(id)
    }

    async fn record_login(&self, id: &ObjectId, at: i64) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            user.last_login = Some(at);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryObservations {
    observations: Mutex<Vec<SpeciesObservation>>,
}

impl InMemoryObservations {
    pub fn with_observations(observations: Vec<SpeciesObservation>) -> Self {
        Self { observations: Mutex::new(observations) }
    }

    pub fn len(&self) -> usize {
        self.observations.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<SpeciesObservation> {
        self.observations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObservationStore for InMemoryObservations {
    async fn list(&self, filter: &ObservationFilter) -> Result<Vec<SpeciesObservation>, AppError> {
        let mut matching: Vec<SpeciesObservation> = self
            .observations
            .lock()
            .unwrap()
            .iter()
            .filter(|o| filter.region.as_ref().map_or(true, |r| &o.region == r))
            .filter(|o| filter.species.as_ref().map_or(true, |s| &o.species == s))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
        matching.truncate(filter.limit.max(0) as usize);
        Ok(matching)
    }

    async fn insert_many(&self, observations: &[SpeciesObservation]) -> Result<usize, AppError> {
        let mut stored = self.observations.lock().unwrap();
        for obs in observations {
            let mut obs = obs.clone();
            obs.id.get_or_insert_with(ObjectId::new);
            stored.push(obs);
        }
        Ok(observations.len())
    }

    async fn delete_except(&self, keep: &[ObjectId]) -> Result<u64, AppError> {
        let mut stored = self.observations.lock().unwrap();
        let before = stored.len();
        stored.retain(|o| o.id.map_or(false, |id| keep.contains(&id)));
        Ok((before - stored.len()) as u64)
    }

    async fn summary(&self, top_n: usize) -> Result<DashboardSummary, AppError> {
        Ok(summarize(&self.observations.lock().unwrap(), top_n))
    }

    async fn regions(&self) -> Result<Vec<String>, AppError> {
        Ok(regions_of(&self.observations.lock().unwrap()))
    }
}
