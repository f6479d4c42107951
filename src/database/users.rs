use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};

use super::{MongoDB, USERS_COLLECTION};
use crate::models::User;
use crate::utils::AppError;

const DUPLICATE_KEY: i32 = 11000;

/// Persistence for user accounts. Emails are expected to be normalized by
/// the caller.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    /// Inserts a new user and returns its id. A taken email is a `Conflict`.
    async fn insert(&self, user: &User) -> Result<ObjectId, AppError>;

    async fn record_login(&self, id: &ObjectId, at: i64) -> Result<(), AppError>;
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = self
            .collection::<User>(USERS_COLLECTION)
            .find_one(doc! { "email": email })
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let user = self
            .collection::<User>(USERS_COLLECTION)
            .find_one(doc! { "_id": *id })
            .await?;
        Ok(user)
    }

    async fn insert(&self, user: &User) -> Result<ObjectId, AppError> {
        let result = self
            .collection::<User>(USERS_COLLECTION)
            .insert_one(user)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::Conflict("An account with this email already exists".to_string())
                } else {
                    AppError::from(e)
                }
            })?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError("Inserted user has no ObjectId".to_string()))
    }

    async fn record_login(&self, id: &ObjectId, at: i64) -> Result<(), AppError> {
        self.collection::<User>(USERS_COLLECTION)
            .update_one(doc! { "_id": *id }, doc! { "$set": { "lastLogin": at } })
            .await?;
        Ok(())
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY,
        _ => false,
    }
}
