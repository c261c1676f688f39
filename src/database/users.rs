use super::{MongoDB, USERS};
use crate::models::{HistoryEntry, User};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime as BsonDateTime};
use mongodb::error::{ErrorKind, WriteFailure};

const DUPLICATE_KEY: i32 = 11000;

/// Accounts plus their embedded history and saved lists.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    /// Fails with `AlreadyRegistered` when the email is taken.
    async fn insert(&self, user: User) -> Result<User, AppError>;

    /// Returns false when no such user exists.
    async fn push_history(&self, id: &ObjectId, entry: HistoryEntry) -> Result<bool, AppError>;

    /// Set semantics: saving a name twice keeps one copy.
    async fn save_medicine(&self, id: &ObjectId, name: &str) -> Result<bool, AppError>;
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let collection = self.collection::<User>(USERS);
        Ok(collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let collection = self.collection::<User>(USERS);
        Ok(collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        let collection = self.collection::<User>(USERS);

        match collection.insert_one(&user).await {
            Ok(result) => {
                user.id = result.inserted_id.as_object_id();
                Ok(user)
            }
            // Lost a race with a concurrent registration
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::AlreadyRegistered("Email already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn push_history(&self, id: &ObjectId, entry: HistoryEntry) -> Result<bool, AppError> {
        let collection = self.collection::<User>(USERS);

        let entry = to_bson(&entry)
            .map_err(|e| AppError::Internal(format!("Failed to encode history entry: {}", e)))?;

        let update = doc! {
            "$push": { "searchHistory": entry },
            "$set": { "updatedAt": BsonDateTime::now() }
        };

        let result = collection.update_one(doc! { "_id": *id }, update).await?;
        Ok(result.matched_count > 0)
    }

    async fn save_medicine(&self, id: &ObjectId, name: &str) -> Result<bool, AppError> {
        let collection = self.collection::<User>(USERS);

        let update = doc! {
            "$addToSet": { "savedMedicines": name },
            "$set": { "updatedAt": BsonDateTime::now() }
        };

        let result = collection.update_one(doc! { "_id": *id }, update).await?;
        Ok(result.matched_count > 0)
    }
}
