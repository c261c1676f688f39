use super::{MongoDB, MEDICINES};
use crate::models::{Medicine, PopularMedicine};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;

/// Cache of normalized labels.
#[async_trait]
pub trait MedicineStore: Send + Sync {
    /// Case-insensitive, anchored match on the stored name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Medicine>, AppError>;

    /// Bumps `searchCount` by one and returns the updated record.
    async fn record_hit(&self, id: &ObjectId) -> Result<Option<Medicine>, AppError>;

    async fn insert(&self, medicine: Medicine) -> Result<Medicine, AppError>;

    /// Highest `searchCount` first; ties keep insertion order.
    async fn top_searched(&self, limit: i64) -> Result<Vec<PopularMedicine>, AppError>;

    async fn healthy(&self) -> bool {
        true
    }
}

/// `^name$` with every regex metacharacter escaped.
pub fn exact_name_pattern(name: &str) -> String {
    format!("^{}$", regex::escape(name))
}

#[async_trait]
impl MedicineStore for MongoDB {
    async fn find_by_name(&self, name: &str) -> Result<Option<Medicine>, AppError> {
        let collection = self.collection::<Medicine>(MEDICINES);

        let filter = doc! {
            "name": { "$regex": exact_name_pattern(name), "$options": "i" }
        };

        Ok(collection.find_one(filter).await?)
    }

    async fn record_hit(&self, id: &ObjectId) -> Result<Option<Medicine>, AppError> {
        let collection = self.collection::<Medicine>(MEDICINES);

        let update = doc! {
            "$inc": { "searchCount": 1 },
            "$set": { "updatedAt": BsonDateTime::now() }
        };

        Ok(collection
            .find_one_and_update(doc! { "_id": *id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn insert(&self, mut medicine: Medicine) -> Result<Medicine, AppError> {
        let collection = self.collection::<Medicine>(MEDICINES);

        let result = collection.insert_one(&medicine).await?;
        medicine.id = result.inserted_id.as_object_id();

        Ok(medicine)
    }

    async fn top_searched(&self, limit: i64) -> Result<Vec<PopularMedicine>, AppError> {
        let collection = self.collection::<PopularMedicine>(MEDICINES);

        let cursor = collection
            .find(doc! {})
            .sort(doc! { "searchCount": -1, "_id": 1 })
            .limit(limit)
            .projection(doc! { "name": 1, "searchCount": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn healthy(&self) -> bool {
        self.ping().await
    }
}
