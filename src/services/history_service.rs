use crate::database::UserStore;
use crate::models::{HistoryEntry, HistoryEntryResponse};
use crate::utils::AppError;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MedicineRequest {
    pub medicine: Option<String>,
}

impl MedicineRequest {
    fn medicine_name(&self) -> Result<&str, AppError> {
        self.medicine
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::Validation("Medicine name is required".to_string()))
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// Appends to the user's history; duplicates are kept.
pub async fn append_history(
    users: &dyn UserStore,
    user_id: &ObjectId,
    request: &MedicineRequest,
) -> Result<(), AppError> {
    let medicine = request.medicine_name()?;

    let entry = HistoryEntry {
        medicine: medicine.to_string(),
        searched_at: BsonDateTime::now(),
    };

    if !users.push_history(user_id, entry).await? {
        return Err(user_not_found());
    }

    log::info!("🕘 History updated for user {}: {}", user_id, medicine);
    Ok(())
}

pub async fn get_history(
    users: &dyn UserStore,
    user_id: &ObjectId,
) -> Result<Vec<HistoryEntryResponse>, AppError> {
    let user = users.find_by_id(user_id).await?.ok_or_else(user_not_found)?;

    Ok(user
        .search_history
        .into_iter()
        .map(HistoryEntryResponse::from)
        .collect())
}

pub async fn save_medicine(
    users: &dyn UserStore,
    user_id: &ObjectId,
    request: &MedicineRequest,
) -> Result<(), AppError> {
    let medicine = request.medicine_name()?;

    if !users.save_medicine(user_id, medicine).await? {
        return Err(user_not_found());
    }

    log::info!("⭐ Saved medicine for user {}: {}", user_id, medicine);
    Ok(())
}

pub async fn get_saved(users: &dyn UserStore, user_id: &ObjectId) -> Result<Vec<String>, AppError> {
    let user = users.find_by_id(user_id).await?.ok_or_else(user_not_found)?;
    Ok(user.saved_medicines)
}
