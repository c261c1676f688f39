//! In-memory stand-ins for MongoDB and the label API.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::database::{MedicineStore, UserStore};
use crate::models::{HistoryEntry, Medicine, PopularMedicine, User};
use crate::services::auth_service::AuthService;
use crate::services::label_service::{LabelField, LabelSource};
use crate::state::AppState;
use crate::utils::AppError;

pub fn test_auth() -> AuthService {
    // Lowest bcrypt cost keeps the suite fast
    AuthService::new("test-secret", 4)
}

#[derive(Default)]
pub struct MemoryMedicineStore {
    records: Mutex<Vec<Medicine>>,
}

impl MemoryMedicineStore {
    pub fn seed(&self, mut medicine: Medicine) -> Medicine {
        medicine.id.get_or_insert_with(ObjectId::new);
        self.records.lock().unwrap().push(medicine.clone());
        medicine
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MedicineStore for MemoryMedicineStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Medicine>, AppError> {
        let needle = name.to_lowercase();
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.name.to_lowercase() == needle)
            .cloned())
    }

    async fn record_hit(&self, id: &ObjectId) -> Result<Option<Medicine>, AppError> {
        let mut records = self.records.lock().unwrap();
        Ok(records.iter_mut().find(|m| m.id == Some(*id)).map(|m| {
            m.search_count += 1;
            m.updated_at = BsonDateTime::now();
            m.clone()
        }))
    }

    async fn insert(&self, medicine: Medicine) -> Result<Medicine, AppError> {
        Ok(self.seed(medicine))
    }

    async fn top_searched(&self, limit: i64) -> Result<Vec<PopularMedicine>, AppError> {
        let mut popular: Vec<PopularMedicine> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|m| PopularMedicine {
                name: m.name.clone(),
                search_count: m.search_count,
            })
            .collect();
        // Stable sort keeps insertion order on ties
        popular.sort_by(|a, b| b.search_count.cmp(&a.search_count));
        popular.truncate(limit.max(0) as usize);
        Ok(popular)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn seed(&self, mut user: User) -> User {
        user.id.get_or_insert_with(ObjectId::new);
        self.users.lock().unwrap().push(user.clone());
        user
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == Some(*id))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, AppError> {
        if self.users.lock().unwrap().iter().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyRegistered("Email already registered".to_string()));
        }
        Ok(self.seed(user))
    }

    async fn push_history(&self, id: &ObjectId, entry: HistoryEntry) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == Some(*id)) {
            Some(user) => {
                user.search_history.push(entry);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn save_medicine(&self, id: &ObjectId, name: &str) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == Some(*id)) {
            Some(user) => {
                if !user.saved_medicines.iter().any(|m| m == name) {
                    user.saved_medicines.push(name.to_string());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Label source answering from a fixed table and recording every call.
#[derive(Default)]
pub struct StaticLabelSource {
    labels: HashMap<(LabelField, String), serde_json::Value>,
    calls: Mutex<Vec<(LabelField, String)>>,
}

impl StaticLabelSource {
    pub fn with(mut self, field: LabelField, name: &str, label: serde_json::Value) -> Self {
        self.labels.insert((field, name.to_lowercase()), label);
        self
    }

    pub fn calls(&self) -> Vec<(LabelField, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LabelSource for StaticLabelSource {
    async fn fetch_label(&self, field: LabelField, name: &str) -> Option<serde_json::Value> {
        self.calls.lock().unwrap().push((field, name.to_string()));
        self.labels.get(&(field, name.to_lowercase())).cloned()
    }
}

pub fn test_state(labels: StaticLabelSource) -> AppState {
    AppState {
        medicines: Arc::new(MemoryMedicineStore::default()),
        users: Arc::new(MemoryUserStore::default()),
        labels: Arc::new(labels),
        auth: test_auth(),
    }
}
