use std::sync::Arc;

use crate::database::{MedicineStore, MongoDB, UserStore};
use crate::services::auth_service::AuthService;
use crate::services::label_service::LabelSource;

/// Shared handles every request handler reads from.
pub struct AppState {
    pub medicines: Arc<dyn MedicineStore>,
    pub users: Arc<dyn UserStore>,
    pub labels: Arc<dyn LabelSource>,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(db: MongoDB, labels: Arc<dyn LabelSource>, auth: AuthService) -> Self {
        let db = Arc::new(db);
        Self {
            medicines: db.clone(),
            users: db,
            labels,
            auth,
        }
    }
}
