pub mod auth_service;
pub mod history_service;
pub mod label_service;
pub mod medicine_service;

pub use auth_service::AuthService;
pub use label_service::{LabelField, OpenFdaClient};
