use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

/// Placeholder for label attributes the source did not provide.
pub const NOT_AVAILABLE: &str = "Not available";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn default_search_count() -> i64 {
    1
}

/// Cached label (collection: medicines)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default = "not_available")]
    pub generic_name: String,
    #[serde(default = "not_available")]
    pub manufacturer: String,
    #[serde(default = "not_available")]
    pub purpose: String,
    #[serde(default = "not_available")]
    pub ingredients: String,
    #[serde(default = "not_available")]
    pub side_effects: String,
    #[serde(default = "not_available")]
    pub warnings: String,
    #[serde(default = "not_available")]
    pub interactions: String,
    #[serde(default = "not_available")]
    pub dosage: String,
    #[serde(default = "not_available")]
    pub who_should_avoid: String,
    #[serde(default = "default_search_count")]
    pub search_count: i64,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl Medicine {
    /// A fresh record with every label attribute set to the sentinel.
    pub fn new(name: impl Into<String>) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: None,
            name: name.into(),
            generic_name: not_available(),
            manufacturer: not_available(),
            purpose: not_available(),
            ingredients: not_available(),
            side_effects: not_available(),
            warnings: not_available(),
            interactions: not_available(),
            dosage: not_available(),
            who_should_avoid: not_available(),
            search_count: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Projection used by the popularity query.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopularMedicine {
    pub name: String,
    pub search_count: i64,
}

/// Where a lookup result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LookupSource {
    Cache,
    External,
}

#[derive(Debug, Clone)]
pub struct LookupResult {
    pub source: LookupSource,
    pub medicine: Medicine,
}

/// Medicine as returned over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicineResponse {
    pub id: String,
    pub name: String,
    pub generic_name: String,
    pub manufacturer: String,
    pub purpose: String,
    pub ingredients: String,
    pub side_effects: String,
    pub warnings: String,
    pub interactions: String,
    pub dosage: String,
    pub who_should_avoid: String,
    pub search_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Medicine> for MedicineResponse {
    fn from(medicine: Medicine) -> Self {
        MedicineResponse {
            id: medicine.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: medicine.name,
            generic_name: medicine.generic_name,
            manufacturer: medicine.manufacturer,
            purpose: medicine.purpose,
            ingredients: medicine.ingredients,
            side_effects: medicine.side_effects,
            warnings: medicine.warnings,
            interactions: medicine.interactions,
            dosage: medicine.dosage,
            who_should_avoid: medicine.who_should_avoid,
            search_count: medicine.search_count,
            created_at: medicine.created_at.try_to_rfc3339_string().unwrap_or_default(),
            updated_at: medicine.updated_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    pub source: LookupSource,
    pub data: MedicineResponse,
}
