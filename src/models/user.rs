use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

/// Account document (collection: users)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>, // None for accounts backed by an external identity provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub search_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub saved_medicines: Vec<String>,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub medicine: String,
    pub searched_at: BsonDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub medicine: String,
    pub searched_at: String,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        HistoryEntryResponse {
            medicine: entry.medicine,
            searched_at: entry.searched_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

/// User profile without credentials.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub search_history: Vec<HistoryEntryResponse>,
    pub saved_medicines: Vec<String>,
    pub created_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            search_history: user
                .search_history
                .into_iter()
                .map(HistoryEntryResponse::from)
                .collect(),
            saved_medicines: user.saved_medicines,
            created_at: user.created_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}
