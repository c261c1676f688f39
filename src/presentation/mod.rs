//! Rendering helpers shared by the summary endpoint and the terminal client.

pub mod jargon;
pub mod recent;
pub mod safety;

pub use jargon::simplify_jargon;
pub use recent::RecentSearches;
pub use safety::{safety_badge, SafetyBadge, SafetyLevel};

use serde::{Deserialize, Serialize};

use crate::models::{LookupSource, MedicineResponse};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedText {
    pub side_effects: String,
    pub warnings: String,
}

/// A lookup result dressed for display.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MedicineSummary {
    pub success: bool,
    pub source: LookupSource,
    pub data: MedicineResponse,
    pub simplified: SimplifiedText,
    pub badge: SafetyBadge,
}

impl MedicineSummary {
    pub fn new(source: LookupSource, data: MedicineResponse) -> Self {
        let simplified = SimplifiedText {
            side_effects: simplify_jargon(&data.side_effects),
            warnings: simplify_jargon(&data.warnings),
        };
        let badge = safety_badge(&data);

        Self {
            success: true,
            source,
            data,
            simplified,
            badge,
        }
    }
}
