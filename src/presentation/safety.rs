use serde::{Deserialize, Serialize};

use crate::models::{Medicine, MedicineResponse};

const CAUTION_KEYWORDS: &[&str] = &["death", "fatal", "life-threatening", "serious", "severe"];
const MODERATE_KEYWORDS: &[&str] = &["consult", "avoid", "risk", "caution"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Caution,
    Moderate,
    Safe,
}

impl SafetyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SafetyLevel::Caution => "⚠️ Use With Caution",
            SafetyLevel::Moderate => "🟡 Moderate Risk",
            SafetyLevel::Safe => "🟢 Generally Safe",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SafetyLevel::Caution => "#ef4444",
            SafetyLevel::Moderate => "#f59e0b",
            SafetyLevel::Safe => "#10b981",
        }
    }
}

/// Keyword heuristic, not a medical judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SafetyBadge {
    pub level: SafetyLevel,
    pub label: String,
    pub color: String,
}

impl From<SafetyLevel> for SafetyBadge {
    fn from(level: SafetyLevel) -> Self {
        SafetyBadge {
            level,
            label: level.label().to_string(),
            color: level.color().to_string(),
        }
    }
}

/// Anything carrying warning and side-effect text.
pub trait LabelText {
    fn warnings(&self) -> &str;
    fn side_effects(&self) -> &str;
}

impl LabelText for Medicine {
    fn warnings(&self) -> &str {
        &self.warnings
    }

    fn side_effects(&self) -> &str {
        &self.side_effects
    }
}

impl LabelText for MedicineResponse {
    fn warnings(&self) -> &str {
        &self.warnings
    }

    fn side_effects(&self) -> &str {
        &self.side_effects
    }
}

/// Caution keywords win over moderate ones.
pub fn classify(warnings: &str, side_effects: &str) -> SafetyLevel {
    let text = format!("{} {}", warnings, side_effects).to_lowercase();

    if CAUTION_KEYWORDS.iter().any(|k| text.contains(k)) {
        SafetyLevel::Caution
    } else if MODERATE_KEYWORDS.iter().any(|k| text.contains(k)) {
        SafetyLevel::Moderate
    } else {
        SafetyLevel::Safe
    }
}

pub fn safety_badge<T: LabelText + ?Sized>(record: &T) -> SafetyBadge {
    classify(record.warnings(), record.side_effects()).into()
}
