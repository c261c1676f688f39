use serde_json::Value;

use crate::database::MedicineStore;
use crate::models::{LookupResult, LookupSource, Medicine, PopularMedicine, NOT_AVAILABLE};
use crate::services::label_service::{LabelField, LabelSource};
use crate::utils::metrics::{self, LookupOutcome};
use crate::utils::AppError;

pub const DEFAULT_POPULAR_LIMIT: i64 = 10;
pub const MAX_POPULAR_LIMIT: i64 = 100;

/// A place in a label document an attribute can be read from.
#[derive(Debug, Clone, Copy)]
enum LabelPath {
    /// Top-level label section, e.g. `warnings`
    Section(&'static str),
    /// Field of the `openfda` block, e.g. `brand_name`
    OpenFda(&'static str),
}

use LabelPath::{OpenFda, Section};

const GENERIC_NAME: &[LabelPath] = &[OpenFda("generic_name")];
const MANUFACTURER: &[LabelPath] = &[OpenFda("manufacturer_name")];
const PURPOSE: &[LabelPath] = &[Section("indications_and_usage"), Section("purpose")];
const INGREDIENTS: &[LabelPath] = &[
    Section("active_ingredient"),
    Section("spl_product_data_elements"),
];
const SIDE_EFFECTS: &[LabelPath] = &[Section("adverse_reactions"), Section("side_effects")];
const WARNINGS: &[LabelPath] = &[
    Section("boxed_warning"),
    Section("warnings"),
    Section("warnings_and_cautions"),
];
const INTERACTIONS: &[LabelPath] = &[Section("drug_interactions")];
const DOSAGE: &[LabelPath] = &[Section("dosage_and_administration")];
const WHO_SHOULD_AVOID: &[LabelPath] = &[Section("contraindications"), Section("when_using")];
const NAME: &[LabelPath] = &[OpenFda("brand_name"), OpenFda("generic_name")];

/// Label values are arrays of strings; the first element is the one we keep.
fn read_path<'a>(label: &'a Value, path: LabelPath) -> Option<&'a str> {
    let value = match path {
        Section(key) => label.get(key),
        OpenFda(key) => label.get("openfda").and_then(|o| o.get(key)),
    }?;

    let text = match value {
        Value::Array(items) => items.first()?.as_str()?,
        Value::String(s) => s.as_str(),
        _ => return None,
    };

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn first_present(label: &Value, candidates: &[LabelPath]) -> Option<String> {
    candidates
        .iter()
        .find_map(|path| read_path(label, *path))
        .map(str::to_string)
}

fn field_or_sentinel(label: &Value, candidates: &[LabelPath]) -> String {
    first_present(label, candidates).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Builds a cache record from a raw label; `query` names it when the label
/// carries neither a brand nor a generic name.
pub fn normalize_label(label: &Value, query: &str) -> Medicine {
    let name = first_present(label, NAME).unwrap_or_else(|| query.to_string());

    let mut medicine = Medicine::new(name);
    medicine.generic_name = field_or_sentinel(label, GENERIC_NAME);
    medicine.manufacturer = field_or_sentinel(label, MANUFACTURER);
    medicine.purpose = field_or_sentinel(label, PURPOSE);
    medicine.ingredients = field_or_sentinel(label, INGREDIENTS);
    medicine.side_effects = field_or_sentinel(label, SIDE_EFFECTS);
    medicine.warnings = field_or_sentinel(label, WARNINGS);
    medicine.interactions = field_or_sentinel(label, INTERACTIONS);
    medicine.dosage = field_or_sentinel(label, DOSAGE);
    medicine.who_should_avoid = field_or_sentinel(label, WHO_SHOULD_AVOID);
    medicine
}

/// Walks brand, generic then substance name; first label found wins.
pub async fn fetch_first_label(labels: &dyn LabelSource, name: &str) -> Option<Value> {
    for field in LabelField::FALLBACK_CHAIN {
        if let Some(label) = labels.fetch_label(field, name).await {
            log::info!("✅ Label found by {}: {}", field.as_str(), name);
            return Some(label);
        }
    }
    None
}

pub async fn lookup(
    medicines: &dyn MedicineStore,
    labels: &dyn LabelSource,
    raw_name: &str,
) -> Result<LookupResult, AppError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Medicine name is required".to_string()));
    }

    if let Some(cached) = medicines.find_by_name(name).await? {
        // Record may vanish between the read and the increment
        let updated = match cached.id {
            Some(id) => medicines.record_hit(&id).await?,
            None => None,
        };

        if let Some(medicine) = updated {
            log::info!("📦 Cache hit: {} (searchCount: {})", medicine.name, medicine.search_count);
            metrics::record_lookup(LookupOutcome::CacheHit);
            return Ok(LookupResult {
                source: LookupSource::Cache,
                medicine,
            });
        }
    }

    let label = match fetch_first_label(labels, name).await {
        Some(label) => label,
        None => {
            log::info!("ℹ️  No label found for {}", name);
            metrics::record_lookup(LookupOutcome::NotFound);
            return Err(AppError::NotFound("Medicine not found".to_string()));
        }
    };

    let medicine = medicines.insert(normalize_label(&label, name)).await?;
    log::info!("💾 Cached new medicine: {}", medicine.name);
    metrics::record_lookup(LookupOutcome::Fetched);

    Ok(LookupResult {
        source: LookupSource::External,
        medicine,
    })
}

pub async fn top_searched(
    medicines: &dyn MedicineStore,
    limit: Option<i64>,
) -> Result<Vec<PopularMedicine>, AppError> {
    let limit = limit
        .unwrap_or(DEFAULT_POPULAR_LIMIT)
        .clamp(1, MAX_POPULAR_LIMIT);

    medicines.top_searched(limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryMedicineStore, StaticLabelSource};
    use serde_json::json;

    fn ibuprofen_label() -> Value {
        json!({
            "openfda": {
                "brand_name": ["Advil"],
                "generic_name": ["IBUPROFEN"],
                "manufacturer_name": ["Haleon US Holdings LLC"]
            },
            "purpose": ["Pain reliever/fever reducer"],
            "active_ingredient": ["Ibuprofen 200 mg"],
            "warnings": ["Allergy alert: ibuprofen may cause a severe allergic reaction"],
            "warnings_and_cautions": ["should not be read"],
            "when_using": ["take with food or milk if stomach upset occurs"],
            "dosage_and_administration": ["do not take more than directed"]
        })
    }

    #[test]
    fn normalize_picks_first_present_candidate() {
        let medicine = normalize_label(&ibuprofen_label(), "advil");

        assert_eq!(medicine.name, "Advil");
        assert_eq!(medicine.generic_name, "IBUPROFEN");
        assert_eq!(medicine.manufacturer, "Haleon US Holdings LLC");
        assert_eq!(medicine.purpose, "Pain reliever/fever reducer");
        assert_eq!(medicine.ingredients, "Ibuprofen 200 mg");
        assert!(medicine.warnings.starts_with("Allergy alert"));
        assert_eq!(medicine.who_should_avoid, "take with food or milk if stomach upset occurs");
        assert_eq!(medicine.search_count, 1);
    }

    #[test]
    fn normalize_defaults_missing_fields_to_sentinel() {
        let medicine = normalize_label(&json!({ "openfda": {} }), "mystery");

        assert_eq!(medicine.name, "mystery");
        assert_eq!(medicine.generic_name, NOT_AVAILABLE);
        assert_eq!(medicine.side_effects, NOT_AVAILABLE);
        assert_eq!(medicine.interactions, NOT_AVAILABLE);
    }

    #[test]
    fn normalize_skips_blank_candidates() {
        let label = json!({
            "boxed_warning": ["   "],
            "warnings": ["Liver warning"],
            "openfda": { "brand_name": [], "generic_name": ["NAPROXEN"] }
        });
        let medicine = normalize_label(&label, "aleve");

        assert_eq!(medicine.warnings, "Liver warning");
        assert_eq!(medicine.name, "NAPROXEN");
    }

    #[tokio::test]
    async fn miss_fetches_and_caches() {
        let store = MemoryMedicineStore::default();
        let labels = StaticLabelSource::default().with(LabelField::BrandName, "advil", ibuprofen_label());

        let result = lookup(&store, &labels, "  advil ").await.expect("lookup");

        assert_eq!(result.source, LookupSource::External);
        assert_eq!(result.medicine.name, "Advil");
        assert_eq!(result.medicine.search_count, 1);
        assert!(result.medicine.id.is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn cached_lookup_increments_by_one_per_call() {
        let store = MemoryMedicineStore::default();
        store.seed(Medicine::new("Tylenol"));
        let labels = StaticLabelSource::default();

        for expected in 2..=4 {
            let result = lookup(&store, &labels, "TYLENOL").await.expect("lookup");
            assert_eq!(result.source, LookupSource::Cache);
            assert_eq!(result.medicine.search_count, expected);
        }
        assert_eq!(labels.calls().len(), 0);
    }

    #[tokio::test]
    async fn cache_match_is_anchored() {
        let store = MemoryMedicineStore::default();
        store.seed(Medicine::new("Advil PM"));
        let labels = StaticLabelSource::default();

        let err = lookup(&store, &labels, "Advil").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn falls_back_through_generic_and_substance() {
        let store = MemoryMedicineStore::default();
        let labels = StaticLabelSource::default().with(
            LabelField::SubstanceName,
            "ibuprofen",
            ibuprofen_label(),
        );

        let result = lookup(&store, &labels, "ibuprofen").await.expect("lookup");

        assert_eq!(result.source, LookupSource::External);
        assert_eq!(
            labels.calls(),
            vec![
                (LabelField::BrandName, "ibuprofen".to_string()),
                (LabelField::GenericName, "ibuprofen".to_string()),
                (LabelField::SubstanceName, "ibuprofen".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn stops_at_first_match() {
        let store = MemoryMedicineStore::default();
        let labels = StaticLabelSource::default()
            .with(LabelField::BrandName, "advil", ibuprofen_label())
            .with(LabelField::GenericName, "advil", json!({}));

        lookup(&store, &labels, "advil").await.expect("lookup");
        assert_eq!(labels.calls().len(), 1);
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let store = MemoryMedicineStore::default();
        let labels = StaticLabelSource::default();

        let err = lookup(&store, &labels, "notarealdrug").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let store = MemoryMedicineStore::default();
        let labels = StaticLabelSource::default();

        let err = lookup(&store, &labels, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn top_searched_sorts_descending() {
        let store = MemoryMedicineStore::default();
        for (name, count) in [("A", 3), ("B", 9), ("C", 3), ("D", 1)] {
            let mut medicine = Medicine::new(name);
            medicine.search_count = count;
            store.seed(medicine);
        }

        let popular = top_searched(&store, None).await.expect("popular");
        let names: Vec<&str> = popular.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C", "D"]);

        let popular = top_searched(&store, Some(2)).await.expect("popular");
        assert_eq!(popular.len(), 2);
    }
}
