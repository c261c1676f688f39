use std::path::Path;
use std::time::Duration;

use crate::models::{LookupSource, MedicineResponse, SearchResponse};
use crate::presentation::{safety_badge, simplify_jargon, RecentSearches};
use crate::utils::AppError;

pub async fn cmd_search(server: &str, name: &str, recent_path: &Path) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Medicine name is required".to_string()));
    }

    println!("Searching for: {}", name);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

    let url = format!(
        "{}/api/medicine/search/{}",
        server.trim_end_matches('/'),
        urlencoding::encode(name)
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Could not reach {}: {}", server, e)))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        println!("No label found for '{}'", name);
        return Ok(());
    }

    if !response.status().is_success() {
        return Err(AppError::Internal(format!(
            "Server answered {}",
            response.status()
        )));
    }

    let body: SearchResponse = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Unexpected response: {}", e)))?;

    println!();
    print!("{}", render(body.source, &body.data));

    remember(recent_path, name);

    Ok(())
}

/// Records the query as typed, not the name the label resolved to.
fn remember(recent_path: &Path, query: &str) {
    let mut recent = RecentSearches::load(recent_path).unwrap_or_else(|e| {
        log::warn!("⚠️  Recent searches unreadable, starting over: {}", e);
        RecentSearches::default()
    });
    recent.push(query);
    if let Err(e) = recent.save(recent_path) {
        log::warn!("⚠️  Failed to save recent searches: {}", e);
    }
}

fn render(source: LookupSource, medicine: &MedicineResponse) -> String {
    let badge = safety_badge(medicine);
    let source = match source {
        LookupSource::Cache => "cache",
        LookupSource::External => "openFDA",
    };

    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", medicine.name, medicine.generic_name));
    out.push_str(&format!("{:-<60}\n", ""));
    out.push_str(&format!("Safety: {}\n", badge.label));
    out.push_str(&format!("Manufacturer: {}\n", medicine.manufacturer));
    out.push_str(&format!("Purpose: {}\n", medicine.purpose));
    out.push_str(&format!("Ingredients: {}\n", medicine.ingredients));
    out.push_str(&format!("Dosage: {}\n", medicine.dosage));
    out.push_str(&format!("Side effects: {}\n", simplify_jargon(&medicine.side_effects)));
    out.push_str(&format!("Warnings: {}\n", simplify_jargon(&medicine.warnings)));
    out.push_str(&format!("Interactions: {}\n", medicine.interactions));
    out.push_str(&format!("Who should avoid: {}\n", medicine.who_should_avoid));
    out.push_str(&format!(
        "\nSource: {} | searched {} time(s)\n",
        source, medicine.search_count
    ));
    out
}
