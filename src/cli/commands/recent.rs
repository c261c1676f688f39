use std::path::Path;

use crate::presentation::RecentSearches;
use crate::utils::AppError;

pub fn cmd_recent(path: &Path) -> Result<(), AppError> {
    let recent = RecentSearches::load(path)
        .map_err(|e| AppError::Internal(format!("Failed to read {}: {}", path.display(), e)))?;

    if recent.is_empty() {
        println!("No recent searches");
        return Ok(());
    }

    println!("Recent searches:");
    for (i, name) in recent.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }

    Ok(())
}
