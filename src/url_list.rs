//! Loading of the JSON URL lists (`repos.json`, `links.json`).

use std::path::Path;

use log::{debug, warn};

use crate::error::{BotError, Result};

/// Read a JSON array of strings from `path`.
///
/// The file is re-read on every call. A missing or unreadable file, invalid
/// JSON, anything other than an array of strings, or an empty array all
/// yield [`BotError::ConfigurationMissing`].
pub async fn load_url_list(path: &Path) -> Result<Vec<String>> {
    let missing = || BotError::ConfigurationMissing(path.display().to_string());

    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        warn!("Failed to read {}: {e}", path.display());
        missing()
    })?;

    let urls: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
        warn!("{} is not a JSON array of strings: {e}", path.display());
        missing()
    })?;

    if urls.is_empty() {
        debug!("{} is empty", path.display());
        return Err(missing());
    }

    debug!("Loaded {} entries from {}", urls.len(), path.display());
    Ok(urls)
}
