//! Export reading and topic resolution.
//!
//! An export is one crawl result file; its provenance (which topic it was
//! collected from) is implicit in the containing directory's name.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use crate::domain::RawExport;

/// Sentinel topic id used when the export path does not follow the naming
/// convention. Ingestion proceeds regardless.
pub const UNKNOWN_TOPIC_ID: &str = "unknown";

/// Read and parse one export file. Absence or malformed JSON is fatal.
pub async fn read_export(path: &Path) -> Result<RawExport> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read export file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse export file: {}", path.display()))
}

/// Derive the topic id from the export path's containing directory.
///
/// Expected convention: `topic_{id}_{timestamp}`, e.g.
/// `topic_27814732_2026-01-14T15-38-05`. Falls back to [`UNKNOWN_TOPIC_ID`]
/// when the convention does not match.
pub fn resolve_topic_id(export_path: &Path) -> String {
    export_path
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .and_then(topic_id_from_dirname)
        .unwrap_or_else(|| UNKNOWN_TOPIC_ID.to_string())
}

/// Provenance tag stamped onto questions, articles and stats created from a
/// topic's feed.
pub fn feed_source_tag(topic_id: &str) -> String {
    format!("topic_feed:{}", topic_id)
}

/// The digit run following a `topic_` token, if any.
fn topic_id_from_dirname(name: &str) -> Option<String> {
    for (idx, _) in name.match_indices("topic_") {
        let digits: String = name[idx + "topic_".len()..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if !digits.is_empty() {
            return Some(digits);
        }
    }
    None
}
