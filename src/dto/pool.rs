use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::pool::{PoolEntry, PoolSource};

/// Custom pool upload.
///
/// Uploads come from parsed spreadsheets and exports whose column names
/// vary wildly, so every field accepts the common synonyms here at the
/// boundary; the core [`PoolEntry`] type never sees them.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PoolUploadRequest {
    /// Entries replacing the whole custom pool.
    #[validate(length(min = 1, max = 10000))]
    pub entries: Vec<PoolEntryInput>,
}

/// One uploaded pool entry with synonym field names accepted.
///
/// `Serialize` is required by the length validator on
/// [`PoolUploadRequest::entries`], which echoes the offending value back
/// in validation errors.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PoolEntryInput {
    /// Stable identifier.
    #[serde(alias = "player_id", alias = "playerId", alias = "uid")]
    pub id: String,
    /// Display name.
    #[serde(alias = "player", alias = "player_name", alias = "full_name")]
    pub name: String,
    /// Position or category label.
    #[serde(alias = "position", alias = "pos")]
    pub category: String,
    /// Optional source tag.
    #[serde(default, alias = "source", alias = "origin_tag")]
    pub origin: Option<String>,
    /// Optional rank; lower is better.
    #[serde(default, alias = "overall_rank", alias = "adp")]
    pub rank: Option<u32>,
}

impl From<PoolEntryInput> for PoolEntry {
    fn from(input: PoolEntryInput) -> Self {
        Self {
            id: input.id,
            name: input.name,
            category: input.category,
            origin: input.origin,
            rank: input.rank,
        }
    }
}

/// Active pool source exposed to clients.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PoolSourceDto {
    /// Shared default directory.
    Default,
    /// Commissioner-uploaded custom pool.
    Custom,
}

impl From<PoolSource> for PoolSourceDto {
    fn from(source: PoolSource) -> Self {
        match source {
            PoolSource::Default => PoolSourceDto::Default,
            PoolSource::Custom => PoolSourceDto::Custom,
        }
    }
}

/// Result of a custom pool upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolUploadResponse {
    /// Number of entries now in the custom pool.
    pub accepted: usize,
    /// Active source after the upload.
    pub source: PoolSourceDto,
}

/// Active pool description.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolInfoResponse {
    /// Active source.
    pub source: PoolSourceDto,
    /// Entries in the active pool.
    pub total: usize,
    /// Entries not yet drafted.
    pub available: usize,
}

/// Query parameters accepted by the pool search endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PoolSearchParams {
    /// Case-insensitive name substring; empty matches everything.
    #[serde(default)]
    pub q: Option<String>,
    /// Exact category filter.
    #[serde(default)]
    pub category: Option<String>,
    /// Maximum number of results.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One pool entry as returned by search.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct PoolEntrySummary {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Position or category label.
    pub category: String,
    /// Source tag, when the provider supplied one.
    pub origin: Option<String>,
    /// Rank, when the provider supplied one.
    pub rank: Option<u32>,
}

impl From<&PoolEntry> for PoolEntrySummary {
    fn from(entry: &PoolEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            category: entry.category.clone(),
            origin: entry.origin.clone(),
            rank: entry.rank,
        }
    }
}

/// Search results in preference order.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolSearchResponse {
    /// Matching available entries.
    pub players: Vec<PoolEntrySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonym_field_names_normalize_at_the_boundary() {
        let input: PoolEntryInput = serde_json::from_str(
            r#"{
                "player_id": "espn:42",
                "full_name": "Ada Lovelace",
                "position": "QB",
                "source": "espn",
                "adp": 7
            }"#,
        )
        .unwrap();
        let entry: PoolEntry = input.into();
        assert_eq!(entry.id, "espn:42");
        assert_eq!(entry.name, "Ada Lovelace");
        assert_eq!(entry.category, "QB");
        assert_eq!(entry.origin.as_deref(), Some("espn"));
        assert_eq!(entry.rank, Some(7));
    }

    #[test]
    fn upload_request_rejects_empty_entry_list() {
        let request: PoolUploadRequest = serde_json::from_str(r#"{"entries": []}"#).unwrap();
        assert!(request.validate().is_err());

        let request: PoolUploadRequest = serde_json::from_str(
            r#"{"entries": [{"id": "p1", "name": "Ada", "category": "QB"}]}"#,
        )
        .unwrap();
        request.validate().unwrap();
    }

    #[test]
    fn canonical_field_names_still_work() {
        let input: PoolEntryInput = serde_json::from_str(
            r#"{"id": "p1", "name": "Grace Hopper", "category": "RB"}"#,
        )
        .unwrap();
        let entry: PoolEntry = input.into();
        assert_eq!(entry.id, "p1");
        assert!(entry.origin.is_none());
        assert!(entry.rank.is_none());
    }
}
