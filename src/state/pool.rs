//! Player pool resolution: a commissioner-uploaded custom pool fully
//! replaces the shared default directory until it is cleared again.
//!
//! Availability is decided by the engine (an entry is available while it
//! appears in no pick record); this module only owns the entries and the
//! ordering rules for search and automatic selection.

use indexmap::IndexMap;
use thiserror::Error;

/// One selectable player, as served by the directory or an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEntry {
    /// Stable identifier in the source system.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Position or category label used for search filtering.
    pub category: String,
    /// Optional tag describing where the entry came from.
    pub origin: Option<String>,
    /// Optional rank; lower ranks are preferred by auto-pick and search.
    pub rank: Option<u32>,
}

/// Where the active pool entries are sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSource {
    /// The shared default directory.
    Default,
    /// A commissioner-uploaded replacement pool.
    Custom,
}

/// Error raised when an uploaded pool contains malformed entries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("rejected {} pool entries: {}", .problems.len(), .problems.join("; "))]
pub struct PoolUploadError {
    /// One message per malformed entry, in upload order.
    pub problems: Vec<String>,
}

/// Per-draft custom pool slot. `None` means the default directory applies.
#[derive(Debug, Clone, Default)]
pub struct PoolState {
    custom: Option<IndexMap<String, PoolEntry>>,
}

impl PoolState {
    /// Whether a custom pool is currently active.
    pub fn use_custom(&self) -> bool {
        self.custom.is_some()
    }

    /// Active source label.
    pub fn source(&self) -> PoolSource {
        if self.use_custom() {
            PoolSource::Custom
        } else {
            PoolSource::Default
        }
    }

    /// Atomically replace the custom pool, validating every entry first.
    ///
    /// Nothing is replaced when any entry is malformed; the error lists
    /// all offending entries so the commissioner can fix the upload in
    /// one pass. Later duplicates of the same id override earlier ones.
    pub fn upload(&mut self, entries: Vec<PoolEntry>) -> Result<usize, PoolUploadError> {
        let problems: Vec<String> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| validate_entry(index, entry))
            .collect();
        if !problems.is_empty() {
            return Err(PoolUploadError { problems });
        }

        let pool: IndexMap<String, PoolEntry> = entries
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();
        let accepted = pool.len();
        self.custom = Some(pool);
        Ok(accepted)
    }

    /// Discard the custom pool and fall back to the default directory.
    pub fn clear(&mut self) {
        self.custom = None;
    }

    /// Entries of the active pool: custom when loaded, else `default_pool`.
    pub fn effective<'a>(
        &'a self,
        default_pool: &'a IndexMap<String, PoolEntry>,
    ) -> &'a IndexMap<String, PoolEntry> {
        self.custom.as_ref().unwrap_or(default_pool)
    }
}

fn validate_entry(index: usize, entry: &PoolEntry) -> Option<String> {
    let mut missing = Vec::new();
    if entry.id.trim().is_empty() {
        missing.push("id");
    }
    if entry.name.trim().is_empty() {
        missing.push("name");
    }
    if entry.category.trim().is_empty() {
        missing.push("category");
    }
    if missing.is_empty() {
        None
    } else {
        Some(format!(
            "entry {} (`{}`): empty {}",
            index + 1,
            entry.id,
            missing.join(", ")
        ))
    }
}

/// Search the pool by case-insensitive name substring and optional exact
/// category, keeping only entries for which `available` holds.
///
/// Results are ordered by ascending rank; unranked entries follow in
/// provider order.
pub fn search<'a>(
    pool: &'a IndexMap<String, PoolEntry>,
    query: &str,
    category: Option<&str>,
    limit: usize,
    mut available: impl FnMut(&str) -> bool,
) -> Vec<&'a PoolEntry> {
    let needle = query.to_lowercase();
    let mut hits: Vec<(usize, &PoolEntry)> = pool
        .values()
        .enumerate()
        .filter(|(_, entry)| {
            (needle.is_empty() || entry.name.to_lowercase().contains(&needle))
                && category.is_none_or(|c| entry.category == c)
                && available(&entry.id)
        })
        .collect();

    hits.sort_by_key(|(index, entry)| (entry.rank.unwrap_or(u32::MAX), *index));
    hits.into_iter()
        .take(limit)
        .map(|(_, entry)| entry)
        .collect()
}

/// Best available entry for automatic selection: lowest rank wins, ties
/// and unranked entries resolve by provider order.
pub fn best_available<'a>(
    pool: &'a IndexMap<String, PoolEntry>,
    mut available: impl FnMut(&str) -> bool,
) -> Option<&'a PoolEntry> {
    pool.values()
        .enumerate()
        .filter(|(_, entry)| available(&entry.id))
        .min_by_key(|(index, entry)| (entry.rank.unwrap_or(u32::MAX), *index))
        .map(|(_, entry)| entry)
}
