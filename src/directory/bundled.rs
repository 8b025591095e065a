//! Default directory backed by a JSON file shipped alongside the binary.

use std::{fs, io, path::PathBuf};

use futures::future::BoxFuture;
use serde::Deserialize;

use super::{DirectoryError, DirectoryResult, PlayerDirectory};
use crate::state::pool::PoolEntry;

/// Directory reading a JSON array of players from disk.
///
/// The file is re-read on every fetch so a commissioner can swap it out
/// without restarting the service; the supervisor's refresh loop picks
/// the change up.
#[derive(Debug, Clone)]
pub struct BundledDirectory {
    path: PathBuf,
}

/// On-disk representation of one directory entry.
#[derive(Debug, Deserialize)]
struct DirectoryRecord {
    id: String,
    name: String,
    category: String,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    rank: Option<u32>,
}

impl From<DirectoryRecord> for PoolEntry {
    fn from(record: DirectoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            category: record.category,
            origin: record.origin,
            rank: record.rank,
        }
    }
}

impl BundledDirectory {
    /// Point the directory at a players file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_entries(&self) -> DirectoryResult<Vec<PoolEntry>> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            DirectoryError::unavailable(
                format!("reading players file `{}`", self.path.display()),
                source,
            )
        })?;
        let records: Vec<DirectoryRecord> = serde_json::from_str(&contents).map_err(|source| {
            DirectoryError::unavailable(
                format!("parsing players file `{}`", self.path.display()),
                source,
            )
        })?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}

impl PlayerDirectory for BundledDirectory {
    fn fetch_pool(&self) -> BoxFuture<'static, DirectoryResult<Vec<PoolEntry>>> {
        let directory = self.clone();
        Box::pin(async move { directory.read_entries() })
    }

    fn health_check(&self) -> BoxFuture<'static, DirectoryResult<()>> {
        let directory = self.clone();
        Box::pin(async move {
            if directory.path.is_file() {
                Ok(())
            } else {
                Err(DirectoryError::unavailable(
                    format!("players file `{}` missing", directory.path.display()),
                    io::Error::new(io::ErrorKind::NotFound, "not a file"),
                ))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("players-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn fetches_entries_in_file_order() {
        let path = write_temp(
            r#"[
                {"id": "p1", "name": "Ada Lovelace", "category": "QB", "rank": 2},
                {"id": "p2", "name": "Grace Hopper", "category": "RB"}
            ]"#,
        );
        let directory = BundledDirectory::new(path.clone());

        let entries = directory.fetch_pool().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "p1");
        assert_eq!(entries[0].rank, Some(2));
        assert_eq!(entries[1].rank, None);

        directory.health_check().await.unwrap();
        fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn missing_file_reports_unavailable() {
        let directory = BundledDirectory::new(PathBuf::from("/nonexistent/players.json"));
        assert!(directory.fetch_pool().await.is_err());
        assert!(directory.health_check().await.is_err());
    }

    #[tokio::test]
    async fn malformed_json_reports_unavailable() {
        let path = write_temp("not json");
        let directory = BundledDirectory::new(path.clone());
        assert!(directory.fetch_pool().await.is_err());
        fs::remove_file(path).unwrap();
    }
}
