//! Directory backed by an external HTTP player service.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;

use super::{DirectoryError, DirectoryResult, PlayerDirectory};
use crate::state::pool::PoolEntry;

/// Directory fetching the default pool from `GET {base_url}/players`.
#[derive(Clone)]
pub struct HttpDirectory {
    client: Client,
    base_url: Arc<str>,
}

/// Wire representation served by the player service.
#[derive(Debug, Deserialize)]
struct WirePlayer {
    id: String,
    name: String,
    category: String,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    rank: Option<u32>,
}

impl From<WirePlayer> for PoolEntry {
    fn from(player: WirePlayer) -> Self {
        Self {
            id: player.id,
            name: player.name,
            category: player.category,
            origin: player.origin,
            rank: player.rank,
        }
    }
}

impl HttpDirectory {
    /// Build a client for the given base URL.
    pub fn new(base_url: impl AsRef<str>) -> DirectoryResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| DirectoryError::unavailable("building HTTP client".into(), source))?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
        })
    }

    /// Read the base URL from `PLAYER_DIRECTORY_URL`.
    pub fn from_env() -> Option<DirectoryResult<Self>> {
        std::env::var("PLAYER_DIRECTORY_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .map(Self::new)
    }
}

impl PlayerDirectory for HttpDirectory {
    fn fetch_pool(&self) -> BoxFuture<'static, DirectoryResult<Vec<PoolEntry>>> {
        let client = self.client.clone();
        let url = format!("{}/players", self.base_url);
        Box::pin(async move {
            let response = client
                .get(&url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|source| {
                    DirectoryError::unavailable(format!("fetching `{url}`"), source)
                })?;
            let players: Vec<WirePlayer> = response.json().await.map_err(|source| {
                DirectoryError::unavailable(format!("decoding `{url}`"), source)
            })?;
            Ok(players.into_iter().map(Into::into).collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, DirectoryResult<()>> {
        let client = self.client.clone();
        let url = format!("{}/players", self.base_url);
        Box::pin(async move {
            client
                .head(&url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map(|_| ())
                .map_err(|source| DirectoryError::unavailable(format!("probing `{url}`"), source))
        })
    }
}
