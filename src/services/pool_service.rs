//! Pool inspection, custom pool management and availability search.

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::pool::{
        PoolEntrySummary, PoolInfoResponse, PoolSearchParams, PoolSearchResponse,
        PoolUploadRequest, PoolUploadResponse,
    },
    error::ServiceError,
    services::draft_service::require_room,
    state::{SharedState, pool::PoolSource},
};

const DEFAULT_SEARCH_LIMIT: usize = 25;
const MAX_SEARCH_LIMIT: usize = 200;

/// Active pool source and counts for a draft. Unknown draft ids degrade
/// to a view of the shared default pool with nothing drafted.
pub async fn pool_info(state: &SharedState, id: Uuid) -> PoolInfoResponse {
    let default_pool = state.default_pool().await;
    let Some(room) = state.room(id) else {
        return PoolInfoResponse {
            source: PoolSource::Default.into(),
            total: default_pool.len(),
            available: default_pool.len(),
        };
    };
    let engine = room.engine().read().await;
    let (total, available) = engine.pool_counts(&default_pool);
    PoolInfoResponse {
        source: engine.pool_source().into(),
        total,
        available,
    }
}

/// Replace a draft's custom pool atomically. A rejected upload leaves the
/// previous pool untouched.
pub async fn upload_pool(
    state: &SharedState,
    id: Uuid,
    request: PoolUploadRequest,
) -> Result<PoolUploadResponse, ServiceError> {
    request.validate()?;
    let room = require_room(state, id)?;
    let entries = request.entries.into_iter().map(Into::into).collect();
    let mut engine = room.engine().write().await;
    let accepted = engine.upload_pool(entries)?;
    info!(draft_id = %id, accepted, "custom pool installed");
    Ok(PoolUploadResponse {
        accepted,
        source: engine.pool_source().into(),
    })
}

/// Discard the custom pool and fall back to the default directory.
pub async fn clear_pool(state: &SharedState, id: Uuid) -> Result<PoolInfoResponse, ServiceError> {
    let room = require_room(state, id)?;
    let default_pool = state.default_pool().await;
    let mut engine = room.engine().write().await;
    engine.clear_pool();
    info!(draft_id = %id, "custom pool cleared");
    let (total, available) = engine.pool_counts(&default_pool);
    Ok(PoolInfoResponse {
        source: engine.pool_source().into(),
        total,
        available,
    })
}

/// Search the active pool for still-available players. Unknown draft ids
/// degrade to an empty result set.
pub async fn search_pool(
    state: &SharedState,
    id: Uuid,
    params: PoolSearchParams,
) -> PoolSearchResponse {
    let Some(room) = state.room(id) else {
        return PoolSearchResponse {
            players: Vec::new(),
        };
    };
    let default_pool = state.default_pool().await;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);
    let engine = room.engine().read().await;
    let players = engine
        .search_pool(
            &default_pool,
            params.q.as_deref().unwrap_or(""),
            params.category.as_deref(),
            limit,
        )
        .into_iter()
        .map(PoolEntrySummary::from)
        .collect();
    PoolSearchResponse { players }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::{
            draft::{CreateDraftRequest, TeamInput},
            pool::PoolSourceDto,
        },
        services::draft_service,
        state::{AppState, pool::PoolEntry},
    };

    fn pool_entries(ids: &[&str]) -> Vec<PoolEntry> {
        ids.iter()
            .map(|id| PoolEntry {
                id: (*id).to_string(),
                name: format!("Player {id}"),
                category: "QB".to_string(),
                origin: None,
                rank: None,
            })
            .collect()
    }

    async fn draft(state: &SharedState) -> Uuid {
        draft_service::create_draft(
            state,
            CreateDraftRequest {
                year: 2026,
                rounds: Some(1),
                clock_seconds: Some(60),
                snake: true,
                randomize_order: false,
                teams: vec![TeamInput {
                    name: "Alpha".into(),
                }],
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn unknown_draft_degrades_to_default_pool_view() {
        let state = AppState::new(AppConfig::default());
        state.install_default_pool(pool_entries(&["p1", "p2"])).await;

        let info = pool_info(&state, Uuid::new_v4()).await;
        assert_eq!(info.source, PoolSourceDto::Default);
        assert_eq!(info.total, 2);
        assert_eq!(info.available, 2);

        let results = search_pool(&state, Uuid::new_v4(), PoolSearchParams::default()).await;
        assert!(results.players.is_empty());
    }

    #[tokio::test]
    async fn upload_switches_source_and_clear_reverts() {
        let state = AppState::new(AppConfig::default());
        state.install_default_pool(pool_entries(&["d1"])).await;
        let id = draft(&state).await;

        let request: PoolUploadRequest = serde_json::from_str(
            r#"{"entries": [
                {"id": "c1", "name": "Custom One", "category": "RB"},
                {"id": "c2", "name": "Custom Two", "category": "WR"}
            ]}"#,
        )
        .unwrap();
        let response = upload_pool(&state, id, request).await.unwrap();
        assert_eq!(response.accepted, 2);
        assert_eq!(response.source, PoolSourceDto::Custom);

        let info = pool_info(&state, id).await;
        assert_eq!(info.total, 2);

        let info = clear_pool(&state, id).await.unwrap();
        assert_eq!(info.source, PoolSourceDto::Default);
        assert_eq!(info.total, 1);
    }
}
