//! Poll snapshots.
//!
//! Clock expiry is handled lazily here: a poll that observes an expired
//! countdown triggers one automatic pick, tagged with the version it
//! observed so concurrent polls race for a single commit. Losing the race
//! is the normal outcome for every poller but one.

use time::OffsetDateTime;
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    dto::draft::{AutoPickRequest, SnapshotResponse},
    error::ServiceError,
    services::draft_service,
    state::{DraftError, SharedState},
};

/// Snapshot for pollers. Unknown draft ids degrade to an empty payload
/// rather than an error.
pub async fn snapshot(state: &SharedState, id: Uuid) -> SnapshotResponse {
    snapshot_at(state, id, OffsetDateTime::now_utc()).await
}

/// Snapshot as observed at `now`, which is what decides whether the
/// expiry auto-pick fires.
pub(crate) async fn snapshot_at(
    state: &SharedState,
    id: Uuid,
    now: OffsetDateTime,
) -> SnapshotResponse {
    let Some(room) = state.room(id) else {
        return SnapshotResponse { draft: None };
    };

    let (expired_version, current) = {
        let engine = room.engine().read().await;
        let version = engine.clock_expired(now).then(|| engine.version());
        (
            version,
            draft_service::snapshot_of(state, &engine, now, false),
        )
    };

    let Some(version) = expired_version else {
        return SnapshotResponse {
            draft: Some(current),
        };
    };

    match draft_service::auto_pick(
        state,
        id,
        AutoPickRequest {
            version: Some(version),
        },
    )
    .await
    {
        Ok(after) => SnapshotResponse { draft: Some(after) },
        Err(ServiceError::Draft(DraftError::PoolExhausted)) => {
            error!(draft_id = %id, "clock expired with no available player; draft stalled");
            SnapshotResponse {
                draft: Some(rebuild(state, id, true).await.unwrap_or(current)),
            }
        }
        Err(err) => {
            // Another caller committed the slot first; serve their result.
            debug!(draft_id = %id, error = %err, "expiry auto-pick lost the race");
            SnapshotResponse {
                draft: Some(rebuild(state, id, false).await.unwrap_or(current)),
            }
        }
    }
}

async fn rebuild(
    state: &SharedState,
    id: Uuid,
    stalled: bool,
) -> Option<crate::dto::draft::DraftSnapshot> {
    let room = state.room(id)?;
    let now = OffsetDateTime::now_utc();
    let engine = room.engine().read().await;
    Some(draft_service::snapshot_of(state, &engine, now, stalled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::draft::{CreateDraftRequest, TeamInput},
        state::{AppState, pool::PoolEntry},
    };
    use time::Duration;

    fn create_request(rounds: u32, team_names: &[&str]) -> CreateDraftRequest {
        CreateDraftRequest {
            year: 2026,
            rounds: Some(rounds),
            clock_seconds: Some(60),
            snake: true,
            randomize_order: false,
            teams: team_names
                .iter()
                .map(|name| TeamInput {
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }

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

    #[tokio::test]
    async fn unknown_draft_degrades_to_empty_payload() {
        let state = AppState::new(AppConfig::default());
        let response = snapshot(&state, Uuid::new_v4()).await;
        assert!(response.draft.is_none());
    }

    #[tokio::test]
    async fn known_draft_reports_version_and_status() {
        let state = AppState::new(AppConfig::default());
        let summary = draft_service::create_draft(&state, create_request(1, &["Alpha"]))
            .await
            .unwrap();

        let response = snapshot(&state, summary.id).await;
        let draft = response.draft.unwrap();
        assert_eq!(draft.id, summary.id);
        assert_eq!(draft.version, 0);
        assert!(!draft.stalled);
        assert_eq!(draft.total_slots, 1);
    }

    #[tokio::test]
    async fn expired_clock_observed_by_poll_commits_an_auto_pick() {
        let state = AppState::new(AppConfig::default());
        state.install_default_pool(pool_entries(&["p1", "p2"])).await;
        let summary = draft_service::create_draft(&state, create_request(1, &["Alpha", "Bravo"]))
            .await
            .unwrap();
        draft_service::start(&state, summary.id).await.unwrap();

        let past_deadline = OffsetDateTime::now_utc() + Duration::seconds(120);
        let response = snapshot_at(&state, summary.id, past_deadline).await;
        let draft = response.draft.unwrap();
        assert_eq!(draft.current_overall, 2);
        assert!(!draft.stalled);

        let room = state.room(summary.id).unwrap();
        let engine = room.engine().read().await;
        assert_eq!(engine.history().len(), 1);
        assert!(engine.history()[0].auto);
    }

    #[tokio::test]
    async fn concurrent_expiry_observations_commit_exactly_once() {
        let state = AppState::new(AppConfig::default());
        state
            .install_default_pool(pool_entries(&["p1", "p2", "p3", "p4"]))
            .await;
        let summary = draft_service::create_draft(&state, create_request(2, &["Alpha", "Bravo"]))
            .await
            .unwrap();
        draft_service::start(&state, summary.id).await.unwrap();

        let past_deadline = OffsetDateTime::now_utc() + Duration::seconds(120);
        let (first, second) = tokio::join!(
            snapshot_at(&state, summary.id, past_deadline),
            snapshot_at(&state, summary.id, past_deadline),
        );
        assert!(first.draft.is_some());
        assert!(second.draft.is_some());

        // Both polls observed the same expired slot; one auto-pick won,
        // the other lost the version race and just reread.
        let room = state.room(summary.id).unwrap();
        let engine = room.engine().read().await;
        assert_eq!(engine.history().len(), 1);
    }

    #[tokio::test]
    async fn expiry_with_exhausted_pool_marks_snapshot_stalled() {
        let state = AppState::new(AppConfig::default());
        state.install_default_pool(pool_entries(&["p1"])).await;
        let summary = draft_service::create_draft(&state, create_request(1, &["Alpha", "Bravo"]))
            .await
            .unwrap();
        draft_service::start(&state, summary.id).await.unwrap();

        // First expiry drains the only entry, second finds nothing left.
        let past_deadline = OffsetDateTime::now_utc() + Duration::seconds(120);
        snapshot_at(&state, summary.id, past_deadline).await;
        let response = snapshot_at(&state, summary.id, past_deadline + Duration::seconds(120)).await;

        let draft = response.draft.unwrap();
        assert!(draft.stalled);
        assert_eq!(draft.current_overall, 2);

        let room = state.room(summary.id).unwrap();
        let engine = room.engine().read().await;
        assert_eq!(engine.history().len(), 1);
    }
}
