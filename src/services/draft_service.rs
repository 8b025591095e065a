//! Draft lifecycle orchestration: creation, listing, clock control and
//! every mutating pick path. All mutations run under the room's write
//! lock, which is what makes each slot commit exactly once.

use std::sync::Arc;

use rand::seq::SliceRandom;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::draft::{
        AutoPickRequest, CreateDraftRequest, DraftSnapshot, DraftSummary, ForcePickRequest,
        PickRequest, SetClockRequest,
    },
    error::ServiceError,
    state::{
        DraftEngine, DraftRoom, DraftStatus, SharedState,
        engine::{DraftConfig, Team},
    },
};

/// Create a new draft from a commissioner request.
///
/// Rejects a second non-completed draft for the same year. The submitted
/// team order becomes the round-one order, after an optional shuffle.
pub async fn create_draft(
    state: &SharedState,
    request: CreateDraftRequest,
) -> Result<DraftSummary, ServiceError> {
    request.validate()?;

    // Check-then-insert must be atomic or two creators for the same year
    // can both pass the guard.
    let _gate = state.create_gate().lock().await;

    for room in state.rooms() {
        let engine = room.engine().read().await;
        if engine.year() == request.year && engine.status() != DraftStatus::Completed {
            return Err(ServiceError::InvalidState(format!(
                "a draft for {} already exists and is not completed",
                request.year
            )));
        }
    }

    let mut names = Vec::with_capacity(request.teams.len());
    for team in &request.teams {
        let name = team.name.trim();
        if names.iter().any(|existing: &String| existing == name) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate team name '{name}'"
            )));
        }
        names.push(name.to_owned());
    }

    let mut teams: Vec<Team> = names
        .into_iter()
        .map(|name| Team {
            id: Uuid::new_v4(),
            name,
        })
        .collect();
    if request.randomize_order {
        teams.shuffle(&mut rand::rng());
    }

    let config = state.config();
    let engine = DraftEngine::new(
        DraftConfig {
            year: request.year,
            rounds: request.rounds.unwrap_or(config.default_rounds),
            clock_seconds: request.clock_seconds.unwrap_or(config.default_clock_seconds),
            snake: request.snake,
        },
        teams,
        OffsetDateTime::now_utc(),
    );

    let id = engine.id();
    let summary = DraftSummary::from(&engine);
    state.insert_room(id, Arc::new(DraftRoom::new(engine)));
    info!(draft_id = %id, year = request.year, teams = summary.teams.len(), "draft created");
    Ok(summary)
}

/// All known drafts, newest season first.
pub async fn list_drafts(state: &SharedState) -> Vec<DraftSummary> {
    let mut summaries = Vec::new();
    for room in state.rooms() {
        let engine = room.engine().read().await;
        summaries.push(DraftSummary::from(&*engine));
    }
    summaries.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.created_at.cmp(&b.created_at)));
    summaries
}

/// Start the draft and arm the first pick clock.
pub async fn start(state: &SharedState, id: Uuid) -> Result<DraftSnapshot, ServiceError> {
    let room = require_room(state, id)?;
    let now = OffsetDateTime::now_utc();
    let mut engine = room.engine().write().await;
    engine.start(now)?;
    info!(draft_id = %id, "draft started");
    Ok(snapshot_of(state, &engine, now, false))
}

/// Freeze the countdown.
pub async fn pause(state: &SharedState, id: Uuid) -> Result<DraftSnapshot, ServiceError> {
    let room = require_room(state, id)?;
    let now = OffsetDateTime::now_utc();
    let mut engine = room.engine().write().await;
    engine.pause(now)?;
    info!(draft_id = %id, "draft paused");
    Ok(snapshot_of(state, &engine, now, false))
}

/// Resume a paused draft with the frozen remainder on the clock.
pub async fn resume(state: &SharedState, id: Uuid) -> Result<DraftSnapshot, ServiceError> {
    let room = require_room(state, id)?;
    let now = OffsetDateTime::now_utc();
    let mut engine = room.engine().write().await;
    engine.resume(now)?;
    info!(draft_id = %id, "draft resumed");
    Ok(snapshot_of(state, &engine, now, false))
}

/// Change the pick clock duration mid-draft.
pub async fn set_clock(
    state: &SharedState,
    id: Uuid,
    request: SetClockRequest,
) -> Result<DraftSnapshot, ServiceError> {
    request.validate()?;
    let room = require_room(state, id)?;
    let now = OffsetDateTime::now_utc();
    let mut engine = room.engine().write().await;
    engine.set_clock(request.seconds, now)?;
    info!(draft_id = %id, seconds = request.seconds, "pick clock reconfigured");
    Ok(snapshot_of(state, &engine, now, false))
}

/// Commit a manual pick for the team on the clock.
pub async fn pick(
    state: &SharedState,
    id: Uuid,
    request: PickRequest,
) -> Result<DraftSnapshot, ServiceError> {
    request.validate()?;
    let room = require_room(state, id)?;
    let default_pool = state.default_pool().await;
    let now = OffsetDateTime::now_utc();
    let mut engine = room.engine().write().await;
    let record = engine.pick(
        request.team_id,
        &request.player_id,
        request.version,
        &default_pool,
        now,
    )?;
    info!(
        draft_id = %id,
        team_id = %request.team_id,
        player_id = %request.player_id,
        overall = record.overall,
        "pick committed"
    );
    Ok(snapshot_of(state, &engine, now, false))
}

/// Commissioner pick on behalf of whichever team is on the clock.
pub async fn force_pick(
    state: &SharedState,
    id: Uuid,
    request: ForcePickRequest,
) -> Result<DraftSnapshot, ServiceError> {
    request.validate()?;
    let room = require_room(state, id)?;
    let default_pool = state.default_pool().await;
    let now = OffsetDateTime::now_utc();
    let mut engine = room.engine().write().await;
    let record = engine.force_pick(&request.player_id, request.version, &default_pool, now)?;
    info!(
        draft_id = %id,
        player_id = %request.player_id,
        overall = record.overall,
        "pick forced"
    );
    Ok(snapshot_of(state, &engine, now, false))
}

/// Automatic pick for the team on the clock: queue first, then the
/// best-ranked available entry. Used both by the explicit admin route and
/// by the snapshot path when it observes an expired clock.
pub async fn auto_pick(
    state: &SharedState,
    id: Uuid,
    request: AutoPickRequest,
) -> Result<DraftSnapshot, ServiceError> {
    let room = require_room(state, id)?;
    let default_pool = state.default_pool().await;
    let now = OffsetDateTime::now_utc();
    let mut engine = room.engine().write().await;
    let record = engine.auto_pick(request.version, &default_pool, now)?;
    info!(
        draft_id = %id,
        player_id = %record.player_id,
        overall = record.overall,
        "automatic pick committed"
    );
    Ok(snapshot_of(state, &engine, now, false))
}

/// Remove the most recent pick and hand the restored team a fresh clock.
pub async fn undo(state: &SharedState, id: Uuid) -> Result<DraftSnapshot, ServiceError> {
    let room = require_room(state, id)?;
    let now = OffsetDateTime::now_utc();
    let mut engine = room.engine().write().await;
    let record = engine.undo(now)?;
    info!(
        draft_id = %id,
        player_id = %record.player_id,
        overall = record.overall,
        "pick undone"
    );
    Ok(snapshot_of(state, &engine, now, false))
}

/// Room lookup for mutating paths, which surface unknown ids as errors
/// instead of degrading the way reads do.
pub(crate) fn require_room(
    state: &SharedState,
    id: Uuid,
) -> Result<Arc<DraftRoom>, ServiceError> {
    state
        .room(id)
        .ok_or_else(|| ServiceError::NotFound(format!("no draft with id {id}")))
}

/// Project the engine into the poll payload using the configured windows.
pub(crate) fn snapshot_of(
    state: &SharedState,
    engine: &DraftEngine,
    now: OffsetDateTime,
    stalled: bool,
) -> DraftSnapshot {
    let config = state.config();
    DraftSnapshot::from_engine(
        engine,
        now,
        config.recent_picks_window,
        config.upcoming_window,
        stalled,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::draft::TeamInput,
        state::{AppState, pool::PoolEntry},
    };

    fn create_request(year: u16, team_names: &[&str]) -> CreateDraftRequest {
        CreateDraftRequest {
            year,
            rounds: Some(2),
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
            .enumerate()
            .map(|(index, id)| PoolEntry {
                id: (*id).to_string(),
                name: format!("Player {id}"),
                category: "QB".to_string(),
                origin: None,
                rank: Some(index as u32 + 1),
            })
            .collect()
    }

    async fn live_draft(state: &SharedState, year: u16) -> Uuid {
        let summary = create_draft(state, create_request(year, &["Alpha", "Bravo"]))
            .await
            .unwrap();
        start(state, summary.id).await.unwrap();
        summary.id
    }

    #[tokio::test]
    async fn second_draft_for_same_year_is_rejected() {
        let state = AppState::new(AppConfig::default());
        state.install_default_pool(pool_entries(&["p1", "p2"])).await;

        create_draft(&state, create_request(2026, &["Alpha", "Bravo"]))
            .await
            .unwrap();
        let err = create_draft(&state, create_request(2026, &["Charlie", "Delta"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        // A different year is fine.
        create_draft(&state, create_request(2027, &["Alpha", "Bravo"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn concurrent_creates_for_same_year_commit_once() {
        let state = AppState::new(AppConfig::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move {
                    create_draft(&state, create_request(2026, &["Alpha", "Bravo"])).await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(state.rooms().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_team_names_are_rejected() {
        let state = AppState::new(AppConfig::default());
        let err = create_draft(&state, create_request(2026, &["Alpha", "Alpha"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn defaults_fill_in_missing_rounds_and_clock() {
        let state = AppState::new(AppConfig::default());
        let mut request = create_request(2026, &["Alpha"]);
        request.rounds = None;
        request.clock_seconds = None;
        let summary = create_draft(&state, request).await.unwrap();
        assert_eq!(summary.rounds, AppConfig::default().default_rounds);
        assert_eq!(
            summary.clock_seconds,
            AppConfig::default().default_clock_seconds
        );
    }

    #[tokio::test]
    async fn concurrent_picks_with_same_observed_version_commit_once() {
        let state = AppState::new(AppConfig::default());
        state
            .install_default_pool(pool_entries(&["p1", "p2", "p3", "p4"]))
            .await;
        let id = live_draft(&state, 2026).await;

        let observed = {
            let room = state.room(id).unwrap();
            let engine = room.engine().read().await;
            engine.version()
        };

        // Both callers saw the same snapshot; the write lock serializes
        // them and the version check rejects the loser.
        let first = auto_pick(
            &state,
            id,
            AutoPickRequest {
                version: Some(observed),
            },
        );
        let second = auto_pick(
            &state,
            id,
            AutoPickRequest {
                version: Some(observed),
            },
        );
        let (first, second) = tokio::join!(first, second);

        let successes = [&first, &second]
            .iter()
            .filter(|result| result.is_ok())
            .count();
        assert_eq!(successes, 1);

        let room = state.room(id).unwrap();
        let engine = room.engine().read().await;
        assert_eq!(engine.history().len(), 1);
    }

    #[tokio::test]
    async fn undo_after_pick_restores_the_slot() {
        let state = AppState::new(AppConfig::default());
        state.install_default_pool(pool_entries(&["p1", "p2"])).await;
        let id = live_draft(&state, 2026).await;

        let snapshot = auto_pick(&state, id, AutoPickRequest::default())
            .await
            .unwrap();
        assert_eq!(snapshot.current_overall, 2);

        let snapshot = undo(&state, id).await.unwrap();
        assert_eq!(snapshot.current_overall, 1);
        assert!(snapshot.recent_picks.is_empty());
        assert_eq!(snapshot.remaining_seconds, 60);
    }

    #[tokio::test]
    async fn mutations_on_unknown_drafts_are_not_found() {
        let state = AppState::new(AppConfig::default());
        let err = start(&state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
