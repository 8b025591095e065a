use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        draft::{DraftSnapshot, PickRequest, SnapshotResponse},
        pool::{PoolInfoResponse, PoolSearchParams, PoolSearchResponse},
        queue::{QueueResponse, QueueSetRequest},
    },
    error::AppError,
    services::{draft_service, pool_service, queue_service, snapshot_service},
    state::SharedState,
};

/// Public endpoints used by team clients: polling, picking, queues and
/// pool search.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/drafts/{id}/snapshot", get(get_snapshot))
        .route("/drafts/{id}/pick", post(submit_pick))
        .route(
            "/drafts/{id}/queue/{team_id}",
            get(get_queue).put(put_queue),
        )
        .route("/drafts/{id}/pool", get(get_pool_info))
        .route("/drafts/{id}/pool/search", get(search_pool))
}

/// Poll the live state of a draft.
///
/// A poll that observes an expired pick clock triggers the automatic pick
/// before responding, so pollers always see the draft progressing.
#[utoipa::path(
    get,
    path = "/drafts/{id}/snapshot",
    tag = "draft",
    params(("id" = Uuid, Path, description = "Draft identifier")),
    responses((status = 200, description = "Current snapshot, or an empty payload for unknown ids", body = SnapshotResponse))
)]
pub async fn get_snapshot(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Json<SnapshotResponse> {
    Json(snapshot_service::snapshot(&state, id).await)
}

/// Submit a manual pick for the team on the clock.
#[utoipa::path(
    post,
    path = "/drafts/{id}/pick",
    tag = "draft",
    params(("id" = Uuid, Path, description = "Draft identifier")),
    request_body = PickRequest,
    responses(
        (status = 200, description = "Pick committed", body = DraftSnapshot),
        (status = 409, description = "Out of turn, unavailable player, or a lost race")
    )
)]
pub async fn submit_pick(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PickRequest>,
) -> Result<Json<DraftSnapshot>, AppError> {
    Ok(Json(draft_service::pick(&state, id, request).await?))
}

/// Retrieve a team's pick queue.
#[utoipa::path(
    get,
    path = "/drafts/{id}/queue/{team_id}",
    tag = "draft",
    params(
        ("id" = Uuid, Path, description = "Draft identifier"),
        ("team_id" = Uuid, Path, description = "Team identifier")
    ),
    responses((status = 200, description = "Queue in priority order, empty when never set", body = QueueResponse))
)]
pub async fn get_queue(
    State(state): State<SharedState>,
    Path((id, team_id)): Path<(Uuid, Uuid)>,
) -> Json<QueueResponse> {
    Json(queue_service::get_queue(&state, id, team_id).await)
}

/// Replace a team's pick queue wholesale.
#[utoipa::path(
    put,
    path = "/drafts/{id}/queue/{team_id}",
    tag = "draft",
    params(
        ("id" = Uuid, Path, description = "Draft identifier"),
        ("team_id" = Uuid, Path, description = "Team identifier")
    ),
    request_body = QueueSetRequest,
    responses(
        (status = 200, description = "Queue replaced", body = QueueResponse),
        (status = 400, description = "Duplicate entries or unknown team")
    )
)]
pub async fn put_queue(
    State(state): State<SharedState>,
    Path((id, team_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<QueueSetRequest>,
) -> Result<Json<QueueResponse>, AppError> {
    Ok(Json(
        queue_service::set_queue(&state, id, team_id, request).await?,
    ))
}

/// Describe the active pool for a draft.
#[utoipa::path(
    get,
    path = "/drafts/{id}/pool",
    tag = "draft",
    params(("id" = Uuid, Path, description = "Draft identifier")),
    responses((status = 200, description = "Active pool source and counts; unknown ids degrade to the default pool view", body = PoolInfoResponse))
)]
pub async fn get_pool_info(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Json<PoolInfoResponse> {
    Json(pool_service::pool_info(&state, id).await)
}

/// Search the active pool for still-available players.
#[utoipa::path(
    get,
    path = "/drafts/{id}/pool/search",
    tag = "draft",
    params(
        ("id" = Uuid, Path, description = "Draft identifier"),
        ("q" = Option<String>, Query, description = "Case-insensitive name substring"),
        ("category" = Option<String>, Query, description = "Exact category filter"),
        ("limit" = Option<usize>, Query, description = "Maximum number of results")
    ),
    responses((status = 200, description = "Available entries in preference order", body = PoolSearchResponse))
)]
pub async fn search_pool(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PoolSearchParams>,
) -> Json<PoolSearchResponse> {
    Json(pool_service::search_pool(&state, id, params).await)
}
