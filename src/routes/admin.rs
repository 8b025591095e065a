use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        draft::{
            AutoPickRequest, CreateDraftRequest, DraftSnapshot, DraftSummary, ForcePickRequest,
            SetClockRequest,
        },
        pool::{PoolInfoResponse, PoolUploadRequest, PoolUploadResponse},
    },
    error::AppError,
    services::{draft_service, pool_service},
    state::SharedState,
};

const COMMISSIONER_TOKEN_HEADER: &str = "x-commissioner-token";

/// Commissioner-only endpoints for creating and driving drafts.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/drafts", get(list_drafts).post(create_draft))
        .route("/admin/drafts/{id}/start", post(start_draft))
        .route("/admin/drafts/{id}/pause", post(pause_draft))
        .route("/admin/drafts/{id}/resume", post(resume_draft))
        .route("/admin/drafts/{id}/clock", post(set_clock))
        .route("/admin/drafts/{id}/undo", post(undo_pick))
        .route("/admin/drafts/{id}/auto-pick", post(auto_pick))
        .route("/admin/drafts/{id}/force-pick", post(force_pick))
        .route(
            "/admin/drafts/{id}/pool",
            post(upload_pool).delete(clear_pool),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            require_commissioner_token,
        ))
}

/// List every draft known to the process, newest season first.
#[utoipa::path(
    get,
    path = "/admin/drafts",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration")),
    responses((status = 200, description = "Known drafts", body = [DraftSummary]))
)]
pub async fn list_drafts(State(state): State<SharedState>) -> Json<Vec<DraftSummary>> {
    Json(draft_service::list_drafts(&state).await)
}

/// Create a new draft.
#[utoipa::path(
    post,
    path = "/admin/drafts",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration")),
    request_body = CreateDraftRequest,
    responses(
        (status = 200, description = "Draft created", body = DraftSummary),
        (status = 409, description = "A non-completed draft already exists for the year")
    )
)]
pub async fn create_draft(
    State(state): State<SharedState>,
    Json(request): Json<CreateDraftRequest>,
) -> Result<Json<DraftSummary>, AppError> {
    Ok(Json(draft_service::create_draft(&state, request).await?))
}

/// Start the draft and arm the first pick clock.
#[utoipa::path(
    post,
    path = "/admin/drafts/{id}/start",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    responses(
        (status = 200, description = "Draft started", body = DraftSnapshot),
        (status = 409, description = "Draft is not in the not-started state")
    )
)]
pub async fn start_draft(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftSnapshot>, AppError> {
    Ok(Json(draft_service::start(&state, id).await?))
}

/// Freeze the pick clock.
#[utoipa::path(
    post,
    path = "/admin/drafts/{id}/pause",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    responses(
        (status = 200, description = "Draft paused", body = DraftSnapshot),
        (status = 409, description = "Draft is not live")
    )
)]
pub async fn pause_draft(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftSnapshot>, AppError> {
    Ok(Json(draft_service::pause(&state, id).await?))
}

/// Resume a paused draft with the frozen remainder on the clock.
#[utoipa::path(
    post,
    path = "/admin/drafts/{id}/resume",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    responses(
        (status = 200, description = "Draft resumed", body = DraftSnapshot),
        (status = 409, description = "Draft is not paused")
    )
)]
pub async fn resume_draft(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftSnapshot>, AppError> {
    Ok(Json(draft_service::resume(&state, id).await?))
}

/// Change the pick clock duration; the running countdown restarts from
/// the new value.
#[utoipa::path(
    post,
    path = "/admin/drafts/{id}/clock",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    request_body = SetClockRequest,
    responses(
        (status = 200, description = "Clock reconfigured", body = DraftSnapshot),
        (status = 409, description = "Draft is completed")
    )
)]
pub async fn set_clock(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetClockRequest>,
) -> Result<Json<DraftSnapshot>, AppError> {
    Ok(Json(draft_service::set_clock(&state, id, request).await?))
}

/// Undo the most recent pick and put its team back on a fresh clock.
#[utoipa::path(
    post,
    path = "/admin/drafts/{id}/undo",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    responses(
        (status = 200, description = "Pick undone", body = DraftSnapshot),
        (status = 409, description = "No picks to undo")
    )
)]
pub async fn undo_pick(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftSnapshot>, AppError> {
    Ok(Json(draft_service::undo(&state, id).await?))
}

/// Trigger an automatic pick for the team on the clock.
#[utoipa::path(
    post,
    path = "/admin/drafts/{id}/auto-pick",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    request_body = AutoPickRequest,
    responses(
        (status = 200, description = "Automatic pick committed", body = DraftSnapshot),
        (status = 409, description = "Draft not live, lost race, or pool exhausted")
    )
)]
pub async fn auto_pick(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AutoPickRequest>,
) -> Result<Json<DraftSnapshot>, AppError> {
    Ok(Json(draft_service::auto_pick(&state, id, request).await?))
}

/// Commit a pick on behalf of whichever team is on the clock.
#[utoipa::path(
    post,
    path = "/admin/drafts/{id}/force-pick",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    request_body = ForcePickRequest,
    responses(
        (status = 200, description = "Pick committed", body = DraftSnapshot),
        (status = 409, description = "Draft not live or player unavailable")
    )
)]
pub async fn force_pick(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ForcePickRequest>,
) -> Result<Json<DraftSnapshot>, AppError> {
    Ok(Json(draft_service::force_pick(&state, id, request).await?))
}

/// Replace the draft's custom pool atomically.
#[utoipa::path(
    post,
    path = "/admin/drafts/{id}/pool",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    request_body = PoolUploadRequest,
    responses(
        (status = 200, description = "Custom pool installed", body = PoolUploadResponse),
        (status = 400, description = "Rejected upload with every problem enumerated")
    )
)]
pub async fn upload_pool(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PoolUploadRequest>,
) -> Result<Json<PoolUploadResponse>, AppError> {
    Ok(Json(pool_service::upload_pool(&state, id, request).await?))
}

/// Discard the custom pool and revert to the default directory.
#[utoipa::path(
    delete,
    path = "/admin/drafts/{id}/pool",
    tag = "admin",
    params(("X-Commissioner-Token" = String, Header, description = "Commissioner token from the server configuration"),
    ("id" = Uuid, Path, description = "Draft identifier")),
    responses((status = 200, description = "Reverted to the default pool", body = PoolInfoResponse))
)]
pub async fn clear_pool(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PoolInfoResponse>, AppError> {
    Ok(Json(pool_service::clear_pool(&state, id).await?))
}

async fn require_commissioner_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(COMMISSIONER_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing commissioner token header `X-Commissioner-Token`".into())
        })?;

    match state.config().commissioner_token.as_deref() {
        Some(token) if token == provided => Ok(next.run(req).await),
        Some(_) => Err(AppError::Unauthorized("invalid commissioner token".into())),
        None => Err(AppError::Unauthorized(
            "no commissioner token configured".into(),
        )),
    }
}
