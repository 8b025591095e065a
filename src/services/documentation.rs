use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Draft Room Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::draft::get_snapshot,
        crate::routes::draft::submit_pick,
        crate::routes::draft::get_queue,
        crate::routes::draft::put_queue,
        crate::routes::draft::get_pool_info,
        crate::routes::draft::search_pool,
        crate::routes::admin::create_draft,
        crate::routes::admin::list_drafts,
        crate::routes::admin::start_draft,
        crate::routes::admin::pause_draft,
        crate::routes::admin::resume_draft,
        crate::routes::admin::set_clock,
        crate::routes::admin::undo_pick,
        crate::routes::admin::auto_pick,
        crate::routes::admin::force_pick,
        crate::routes::admin::upload_pool,
        crate::routes::admin::clear_pool,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::draft::CreateDraftRequest,
            crate::dto::draft::TeamInput,
            crate::dto::draft::PickRequest,
            crate::dto::draft::ForcePickRequest,
            crate::dto::draft::AutoPickRequest,
            crate::dto::draft::SetClockRequest,
            crate::dto::draft::DraftStatusDto,
            crate::dto::draft::TeamSummary,
            crate::dto::draft::DraftSummary,
            crate::dto::draft::PickSummary,
            crate::dto::draft::UpcomingSlot,
            crate::dto::draft::DraftSnapshot,
            crate::dto::draft::SnapshotResponse,
            crate::dto::pool::PoolUploadRequest,
            crate::dto::pool::PoolEntryInput,
            crate::dto::pool::PoolSourceDto,
            crate::dto::pool::PoolUploadResponse,
            crate::dto::pool::PoolInfoResponse,
            crate::dto::pool::PoolEntrySummary,
            crate::dto::pool::PoolSearchResponse,
            crate::dto::queue::QueueSetRequest,
            crate::dto::queue::QueueResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "draft", description = "Public draft polling, picks, queues and pool search"),
        (name = "admin", description = "Commissioner operations, guarded by the commissioner token"),
    )
)]
pub struct ApiDoc;
