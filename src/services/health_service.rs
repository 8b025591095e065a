//! Health reporting for the `/healthcheck` route.

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Current process health. Pings the player directory so a broken
/// upstream flips the process into degraded mode between refreshes, not
/// only when the supervisor next runs.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if let Some(directory) = state.directory().await {
        if let Err(err) = directory.health_check().await {
            warn!(error = %err, "player directory health check failed");
            state.mark_degraded();
        }
    }

    let default_pool_size = state.default_pool().await.len();
    let drafts = state.rooms().len();
    if state.is_degraded() {
        HealthResponse::degraded(default_pool_size, drafts)
    } else {
        HealthResponse::ok(default_pool_size, drafts)
    }
}
