use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Entries currently cached from the default directory.
    pub default_pool_size: usize,
    /// Drafts registered in this process.
    pub drafts: usize,
}

impl HealthResponse {
    /// Healthy response: the default directory is reachable.
    pub fn ok(default_pool_size: usize, drafts: usize) -> Self {
        Self {
            status: "ok".to_string(),
            default_pool_size,
            drafts,
        }
    }

    /// Degraded response: the default directory is unavailable; drafts
    /// with custom pools keep working.
    pub fn degraded(default_pool_size: usize, drafts: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            default_pool_size,
            drafts,
        }
    }
}
