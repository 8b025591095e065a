use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Full replacement of a team's queue.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct QueueSetRequest {
    /// Player ids in priority order; duplicates are rejected.
    #[validate(length(max = 500))]
    pub player_ids: Vec<String>,
}

/// A team's queue as currently stored.
#[derive(Debug, Serialize, ToSchema)]
pub struct QueueResponse {
    /// Owning team.
    pub team_id: Uuid,
    /// Player ids in priority order.
    pub player_ids: Vec<String>,
}
