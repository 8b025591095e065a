//! Team pick-queue management.

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::queue::{QueueResponse, QueueSetRequest},
    error::ServiceError,
    services::draft_service::require_room,
    state::SharedState,
};

/// A team's queue. Unknown drafts and teams degrade to an empty queue,
/// which is also what a never-set queue looks like.
pub async fn get_queue(state: &SharedState, id: Uuid, team_id: Uuid) -> QueueResponse {
    let player_ids = match state.room(id) {
        Some(room) => {
            let engine = room.engine().read().await;
            engine.queue(team_id).to_vec()
        }
        None => Vec::new(),
    };
    QueueResponse {
        team_id,
        player_ids,
    }
}

/// Replace a team's queue wholesale. Stale entries are allowed and skipped
/// at auto-pick time; duplicates are rejected here.
pub async fn set_queue(
    state: &SharedState,
    id: Uuid,
    team_id: Uuid,
    request: QueueSetRequest,
) -> Result<QueueResponse, ServiceError> {
    request.validate()?;
    let room = require_room(state, id)?;
    let mut engine = room.engine().write().await;
    engine.set_queue(team_id, request.player_ids)?;
    info!(draft_id = %id, team_id = %team_id, len = engine.queue(team_id).len(), "queue replaced");
    Ok(QueueResponse {
        team_id,
        player_ids: engine.queue(team_id).to_vec(),
    })
}
