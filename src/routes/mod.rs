use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

pub mod admin;
pub mod draft;
pub mod health;

/// Compose all route trees, wiring in shared state and the API explorer.
pub fn router(state: SharedState) -> Router<()> {
    let explorer: Router<SharedState> = SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", ApiDoc::openapi())
        .into();

    health::router()
        .merge(draft::router())
        .merge(admin::router(state.clone()))
        .merge(explorer)
        .with_state(state)
}
