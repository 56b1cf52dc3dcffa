use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{RegisterRequest, RegisterResponse},
    services::register_user,
    RegisterError,
};
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, RegisterError> {
    // Malformed bodies get the same 400 error body as failed field checks.
    let Json(payload) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), "register body rejected");
        RegisterError::Validation(vec![rejection.body_text()])
    })?;
    register_user(state.users.as_ref(), payload).await.map(Json)
}
