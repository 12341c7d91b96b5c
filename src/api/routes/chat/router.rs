//! Router for the chat API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::extract::cookie::CookieJar;

use super::public;
use crate::api::public::ApiError;
use crate::api::routes::SharedState;
use crate::api::utils::{run_turn, session_for};
use crate::chat::TurnOutcome;

/// Send a message to the active room and wait for the reply
async fn chat_handler(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Response, ApiError> {
    let (jar, session) = session_for(&state, jar);
    let relay = state.read().expect("Unable to read share state").relay.clone();

    // The response carries the archival result, so no notices are queued
    let outcome = run_turn(relay, session, payload.message, false).await??;

    let resp = match outcome {
        TurnOutcome::Replied {
            room_id,
            reply,
            archival,
        } => (
            jar,
            Json(public::ChatResponse {
                room_id,
                reply,
                archival: archival.map(public::ArchivalResult::from),
            }),
        )
            .into_response(),
        TurnOutcome::Failed { room_id, error } => (
            StatusCode::BAD_GATEWAY,
            jar,
            Json(public::ChatErrorResponse { room_id, error }),
        )
            .into_response(),
    };

    Ok(resp)
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
