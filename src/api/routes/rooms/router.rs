//! Router for the rooms API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;

use super::public;
use crate::api::public::ApiError;
use crate::api::routes::SharedState;
use crate::api::utils::session_for;

/// List the session's rooms, newest first
async fn room_list(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, session) = session_for(&state, jar);
    let session = session.lock().await;
    let store = session.store();

    let rooms = store
        .list_rooms_newest_first()
        .into_iter()
        .map(|id| -> Result<public::RoomSummary, ApiError> {
            Ok(public::RoomSummary {
                title: store.title_for(&id)?,
                turn_count: store.turns(&id)?.len(),
                id,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((
        jar,
        Json(public::RoomListResponse {
            active_room_id: store.active_room_id().map(str::to_string),
            rooms,
        }),
    ))
}

/// Start a new room and make it active
async fn room_create(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, session) = session_for(&state, jar);
    let id = session.lock().await.create_room()?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(public::RoomCreatedResponse { id }),
    ))
}

/// Get a single room with its full transcript
async fn room_detail(
    State(state): State<SharedState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, session) = session_for(&state, jar);
    let session = session.lock().await;
    let store = session.store();
    let room = store.room(&id)?;

    Ok((
        jar,
        Json(public::RoomResponse {
            id: room.id().to_string(),
            title: store.title_for(&id)?,
            created_at: room.created_at().to_rfc3339(),
            turns: room.turns().iter().map(public::TurnView::from).collect(),
        }),
    ))
}

/// Switch the active room
async fn room_activate(
    State(state): State<SharedState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, session) = session_for(&state, jar);
    session.lock().await.switch_room(&id)?;

    Ok((StatusCode::NO_CONTENT, jar))
}

/// Create the rooms router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(room_list).post(room_create))
        .route("/{id}", get(room_detail))
        .route("/{id}/activate", post(room_activate))
}
