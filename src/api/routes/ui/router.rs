//! Router for the server-rendered chat UI. Every action redirects
//! back to the page, which re-renders the active room from the
//! session.

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::templates::Template;
use crate::api::public::ApiError;
use crate::api::public::rooms::TurnView;
use crate::api::routes::SharedState;
use crate::api::utils::{run_turn, session_for};
use crate::chat::{Notice, SessionError};

#[derive(Deserialize)]
pub struct MessageForm {
    pub message: String,
}

#[derive(Serialize)]
struct RoomLink {
    id: String,
    title: String,
    active: bool,
}

#[derive(Serialize)]
struct ChatPage {
    page_title: String,
    rooms_enabled: bool,
    rooms: Vec<RoomLink>,
    notices: Vec<Notice>,
    turns: Vec<TurnView>,
}

async fn chat_page(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, session) = session_for(&state, jar);
    let mut session = session.lock().await;
    let active_id = session.active_room_id();
    let notices = session.take_notices();
    let store = session.store();

    let rooms_enabled = session.variant().allows_rooms();
    let rooms = if rooms_enabled {
        store
            .list_rooms_newest_first()
            .into_iter()
            .map(|id| -> Result<RoomLink, ApiError> {
                Ok(RoomLink {
                    title: store.title_for(&id)?,
                    active: id == active_id,
                    id,
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };
    let turns = store
        .turns(&active_id)?
        .iter()
        .map(TurnView::from)
        .collect();
    let page_title = if rooms_enabled {
        store.title_for(&active_id)?
    } else {
        String::from("Chat")
    };

    let page = ChatPage {
        page_title,
        rooms_enabled,
        rooms,
        notices,
        turns,
    };
    let html = state
        .read()
        .expect("Unable to read share state")
        .templates
        .render(&Template::ChatPage.to_string(), &page)?;

    Ok((jar, Html(html)))
}

/// Submit a message from the input box
async fn chat_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<MessageForm>,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, session) = session_for(&state, jar);
    let relay = state.read().expect("Unable to read share state").relay.clone();

    // Completion failures are already recorded as notices. An empty
    // message is ignored like an empty input box.
    match run_turn(relay, session, form.message, true).await? {
        Ok(_) | Err(SessionError::EmptyPrompt) => {}
        Err(e) => return Err(e.into()),
    }

    Ok((jar, Redirect::to("/")))
}

async fn room_create(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, session) = session_for(&state, jar);
    let mut session = session.lock().await;
    if let Err(e) = session.create_room() {
        session.push_notice(Notice::error(&e.to_string()));
    }

    Ok((jar, Redirect::to("/")))
}

async fn room_activate(
    State(state): State<SharedState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (jar, session) = session_for(&state, jar);
    let mut session = session.lock().await;
    if let Err(e) = session.switch_room(&id) {
        session.push_notice(Notice::error(&e.to_string()));
    }

    Ok((jar, Redirect::to("/")))
}

/// Create the UI router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(chat_page))
        .route("/chat", post(chat_submit))
        .route("/rooms", post(room_create))
        .route("/rooms/{id}/activate", post(room_activate))
}
