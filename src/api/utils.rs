use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::routes::SharedState;
use crate::api::state::SharedSession;
use crate::chat::{ChatRelay, SessionError, TurnOutcome};

pub const SESSION_COOKIE: &str = "notechat_session";

/// Look up the caller's session from the session cookie. A missing,
/// unknown or expired id starts a new session under a fresh id and
/// sets the cookie, so clients can't pick their own session ids.
pub fn session_for(state: &SharedState, jar: CookieJar) -> (CookieJar, SharedSession) {
    let mut state = state.write().expect("Unable to write share state");
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|c| state.session(c.value()));
    if let Some(session) = existing {
        return (jar, session);
    }

    let (session_id, session) = state.start_session();
    let jar = jar.add(
        Cookie::build((SESSION_COOKIE, session_id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    );
    (jar, session)
}

/// Run one interaction cycle in its own task. Once issued, a request
/// runs to completion even if the client goes away. With `notify` the
/// outcome is also queued as notices for the next page render.
pub async fn run_turn(
    relay: ChatRelay,
    session: SharedSession,
    prompt: String,
    notify: bool,
) -> anyhow::Result<Result<TurnOutcome, SessionError>> {
    let handle = tokio::spawn(async move {
        let mut session = session.lock().await;
        if notify {
            relay.submit_with_notices(&mut session, &prompt).await
        } else {
            relay.submit(&mut session, &prompt).await
        }
    });
    Ok(handle.await?)
}
