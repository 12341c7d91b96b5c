//! Integration tests for the rooms API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use notechat::core::Variant;

    use crate::test_utils::{body_to_string, completion_body, session_cookie, test_app, test_config};

    async fn send(app: &Router, method: &str, uri: &str, cookie: &str) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .method(method)
                    .header("cookie", cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        (status, body_to_string(response.into_body()).await)
    }

    /// Start a session and return its cookie
    async fn start_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/rooms").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        session_cookie(&response).unwrap()
    }

    /// Tests a new session starts with one empty active room
    #[tokio::test]
    async fn it_lists_initial_room() {
        let app = test_app(test_config(Variant::Rooms, "http://127.0.0.1:9", None));
        let cookie = start_session(&app).await;

        let (status, body) = send(&app, "GET", "/api/rooms", &cookie).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        let rooms = body["rooms"].as_array().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0]["title"], "New chat");
        assert_eq!(rooms[0]["turn_count"], 0);
        assert_eq!(body["active_room_id"], rooms[0]["id"]);
    }

    /// Tests creating rooms lists the newest first and makes it active
    #[tokio::test]
    async fn it_creates_rooms_newest_first() {
        let app = test_app(test_config(Variant::Rooms, "http://127.0.0.1:9", None));
        let cookie = start_session(&app).await;

        let (status, body) = send(&app, "POST", "/api/rooms", &cookie).await;
        assert_eq!(status, StatusCode::CREATED);
        let first: Value = serde_json::from_str(&body).unwrap();
        let (_, body) = send(&app, "POST", "/api/rooms", &cookie).await;
        let second: Value = serde_json::from_str(&body).unwrap();
        assert_ne!(first["id"], second["id"]);

        let (_, body) = send(&app, "GET", "/api/rooms", &cookie).await;
        let body: Value = serde_json::from_str(&body).unwrap();
        let rooms = body["rooms"].as_array().unwrap();
        assert_eq!(rooms.len(), 3);
        assert_eq!(rooms[0]["id"], second["id"]);
        assert_eq!(rooms[1]["id"], first["id"]);
        assert_eq!(body["active_room_id"], second["id"]);
    }

    /// Tests switching rooms sends messages to the chosen room
    #[tokio::test]
    async fn it_activates_a_room() {
        let mut openai = mockito::Server::new_async().await;
        let _mock = openai
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("4"))
            .create_async()
            .await;

        let app = test_app(test_config(Variant::Rooms, &openai.url(), None));
        let cookie = start_session(&app).await;
        let (_, body) = send(&app, "GET", "/api/rooms", &cookie).await;
        let body: Value = serde_json::from_str(&body).unwrap();
        let original = body["active_room_id"].as_str().unwrap().to_string();

        // Create a second room, then switch back to the original one
        send(&app, "POST", "/api/rooms", &cookie).await;
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/rooms/{}/activate", original),
            &cookie,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat")
                    .method("POST")
                    .header("content-type", "application/json")
                    .header("cookie", &cookie)
                    .body(Body::from(
                        json!({ "message": "Hello world, how are you today" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (status, body) = send(&app, "GET", &format!("/api/rooms/{}", original), &cookie).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["title"], "Hello world, how are you ...");
        assert_eq!(
            body["turns"],
            json!([
                {"role": "user", "content": "Hello world, how are you today"},
                {"role": "assistant", "content": "4"}
            ])
        );
    }

    /// Tests unknown rooms return 404
    #[tokio::test]
    async fn it_returns_404_for_missing_room() {
        let app = test_app(test_config(Variant::Rooms, "http://127.0.0.1:9", None));
        let cookie = start_session(&app).await;

        let (status, _) = send(&app, "GET", "/api/rooms/nope", &cookie).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "POST", "/api/rooms/nope/activate", &cookie).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// Tests rooms from one session aren't visible to another
    #[tokio::test]
    async fn it_hides_rooms_from_other_sessions() {
        let app = test_app(test_config(Variant::Rooms, "http://127.0.0.1:9", None));
        let cookie = start_session(&app).await;
        let other = start_session(&app).await;

        let (_, body) = send(&app, "POST", "/api/rooms", &cookie).await;
        let created: Value = serde_json::from_str(&body).unwrap();

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/rooms/{}", created["id"].as_str().unwrap()),
            &other,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// Tests the single variant refuses to create or switch rooms
    #[tokio::test]
    async fn it_disables_rooms_in_single_variant() {
        let app = test_app(test_config(Variant::Single, "http://127.0.0.1:9", None));
        let cookie = start_session(&app).await;

        let (status, _) = send(&app, "POST", "/api/rooms", &cookie).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/api/rooms", &cookie).await;
        let body: Value = serde_json::from_str(&body).unwrap();
        let room_id = body["active_room_id"].as_str().unwrap().to_string();
        assert_eq!(body["rooms"].as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/rooms/{}/activate", room_id),
            &cookie,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// Tests a made-up session id isn't adopted, the server issues its own
    #[tokio::test]
    async fn it_replaces_unknown_session_cookie() {
        let app = test_app(test_config(Variant::Rooms, "http://127.0.0.1:9", None));
        let made_up = "notechat_session=not-a-real-session";

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/rooms")
                    .header("cookie", made_up)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let issued = session_cookie(&response).unwrap();
        assert_ne!(issued, made_up);

        // The issued id is kept on later requests
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/rooms")
                    .header("cookie", &issued)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(session_cookie(&response).is_none());
    }

    /// Tests an idle session expires and the client gets a new one
    #[tokio::test]
    async fn it_expires_idle_sessions() {
        let mut config = test_config(Variant::Rooms, "http://127.0.0.1:9", None);
        config.session_ttl = Duration::ZERO;
        let app = test_app(config);
        let cookie = start_session(&app).await;
        send(&app, "POST", "/api/rooms", &cookie).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/rooms")
                    .header("cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let renewed = session_cookie(&response).unwrap();
        assert_ne!(renewed, cookie);
        let body: Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        // A fresh session with only its initial room
        assert_eq!(body["rooms"].as_array().unwrap().len(), 1);
    }
}
