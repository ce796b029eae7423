use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use voicenote_sync::{
    application::{
        batch::{BatchRequestScheduler, CheckOutcome, SchedulerConfig, StatusRequest},
        toggle::{ToggleInteractionController, ToggleOutcome},
    },
    domain::interaction::{
        CheckKind, InteractionError, InteractionState, InteractionStatus, InteractionSubject,
        LikeStatus, RemoteInteractionService,
    },
    domain::session::Session,
    infrastructure::http::HttpInteractionService,
};

const TOKEN: &str = "token-1";

/// `(active, count)` per note, shared by likes and shares for brevity.
type Store = Arc<Mutex<HashMap<String, (bool, i64)>>>;

async fn like_status(
    State(store): State<Store>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !query.contains_key("userId") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    match id.as_str() {
        "limited" => StatusCode::TOO_MANY_REQUESTS.into_response(),
        "crash" => (StatusCode::INTERNAL_SERVER_ERROR, "db down").into_response(),
        _ => {
            let (liked, count) = store.lock().unwrap().get(&id).copied().unwrap_or_default();
            Json(json!({ "liked": liked, "likeCount": count })).into_response()
        }
    }
}

async fn like_count(State(store): State<Store>, Path(id): Path<String>) -> Response {
    let (_, count) = store.lock().unwrap().get(&id).copied().unwrap_or_default();
    Json(json!({ "count": count })).into_response()
}

async fn toggle_like(State(store): State<Store>, Path(id): Path<String>) -> Response {
    if id == "broken" {
        return (StatusCode::OK, "<html>gateway</html>").into_response();
    }
    let mut store = store.lock().unwrap();
    let entry = store.entry(id).or_default();
    entry.0 = !entry.0;
    entry.1 = if entry.0 { entry.1 + 1 } else { (entry.1 - 1).max(0) };
    Json(json!({ "liked": entry.0, "likeCount": entry.1 })).into_response()
}

async fn toggle_share(
    State(store): State<Store>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let expected = format!("Bearer {TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut store = store.lock().unwrap();
    let entry = store.entry(id).or_default();
    entry.0 = !entry.0;
    entry.1 += if entry.0 { 1 } else { -1 };
    Json(json!({ "shared": entry.0, "shareCount": entry.1 })).into_response()
}

/// Serves the interaction routes on an ephemeral port and returns the
/// API base URL.
async fn spawn_backend(store: Store) -> String {
    let app = Router::new()
        .route("/api/notes/{id}/likes/status", get(like_status))
        .route("/api/notes/{id}/likes/count", get(like_count))
        .route("/api/notes/{id}/like", post(toggle_like))
        .route("/api/notes/{id}/share", post(toggle_share))
        .with_state(store);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    format!("http://{addr}/api/")
}

fn client(base_url: &str, token: Option<&str>) -> Arc<HttpInteractionService> {
    Arc::new(
        HttpInteractionService::new(base_url, token.map(str::to_string), Duration::from_secs(5))
            .expect("client"),
    )
}

fn seeded_store(entries: &[(&str, bool, i64)]) -> Store {
    Arc::new(Mutex::new(
        entries
            .iter()
            .map(|(id, active, count)| (id.to_string(), (*active, *count)))
            .collect(),
    ))
}

#[tokio::test]
async fn reads_decode_camel_case_payloads() {
    let base = spawn_backend(seeded_store(&[("note-1", true, 4)])).await;
    let service = client(&base, Some(TOKEN));

    let status = service
        .get_like_status("note-1", "user-1")
        .await
        .expect("status read");
    assert_eq!(
        status,
        LikeStatus {
            liked: true,
            like_count: 4
        }
    );
    assert_eq!(service.get_like_count("note-1").await.expect("count"), 4);
}

#[tokio::test]
async fn error_statuses_map_onto_the_error_taxonomy() {
    let base = spawn_backend(seeded_store(&[])).await;
    let service = client(&base, None);

    assert_eq!(
        service.get_like_status("limited", "user-1").await,
        Err(InteractionError::RateLimited)
    );
    assert!(matches!(
        service.get_like_status("crash", "user-1").await,
        Err(InteractionError::Transient(_))
    ));
    assert_eq!(
        service.toggle_share("note-1").await,
        Err(InteractionError::Unauthenticated)
    );
}

#[tokio::test]
async fn rate_limited_reads_degrade_inside_a_batch() {
    let base = spawn_backend(seeded_store(&[("note-1", false, 9)])).await;
    let scheduler = BatchRequestScheduler::new(client(&base, Some(TOKEN)), SchedulerConfig::default());
    let user = Some("user-1".to_string());

    let results = scheduler
        .check(vec![
            StatusRequest::new("note-1", CheckKind::LikeStatus, user.clone()),
            StatusRequest::new("limited", CheckKind::LikeStatus, user),
        ])
        .await;

    assert_eq!(
        results[0].outcome,
        CheckOutcome::Resolved(InteractionStatus::new(false, 9))
    );
    assert_eq!(
        results[1].outcome,
        CheckOutcome::degraded(InteractionError::RateLimited)
    );
}

#[tokio::test]
async fn toggles_round_trip_through_the_backend() {
    let store = seeded_store(&[("note-1", false, 2)]);
    let base = spawn_backend(store.clone()).await;
    let controller = ToggleInteractionController::new(
        InteractionSubject::share("note-1"),
        client(&base, Some(TOKEN)),
        Session::authenticated("user-1"),
        InteractionStatus::new(false, 2),
    );

    let outcome = controller.toggle().await.expect("share commits");

    assert_eq!(outcome, ToggleOutcome::Committed(InteractionStatus::new(true, 3)));
    assert_eq!(store.lock().unwrap().get("note-1").copied(), Some((true, 3)));
}

#[tokio::test]
async fn undecodable_toggle_response_rolls_back() {
    let base = spawn_backend(seeded_store(&[])).await;
    let controller = ToggleInteractionController::new(
        InteractionSubject::like("broken"),
        client(&base, Some(TOKEN)),
        Session::authenticated("user-1"),
        InteractionStatus::new(false, 6),
    );

    let err = controller.toggle().await.expect_err("malformed body");

    assert!(matches!(err, InteractionError::Transient(_)));
    assert_eq!(controller.state(), InteractionState::seeded(false, 6));
}
