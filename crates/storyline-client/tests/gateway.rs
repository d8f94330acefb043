//! Gateway behaviour against a local axum server.

use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyline_client::{AuthGateway, GatewayError, GatewayOptions, HttpGateway, ScriptGateway};
use storyline_protocol::{Credentials, Registration, ScriptCreate, ScriptUpdate};

const GOOD_TOKEN: &str = "good-token";

/// Bodies received by the fake backend, in arrival order.
#[derive(Clone, Default)]
struct Received(Arc<Mutex<Vec<Value>>>);

impl Received {
    fn push(&self, value: Value) {
        self.0.lock().expect("lock").push(value);
    }

    fn all(&self) -> Vec<Value> {
        self.0.lock().expect("lock").clone()
    }
}

fn script_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "content": null,
        "genre": null,
        "target_audience": null,
        "duration": 5,
        "status": "draft",
        "user_id": 1,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": null
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {GOOD_TOKEN}");
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str())
}

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

fn backend(received: Received) -> Router {
    Router::new()
        .route(
            "/api/v1/scripts/",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                Json(json!([script_json(1, "first"), script_json(2, "second")])).into_response()
            })
            .post(
                |State(received): State<Received>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if !authorized(&headers) {
                        return unauthorized();
                    }
                    received.push(body.clone());
                    let title = body["title"].as_str().unwrap_or_default().to_string();
                    (StatusCode::CREATED, Json(script_json(42, &title))).into_response()
                },
            ),
        )
        .route(
            "/api/v1/scripts/{id}",
            get(|Path(id): Path<i64>| async move {
                if id == 404 {
                    return StatusCode::NOT_FOUND.into_response();
                }
                if id == 500 {
                    return (StatusCode::OK, "not json").into_response();
                }
                if id == 408 {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                Json(script_json(id, "fetched")).into_response()
            })
            .put(
                |State(received): State<Received>, Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    received.push(body.clone());
                    let mut script = script_json(id, "before");
                    if let Some(title) = body.get("title") {
                        script["title"] = title.clone();
                    }
                    Json(script).into_response()
                },
            )
            .delete(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                StatusCode::NO_CONTENT.into_response()
            }),
        )
        .route(
            "/api/v1/scripts/{id}/content",
            patch(
                |State(received): State<Received>, Json(body): Json<Value>| async move {
                    received.push(body);
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .route(
            "/api/v1/scripts/optimize/prompt",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
                Json(json!({ "suggestions": [format!("{prompt} (remote)")] }))
            }),
        )
        .route(
            "/api/v1/auth/login",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                if form.get("username").map(String::as_str) != Some("writer@example.com")
                    || form.get("password").map(String::as_str) != Some("correct-horse")
                {
                    return (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "detail": "Incorrect email or password" })),
                    )
                        .into_response();
                }
                Json(json!({
                    "access_token": "access",
                    "refresh_token": "refresh",
                    "token_type": "bearer",
                    "expires_in": 1800
                }))
                .into_response()
            }),
        )
        .route(
            "/api/v1/auth/register",
            post(|Json(body): Json<Value>| async move {
                (
                    StatusCode::CREATED,
                    Json(json!({
                        "id": 3,
                        "email": body["email"],
                        "username": body["username"],
                        "is_active": true,
                        "is_superuser": false,
                        "created_at": "2024-05-01T10:00:00"
                    })),
                )
            }),
        )
        .route(
            "/api/v1/auth/refresh",
            post(|Query(query): Query<HashMap<String, String>>| async move {
                let token = query.get("refresh_token").cloned().unwrap_or_default();
                Json(json!({
                    "access_token": format!("access-from-{token}"),
                    "refresh_token": "rotated"
                }))
            }),
        )
        .with_state(received)
}

async fn spawn(received: Received) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, backend(received))
            .await
            .expect("serve");
    });
    format!("http://{addr}/api/v1")
}

async fn gateway() -> (HttpGateway, Received) {
    let received = Received::default();
    let base_url = spawn(received.clone()).await;
    let gateway = HttpGateway::new(GatewayOptions::new(base_url)).expect("gateway");
    (gateway, received)
}

#[tokio::test]
async fn list_decodes_scripts_with_bearer_token() {
    let (gateway, _) = gateway().await;
    let scripts = gateway.list(GOOD_TOKEN).await.expect("list");
    let titles: Vec<&str> = scripts.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[tokio::test]
async fn rejected_token_surfaces_status_and_detail() {
    let (gateway, _) = gateway().await;
    let err = gateway.list("stale").await.expect_err("401");
    assert!(err.is_unauthorized());
    let GatewayError::Http { body, .. } = &err else {
        panic!("expected http error, got {err:?}");
    };
    assert_eq!(
        body.clone(),
        Some(json!({ "detail": "Could not validate credentials" }))
    );
}

#[tokio::test]
async fn create_sends_payload_verbatim() {
    let (gateway, received) = gateway().await;
    let created = gateway
        .create(GOOD_TOKEN, &ScriptCreate::new("T").genre("noir"))
        .await
        .expect("create");
    assert_eq!(created.id, 42);
    assert_eq!(created.title, "T");
    assert_eq!(received.all(), vec![json!({ "title": "T", "genre": "noir" })]);
}

#[tokio::test]
async fn update_sends_only_present_fields() {
    let (gateway, received) = gateway().await;
    let patch = ScriptUpdate {
        title: Some("Renamed".to_string()),
        ..ScriptUpdate::default()
    };
    let updated = gateway.update(GOOD_TOKEN, 7, &patch).await.expect("update");
    assert_eq!(updated.id, 7);
    assert_eq!(updated.title, "Renamed");
    assert_eq!(received.all(), vec![json!({ "title": "Renamed" })]);
}

#[tokio::test]
async fn remove_and_patch_content_accept_no_content() {
    let (gateway, received) = gateway().await;
    gateway.remove(GOOD_TOKEN, 7).await.expect("remove");
    gateway
        .patch_content(GOOD_TOKEN, 7, "FADE IN:")
        .await
        .expect("patch");
    assert_eq!(received.all(), vec![json!({ "content": "FADE IN:" })]);
}

#[tokio::test]
async fn empty_error_body_maps_to_none() {
    let (gateway, _) = gateway().await;
    let err = gateway.get(GOOD_TOKEN, 404).await.expect_err("404");
    let GatewayError::Http { status, body } = err else {
        panic!("expected http error");
    };
    assert_eq!(status, 404);
    assert_eq!(body, None);
}

#[tokio::test]
async fn malformed_success_body_is_invalid_response() {
    let (gateway, _) = gateway().await;
    let err = gateway.get(GOOD_TOKEN, 500).await.expect_err("bad body");
    assert!(matches!(err, GatewayError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn slow_server_times_out_as_network_error() {
    let base_url = spawn(Received::default()).await;
    let gateway = HttpGateway::new(
        GatewayOptions::new(base_url).with_timeout(Duration::from_millis(200)),
    )
    .expect("gateway");
    let err = gateway.get(GOOD_TOKEN, 408).await.expect_err("timeout");
    assert!(matches!(err, GatewayError::Timeout(_)), "{err:?}");
    assert!(err.is_network());
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let gateway =
        HttpGateway::new(GatewayOptions::new(format!("http://{addr}/api/v1"))).expect("gateway");
    let err = gateway.list(GOOD_TOKEN).await.expect_err("refused");
    assert!(matches!(err, GatewayError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn optimize_prompt_unwraps_suggestions() {
    let (gateway, _) = gateway().await;
    let suggestions = gateway
        .optimize_prompt(GOOD_TOKEN, "a heist")
        .await
        .expect("optimize");
    assert_eq!(suggestions, vec!["a heist (remote)".to_string()]);
}

#[tokio::test]
async fn login_posts_form_and_decodes_token_pair() {
    let (gateway, _) = gateway().await;
    let pair = gateway
        .login(&Credentials::new("writer@example.com", "correct-horse"))
        .await
        .expect("login");
    assert_eq!(pair.access_token, "access");
    assert_eq!(pair.expires_in, Some(1800));

    let err = gateway
        .login(&Credentials::new("writer@example.com", "wrong"))
        .await
        .expect_err("bad password");
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn register_and_refresh_round_trip() {
    let (gateway, _) = gateway().await;
    let user = gateway
        .register(&Registration {
            email: "writer@example.com".to_string(),
            username: "writer".to_string(),
            password: "correct-horse".to_string(),
        })
        .await
        .expect("register");
    assert_eq!(user.id, 3);
    assert_eq!(user.username, "writer");

    let pair = gateway.refresh("r1").await.expect("refresh");
    assert_eq!(pair.access_token, "access-from-r1");
    assert_eq!(pair.refresh_token, "rotated");
    assert_eq!(pair.token_type, "bearer");
}

#[test]
fn rejects_unsupported_base_url() {
    let err = HttpGateway::new(GatewayOptions::new("ftp://example.com/api")).expect_err("scheme");
    assert!(matches!(err, GatewayError::InvalidUrl(_)));
    let err = HttpGateway::new(GatewayOptions::new("not a url")).expect_err("parse");
    assert!(matches!(err, GatewayError::InvalidUrl(_)));
}

#[test]
fn trims_trailing_slash_from_base_url() {
    let gateway =
        HttpGateway::new(GatewayOptions::new("http://localhost:8000/api/v1/")).expect("gateway");
    assert_eq!(gateway.base_url(), "http://localhost:8000/api/v1");
}
