// ============================
// crates/backend-lib/tests/api.rs
// ============================
//! Black-box tests driving the full router: authentication schemes,
//! ownership checks, pagination, sorting and soft-delete behavior.
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use backend_lib::{config::Settings, router::create_router, storage::MemStorage, AppState};

fn test_app() -> Router {
    let state = Arc::new(AppState::new(MemStorage::new(), Settings::default()));
    create_router(state)
}

/// Fire one request and collect status, headers and parsed JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
    authorization: Option<&str>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(authorization) = authorization {
        builder = builder.header(header::AUTHORIZATION, authorization);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn session_cookie(headers: &HeaderMap) -> String {
    headers
        .get(header::SET_COOKIE)
        .expect("missing set-cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// Register a user and return the session cookie from the response.
async fn register(app: &Router, username: &str, password: &str) -> String {
    let (status, headers, body) = send(
        app,
        "POST",
        "/api/register",
        Some(json!({ "username": username, "password": password })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    session_cookie(&headers)
}

/// Log in and return (session cookie, bearer token).
async fn login(app: &Router, username: &str, password: &str) -> (String, String) {
    let (status, headers, body) = send(
        app,
        "POST",
        "/api/login",
        Some(json!({ "username": username, "password": password })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    let token = body["token"].as_str().unwrap().to_string();
    (session_cookie(&headers), token)
}

async fn create_board(app: &Router, cookie: &str, name: &str) -> i64 {
    let (status, _, body) = send(
        app,
        "POST",
        "/api/boards",
        Some(json!({ "name": name })),
        Some(cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create board failed: {body}");
    body["id"].as_i64().unwrap()
}

async fn create_list(app: &Router, cookie: &str, board_id: i64, title: &str) -> i64 {
    let (status, _, body) = send(
        app,
        "POST",
        &format!("/api/boards/{board_id}/lists"),
        Some(json!({ "title": title })),
        Some(cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create list failed: {body}");
    body["id"].as_i64().unwrap()
}

async fn create_card(app: &Router, cookie: &str, list_id: i64, card: Value) -> i64 {
    let (status, _, body) = send(
        app,
        "POST",
        &format!("/api/lists/{list_id}/cards"),
        Some(card),
        Some(cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create card failed: {body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn register_returns_user_without_password() {
    let app = test_app();
    let (status, headers, body) = send(
        &app,
        "POST",
        "/api/register",
        Some(json!({ "username": "alice", "password": "pw1" })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert!(body.get("password").is_none());
    // registration logs the user straight in
    assert!(headers.contains_key(header::SET_COOKIE));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_registrations_create_one_user() {
    let app = test_app();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                let request = Request::builder()
                    .method("POST")
                    .uri("/api/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "username": "alice", "password": "pw1" }).to_string(),
                    ))
                    .unwrap();
                app.oneshot(request).await.unwrap().status()
            })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => {},
            other => panic!("unexpected status: {other}"),
        }
    }
    assert_eq!(created, 1);

    // exactly one account exists and its password is usable
    let (status, _, _) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({ "username": "alice", "password": "pw1" })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    let (status, _, body) = send(
        &app,
        "POST",
        "/api/register",
        Some(json!({ "username": "alice", "password": "other" })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn register_validation_reports_fields() {
    let app = test_app();
    let (status, _, body) = send(&app, "POST", "/api/register", Some(json!({})), None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn all_three_schemes_authenticate() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    let (cookie, token) = login(&app, "alice", "pw1").await;

    // session
    let (status, _, body) = send(&app, "GET", "/api/user", None, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    // bearer
    let bearer = format!("Bearer {token}");
    let (status, _, body) = send(&app, "GET", "/api/user", None, None, Some(&bearer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    // basic
    let basic = format!("Basic {}", STANDARD.encode("alice:pw1"));
    let (status, _, body) = send(&app, "GET", "/api/user", None, None, Some(&basic)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn no_credentials_is_generic_unauthorized() {
    let app = test_app();
    let (status, _, body) = send(&app, "GET", "/api/user", None, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    // a failed scheme leaks nothing about which one was tried
    let (status, _, body) = send(
        &app,
        "GET",
        "/api/boards",
        None,
        None,
        Some("Bearer garbage"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn session_wins_over_garbage_bearer() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    let (cookie, _) = login(&app, "alice", "pw1").await;

    let (status, _, body) = send(
        &app,
        "GET",
        "/api/user",
        None,
        Some(&cookie),
        Some("Bearer not-a-valid-token"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn bearer_falls_through_to_basic() {
    let app = test_app();
    register(&app, "alice", "pw1").await;

    // invalid bearer alone fails; basic succeeds on its own header
    let basic = format!("Basic {}", STANDARD.encode("alice:pw1"));
    let (status, _, _) = send(&app, "GET", "/api/user", None, None, Some(&basic)).await;
    assert_eq!(status, StatusCode::OK);

    let wrong = format!("Basic {}", STANDARD.encode("alice:wrong"));
    let (status, _, _) = send(&app, "GET", "/api/user", None, None, Some(&wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_destroys_session() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    let (cookie, _) = login(&app, "alice", "pw1").await;

    let (status, _, _) = send(&app, "GET", "/api/user", None, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, _) =
        send(&app, "POST", "/api/logout", None, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    // cookie is cleared
    assert!(headers
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    let (status, _, _) = send(&app, "GET", "/api/user", None, Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_and_token_reject_bad_credentials() {
    let app = test_app();
    register(&app, "alice", "pw1").await;

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({ "username": "alice", "password": "wrong" })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(
        &app,
        "POST",
        "/api/token",
        Some(json!({ "username": "alice" })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username and password are required");

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/token",
        Some(json!({ "username": "nobody", "password": "pw" })),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ownership_chain_blocks_other_users() {
    let app = test_app();
    let alice = register(&app, "alice", "pw1").await;
    let board = create_board(&app, &alice, "QA").await;
    let list = create_list(&app, &alice, board, "Todo").await;
    let card = create_card(&app, &alice, list, json!({ "title": "Task1" })).await;

    let bob = register(&app, "bob", "pw2").await;

    // card fetch as bob is stopped at the board ownership hop
    let (status, _, _) = send(
        &app,
        "GET",
        &format!("/api/lists/{list}/cards"),
        None,
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(
        &app,
        "PATCH",
        &format!("/api/lists/{list}/cards/{card}"),
        Some(json!({ "status": "done" })),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // the owner still gets through
    let (status, _, _) = send(
        &app,
        "GET",
        &format!("/api/lists/{list}/cards"),
        None,
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_resource_is_404_before_ownership() {
    let app = test_app();
    let alice = register(&app, "alice", "pw1").await;
    let board = create_board(&app, &alice, "QA").await;
    let bob = register(&app, "bob", "pw2").await;

    // nonexistent board: 404 regardless of requester
    let (status, _, body) = send(&app, "GET", "/api/boards/999", None, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Board not found");

    // existing board owned by someone else: 403
    let (status, _, body) = send(
        &app,
        "GET",
        &format!("/api/boards/{board}"),
        None,
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");
}

#[tokio::test]
async fn cross_reference_mismatch_is_400() {
    let app = test_app();
    let alice = register(&app, "alice", "pw1").await;
    let board_a = create_board(&app, &alice, "A").await;
    let board_b = create_board(&app, &alice, "B").await;
    let list_a = create_list(&app, &alice, board_a, "Todo").await;
    let list_b = create_list(&app, &alice, board_b, "Todo").await;
    let card = create_card(&app, &alice, list_a, json!({ "title": "Task1" })).await;

    // list addressed under the wrong board
    let (status, _, body) = send(
        &app,
        "PUT",
        &format!("/api/boards/{board_b}/lists/{list_a}"),
        Some(json!({ "title": "Renamed" })),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "List does not belong to this board");

    // card addressed under the wrong list
    let (status, _, body) = send(
        &app,
        "PATCH",
        &format!("/api/lists/{list_b}/cards/{card}"),
        Some(json!({ "status": "done" })),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Card does not belong to this list");
}

#[tokio::test]
async fn board_pagination_headers() {
    let app = test_app();
    let alice = register(&app, "alice", "pw1").await;
    create_board(&app, &alice, "First").await;
    let second = create_board(&app, &alice, "Second").await;

    let (status, headers, body) = send(
        &app,
        "GET",
        "/api/boards?page=2&limit=1",
        None,
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("x-total-count").unwrap(), "2");
    assert_eq!(headers.get("x-page").unwrap(), "2");
    assert_eq!(headers.get("x-per-page").unwrap(), "1");
    assert_eq!(headers.get("x-total-pages").unwrap(), "2");

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap(), second);

    // without both params the full collection comes back, headerless
    let (_, headers, body) = send(&app, "GET", "/api/boards?page=2", None, Some(&alice), None).await;
    assert!(headers.get("x-total-count").is_none());
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn card_soft_delete_is_idempotent_and_invisible() {
    let app = test_app();
    let alice = register(&app, "alice", "pw1").await;
    let board = create_board(&app, &alice, "QA").await;
    let list = create_list(&app, &alice, board, "Todo").await;
    let card = create_card(&app, &alice, list, json!({ "title": "Task1" })).await;

    let uri = format!("/api/lists/{list}/cards/{card}");
    let (status, _, _) = send(&app, "DELETE", &uri, None, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // deleting again still succeeds
    let (status, _, _) = send(&app, "DELETE", &uri, None, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // the card never reappears
    let (status, _, body) = send(
        &app,
        "GET",
        &format!("/api/lists/{list}/cards"),
        None,
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (_, _, body) = send(
        &app,
        "GET",
        "/api/cards/search?title=Task1",
        None,
        Some(&alice),
        None,
    )
    .await;
    assert!(body.as_array().unwrap().is_empty());

    // and can no longer be patched
    let (status, _, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "status": "done" })),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cards_sort_by_due_date_with_nulls() {
    let app = test_app();
    let alice = register(&app, "alice", "pw1").await;
    let board = create_board(&app, &alice, "QA").await;
    let list = create_list(&app, &alice, board, "Todo").await;
    create_card(
        &app,
        &alice,
        list,
        json!({ "title": "later", "dueDate": "2026-09-02" }),
    )
    .await;
    create_card(&app, &alice, list, json!({ "title": "undated" })).await;
    create_card(
        &app,
        &alice,
        list,
        json!({ "title": "sooner", "dueDate": "2026-09-01" }),
    )
    .await;

    let (status, _, body) = send(
        &app,
        "GET",
        &format!("/api/lists/{list}/cards?sort=dueDate&order=asc"),
        None,
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["sooner", "later", "undated"]);

    let (_, _, body) = send(
        &app,
        "GET",
        &format!("/api/lists/{list}/cards?sort=dueDate&order=desc"),
        None,
        Some(&alice),
        None,
    )
    .await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["undated", "later", "sooner"]);
}

#[tokio::test]
async fn board_and_card_search() {
    let app = test_app();
    let alice = register(&app, "alice", "pw1").await;
    let board = create_board(&app, &alice, "QA Board").await;
    create_board(&app, &alice, "Personal").await;
    let list = create_list(&app, &alice, board, "Todo").await;
    create_card(
        &app,
        &alice,
        list,
        json!({ "title": "Fix login", "labels": ["bug"] }),
    )
    .await;
    create_card(&app, &alice, list, json!({ "title": "Write docs" })).await;

    let (status, _, body) = send(
        &app,
        "GET",
        "/api/boards/search?name=qa",
        None,
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "QA Board");

    let (status, _, body) = send(
        &app,
        "GET",
        "/api/cards/search?label=bug",
        None,
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "Fix login");
}

#[tokio::test]
async fn update_flows() {
    let app = test_app();
    let alice = register(&app, "alice", "pw1").await;
    let board = create_board(&app, &alice, "QA").await;
    let list = create_list(&app, &alice, board, "Todo").await;
    let card = create_card(&app, &alice, list, json!({ "title": "Task1" })).await;

    let (status, _, body) = send(
        &app,
        "PUT",
        &format!("/api/boards/{board}"),
        Some(json!({ "name": "QA v2" })),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "QA v2");

    let (status, _, body) = send(
        &app,
        "PUT",
        &format!("/api/boards/{board}/lists/{list}"),
        Some(json!({ "title": "Doing" })),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Doing");

    let (status, _, body) = send(
        &app,
        "PATCH",
        &format!("/api/lists/{list}/cards/{card}"),
        Some(json!({ "status": "done", "labels": ["qa"] })),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "done");
    assert_eq!(body["labels"][0], "qa");
    // untouched fields survive the patch
    assert_eq!(body["title"], "Task1");

    // create-time validation still applies to updates
    let (status, _, _) = send(
        &app,
        "PUT",
        &format!("/api/boards/{board}"),
        Some(json!({ "name": "" })),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
