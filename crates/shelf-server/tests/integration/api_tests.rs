use axum::http::{Method, StatusCode};

use crate::integration::common::{
    get, login, register, send, send_raw, setup_failing_app, setup_test_app, token_for,
};

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app();

    let (status, json) = get(&app.router, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn health_reports_unavailable_store() {
    let router = setup_failing_app();

    let (status, json) = get(&router, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "unhealthy");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app();

    let (status, json) = get(&app.router, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/users/login"].is_object());
    assert!(json["components"]["securitySchemes"]["bearer"].is_object());
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = setup_test_app();

    let (status, json) = get(&app.router, "/users/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["message"], "Route not found.");
}

#[tokio::test]
async fn wrong_method_returns_json_405() {
    let app = setup_test_app();

    let (status, json) = get(&app.router, "/users/login", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["error"], "method_not_allowed");

    let (status, json) = send(&app.router, Method::DELETE, "/health", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["message"], "Method not allowed.");
}

#[tokio::test]
async fn register_returns_201_without_password_hash() {
    let app = setup_test_app();

    let (status, json) = register(&app.router, "  Alice ", "secret1", "Member").await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(json["user_id"].as_i64().unwrap() > 0);
    assert_eq!(json["username"], "alice");
    assert_eq!(json["role"], "member");
    assert!(json["created_date"].is_string());
    assert!(json.get("password_hash").is_none());
    assert!(json.get("password").is_none());

    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn register_validation_failures_return_400() {
    let app = setup_test_app();

    let cases = [
        (
            serde_json::json!({"username": "alice", "password": "secret1"}),
            "Missing required fields. Please provide username, password, and role.",
        ),
        (
            serde_json::json!({"username": "al", "password": "secret1", "role": "member"}),
            "Username must be at least 3 characters long.",
        ),
        (
            serde_json::json!({"username": "alice", "password": "abc", "role": "member"}),
            "Password must be at least 6 characters long.",
        ),
        (
            serde_json::json!({"username": "alice", "password": "abcdefgh", "role": "member"}),
            "Password must contain at least one letter and one number.",
        ),
        (
            serde_json::json!({"username": "alice", "password": "secret1", "role": "admin"}),
            "Invalid role. Allowed roles: member, librarian",
        ),
    ];

    for (body, message) in cases {
        let (status, json) =
            send(&app.router, Method::POST, "/users/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], message);
    }

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn duplicate_username_returns_400() {
    let app = setup_test_app();

    let (status, _) = register(&app.router, "alice", "secret1", "member").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = register(&app.router, "ALICE", "other22", "librarian").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "conflict");
    assert_eq!(
        json["message"],
        "Username already exists. Please choose a different username."
    );
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = setup_test_app();

    let (status, bytes) = send_raw(
        &app.router,
        Method::POST,
        "/users/register",
        None,
        Some(b"{\"username\": ".to_vec()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn oversized_body_returns_413() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "username": "alice",
        "password": "x".repeat(70 * 1024),
        "role": "member",
    });
    let (status, json) =
        send(&app.router, Method::POST, "/users/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"], "payload_too_large");
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let app = setup_test_app();
    register(&app.router, "alice", "secret1", "member").await;

    let (status, json) = login(&app.router, "ALICE", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["token"].as_str().unwrap().split('.').count() == 3);
    assert!(json["expires_at"].is_string());
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["role"], "member");
    assert!(json["user"].get("password_hash").is_none());

    let claims = app.tokens.verify(json["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.username, "alice");
    assert_eq!(
        claims.subject_id(),
        json["user"]["user_id"].as_i64()
    );
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = setup_test_app();
    register(&app.router, "alice", "secret1", "member").await;

    let wrong_password = serde_json::json!({"username": "alice", "password": "wrong99"});
    let unknown_user = serde_json::json!({"username": "nobody", "password": "secret1"});

    let (status_a, body_a) = send_raw(
        &app.router,
        Method::POST,
        "/users/login",
        None,
        Some(serde_json::to_vec(&wrong_password).unwrap()),
    )
    .await;
    let (status_b, body_b) = send_raw(
        &app.router,
        Method::POST,
        "/users/login",
        None,
        Some(serde_json::to_vec(&unknown_user).unwrap()),
    )
    .await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_a, status_b);
    assert_eq!(body_a, body_b);

    let json: serde_json::Value = serde_json::from_slice(&body_a).unwrap();
    assert_eq!(
        json["message"],
        "Invalid credentials. Please check your username and password."
    );
}

#[tokio::test]
async fn login_with_missing_fields_returns_400() {
    let app = setup_test_app();

    let (status, json) = send(
        &app.router,
        Method::POST,
        "/users/login",
        None,
        Some(serde_json::json!({"username": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Missing required fields. Please provide username and password."
    );
}

#[tokio::test]
async fn profile_returns_current_account() {
    let app = setup_test_app();
    let token = token_for(&app.router, "alice", "member").await;

    let (status, json) = get(&app.router, "/users/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["role"], "member");
    assert!(json["user"]["created_date"].is_string());
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn profile_of_deleted_account_returns_404() {
    let app = setup_test_app();
    let token = token_for(&app.router, "alice", "member").await;
    let claims = app.tokens.verify(&token).unwrap();

    app.store.remove(claims.subject_id().unwrap());

    let (status, json) = get(&app.router, "/users/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "User not found.");
}

#[tokio::test]
async fn verify_token_echoes_claims() {
    let app = setup_test_app();
    let token = token_for(&app.router, "libby", "librarian").await;

    let (status, json) = get(&app.router, "/users/verify-token", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);
    assert_eq!(json["user"]["username"], "libby");
    assert_eq!(json["user"]["role"], "librarian");
    assert!(json["expires_at"].is_string());
}

#[tokio::test]
async fn list_accounts_returns_newest_first() {
    let app = setup_test_app();
    register(&app.router, "alice", "secret1", "member").await;
    let token = token_for(&app.router, "libby", "librarian").await;

    let (status, json) = get(&app.router, "/users/all", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);

    let users = json["users"].as_array().unwrap();
    assert_eq!(users[0]["username"], "libby");
    assert_eq!(users[1]["username"], "alice");
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn store_failure_returns_generic_500() {
    let router = setup_failing_app();

    let (status, json) = register(&router, "alice", "secret1", "member").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json["message"],
        "Internal server error. Please try again later."
    );
    assert!(!json.to_string().contains("connection refused"));
}

#[tokio::test]
async fn library_scenario() {
    let app = setup_test_app();

    let (status, _) = register(&app.router, "alice", "secret1", "member").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = login(&app.router, "ALICE", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let alice_token = json["token"].as_str().unwrap().to_string();

    let (status, json) = get(&app.router, "/users/all", Some(&alice_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
    assert_eq!(
        json["message"],
        "Access denied. Required role: librarian. Your role: member"
    );

    let (status, _) = register(&app.router, "libby", "books42", "librarian").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = login(&app.router, "libby", "books42").await;
    assert_eq!(status, StatusCode::OK);
    let libby_token = json["token"].as_str().unwrap().to_string();

    let (status, json) = get(&app.router, "/users/all", Some(&libby_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert!(json["users"].is_array());
}
