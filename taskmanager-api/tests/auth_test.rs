/// Signup, login, token guard and profile tests
///
/// Run against the in-memory store through the full router.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{TestContext, PREVIOUS_SECRET, TEST_SECRET};
use serde_json::json;
use taskmanager_shared::{
    auth::jwt::{create_token, Claims, JwtKeys},
    store::UserStore,
};

#[tokio::test]
async fn test_greeting_and_health() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("hello from task manager"));

    let (status, body) = ctx.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_signup_then_login() {
    let ctx = TestContext::new();

    let token = ctx.signup("al", "pw1").await;
    let claims = ctx.config.jwt.keys().verify(&token).unwrap();
    assert_eq!(claims.username, "al");
    assert_eq!(claims.exp, None);

    let (status, body) = ctx.login("al", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    let login_token = body["jwtToken"].as_str().unwrap();
    assert_eq!(ctx.config.jwt.keys().verify(login_token).unwrap().username, "al");
}

#[tokio::test]
async fn test_duplicate_signup_keeps_original_credentials() {
    let ctx = TestContext::new();
    ctx.signup("al", "pw1").await;

    let original_hash = ctx.store.find_by_username("al").await.unwrap().unwrap().password_hash;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "username": "al", "password": "pw2" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "username already exists" }));

    let current_hash = ctx.store.find_by_username("al").await.unwrap().unwrap().password_hash;
    assert_eq!(current_hash, original_hash);

    let (status, body) = ctx.login("al", "pw2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "err": "Incorrect Password" }));

    let (status, _) = ctx.login("al", "pw1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let ctx = TestContext::new();

    let (status, body) = ctx.login("nobody", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "err": "User does not exist" }));
}

#[tokio::test]
async fn test_signup_requires_both_fields() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(Method::POST, "/signup", None, Some(json!({ "username": "al" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["err"], "Request validation failed");
    assert_eq!(body["details"][0]["field"], "password");

    let (status, _) = ctx
        .send(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "username": "", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was created
    let (status, _) = ctx.login("al", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_rejected_with_json_body() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = ctx.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["err"].is_string());
}

#[tokio::test]
async fn test_protected_routes_reject_missing_token_before_store() {
    let ctx = TestContext::new();
    let before = ctx.store.operation_count();

    let routes = [
        (Method::GET, "/profile"),
        (Method::PUT, "/editprofile/username"),
        (Method::PUT, "/editprofile/password"),
        (Method::GET, "/tasks"),
        (Method::POST, "/tasks"),
        (Method::PUT, "/tasks/t-1"),
        (Method::DELETE, "/tasks/t-1"),
    ];

    for (method, uri) in routes {
        let (status, body) = ctx.send(method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body, json!({ "err": "Invalid JWT Token" }));
    }

    let (status, _) = ctx
        .send(Method::GET, "/profile", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(ctx.store.operation_count(), before);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/tasks")
        .header(header::AUTHORIZATION, "Basic YWw6cHcx")
        .body(Body::empty())
        .unwrap();

    let (status, body) = ctx.send_request(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "err": "Invalid JWT Token" }));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new();

    let (status, _) = ctx.send(Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_token_from_previous_secret_is_accepted() {
    let ctx = TestContext::new();
    ctx.signup("al", "pw1").await;

    let old_token = JwtKeys::new(PREVIOUS_SECRET).issue("al").unwrap();
    let (status, body) = ctx.send(Method::GET, "/profile", Some(&old_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "al");
}

#[tokio::test]
async fn test_token_from_unknown_secret_is_rejected() {
    let ctx = TestContext::new();
    ctx.signup("al", "pw1").await;

    let forged = JwtKeys::new("some-other-secret-key-of-32-bytes-plus")
        .issue("al")
        .unwrap();
    let (status, body) = ctx.send(Method::GET, "/profile", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "err": "Invalid JWT Token" }));
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let ctx = TestContext::new();
    ctx.signup("al", "pw1").await;

    let claims = Claims::with_expiration("al", chrono::Duration::hours(-1)).unwrap();
    let expired = create_token(&claims, TEST_SECRET).unwrap();

    let (status, body) = ctx.send(Method::GET, "/profile", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "err": "Invalid JWT Token" }));
}

#[tokio::test]
async fn test_configured_lifetime_sets_exp() {
    let mut config = common::test_config();
    config.jwt.expiration_hours = Some(2);
    let ctx = TestContext::with_config(config);

    let token = ctx.signup("al", "pw1").await;
    let claims = ctx.config.jwt.keys().verify(&token).unwrap();

    let exp = claims.exp.unwrap();
    assert!(exp > claims.iat);
    assert!(exp <= claims.iat + 2 * 3600);
}

#[tokio::test]
async fn test_unrepresentable_lifetime_is_an_internal_error() {
    let mut config = common::test_config();
    config.jwt.expiration_hours = Some(1_000_000_000_000);
    let ctx = TestContext::with_config(config);

    let (status, body) = ctx
        .send(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "username": "al", "password": "pw1" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "err": "An internal error occurred" }));

    // The token is signed before the insert, so nothing was stored
    assert!(ctx.store.find_by_username("al").await.unwrap().is_none());
}

#[tokio::test]
async fn test_profile_hides_password_hash() {
    let ctx = TestContext::new();
    let token = ctx.signup("al", "pw1").await;

    let (status, body) = ctx.send(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "al");
    assert_eq!(body["taskList"], json!([]));
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_profile_for_missing_user() {
    let ctx = TestContext::new();
    let token = JwtKeys::new(TEST_SECRET).issue("ghost").unwrap();

    let (status, body) = ctx.send(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "err": "cannot find the user" }));
}

#[tokio::test]
async fn test_edit_username() {
    let ctx = TestContext::new();
    let token = ctx.signup("al", "pw1").await;
    ctx.signup("bo", "pw2").await;

    let (status, body) = ctx
        .send(
            Method::PUT,
            "/editprofile/username",
            Some(&token),
            Some(json!({ "newUsername": "bo" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "err": "username already exists" }));

    let (status, body) = ctx
        .send(
            Method::PUT,
            "/editprofile/username",
            Some(&token),
            Some(json!({ "newUsername": "alice" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": "successfully updated" }));

    // The old token names a user that no longer exists
    let (status, body) = ctx.send(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "err": "cannot find the user" }));

    let (status, _) = ctx.login("alice", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.login("al", "pw1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_username_for_missing_user() {
    let ctx = TestContext::new();
    let token = JwtKeys::new(TEST_SECRET).issue("ghost").unwrap();

    let (status, body) = ctx
        .send(
            Method::PUT,
            "/editprofile/username",
            Some(&token),
            Some(json!({ "newUsername": "someone" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "err": "cannot find the user" }));
}

#[tokio::test]
async fn test_edit_password() {
    let ctx = TestContext::new();
    let token = ctx.signup("al", "pw1").await;

    let (status, body) = ctx
        .send(
            Method::PUT,
            "/editprofile/password",
            Some(&token),
            Some(json!({ "password": "pw2", "pass": "pw1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": "Password changed successfully" }));

    let (status, body) = ctx.login("al", "pw1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "err": "Incorrect Password" }));

    let (status, _) = ctx.login("al", "pw2").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_edit_password_with_wrong_previous_password() {
    let ctx = TestContext::new();
    let token = ctx.signup("al", "pw1").await;

    let (status, body) = ctx
        .send(
            Method::PUT,
            "/editprofile/password",
            Some(&token),
            Some(json!({ "password": "pw2", "pass": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "Incorrect previous password" }));

    let (status, _) = ctx.login("al", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.login("al", "pw2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
