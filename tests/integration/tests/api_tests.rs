//! HTTP integration tests
//!
//! Each test starts its own server over a fresh in-memory store, with a
//! bootstrap super admin already provisioned.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::*;
use reqwest::StatusCode;
use serde_json::json;

async fn server() -> TestServer {
    TestServer::start().await.expect("Failed to start server")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = server().await;
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_without_database() {
    let server = server().await;
    let body: serde_json::Value =
        assert_json(server.get("/health/ready").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(body["checks"]["database"], "not_configured");
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_returns_token_and_projection() {
    let server = server().await;
    let request = SignupRequest::unique();

    let response = server.post("/api/signup", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.device, "phone");
    assert_eq!(auth.user.name, request.name);
    assert_eq!(auth.user.email, request.email);
    assert!(!auth.user.newsletter);
    assert!(auth.user.id.is_none());
    assert!(auth.token.contains('|'));
}

#[tokio::test]
async fn test_signup_rejects_invalid_name() {
    let server = server().await;
    let request = SignupRequest::new("invalid name", "user@example.com", "password", "phone");

    let error = assert_error(
        server.post("/api/signup", &request).await.unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["details"]["name"].is_array());
}

#[tokio::test]
async fn test_signup_rejects_email_shaped_name() {
    let server = server().await;
    let request = SignupRequest::new("bob@x.com", "bob.real@y.com", "password", "phone");

    let error = assert_error(
        server.post("/api/signup", &request).await.unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();
    assert_eq!(error["details"]["name"][0]["message"], "Name may not be an email address");

    // nothing was created, so the email is still free
    server.signup("bobreal", "bob.real@y.com", "password").await.unwrap();
}

#[tokio::test]
async fn test_signup_rejects_malformed_body() {
    let server = server().await;
    let response = server
        .post("/api/signup", &json!({ "name": "username" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY).await.unwrap();
}

#[tokio::test]
async fn test_signup_duplicates_conflict_even_after_soft_delete() {
    let server = server().await;
    let token = server.signup("username", "user@example.com", "password").await.unwrap();

    // the first account deletes itself
    assert_status(
        server.delete_auth("/api/me", &token).await.unwrap(),
        StatusCode::NO_CONTENT,
    )
    .await
    .unwrap();

    let same_name = SignupRequest::new("username", "other@example.com", "password", "phone");
    let error = assert_error(
        server.post("/api/signup", &same_name).await.unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();
    assert_eq!(error["code"], "NAME_ALREADY_EXISTS");

    let same_email = SignupRequest::new("another", "user@example.com", "password", "phone");
    let error = assert_error(
        server.post("/api/signup", &same_email).await.unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();
    assert_eq!(error["code"], "EMAIL_ALREADY_EXISTS");
}

// ============================================================================
// Login, tokens, logout
// ============================================================================

#[tokio::test]
async fn test_login_by_name_or_email() {
    let server = server().await;
    server.signup("username", "user@example.com", "password").await.unwrap();

    let by_name = server.login("username", "password", "phone").await.unwrap();
    let by_email = server.login("user@example.com", "password", "laptop").await.unwrap();

    assert_status(server.get_auth("/api/me", &by_name).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(server.get_auth("/api/me", &by_email).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_failures_share_one_answer() {
    let server = server().await;
    server.signup("username", "user@example.com", "password").await.unwrap();

    let wrong_password = assert_error(
        server
            .post("/api/login", &LoginRequest::new("username", "wrong-password", "phone"))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();

    let unknown = assert_error(
        server
            .post("/api/login", &LoginRequest::new("nobody", "password", "phone"))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();

    assert_eq!(wrong_password, unknown);
    assert_eq!(unknown["message"], "Wrong credentials");
}

#[tokio::test]
async fn test_new_login_on_same_device_revokes_old_token() {
    let server = server().await;
    let from_signup = server.signup("username", "user@example.com", "password").await.unwrap();

    let phone = server.login("username", "password", "phone").await.unwrap();
    let laptop = server.login("username", "password", "laptop").await.unwrap();

    assert_status(server.get_auth("/api/me", &from_signup).await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_status(server.get_auth("/api/me", &phone).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(server.get_auth("/api/me", &laptop).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_logins_leave_one_live_token_per_device() {
    let server = server().await;
    server.signup("username", "user@example.com", "password").await.unwrap();

    let body = LoginRequest::new("username", "password", "tablet");
    let responses = join_all((0..8).map(|_| server.post("/api/login", &body))).await;

    let mut tokens = Vec::new();
    for response in responses {
        let auth: AuthResponse = assert_json(response.unwrap(), StatusCode::OK).await.unwrap();
        tokens.push(auth.token);
    }

    let mut live = 0;
    for token in &tokens {
        if server.get_auth("/api/me", token).await.unwrap().status() == StatusCode::OK {
            live += 1;
        }
    }
    assert_eq!(live, 1);
}

#[tokio::test]
async fn test_logout_revokes_only_that_device() {
    let server = server().await;
    let phone = server.signup("username", "user@example.com", "password").await.unwrap();
    let laptop = server.login("username", "password", "laptop").await.unwrap();

    let message: MessageResponse = assert_json(
        server.post_auth("/api/logout", &phone, &json!({})).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(message.message, "Logged out");

    assert_status(server.get_auth("/api/me", &phone).await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_status(server.get_auth("/api/me", &laptop).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let server = server().await;

    assert_status(server.get("/api/me").await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_status(
        server.get_auth("/api/me", "not-a-token").await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
    assert_status(
        server
            .get_auth("/api/me", "1|AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
            .await
            .unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
}

// ============================================================================
// Profile, newsletter, self-deletion
// ============================================================================

#[tokio::test]
async fn test_me_hides_id_except_for_super_admin() {
    let server = server().await;
    let token = server.signup("username", "user@example.com", "password").await.unwrap();

    let me: Data<UserResponse> =
        assert_json(server.get_auth("/api/me", &token).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert!(me.data.id.is_none());
    assert_eq!(me.data.name, "username");

    let admin = server.admin_token().await.unwrap();
    let me: Data<UserResponse> =
        assert_json(server.get_auth("/api/me", &admin).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert!(me.data.id.is_some());
}

#[tokio::test]
async fn test_update_profile_email() {
    let server = server().await;
    let token = server.signup("username", "user@example.com", "password").await.unwrap();
    server.signup("someone", "taken@example.com", "password").await.unwrap();

    assert_status(
        server
            .put_auth("/api/me", &token, &json!({ "email": "taken@example.com" }))
            .await
            .unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();

    assert_status(
        server
            .put_auth("/api/me", &token, &json!({ "email": "not-an-email" }))
            .await
            .unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();

    let updated: Data<UserResponse> = assert_json(
        server
            .put_auth("/api/me", &token, &json!({ "email": "new@example.com" }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(updated.data.email, "new@example.com");

    server.login("new@example.com", "password", "phone").await.unwrap();
}

#[tokio::test]
async fn test_newsletter_subscription() {
    let server = server().await;
    let token = server.signup("username", "user@example.com", "password").await.unwrap();

    let on: Data<UserResponse> = assert_json(
        server
            .put_auth("/api/newsletter", &token, &json!({ "subscribe": true }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(on.data.newsletter);

    let off: Data<UserResponse> = assert_json(
        server
            .put_auth("/api/newsletter", &token, &json!({ "subscribe": false }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!off.data.newsletter);
}

#[tokio::test]
async fn test_self_delete_kills_tokens_and_login() {
    let server = server().await;
    let token = server.signup("username", "user@example.com", "password").await.unwrap();

    assert_status(server.delete_auth("/api/me", &token).await.unwrap(), StatusCode::NO_CONTENT)
        .await
        .unwrap();
    assert_status(server.get_auth("/api/me", &token).await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_status(
        server
            .post("/api/login", &LoginRequest::new("username", "password", "phone"))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
}

// ============================================================================
// Password reset
// ============================================================================

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let server = server().await;
    let error = assert_error(
        server
            .post("/api/forgot-password", &json!({ "email": "ghost@example.com" }))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(error["message"], "Reset link could not be sent");
}

#[tokio::test]
async fn test_password_reset_flow() {
    let server = server().await;
    server.signup("alice01", "alice@example.com", "password").await.unwrap();
    server.signup("bob0001", "bob@example.com", "password").await.unwrap();

    let sent: MessageResponse = assert_json(
        server
            .post("/api/forgot-password", &json!({ "email": "alice@example.com" }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(sent.message, "Reset link sent");
    let token = server.notifier.token_for("alice@example.com").unwrap();

    // bound to alice
    let error = assert_error(
        server
            .post(
                "/api/reset-password",
                &json!({ "email": "bob@example.com", "token": token, "password": "new-password" }),
            )
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(error["message"], "Password could not be reset");

    let reset = json!({ "email": "alice@example.com", "token": token, "password": "new-password" });
    let done: MessageResponse = assert_json(
        server.post("/api/reset-password", &reset).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(done.message, "Password reset");

    // single use
    assert_status(
        server.post("/api/reset-password", &reset).await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();

    assert_status(
        server
            .post("/api/login", &LoginRequest::new("alice01", "password", "phone"))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    server.login("alice01", "new-password", "phone").await.unwrap();
}

#[tokio::test]
async fn test_expired_reset_token_is_rejected() {
    let server = TestServer::start_with(|key| {
        (key == "PASSWORD_RESET_EXPIRY_MINUTES").then(|| "-1".to_string())
    })
    .await
    .unwrap();
    server.signup("username", "user@example.com", "password").await.unwrap();

    assert_status(
        server
            .post("/api/forgot-password", &json!({ "email": "user@example.com" }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let token = server.notifier.token_for("user@example.com").unwrap();

    assert_status(
        server
            .post(
                "/api/reset-password",
                &json!({ "email": "user@example.com", "token": token, "password": "new-password" }),
            )
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
}

// ============================================================================
// Admin surface
// ============================================================================

#[tokio::test]
async fn test_admin_routes_refuse_non_admins_regardless_of_target() {
    let server = server().await;
    let user = server.signup("username", "user@example.com", "password").await.unwrap();
    let missing = "/admin/users/999999999";
    let invalid_body = json!({ "name": "x" });

    let responses = vec![
        server.get_auth("/admin/users", &user).await.unwrap(),
        server.post_auth("/admin/users", &user, &invalid_body).await.unwrap(),
        server.get_auth(missing, &user).await.unwrap(),
        server.put_auth(missing, &user, &invalid_body).await.unwrap(),
        server.delete_auth(missing, &user).await.unwrap(),
        server.patch_auth(missing, &user).await.unwrap(),
        server.get("/admin/users").await.unwrap(),
        server.get(missing).await.unwrap(),
    ];

    for response in responses {
        assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
    }
}

#[tokio::test]
async fn test_admin_index_paginates_live_users() {
    let server = TestServer::start_with(|key| (key == "ADMIN_PAGE_SIZE").then(|| "2".to_string()))
        .await
        .unwrap();
    let admin = server.admin_token().await.unwrap();
    for _ in 0..3 {
        let request = SignupRequest::unique();
        server.post("/api/signup", &request).await.unwrap();
    }

    let page: UserPage = assert_json(
        server.get_auth("/admin/users?page=2", &admin).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    // three signups plus the bootstrap admin
    assert_eq!(page.meta.total, 4);
    assert_eq!(page.meta.page, 2);
    assert_eq!(page.meta.per_page, 2);
    assert_eq!(page.data.len(), 2);
    assert!(page.data.iter().all(|u| u.id.is_some()));
}

#[tokio::test]
async fn test_admin_store_with_roles() {
    let server = server().await;
    let admin = server.admin_token().await.unwrap();

    let created: Data<UserResponse> = assert_json(
        server
            .post_auth(
                "/admin/users",
                &admin,
                &json!({
                    "name": "deputy01",
                    "email": "deputy@example.com",
                    "password": "password",
                    "roles": ["1"]
                }),
            )
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert!(created.data.id.is_some());

    let deputy = server.login("deputy01", "password", "phone").await.unwrap();
    assert_status(server.get_auth("/admin/users", &deputy).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();

    // unknown role ids are a validation failure
    assert_status(
        server
            .post_auth(
                "/admin/users",
                &admin,
                &json!({
                    "name": "another1",
                    "email": "another@example.com",
                    "password": "password",
                    "roles": [424242]
                }),
            )
            .await
            .unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_admin_show() {
    let server = server().await;
    let admin = server.admin_token().await.unwrap();

    assert_status(
        server.get_auth("/admin/users/123456", &admin).await.unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();

    let error = assert_error(
        server.get_auth("/admin/users/not-a-number", &admin).await.unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
    assert_eq!(error["message"], "User not found");
}

#[tokio::test]
async fn test_role_removal_takes_effect_immediately() {
    let server = server().await;
    let admin = server.admin_token().await.unwrap();

    let created: Data<UserResponse> = assert_json(
        server
            .post_auth(
                "/admin/users",
                &admin,
                &json!({
                    "name": "deputy01",
                    "email": "deputy@example.com",
                    "password": "password",
                    "roles": [1]
                }),
            )
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let id = created.data.id.unwrap();
    let deputy = server.login("deputy01", "password", "phone").await.unwrap();

    assert_status(
        server
            .put_auth(&format!("/admin/users/{id}"), &admin, &json!({ "roles": [] }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert_status(
        server.get_auth("/admin/users", &deputy).await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_admin_update_fields() {
    let server = server().await;
    let admin = server.admin_token().await.unwrap();
    let created: Data<UserResponse> = assert_json(
        server
            .post_auth(
                "/admin/users",
                &admin,
                &json!({ "name": "username", "email": "user@example.com", "password": "password" }),
            )
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let path = format!("/admin/users/{}", created.data.id.unwrap());

    let updated: Data<UserResponse> = assert_json(
        server
            .put_auth(&path, &admin, &json!({ "name": "renamed", "password": "new-password" }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(updated.data.name, "renamed");

    server.login("renamed", "new-password", "phone").await.unwrap();

    assert_status(
        server
            .put_auth(&path, &admin, &json!({ "email": ADMIN_EMAIL }))
            .await
            .unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_admin_destroy_and_restore() {
    let server = server().await;
    let admin = server.admin_token().await.unwrap();
    let token = server.signup("username", "user@example.com", "password").await.unwrap();

    let page: UserPage =
        assert_json(server.get_auth("/admin/users", &admin).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    let id = page
        .data
        .iter()
        .find(|u| u.name == "username")
        .and_then(|u| u.id.clone())
        .unwrap();
    let path = format!("/admin/users/{id}");

    assert_status(server.delete_auth(&path, &admin).await.unwrap(), StatusCode::NO_CONTENT)
        .await
        .unwrap();

    // soft-deleted: outstanding token dead, login refused, hidden from index, still shown
    assert_status(server.get_auth("/api/me", &token).await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_status(
        server
            .post("/api/login", &LoginRequest::new("username", "password", "phone"))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    let page: UserPage =
        assert_json(server.get_auth("/admin/users", &admin).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert!(page.data.iter().all(|u| u.name != "username"));
    assert_status(server.get_auth(&path, &admin).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(server.delete_auth(&path, &admin).await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();

    let restored: Data<UserResponse> =
        assert_json(server.patch_auth(&path, &admin).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(restored.data.name, "username");

    server.login("username", "password", "phone").await.unwrap();
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[tokio::test]
async fn test_account_lifecycle_scenario() {
    let server = server().await;
    let admin = server.admin_token().await.unwrap();

    let signup_token = server.signup("alice", "alice@x.com", "password1").await.unwrap();
    let login_token = server.login("alice", "password1", "phone").await.unwrap();
    assert_status(
        server.get_auth("/api/me", &signup_token).await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();

    let bob = SignupRequest::new("bobby", "alice@x.com", "password2", "phone");
    assert_status(
        server.post("/api/signup", &bob).await.unwrap(),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
    .unwrap();

    let page: UserPage =
        assert_json(server.get_auth("/admin/users", &admin).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    let alice_id = page
        .data
        .iter()
        .find(|u| u.email == "alice@x.com")
        .and_then(|u| u.id.clone())
        .unwrap();
    let path = format!("/admin/users/{alice_id}");

    assert_status(server.delete_auth(&path, &admin).await.unwrap(), StatusCode::NO_CONTENT)
        .await
        .unwrap();
    assert_status(server.get_auth("/api/me", &login_token).await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_status(
        server
            .post("/api/login", &LoginRequest::new("alice", "password1", "phone"))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();

    assert_status(server.patch_auth(&path, &admin).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    server.login("alice", "password1", "phone").await.unwrap();
}
