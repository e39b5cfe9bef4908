//! Route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{account, admin, health};
use crate::state::AppState;

/// Create the full router: API, admin and health routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .nest("/admin", admin_routes())
        .merge(health_routes())
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Public
        .route("/signup", post(account::signup))
        .route("/login", post(account::login))
        .route("/forgot-password", post(account::forgot_password))
        .route("/reset-password", post(account::reset_password))
        // Bearer token required
        .route("/logout", post(account::logout))
        .route(
            "/me",
            get(account::me)
                .put(account::update_me)
                .delete(account::delete_me),
        )
        .route("/newsletter", put(account::newsletter))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::index).post(admin::store))
        .route(
            "/users/:id",
            get(admin::show)
                .put(admin::update)
                .delete(admin::destroy)
                .patch(admin::restore),
        )
}
