//! # identity-api
//!
//! REST API server built with Axum: public signup/login/reset endpoints,
//! bearer-authenticated self-service endpoints and the super-admin user
//! management surface.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
