//! Server setup and initialization

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use identity_common::{AppConfig, AppError, PasswordService};
use identity_core::SnowflakeGenerator;
use identity_db::{
    create_pool, run_migrations, PgDeviceTokenRepository, PgPasswordResetRepository,
    PgRoleRepository, PgUserRepository,
};
use identity_service::{BootstrapService, LogNotifier, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = apply_middleware(
        create_router(),
        &config.cors,
        config.app.env.is_production(),
    );
    router.with_state(state)
}

/// Connect to PostgreSQL and wire every service dependency
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .role_repo(Arc::new(PgRoleRepository::new(pool.clone())))
        .token_repo(Arc::new(PgDeviceTokenRepository::new(pool.clone())))
        .reset_repo(Arc::new(PgPasswordResetRepository::new(pool)))
        .password_verifier(Arc::new(PasswordService::new()))
        .notifier(Arc::new(LogNotifier::new(config.app.url.clone())))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .auth(config.auth.clone())
        .app_url(config.app.url.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Create the configured super admin, if any
pub async fn bootstrap(state: &AppState) -> Result<(), AppError> {
    if let Some(admin) = &state.config().bootstrap {
        BootstrapService::new(state.service_context())
            .ensure_super_admin(admin)
            .await?;
    }
    Ok(())
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    bootstrap(&state).await?;

    run_server(create_app(state), addr).await
}
