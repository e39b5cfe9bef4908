//! # identity-db
//!
//! Storage layer implementing the `identity-core` repository traits.
//!
//! - PostgreSQL via SQLx: connection pool, migrations, models, mappers and
//!   `Pg*Repository` types
//! - [`MemoryStore`]: the same contracts behind one mutex, for tests and
//!   local runs without a database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use identity_db::{create_pool, run_migrations, PgUserRepository};
//!
//! let pool = create_pool(&config.database).await?;
//! run_migrations(&pool).await?;
//! let users = PgUserRepository::new(pool);
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryStore, SUPER_ADMIN_ROLE_ID};
pub use pool::{create_pool, ping, run_migrations, PgPool, MIGRATIONS_DIR};
pub use repositories::{
    PgDeviceTokenRepository, PgPasswordResetRepository, PgRoleRepository, PgUserRepository,
};
