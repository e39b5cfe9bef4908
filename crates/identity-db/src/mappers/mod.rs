//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions for rows read back from PostgreSQL.
//! Writes bind entity fields directly.

mod device_token;
mod role;
mod user;
