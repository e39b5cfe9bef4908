//! Value objects - immutable types that represent domain concepts

mod deleted_scope;
mod login_identifier;
mod snowflake;

pub use deleted_scope::DeletedScope;
pub use login_identifier::LoginIdentifier;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
