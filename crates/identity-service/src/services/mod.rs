//! Business logic services
//!
//! Every operation takes the acting user explicitly; nothing reads an
//! ambient "current user".

pub mod account;
pub mod admin;
pub mod bootstrap;
pub mod context;
pub mod error;
pub mod gate;
pub mod notifier;
pub mod resolver;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::AccountService;
pub use admin::AdminUserService;
pub use bootstrap::BootstrapService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use gate::AccessGate;
pub use notifier::LogNotifier;
pub use resolver::CredentialResolver;
pub use token::{AuthenticatedDevice, TokenService};
