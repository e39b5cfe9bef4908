//! Ports - what the domain needs from storage, hashing and delivery

mod collaborators;
mod repositories;

pub use collaborators::{PasswordResetNotifier, PasswordVerifier};
pub use repositories::{
    DeviceTokenRepository, PasswordResetRepository, RepoResult, RoleRepository, UserRepository,
};
