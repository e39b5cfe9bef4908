//! Authentication extractors
//!
//! Resolve the bearer token from the Authorization header to a live user.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use identity_core::User;
use identity_service::{AdminUserService, AuthenticatedDevice, TokenService};

use crate::response::ApiError;
use crate::state::AppState;

/// Caller authenticated by a device token
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedDevice);

impl AuthUser {
    pub fn user(&self) -> &User {
        &self.0.user
    }

    pub fn device(&self) -> &AuthenticatedDevice {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let device = TokenService::new(app_state.service_context())
            .authenticate(bearer.token())
            .await?;

        Ok(AuthUser(device))
    }
}

/// Authenticated caller holding `SUPER_ADMIN`
///
/// Handlers take this before `Path` and body extractors, so a non-admin is
/// refused before the target or the payload is looked at.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(device) = AuthUser::from_request_parts(parts, state).await?;

        let app_state = AppState::from_ref(state);
        AdminUserService::new(app_state.service_context())
            .authorize(&device.user)
            .await?;

        Ok(AdminUser(device.user))
    }
}
