//! Public and self-service account endpoints

use axum::{extract::State, Json};
use identity_service::{
    AccountService, ApiResponse, AuthResponse, ForgotPasswordRequest, LoginRequest,
    MessageResponse, NewsletterRequest, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest, UserResponse,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /api/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let response = AccountService::new(state.service_context())
        .register(request)
        .await?;
    Ok(Created(Json(response)))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = AccountService::new(state.service_context())
        .login(request)
        .await?;
    Ok(Json(response))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    let response = AccountService::new(state.service_context())
        .logout(auth.device())
        .await?;
    Ok(Json(response))
}

/// POST /api/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let response = AccountService::new(state.service_context())
        .request_password_reset(request)
        .await?;
    Ok(Json(response))
}

/// POST /api/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let response = AccountService::new(state.service_context())
        .reset_password(request)
        .await?;
    Ok(Json(response))
}

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = AccountService::new(state.service_context())
        .profile(auth.user())
        .await?;
    Ok(Json(ApiResponse::new(user)))
}

/// PUT /api/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = AccountService::new(state.service_context())
        .update_profile(auth.user(), request)
        .await?;
    Ok(Json(ApiResponse::new(user)))
}

/// DELETE /api/me
pub async fn delete_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoContent> {
    AccountService::new(state.service_context())
        .delete_account(auth.user())
        .await?;
    Ok(NoContent)
}

/// PUT /api/newsletter
pub async fn newsletter(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<NewsletterRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = AccountService::new(state.service_context())
        .update_newsletter(auth.user(), request)
        .await?;
    Ok(Json(ApiResponse::new(user)))
}
