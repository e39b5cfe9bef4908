//! Admin user management endpoints
//!
//! `AdminUser` comes first in every signature so the gate runs before the
//! path id or the body is inspected.

use axum::{
    extract::{Path, State},
    Json,
};
use identity_service::{
    AdminCreateUserRequest, AdminUpdateUserRequest, AdminUserService, ApiResponse,
    PaginatedResponse, UserResponse,
};

use crate::extractors::{AdminUser, PageQuery, UserIdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /admin/users?page=N
pub async fn index(
    AdminUser(actor): AdminUser,
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> ApiResult<Json<PaginatedResponse<UserResponse>>> {
    let users = AdminUserService::new(state.service_context())
        .list(&actor, page)
        .await?;
    Ok(Json(users))
}

/// POST /admin/users
pub async fn store(
    AdminUser(actor): AdminUser,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdminCreateUserRequest>,
) -> ApiResult<Created<Json<ApiResponse<UserResponse>>>> {
    let user = AdminUserService::new(state.service_context())
        .create(&actor, request)
        .await?;
    Ok(Created(Json(ApiResponse::new(user))))
}

/// GET /admin/users/:id
pub async fn show(
    AdminUser(actor): AdminUser,
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = AdminUserService::new(state.service_context())
        .show(&actor, path.user_id()?)
        .await?;
    Ok(Json(ApiResponse::new(user)))
}

/// PUT /admin/users/:id
pub async fn update(
    AdminUser(actor): AdminUser,
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    ValidatedJson(request): ValidatedJson<AdminUpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = AdminUserService::new(state.service_context())
        .update(&actor, path.user_id()?, request)
        .await?;
    Ok(Json(ApiResponse::new(user)))
}

/// DELETE /admin/users/:id
pub async fn destroy(
    AdminUser(actor): AdminUser,
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<NoContent> {
    AdminUserService::new(state.service_context())
        .destroy(&actor, path.user_id()?)
        .await?;
    Ok(NoContent)
}

/// PATCH /admin/users/:id
pub async fn restore(
    AdminUser(actor): AdminUser,
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = AdminUserService::new(state.service_context())
        .restore(&actor, path.user_id()?)
        .await?;
    Ok(Json(ApiResponse::new(user)))
}
