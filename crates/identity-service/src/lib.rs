//! # identity-service
//!
//! Application layer: credential resolution, device tokens, the super-admin
//! gate and the account lifecycle, plus the request/response DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccessGate, AccountService, AdminUserService, AuthenticatedDevice, BootstrapService,
    CredentialResolver, LogNotifier, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, TokenService,
};

pub use dto::{
    AdminCreateUserRequest, AdminUpdateUserRequest, ApiResponse, AuthResponse,
    ForgotPasswordRequest, HealthResponse, LoginRequest, MessageResponse, NewsletterRequest,
    PaginatedResponse, ReadinessResponse, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest, UserResponse,
};
