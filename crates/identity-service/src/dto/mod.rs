//! Data transfer objects for API requests and responses
//!
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers from domain entities to response DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AdminCreateUserRequest, AdminUpdateUserRequest, ForgotPasswordRequest, LoginRequest,
    NewsletterRequest, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
};

pub use responses::{
    ApiResponse, AuthResponse, HealthChecks, HealthResponse, MessageResponse, PaginatedResponse,
    PaginationMeta, ReadinessResponse, UserResponse,
};
