//! Request bodies and response shapes used by the HTTP tests

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name that passes validation and is unique across tests
pub fn unique_name() -> String {
    format!("user{}", &Uuid::new_v4().simple().to_string()[..12])
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub device: String,
}

impl SignupRequest {
    pub fn new(name: &str, email: &str, password: &str, device: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            device: device.to_string(),
        }
    }

    pub fn unique() -> Self {
        let name = unique_name();
        let email = format!("{name}@example.com");
        Self::new(&name, &email, "password", "phone")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
    pub device: String,
}

impl LoginRequest {
    pub fn new(login: &str, password: &str, device: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
            device: device.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub device: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub newsletter: bool,
}

/// `{"data": ...}` envelope
#[derive(Debug, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct UserPage {
    pub data: Vec<UserResponse>,
    pub meta: PageMeta,
}

#[derive(Debug, Deserialize)]
pub struct PageMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
