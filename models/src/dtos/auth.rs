use serde::{Deserialize, Serialize};

use crate::models::user::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login/register response. Both fields are required for a usable session;
/// they are optional here so a malformed body surfaces as a clear error.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}
