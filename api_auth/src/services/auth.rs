use common::{
    error::{AppError, Res},
    http::ApiClient,
};
use models::dtos::auth::{AuthResponse, LoginRequest, RegisterRequest};
use models::models::user::User;

/// Exchanges credentials for a bearer token and the user record.
///
/// # Errors
///
/// Returns the backend's message (or `Login failed`) on rejection and
/// [`AppError::InvalidServerResponse`] if the body lacks a token or user.
pub async fn login(api: &ApiClient, req: &LoginRequest) -> Res<(String, User)> {
    let res: AuthResponse = api.post("/api/auth/login", req, "Login failed").await?;
    into_credentials(res)
}

/// Creates an account and signs in, returning the token and user record.
pub async fn register(api: &ApiClient, req: &RegisterRequest) -> Res<(String, User)> {
    let res: AuthResponse = api
        .post("/api/auth/register", req, "Registration failed")
        .await?;
    into_credentials(res)
}

fn into_credentials(res: AuthResponse) -> Res<(String, User)> {
    match (res.token, res.user) {
        (Some(token), Some(user)) if !token.trim().is_empty() => Ok((token, user)),
        _ => Err(AppError::InvalidServerResponse(
            "authentication response is missing the token or user".to_string(),
        )),
    }
}
