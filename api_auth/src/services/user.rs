use common::{error::Res, http::ApiClient};
use models::dtos::auth::{UpdateProfileRequest, UserResponse};
use models::models::user::User;

/// Fetches the user the bearer token belongs to. A 401 here means the
/// token is no longer valid.
pub async fn get_current_user(api: &ApiClient) -> Res<User> {
    let res: UserResponse = api
        .get("/api/users/me", "Failed to fetch user data")
        .await?;
    Ok(res.user)
}

pub async fn update_profile(api: &ApiClient, req: &UpdateProfileRequest) -> Res<User> {
    let res: UserResponse = api
        .put("/api/users/profile", req, "Failed to update profile")
        .await?;
    Ok(res.user)
}
