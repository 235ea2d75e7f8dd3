use common::{
    error::{AppError, Res},
    http::ApiClient,
    jwt,
};
use log::{info, warn};
use models::dtos::auth::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use models::models::user::{User, UserPatch};

use crate::misc::validate;
use crate::services;
use crate::token_store::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Explicit session context handed to every operation that needs the
/// current user or an authenticated API client.
///
/// Lifecycle: [`Session::init`] loads and re-verifies the stored token,
/// ending authenticated or anonymous; [`Session::logout`] tears it down
/// synchronously. Token presence alone never means authenticated.
pub struct Session {
    api: ApiClient,
    store: Box<dyn TokenStore>,
    user: Option<User>,
}

impl Session {
    /// Anonymous session; nothing is read from the store yet.
    pub fn new(mut api: ApiClient, store: impl TokenStore + 'static) -> Self {
        api.clear_token();
        Session {
            api,
            store: Box::new(store),
            user: None,
        }
    }

    /// Builds a session and restores it from the store.
    pub async fn init(api: ApiClient, store: impl TokenStore + 'static) -> Self {
        let mut session = Session::new(api, store);
        session.restore().await;
        session
    }

    /// Loads the stored token and verifies it against `/api/users/me`.
    ///
    /// - no token: anonymous
    /// - token whose `exp` has passed: cleared locally, anonymous
    /// - 401 from the backend: cleared, anonymous
    /// - any other failure: anonymous for now, token kept for the next run
    pub async fn restore(&mut self) -> SessionState {
        self.user = None;
        self.api.clear_token();

        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return SessionState::Anonymous,
            Err(err) => {
                warn!("Could not read stored token: {}", err);
                return SessionState::Anonymous;
            }
        };

        if jwt::is_expired(&token, chrono::Utc::now().timestamp()) {
            info!("Stored token has expired; signing out");
            self.clear_store();
            return SessionState::Anonymous;
        }

        self.api.set_token(token);
        match services::user::get_current_user(&self.api).await {
            Ok(user) => {
                info!("Restored session for {}", user.email);
                self.user = Some(user);
                SessionState::Authenticated
            }
            Err(err) if err.is_unauthorized() => {
                warn!("Stored token was rejected: {}", err);
                self.logout();
                SessionState::Anonymous
            }
            Err(err) => {
                warn!("Could not verify stored token: {}", err);
                self.api.clear_token();
                SessionState::Anonymous
            }
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.api.token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.api.has_token()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// The signed-in user, or `Unauthorized` when anonymous.
    pub fn require_user(&self) -> Res<&User> {
        match (&self.user, self.api.has_token()) {
            (Some(user), true) => Ok(user),
            _ => Err(AppError::Unauthorized("Please log in to continue".to_string())),
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Res<&User> {
        validate::validate_login(email, password)?;
        self.api.clear_token();

        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let (token, user) = services::auth::login(&self.api, &req).await?;
        info!("Logged in as {}", user.email);
        Ok(self.establish(token, user))
    }

    /// Registers after validating input locally; `confirm_password` never
    /// leaves the client.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Res<&User> {
        validate::validate_register(name, email, password, confirm_password)?;
        self.api.clear_token();

        let req = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let (token, user) = services::auth::register(&self.api, &req).await?;
        info!("Registered {}", user.email);
        Ok(self.establish(token, user))
    }

    /// Clears the cached user, the client token and the stored token. No
    /// server call is made.
    pub fn logout(&mut self) {
        self.user = None;
        self.api.clear_token();
        self.clear_store();
    }

    pub async fn update_profile(&mut self, name: &str, email: &str) -> Res<&User> {
        self.require_user()?;
        validate::validate_profile(name, email)?;

        let req = UpdateProfileRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        };
        let res = services::user::update_profile(&self.api, &req).await;
        let user = self.guard(res)?;
        Ok(self.user.insert(user))
    }

    /// Replaces the cached user with an authoritative copy.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Patches the cached user; no-op when anonymous.
    pub fn update_user(&mut self, patch: UserPatch) {
        if let Some(user) = self.user.as_mut() {
            patch.apply(user);
        }
    }

    /// Passes `res` through, logging out first if it is an authentication
    /// failure.
    pub fn guard<T>(&mut self, res: Res<T>) -> Res<T> {
        if let Err(err) = &res {
            if err.is_unauthorized() && self.api.has_token() {
                warn!("Session rejected by the server; logging out");
                self.logout();
            }
        }
        res
    }

    fn establish(&mut self, token: String, user: User) -> &User {
        if let Err(err) = self.store.save(&token) {
            warn!("Could not persist token; session will not survive a restart: {}", err);
        }
        self.api.set_token(token);
        self.user.insert(user)
    }

    fn clear_store(&self) {
        if let Err(err) = self.store.clear() {
            warn!("Could not remove stored token: {}", err);
        }
    }
}
