pub mod session;
pub mod token_store;

pub mod services {
    pub mod auth;
    pub mod user;
}

pub mod misc {
    pub mod validate;
}

pub use session::{Session, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
