use std::{env, path::PathBuf, sync::Arc};

use url::Url;

use crate::error::Res;

/// Local development backend used when `API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3002";

#[derive(Clone, Debug)]
/// Configuration for the client.
///
/// Holds everything needed to reach the backend and to persist the
/// session between runs: the API base URL, the token file location,
/// logging preferences and checkout display settings.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// Base URL of the backend REST API.
    pub api_url: Url,
    /// File holding the bearer token between runs.
    pub token_file: PathBuf,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
    /// File the logger appends to.
    pub log_file: String,
    /// Product name displayed in the payment widget.
    pub app_name: String,
    /// Accent color passed to the payment widget.
    pub checkout_theme_color: String,
    /// Page size of the submission browser.
    pub submissions_per_page: u32,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Every value is optional:
    /// - `ENVIRONMENT`: (default: "development")
    /// - `API_URL`: Backend base URL (default: "http://localhost:3002")
    /// - `TOKEN_FILE`: Token location (default: "$HOME/.easyforms/token")
    /// - `ENABLE_CONSOLE_LOGGING`: (default: true)
    /// - `LOG_LEVEL`: (default: "info")
    /// - `LOG_FILE`: (default: "easyforms.log")
    /// - `APP_NAME`: (default: "EasyForms")
    /// - `CHECKOUT_THEME_COLOR`: (default: "#6772E5")
    /// - `SUBMISSIONS_PER_PAGE`: (default: 10)
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AppError::Url`] if `API_URL` is not a valid URL.
    pub fn from_env() -> Res<Arc<Self>> {
        dotenvy::dotenv().ok();

        let api_url = env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Arc::new(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            api_url: Url::parse(&api_url)?,
            token_file: env::var("TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_token_file()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "easyforms.log".to_string()),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "EasyForms".to_string()),
            checkout_theme_color: env::var("CHECKOUT_THEME_COLOR")
                .unwrap_or_else(|_| "#6772E5".to_string()),
            submissions_per_page: env::var("SUBMISSIONS_PER_PAGE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(10),
        }))
    }

    /// Configuration pointing at `api_url` with every other value defaulted.
    pub fn for_api(api_url: &str) -> Res<Self> {
        Ok(Config {
            environment: "development".to_string(),
            api_url: Url::parse(api_url)?,
            token_file: default_token_file(),
            console_logging_enabled: false,
            log_level: "info".to_string(),
            log_file: "easyforms.log".to_string(),
            app_name: "EasyForms".to_string(),
            checkout_theme_color: "#6772E5".to_string(),
            submissions_per_page: 10,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn default_token_file() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".easyforms")
        .join("token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_api_uses_defaults() {
        let config = Config::for_api("http://api.test:8080").unwrap();
        assert_eq!(config.api_url.as_str(), "http://api.test:8080/");
        assert_eq!(config.submissions_per_page, 10);
        assert_eq!(config.checkout_theme_color, "#6772E5");
        assert!(!config.is_production());
    }

    #[test]
    fn for_api_rejects_invalid_url() {
        assert!(Config::for_api("not a url").is_err());
    }
}
