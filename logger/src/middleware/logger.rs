use std::fmt::Display;
use std::time::Instant;

use colored::Colorize;
use log::{debug, error, info};
use serde_json::Value;

/// Keys whose values never reach the log output.
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "confirm_password",
    "confirmPassword",
    "card_number",
    "cardNumber",
    "cvv",
    "token",
    "razorpay_signature",
];

/// Records one request sent to the backend and logs it once the response
/// (or transport failure) is known.
pub struct ExchangeLog {
    request_id: String,
    method: String,
    path: String,
    started: Instant,
    request_body: Option<Value>,
}

impl ExchangeLog {
    pub fn new(request_id: &str, method: &str, path: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            method: method.to_uppercase(),
            path: path.to_string(),
            started: Instant::now(),
            request_body: None,
        }
    }

    /// Attaches the JSON request body; sensitive fields are masked.
    pub fn with_body(mut self, body: &Value) -> Self {
        self.request_body = Some(mask_sensitive(body));
        self
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    /// Logs a completed exchange.
    pub fn finish(self, status_code: u16) {
        let colored_status = match status_code {
            200..=299 => status_code.to_string().green(),
            300..=399 => status_code.to_string().yellow(),
            400..=499 => status_code.to_string().bright_red(),
            _ => status_code.to_string().red(),
        };

        info!(
            "[{}] {} {} {} request_id={}",
            colored_status,
            self.colored_method(),
            self.path.bright_white(),
            format!("({}ms)", self.elapsed_ms()).bright_black(),
            self.request_id.bright_blue(),
        );
        self.log_body();
    }

    /// Logs an exchange that never produced a response.
    pub fn failed(self, err: &dyn Display) {
        error!(
            "[{}] {} {} {} request_id={} {}",
            "---".red(),
            self.colored_method(),
            self.path.bright_white(),
            format!("({}ms)", self.elapsed_ms()).bright_black(),
            self.request_id.bright_blue(),
            err
        );
        self.log_body();
    }

    fn colored_method(&self) -> colored::ColoredString {
        match self.method.as_str() {
            "GET" => self.method.blue(),
            "POST" => self.method.yellow(),
            "PUT" => self.method.purple(),
            "DELETE" => self.method.red(),
            _ => self.method.normal(),
        }
    }

    fn log_body(&self) {
        if let Some(body) = self.request_body.as_ref().and_then(|b| b.as_object()) {
            if !body.is_empty() {
                debug!(
                    "  Request: {}",
                    serde_json::to_string(body).unwrap_or_default().bright_green()
                );
            }
        }
    }
}

/// Returns a copy of `value` with every sensitive key replaced by `"***"`,
/// at any nesting depth.
pub fn mask_sensitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    if SENSITIVE_KEYS.contains(&key.as_str()) {
                        (key.clone(), Value::String("***".to_string()))
                    } else {
                        (key.clone(), mask_sensitive(val))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(mask_sensitive).collect()),
        other => other.clone(),
    }
}
