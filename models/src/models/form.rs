use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de::{self, Id};

/// A form backend owned by the user. `endpoint_id` is the public token
/// in `/f/{endpoint_id}` and never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: Id,
    #[serde(default, deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub endpoint_id: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default, deserialize_with = "de::bool_or_int")]
    pub email_notifications: bool,
    #[serde(default, deserialize_with = "de::bool_or_int")]
    pub spam_protection: bool,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub submission_count: u64,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Form {
    /// Title, else name, else `Form #<id>`.
    pub fn display_name(&self) -> String {
        match (&self.title, self.name.trim()) {
            (Some(title), _) if !title.trim().is_empty() => title.clone(),
            (_, name) if !name.is_empty() => self.name.clone(),
            _ => format!("Form #{}", self.id),
        }
    }
}
