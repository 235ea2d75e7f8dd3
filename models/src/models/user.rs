use std::fmt;

use serde::{Deserialize, Serialize};

use crate::de::{self, Id};

/// Subscription tier, ordered from least to most capable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Pro, Tier::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Enterprise => "enterprise",
        }
    }

    pub fn is_paid(&self) -> bool {
        *self != Tier::Free
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "pro" => Ok(Tier::Pro),
            "enterprise" => Ok(Tier::Enterprise),
            other => Err(format!("unknown tier: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    None,
    Pending,
    Active,
    #[serde(alias = "canceled")]
    Cancelled,
    Halted,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::None => "none",
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Halted => "halted",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default, deserialize_with = "de::null_default")]
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub subscription_tier: Tier,
    #[serde(default, deserialize_with = "de::null_default")]
    pub subscription_status: SubscriptionStatus,
    #[serde(default)]
    pub phone: Option<String>,
}

impl User {
    pub fn has_active_subscription(&self) -> bool {
        self.subscription_status == SubscriptionStatus::Active
    }
}

/// Local patch applied to the cached user after a billing mutation,
/// pending the next authoritative fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subscription_tier: Option<Tier>,
    pub subscription_status: Option<SubscriptionStatus>,
}

impl UserPatch {
    pub fn subscription(tier: Tier, status: SubscriptionStatus) -> Self {
        UserPatch {
            subscription_tier: Some(tier),
            subscription_status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(tier) = self.subscription_tier {
            user.subscription_tier = tier;
        }
        if let Some(status) = self.subscription_status {
            user.subscription_status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_or_null_subscription_fields_default_to_free() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "name": "Jane",
            "email": "jane@example.com",
            "subscription_tier": null,
        }))
        .unwrap();
        assert_eq!(user.subscription_tier, Tier::Free);
        assert_eq!(user.subscription_status, SubscriptionStatus::None);
    }

    #[test]
    fn american_spelling_of_cancelled_is_accepted() {
        let status: SubscriptionStatus = serde_json::from_value(json!("canceled")).unwrap();
        assert_eq!(status, SubscriptionStatus::Cancelled);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(Tier::Free < Tier::Pro && Tier::Pro < Tier::Enterprise);
        assert_eq!("Pro".parse::<Tier>().unwrap(), Tier::Pro);
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut user: User = serde_json::from_value(json!({
            "id": "u1", "name": "Jane", "email": "jane@example.com",
            "subscription_tier": "pro", "subscription_status": "active"
        }))
        .unwrap();
        UserPatch::subscription(Tier::Free, SubscriptionStatus::Cancelled).apply(&mut user);
        assert_eq!(user.name, "Jane");
        assert_eq!(user.subscription_tier, Tier::Free);
        assert_eq!(user.subscription_status, SubscriptionStatus::Cancelled);
    }
}
