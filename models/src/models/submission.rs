use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::de::{self, Id};

/// Key/value payload of a submission.
///
/// The backend sends it either as a JSON object or as a string holding a
/// serialised object; both are decoded here so views only ever see a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubmissionData(Map<String, Value>);

impl SubmissionData {
    pub fn field_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Field value as display text; strings are shown without quotes.
    pub fn display_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => SubmissionData(map),
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => SubmissionData(map),
                Ok(_) | Err(_) => {
                    warn!("Submission payload is not a JSON object; showing it as empty");
                    SubmissionData::default()
                }
            },
            Value::Null => SubmissionData::default(),
            other => {
                warn!("Unexpected submission payload type: {}", other);
                SubmissionData::default()
            }
        }
    }
}

impl From<Map<String, Value>> for SubmissionData {
    fn from(map: Map<String, Value>) -> Self {
        SubmissionData(map)
    }
}

impl<'de> Deserialize<'de> for SubmissionData {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(SubmissionData::from_value(Value::deserialize(d)?))
    }
}

/// Read-only except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Id,
    #[serde(default, alias = "formId")]
    pub form_id: Option<Id>,
    #[serde(default)]
    pub data: SubmissionData,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_as_object() {
        let s: Submission = serde_json::from_value(json!({
            "id": 1, "form_id": 4, "data": { "name": "Jane", "email": "jane@example.com" }
        }))
        .unwrap();
        assert_eq!(s.data.field_count(), 2);
        assert_eq!(s.form_id, Some(Id::Num(4)));
    }

    #[test]
    fn payload_as_serialised_string() {
        let s: Submission = serde_json::from_value(json!({
            "id": 2, "data": "{\"name\":\"Jane\",\"message\":\"Hi\",\"age\":30}"
        }))
        .unwrap();
        assert_eq!(s.data.field_count(), 3);
        assert_eq!(SubmissionData::display_value(s.data.get("name").unwrap()), "Jane");
        assert_eq!(SubmissionData::display_value(s.data.get("age").unwrap()), "30");
    }

    #[test]
    fn malformed_payload_is_empty_not_an_error() {
        let s: Submission =
            serde_json::from_value(json!({ "id": 3, "data": "not json" })).unwrap();
        assert!(s.data.is_empty());
        let s: Submission = serde_json::from_value(json!({ "id": 4, "data": "[1,2]" })).unwrap();
        assert!(s.data.is_empty());
        let s: Submission = serde_json::from_value(json!({ "id": 5 })).unwrap();
        assert!(s.data.is_empty());
    }
}
