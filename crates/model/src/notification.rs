use serde::Serialize;
use serde_json::{Map, Value};

use crate::time::{rfc3339, DateTimeUtc};

/// Notification about a routine activity logged by a partner.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub data: ActivityData,
}

/// Data part of the push message, delivered unchanged to every device.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ActivityData {
    pub baby_id: String,
    pub baby_name: String,
    pub activity_type: String,
    pub activity_id: String,
    pub partner_name: String,
    pub timestamp: String,
}

impl NotificationPayload {
    /// Reads the payload from a JSON object.
    ///
    /// Missing or null fields fall back to an empty string (or to `now` for the
    /// timestamp). Returns `None` only if `value` is not an object at all.
    pub fn from_json(value: &Value, now: DateTimeUtc) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |key: &str| string_field(obj, key).unwrap_or_default();

        Some(NotificationPayload {
            title: field("title"),
            body: field("body"),
            data: ActivityData {
                baby_id: field("babyId"),
                baby_name: field("babyName"),
                activity_type: field("activityType"),
                activity_id: field("activityId"),
                partner_name: field("partnerName"),
                timestamp: string_field(obj, "timestamp").unwrap_or_else(|| rfc3339(now)),
            },
        })
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Aggregate outcome of a fan-out send.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct DispatchResult {
    pub sent: usize,
    pub failed: usize,
}

impl DispatchResult {
    pub fn total(&self) -> usize {
        self.sent + self.failed
    }

    pub fn summary(&self) -> String {
        format!(
            "Notifications sent: {} of {}, failed: {}",
            self.sent,
            self.total(),
            self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, to_value};

    fn now() -> DateTimeUtc {
        Utc.with_ymd_and_hms(2024, 5, 4, 10, 30, 0).unwrap()
    }

    #[test]
    fn full_payload() {
        let value = json!({
            "title": "Feeding",
            "body": "Anna logged a feeding",
            "babyId": "b1",
            "babyName": "Mia",
            "activityType": "feeding",
            "activityId": "a7",
            "partnerName": "Anna",
            "timestamp": "2024-05-04T10:00:00Z",
        });
        let payload = NotificationPayload::from_json(&value, now()).expect("object");
        assert_eq!(payload.title, "Feeding");
        assert_eq!(payload.data.baby_name, "Mia");
        assert_eq!(payload.data.timestamp, "2024-05-04T10:00:00Z");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let payload =
            NotificationPayload::from_json(&json!({ "title": null }), now()).expect("object");
        assert_eq!(payload.title, "");
        assert_eq!(payload.body, "");
        assert_eq!(payload.data.baby_id, "");
        assert_eq!(payload.data.timestamp, "2024-05-04T10:30:00+00:00");
    }

    #[test]
    fn scalars_are_stringified() {
        let payload =
            NotificationPayload::from_json(&json!({ "activityId": 42 }), now()).expect("object");
        assert_eq!(payload.data.activity_id, "42");
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(NotificationPayload::from_json(&json!(null), now()).is_none());
        assert!(NotificationPayload::from_json(&json!("hi"), now()).is_none());
        assert!(NotificationPayload::from_json(&json!([1, 2]), now()).is_none());
    }

    #[test]
    fn data_uses_camel_case_keys() {
        let data = ActivityData {
            baby_id: "b1".to_string(),
            baby_name: "Mia".to_string(),
            activity_type: "sleep".to_string(),
            activity_id: "a1".to_string(),
            partner_name: "Leo".to_string(),
            timestamp: "t".to_string(),
        };
        let expected_json = json!({
            "babyId": "b1",
            "babyName": "Mia",
            "activityType": "sleep",
            "activityId": "a1",
            "partnerName": "Leo",
            "timestamp": "t",
        });
        assert_eq!(to_value(data).expect("serialize"), expected_json);
    }

    #[test]
    fn summary_counts() {
        let result = DispatchResult { sent: 2, failed: 1 };
        assert_eq!(result.total(), 3);
        assert_eq!(result.summary(), "Notifications sent: 2 of 3, failed: 1");
    }
}
