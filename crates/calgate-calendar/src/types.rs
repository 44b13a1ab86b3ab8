//! Calendar API types and data structures.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};

/// Wire format of a timed boundary, local to its `timeZone`
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Calendar metadata from the user's calendar list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDescriptor {
    pub id: String,
    pub display_name: String,
    pub is_primary: bool,
    pub time_zone: Option<String>,
    pub background_color: Option<String>,
    pub access_role: AccessRole,
}

impl CalendarDescriptor {
    pub fn new(id: &str, display_name: &str, is_primary: bool) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            is_primary,
            time_zone: None,
            background_color: None,
            access_role: AccessRole::default(),
        }
    }
}

/// Calendar access role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum AccessRole {
    Owner,
    Writer,
    #[default]
    Reader,
    FreeBusyReader,
}

/// Start or end of an event as the service reports it.
///
/// All-day events carry only `date`; timed events carry `dateTime`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventBoundary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// An event in the service's own shape.
///
/// Fields not named here are kept in `extra`, so re-serializing yields what
/// the service sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventBoundary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventBoundary>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RemoteEvent {
    /// True when the event has a start without a time of day.
    pub fn is_all_day(&self) -> bool {
        matches!(&self.start, Some(start) if start.date_time.is_none())
    }
}

/// Outgoing start/end of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateBoundary {
    /// `{"date": "YYYY-MM-DD"}`
    AllDay { date: NaiveDate },
    /// `{"dateTime": "YYYY-MM-DDTHH:MM:SS", "timeZone": "<tz>"}`
    Timed {
        #[serde(rename = "dateTime", serialize_with = "serialize_local_datetime")]
        date_time: NaiveDateTime,
        #[serde(rename = "timeZone")]
        time_zone: String,
    },
}

fn serialize_local_datetime<S: Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(LOCAL_DATETIME_FORMAT))
}

/// Start and end of a new event. End is always after start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventWindow {
    pub start: DateBoundary,
    pub end: DateBoundary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Reminders {
    /// No default reminders and no explicit ones.
    pub fn disabled() -> Self {
        Self {
            use_default: false,
            overrides: Vec::new(),
        }
    }
}

/// Request body for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    pub start: DateBoundary,
    pub end: DateBoundary,
    pub reminders: Reminders,
}

impl NewEvent {
    pub fn new(summary: &str, window: EventWindow) -> Self {
        Self {
            summary: summary.to_string(),
            description: None,
            color_id: None,
            start: window.start,
            end: window.end,
            reminders: Reminders::disabled(),
        }
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(|d| d.to_string());
        self
    }

    pub fn with_color_id(mut self, color_id: Option<&str>) -> Self {
        self.color_id = color_id.map(|c| c.to_string());
        self
    }
}

// API Response Types

/// API response for event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub items: Option<Vec<RemoteEvent>>,
    pub next_page_token: Option<String>,
}

/// API response for calendar list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<ApiCalendar>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendar {
    pub id: String,
    pub summary: Option<String>,
    pub summary_override: Option<String>,
    pub time_zone: Option<String>,
    pub background_color: Option<String>,
    #[serde(default)]
    pub primary: bool,
    pub access_role: Option<String>,
}

impl From<ApiCalendar> for CalendarDescriptor {
    fn from(api: ApiCalendar) -> Self {
        let access_role = match api.access_role.as_deref() {
            Some("owner") => AccessRole::Owner,
            Some("writer") => AccessRole::Writer,
            Some("reader") => AccessRole::Reader,
            Some("freeBusyReader") => AccessRole::FreeBusyReader,
            _ => AccessRole::Reader,
        };

        Self {
            id: api.id,
            display_name: api.summary.unwrap_or_default(),
            is_primary: api.primary,
            time_zone: api.time_zone,
            background_color: api.background_color,
            access_role,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calendar_from_api() {
        let json = r#"{
            "id": "user@example.com",
            "summary": "My Calendar",
            "timeZone": "Europe/Moscow",
            "primary": true,
            "accessRole": "owner"
        }"#;

        let api_calendar: ApiCalendar = serde_json::from_str(json).unwrap();
        let calendar = CalendarDescriptor::from(api_calendar);

        assert_eq!(calendar.id, "user@example.com");
        assert_eq!(calendar.display_name, "My Calendar");
        assert!(calendar.is_primary);
        assert_eq!(calendar.access_role, AccessRole::Owner);
    }

    #[test]
    fn test_calendar_display_name_ignores_override() {
        let json = r#"{
            "id": "holidays@group.v.calendar.google.com",
            "summary": "Holidays in Russia",
            "summaryOverride": "Праздники"
        }"#;

        let calendar = CalendarDescriptor::from(serde_json::from_str::<ApiCalendar>(json).unwrap());

        assert_eq!(calendar.display_name, "Holidays in Russia");
        assert!(!calendar.is_primary);
        assert_eq!(calendar.access_role, AccessRole::Reader);
    }

    #[test]
    fn test_all_day_detection() {
        let all_day: RemoteEvent = serde_json::from_value(json!({
            "id": "a",
            "start": {"date": "2018-09-26"},
            "end": {"date": "2018-09-27"}
        }))
        .unwrap();
        let timed: RemoteEvent = serde_json::from_value(json!({
            "id": "b",
            "start": {"dateTime": "2018-09-26T10:00:00+03:00"},
            "end": {"dateTime": "2018-09-26T11:00:00+03:00"}
        }))
        .unwrap();
        let no_start: RemoteEvent = serde_json::from_value(json!({"id": "c"})).unwrap();

        assert!(all_day.is_all_day());
        assert!(!timed.is_all_day());
        assert!(!no_start.is_all_day());
    }

    #[test]
    fn test_reminders_serialize_in_api_shape() {
        assert_eq!(
            serde_json::to_value(Reminders::disabled()).unwrap(),
            json!({"useDefault": false, "overrides": []})
        );

        let popup = Reminders {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: "popup".to_string(),
                minutes: 30,
            }],
        };
        assert_eq!(
            serde_json::to_value(popup).unwrap(),
            json!({"useDefault": false, "overrides": [{"method": "popup", "minutes": 30}]})
        );
    }

    #[test]
    fn test_remote_event_keeps_unknown_fields() {
        let raw = json!({
            "kind": "calendar#event",
            "id": "evt1",
            "summary": "Birthday",
            "start": {"date": "2018-09-26"},
            "end": {"date": "2018-09-27"},
            "transparency": "transparent",
            "creator": {"email": "someone@example.com"}
        });

        let event: RemoteEvent = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(event.extra.get("kind"), Some(&json!("calendar#event")));
        assert_eq!(serde_json::to_value(&event).unwrap(), raw);
    }

    #[test]
    fn test_new_event_omits_absent_optionals() {
        let window = EventWindow {
            start: DateBoundary::AllDay {
                date: NaiveDate::from_ymd_opt(2018, 9, 26).unwrap(),
            },
            end: DateBoundary::AllDay {
                date: NaiveDate::from_ymd_opt(2018, 9, 27).unwrap(),
            },
        };

        let body = serde_json::to_value(NewEvent::new("Dentist", window)).unwrap();

        assert_eq!(
            body,
            json!({
                "summary": "Dentist",
                "start": {"date": "2018-09-26"},
                "end": {"date": "2018-09-27"},
                "reminders": {"useDefault": false, "overrides": []}
            })
        );
    }

    #[test]
    fn test_new_event_with_optionals() {
        let start = NaiveDate::from_ymd_opt(2018, 9, 26)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let window = EventWindow {
            start: DateBoundary::Timed {
                date_time: start,
                time_zone: "Europe/Moscow".to_string(),
            },
            end: DateBoundary::Timed {
                date_time: start + chrono::Duration::hours(1),
                time_zone: "Europe/Moscow".to_string(),
            },
        };

        let body = serde_json::to_value(
            NewEvent::new("Standup", window)
                .with_description(Some("daily"))
                .with_color_id(Some("5")),
        )
        .unwrap();

        assert_eq!(body["description"], json!("daily"));
        assert_eq!(body["colorId"], json!("5"));
        assert_eq!(
            body["start"],
            json!({"dateTime": "2018-09-26T14:30:00", "timeZone": "Europe/Moscow"})
        );
        assert_eq!(
            body["end"],
            json!({"dateTime": "2018-09-26T15:30:00", "timeZone": "Europe/Moscow"})
        );
    }
}
