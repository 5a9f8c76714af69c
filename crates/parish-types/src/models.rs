use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Roles --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Role::Member),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

// -- JWT Claims --

/// JWT claims shared across parish-auth (token issue/verify) and parish-api
/// (access guard). Canonical definition lives here in parish-types to
/// eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// -- Category enums --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerCategory {
    Health,
    Family,
    Guidance,
    Thanksgiving,
    General,
}

impl PrayerCategory {
    pub const ALL: [PrayerCategory; 5] = [
        PrayerCategory::Health,
        PrayerCategory::Family,
        PrayerCategory::Guidance,
        PrayerCategory::Thanksgiving,
        PrayerCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerCategory::Health => "health",
            PrayerCategory::Family => "family",
            PrayerCategory::Guidance => "guidance",
            PrayerCategory::Thanksgiving => "thanksgiving",
            PrayerCategory::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Retreat,
    PrayerMeeting,
    Outreach,
    Fellowship,
    Service,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Retreat,
        EventType::PrayerMeeting,
        EventType::Outreach,
        EventType::Fellowship,
        EventType::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Retreat => "retreat",
            EventType::PrayerMeeting => "prayer-meeting",
            EventType::Outreach => "outreach",
            EventType::Fellowship => "fellowship",
            EventType::Service => "service",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflectionCategory {
    Daily,
    Youth,
    Meditation,
    Scripture,
    Inspiration,
    Teaching,
}

impl ReflectionCategory {
    pub const ALL: [ReflectionCategory; 6] = [
        ReflectionCategory::Daily,
        ReflectionCategory::Youth,
        ReflectionCategory::Meditation,
        ReflectionCategory::Scripture,
        ReflectionCategory::Inspiration,
        ReflectionCategory::Teaching,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReflectionCategory::Daily => "daily",
            ReflectionCategory::Youth => "youth",
            ReflectionCategory::Meditation => "meditation",
            ReflectionCategory::Scripture => "scripture",
            ReflectionCategory::Inspiration => "inspiration",
            ReflectionCategory::Teaching => "teaching",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

// -- Domain models --

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub join_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prayer {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: PrayerCategory,
    pub submitted_by: String,
    pub email: Option<String>,
    pub support_count: i64,
    pub is_approved: bool,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: String,
    pub time: String,
    pub location: String,
    pub contact_info: Option<String>,
    pub registration_required: bool,
    pub max_participants: Option<i64>,
    pub current_participants: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reflection {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub scripture_reference: Option<String>,
    pub category: ReflectionCategory,
    pub author: String,
    pub is_daily: bool,
    pub publish_date: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub interests: Option<String>,
    pub volunteer_areas: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

/// Parse a timestamp column. SQLite's CURRENT_TIMESTAMP stores
/// "YYYY-MM-DD HH:MM:SS" without a timezone, so fall back to parsing as
/// naive UTC when the RFC 3339 parse fails.
pub fn parse_db_timestamp(s: &str) -> Option<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_rejects_unknown() {
        assert_eq!(PrayerCategory::parse("health"), Some(PrayerCategory::Health));
        assert_eq!(PrayerCategory::parse("unknown"), None);
        assert_eq!(PrayerCategory::parse("Health"), None);
    }

    #[test]
    fn event_type_uses_kebab_case() {
        assert_eq!(EventType::PrayerMeeting.as_str(), "prayer-meeting");
        assert_eq!(EventType::parse("prayer-meeting"), Some(EventType::PrayerMeeting));
    }

    #[test]
    fn sqlite_timestamps_parse_without_timezone() {
        let ts = parse_db_timestamp("2026-08-07 12:30:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-08-07T12:30:00+00:00");
        assert!(parse_db_timestamp("2026-08-07T12:30:00Z").is_some());
        assert!(parse_db_timestamp("not a date").is_none());
    }
}
