//! Database row types — these map directly to SQLite rows.
//! Distinct from the parish-types domain models to keep the storage layer
//! independent; `into_model` converts at the boundary.

use chrono::{DateTime, Utc};
use tracing::warn;

use parish_types::models::{
    Event, EventType, JoinRequest, Prayer, PrayerCategory, Reflection, ReflectionCategory, Role,
    User, parse_db_timestamp,
};

pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub join_date: String,
    pub is_active: bool,
}

impl UserRow {
    pub fn into_model(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: Role::parse(&self.role).unwrap_or_else(|| {
                warn!("Corrupt role '{}' on user {}", self.role, self.id);
                Role::Member
            }),
            phone: self.phone,
            join_date: timestamp_or_default(&self.join_date, "users.join_date", self.id),
        }
    }
}

pub struct SessionRow {
    pub id: String,
    pub user_id: i64,
    pub expires_at: String,
    pub created_at: String,
}

pub struct PrayerRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub submitted_by: String,
    pub email: Option<String>,
    pub support_count: i64,
    pub is_approved: bool,
    pub is_anonymous: bool,
    pub created_at: String,
    pub approved_at: Option<String>,
}

impl PrayerRow {
    pub fn into_model(self) -> Prayer {
        Prayer {
            id: self.id,
            title: self.title,
            content: self.content,
            category: PrayerCategory::parse(&self.category).unwrap_or_else(|| {
                warn!("Corrupt category '{}' on prayer {}", self.category, self.id);
                PrayerCategory::General
            }),
            submitted_by: self.submitted_by,
            email: self.email,
            support_count: self.support_count,
            is_approved: self.is_approved,
            is_anonymous: self.is_anonymous,
            created_at: timestamp_or_default(&self.created_at, "prayers.created_at", self.id),
            approved_at: self.approved_at.as_deref().and_then(parse_db_timestamp),
        }
    }
}

pub struct EventRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub contact_info: Option<String>,
    pub registration_required: bool,
    pub max_participants: Option<i64>,
    pub current_participants: i64,
    pub created_by: String,
    pub created_at: String,
}

impl EventRow {
    pub fn into_model(self) -> Event {
        Event {
            id: self.id,
            title: self.title,
            description: self.description,
            event_type: EventType::parse(&self.event_type).unwrap_or_else(|| {
                warn!("Corrupt event_type '{}' on event {}", self.event_type, self.id);
                EventType::Fellowship
            }),
            date: self.date,
            time: self.time,
            location: self.location,
            contact_info: self.contact_info,
            registration_required: self.registration_required,
            max_participants: self.max_participants,
            current_participants: self.current_participants,
            created_by: self.created_by,
            created_at: timestamp_or_default(&self.created_at, "events.created_at", self.id),
        }
    }
}

pub struct ReflectionRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub scripture_reference: Option<String>,
    pub category: String,
    pub author: String,
    pub is_daily: bool,
    pub publish_date: String,
    pub created_at: String,
}

impl ReflectionRow {
    pub fn into_model(self) -> Reflection {
        Reflection {
            id: self.id,
            title: self.title,
            content: self.content,
            scripture_reference: self.scripture_reference,
            category: ReflectionCategory::parse(&self.category).unwrap_or_else(|| {
                warn!("Corrupt category '{}' on reflection {}", self.category, self.id);
                ReflectionCategory::Inspiration
            }),
            author: self.author,
            is_daily: self.is_daily,
            publish_date: self.publish_date,
            created_at: timestamp_or_default(&self.created_at, "reflections.created_at", self.id),
        }
    }
}

pub struct JoinRequestRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub interests: Option<String>,
    pub volunteer_areas: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub submitted_at: String,
}

impl JoinRequestRow {
    pub fn into_model(self) -> JoinRequest {
        JoinRequest {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            age: self.age,
            interests: self.interests,
            volunteer_areas: self.volunteer_areas,
            message: self.message,
            status: self.status,
            submitted_at: timestamp_or_default(&self.submitted_at, "join_requests.submitted_at", self.id),
        }
    }
}

// -- Typed insert inputs --

pub struct NewPrayer<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub category: PrayerCategory,
    pub submitted_by: &'a str,
    pub email: Option<&'a str>,
    pub is_anonymous: bool,
}

pub struct NewEvent<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub event_type: EventType,
    pub date: &'a str,
    pub time: &'a str,
    pub location: &'a str,
    pub contact_info: Option<&'a str>,
    pub registration_required: bool,
    pub max_participants: Option<i64>,
    pub created_by: &'a str,
}

pub struct NewRegistration<'a> {
    pub event_id: i64,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub message: Option<&'a str>,
}

pub struct NewReflection<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub scripture_reference: Option<&'a str>,
    pub category: ReflectionCategory,
    pub author: &'a str,
    pub is_daily: bool,
    pub publish_date: &'a str,
}

pub struct NewJoinRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub age: Option<i64>,
    pub interests: Option<&'a str>,
    pub volunteer_areas: Option<&'a str>,
    pub message: Option<&'a str>,
}

/// Outcome of an approve: the conditional update either flips the row or
/// finds it already approved. Re-approval is a no-op success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproveOutcome {
    Approved,
    AlreadyApproved,
}

fn timestamp_or_default(raw: &str, column: &str, id: i64) -> DateTime<Utc> {
    parse_db_timestamp(raw).unwrap_or_else(|| {
        warn!("Corrupt {} '{}' on row {}", column, raw, id);
        DateTime::default()
    })
}
