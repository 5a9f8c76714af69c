use serde::{Deserialize, Serialize};

use crate::models::{Event, JoinRequest, Prayer, Reflection, Role};

// Required string fields default to empty so a missing field and an empty
// one take the same validation path in the handler (400, not a 422 from
// the extractor).

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
    pub token: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogoutRequest {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

// -- Prayers --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitPrayerRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub submitted_by: String,
    pub email: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitPrayerResponse {
    pub message: String,
    pub prayer_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PrayerQuery {
    #[serde(default = "default_prayer_limit")]
    pub limit: u32,
    #[serde(default)]
    pub pending: bool,
}

fn default_prayer_limit() -> u32 {
    50
}

#[derive(Debug, Serialize)]
pub struct PrayersResponse {
    pub prayers: Vec<Prayer>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeratePrayerRequest {
    pub prayer_id: Option<i64>,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct ModeratePrayerResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupportPrayerRequest {
    pub prayer_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SupportPrayerResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prayer_id: Option<i64>,
    pub already_supported: bool,
}

// -- Events --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    pub contact_info: Option<String>,
    #[serde(default)]
    pub registration_required: bool,
    pub max_participants: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    pub message: String,
    pub event_id: i64,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterEventRequest {
    pub event_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterEventResponse {
    pub message: String,
    pub registration_id: i64,
}

// -- Reflections --

#[derive(Debug, Deserialize)]
pub struct ReflectionQuery {
    #[serde(default = "default_reflection_limit")]
    pub limit: u32,
    #[serde(default)]
    pub daily: bool,
}

fn default_reflection_limit() -> u32 {
    20
}

#[derive(Debug, Serialize)]
pub struct ReflectionsResponse {
    pub reflections: Vec<Reflection>,
}

#[derive(Debug, Serialize)]
pub struct DailyReflectionResponse {
    pub reflection: Option<Reflection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReflectionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub scripture_reference: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_daily: bool,
    pub publish_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateReflectionResponse {
    pub message: String,
    pub reflection_id: i64,
}

// -- Join requests --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateJoinRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub interests: Option<String>,
    pub volunteer_areas: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateJoinResponse {
    pub message: String,
    pub request_id: i64,
}

#[derive(Debug, Serialize)]
pub struct JoinRequestsResponse {
    pub join_requests: Vec<JoinRequest>,
}
