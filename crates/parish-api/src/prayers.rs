use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use parish_db::StoreError;
use parish_db::models::NewPrayer;
use parish_types::api::{
    ModeratePrayerRequest, ModeratePrayerResponse, PrayerQuery, PrayersResponse,
    SubmitPrayerRequest, SubmitPrayerResponse, SupportPrayerRequest, SupportPrayerResponse,
};
use parish_types::models::PrayerCategory;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::guard;

/// Public: approved prayers, newest first. With `?pending=true` this is the
/// admin moderation queue instead, oldest first.
pub async fn list_prayers(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PrayerQuery>,
) -> Result<Json<PrayersResponse>, ApiError> {
    let rows = if query.pending {
        guard::require_admin(&state, &headers)?;
        state.db.pending_prayers()?
    } else {
        state.db.approved_prayers(query.limit.min(200))?
    };

    Ok(Json(PrayersResponse {
        prayers: rows.into_iter().map(|row| row.into_model()).collect(),
    }))
}

pub async fn submit_prayer(
    State(state): State<AppState>,
    Json(req): Json<SubmitPrayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = req.title.trim();
    let content = req.content.trim();
    let submitted_by = req.submitted_by.trim();

    if title.is_empty() || content.is_empty() || req.category.is_empty() || submitted_by.is_empty()
    {
        return Err(ApiError::validation(
            "Missing required fields: title, content, category, submitted_by",
        ));
    }

    let category = PrayerCategory::parse(&req.category).ok_or_else(|| {
        ApiError::validation(format!(
            "Invalid category. Must be one of: {}",
            PrayerCategory::ALL.map(|c| c.as_str()).join(", ")
        ))
    })?;

    let prayer_id = state.db.insert_prayer(&NewPrayer {
        title,
        content,
        category,
        submitted_by,
        email: req.email.as_deref().map(str::trim).filter(|e| !e.is_empty()),
        is_anonymous: req.is_anonymous,
    })?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitPrayerResponse {
            message: "Prayer request submitted successfully. It will be reviewed before appearing publicly."
                .into(),
            prayer_id,
        }),
    ))
}

pub async fn moderate_prayer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ModeratePrayerRequest>,
) -> Result<Json<ModeratePrayerResponse>, ApiError> {
    guard::require_admin(&state, &headers)?;

    let Some(prayer_id) = req.prayer_id else {
        return Err(ApiError::validation(
            "Missing required fields: prayer_id, action",
        ));
    };
    if req.action.is_empty() {
        return Err(ApiError::validation(
            "Missing required fields: prayer_id, action",
        ));
    }
    if req.action != "approve" {
        return Err(ApiError::validation("Invalid action"));
    }

    match state.db.approve_prayer(prayer_id) {
        Ok(_) => Ok(Json(ModeratePrayerResponse {
            message: "Prayer approved successfully".into(),
        })),
        Err(StoreError::NotFound) => Err(ApiError::not_found("Prayer not found")),
        Err(err) => Err(err.into()),
    }
}

pub async fn support_prayer(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<SupportPrayerRequest>,
) -> Result<Json<SupportPrayerResponse>, ApiError> {
    let Some(prayer_id) = req.prayer_id else {
        return Err(ApiError::validation("Missing required field: prayer_id"));
    };

    let supporter = guard::client_ip(&headers, &addr);

    match state.db.add_support(prayer_id, &supporter) {
        Ok(true) => Ok(Json(SupportPrayerResponse {
            message: "Thank you for praying! Your support has been recorded.".into(),
            prayer_id: Some(prayer_id),
            already_supported: false,
        })),
        Ok(false) => Ok(Json(SupportPrayerResponse {
            message: "You have already prayed for this request".into(),
            prayer_id: None,
            already_supported: true,
        })),
        Err(StoreError::NotFound) => Err(ApiError::not_found("Prayer not found")),
        Err(err) => Err(err.into()),
    }
}
