use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use parish_db::models::NewReflection;
use parish_types::api::{
    CreateReflectionRequest, CreateReflectionResponse, DailyReflectionResponse, ReflectionQuery,
    ReflectionsResponse,
};
use parish_types::models::ReflectionCategory;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::guard;
use crate::validate::is_valid_date;

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Public: published reflections, newest publish date first. With
/// `?daily=true`, today's daily reflection (possibly absent) instead.
pub async fn list_reflections(
    State(state): State<AppState>,
    Query(query): Query<ReflectionQuery>,
) -> Result<Response, ApiError> {
    if query.daily {
        let row = state.db.daily_reflection(&today())?;
        return Ok(Json(DailyReflectionResponse {
            reflection: row.map(|r| r.into_model()),
        })
        .into_response());
    }

    let rows = state.db.published_reflections(query.limit.min(100))?;
    Ok(Json(ReflectionsResponse {
        reflections: rows.into_iter().map(|row| row.into_model()).collect(),
    })
    .into_response())
}

pub async fn create_reflection(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateReflectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = guard::require_admin(&state, &headers)?;

    let title = req.title.trim();
    let content = req.content.trim();

    if title.is_empty() || content.is_empty() || req.category.is_empty() {
        return Err(ApiError::validation(
            "Missing required fields: title, content, category",
        ));
    }

    let category = ReflectionCategory::parse(&req.category).ok_or_else(|| {
        ApiError::validation(format!(
            "Invalid category. Must be one of: {}",
            ReflectionCategory::ALL.map(|c| c.as_str()).join(", ")
        ))
    })?;

    let publish_date = req.publish_date.unwrap_or_else(today);
    if !is_valid_date(&publish_date) {
        return Err(ApiError::validation(
            "Invalid publish_date format. Use YYYY-MM-DD",
        ));
    }

    let reflection_id = state.db.insert_reflection(&NewReflection {
        title,
        content,
        scripture_reference: req
            .scripture_reference
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty()),
        category,
        author: &claims.name,
        is_daily: req.is_daily,
        publish_date: &publish_date,
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReflectionResponse {
            message: "Reflection created successfully".into(),
            reflection_id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{test_state, test_token};
    use axum::http::{HeaderValue, header};
    use http_body_util::BodyExt;
    use parish_types::models::Role;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    fn reflection_req() -> CreateReflectionRequest {
        CreateReflectionRequest {
            title: "On patience".into(),
            content: "A short meditation.".into(),
            scripture_reference: Some("James 1:4".into()),
            category: "meditation".into(),
            is_daily: true,
            publish_date: None,
        }
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn author_comes_from_admin_claims() {
        let state = test_state();
        let admin = test_token(&state, Role::Admin);

        create_reflection(State(state.clone()), bearer(&admin), Json(reflection_req()))
            .await
            .unwrap();

        let resp = list_reflections(
            State(state),
            Query(ReflectionQuery { limit: 20, daily: false }),
        )
        .await
        .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["reflections"][0]["author"], "Test User");
    }

    #[tokio::test]
    async fn daily_lookup_defaults_to_today() {
        let state = test_state();
        let admin = test_token(&state, Role::Admin);

        // publish_date defaults to today, so the daily lookup finds it.
        create_reflection(State(state.clone()), bearer(&admin), Json(reflection_req()))
            .await
            .unwrap();

        let resp = list_reflections(
            State(state),
            Query(ReflectionQuery { limit: 20, daily: true }),
        )
        .await
        .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["reflection"]["title"], "On patience");
    }

    #[tokio::test]
    async fn unknown_category_rejected() {
        let state = test_state();
        let admin = test_token(&state, Role::Admin);

        let err = create_reflection(
            State(state),
            bearer(&admin),
            Json(CreateReflectionRequest {
                category: "sermon".into(),
                ..reflection_req()
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
