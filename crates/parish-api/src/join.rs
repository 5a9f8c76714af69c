use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use parish_db::StoreError;
use parish_db::models::NewJoinRequest;
use parish_types::api::{CreateJoinRequest, CreateJoinResponse, JoinRequestsResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::guard;
use crate::validate::is_valid_email;

pub async fn create_join_request(
    State(state): State<AppState>,
    Json(req): Json<CreateJoinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() {
        return Err(ApiError::validation("Missing required fields: name, email"));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email format"));
    }
    if let Some(age) = req.age {
        if !(13..=120).contains(&age) {
            return Err(ApiError::validation("Age must be between 13 and 120"));
        }
    }

    let request = NewJoinRequest {
        name,
        email: &email,
        phone: req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()),
        age: req.age,
        interests: req
            .interests
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty()),
        volunteer_areas: req
            .volunteer_areas
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty()),
        message: req
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty()),
    };

    match state.db.insert_join_request(&request) {
        Ok(request_id) => Ok((
            StatusCode::CREATED,
            Json(CreateJoinResponse {
                message: "Thank you for your interest in joining! We will contact you soon."
                    .into(),
                request_id,
            }),
        )),
        Err(StoreError::Duplicate) => Err(ApiError::duplicate(
            "A request with this email address already exists",
        )),
        Err(err) => Err(err.into()),
    }
}

pub async fn list_join_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<JoinRequestsResponse>, ApiError> {
    guard::require_admin(&state, &headers)?;

    let rows = state.db.pending_join_requests()?;
    Ok(Json(JoinRequestsResponse {
        join_requests: rows.into_iter().map(|row| row.into_model()).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{test_state, test_token};
    use axum::http::{HeaderValue, header};
    use parish_types::models::Role;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    fn join_req(email: &str) -> CreateJoinRequest {
        CreateJoinRequest {
            name: "Cara".into(),
            email: email.into(),
            phone: None,
            age: Some(24),
            interests: Some("music".into()),
            volunteer_areas: None,
            message: None,
        }
    }

    #[tokio::test]
    async fn submit_then_admin_sees_pending() {
        let state = test_state();
        let admin = test_token(&state, Role::Admin);

        create_join_request(State(state.clone()), Json(join_req("Cara@Example.com")))
            .await
            .unwrap();

        let list = list_join_requests(State(state.clone()), bearer(&admin))
            .await
            .unwrap();
        assert_eq!(list.0.join_requests.len(), 1);
        assert_eq!(list.0.join_requests[0].email, "cara@example.com");
        assert_eq!(list.0.join_requests[0].status, "pending");

        let unauthed = list_join_requests(State(state), HeaderMap::new())
            .await
            .err().unwrap();
        assert_eq!(unauthed.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn out_of_range_age_rejected() {
        let state = test_state();
        let err = create_join_request(
            State(state),
            Json(CreateJoinRequest {
                age: Some(12),
                ..join_req("cara@example.com")
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let state = test_state();
        create_join_request(State(state.clone()), Json(join_req("cara@example.com")))
            .await
            .unwrap();

        let err = create_join_request(State(state), Json(join_req("cara@example.com")))
            .await
            .err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
