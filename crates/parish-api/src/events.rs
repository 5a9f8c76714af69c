use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use parish_db::StoreError;
use parish_db::models::{NewEvent, NewRegistration};
use parish_types::api::{
    CreateEventRequest, CreateEventResponse, EventsResponse, RegisterEventRequest,
    RegisterEventResponse,
};
use parish_types::models::EventType;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::guard;
use crate::validate::{is_valid_date, is_valid_email, is_valid_time};

pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<EventsResponse>, ApiError> {
    let rows = state.db.upcoming_events()?;
    Ok(Json(EventsResponse {
        events: rows.into_iter().map(|row| row.into_model()).collect(),
    }))
}

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = guard::require_admin(&state, &headers)?;

    let title = req.title.trim();
    let description = req.description.trim();
    let location = req.location.trim();

    if title.is_empty()
        || description.is_empty()
        || req.event_type.is_empty()
        || req.date.is_empty()
        || req.time.is_empty()
        || location.is_empty()
    {
        return Err(ApiError::validation(
            "Missing required fields: title, description, event_type, date, time, location",
        ));
    }

    let event_type = EventType::parse(&req.event_type).ok_or_else(|| {
        ApiError::validation(format!(
            "Invalid event_type. Must be one of: {}",
            EventType::ALL.map(|t| t.as_str()).join(", ")
        ))
    })?;
    if !is_valid_date(&req.date) {
        return Err(ApiError::validation("Invalid date format. Use YYYY-MM-DD"));
    }
    if !is_valid_time(&req.time) {
        return Err(ApiError::validation(
            "Invalid time format. Use HH:MM (24-hour format)",
        ));
    }

    let event_id = state.db.insert_event(&NewEvent {
        title,
        description,
        event_type,
        date: &req.date,
        time: &req.time,
        location,
        contact_info: req
            .contact_info
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty()),
        registration_required: req.registration_required,
        max_participants: req.max_participants,
        created_by: &claims.email,
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            message: "Event created successfully".into(),
            event_id,
        }),
    ))
}

pub async fn register_event(
    State(state): State<AppState>,
    Json(req): Json<RegisterEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(event_id) = req.event_id else {
        return Err(ApiError::validation(
            "Missing required fields: event_id, name, email",
        ));
    };
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() {
        return Err(ApiError::validation(
            "Missing required fields: event_id, name, email",
        ));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email format"));
    }

    let registration = NewRegistration {
        event_id,
        name,
        email: &email,
        phone: req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()),
        message: req
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty()),
    };

    match state.db.insert_registration(&registration) {
        Ok(registration_id) => Ok((
            StatusCode::CREATED,
            Json(RegisterEventResponse {
                message: "Registration successful! You will receive a confirmation email shortly."
                    .into(),
                registration_id,
            }),
        )),
        Err(StoreError::Duplicate) => Err(ApiError::duplicate(
            "You have already registered for this event",
        )),
        Err(StoreError::NotFound) => Err(ApiError::not_found("Event not found")),
        Err(err) => Err(err.into()),
    }
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

    fn event_req() -> CreateEventRequest {
        CreateEventRequest {
            title: "Spring Retreat".into(),
            description: "A weekend away.".into(),
            event_type: "retreat".into(),
            date: "2999-05-01".into(),
            time: "09:00".into(),
            location: "Hill House".into(),
            contact_info: None,
            registration_required: true,
            max_participants: Some(40),
        }
    }

    #[tokio::test]
    async fn create_and_list() {
        let state = test_state();
        let admin = test_token(&state, Role::Admin);

        create_event(State(state.clone()), bearer(&admin), Json(event_req()))
            .await
            .unwrap();

        let events = list_events(State(state)).await.unwrap();
        assert_eq!(events.0.events.len(), 1);
        assert_eq!(events.0.events[0].created_by, "test-admin@example.com");
    }

    #[tokio::test]
    async fn creation_is_admin_only() {
        let state = test_state();
        let member = test_token(&state, Role::Member);

        let err = create_event(State(state), bearer(&member), Json(event_req()))
            .await
            .err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_date_and_type_rejected() {
        let state = test_state();
        let admin = test_token(&state, Role::Admin);

        let bad_type = create_event(
            State(state.clone()),
            bearer(&admin),
            Json(CreateEventRequest {
                event_type: "party".into(),
                ..event_req()
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(bad_type.into_response().status(), StatusCode::BAD_REQUEST);

        let bad_date = create_event(
            State(state),
            bearer(&admin),
            Json(CreateEventRequest {
                date: "05/01/2999".into(),
                ..event_req()
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(bad_date.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let state = test_state();
        let admin = test_token(&state, Role::Admin);
        create_event(State(state.clone()), bearer(&admin), Json(event_req()))
            .await
            .unwrap();

        let reg = RegisterEventRequest {
            event_id: Some(1),
            name: "Ben".into(),
            email: "Ben@Example.com".into(),
            phone: None,
            message: None,
        };
        register_event(State(state.clone()), Json(reg)).await.unwrap();

        let again = RegisterEventRequest {
            event_id: Some(1),
            name: "Ben".into(),
            email: "ben@example.com".into(),
            phone: None,
            message: None,
        };
        let err = register_event(State(state), Json(again)).await.err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
