use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use parish_auth::session;
use parish_auth::token::TokenKeys;
use parish_auth::users::{self, NewUser};
use parish_db::Database;
use parish_types::api::{
    LoginRequest, LoginResponse, LogoutRequest, LogoutResponse, RegisterRequest,
    RegisterResponse, UserSummary,
};
use parish_types::models::Role;

use crate::error::ApiError;
use crate::guard;
use crate::validate::is_valid_email;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenKeys,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    let email = req.email.trim();

    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation(
            "Missing required fields: name, email, password",
        ));
    }
    if !is_valid_email(email) {
        return Err(ApiError::validation("Invalid email format"));
    }
    if req.password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters long",
        ));
    }

    let user_id = users::create_user(
        &state.db,
        &NewUser {
            email,
            name,
            password: &req.password,
            phone: req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()),
            role: Role::Member,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful! You can now log in.".into(),
            user_id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::validation(
            "Missing required fields: email, password",
        ));
    }

    let user = users::authenticate(&state.db, &req.email, &req.password)?
        .ok_or(ApiError::Authentication)?;

    let token = state.tokens.issue(&user)?;
    let session_id = session::create_session(&state.db, user.id)?;

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        user: UserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
        token,
        session_id,
    }))
}

/// Removes the server-side session record. The bearer token itself stays
/// valid until its embedded expiry; the registry and the token are
/// deliberately independent.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LogoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    guard::require_auth(&state, &headers).ok_or(ApiError::Authorization)?;

    if req.session_id.is_empty() {
        return Err(ApiError::validation("Missing required fields: session_id"));
    }

    session::delete_session(&state.db, &req.session_id)?;

    Ok(Json(LogoutResponse {
        message: "Logout successful".into(),
    }))
}

#[cfg(test)]
pub fn test_state() -> AppState {
    Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        tokens: TokenKeys::new(b"test-secret"),
    })
}

/// Registers a throwaway user with the given role and returns a signed
/// token for it.
#[cfg(test)]
pub fn test_token(state: &AppState, role: Role) -> String {
    let email = match role {
        Role::Admin => "test-admin@example.com",
        Role::Member => "test-member@example.com",
    };
    let id = users::create_user(
        &state.db,
        &NewUser {
            email,
            name: "Test User",
            password: "hunter22",
            phone: None,
            role,
        },
    )
    .unwrap();
    let user = users::get_by_id(&state.db, id).unwrap().unwrap();
    state.tokens.issue(&user).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::Response;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_req(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ann".into(),
            email: email.into(),
            password: "hunter22".into(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let state = test_state();

        let resp = register(State(state.clone()), Json(register_req("Ann@Example.com")))
            .await
            .unwrap()
            .into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert!(body["user_id"].as_i64().unwrap() > 0);

        // Stored lowercased; login with any casing.
        let resp = login(
            State(state),
            Json(LoginRequest {
                email: "ann@example.com".into(),
                password: "hunter22".into(),
            }),
        )
        .await
        .unwrap()
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["user"]["email"], "ann@example.com");
        assert_eq!(body["user"]["role"], "member");
        assert!(body["token"].as_str().unwrap().contains('.'));
        assert_eq!(body["session_id"].as_str().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let state = test_state();
        register(State(state.clone()), Json(register_req("a@b.com")))
            .await
            .unwrap();

        let err = register(State(state), Json(register_req("A@B.COM")))
            .await
            .err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let state = test_state();
        register(State(state.clone()), Json(register_req("a@b.com")))
            .await
            .unwrap();

        let wrong_password = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "a@b.com".into(),
                password: "wrong-password".into(),
            }),
        )
        .await
        .err().unwrap()
        .into_response();
        let unknown_email = login(
            State(state),
            Json(LoginRequest {
                email: "nobody@b.com".into(),
                password: "hunter22".into(),
            }),
        )
        .await
        .err().unwrap()
        .into_response();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(wrong_password).await,
            body_json(unknown_email).await
        );
    }

    #[tokio::test]
    async fn register_validation() {
        let state = test_state();

        let bad_email = register(
            State(state.clone()),
            Json(register_req("not-an-email")),
        )
        .await
        .err().unwrap();
        assert_eq!(bad_email.into_response().status(), StatusCode::BAD_REQUEST);

        let short_password = register(
            State(state.clone()),
            Json(RegisterRequest {
                password: "12345".into(),
                ..register_req("a@b.com")
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(short_password.into_response().status(), StatusCode::BAD_REQUEST);

        let missing_name = register(
            State(state),
            Json(RegisterRequest {
                name: "".into(),
                ..register_req("a@b.com")
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(missing_name.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logout_deletes_session_but_requires_auth() {
        let state = test_state();
        register(State(state.clone()), Json(register_req("a@b.com")))
            .await
            .unwrap();
        let resp = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "a@b.com".into(),
                password: "hunter22".into(),
            }),
        )
        .await
        .unwrap()
        .into_response();
        let body = body_json(resp).await;
        let token = body["token"].as_str().unwrap().to_string();
        let session_id = body["session_id"].as_str().unwrap().to_string();

        // No bearer token: rejected, session untouched.
        let err = logout(
            State(state.clone()),
            HeaderMap::new(),
            Json(LogoutRequest {
                session_id: session_id.clone(),
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        assert!(session::get_session(&state.db, &session_id).unwrap().is_some());

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        logout(
            State(state.clone()),
            headers,
            Json(LogoutRequest {
                session_id: session_id.clone(),
            }),
        )
        .await
        .unwrap();
        assert!(session::get_session(&state.db, &session_id).unwrap().is_none());
    }
}
