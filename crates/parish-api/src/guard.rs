use std::net::SocketAddr;

use axum::http::{HeaderMap, header};

use parish_types::models::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

/// Resolve the request's bearer token to verified claims. None for a
/// missing header, a non-Bearer scheme, and a failed verification alike —
/// callers see a single undifferentiated denied path.
pub fn require_auth(state: &AppState, headers: &HeaderMap) -> Option<Claims> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    state.tokens.verify(token)
}

/// Authentication then the admin predicate. Privileged handlers call this
/// before touching anything.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let claims = require_auth(state, headers).ok_or(ApiError::Authorization)?;
    if !claims.is_admin() {
        return Err(ApiError::Authorization);
    }
    Ok(claims)
}

/// Supporter identity for the prayer-support dedup: first entry of
/// X-Forwarded-For when present, else the peer address.
pub fn client_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_state;
    use axum::http::HeaderValue;
    use parish_types::models::Role;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn missing_header_is_none() {
        let state = test_state();
        assert!(require_auth(&state, &HeaderMap::new()).is_none());
    }

    #[test]
    fn non_bearer_scheme_is_none() {
        let state = test_state();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert!(require_auth(&state, &headers).is_none());
    }

    #[test]
    fn garbage_token_is_none() {
        let state = test_state();
        assert!(require_auth(&state, &bearer("garbage")).is_none());
    }

    #[test]
    fn member_token_passes_auth_but_not_admin() {
        let state = test_state();
        let token = crate::auth::test_token(&state, Role::Member);

        let claims = require_auth(&state, &bearer(&token)).unwrap();
        assert!(!claims.is_admin());
        assert!(require_admin(&state, &bearer(&token)).is_err());
    }

    #[test]
    fn admin_token_passes_both() {
        let state = test_state();
        let token = crate::auth::test_token(&state, Role::Admin);

        let claims = require_admin(&state, &bearer(&token)).unwrap();
        assert!(claims.is_admin());
    }

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let addr: SocketAddr = "192.0.2.1:443".parse().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, &addr), "203.0.113.9");

        assert_eq!(client_ip(&HeaderMap::new(), &addr), "192.0.2.1");
    }
}
