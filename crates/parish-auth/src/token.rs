use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use parish_types::models::{Claims, User};

use crate::AuthError;

const TOKEN_TTL_DAYS: i64 = 7;

/// Pre-built signing keys, constructed once at startup from the server
/// secret and shared through application state.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign the user's identity claims with a fixed 7-day expiry.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// None on a malformed token, a signature mismatch, or an embedded
    /// expiry in the past. Token failure is an ordinary denied path for
    /// callers, never an exception.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}
