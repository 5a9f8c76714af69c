pub mod password;
pub mod session;
pub mod token;
pub mod users;

use parish_db::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("credential hashing failed")]
    Hashing,
    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        }
    }
}
