use parish_db::Database;
use parish_types::models::{Role, User};

use crate::AuthError;
use crate::password::{hash_password, verify_password};

pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: &'a str,
    pub phone: Option<&'a str>,
    pub role: Role,
}

/// The normalized form is the account key: trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn create_user(db: &Database, new: &NewUser) -> Result<i64, AuthError> {
    let email = normalize_email(new.email);
    let password_hash = hash_password(new.password)?;
    let id = db.insert_user(&email, new.name, &password_hash, new.phone, new.role)?;
    Ok(id)
}

/// None on unknown email, deactivated account, and wrong password alike —
/// callers cannot tell which check failed.
pub fn authenticate(db: &Database, email: &str, password: &str) -> Result<Option<User>, AuthError> {
    let row = match db.user_by_email(&normalize_email(email))? {
        Some(row) => row,
        None => return Ok(None),
    };
    if !verify_password(password, &row.password_hash) {
        return Ok(None);
    }
    Ok(Some(row.into_model()))
}

pub fn get_by_email(db: &Database, email: &str) -> Result<Option<User>, AuthError> {
    Ok(db
        .user_by_email(&normalize_email(email))?
        .map(|row| row.into_model()))
}

pub fn get_by_id(db: &Database, id: i64) -> Result<Option<User>, AuthError> {
    Ok(db.user_by_id(id)?.map(|row| row.into_model()))
}
