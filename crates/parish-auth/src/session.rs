use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};

use parish_db::Database;
use parish_db::models::SessionRow;

use crate::AuthError;

pub const SESSION_TTL_DAYS: i64 = 7;

/// 32 bytes from the OS CSPRNG, hex-encoded: 256 bits of entropy.
fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn create_session(db: &Database, user_id: i64) -> Result<String, AuthError> {
    let id = generate_session_id();
    // Stored in SQLite's datetime('now') format so the expiry comparison
    // stays in one textual representation.
    let expires_at = (Utc::now() + Duration::days(SESSION_TTL_DAYS))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    db.insert_session(&id, user_id, &expires_at)?;
    Ok(id)
}

/// Expired sessions are reported as absent, not specially.
pub fn get_session(db: &Database, id: &str) -> Result<Option<SessionRow>, AuthError> {
    Ok(db.session_by_id(id)?)
}

/// Returns whether a session row existed.
pub fn delete_session(db: &Database, id: &str) -> Result<bool, AuthError> {
    Ok(db.delete_session(id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parish_types::models::Role;

    fn db_with_user() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .insert_user("ann@example.com", "Ann", "x", None, Role::Member)
            .unwrap();
        (db, user)
    }

    #[test]
    fn create_get_roundtrip() {
        let (db, user) = db_with_user();
        let id = create_session(&db, user).unwrap();

        let session = get_session(&db, &id).unwrap().unwrap();
        assert_eq!(session.user_id, user);
        assert_eq!(session.id, id);
    }

    #[test]
    fn ids_are_long_and_unique() {
        let (db, user) = db_with_user();
        let a = create_session(&db, user).unwrap();
        let b = create_session(&db, user).unwrap();

        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn delete_reports_prior_existence() {
        let (db, user) = db_with_user();
        let id = create_session(&db, user).unwrap();

        assert!(delete_session(&db, &id).unwrap());
        assert!(!delete_session(&db, &id).unwrap());
        assert!(get_session(&db, &id).unwrap().is_none());
    }
}
