use crate::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            email           TEXT NOT NULL UNIQUE,
            name            TEXT NOT NULL,
            password_hash   TEXT NOT NULL,
            role            TEXT NOT NULL DEFAULT 'member',
            phone           TEXT,
            join_date       DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            is_active       INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS user_sessions (
            id          TEXT PRIMARY KEY,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            expires_at  DATETIME NOT NULL,
            created_at  DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_user
            ON user_sessions(user_id);

        CREATE TABLE IF NOT EXISTS prayers (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            title           TEXT NOT NULL,
            content         TEXT NOT NULL,
            category        TEXT NOT NULL,
            submitted_by    TEXT NOT NULL,
            email           TEXT,
            support_count   INTEGER NOT NULL DEFAULT 0,
            is_approved     INTEGER NOT NULL DEFAULT 0,
            is_anonymous    INTEGER NOT NULL DEFAULT 0,
            created_at      DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            approved_at     DATETIME
        );

        CREATE INDEX IF NOT EXISTS idx_prayers_status
            ON prayers(is_approved, created_at);

        CREATE TABLE IF NOT EXISTS prayer_support (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            prayer_id       INTEGER NOT NULL REFERENCES prayers(id),
            supporter_ip    TEXT NOT NULL,
            supported_at    DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(prayer_id, supporter_ip)
        );

        CREATE INDEX IF NOT EXISTS idx_support_prayer
            ON prayer_support(prayer_id);

        CREATE TABLE IF NOT EXISTS events (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            title                   TEXT NOT NULL,
            description             TEXT NOT NULL,
            event_type              TEXT NOT NULL,
            date                    TEXT NOT NULL,
            time                    TEXT NOT NULL,
            location                TEXT NOT NULL,
            contact_info            TEXT,
            registration_required   INTEGER NOT NULL DEFAULT 0,
            max_participants        INTEGER,
            current_participants    INTEGER NOT NULL DEFAULT 0,
            created_by              TEXT NOT NULL,
            created_at              DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            is_active               INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_events_date
            ON events(date);

        CREATE TABLE IF NOT EXISTS event_registrations (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id        INTEGER NOT NULL REFERENCES events(id),
            name            TEXT NOT NULL,
            email           TEXT NOT NULL,
            phone           TEXT,
            message         TEXT,
            registered_at   DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(event_id, email)
        );

        CREATE TABLE IF NOT EXISTS reflections (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            title                   TEXT NOT NULL,
            content                 TEXT NOT NULL,
            scripture_reference     TEXT,
            category                TEXT NOT NULL,
            author                  TEXT NOT NULL,
            is_daily                INTEGER NOT NULL DEFAULT 0,
            publish_date            TEXT NOT NULL,
            created_at              DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            is_published            INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_reflections_publish
            ON reflections(publish_date);

        CREATE TABLE IF NOT EXISTS join_requests (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            phone           TEXT,
            age             INTEGER,
            interests       TEXT,
            volunteer_areas TEXT,
            message         TEXT,
            status          TEXT NOT NULL DEFAULT 'pending',
            submitted_at    DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
