use crate::models::{
    ApproveOutcome, EventRow, JoinRequestRow, NewEvent, NewJoinRequest, NewPrayer,
    NewRegistration, NewReflection, PrayerRow, ReflectionRow, SessionRow, UserRow,
};
use crate::{Database, Result, StoreError};
use parish_types::models::Role;
use rusqlite::{Connection, params};

impl Database {
    // -- Users --

    pub fn insert_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        phone: Option<&str>,
        role: Role,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (email, name, password_hash, phone, role) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![email, name, password_hash, phone, role.as_str()],
            )
            .map_err(duplicate_or_sqlite)?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Active users only; callers never see rows for deactivated accounts.
    pub fn user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, name, password_hash, role, phone, join_date, is_active
                 FROM users WHERE email = ?1 AND is_active = 1",
            )?;
            stmt.query_row([email], map_user).optional()
        })
    }

    pub fn user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, name, password_hash, role, phone, join_date, is_active
                 FROM users WHERE id = ?1 AND is_active = 1",
            )?;
            stmt.query_row([id], map_user).optional()
        })
    }

    // -- Sessions --

    pub fn insert_session(&self, id: &str, user_id: i64, expires_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO user_sessions (id, user_id, expires_at) VALUES (?1, ?2, ?3)",
                params![id, user_id, expires_at],
            )?;
            Ok(())
        })
    }

    /// Expired sessions read as absent; rows are reaped lazily, never swept.
    pub fn session_by_id(&self, id: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, expires_at, created_at
                 FROM user_sessions WHERE id = ?1 AND expires_at > datetime('now')",
            )?;
            stmt.query_row([id], |row| {
                Ok(SessionRow {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    expires_at: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .optional()
        })
    }

    pub fn delete_session(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM user_sessions WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Prayers --

    pub fn insert_prayer(&self, prayer: &NewPrayer) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO prayers (title, content, category, submitted_by, email, is_anonymous)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    prayer.title,
                    prayer.content,
                    prayer.category.as_str(),
                    prayer.submitted_by,
                    prayer.email,
                    prayer.is_anonymous,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn prayer_by_id(&self, id: i64) -> Result<Option<PrayerRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRAYER_COLUMNS} FROM prayers WHERE id = ?1"
            ))?;
            stmt.query_row([id], map_prayer).optional()
        })
    }

    pub fn approved_prayers(&self, limit: u32) -> Result<Vec<PrayerRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRAYER_COLUMNS} FROM prayers
                 WHERE is_approved = 1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1"
            ))?;
            let rows = stmt
                .query_map([limit], map_prayer)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Oldest-first: the moderation queue is FIFO so early submissions are
    /// not starved behind newer ones.
    pub fn pending_prayers(&self) -> Result<Vec<PrayerRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRAYER_COLUMNS} FROM prayers
                 WHERE is_approved = 0
                 ORDER BY created_at ASC, id ASC"
            ))?;
            let rows = stmt
                .query_map([], map_prayer)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// One-way pending -> approved transition. Re-approving an already
    /// approved prayer succeeds without touching approved_at.
    pub fn approve_prayer(&self, id: i64) -> Result<ApproveOutcome> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE prayers SET is_approved = 1, approved_at = CURRENT_TIMESTAMP
                 WHERE id = ?1 AND is_approved = 0",
                [id],
            )?;
            if changed > 0 {
                return Ok(ApproveOutcome::Approved);
            }
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM prayers WHERE id = ?1)",
                [id],
                |row| row.get(0),
            )?;
            if exists {
                Ok(ApproveOutcome::AlreadyApproved)
            } else {
                Err(StoreError::NotFound)
            }
        })
    }

    /// Returns whether the support was newly counted. The
    /// UNIQUE(prayer_id, supporter_ip) constraint is the dedup guard:
    /// OR IGNORE reports a repeat supporter as zero changed rows, and the
    /// count increment stays a single storage-level update.
    pub fn add_support(&self, prayer_id: i64, supporter_ip: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM prayers WHERE id = ?1)",
                [prayer_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(StoreError::NotFound);
            }

            let inserted = conn.execute(
                "INSERT OR IGNORE INTO prayer_support (prayer_id, supporter_ip) VALUES (?1, ?2)",
                params![prayer_id, supporter_ip],
            )?;
            if inserted == 0 {
                return Ok(false);
            }

            conn.execute(
                "UPDATE prayers SET support_count = support_count + 1 WHERE id = ?1",
                [prayer_id],
            )?;
            Ok(true)
        })
    }

    // -- Events --

    pub fn insert_event(&self, event: &NewEvent) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO events (title, description, event_type, date, time, location,
                                     contact_info, registration_required, max_participants, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    event.title,
                    event.description,
                    event.event_type.as_str(),
                    event.date,
                    event.time,
                    event.location,
                    event.contact_info,
                    event.registration_required,
                    event.max_participants,
                    event.created_by,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn upcoming_events(&self) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, event_type, date, time, location, contact_info,
                        registration_required, max_participants, current_participants, created_by, created_at
                 FROM events
                 WHERE is_active = 1 AND date >= date('now')
                 ORDER BY date ASC, time ASC",
            )?;
            let rows = stmt
                .query_map([], map_event)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn insert_registration(&self, reg: &NewRegistration) -> Result<i64> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1 AND is_active = 1)",
                [reg.event_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(StoreError::NotFound);
            }

            conn.execute(
                "INSERT INTO event_registrations (event_id, name, email, phone, message)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![reg.event_id, reg.name, reg.email, reg.phone, reg.message],
            )
            .map_err(duplicate_or_sqlite)?;
            let id = conn.last_insert_rowid();

            conn.execute(
                "UPDATE events SET current_participants = current_participants + 1 WHERE id = ?1",
                [reg.event_id],
            )?;
            Ok(id)
        })
    }

    // -- Reflections --

    pub fn insert_reflection(&self, reflection: &NewReflection) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO reflections (title, content, scripture_reference, category, author,
                                          is_daily, publish_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    reflection.title,
                    reflection.content,
                    reflection.scripture_reference,
                    reflection.category.as_str(),
                    reflection.author,
                    reflection.is_daily,
                    reflection.publish_date,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn published_reflections(&self, limit: u32) -> Result<Vec<ReflectionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, content, scripture_reference, category, author, is_daily,
                        publish_date, created_at
                 FROM reflections
                 WHERE is_published = 1
                 ORDER BY publish_date DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], map_reflection)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn daily_reflection(&self, date: &str) -> Result<Option<ReflectionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, content, scripture_reference, category, author, is_daily,
                        publish_date, created_at
                 FROM reflections
                 WHERE is_daily = 1 AND publish_date = ?1 AND is_published = 1",
            )?;
            stmt.query_row([date], map_reflection).optional()
        })
    }

    // -- Join requests --

    pub fn insert_join_request(&self, request: &NewJoinRequest) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO join_requests (name, email, phone, age, interests, volunteer_areas, message)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    request.name,
                    request.email,
                    request.phone,
                    request.age,
                    request.interests,
                    request.volunteer_areas,
                    request.message,
                ],
            )
            .map_err(duplicate_or_sqlite)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn pending_join_requests(&self) -> Result<Vec<JoinRequestRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, phone, age, interests, volunteer_areas, message, status, submitted_at
                 FROM join_requests
                 WHERE status = 'pending'
                 ORDER BY submitted_at ASC, id ASC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(JoinRequestRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        phone: row.get(3)?,
                        age: row.get(4)?,
                        interests: row.get(5)?,
                        volunteer_areas: row.get(6)?,
                        message: row.get(7)?,
                        status: row.get(8)?,
                        submitted_at: row.get(9)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

const PRAYER_COLUMNS: &str = "id, title, content, category, submitted_by, email, support_count, \
                              is_approved, is_anonymous, created_at, approved_at";

fn map_user(row: &rusqlite::Row) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        phone: row.get(5)?,
        join_date: row.get(6)?,
        is_active: row.get(7)?,
    })
}

fn map_prayer(row: &rusqlite::Row) -> std::result::Result<PrayerRow, rusqlite::Error> {
    Ok(PrayerRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        submitted_by: row.get(4)?,
        email: row.get(5)?,
        support_count: row.get(6)?,
        is_approved: row.get(7)?,
        is_anonymous: row.get(8)?,
        created_at: row.get(9)?,
        approved_at: row.get(10)?,
    })
}

fn map_event(row: &rusqlite::Row) -> std::result::Result<EventRow, rusqlite::Error> {
    Ok(EventRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        event_type: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        location: row.get(6)?,
        contact_info: row.get(7)?,
        registration_required: row.get(8)?,
        max_participants: row.get(9)?,
        current_participants: row.get(10)?,
        created_by: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn map_reflection(row: &rusqlite::Row) -> std::result::Result<ReflectionRow, rusqlite::Error> {
    Ok(ReflectionRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        scripture_reference: row.get(3)?,
        category: row.get(4)?,
        author: row.get(5)?,
        is_daily: row.get(6)?,
        publish_date: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn duplicate_or_sqlite(err: rusqlite::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Duplicate
    } else {
        StoreError::Sqlite(err)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("UNIQUE constraint failed")
    )
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
