//! SQLite implementation of [`ContentStore`].
//!
//! [`SqliteStore`] persists site content in a SQLite database with WAL mode
//! and automatic schema migrations. Slide writes run in a transaction that
//! re-checks capacity and ordinal ownership, and the `UNIQUE` constraint on
//! `carousel_slides.ordinal` backs that check up.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use medayu_core::model::{AnnouncementFields, ProfileFields, SlideFields};
use medayu_core::{
    Announcement, AnnouncementId, CarouselSlide, DashboardCounts, Manager, ManagerId, Ordinal,
    Profile, ProfileId, ProfileKind, SlideId, MAX_SLIDES,
};

use crate::error::StorageError;
use crate::traits::ContentStore;

/// SQLite-backed implementation of [`ContentStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn kind_to_str(kind: ProfileKind) -> &'static str {
        match kind {
            ProfileKind::Supervisor => "supervisor",
            ProfileKind::Advisor => "advisor",
            ProfileKind::Partner => "partner",
        }
    }

    /// Converts a stored ordinal column, rejecting out-of-range values.
    fn stored_ordinal(raw: i64) -> Result<Ordinal, StorageError> {
        Ordinal::new(raw).map_err(|e| StorageError::IntegrityError {
            reason: format!("stored ordinal: {}", e),
        })
    }

    fn slide_from_row(
        id: i64,
        image_file_name: String,
        ordinal: i64,
    ) -> Result<CarouselSlide, StorageError> {
        Ok(CarouselSlide {
            id: SlideId(id),
            image_file_name,
            ordinal: Self::stored_ordinal(ordinal)?,
        })
    }

    fn count(&self, sql: &str) -> Result<u64, StorageError> {
        let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Maps a UNIQUE violation on `carousel_slides.ordinal` to `OrdinalTaken`.
    fn map_ordinal_conflict(err: rusqlite::Error, ordinal: Ordinal) -> StorageError {
        match &err {
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
                StorageError::OrdinalTaken(ordinal)
            }
            _ => StorageError::Sqlite(err),
        }
    }

    fn read_manager(row: &rusqlite::Row<'_>) -> rusqlite::Result<Manager> {
        Ok(Manager {
            id: ManagerId(row.get(0)?),
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
        })
    }

    /// Inserts a row into one of the externally written tables (for testing).
    #[cfg(test)]
    fn insert_external(&self, table: &str, who: &str) {
        let column = if table == "visits" { "visitor" } else { "applicant" };
        self.conn
            .execute(
                &format!("INSERT INTO {} ({}) VALUES (?1)", table, column),
                params![who],
            )
            .unwrap();
    }
}

impl ContentStore for SqliteStore {
    // -------------------------------------------------------------------
    // Carousel slides
    // -------------------------------------------------------------------

    fn list_slides(&self) -> Result<Vec<CarouselSlide>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, image_file_name, ordinal FROM carousel_slides ORDER BY ordinal",
        )?;
        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            let ordinal: i64 = row.get(2)?;
            Ok((id, name, ordinal))
        })?;
        let mut result = Vec::new();
        for row in rows {
            let (id, name, ordinal) = row?;
            result.push(Self::slide_from_row(id, name, ordinal)?);
        }
        Ok(result)
    }

    fn used_ordinals(&self) -> Result<Vec<Ordinal>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT ordinal FROM carousel_slides ORDER BY ordinal")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(Self::stored_ordinal(row?)?);
        }
        Ok(result)
    }

    fn count_slides(&self) -> Result<u64, StorageError> {
        self.count("SELECT COUNT(*) FROM carousel_slides")
    }

    fn get_slide(&self, id: SlideId) -> Result<Option<CarouselSlide>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT image_file_name, ordinal FROM carousel_slides WHERE id = ?1",
                params![id.0],
                |row| {
                    let name: String = row.get(0)?;
                    let ordinal: i64 = row.get(1)?;
                    Ok((name, ordinal))
                },
            )
            .optional()?;
        match row {
            Some((name, ordinal)) => Ok(Some(Self::slide_from_row(id.0, name, ordinal)?)),
            None => Ok(None),
        }
    }

    fn insert_slide(&mut self, fields: &SlideFields) -> Result<SlideId, StorageError> {
        let tx = self.conn.transaction()?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM carousel_slides", [], |row| {
            row.get(0)
        })?;
        if count >= MAX_SLIDES as i64 {
            return Err(StorageError::CapacityExceeded { max: MAX_SLIDES });
        }
        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM carousel_slides WHERE ordinal = ?1)",
            params![fields.ordinal.get()],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StorageError::OrdinalTaken(fields.ordinal));
        }
        tx.execute(
            "INSERT INTO carousel_slides (image_file_name, ordinal) VALUES (?1, ?2)",
            params![fields.image_file_name, fields.ordinal.get()],
        )
        .map_err(|e| Self::map_ordinal_conflict(e, fields.ordinal))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(SlideId(id))
    }

    fn update_slide(&mut self, id: SlideId, fields: &SlideFields) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM carousel_slides WHERE ordinal = ?1 AND id <> ?2)",
            params![fields.ordinal.get(), id.0],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StorageError::OrdinalTaken(fields.ordinal));
        }
        let changed = tx
            .execute(
                "UPDATE carousel_slides SET image_file_name = ?1, ordinal = ?2 WHERE id = ?3",
                params![fields.image_file_name, fields.ordinal.get(), id.0],
            )
            .map_err(|e| Self::map_ordinal_conflict(e, fields.ordinal))?;
        if changed == 0 {
            return Err(StorageError::SlideNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_slide(&mut self, id: SlideId) -> Result<bool, StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM carousel_slides WHERE id = ?1", params![id.0])?;
        Ok(changed > 0)
    }

    // -------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------

    fn list_profiles(&self, kind: ProfileKind) -> Result<Vec<Profile>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, photo FROM profiles WHERE kind = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![Self::kind_to_str(kind)], |row| {
            Ok(Profile {
                id: ProfileId(row.get(0)?),
                kind,
                name: row.get(1)?,
                photo: row.get(2)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn get_profile(
        &self,
        kind: ProfileKind,
        id: ProfileId,
    ) -> Result<Option<Profile>, StorageError> {
        let profile = self
            .conn
            .query_row(
                "SELECT name, photo FROM profiles WHERE id = ?1 AND kind = ?2",
                params![id.0, Self::kind_to_str(kind)],
                |row| {
                    Ok(Profile {
                        id,
                        kind,
                        name: row.get(0)?,
                        photo: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    fn insert_profile(
        &mut self,
        kind: ProfileKind,
        fields: &ProfileFields,
    ) -> Result<ProfileId, StorageError> {
        self.conn.execute(
            "INSERT INTO profiles (kind, name, photo) VALUES (?1, ?2, ?3)",
            params![Self::kind_to_str(kind), fields.name, fields.photo],
        )?;
        Ok(ProfileId(self.conn.last_insert_rowid()))
    }

    fn update_profile(
        &mut self,
        kind: ProfileKind,
        id: ProfileId,
        fields: &ProfileFields,
    ) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE profiles SET name = ?1, photo = ?2 WHERE id = ?3 AND kind = ?4",
            params![fields.name, fields.photo, id.0, Self::kind_to_str(kind)],
        )?;
        if changed == 0 {
            return Err(StorageError::ProfileNotFound { kind, id });
        }
        Ok(())
    }

    fn delete_profile(&mut self, kind: ProfileKind, id: ProfileId) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "DELETE FROM profiles WHERE id = ?1 AND kind = ?2",
            params![id.0, Self::kind_to_str(kind)],
        )?;
        Ok(changed > 0)
    }

    // -------------------------------------------------------------------
    // Announcements
    // -------------------------------------------------------------------

    fn list_announcements(&self) -> Result<Vec<Announcement>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, title, body, photo FROM announcements ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Announcement {
                id: AnnouncementId(row.get(0)?),
                title: row.get(1)?,
                body: row.get(2)?,
                photo: row.get(3)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn get_announcement(&self, id: AnnouncementId) -> Result<Option<Announcement>, StorageError> {
        let announcement = self
            .conn
            .query_row(
                "SELECT title, body, photo FROM announcements WHERE id = ?1",
                params![id.0],
                |row| {
                    Ok(Announcement {
                        id,
                        title: row.get(0)?,
                        body: row.get(1)?,
                        photo: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(announcement)
    }

    fn insert_announcement(
        &mut self,
        fields: &AnnouncementFields,
    ) -> Result<AnnouncementId, StorageError> {
        self.conn.execute(
            "INSERT INTO announcements (title, body, photo) VALUES (?1, ?2, ?3)",
            params![fields.title, fields.body, fields.photo],
        )?;
        Ok(AnnouncementId(self.conn.last_insert_rowid()))
    }

    fn update_announcement(
        &mut self,
        id: AnnouncementId,
        fields: &AnnouncementFields,
    ) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE announcements SET title = ?1, body = ?2, photo = ?3 WHERE id = ?4",
            params![fields.title, fields.body, fields.photo, id.0],
        )?;
        if changed == 0 {
            return Err(StorageError::AnnouncementNotFound(id));
        }
        Ok(())
    }

    fn delete_announcement(&mut self, id: AnnouncementId) -> Result<bool, StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM announcements WHERE id = ?1", params![id.0])?;
        Ok(changed > 0)
    }

    // -------------------------------------------------------------------
    // Manager accounts
    // -------------------------------------------------------------------

    fn get_manager(&self, id: ManagerId) -> Result<Option<Manager>, StorageError> {
        let manager = self
            .conn
            .query_row(
                "SELECT id, name, email, password_hash FROM managers WHERE id = ?1",
                params![id.0],
                Self::read_manager,
            )
            .optional()?;
        Ok(manager)
    }

    fn find_manager_by_email(&self, email: &str) -> Result<Option<Manager>, StorageError> {
        let manager = self
            .conn
            .query_row(
                "SELECT id, name, email, password_hash FROM managers WHERE email = ?1",
                params![email.trim()],
                Self::read_manager,
            )
            .optional()?;
        Ok(manager)
    }

    fn insert_manager(
        &mut self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<ManagerId, StorageError> {
        let email = email.trim();
        self.conn
            .execute(
                "INSERT INTO managers (name, email, password_hash) VALUES (?1, ?2, ?3)",
                params![name, email, password_hash],
            )
            .map_err(|e| match &e {
                rusqlite::Error::SqliteFailure(f, _)
                    if f.code == ErrorCode::ConstraintViolation =>
                {
                    StorageError::DuplicateEmail(email.to_string())
                }
                _ => StorageError::Sqlite(e),
            })?;
        Ok(ManagerId(self.conn.last_insert_rowid()))
    }

    fn update_manager_password(
        &mut self,
        id: ManagerId,
        password_hash: &str,
    ) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE managers SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id.0],
        )?;
        if changed == 0 {
            return Err(StorageError::ManagerNotFound(id));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Dashboard
    // -------------------------------------------------------------------

    fn dashboard_counts(&self) -> Result<DashboardCounts, StorageError> {
        Ok(DashboardCounts {
            carousel_photos: self.count("SELECT COUNT(*) FROM carousel_slides")?,
            visits: self.count("SELECT COUNT(*) FROM visits")?,
            internships: self.count("SELECT COUNT(*) FROM internships")?,
        })
    }
}
