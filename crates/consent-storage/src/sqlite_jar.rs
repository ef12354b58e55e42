//! SQLite-backed cookie jar

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use crate::cookie::Cookie;
use crate::database::Database;
use crate::error::StorageError;
use crate::jar::CookieJar;
use crate::Result;

pub struct SqliteCookieJar {
    db: Database,
}

impl SqliteCookieJar {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Drop every expired cookie, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize> {
        let now = Utc::now().to_rfc3339();
        let removed = self.db.with_connection(|conn| {
            Ok(conn.execute(
                "DELETE FROM cookies WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                [now],
            )?)
        })?;

        if removed > 0 {
            tracing::debug!(removed, "Purged expired cookies");
        }
        Ok(removed)
    }
}

impl Clone for SqliteCookieJar {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

fn parse_expiry(name: &str, raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|value| {
        DateTime::parse_from_rfc3339(&value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|source| StorageError::Timestamp {
                name: name.to_string(),
                source,
            })
    })
    .transpose()
}

impl CookieJar for SqliteCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let row: Option<(String, Option<String>)> = self.db.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT value, expires_at FROM cookies WHERE name = ?1",
                    [name],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?)
        })?;

        let Some((value, expires_at)) = row else {
            return Ok(None);
        };

        let expires_at = parse_expiry(name, expires_at)?;
        if expires_at.is_some_and(|at| at <= Utc::now()) {
            tracing::debug!(cookie = %name, "Cookie expired");
            self.remove(name)?;
            return Ok(None);
        }

        Ok(Some(value))
    }

    fn set(&self, cookie: Cookie) -> Result<()> {
        cookie.validate()?;

        let updated_at = Utc::now().to_rfc3339();
        let expires_at = cookie.expires_at.map(|at| at.to_rfc3339());

        self.db.transaction(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO cookies (name, value, path, expires_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![cookie.name, cookie.value, cookie.path, expires_at, updated_at],
            )?;
            Ok(())
        })
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM cookies WHERE name = ?1", [name])?;
            Ok(())
        })
    }
}
