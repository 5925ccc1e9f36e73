use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use super::lock;
use crate::models::{ReminderPayload, ScheduledReminder};
use crate::utils::AppResult;

/// Schemalagda påminnelser hos den lokala notifieringsvärden
pub struct NotificationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NotificationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Lägg till en påminnelse, returnerar id
    pub fn insert(&self, trigger_at: NaiveDateTime, payload: &ReminderPayload) -> AppResult<i64> {
        let payload_json = serde_json::to_string(payload)?;
        let conn = lock(&self.conn)?;

        conn.execute(
            "INSERT INTO scheduled_notifications (trigger_at, payload) VALUES (?1, ?2)",
            params![trigger_at, payload_json],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Ta bort alla påminnelser, returnerar antal borttagna
    pub fn delete_all(&self) -> AppResult<usize> {
        let conn = lock(&self.conn)?;
        let removed = conn.execute("DELETE FROM scheduled_notifications", [])?;
        Ok(removed)
    }

    /// Ta bort påminnelser vars tid har passerat, returnerar antal
    pub fn delete_fired(&self, now: NaiveDateTime) -> AppResult<usize> {
        let conn = lock(&self.conn)?;
        let removed = conn.execute(
            "DELETE FROM scheduled_notifications WHERE trigger_at < ?1",
            params![now],
        )?;
        Ok(removed)
    }

    /// Alla påminnelser i tidsordning
    pub fn find_all(&self) -> AppResult<Vec<ScheduledReminder>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, trigger_at, payload FROM scheduled_notifications
             ORDER BY trigger_at, id",
        )?;

        let reminders = stmt
            .query_map([], Self::row_to_reminder)?
            .filter_map(|r| match r {
                Ok(reminder) => Some(reminder),
                Err(e) => {
                    tracing::warn!("Hoppar över oläsbar påminnelse: {}", e);
                    None
                }
            })
            .collect();

        Ok(reminders)
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> AppResult<i64> {
        let conn = lock(&self.conn)?;
        let count = conn.query_row("SELECT COUNT(*) FROM scheduled_notifications", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    fn row_to_reminder(row: &Row) -> rusqlite::Result<ScheduledReminder> {
        let payload_json: String = row.get(2)?;
        let payload: ReminderPayload = serde_json::from_str(&payload_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(ScheduledReminder {
            id: row.get(0)?,
            trigger_at: row.get(1)?,
            payload,
        })
    }
}
