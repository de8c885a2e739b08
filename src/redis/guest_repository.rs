use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use redis::AsyncCommands;

use crate::error::{AppError, Result};
use crate::models::{AttendanceState, Guest};

/// Guest repository for Redis operations
///
/// One JSON document per guest under `guest:{id}`, with a `guests` set as the
/// collection index.
#[derive(Clone)]
pub struct GuestRepository {
    pool: Pool,
}

const INDEX_KEY: &str = "guests";

fn guest_key(guest_id: &str) -> String {
    format!("guest:{}", guest_id)
}

impl GuestRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    // ==================== Guest Operations ====================

    /// Store a new guest and add it to the collection index
    pub async fn create_guest(&self, guest: &Guest) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let json = serde_json::to_string(guest)?;

        conn.set::<_, _, ()>(guest_key(&guest.id), &json).await?;
        conn.sadd::<_, _, ()>(INDEX_KEY, &guest.id).await?;

        tracing::info!(guest_id = %guest.id, "Guest created");
        Ok(())
    }

    /// Get guest by ID
    pub async fn get_guest(&self, guest_id: &str) -> Result<Option<Guest>> {
        let mut conn = self.pool.get().await?;

        let json: Option<String> = conn.get(guest_key(guest_id)).await?;

        match json {
            Some(data) => {
                let guest: Guest = serde_json::from_str(&data)?;
                Ok(Some(guest))
            }
            None => Ok(None),
        }
    }

    /// Scan the full guest list, sorted by name
    pub async fn list_guests(&self) -> Result<Vec<Guest>> {
        let mut conn = self.pool.get().await?;

        let ids: Vec<String> = conn.smembers(INDEX_KEY).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| guest_key(id)).collect();
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut *conn)
            .await?;

        let mut guests: Vec<Guest> = values
            .into_iter()
            .flatten()
            .filter_map(|json| serde_json::from_str(&json).ok())
            .collect();

        guests.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(guests)
    }

    /// Update a guest's contact details
    pub async fn update_guest(
        &self,
        guest_id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Guest> {
        let mut guest = self.require_guest(guest_id).await?;

        if let Some(name) = name {
            guest.name = name;
        }
        if let Some(email) = email {
            guest.email = Some(email);
        }

        self.save_guest(&guest).await?;

        tracing::debug!(guest_id = %guest_id, "Guest updated");
        Ok(guest)
    }

    /// Delete a guest and drop it from the index
    pub async fn delete_guest(&self, guest_id: &str) -> Result<()> {
        let mut conn = self.pool.get().await?;

        conn.del::<_, ()>(guest_key(guest_id)).await?;
        conn.srem::<_, _, ()>(INDEX_KEY, guest_id).await?;

        tracing::info!(guest_id = %guest_id, "Guest deleted");
        Ok(())
    }

    // ==================== RSVP Operations ====================

    /// Record an RSVP for a guest
    pub async fn record_rsvp(
        &self,
        guest_id: &str,
        attendance: AttendanceState,
        response: Option<String>,
    ) -> Result<Guest> {
        let mut guest = self.require_guest(guest_id).await?;

        guest.attendance = attendance;
        guest.response = response;

        self.save_guest(&guest).await?;

        tracing::info!(guest_id = %guest_id, attendance = ?attendance, "RSVP recorded");
        Ok(guest)
    }

    // ==================== Notification Operations ====================

    /// Mark a guest's invitation as delivered
    ///
    /// Point update used by dispatch reconciliation; only the notification
    /// fields change.
    pub async fn mark_notified(&self, guest_id: &str, at: DateTime<Utc>) -> Result<()> {
        let mut guest = self.require_guest(guest_id).await?;

        guest.notified = true;
        guest.notified_at = Some(at);

        self.save_guest(&guest).await?;

        tracing::debug!(guest_id = %guest_id, "Guest marked notified");
        Ok(())
    }

    // ==================== Health Check ====================

    /// Check Redis connection health
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.pool.get().await?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        Ok(pong == "PONG")
    }

    // ==================== Helpers ====================

    async fn require_guest(&self, guest_id: &str) -> Result<Guest> {
        self.get_guest(guest_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Guest {} not found", guest_id)))
    }

    async fn save_guest(&self, guest: &Guest) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let json = serde_json::to_string(guest)?;

        conn.set::<_, _, ()>(guest_key(&guest.id), &json).await?;
        Ok(())
    }
}
