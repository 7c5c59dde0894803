use crate::{Result as DbErrorResult, TrimOutcome};

use wp_core::{Cursor, Envelope, TenantId};

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Bounded per-tenant envelope log.
///
/// Rows are keyed by `(tenant_id, timestamp)`; the stored JSON keeps the
/// envelope as published and the `timestamp` column is authoritative.
pub struct SyncLogRepository;

impl SyncLogRepository {
    /// Append an envelope, bumping its timestamp to `newest + 1` when the
    /// tenant already holds a newer (or equal) entry. Returns the envelope as
    /// stored.
    pub async fn append<'e, E>(executor: E, envelope: &Envelope) -> DbErrorResult<Envelope>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let tenant_id = envelope.tenant_id().as_str();
        let id = envelope.id().to_string();
        let body = serde_json::to_string(envelope)?;

        let row = sqlx::query(
            r#"
              INSERT INTO sync_log (tenant_id, id, timestamp, envelope)
              SELECT ?1, ?2,
                     MAX(?3, MAX(
                         COALESCE((SELECT MAX(timestamp) FROM sync_log WHERE tenant_id = ?1), 0),
                         COALESCE((SELECT trimmed_through FROM sync_log_watermark WHERE tenant_id = ?1), 0)
                     ) + 1),
                     ?4
              RETURNING timestamp
              "#,
        )
        .bind(tenant_id)
        .bind(&id)
        .bind(envelope.timestamp())
        .bind(&body)
        .fetch_one(executor)
        .await?;

        let timestamp: i64 = row.try_get("timestamp")?;
        Ok(envelope.clone().restamped(Cursor::from_millis(timestamp)))
    }

    /// Envelopes strictly after `after`, oldest first, at most `limit`.
    pub async fn read_since<'e, E>(
        executor: E,
        tenant_id: &TenantId,
        after: Cursor,
        limit: i64,
    ) -> DbErrorResult<Vec<Envelope>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query(
            r#"
              SELECT timestamp, envelope
              FROM sync_log
              WHERE tenant_id = ? AND timestamp > ?
              ORDER BY timestamp ASC, seq ASC
              LIMIT ?
              "#,
        )
        .bind(tenant_id.as_str())
        .bind(after.as_millis())
        .bind(limit)
        .fetch_all(executor)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    pub async fn newest_timestamp<'e, E>(
        executor: E,
        tenant_id: &TenantId,
    ) -> DbErrorResult<Option<Cursor>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let newest: Option<i64> =
            sqlx::query_scalar("SELECT MAX(timestamp) FROM sync_log WHERE tenant_id = ?")
                .bind(tenant_id.as_str())
                .fetch_one(executor)
                .await?;

        Ok(newest.map(Cursor::from_millis))
    }

    pub async fn oldest_timestamp<'e, E>(
        executor: E,
        tenant_id: &TenantId,
    ) -> DbErrorResult<Option<Cursor>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let oldest: Option<i64> =
            sqlx::query_scalar("SELECT MIN(timestamp) FROM sync_log WHERE tenant_id = ?")
                .bind(tenant_id.as_str())
                .fetch_one(executor)
                .await?;

        Ok(oldest.map(Cursor::from_millis))
    }

    /// Newest timestamp ever evicted for the tenant
    pub async fn watermark<'e, E>(
        executor: E,
        tenant_id: &TenantId,
    ) -> DbErrorResult<Option<Cursor>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let trimmed: Option<i64> = sqlx::query_scalar(
            "SELECT trimmed_through FROM sync_log_watermark WHERE tenant_id = ?",
        )
        .bind(tenant_id.as_str())
        .fetch_optional(executor)
        .await?;

        Ok(trimmed.map(Cursor::from_millis))
    }

    /// Tenants that currently hold log rows
    pub async fn tenants<'e, E>(executor: E) -> DbErrorResult<Vec<TenantId>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT tenant_id FROM sync_log ORDER BY tenant_id")
                .fetch_all(executor)
                .await?;

        Ok(ids.into_iter().map(TenantId::new).collect())
    }

    /// Evict everything beyond the newest `keep` rows and everything older
    /// than `cutoff`, then advance the tenant's watermark.
    ///
    /// Timestamps are strictly increasing, so eviction always removes a
    /// prefix of the log.
    pub async fn trim(
        pool: &SqlitePool,
        tenant_id: &TenantId,
        keep: i64,
        cutoff: Cursor,
    ) -> DbErrorResult<TrimOutcome> {
        let mut tx = pool.begin().await?;

        let boundary: Option<i64> = sqlx::query_scalar(
            r#"
              SELECT MAX(timestamp)
              FROM sync_log
              WHERE tenant_id = ?1
                AND (
                    timestamp < ?2
                    OR timestamp <= COALESCE((
                        SELECT timestamp FROM sync_log
                        WHERE tenant_id = ?1
                        ORDER BY timestamp DESC
                        LIMIT 1 OFFSET ?3
                    ), -1)
                )
              "#,
        )
        .bind(tenant_id.as_str())
        .bind(cutoff.as_millis())
        .bind(keep)
        .fetch_one(&mut *tx)
        .await?;

        let mut removed = 0;
        if let Some(boundary) = boundary {
            removed = sqlx::query("DELETE FROM sync_log WHERE tenant_id = ? AND timestamp <= ?")
                .bind(tenant_id.as_str())
                .bind(boundary)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            sqlx::query(
                r#"
                  INSERT INTO sync_log_watermark (tenant_id, trimmed_through)
                  VALUES (?1, ?2)
                  ON CONFLICT(tenant_id)
                  DO UPDATE SET trimmed_through = MAX(trimmed_through, excluded.trimmed_through)
                  "#,
            )
            .bind(tenant_id.as_str())
            .bind(boundary)
            .execute(&mut *tx)
            .await?;
        }

        let trimmed_through = Self::watermark(&mut *tx, tenant_id).await?;
        tx.commit().await?;

        Ok(TrimOutcome {
            removed,
            trimmed_through,
        })
    }

    fn map_row(row: &SqliteRow) -> DbErrorResult<Envelope> {
        let timestamp: i64 = row.try_get("timestamp")?;
        let body: String = row.try_get("envelope")?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        Ok(envelope.restamped(Cursor::from_millis(timestamp)))
    }
}
