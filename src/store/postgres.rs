use sqlx::PgPool;

use super::{ChatRecord, HealthStore, ReadingRecord};
use crate::error::AppResult;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl HealthStore for PgStore {
    #[tracing::instrument(name = "db.readings.insert", skip_all)]
    async fn record_reading(&self, reading: &ReadingRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO health_readings \
             (id, recorded_at, glucose, heart_rate, spo2, steps, activity_minutes, device_battery) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(reading.id)
        .bind(reading.recorded_at)
        .bind(reading.glucose)
        .bind(reading.heart_rate)
        .bind(reading.spo2)
        .bind(reading.steps)
        .bind(reading.activity_minutes)
        .bind(reading.device_battery)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(name = "db.readings.list", skip(self))]
    async fn recent_readings(&self, limit: i64) -> AppResult<Vec<ReadingRecord>> {
        let rows = sqlx::query_as::<_, ReadingRecord>(
            "SELECT id, recorded_at, glucose, heart_rate, spo2, steps, activity_minutes, \
             device_battery \
             FROM health_readings ORDER BY recorded_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(name = "db.chats.insert", skip_all)]
    async fn record_chat(&self, chat: &ChatRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO chat_exchanges \
             (id, recorded_at, query, response, provider, failure_kind) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(chat.id)
        .bind(chat.recorded_at)
        .bind(&chat.query)
        .bind(&chat.response)
        .bind(&chat.provider)
        .bind(chat.failure_kind.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(name = "db.chats.list", skip(self))]
    async fn recent_chats(&self, limit: i64) -> AppResult<Vec<ChatRecord>> {
        let rows = sqlx::query_as::<_, ChatRecord>(
            "SELECT id, recorded_at, query, response, provider, failure_kind \
             FROM chat_exchanges ORDER BY recorded_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
