pub mod memory;
pub mod pool;
pub mod postgres;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::assistant::AssistantReply;
use crate::error::AppResult;
use crate::snapshot::HealthSnapshot;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Headline vitals of one served snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub glucose: i32,
    pub heart_rate: i32,
    pub spo2: i32,
    pub steps: i32,
    pub activity_minutes: i32,
    pub device_battery: i32,
}

impl ReadingRecord {
    pub fn from_snapshot(snapshot: &HealthSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            glucose: snapshot.current_glucose,
            heart_rate: snapshot.heart_rate,
            spo2: snapshot.spo2,
            steps: i32::try_from(snapshot.steps).unwrap_or(i32::MAX),
            activity_minutes: i32::try_from(snapshot.activity_minutes).unwrap_or(i32::MAX),
            device_battery: i32::from(snapshot.device_battery),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub query: String,
    pub response: String,
    /// Provider that answered, or `fallback`.
    pub provider: String,
    pub failure_kind: Option<String>,
}

impl ChatRecord {
    pub fn from_reply(query: &str, reply: &AssistantReply) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            query: query.to_string(),
            response: reply.text.clone(),
            provider: reply
                .provider
                .clone()
                .unwrap_or_else(|| "fallback".to_string()),
            failure_kind: reply.failure.map(|k| k.as_str().to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait HealthStore: Send + Sync {
    async fn record_reading(&self, reading: &ReadingRecord) -> AppResult<()>;
    /// Newest first.
    async fn recent_readings(&self, limit: i64) -> AppResult<Vec<ReadingRecord>>;
    async fn record_chat(&self, chat: &ChatRecord) -> AppResult<()>;
    /// Newest first.
    async fn recent_chats(&self, limit: i64) -> AppResult<Vec<ChatRecord>>;
    fn backend(&self) -> &'static str;
}

/// Postgres when a database URL is configured, otherwise process memory.
pub async fn connect(
    database_url: Option<&str>,
    memory_capacity: usize,
) -> anyhow::Result<Arc<dyn HealthStore>> {
    match database_url {
        Some(url) => {
            let pool = pool::create_pool(url).await?;
            pool::run_migrations(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            tracing::info!(
                capacity = memory_capacity,
                "DATABASE_URL not set, keeping history in memory"
            );
            Ok(Arc::new(MemoryStore::new(memory_capacity)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FailureKind;
    use crate::snapshot::default_baseline;

    #[test]
    fn test_reading_from_snapshot() {
        let reading = ReadingRecord::from_snapshot(&default_baseline());
        assert_eq!(reading.glucose, 118);
        assert_eq!(reading.heart_rate, 72);
        assert_eq!(reading.spo2, 98);
        assert_eq!(reading.steps, 6521);
        assert_eq!(reading.device_battery, 76);
    }

    #[test]
    fn test_chat_from_fallback_reply() {
        let reply = AssistantReply {
            text: "offline".to_string(),
            provider: None,
            failure: Some(FailureKind::MissingCredential),
        };
        let chat = ChatRecord::from_reply("hello", &reply);
        assert_eq!(chat.provider, "fallback");
        assert_eq!(chat.failure_kind.as_deref(), Some("missing_credential"));
    }

    #[test]
    fn test_reading_serializes_camel_case() {
        let reading = ReadingRecord::from_snapshot(&default_baseline());
        let value = serde_json::to_value(reading).unwrap();
        assert!(value.get("heartRate").is_some());
        assert!(value.get("recordedAt").is_some());
    }

    #[tokio::test]
    async fn test_connect_without_url_uses_memory() {
        let store = connect(None, 10).await.unwrap();
        assert_eq!(store.backend(), "memory");
    }
}
