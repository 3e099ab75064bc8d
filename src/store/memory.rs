use std::collections::VecDeque;

use tokio::sync::RwLock;

use super::{ChatRecord, HealthStore, ReadingRecord};
use crate::error::AppResult;

/// Bounded in-process history; the oldest entry is evicted once a list
/// reaches `capacity`.
pub struct MemoryStore {
    capacity: usize,
    readings: RwLock<VecDeque<ReadingRecord>>,
    chats: RwLock<VecDeque<ChatRecord>>,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            readings: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            chats: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }
}

fn push_bounded<T>(list: &mut VecDeque<T>, item: T, capacity: usize) {
    while list.len() >= capacity {
        list.pop_front();
    }
    list.push_back(item);
}

fn newest_first<T: Clone>(list: &VecDeque<T>, limit: i64) -> Vec<T> {
    let limit = usize::try_from(limit).unwrap_or(0);
    list.iter().rev().take(limit).cloned().collect()
}

#[async_trait::async_trait]
impl HealthStore for MemoryStore {
    async fn record_reading(&self, reading: &ReadingRecord) -> AppResult<()> {
        let mut readings = self.readings.write().await;
        push_bounded(&mut readings, reading.clone(), self.capacity);
        Ok(())
    }

    async fn recent_readings(&self, limit: i64) -> AppResult<Vec<ReadingRecord>> {
        Ok(newest_first(&*self.readings.read().await, limit))
    }

    async fn record_chat(&self, chat: &ChatRecord) -> AppResult<()> {
        let mut chats = self.chats.write().await;
        push_bounded(&mut chats, chat.clone(), self.capacity);
        Ok(())
    }

    async fn recent_chats(&self, limit: i64) -> AppResult<Vec<ChatRecord>> {
        Ok(newest_first(&*self.chats.read().await, limit))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::AssistantReply;
    use crate::snapshot::default_baseline;
    use tokio_test::assert_ok;

    fn reading(glucose: i32) -> ReadingRecord {
        ReadingRecord {
            glucose,
            ..ReadingRecord::from_snapshot(&default_baseline())
        }
    }

    #[tokio::test]
    async fn test_readings_newest_first() {
        let store = MemoryStore::new(10);
        for glucose in [110, 120, 130] {
            assert_ok!(store.record_reading(&reading(glucose)).await);
        }

        let recent = store.recent_readings(2).await.unwrap();
        let values: Vec<i32> = recent.iter().map(|r| r.glucose).collect();
        assert_eq!(values, vec![130, 120]);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let store = MemoryStore::new(2);
        for glucose in [110, 120, 130] {
            store.record_reading(&reading(glucose)).await.unwrap();
        }

        let recent = store.recent_readings(10).await.unwrap();
        let values: Vec<i32> = recent.iter().map(|r| r.glucose).collect();
        assert_eq!(values, vec![130, 120]);
    }

    #[tokio::test]
    async fn test_chats_roundtrip() {
        let store = MemoryStore::new(10);
        let reply = AssistantReply {
            text: "Drink water.".to_string(),
            provider: Some("gemini".to_string()),
            failure: None,
        };
        store
            .record_chat(&ChatRecord::from_reply("high?", &reply))
            .await
            .unwrap();

        let chats = store.recent_chats(5).await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].query, "high?");
        assert_eq!(chats[0].response, "Drink water.");
        assert_eq!(chats[0].provider, "gemini");
    }

    #[tokio::test]
    async fn test_non_positive_limit_is_empty() {
        let store = MemoryStore::new(10);
        store.record_reading(&reading(100)).await.unwrap();
        assert!(store.recent_readings(0).await.unwrap().is_empty());
        assert!(store.recent_readings(-3).await.unwrap().is_empty());
    }
}
