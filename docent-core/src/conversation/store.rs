//! Conversation state store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::ThreadId;
use crate::error::Result;
use crate::llm::Message;

/// Ordered message history per thread
///
/// Entries only grow: messages are appended, never edited or removed.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Append `messages` to the end of the thread, creating it if needed.
    /// The batch lands contiguously and in order.
    async fn append(&self, thread_id: &ThreadId, messages: &[Message]) -> Result<()>;

    /// Full history of the thread, oldest first; empty for unknown threads
    async fn history(&self, thread_id: &ThreadId) -> Result<Vec<Message>>;
}

/// One stored thread
#[derive(Debug, Clone)]
pub struct ThreadRecord {
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Process-local store keyed by thread id
#[derive(Debug, Default)]
pub struct InMemoryThreadStore {
    threads: RwLock<HashMap<ThreadId, ThreadRecord>>,
}

impl InMemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a thread, including timestamps
    pub async fn record(&self, thread_id: &ThreadId) -> Option<ThreadRecord> {
        self.threads.read().await.get(thread_id).cloned()
    }

    /// Number of threads with at least one message
    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.len()
    }
}

#[async_trait]
impl ThreadStore for InMemoryThreadStore {
    async fn append(&self, thread_id: &ThreadId, messages: &[Message]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut threads = self.threads.write().await;
        let record = threads.entry(*thread_id).or_insert_with(|| ThreadRecord {
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        });
        record.messages.extend_from_slice(messages);
        record.updated_at = now;
        Ok(())
    }

    async fn history(&self, thread_id: &ThreadId) -> Result<Vec<Message>> {
        Ok(self
            .threads
            .read()
            .await
            .get(thread_id)
            .map(|record| record.messages.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_history() {
        let store = InMemoryThreadStore::new();
        let thread = ThreadId::new();

        store.append(&thread, &[Message::user("hi")]).await.unwrap();
        store
            .append(&thread, &[Message::assistant("hello"), Message::user("bye")])
            .await
            .unwrap();

        let history = store.history(&thread).await.unwrap();
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hello", "bye"]);
    }

    #[tokio::test]
    async fn test_threads_are_isolated() {
        let store = InMemoryThreadStore::new();
        let a = ThreadId::new();
        let b = ThreadId::new();

        store.append(&a, &[Message::user("for a")]).await.unwrap();
        assert!(store.history(&b).await.unwrap().is_empty());
        assert_eq!(store.history(&a).await.unwrap().len(), 1);
        assert_eq!(store.thread_count().await, 1);
    }

    #[tokio::test]
    async fn test_empty_append_creates_nothing() {
        let store = InMemoryThreadStore::new();
        let thread = ThreadId::new();

        store.append(&thread, &[]).await.unwrap();
        assert!(store.record(&thread).await.is_none());
    }

    #[tokio::test]
    async fn test_record_timestamps() {
        let store = InMemoryThreadStore::new();
        let thread = ThreadId::new();

        store.append(&thread, &[Message::user("one")]).await.unwrap();
        store.append(&thread, &[Message::user("two")]).await.unwrap();

        let record = store.record(&thread).await.unwrap();
        assert!(record.updated_at >= record.created_at);
        assert_eq!(record.messages.len(), 2);
    }
}
