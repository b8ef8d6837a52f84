//! Conversation threads and their message history
//!
//! A thread is one logical conversation identified by a [`ThreadId`]. Its
//! history lives in a [`ThreadStore`] and only ever grows.
//!
//! # Example
//!
//! ```rust,ignore
//! use docent_core::conversation::{InMemoryThreadStore, ThreadId, ThreadStore};
//!
//! let store = InMemoryThreadStore::new();
//! let thread = ThreadId::new();
//! store.append(&thread, &[Message::user("Hello!")]).await?;
//! let history = store.history(&thread).await?;
//! ```

mod store;
mod thread;

pub use store::{InMemoryThreadStore, ThreadRecord, ThreadStore};
pub use thread::ThreadId;
