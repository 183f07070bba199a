pub mod memory;
pub mod spanner;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::TodoItem;

pub use memory::MemoryStore;
pub use spanner::SpannerStore;

/// Key-value persistence for todo items
///
/// Implementations make no transactional or conditional guarantees.
/// `update` writes the given fields unconditionally, creating the record
/// when `id` is unknown, and `delete` succeeds for unknown ids.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Every stored item, in no particular order
    async fn scan(&self) -> Result<Vec<TodoItem>>;

    async fn put(&self, item: &TodoItem) -> Result<()>;

    /// Replace `title` and `done` of the record keyed by `id`; `None` clears the field.
    async fn update(&self, id: &str, title: Option<&str>, done: Option<bool>) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}
