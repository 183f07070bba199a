use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::models::TodoItem;

/// In-process store, used for local runs without Spanner and in tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<String, TodoItem>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn scan(&self) -> Result<Vec<TodoItem>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn put(&self, item: &TodoItem) -> Result<()> {
        self.items
            .write()
            .await
            .insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn update(&self, id: &str, title: Option<&str>, done: Option<bool>) -> Result<()> {
        let item = TodoItem {
            id: id.to_string(),
            title: title.map(str::to_string),
            done,
        };
        self.items.write().await.insert(item.id.clone(), item);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.items.write().await.remove(id);
        Ok(())
    }
}
