use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ApiError;
use crate::models::{CreateTodoRequest, TodoItem, UpdateTodoRequest};
use crate::store::TodoStore;

/// Todo operations on top of an injected store
///
/// Holds no state of its own besides the store handle, so clones are cheap
/// and can serve any number of concurrent requests.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    timeout: Duration,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        self.call("scan", self.store.scan()).await
    }

    /// Store a new item. The returned item is the one written, not re-read.
    pub async fn create(&self, request: CreateTodoRequest) -> Result<TodoItem, ApiError> {
        let title = request.title.ok_or(ApiError::MissingField("title"))?;
        let item = TodoItem::new(title);

        self.call("put", self.store.put(&item)).await?;
        Ok(item)
    }

    /// Overwrite both fields of `id`. Absent fields are cleared, and an
    /// unknown `id` ends up as a new record.
    pub async fn update(&self, id: &str, request: UpdateTodoRequest) -> Result<(), ApiError> {
        self.call(
            "update",
            self.store.update(id, request.title.as_deref(), request.done),
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete", self.store.delete(id)).await
    }

    async fn call<T, F>(&self, op: &'static str, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::error!("Store {} failed: {:#}", op, e);
                Err(ApiError::OperationFailed(e))
            }
            Err(_) => {
                tracing::error!("Store {} timed out after {:?}", op, self.timeout);
                Err(ApiError::OperationFailed(anyhow::anyhow!(
                    "Store {} timed out after {:?}",
                    op,
                    self.timeout
                )))
            }
        }
    }
}
