use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update};
use gcloud_spanner::statement::Statement;
use std::future::Future;
use std::sync::Arc;

use super::TodoStore;
use crate::config::SpannerConfig;
use crate::models::TodoItem;

const COLUMNS: [&str; 3] = ["id", "title", "done"];

/// Todo store backed by a Cloud Spanner table
///
/// Cheap to clone; clones share one underlying session pool.
#[derive(Clone)]
pub struct SpannerStore {
    inner: Arc<Client>,
    table: String,
}

impl SpannerStore {
    /// Connect to Spanner, provisioning the instance, database and table
    /// first when they are missing.
    ///
    /// The gcloud-spanner library picks up `SPANNER_EMULATOR_HOST` from the
    /// environment on its own and talks to the emulator when it is set.
    /// Against production, credentials are loaded through Application
    /// Default Credentials (`GOOGLE_APPLICATION_CREDENTIALS`, gcloud user
    /// credentials or the metadata server).
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        let (client_config, admin_config) = client_configs(config).await?;

        auto_provision(config, admin_config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, client_config)
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
            table: config.table.clone(),
        })
    }
}

fn requires_credentials(config: &SpannerConfig) -> bool {
    config.emulator_host.is_none()
}

/// Data and admin client configs; the emulator accepts unauthenticated calls.
async fn client_configs(config: &SpannerConfig) -> Result<(ClientConfig, AdminClientConfig)> {
    if !requires_credentials(config) {
        return Ok((ClientConfig::default(), AdminClientConfig::default()));
    }

    tracing::info!("Loading Google credentials");
    let client_config = ClientConfig::default()
        .with_auth()
        .await
        .context("Failed to load Google credentials")?;
    let admin_config = AdminClientConfig::default()
        .with_auth()
        .await
        .context("Failed to load Google credentials for the admin client")?;

    Ok((client_config, admin_config))
}

#[async_trait]
impl TodoStore for SpannerStore {
    async fn scan(&self) -> Result<Vec<TodoItem>> {
        let sql = format!("SELECT id, title, done FROM {}", self.table);
        let statement = Statement::new(&sql);

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to scan todos")?;

        let mut items = Vec::new();
        while let Some(row) = result_set.next().await? {
            items.push(TodoItem {
                id: row.column_by_name("id")?,
                title: row.column_by_name("title")?,
                done: row.column_by_name("done")?,
            });
        }

        tracing::debug!("Scanned {} todos", items.len());
        Ok(items)
    }

    async fn put(&self, item: &TodoItem) -> Result<()> {
        let mutation = insert_or_update(
            &self.table,
            &COLUMNS,
            &[&item.id, &item.title, &item.done],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to put todo")?;

        tracing::debug!("Put todo with id: {}", item.id);
        Ok(())
    }

    // insert_or_update rather than update: Spanner's update fails on a
    // missing row, and callers rely on update creating it.
    async fn update(&self, id: &str, title: Option<&str>, done: Option<bool>) -> Result<()> {
        let id = id.to_string();
        let title = title.map(str::to_string);

        let mutation = insert_or_update(&self.table, &COLUMNS, &[&id, &title, &done]);

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to update todo")?;

        tracing::debug!("Updated todo with id: {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let key = id.to_string();

        self.inner
            .apply(vec![delete(&self.table, Key::new(&key))])
            .await
            .context("Failed to delete todo")?;

        tracing::debug!("Deleted todo with id: {}", id);
        Ok(())
    }
}

/// Automatically provision Spanner instance, database, and table
///
/// Checks whether the configured resources exist and creates the missing ones,
/// so local development against the emulator needs no setup.
async fn auto_provision(config: &SpannerConfig, admin_config: AdminClientConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(admin_config)
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    let lookup = admin_client
        .instance()
        .get_instance(
            GetInstanceRequest {
                name: instance_path.clone(),
                field_mask: None,
            },
            None,
        )
        .await;
    get_or_create("instance", &instance_path, lookup, || {
        create_instance(&admin_client, config, &project_path, &instance_path)
    })
    .await?;

    let lookup = admin_client
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database_path.clone(),
            },
            None,
        )
        .await;
    get_or_create("database", &database_path, lookup, || {
        create_database(&admin_client, config, &instance_path)
    })
    .await?;

    ensure_table_exists(&admin_client, &database_path, &config.table).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Run `create` when `lookup` came back NotFound; any other lookup error aborts.
async fn get_or_create<T, F, Fut>(
    kind: &str,
    path: &str,
    lookup: std::result::Result<T, Status>,
    create: F,
) -> Result<()>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match lookup {
        Ok(_) => {
            tracing::info!("{} already exists: {}", kind, path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} not found, creating: {}", kind, path);
            create().await?;
            tracing::info!("{} created: {}", kind, path);
            Ok(())
        }
        Err(status) => Err(anyhow::anyhow!(
            "Failed to check {} existence: {}",
            kind,
            status.message()
        )),
    }
}

async fn create_instance(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let instance_config = if config.emulator_host.is_some() {
        format!("{}/instanceConfigs/emulator-config", project_path)
    } else {
        format!("{}/instanceConfigs/regional-{}", project_path, config.region)
    };

    let request = CreateInstanceRequest {
        parent: project_path.to_string(),
        instance_id: config.instance.clone(),
        instance: Some(Instance {
            name: instance_path.to_string(),
            config: instance_config,
            display_name: format!("{} instance", config.instance),
            node_count: 1,
            ..Default::default()
        }),
    };

    admin_client
        .instance()
        .create_instance(request, None)
        .await
        .context("Failed to start instance creation")?
        .wait(None)
        .await
        .context("Failed to create instance")?;
    Ok(())
}

async fn create_database(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    instance_path: &str,
) -> Result<()> {
    let request = CreateDatabaseRequest {
        parent: instance_path.to_string(),
        create_statement: format!("CREATE DATABASE `{}`", config.database),
        extra_statements: vec![],
        encryption_config: None,
        database_dialect: 1, // Google Standard SQL
        proto_descriptors: vec![],
    };

    admin_client
        .database()
        .create_database(request, None)
        .await
        .context("Failed to start database creation")?
        .wait(None)
        .await
        .context("Failed to create database")?;
    Ok(())
}

async fn ensure_table_exists(
    admin_client: &AdminClient,
    database_path: &str,
    table: &str,
) -> Result<()> {
    let statements = admin_client
        .database()
        .get_database_ddl(
            GetDatabaseDdlRequest {
                database: database_path.to_string(),
            },
            None,
        )
        .await
        .context("Failed to get database DDL")?
        .into_inner()
        .statements;

    if statements.iter().any(|stmt| declares_table(stmt, table)) {
        tracing::info!("table already exists: {}", table);
        return Ok(());
    }

    tracing::info!("table not found, creating: {}", table);

    let request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![create_table_ddl(table)],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    admin_client
        .database()
        .update_database_ddl(request, None)
        .await
        .context("Failed to start table creation")?
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("table created: {}", table);
    Ok(())
}

// title and done stay nullable: a replacing update may clear them.
fn create_table_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE {} (\n    id STRING(MAX) NOT NULL,\n    title STRING(MAX),\n    done BOOL,\n) PRIMARY KEY (id)",
        table
    )
}

fn declares_table(stmt: &str, table: &str) -> bool {
    // Spanner echoes DDL back in its own canonical form; compare the leading
    // "CREATE TABLE <name> (" case-insensitively, with or without backticks.
    let normalized = stmt.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = normalized.to_ascii_lowercase();
    let table = table.to_ascii_lowercase();
    lower.starts_with(&format!("create table {} (", table))
        || lower.starts_with(&format!("create table `{}` (", table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spanner_config(instance: &str, emulator_host: Option<String>) -> SpannerConfig {
        SpannerConfig {
            emulator_host,
            project: "test-project".to_string(),
            instance: instance.to_string(),
            database: format!("{}-db", instance),
            region: "us-central1".to_string(),
            table: "todos".to_string(),
        }
    }

    fn emulator_config(instance: &str) -> SpannerConfig {
        let host = std::env::var("SPANNER_EMULATOR_HOST")
            .expect("SPANNER_EMULATOR_HOST must point at a running Spanner emulator");
        spanner_config(instance, Some(host))
    }

    #[test]
    fn test_store_is_clonable_and_send_sync() {
        fn assert_traits<T: Clone + Send + Sync>() {}
        assert_traits::<SpannerStore>();
    }

    #[test]
    fn test_create_table_ddl() {
        let ddl = create_table_ddl("todos");
        assert!(ddl.starts_with("CREATE TABLE todos ("));
        assert!(ddl.contains("id STRING(MAX) NOT NULL"));
        assert!(ddl.contains("title STRING(MAX),"));
        assert!(ddl.contains("done BOOL,"));
        assert!(ddl.ends_with("PRIMARY KEY (id)"));
    }

    #[test]
    fn test_declares_table() {
        assert!(declares_table(&create_table_ddl("todos"), "todos"));
        assert!(declares_table("CREATE TABLE `todos` (\n  id STRING(MAX) NOT NULL\n) PRIMARY KEY(id)", "todos"));
        assert!(!declares_table("CREATE TABLE todos_archive (id STRING(MAX)) PRIMARY KEY (id)", "todos"));
        assert!(!declares_table("CREATE INDEX todos_by_title ON todos(title)", "todos"));
    }

    #[test]
    fn test_only_production_requires_credentials() {
        assert!(requires_credentials(&spanner_config("prod", None)));
        assert!(!requires_credentials(&spanner_config(
            "local",
            Some("localhost:9010".to_string())
        )));
    }

    #[tokio::test]
    async fn test_emulator_configs_skip_credential_loading() {
        let config = spanner_config("local", Some("localhost:9010".to_string()));
        assert!(client_configs(&config).await.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires the Spanner emulator (SPANNER_EMULATOR_HOST)"]
    async fn test_auto_provisioning_idempotent() {
        let config = emulator_config("todo-provision-test");

        SpannerStore::from_config(&config)
            .await
            .expect("first provisioning should succeed");
        SpannerStore::from_config(&config)
            .await
            .expect("second provisioning should succeed");
    }

    #[tokio::test]
    #[ignore = "requires the Spanner emulator (SPANNER_EMULATOR_HOST)"]
    async fn test_crud_against_emulator() {
        let config = emulator_config("todo-crud-test");

        let store = SpannerStore::from_config(&config)
            .await
            .expect("Failed to create Spanner store");

        let item = TodoItem::new("Buy milk".to_string());
        store.put(&item).await.unwrap();

        let items = store.scan().await.unwrap();
        assert!(items.contains(&item), "Scan should include the stored item");

        store.update(&item.id, Some("Buy oat milk"), Some(true)).await.unwrap();
        let items = store.scan().await.unwrap();
        let updated = items.iter().find(|i| i.id == item.id).unwrap();
        assert_eq!(updated.title.as_deref(), Some("Buy oat milk"));
        assert_eq!(updated.done, Some(true));

        store.update(&item.id, None, None).await.unwrap();
        let items = store.scan().await.unwrap();
        let cleared = items.iter().find(|i| i.id == item.id).unwrap();
        assert_eq!(cleared.title, None);
        assert_eq!(cleared.done, None);

        store.delete(&item.id).await.unwrap();
        store.delete(&item.id).await.unwrap();
        let items = store.scan().await.unwrap();
        assert!(items.iter().all(|i| i.id != item.id));
    }

    #[tokio::test]
    #[ignore = "requires the Spanner emulator (SPANNER_EMULATOR_HOST)"]
    async fn test_update_unknown_id_creates_row() {
        let config = emulator_config("todo-crud-test");

        let store = SpannerStore::from_config(&config)
            .await
            .expect("Failed to create Spanner store");

        let id = uuid::Uuid::new_v4().to_string();
        store.update(&id, Some("Appeared"), None).await.unwrap();

        let items = store.scan().await.unwrap();
        let created = items.iter().find(|i| i.id == id).unwrap();
        assert_eq!(created.title.as_deref(), Some("Appeared"));
        assert_eq!(created.done, None);

        store.delete(&id).await.unwrap();
    }
}
