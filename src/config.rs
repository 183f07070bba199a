use std::env;
use std::time::Duration;
use anyhow::{bail, Context, Result};

/// Connection settings for the Spanner-backed store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
    pub region: String,
    pub table: String,
}

impl SpannerConfig {
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}

/// Which store implementation backs the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Spanner(SpannerConfig),
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub store_timeout: Duration,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("TODO_STORE").unwrap_or_else(|| "spanner".to_string());

        let store = match backend.as_str() {
            "spanner" => StoreBackend::Spanner(spanner_from_lookup(&lookup)?),
            "memory" => StoreBackend::Memory,
            other => bail!("TODO_STORE must be one of: spanner, memory, got '{}'", other),
        };

        let timeout_secs = lookup("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u64>()
            .context("STORE_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("STORE_TIMEOUT_SECS must be greater than zero");
        }

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            store,
            store_timeout: Duration::from_secs(timeout_secs),
            service_port,
            service_host,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.store {
            StoreBackend::Spanner(spanner) => {
                tracing::info!("  Store: spanner");
                tracing::info!("  Spanner emulator: {}",
                    spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
                tracing::info!("  Spanner project: {}", spanner.project);
                tracing::info!("  Spanner instance: {}", spanner.instance);
                tracing::info!("  Spanner database: {}", spanner.database);
                tracing::info!("  Spanner region: {}", spanner.region);
                tracing::info!("  Todos table: {}", spanner.table);
            }
            StoreBackend::Memory => {
                tracing::info!("  Store: memory (data is lost on shutdown)");
            }
        }
        tracing::info!("  Store timeout: {:?}", self.store_timeout);
        tracing::info!("  Service listening on: {}", self.bind_address());
    }
}

fn spanner_from_lookup<F>(lookup: &F) -> Result<SpannerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key).with_context(|| format!("{} environment variable is required", key))
    };

    let table = lookup("TODOS_TABLE").unwrap_or_else(|| "todos".to_string());
    if !is_valid_table_name(&table) {
        bail!(
            "TODOS_TABLE must start with a letter and contain only letters, digits and '_', got '{}'",
            table
        );
    }

    Ok(SpannerConfig {
        emulator_host: lookup("SPANNER_EMULATOR_HOST"),
        project: required("SPANNER_PROJECT")?,
        instance: required("SPANNER_INSTANCE")?,
        database: required("SPANNER_DATABASE")?,
        region: lookup("SPANNER_REGION").unwrap_or_else(|| "us-central1".to_string()),
        table,
    })
}

// The table name is spliced into SQL and DDL text.
fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
