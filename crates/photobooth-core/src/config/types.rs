//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Deployment mode reported by the health check ("develop", "test", "prod")
    pub mode: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            mode: "develop".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which queue implementation carries submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    /// In-process channel; producer and worker must share a process
    Memory,
    /// Redis list, shared between processes
    Redis,
}

/// Work queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub backend: QueueBackend,

    /// Connection URL (supports ${ENV_VAR} syntax)
    pub url: String,

    /// Well-known queue name shared by producer and worker
    pub name: String,

    /// Deadline for a single publish in milliseconds
    pub publish_timeout_ms: u64,

    /// Blocking-receive window in seconds; an empty window is not a fault
    pub receive_timeout_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: QueueBackend::Memory,
            url: "${PHOTOBOOTH_REDIS_URL}".to_string(),
            name: "photos".to_string(),
            publish_timeout_ms: 3000,
            receive_timeout_secs: 5,
        }
    }
}

/// Which store implementation holds records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map; contents are lost on exit
    Memory,
    /// PostgreSQL via sea-orm
    Postgres,
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Connection URL (supports ${ENV_VAR} syntax)
    pub url: String,

    /// Connection pool size
    pub max_connections: u32,

    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Create the `photos` table at startup if it does not exist
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: "${PHOTOBOOTH_DATABASE_URL}".to_string(),
            max_connections: 10,
            connect_timeout_ms: 5000,
            run_migrations: true,
        }
    }
}

/// Pipeline worker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Pause before re-subscribing after a fault, in milliseconds
    pub restart_delay_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: 20_000,
        }
    }
}

/// Derivative encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivativeConfig {
    /// JPEG quality factor for every derivative (1-100)
    pub jpeg_quality: u8,
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        Self { jpeg_quality: 20 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
