//! Command-line / environment configuration.

use std::time::Duration;

use clap::Parser;

use crate::{infrastructure::broker::BatchSettings, worker::WorkerSettings};

#[derive(Parser, Debug, Clone)]
#[command(name = "gaze-relay-server")]
#[command(about = "Gaze telemetry relay: coalesce, publish and broadcast", long_about = None)]
pub struct Config {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Comma-separated Kafka bootstrap servers; broker records are only logged when unset
    #[arg(long, env = "KAFKA_BROKERS")]
    pub kafka_brokers: Option<String>,

    /// Topic receiving gaze samples and page changes
    #[arg(long, env = "KAFKA_TOPIC", default_value = "gaze-data")]
    pub kafka_topic: String,

    /// PostgreSQL connection string; an in-memory store is used when unset
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Coalescing window in milliseconds
    #[arg(long, env = "TICK_INTERVAL_MS", default_value = "100")]
    pub tick_interval_ms: u64,

    /// Retention sweep period in seconds
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value = "3600")]
    pub sweep_interval_secs: u64,

    /// Rows older than this many days are deleted by the sweep
    #[arg(long, env = "RETENTION_DAYS", default_value = "7")]
    pub retention_days: u64,

    /// Maximum number of broker messages per batch
    #[arg(long, env = "BATCH_SIZE", default_value = "100")]
    pub batch_size: usize,

    /// Maximum time a broker message waits for its batch, in milliseconds
    #[arg(long, env = "BATCH_TIMEOUT_MS", default_value = "100")]
    pub batch_timeout_ms: u64,

    /// Close a viewer connection after this many seconds without any frame
    #[arg(long, env = "IDLE_TIMEOUT_SECS", default_value = "60")]
    pub idle_timeout_secs: u64,

    /// Interval between server-sent pings, in seconds
    #[arg(long, env = "PING_INTERVAL_SECS", default_value = "20")]
    pub ping_interval_secs: u64,

    /// Close a viewer connection whose socket accepts no frame for this many seconds
    #[arg(long, env = "WRITE_TIMEOUT_SECS", default_value = "10")]
    pub write_timeout_secs: u64,

    /// Messages queued per viewer before it is dropped as too slow
    #[arg(long, env = "OUTBOUND_QUEUE_CAPACITY", default_value = "64")]
    pub outbound_queue_capacity: usize,
}

/// Per-connection timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub idle_timeout: Duration,
    pub ping_interval: Duration,
    /// Upper bound for a single socket write
    pub write_timeout: Duration,
    /// Capacity of the per-connection outbound queue
    pub outbound_capacity: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(60),
            ping_interval: Duration::from_secs(20),
            write_timeout: Duration::from_secs(10),
            outbound_capacity: 64,
        }
    }
}

/// Durations derived from [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub worker: WorkerSettings,
    pub batch: BatchSettings,
    pub connection: ConnectionSettings,
    pub retention: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            worker: WorkerSettings::default(),
            batch: BatchSettings::default(),
            connection: ConnectionSettings::default(),
            retention: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl Config {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            worker: WorkerSettings {
                // A zero period would make tokio's interval panic
                tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
                sweep_interval: Duration::from_secs(self.sweep_interval_secs.max(1)),
            },
            batch: BatchSettings {
                max_batch_size: self.batch_size.max(1),
                max_batch_delay: Duration::from_millis(self.batch_timeout_ms),
            },
            connection: ConnectionSettings {
                idle_timeout: Duration::from_secs(self.idle_timeout_secs.max(1)),
                ping_interval: Duration::from_secs(self.ping_interval_secs.max(1)),
                write_timeout: Duration::from_secs(self.write_timeout_secs.max(1)),
                // mpsc::channel panics on a zero capacity
                outbound_capacity: self.outbound_queue_capacity.max(1),
            },
            retention: Duration::from_secs(self.retention_days.saturating_mul(24 * 60 * 60)),
        }
    }
}
