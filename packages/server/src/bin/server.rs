//! Gaze telemetry relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin gaze-relay-server
//! cargo run --bin gaze-relay-server -- --host 0.0.0.0 --port 3000
//! DATABASE_URL=postgres://... cargo run --bin gaze-relay-server
//! cargo run --features kafka --bin gaze-relay-server -- --kafka-brokers localhost:9092
//! ```

use std::sync::Arc;

use clap::Parser;
use gaze_relay_server::{
    config::Config,
    domain::{BrokerTransport, GazeRepository},
    engine,
    infrastructure::{broker::TracingTransport, repository::InMemoryGazeRepository},
    ui::Server,
};
use gaze_relay_shared::{logger::setup_logger, time::SystemClock};

#[cfg(feature = "kafka")]
fn build_transport(config: &Config) -> Result<Arc<dyn BrokerTransport>, Box<dyn std::error::Error>> {
    use gaze_relay_server::infrastructure::broker::KafkaTransport;

    match &config.kafka_brokers {
        Some(brokers) => {
            let transport = KafkaTransport::new(brokers, &config.kafka_topic)?;
            Ok(Arc::new(transport))
        }
        None => {
            tracing::warn!("KAFKA_BROKERS not set; broker records will only be logged");
            Ok(Arc::new(TracingTransport::new(&config.kafka_topic)))
        }
    }
}

#[cfg(not(feature = "kafka"))]
fn build_transport(config: &Config) -> Result<Arc<dyn BrokerTransport>, Box<dyn std::error::Error>> {
    if config.kafka_brokers.is_some() {
        tracing::warn!("Built without the `kafka` feature; broker records will only be logged");
    }
    Ok(Arc::new(TracingTransport::new(&config.kafka_topic)))
}

#[cfg(feature = "postgres")]
async fn build_repository(
    config: &Config,
) -> Result<Arc<dyn GazeRepository>, Box<dyn std::error::Error>> {
    use gaze_relay_server::infrastructure::repository::PostgresGazeRepository;

    match &config.database_url {
        Some(url) => Ok(Arc::new(PostgresGazeRepository::connect(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory storage");
            Ok(Arc::new(InMemoryGazeRepository::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_repository(
    config: &Config,
) -> Result<Arc<dyn GazeRepository>, Box<dyn std::error::Error>> {
    if config.database_url.is_some() {
        tracing::warn!("Built without the `postgres` feature; using in-memory storage");
    }
    Ok(Arc::new(InMemoryGazeRepository::new()))
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize dependencies in order:
    // 1. Repository / broker transport
    // 2. Engine (state, publisher, UseCases, background loops)
    // 3. Server
    let repository = build_repository(&config).await?;
    let transport = build_transport(&config)?;

    let (app_state, runtime) = engine::start(
        config.engine_settings(),
        repository,
        transport,
        Arc::new(SystemClock),
    );

    let result = Server::new(app_state).run(config.host, config.port).await;

    // Flush pending broker messages even if the server failed
    runtime.shutdown().await;
    result
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = Config::parse();
    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
