//! ブローカーへの publish の実装
//!
//! - `batching`: 呼び出し側には即座に戻り、サイズまたは時間の閾値でまとめて送信する publisher
//! - `tracing_sink`: バッチをログに出力するだけのトランスポート（ブローカー未設定時）
//! - `kafka`: rdkafka を使ったトランスポート（`kafka` feature）

pub mod batching;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod tracing_sink;

pub use batching::{BatchSettings, BatchingPublisher};
#[cfg(feature = "kafka")]
pub use kafka::KafkaTransport;
pub use tracing_sink::TracingTransport;
