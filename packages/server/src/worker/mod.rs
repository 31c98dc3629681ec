//! Long-lived background loops.
//!
//! Exactly two periodic tasks run for the lifetime of the server:
//!
//! - the coalescing tick, which flushes the snapshot every `tick_interval`
//! - the retention sweep, which deletes expired rows every `sweep_interval`
//!
//! Both watch the same stop flag and are joined by [`BackgroundTasks::shutdown`].

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::usecase::{FlushSnapshotUseCase, SweepRetentionUseCase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub tick_interval: Duration,
    pub sweep_interval: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            sweep_interval: Duration::from_secs(60 * 60),
        }
    }
}

/// Handles of the running loops
pub struct BackgroundTasks {
    stop: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn spawn(
        flush: Arc<FlushSnapshotUseCase>,
        sweep: Arc<SweepRetentionUseCase>,
        settings: WorkerSettings,
    ) -> Self {
        let (stop, stop_rx) = watch::channel(false);
        let handles = vec![
            tokio::spawn(run_coalescing_loop(
                flush,
                settings.tick_interval,
                stop_rx.clone(),
            )),
            tokio::spawn(run_sweep_loop(sweep, settings.sweep_interval, stop_rx)),
        ];
        tracing::info!(
            "Background tasks started (tick every {:?}, retention sweep every {:?})",
            settings.tick_interval,
            settings.sweep_interval
        );
        Self { stop, handles }
    }

    /// Signal both loops to stop and wait for them to finish.
    pub async fn shutdown(self) {
        // Receivers live inside the loops; a send error means both already exited
        let _ = self.stop.send(true);
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!("Background task ended abnormally: {}", e);
            }
        }
        tracing::info!("Background tasks stopped");
    }
}

/// `true` once the stop flag is raised or its sender is gone
async fn stop_requested(stop: &mut watch::Receiver<bool>) -> bool {
    match stop.changed().await {
        Ok(()) => *stop.borrow(),
        Err(_) => true,
    }
}

async fn run_coalescing_loop(
    flush: Arc<FlushSnapshotUseCase>,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Encoding failures drop this tick's sample only
                if let Err(e) = flush.execute().await {
                    tracing::warn!("Coalescing tick failed: {}", e);
                }
            }
            stopped = stop_requested(&mut stop) => {
                if stopped {
                    break;
                }
            }
        }
    }
    tracing::debug!("Coalescing loop stopped");
}

async fn run_sweep_loop(
    sweep: Arc<SweepRetentionUseCase>,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = sweep.execute().await {
                    tracing::error!("Retention sweep failed, retrying at next sweep: {}", e);
                }
            }
            stopped = stop_requested(&mut stop) => {
                if stopped {
                    break;
                }
            }
        }
    }
    tracing::debug!("Retention sweep loop stopped");
}
