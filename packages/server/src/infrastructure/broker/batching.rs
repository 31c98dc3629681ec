//! Batching broker publisher.
//!
//! `publish` only enqueues; a dedicated task accumulates messages until either
//! `max_batch_size` messages are pending or `max_batch_delay` has elapsed since
//! the first one, then hands the batch to the transport. A failed batch is
//! reported through each message's receipt and never retried.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::Instant,
};

use crate::domain::{BrokerError, BrokerMessage, BrokerTransport, MessageBroker, PublishReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    pub max_batch_size: usize,
    pub max_batch_delay: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_batch_size: 100,
            max_batch_delay: Duration::from_millis(100),
        }
    }
}

struct Pending {
    message: BrokerMessage,
    reply: oneshot::Sender<Result<(), BrokerError>>,
}

enum Command {
    Publish(Pending),
    /// Flush what is already batched and stop
    Close,
}

pub struct BatchingPublisher {
    commands: mpsc::UnboundedSender<Command>,
}

impl BatchingPublisher {
    /// Start the batching task.
    ///
    /// The returned handle completes after [`BatchingPublisher::close`] once the
    /// last batch has been transmitted.
    pub fn spawn(
        transport: Arc<dyn BrokerTransport>,
        settings: BatchSettings,
    ) -> (Self, JoinHandle<()>) {
        let (commands, rx) = mpsc::unbounded_channel();
        let settings = BatchSettings {
            max_batch_size: settings.max_batch_size.max(1),
            ..settings
        };
        let handle = tokio::spawn(run_batch_loop(rx, transport, settings));
        (Self { commands }, handle)
    }

    /// Ask the batching task to flush and stop.
    pub fn close(&self) {
        // Already stopped if the receiver is gone
        let _ = self.commands.send(Command::Close);
    }
}

impl MessageBroker for BatchingPublisher {
    fn publish(&self, message: BrokerMessage) -> Result<PublishReceipt, BrokerError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Publish(Pending { message, reply }))
            .map_err(|_| BrokerError::Closed)?;
        Ok(PublishReceipt::new(rx))
    }
}

async fn run_batch_loop(
    mut rx: mpsc::UnboundedReceiver<Command>,
    transport: Arc<dyn BrokerTransport>,
    settings: BatchSettings,
) {
    let mut closing = false;
    while !closing {
        let first = match rx.recv().await {
            Some(Command::Publish(pending)) => pending,
            Some(Command::Close) | None => break,
        };

        let mut batch = vec![first];
        let deadline = Instant::now() + settings.max_batch_delay;
        while batch.len() < settings.max_batch_size {
            tokio::select! {
                command = rx.recv() => match command {
                    Some(Command::Publish(pending)) => batch.push(pending),
                    Some(Command::Close) | None => {
                        closing = true;
                        break;
                    }
                },
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }

        transmit(transport.as_ref(), batch).await;
    }
    tracing::debug!("Broker batching task stopped");
}

async fn transmit(transport: &dyn BrokerTransport, batch: Vec<Pending>) {
    let (messages, replies): (Vec<BrokerMessage>, Vec<_>) = batch
        .into_iter()
        .map(|pending| (pending.message, pending.reply))
        .unzip();

    let result = transport.send_batch(&messages).await;
    match &result {
        Ok(()) => tracing::trace!("Sent batch of {} message(s) to broker", messages.len()),
        Err(e) => tracing::debug!(
            "Batch of {} message(s) failed: {}",
            messages.len(),
            e
        ),
    }

    for reply in replies {
        // The caller may have dropped its receipt
        let _ = reply.send(result.clone());
    }
}
