use std::time::Duration;

use chrono::Utc;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info, warn};

use crate::{clients::backend::BackendClient, models::message::MessagesSnapshot};

pub struct MessagePoller;

impl MessagePoller {
    /// Fetches messages now and then every `period` until the handle shuts down.
    pub fn spawn(client: BackendClient, period: Duration) -> PollerHandle {
        let (snapshot_tx, snapshot_rx) = watch::channel(MessagesSnapshot::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(interval_secs = period.as_secs(), "Message poller started");

        let task = tokio::spawn(run(client, period, snapshot_tx, shutdown_rx));

        PollerHandle {
            shutdown: shutdown_tx,
            snapshots: snapshot_rx,
            task: Some(task),
        }
    }
}

pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    snapshots: watch::Receiver<MessagesSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<MessagesSnapshot> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> MessagesSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stops the timer and cancels a fetch that is still in flight.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);

        let Some(task) = self.task.take() else {
            return;
        };

        if let Err(e) = task.await {
            warn!(error = %e, "Message poller task ended abnormally");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    client: BackendClient,
    period: Duration,
    snapshots: watch::Sender<MessagesSnapshot>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = shutdown.changed() => {
                debug!("Cancelling in-flight message fetch");
                break;
            }
            result = client.list_messages() => result,
        };

        snapshots.send_modify(|snapshot| match result {
            Ok(messages) => {
                debug!(message_count = messages.len(), "Message list refreshed");
                snapshot.messages = messages;
                snapshot.error = None;
                snapshot.fetched_at = Some(Utc::now());
            }
            Err(e) => {
                warn!(error = %e, "Message poll failed");
                snapshot.error = Some(e.to_string());
            }
        });
    }

    info!("Message poller stopped");
}
