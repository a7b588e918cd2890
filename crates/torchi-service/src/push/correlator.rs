//! Process-local registry pairing a notification id with the one caller
//! waiting for its reaction.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use torchi_core::error::AppError;
use torchi_core::result::AppResult;

/// Maps notification ids to single-use reply channels.
///
/// Nothing here survives a restart and nothing is shared between
/// processes. A reply arriving while no one waits is dropped; the ledger
/// still has it.
#[derive(Debug, Default)]
pub struct ReplyCorrelator {
    waiters: DashMap<Uuid, oneshot::Sender<String>>,
}

impl ReplyCorrelator {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the waiter for `id`.
    ///
    /// The returned guard removes the entry when dropped, whichever way the
    /// waiting call ends. Fails with `Conflict` if `id` already has a waiter.
    pub fn register(self: &Arc<Self>, id: Uuid) -> AppResult<WaiterGuard> {
        let (tx, rx) = oneshot::channel();
        match self.waiters.entry(id) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(format!(
                    "Notification {id} already has a waiter"
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(tx);
            }
        }
        debug!(notification_id = %id, "Reply waiter registered");
        Ok(WaiterGuard {
            correlator: Arc::clone(self),
            id,
            receiver: rx,
        })
    }

    /// Hand `value` to the waiter for `id`.
    ///
    /// Returns `true` only if a waiter existed and was still listening. The
    /// entry is consumed either way, so a second reply is never delivered.
    pub fn deliver(&self, id: Uuid, value: String) -> bool {
        let Some((_, sender)) = self.waiters.remove(&id) else {
            return false;
        };
        sender.send(value).is_ok()
    }

    /// Drop the waiter for `id`, if any.
    pub fn remove(&self, id: Uuid) {
        self.waiters.remove(&id);
    }

    /// Check whether `id` has a registered waiter.
    pub fn contains(&self, id: Uuid) -> bool {
        self.waiters.contains_key(&id)
    }

    /// Number of registered waiters.
    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    /// Whether no waiter is registered.
    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}

/// Ownership of one registered waiter.
#[derive(Debug)]
pub struct WaiterGuard {
    correlator: Arc<ReplyCorrelator>,
    id: Uuid,
    receiver: oneshot::Receiver<String>,
}

impl WaiterGuard {
    /// The notification id this guard waits on.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the reply until `deadline`.
    ///
    /// Fails with `Timeout` when the deadline passes first.
    pub async fn wait_until(mut self, deadline: Instant) -> AppResult<String> {
        match tokio::time::timeout_at(deadline, &mut self.receiver).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(AppError::internal(format!(
                "Reply channel for notification {} closed",
                self.id
            ))),
            Err(_) => Err(AppError::timeout(format!(
                "No reaction to notification {}",
                self.id
            ))),
        }
    }

    /// Wait for the reply for at most `timeout`.
    pub async fn wait(self, timeout: Duration) -> AppResult<String> {
        self.wait_until(Instant::now() + timeout).await
    }
}

impl Drop for WaiterGuard {
    fn drop(&mut self) {
        self.correlator.remove(self.id);
    }
}
