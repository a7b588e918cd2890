//! Test doubles for the push engine.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use torchi_core::traits::{DeliveryError, PushMessage, PushTransport};
use torchi_entity::device::PushTarget;

/// Records every delivery and optionally fails the n-th one (1-based).
#[derive(Default)]
pub struct RecordingTransport {
    pub calls: Mutex<Vec<(PushTarget, PushMessage)>>,
    pub fail_on: Option<usize>,
    pub observer: Option<mpsc::UnboundedSender<Uuid>>,
}

impl RecordingTransport {
    pub fn failing_on(n: usize) -> Self {
        Self {
            fail_on: Some(n),
            ..Self::default()
        }
    }

    pub fn observed(observer: mpsc::UnboundedSender<Uuid>) -> Self {
        Self {
            observer: Some(observer),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|c| c.iter().map(|(t, _)| t.endpoint.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn deliver(
        &self,
        target: &PushTarget,
        message: &PushMessage,
    ) -> Result<(), DeliveryError> {
        let n = {
            let mut calls = self.calls.lock().expect("calls lock");
            calls.push((target.clone(), message.clone()));
            calls.len()
        };
        if let (Some(observer), Some(id)) = (&self.observer, message.notification_id) {
            let _ = observer.send(id);
        }
        tokio::task::yield_now().await;
        if self.fail_on == Some(n) {
            return Err(DeliveryError::Gone);
        }
        Ok(())
    }
}
