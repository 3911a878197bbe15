//! Channel-backed [`ControlInputSource`] used by the registry.

use std::time::Duration;

use async_trait::async_trait;
use qbot_core::{ControlInputSource, NavEvent, Result};
use tokio::sync::mpsc;

/// Receives navigation events routed to one surface.
pub struct ChannelInput {
    rx: mpsc::Receiver<NavEvent>,
}

impl ChannelInput {
    pub fn new(rx: mpsc::Receiver<NavEvent>) -> Self {
        Self { rx }
    }

    /// Stops accepting events; later sends fail.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[async_trait]
impl ControlInputSource for ChannelInput {
    async fn next_event(&mut self, timeout: Duration) -> Result<Option<NavEvent>> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(event)) => Ok(Some(event)),
            // Every sender is gone, so nothing more can arrive: wait out the timeout.
            Ok(None) => {
                tokio::time::sleep(timeout).await;
                Ok(None)
            }
            Err(_) => Ok(None),
        }
    }
}
