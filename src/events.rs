// Copyright 2026 Pagemirror Contributors
// SPDX-License-Identifier: Apache-2.0

//! Capture event bus — typed progress events from the engine.
//!
//! The [`EventBus`] is a `tokio::sync::broadcast` channel carrying
//! [`CaptureEvent`] values. The CLI progress bar subscribes to it; when no
//! subscriber exists, events are silently dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Every event the capture engine emits. Serialized to JSON for machine
/// consumers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CaptureEvent {
    /// A capture run has started.
    CaptureStarted { url: String },
    /// The page rendered and its asset references were discovered.
    PageRendered { url: String, asset_count: usize },
    /// One asset was fetched and written to the output directory.
    AssetFetched { url: String, bytes: u64 },
    /// One asset failed and was skipped.
    AssetSkipped { url: String, reason: String },
    /// The run completed with a written root document.
    CaptureFinished {
        total_files: u64,
        total_size: u64,
        duration_ms: u64,
    },
    /// The run failed before the root document was written.
    CaptureFailed { url: String, error: String },
}

/// Broadcast channel for capture events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CaptureEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.sender.subscribe()
    }

    /// Emit an event. Dropped silently when nobody is subscribed.
    pub fn emit(&self, event: CaptureEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_subscribers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(CaptureEvent::CaptureStarted {
            url: "https://example.com".to_string(),
        });
        match rx.recv().await {
            Ok(CaptureEvent::CaptureStarted { url }) => assert_eq!(url, "https://example.com"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn emit_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.emit(CaptureEvent::CaptureFailed {
            url: "https://example.com".to_string(),
            error: "boom".to_string(),
        });
    }
}
