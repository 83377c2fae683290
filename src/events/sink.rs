//! Event sinks
//!
//! Walkers hand every location event to an [`EventSink`]. Delivery is fire and
//! forget: a failed delivery is reported back to the walker, which logs it and moves
//! on without retrying.

use async_trait::async_trait;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::events::LocationEvent;

/// Errors reported by an event sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// Endpoint answered with a non-2xx status
    #[error("endpoint rejected event with status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Endpoint could not be reached or timed out
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    /// Sink could not be constructed
    #[error("sink setup failed: {0}")]
    Setup(String),
}

/// Destination for location events
#[async_trait]
pub trait EventSink: Send + Sync + fmt::Debug {
    /// Deliver one event
    async fn deliver(&self, event: LocationEvent) -> Result<(), SinkError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Sink posting each event as JSON to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpEventSink {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpEventSink {
    /// Create a sink posting to `endpoint` with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("indoor-asset-simulator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SinkError::Setup(e.to_string()))?;
        Ok(Self { endpoint: endpoint.into(), http_client })
    }

    /// Endpoint events are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn deliver(&self, event: LocationEvent) -> Result<(), SinkError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&event)
            .send()
            .await
            .map_err(|e| SinkError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Rejected { status: status.as_u16(), body })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Sink writing each event to the log instead of the network
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl EventSink for LogSink {
    async fn deliver(&self, event: LocationEvent) -> Result<(), SinkError> {
        let payload =
            serde_json::to_string(&event).map_err(|e| SinkError::Setup(e.to_string()))?;
        info!(asset_id = %event.object_id, %payload, "Location event");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Sink keeping every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LocationEvent>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far
    pub fn events(&self) -> Vec<LocationEvent> {
        self.buffer().clone()
    }

    /// Number of events received so far
    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    /// Whether no event has been received
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Events pushed before a panic are still valid after the lock is poisoned
    fn buffer(&self) -> MutexGuard<'_, Vec<LocationEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| {
            warn!("Memory sink lock was poisoned, recovering recorded events");
            poisoned.into_inner()
        })
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn deliver(&self, event: LocationEvent) -> Result<(), SinkError> {
        debug!(asset_id = %event.object_id, "Recording location event");
        self.buffer().push(event);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetProfile;
    use crate::facility::Position;
    use crate::types::{AssetCategory, AssetId, DeviceKind};
    use chrono::Utc;
    use mockito::{Matcher, Server};

    fn sample_event() -> LocationEvent {
        let profile = AssetProfile::new(AssetCategory::CateringCart, DeviceKind::Android, 3, 3857);
        LocationEvent::new(AssetId::new(), &profile, Position::new(100.0, 200.0), 2, Utc::now())
    }

    #[tokio::test]
    async fn test_http_sink_posts_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/events")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "objectDesc": "catering_cart",
                "device": "android",
                "geometry": {"z": "3", "spatialReference": {"wkid": 3857}}
            })))
            .with_status(201)
            .create_async()
            .await;

        let sink = HttpEventSink::new(format!("{}/events", server.url()), Duration::from_secs(5))
            .unwrap();
        sink.deliver(sample_event()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_sink_reports_rejection() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/events")
            .with_status(500)
            .with_body("ingest down")
            .create_async()
            .await;

        let sink = HttpEventSink::new(format!("{}/events", server.url()), Duration::from_secs(5))
            .unwrap();
        let result = sink.deliver(sample_event()).await;

        match result {
            Err(SinkError::Rejected { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "ingest down");
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_sink_reports_unreachable_endpoint() {
        // Port 9 (discard) is closed on test machines
        let sink = HttpEventSink::new("http://127.0.0.1:9/events", Duration::from_secs(2)).unwrap();
        let result = sink.deliver(sample_event()).await;
        assert!(matches!(result, Err(SinkError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_log_sink_accepts_everything() {
        let sink = LogSink;
        assert!(sink.deliver(sample_event()).await.is_ok());
        assert_eq!(sink.name(), "log");
    }

    #[tokio::test]
    async fn test_memory_sink_records_events() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        let event = sample_event();
        sink.deliver(event.clone()).await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events()[0], event);
    }

    #[tokio::test]
    async fn test_memory_sink_keeps_events_after_poisoned_lock() {
        let sink = std::sync::Arc::new(MemorySink::new());
        let event = sample_event();
        sink.deliver(event.clone()).await.unwrap();

        let holder = std::sync::Arc::clone(&sink);
        let panicked = std::thread::spawn(move || {
            let _guard = holder.events.lock().unwrap();
            panic!("panic while holding the event buffer");
        })
        .join();
        assert!(panicked.is_err());
        assert!(sink.events.is_poisoned());

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events(), vec![event.clone()]);

        sink.deliver(event).await.unwrap();
        assert_eq!(sink.len(), 2);
    }
}
