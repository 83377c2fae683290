//! Location events and their delivery
//!
//! # Overview
//!
//! - **LocationEvent**: per-tick snapshot of an asset, serialized in the ingestion
//!   endpoint's wire format
//! - **EventSink**: delivery trait implemented by `HttpEventSink`, `LogSink` and
//!   `MemorySink`
//!
//! # Usage Example
//!
//! ```rust
//! use indoor_asset_simulator::asset::AssetProfile;
//! use indoor_asset_simulator::events::*;
//! use indoor_asset_simulator::facility::Position;
//! use indoor_asset_simulator::types::*;
//!
//! let profile = AssetProfile::new(AssetCategory::Visitor, DeviceKind::Android, 1, 3857);
//! let event = LocationEvent::new(AssetId::new(), &profile, Position::new(5.0, 5.0), 1, chrono::Utc::now());
//!
//! let json = serde_json::to_string(&event).unwrap();
//! assert!(json.contains("\"objectDesc\":\"visitor\""));
//! ```

pub mod location_event;
pub mod sink;

// Re-export all public types for convenience
pub use location_event::*;
pub use sink::*;
