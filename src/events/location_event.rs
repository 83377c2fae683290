//! Location events
//!
//! One `LocationEvent` is produced per walker tick and handed to an event sink. The
//! serialized form is the ingestion endpoint's wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::AssetProfile;
use crate::facility::{projection, Position};
use crate::types::{AssetCategory, AssetId, DeviceKind};

/// Spatial reference of an event geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    /// Well-known ID of the coordinate system
    pub wkid: u32,
}

/// Position of an event in the boundary's coordinate system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventGeometry {
    /// Easting in boundary units
    pub x: f64,
    /// Northing in boundary units
    pub y: f64,
    /// Floor label
    pub z: String,
    /// Coordinate system of `x` and `y`
    #[serde(rename = "spatialReference")]
    pub spatial_reference: SpatialReference,
}

/// Snapshot of one asset's position at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEvent {
    /// Position in boundary coordinates
    pub geometry: EventGeometry,
    /// Reporting platform
    pub device: DeviceKind,
    /// Stable identifier of the asset
    pub object_id: AssetId,
    /// Asset category
    pub object_desc: AssetCategory,
    /// WGS84 latitude in degrees
    pub lat: f64,
    /// WGS84 longitude in degrees
    pub lon: f64,
    /// Reported accuracy estimate
    pub accuracy: u8,
    /// Time the snapshot was taken
    pub timerecordstamp: DateTime<Utc>,
}

impl LocationEvent {
    /// Build an event for `profile` at `position`
    pub fn new(
        object_id: AssetId,
        profile: &AssetProfile,
        position: Position,
        accuracy: u8,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (lat, lon) = projection::to_lat_lon(position, profile.wkid);
        Self {
            geometry: EventGeometry {
                x: position.x,
                y: position.y,
                z: profile.floor_label(),
                spatial_reference: SpatialReference { wkid: profile.wkid },
            },
            device: profile.device,
            object_id,
            object_desc: profile.category,
            lat,
            lon,
            accuracy,
            timerecordstamp: timestamp,
        }
    }

    /// Position carried by the event
    pub fn position(&self) -> Position {
        Position::new(self.geometry.x, self.geometry.y)
    }

    /// Whether both events describe the same observation, ignoring timestamp and accuracy
    pub fn same_observation(&self, other: &LocationEvent) -> bool {
        self.geometry == other.geometry
            && self.device == other.device
            && self.object_id == other.object_id
            && self.object_desc == other.object_desc
            && self.lat == other.lat
            && self.lon == other.lon
    }
}
