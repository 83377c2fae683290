//! Asset profiles
//!
//! A profile is the immutable description of one simulated asset: what it is,
//! which device reports it and where in the building it walks.

use serde::{Deserialize, Serialize};

use crate::types::{AssetCategory, DeviceKind};

/// Immutable description of one simulated asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetProfile {
    /// What kind of asset this is
    pub category: AssetCategory,
    /// Platform reporting the position
    pub device: DeviceKind,
    /// Floor the asset walks on
    pub floor: i32,
    /// Spatial reference of the boundary coordinates
    pub wkid: u32,
}

impl AssetProfile {
    /// Create a new asset profile
    pub fn new(category: AssetCategory, device: DeviceKind, floor: i32, wkid: u32) -> Self {
        Self { category, device, floor, wkid }
    }

    /// Floor as reported in the event geometry's `z`
    pub fn floor_label(&self) -> String {
        self.floor.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_creation() {
        let profile = AssetProfile::new(AssetCategory::Wheelchair, DeviceKind::Ios, 2, 3857);

        assert_eq!(profile.category, AssetCategory::Wheelchair);
        assert_eq!(profile.device, DeviceKind::Ios);
        assert_eq!(profile.floor_label(), "2");
        assert_eq!(profile.wkid, 3857);
    }

    #[test]
    fn test_profile_serialization() {
        let profile = AssetProfile::new(AssetCategory::CateringCart, DeviceKind::Android, -1, 4326);
        let json = serde_json::to_string(&profile).unwrap();

        assert!(json.contains("\"catering_cart\""));
        assert!(json.contains("\"android\""));
        let deserialized: AssetProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, deserialized);
    }
}
