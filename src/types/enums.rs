//! Enumeration types for the asset simulator
//!
//! This module contains the asset categories and device kinds that make up an
//! asset's profile. Their serialized forms are the exact strings the ingestion
//! endpoint expects in `objectDesc` and `device`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of asset moving through the building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Security staff on patrol
    Security,
    /// Conference visitors
    Visitor,
    /// Wheelchairs
    Wheelchair,
    /// Catering carts
    CateringCart,
}

impl AssetCategory {
    /// All categories, in the order populations are generated
    pub const ALL: [AssetCategory; 4] = [
        AssetCategory::Security,
        AssetCategory::Visitor,
        AssetCategory::Wheelchair,
        AssetCategory::CateringCart,
    ];

    /// Wire name used in `objectDesc`
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Security => "security",
            AssetCategory::Visitor => "visitor",
            AssetCategory::Wheelchair => "wheelchair",
            AssetCategory::CateringCart => "catering_cart",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "security" => Ok(AssetCategory::Security),
            "visitor" => Ok(AssetCategory::Visitor),
            "wheelchair" => Ok(AssetCategory::Wheelchair),
            "catering_cart" | "catering cart" | "cateringcart" => Ok(AssetCategory::CateringCart),
            _ => Err(format!("Unknown asset category: {}", s)),
        }
    }
}

/// Mobile platform reporting the asset's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Android handset or tag
    Android,
    /// iOS handset
    Ios,
}

impl DeviceKind {
    /// Both device kinds, chosen between uniformly during population generation
    pub const ALL: [DeviceKind; 2] = [DeviceKind::Android, DeviceKind::Ios];
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Android => write!(f, "android"),
            DeviceKind::Ios => write!(f, "ios"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "android" => Ok(DeviceKind::Android),
            "ios" => Ok(DeviceKind::Ios),
            _ => Err(format!("Unknown device kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_category_display() {
        assert_eq!(format!("{}", AssetCategory::Security), "security");
        assert_eq!(format!("{}", AssetCategory::Visitor), "visitor");
        assert_eq!(format!("{}", AssetCategory::Wheelchair), "wheelchair");
        assert_eq!(format!("{}", AssetCategory::CateringCart), "catering_cart");
    }

    #[test]
    fn test_asset_category_from_str() {
        assert_eq!("security".parse::<AssetCategory>().unwrap(), AssetCategory::Security);
        assert_eq!("VISITOR".parse::<AssetCategory>().unwrap(), AssetCategory::Visitor);
        assert_eq!("catering cart".parse::<AssetCategory>().unwrap(), AssetCategory::CateringCart);
        assert_eq!("catering_cart".parse::<AssetCategory>().unwrap(), AssetCategory::CateringCart);

        assert!("forklift".parse::<AssetCategory>().is_err());
    }

    #[test]
    fn test_device_kind_from_str() {
        assert_eq!("android".parse::<DeviceKind>().unwrap(), DeviceKind::Android);
        assert_eq!("iOS".parse::<DeviceKind>().unwrap(), DeviceKind::Ios);
        assert!("symbian".parse::<DeviceKind>().is_err());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&AssetCategory::CateringCart).unwrap(), "\"catering_cart\"");
        assert_eq!(serde_json::to_string(&DeviceKind::Ios).unwrap(), "\"ios\"");

        let category: AssetCategory = serde_json::from_str("\"wheelchair\"").unwrap();
        assert_eq!(category, AssetCategory::Wheelchair);
    }

    #[test]
    fn test_category_order() {
        assert_eq!(AssetCategory::ALL.len(), 4);
        assert_eq!(AssetCategory::ALL[0], AssetCategory::Security);
        assert_eq!(AssetCategory::ALL[3], AssetCategory::CateringCart);
    }
}
