//! Core types and identifiers for the asset simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: UUID-based asset identifiers
//! - **Enums**: Asset categories and device kinds
//! - **Configuration**: Simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use indoor_asset_simulator::types::*;
//!
//! let asset_id = AssetId::new();
//! let category = AssetCategory::Wheelchair;
//!
//! let config = SimulationConfig {
//!     asset_count: 20,
//!     floor: 2,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
