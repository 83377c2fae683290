//! Simulated asset population
//!
//! - **AssetProfile**: what an asset is and where it walks
//! - **PopulationGenerator**: builds the profile list from a target count and
//!   category quotas
//!
//! ```rust
//! use indoor_asset_simulator::asset::*;
//! use indoor_asset_simulator::types::CategoryQuotas;
//!
//! let mut generator = PopulationGenerator::with_seed(CategoryQuotas::default(), 3857, 7);
//! let profiles = generator.generate(100, 2);
//! assert_eq!(profiles.len(), 76);
//! ```

pub mod generator;
pub mod profile;

pub use generator::{PopulationGenerator, PopulationStats};
pub use profile::AssetProfile;
