//! Building geometry: boundary, sampling and projection
//!
//! # Overview
//!
//! - **BoundaryShape**: multi-polygon walkable area answering containment queries
//! - **UniformPointSampler**: uniformly distributed interior starting points
//! - **projection**: lat/lon derivation for boundary coordinates
//!
//! # Usage Example
//!
//! ```rust
//! use indoor_asset_simulator::facility::*;
//!
//! let hall = BoundaryShape::rectangle(0.0, 0.0, 40.0, 25.0);
//! hall.validate(1e-9).unwrap();
//!
//! let mut sampler = UniformPointSampler::with_seed(3);
//! let starts = sampler.sample(&hall, 10).unwrap();
//! assert!(starts.iter().all(|p| hall.contains(*p)));
//! ```

pub mod boundary;
pub mod projection;
pub mod sampler;

// Re-export all public types for convenience
pub use boundary::{Boundary, BoundaryShape, Bounds, Position};
pub use projection::to_lat_lon;
pub use sampler::UniformPointSampler;
