//! Simulation orchestration and control
//!
//! This module contains the walker state machine, the orchestrator running every
//! walker as a task, statistics collection, logging and error handling.
//!
//! # Overview
//!
//! - **WalkEvent**: one asset's random walk inside the boundary
//! - **SimulationOrchestrator**: builds walkers and runs them until cancelled
//! - **SimulationStatistics**: per-walker reports folded into run totals
//! - **LoggingConfig**: tracing subscriber setup
//! - **SimulationError**: error type for setup and delivery
//!
//! # Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use indoor_asset_simulator::events::MemorySink;
//! use indoor_asset_simulator::facility::BoundaryShape;
//! use indoor_asset_simulator::simulation::*;
//! use indoor_asset_simulator::types::*;
//!
//! let config = SimulationConfig { asset_count: 10, seed: Some(1), ..Default::default() };
//! let hall = BoundaryShape::rectangle(0.0, 0.0, 50.0, 20.0);
//!
//! let mut orchestrator = SimulationOrchestrator::new(config, hall, Arc::new(MemorySink::new())).unwrap();
//! let walkers = orchestrator.prepare().unwrap();
//! assert_eq!(walkers, orchestrator.walkers().len());
//! ```

pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod statistics;
pub mod walk;

// Re-export all public types for convenience
pub use error::*;
pub use logging::*;
pub use orchestrator::*;
pub use statistics::*;
pub use walk::*;
