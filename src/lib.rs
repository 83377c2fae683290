//! Indoor Asset Simulator
//!
//! A load generator that moves simulated assets (security staff, visitors,
//! wheelchairs and catering carts) around a building floor plan and streams their
//! positions as location events to an ingestion endpoint.
//!
//! # Overview
//!
//! Every asset runs its own random walk inside a polygon boundary. Each tick it
//! takes a fixed step, turns around when the step would leave the floor plan,
//! wiggles its heading slightly, and posts a JSON location event. Walkers run as
//! independent tokio tasks until the process is cancelled.
//!
//! ## Key Features
//!
//! - **Arbitrary floor plans**: GeoJSON polygons and multi-polygons, holes included
//! - **Category quotas**: configurable share of each asset category
//! - **Confined random walk**: positions never leave the boundary
//! - **Fire-and-forget delivery**: failed posts are logged and counted, never retried
//! - **Reproducible runs**: a single seed drives population, start points and walks
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use indoor_asset_simulator::*;
//!
//! let config = SimulationConfig { asset_count: 40, seed: Some(7), ..Default::default() };
//! let floor = BoundaryShape::rectangle(0.0, 0.0, 120.0, 60.0);
//!
//! let mut orchestrator = SimulationOrchestrator::new(config, floor, Arc::new(LogSink))?;
//! let walkers = orchestrator.prepare()?;
//! println!("{} walkers ready", walkers);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`facility`]: Boundary geometry, point sampling and projection
//! - [`asset`]: Asset profiles and population generation
//! - [`events`]: Location events and sinks
//! - [`simulation`]: Walkers, orchestration, statistics, logging and errors
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Facility   │    │    Asset    │    │   Events    │
//! │             │    │             │    │             │
//! │ Boundary    │    │ Profiles    │    │ Location    │
//! │ Sampler     │    │ Population  │    │ Sinks       │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                  ▲                  ▲
//!        └──────────┬───────┴──────────────────┘
//!                   │
//!           ┌──────────────┐
//!           │  Simulation  │
//!           │              │
//!           │ Walkers      │
//!           │ Orchestrator │
//!           └──────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod asset;
pub mod events;
pub mod facility;
pub mod simulation;
pub mod types;

// Core types and identifiers
pub use types::{
    AssetCategory, AssetId, CategoryQuotas, ConfigError, ConfigValidationError, DeviceKind,
    SimulationConfig,
};

// Geometry
pub use facility::{Boundary, BoundaryShape, Position, UniformPointSampler};

// Population
pub use asset::{AssetProfile, PopulationGenerator, PopulationStats};

// Events and delivery
pub use events::{EventSink, HttpEventSink, LocationEvent, LogSink, MemorySink, SinkError};

// Simulation
pub use simulation::{
    LoggingConfig, SimulationError, SimulationOrchestrator, SimulationResult,
    SimulationStatistics, WalkEvent, WalkParameters, WalkReport, WalkState,
};
