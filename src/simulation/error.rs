//! Error types and handling
//!
//! This module contains the error type shared by setup, population generation and
//! the walk loop.

use thiserror::Error;

use crate::events::SinkError;
use crate::types::{ConfigError, ConfigValidationError};

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration could not be loaded
    #[error(transparent)]
    ConfigLoad(#[from] ConfigError),

    /// Configuration values out of range
    #[error(transparent)]
    InvalidConfig(#[from] ConfigValidationError),

    /// Boundary could not be loaded or interpreted
    #[error("Boundary error: {0}")]
    BoundaryError(String),

    /// Boundary has no usable walkable area
    #[error("Boundary is degenerate: area {area} is too small to sample from")]
    DegenerateBoundary {
        /// Measured area in boundary units squared
        area: f64,
    },

    /// Population generation failed
    #[error("Population generation failed: {0}")]
    PopulationError(String),

    /// Event delivery failed
    #[error("Event delivery failed: {0}")]
    DeliveryError(#[from] SinkError),
}

impl SimulationError {
    /// Create a boundary error
    pub fn boundary_error(msg: impl Into<String>) -> Self {
        Self::BoundaryError(msg.into())
    }

    /// Create a population generation error
    pub fn population_error(msg: impl Into<String>) -> Self {
        Self::PopulationError(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// A rejected or unreachable endpoint is recoverable: the walker logs it and keeps
    /// moving. A sink that cannot produce requests at all, and every setup error, is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::DeliveryError(SinkError::Setup(_)) => false,
            SimulationError::DeliveryError(_) => true,
            SimulationError::ConfigLoad(_)
            | SimulationError::InvalidConfig(_)
            | SimulationError::BoundaryError(_)
            | SimulationError::DegenerateBoundary { .. }
            | SimulationError::PopulationError(_) => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigLoad(_) | SimulationError::InvalidConfig(_) => "Configuration",
            SimulationError::BoundaryError(_) | SimulationError::DegenerateBoundary { .. } => {
                "Boundary"
            }
            SimulationError::PopulationError(_) => "Population",
            SimulationError::DeliveryError(_) => "Delivery",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
