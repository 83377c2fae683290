//! Configuration structures for the asset simulator
//!
//! This module contains the simulation configuration structure and validation logic
//! used to control the population, the walk and the event delivery.

use crate::types::AssetCategory;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default walk parameters
pub mod defaults {
    /// Distance covered per tick, in boundary units
    pub const STEP_SIZE: f64 = 0.8;

    /// Half-width of the per-tick heading wiggle, in degrees
    pub const HEADING_JITTER_DEGREES: f64 = 20.0;

    /// Lower bound of the about-face applied when a step would leave the boundary
    pub const REFLECTION_MIN_DEGREES: f64 = 170.0;

    /// Upper bound of the about-face applied when a step would leave the boundary
    pub const REFLECTION_MAX_DEGREES: f64 = 190.0;

    /// Reflections tried before a walker holds position for the tick
    pub const MAX_REFLECTION_ATTEMPTS: usize = 100;

    /// Web Mercator
    pub const WKID: u32 = 3857;
}

/// Target fraction of the asset count assigned to each category
///
/// The defaults sum to 0.8, not 1.0. The remaining fifth is never generated;
/// operators who want the full count can raise any quota.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryQuotas {
    /// Security staff
    pub security: f64,
    /// Visitors
    pub visitor: f64,
    /// Wheelchairs
    pub wheelchair: f64,
    /// Catering carts
    pub catering_cart: f64,
}

impl Default for CategoryQuotas {
    fn default() -> Self {
        Self { security: 0.10, visitor: 0.50, wheelchair: 0.10, catering_cart: 0.10 }
    }
}

impl CategoryQuotas {
    /// Quota for a single category
    pub fn get(&self, category: AssetCategory) -> f64 {
        match category {
            AssetCategory::Security => self.security,
            AssetCategory::Visitor => self.visitor,
            AssetCategory::Wheelchair => self.wheelchair,
            AssetCategory::CateringCart => self.catering_cart,
        }
    }

    /// Sum of all quotas
    pub fn total(&self) -> f64 {
        AssetCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "indoor-asset-simulator",
    version,
    about = "Indoor Asset Simulator - Streams random-walk positions of assets inside a building",
    long_about = "Simulates people, wheelchairs and catering carts wandering inside a building footprint and posts one location event per asset per tick to an ingestion endpoint.

EXAMPLES:
    # Walk 100 assets inside a GeoJSON footprint, logging events locally
    indoor-asset-simulator --boundary building.geojson

    # Stream to an ingestion endpoint every 500 ms
    indoor-asset-simulator --boundary building.geojson --endpoint http://localhost:6180/receiver --sleep-ms 500

    # Generate configuration template
    indoor-asset-simulator --print-config > my-config.json

    # Validate configuration and boundary without running
    indoor-asset-simulator --config my-config.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Number of assets to simulate
    #[arg(
        long,
        help = "Number of assets to simulate",
        long_help = "Target number of assets. Category quotas are fractions of this number and the generated population may be smaller. Must be greater than 0. Default: 100"
    )]
    pub asset_count: Option<usize>,

    /// Floor reported for every asset
    #[arg(long, allow_negative_numbers = true, help = "Floor reported for every asset")]
    pub floor: Option<i32>,

    /// Spatial reference id of the boundary coordinates
    #[arg(long, help = "Spatial reference WKID of the boundary (default 3857)")]
    pub wkid: Option<u32>,

    /// Ingestion endpoint receiving location events
    #[arg(
        long,
        help = "HTTP(S) endpoint receiving location events",
        long_help = "URL that receives one JSON location event per POST. When omitted, events are written to the log instead."
    )]
    pub endpoint: Option<String>,

    /// Pause between ticks in milliseconds
    #[arg(long, help = "Pause between ticks in milliseconds")]
    pub sleep_ms: Option<u64>,

    /// Distance moved per tick
    #[arg(long, help = "Distance moved per tick, in boundary units")]
    pub step_size: Option<f64>,

    /// Heading wiggle per tick in degrees
    #[arg(long, help = "Maximum heading change per tick, in degrees")]
    pub heading_jitter: Option<f64>,

    /// Reflection attempts before holding position
    #[arg(long, help = "Reflections tried before an asset holds position for a tick")]
    pub max_reflection_attempts: Option<usize>,

    /// GeoJSON file describing the walkable area
    #[arg(short, long, help = "GeoJSON file with the building footprint")]
    pub boundary: Option<String>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long, help = "Timeout for each delivery request, in seconds")]
    pub request_timeout_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Directory for rolling log files
    #[arg(long, help = "Also write daily rolling log files to this directory")]
    pub log_dir: Option<String>,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration and boundary without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Number of assets to simulate
    pub asset_count: Option<usize>,

    /// Floor reported for every asset
    pub floor: Option<i32>,

    /// Spatial reference id of the boundary coordinates
    pub wkid: Option<u32>,

    /// Ingestion endpoint receiving location events
    pub endpoint: Option<String>,

    /// Pause between ticks in milliseconds
    pub sleep_ms: Option<u64>,

    /// Distance moved per tick
    pub step_size: Option<f64>,

    /// Heading wiggle per tick in degrees
    pub heading_jitter_degrees: Option<f64>,

    /// Lower bound of the wall reflection in degrees
    pub reflection_min_degrees: Option<f64>,

    /// Upper bound of the wall reflection in degrees
    pub reflection_max_degrees: Option<f64>,

    /// Reflection attempts before holding position
    pub max_reflection_attempts: Option<usize>,

    /// GeoJSON file describing the walkable area
    pub boundary_path: Option<String>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,

    /// Smallest boundary area accepted at startup
    pub min_boundary_area: Option<f64>,

    /// Per-category population quotas
    pub quotas: Option<CategoryQuotas>,
}

/// Configuration for the asset simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of assets to simulate (and interior points to sample)
    pub asset_count: usize,

    /// Floor reported for every asset
    pub floor: i32,

    /// Spatial reference id of the boundary coordinates
    pub wkid: u32,

    /// Ingestion endpoint; `None` logs events instead of posting them
    pub endpoint: Option<String>,

    /// Pause between ticks in milliseconds
    pub sleep_ms: u64,

    /// Distance moved per tick
    pub step_size: f64,

    /// Heading wiggle per tick in degrees
    pub heading_jitter_degrees: f64,

    /// Lower bound of the wall reflection in degrees
    pub reflection_min_degrees: f64,

    /// Upper bound of the wall reflection in degrees
    pub reflection_max_degrees: f64,

    /// Reflection attempts before holding position
    pub max_reflection_attempts: usize,

    /// GeoJSON file describing the walkable area
    pub boundary_path: Option<String>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// Smallest boundary area accepted at startup
    pub min_boundary_area: f64,

    /// Per-category population quotas
    pub quotas: CategoryQuotas,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Asset count is invalid
    #[error("Asset count must be greater than 0, got {0}")]
    InvalidAssetCount(usize),

    /// Step size is invalid
    #[error("Step size must be a positive finite number, got {0}")]
    InvalidStepSize(f64),

    /// Heading jitter is invalid
    #[error("Heading jitter must be a non-negative finite number of degrees, got {0}")]
    InvalidHeadingJitter(f64),

    /// Reflection range is invalid
    #[error("Invalid reflection range: min ({0}) must be <= max ({1})")]
    InvalidReflectionRange(f64, f64),

    /// Reflection attempts are invalid
    #[error("Max reflection attempts must be greater than 0")]
    InvalidReflectionAttempts,

    /// Quota value is out of range
    #[error("Invalid quota for {category}: {value} (must be between 0.0 and 1.0)")]
    InvalidQuota {
        /// Category with the invalid quota
        category: AssetCategory,
        /// The invalid quota value
        value: f64,
    },

    /// Quotas add up to more than the whole population
    #[error("Category quotas must not sum to more than 1.0, got {sum}")]
    InvalidQuotaSum {
        /// The actual sum of quota values
        sum: f64,
    },

    /// Endpoint is not an http(s) URL
    #[error("Endpoint must start with http:// or https://, got {0}")]
    InvalidEndpoint(String),

    /// Minimum boundary area is invalid
    #[error("Minimum boundary area must be a non-negative finite number, got {0}")]
    InvalidMinBoundaryArea(f64),

    /// Request timeout of zero would fail every delivery
    #[error("Request timeout must be at least 1 second")]
    InvalidRequestTimeout,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            asset_count: 100,
            floor: 1,
            wkid: defaults::WKID,
            endpoint: None,
            sleep_ms: 1_000,
            step_size: defaults::STEP_SIZE,
            heading_jitter_degrees: defaults::HEADING_JITTER_DEGREES,
            reflection_min_degrees: defaults::REFLECTION_MIN_DEGREES,
            reflection_max_degrees: defaults::REFLECTION_MAX_DEGREES,
            max_reflection_attempts: defaults::MAX_REFLECTION_ATTEMPTS,
            boundary_path: None,
            seed: None,
            request_timeout_secs: 10,
            min_boundary_area: 1e-9,
            quotas: CategoryQuotas::default(),
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            asset_count: config_file.asset_count.unwrap_or(defaults.asset_count),
            floor: config_file.floor.unwrap_or(defaults.floor),
            wkid: config_file.wkid.unwrap_or(defaults.wkid),
            endpoint: config_file.endpoint.or(defaults.endpoint),
            sleep_ms: config_file.sleep_ms.unwrap_or(defaults.sleep_ms),
            step_size: config_file.step_size.unwrap_or(defaults.step_size),
            heading_jitter_degrees: config_file
                .heading_jitter_degrees
                .unwrap_or(defaults.heading_jitter_degrees),
            reflection_min_degrees: config_file
                .reflection_min_degrees
                .unwrap_or(defaults.reflection_min_degrees),
            reflection_max_degrees: config_file
                .reflection_max_degrees
                .unwrap_or(defaults.reflection_max_degrees),
            max_reflection_attempts: config_file
                .max_reflection_attempts
                .unwrap_or(defaults.max_reflection_attempts),
            boundary_path: config_file.boundary_path.or(defaults.boundary_path),
            seed: config_file.seed.or(defaults.seed),
            request_timeout_secs: config_file
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            min_boundary_area: config_file.min_boundary_area.unwrap_or(defaults.min_boundary_area),
            quotas: config_file.quotas.unwrap_or(defaults.quotas),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.asset_count {
            config.asset_count = value;
        }
        if let Some(value) = args.floor {
            config.floor = value;
        }
        if let Some(value) = args.wkid {
            config.wkid = value;
        }
        if let Some(value) = args.endpoint {
            config.endpoint = Some(value);
        }
        if let Some(value) = args.sleep_ms {
            config.sleep_ms = value;
        }
        if let Some(value) = args.step_size {
            config.step_size = value;
        }
        if let Some(value) = args.heading_jitter {
            config.heading_jitter_degrees = value;
        }
        if let Some(value) = args.max_reflection_attempts {
            config.max_reflection_attempts = value;
        }
        if let Some(value) = args.boundary {
            config.boundary_path = Some(value);
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.request_timeout_secs {
            config.request_timeout_secs = value;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.asset_count == 0 {
            return Err(ConfigValidationError::InvalidAssetCount(self.asset_count));
        }

        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(ConfigValidationError::InvalidStepSize(self.step_size));
        }

        if !self.heading_jitter_degrees.is_finite() || self.heading_jitter_degrees < 0.0 {
            return Err(ConfigValidationError::InvalidHeadingJitter(self.heading_jitter_degrees));
        }

        if !self.reflection_min_degrees.is_finite()
            || !self.reflection_max_degrees.is_finite()
            || self.reflection_min_degrees > self.reflection_max_degrees
        {
            return Err(ConfigValidationError::InvalidReflectionRange(
                self.reflection_min_degrees,
                self.reflection_max_degrees,
            ));
        }

        if self.max_reflection_attempts == 0 {
            return Err(ConfigValidationError::InvalidReflectionAttempts);
        }

        if !self.min_boundary_area.is_finite() || self.min_boundary_area < 0.0 {
            return Err(ConfigValidationError::InvalidMinBoundaryArea(self.min_boundary_area));
        }

        for category in AssetCategory::ALL {
            let value = self.quotas.get(category);
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidQuota { category, value });
            }
        }

        let sum = self.quotas.total();
        if sum > 1.0 + 1e-9 {
            return Err(ConfigValidationError::InvalidQuotaSum { sum });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidRequestTimeout);
        }

        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigValidationError::InvalidEndpoint(endpoint.clone()));
            }
        }

        Ok(())
    }

    /// Pause between ticks
    pub fn sleep_interval(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }

    /// Delivery request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reflection range as a tuple (min, max) in degrees
    pub fn reflection_range(&self) -> (f64, f64) {
        (self.reflection_min_degrees, self.reflection_max_degrees)
    }
}
