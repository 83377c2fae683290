//! Population generation and statistics
//!
//! This module turns a target asset count and per-category quotas into a list of
//! asset profiles.

use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

use crate::asset::AssetProfile;
use crate::types::{AssetCategory, CategoryQuotas, DeviceKind, SimulationConfig};

/// Tolerance absorbing binary rounding in `count * quota` (0.57 * 100 = 56.99999...)
const QUOTA_EPSILON: f64 = 1e-9;

/// Generator for asset populations
pub struct PopulationGenerator {
    quotas: CategoryQuotas,
    wkid: u32,
    rng: Box<dyn rand::RngCore + Send>,
}

impl fmt::Debug for PopulationGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulationGenerator")
            .field("quotas", &self.quotas)
            .field("wkid", &self.wkid)
            .finish()
    }
}

impl PopulationGenerator {
    /// Create a new population generator
    pub fn new(quotas: CategoryQuotas, wkid: u32) -> Self {
        use rand::SeedableRng;
        Self { quotas, wkid, rng: Box::new(rand::rngs::StdRng::from_entropy()) }
    }

    /// Create a new population generator with a specific seed for reproducible results
    pub fn with_seed(quotas: CategoryQuotas, wkid: u32, seed: u64) -> Self {
        use rand::SeedableRng;
        Self { quotas, wkid, rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)) }
    }

    /// Create a generator from the simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(config.quotas, config.wkid, seed),
            None => Self::new(config.quotas, config.wkid),
        }
    }

    /// Number of profiles generated for one category
    ///
    /// The quota share of `count` is floored, raised to at least one and then
    /// reduced by one. Small counts and zero quotas therefore yield no profiles.
    pub fn category_count(count: usize, quota: f64) -> usize {
        let share = (count as f64 * quota + QUOTA_EPSILON).floor() as usize;
        share.max(1) - 1
    }

    /// Expected population size for `count` without generating anything
    pub fn expected_total(&self, count: usize) -> usize {
        AssetCategory::ALL
            .iter()
            .map(|category| Self::category_count(count, self.quotas.get(*category)))
            .sum()
    }

    /// Generate profiles for a target of `count` assets on `floor`
    ///
    /// The result is always smaller than `count`: every category loses one asset
    /// to rounding, and the default quotas only cover 80% of it.
    pub fn generate(&mut self, count: usize, floor: i32) -> Vec<AssetProfile> {
        let quota_total = self.quotas.total();
        if (quota_total - 1.0).abs() > QUOTA_EPSILON {
            warn!(
                quota_total,
                "Category quotas do not cover the whole asset count"
            );
        }

        let mut profiles = Vec::with_capacity(self.expected_total(count));
        for category in AssetCategory::ALL {
            let category_count = Self::category_count(count, self.quotas.get(category));
            for _ in 0..category_count {
                let device = DeviceKind::ALL[self.rng.gen_range(0..DeviceKind::ALL.len())];
                profiles.push(AssetProfile::new(category, device, floor, self.wkid));
            }
        }

        info!(
            requested = count,
            generated = profiles.len(),
            floor,
            "Generated asset population"
        );
        profiles
    }

    /// Summarize a generated population
    pub fn population_stats(&self, profiles: &[AssetProfile]) -> PopulationStats {
        let mut by_category = BTreeMap::new();
        let mut android = 0;
        let mut ios = 0;

        for profile in profiles {
            *by_category.entry(profile.category).or_insert(0) += 1;
            match profile.device {
                DeviceKind::Android => android += 1,
                DeviceKind::Ios => ios += 1,
            }
        }

        PopulationStats { total_assets: profiles.len(), by_category, android_devices: android, ios_devices: ios }
    }
}

/// Breakdown of a generated population
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationStats {
    /// Number of profiles
    pub total_assets: usize,
    /// Profiles per category
    pub by_category: BTreeMap<AssetCategory, usize>,
    /// Profiles reporting through Android
    pub android_devices: usize,
    /// Profiles reporting through iOS
    pub ios_devices: usize,
}

impl PopulationStats {
    /// Number of profiles of one category
    pub fn count(&self, category: AssetCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

impl fmt::Display for PopulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Population Statistics:")?;
        writeln!(f, "  Total Assets: {}", self.total_assets)?;
        for category in AssetCategory::ALL {
            writeln!(f, "  {}: {}", category, self.count(category))?;
        }
        write!(f, "  Devices: {} android, {} ios", self.android_devices, self.ios_devices)
    }
}
