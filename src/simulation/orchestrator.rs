//! Main simulation orchestrator
//!
//! This module wires the population, the starting points and the boundary into
//! walkers and runs every walker as its own tokio task.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::asset::{AssetProfile, PopulationGenerator, PopulationStats};
use crate::events::EventSink;
use crate::facility::{Boundary, BoundaryShape, Position, UniformPointSampler};
use crate::simulation::{
    SimulationError, SimulationResult, SimulationStatistics, WalkEvent, WalkParameters,
};
use crate::types::SimulationConfig;

/// Main simulation orchestrator that coordinates all components
#[derive(Debug)]
pub struct SimulationOrchestrator {
    /// Configuration for the simulation
    config: SimulationConfig,
    /// Walkable area shared by every walker
    boundary: Arc<BoundaryShape>,
    /// Destination of every location event
    sink: Arc<dyn EventSink>,
    /// Source of per-component seeds
    rng: StdRng,
    /// Walkers built by `prepare`
    walkers: Vec<WalkEvent>,
    /// Breakdown of the last generated population
    population: Option<PopulationStats>,
}

impl SimulationOrchestrator {
    /// Create a new simulation orchestrator
    ///
    /// Fails when the configuration is invalid or the boundary is degenerate.
    #[instrument(skip_all, fields(asset_count = config.asset_count, sink = sink.name()))]
    pub fn new(
        config: SimulationConfig,
        boundary: BoundaryShape,
        sink: Arc<dyn EventSink>,
    ) -> SimulationResult<Self> {
        config.validate()?;
        boundary.validate(config.min_boundary_area)?;

        let rng = if let Some(seed) = config.seed {
            info!("Using deterministic seed: {}", seed);
            StdRng::seed_from_u64(seed)
        } else {
            debug!("Using entropy-based random seed");
            StdRng::from_entropy()
        };

        info!(
            polygons = boundary.polygon_count(),
            area = boundary.area(),
            "Initialized simulation orchestrator"
        );

        Ok(Self {
            config,
            boundary: Arc::new(boundary),
            sink,
            rng,
            walkers: Vec::new(),
            population: None,
        })
    }

    /// Configuration the orchestrator was built with
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Walkers built by the last `prepare`
    pub fn walkers(&self) -> &[WalkEvent] {
        &self.walkers
    }

    /// Breakdown of the last generated population
    pub fn population_stats(&self) -> Option<&PopulationStats> {
        self.population.as_ref()
    }

    /// Generate the population, sample starting points and build one walker per pair
    ///
    /// Returns the number of walkers ready to run.
    #[instrument(skip(self))]
    pub fn prepare(&mut self) -> SimulationResult<usize> {
        let mut generator = PopulationGenerator::with_seed(
            self.config.quotas,
            self.config.wkid,
            self.rng.gen(),
        );
        let profiles = generator.generate(self.config.asset_count, self.config.floor);
        if profiles.is_empty() {
            return Err(SimulationError::population_error(format!(
                "{} assets with the configured quotas round down to no walkers",
                self.config.asset_count
            )));
        }
        self.population = Some(generator.population_stats(&profiles));

        let mut sampler = UniformPointSampler::with_seed(self.rng.gen());
        let points = sampler.sample(self.boundary.as_ref(), self.config.asset_count)?;

        let params = WalkParameters::from_config(&self.config);
        let boundary: Arc<dyn Boundary> = self.boundary.clone();
        let mut walkers = Vec::with_capacity(profiles.len().min(points.len()));
        for (profile, start) in pair_profiles(profiles, points) {
            let walker =
                WalkEvent::with_seed(profile, start, Arc::clone(&boundary), params, self.rng.gen())?;
            debug!(
                asset_id = %walker.id(),
                category = %profile.category,
                x = start.x,
                y = start.y,
                "Prepared walker"
            );
            walkers.push(walker);
        }

        info!(walkers = walkers.len(), "Walkers prepared");
        self.walkers = walkers;
        Ok(self.walkers.len())
    }

    /// Run every walker until `cancel` fires
    ///
    /// Prepares walkers first when `prepare` has not been called. A walker whose task
    /// panics is counted as crashed; the others keep running.
    #[instrument(skip_all)]
    pub async fn run(&mut self, cancel: CancellationToken) -> SimulationResult<SimulationStatistics> {
        if self.walkers.is_empty() {
            self.prepare()?;
        }

        let walkers = std::mem::take(&mut self.walkers);
        let mut statistics = SimulationStatistics::new(walkers.len());
        let start = Instant::now();

        info!(walkers = walkers.len(), sink = self.sink.name(), "Starting simulation");

        let mut tasks = JoinSet::new();
        for walker in walkers {
            tasks.spawn(walker.run(Arc::clone(&self.sink), cancel.clone()));
        }

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(report) => statistics.record_report(&report),
                Err(e) if e.is_panic() => {
                    error!(error = %e, "Walker task panicked");
                    statistics.record_crash();
                }
                Err(e) => {
                    warn!(error = %e, "Walker task did not complete");
                    statistics.record_crash();
                }
            }
        }

        statistics.run_duration = start.elapsed();
        info!(
            ticks = statistics.total_ticks,
            delivered = statistics.events_delivered,
            failed = statistics.events_failed,
            crashed = statistics.walkers_crashed,
            "Simulation stopped"
        );
        Ok(statistics)
    }
}

/// Pair each profile with a starting point
///
/// The shorter of the two sequences wins; leftovers on either side are dropped and
/// logged.
pub fn pair_profiles(
    profiles: Vec<AssetProfile>,
    points: Vec<Position>,
) -> Vec<(AssetProfile, Position)> {
    let (profile_count, point_count) = (profiles.len(), points.len());
    if profile_count != point_count {
        info!(
            profiles = profile_count,
            points = point_count,
            unused_profiles = profile_count.saturating_sub(point_count),
            unused_points = point_count.saturating_sub(profile_count),
            "Population and starting points differ in length, truncating"
        );
    }
    profiles.into_iter().zip(points).collect()
}
