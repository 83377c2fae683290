//! Random walk of a single asset
//!
//! A [`WalkEvent`] owns one asset's position and heading and moves it a fixed step
//! per tick. Steps that would leave the boundary are turned around by roughly 180°
//! and retried; after every successful step the heading wiggles slightly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::asset::AssetProfile;
use crate::events::{EventSink, LocationEvent};
use crate::facility::{Boundary, Position};
use crate::simulation::{SimulationError, SimulationResult, WalkReport};
use crate::types::config::defaults;
use crate::types::{AssetId, SimulationConfig};

/// Motion and pacing parameters shared by every walker of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParameters {
    /// Distance per tick in boundary units
    pub step_size: f64,
    /// Half-width of the per-tick heading wiggle in degrees
    pub heading_jitter_degrees: f64,
    /// Lower bound of the wall reflection in degrees
    pub reflection_min_degrees: f64,
    /// Upper bound of the wall reflection in degrees
    pub reflection_max_degrees: f64,
    /// Reflections tried before holding position
    pub max_reflection_attempts: usize,
    /// Pause between ticks
    pub sleep: Duration,
}

impl Default for WalkParameters {
    fn default() -> Self {
        Self {
            step_size: defaults::STEP_SIZE,
            heading_jitter_degrees: defaults::HEADING_JITTER_DEGREES,
            reflection_min_degrees: defaults::REFLECTION_MIN_DEGREES,
            reflection_max_degrees: defaults::REFLECTION_MAX_DEGREES,
            max_reflection_attempts: defaults::MAX_REFLECTION_ATTEMPTS,
            sleep: Duration::from_secs(1),
        }
    }
}

impl WalkParameters {
    /// Walk parameters taken from the simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            step_size: config.step_size,
            heading_jitter_degrees: config.heading_jitter_degrees,
            reflection_min_degrees: config.reflection_min_degrees,
            reflection_max_degrees: config.reflection_max_degrees,
            max_reflection_attempts: config.max_reflection_attempts,
            sleep: config.sleep_interval(),
        }
    }
}

/// Lifecycle of a walker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkState {
    /// Last tick moved the asset
    Running,
    /// Last tick ran out of reflections and held position
    Stuck,
    /// Cancellation observed; terminal
    Cancelled,
    /// Sink failed in a way retrying cannot fix; terminal
    Failed,
}

/// Result of one `advance()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The asset moved after `reflections` turn-arounds
    Moved {
        /// Reflections needed before a step landed inside
        reflections: usize,
    },
    /// No direction tried stayed inside; position unchanged
    Held,
}

/// Result of one full tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// What the movement step did
    pub movement: MoveOutcome,
    /// Whether the sink accepted the event
    pub delivered: bool,
}

/// One asset's random walk
pub struct WalkEvent {
    id: AssetId,
    profile: AssetProfile,
    position: Position,
    heading: f64,
    params: WalkParameters,
    boundary: Arc<dyn Boundary>,
    rng: StdRng,
    state: WalkState,
    report: WalkReport,
}

impl fmt::Debug for WalkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkEvent")
            .field("id", &self.id)
            .field("profile", &self.profile)
            .field("position", &self.position)
            .field("heading", &self.heading)
            .field("state", &self.state)
            .finish()
    }
}

impl WalkEvent {
    /// Create a walker starting at `start` with a random heading
    pub fn new(
        profile: AssetProfile,
        start: Position,
        boundary: Arc<dyn Boundary>,
        params: WalkParameters,
    ) -> SimulationResult<Self> {
        Self::from_rng(profile, start, boundary, params, StdRng::from_entropy())
    }

    /// Create a walker with a specific seed for reproducible results
    pub fn with_seed(
        profile: AssetProfile,
        start: Position,
        boundary: Arc<dyn Boundary>,
        params: WalkParameters,
        seed: u64,
    ) -> SimulationResult<Self> {
        Self::from_rng(profile, start, boundary, params, StdRng::seed_from_u64(seed))
    }

    fn from_rng(
        profile: AssetProfile,
        start: Position,
        boundary: Arc<dyn Boundary>,
        params: WalkParameters,
        mut rng: StdRng,
    ) -> SimulationResult<Self> {
        if !boundary.contains(start) {
            return Err(SimulationError::boundary_error(format!(
                "start position ({}, {}) is outside the boundary",
                start.x, start.y
            )));
        }

        let id = AssetId::from_random_bytes(rng.gen());
        let heading = rng.gen_range(0.0..360.0_f64).to_radians();
        Ok(Self {
            id,
            profile,
            position: start,
            heading,
            params,
            boundary,
            rng,
            state: WalkState::Running,
            report: WalkReport::new(id, profile.category),
        })
    }

    /// Replace the heading, in radians
    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = heading.rem_euclid(TAU);
        self
    }

    /// Asset identifier
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Asset profile
    pub fn profile(&self) -> &AssetProfile {
        &self.profile
    }

    /// Current position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current heading in radians, within `[0, 2π)`
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Current lifecycle state
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Counters accumulated so far
    pub fn report(&self) -> &WalkReport {
        &self.report
    }

    /// Move one step, reflecting off the boundary
    ///
    /// At most `max_reflection_attempts` reflections are tried. When none of them
    /// lands inside, the position is kept and the walker is marked stuck.
    pub fn advance(&mut self) -> MoveOutcome {
        let mut heading = self.heading;
        let mut reflections = 0;

        loop {
            let candidate = self.position.step(heading, self.params.step_size);
            if self.boundary.contains(candidate) {
                let jitter = self.params.heading_jitter_degrees;
                let wiggle = self.rng.gen_range(-jitter..=jitter).to_radians();
                self.position = candidate;
                self.heading = (heading + wiggle).rem_euclid(TAU);
                self.state = WalkState::Running;
                return MoveOutcome::Moved { reflections };
            }

            if reflections >= self.params.max_reflection_attempts {
                break;
            }
            let turn = self
                .rng
                .gen_range(self.params.reflection_min_degrees..=self.params.reflection_max_degrees)
                .to_radians();
            heading = (heading + turn).rem_euclid(TAU);
            reflections += 1;
        }

        self.heading = heading;
        if self.state != WalkState::Stuck {
            warn!(
                asset_id = %self.id,
                x = self.position.x,
                y = self.position.y,
                reflections,
                "Walker is stuck, holding position"
            );
        }
        self.state = WalkState::Stuck;
        MoveOutcome::Held
    }

    /// Location event for the current state
    ///
    /// Only the timestamp and accuracy differ between two calls without an
    /// `advance()` in between.
    pub fn snapshot(&mut self) -> LocationEvent {
        let accuracy = self.rng.gen_range(1..=2);
        LocationEvent::new(self.id, &self.profile, self.position, accuracy, chrono::Utc::now())
    }

    /// Advance, snapshot and deliver once
    ///
    /// Recoverable delivery failures are logged and counted and the tick still
    /// succeeds. Any other sink failure is returned.
    pub async fn tick(&mut self, sink: &dyn EventSink) -> SimulationResult<TickOutcome> {
        let movement = self.advance();
        let event = self.snapshot();
        let (lat, lon) = (event.lat, event.lon);

        self.report.ticks += 1;
        if movement == MoveOutcome::Held {
            self.report.stuck_ticks += 1;
        }

        let delivered = match sink.deliver(event).await {
            Ok(()) => {
                debug!(asset_id = %self.id, sink = sink.name(), lat, lon, "Delivered location event");
                self.report.delivered += 1;
                true
            }
            Err(e) => {
                self.report.failed += 1;
                let error = SimulationError::from(e);
                if !error.is_recoverable() {
                    return Err(error);
                }
                warn!(
                    asset_id = %self.id,
                    sink = sink.name(),
                    category = error.category(),
                    error = %error,
                    "Failed to deliver location event"
                );
                false
            }
        };

        Ok(TickOutcome { movement, delivered })
    }

    /// Tick until `cancel` fires, then return the walker's counters
    ///
    /// Cancellation is checked before each tick and interrupts the sleep between
    /// ticks. A delivery already in flight is allowed to finish. An unrecoverable
    /// sink failure also ends the walk; the report's `final_state` tells which.
    pub async fn run(mut self, sink: Arc<dyn EventSink>, cancel: CancellationToken) -> WalkReport {
        info!(
            asset_id = %self.id,
            category = %self.profile.category,
            device = %self.profile.device,
            "Walker started"
        );
        debug!(
            asset_id = %self.id,
            heading_degrees = self.heading.to_degrees(),
            step_size = self.params.step_size,
            "Walker parameters"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            if let Err(e) = self.tick(sink.as_ref()).await {
                error!(
                    asset_id = %self.id,
                    sink = sink.name(),
                    category = e.category(),
                    error = %e,
                    "Walker stopped by sink failure"
                );
                self.state = WalkState::Failed;
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.params.sleep) => {}
            }
        }

        if self.state != WalkState::Failed {
            self.state = WalkState::Cancelled;
        }
        self.report.final_state = self.state;
        info!(
            asset_id = %self.id,
            state = ?self.state,
            ticks = self.report.ticks,
            delivered = self.report.delivered,
            failed = self.report.failed,
            "Walker stopped"
        );
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MemorySink, SinkError};
    use crate::facility::BoundaryShape;
    use crate::types::{AssetCategory, DeviceKind};
    use async_trait::async_trait;

    fn profile() -> AssetProfile {
        AssetProfile::new(AssetCategory::Security, DeviceKind::Android, 1, 3857)
    }

    fn unit_square() -> Arc<dyn Boundary> {
        Arc::new(BoundaryShape::rectangle(0.0, 0.0, 1.0, 1.0))
    }

    fn fast_params() -> WalkParameters {
        WalkParameters { sleep: Duration::from_millis(1), ..Default::default() }
    }

    #[derive(Debug)]
    struct RejectingSink;

    #[async_trait]
    impl EventSink for RejectingSink {
        async fn deliver(&self, _event: LocationEvent) -> Result<(), SinkError> {
            Err(SinkError::Rejected { status: 500, body: String::new() })
        }

        fn name(&self) -> &'static str {
            "rejecting"
        }
    }

    #[derive(Debug)]
    struct BrokenSink;

    #[async_trait]
    impl EventSink for BrokenSink {
        async fn deliver(&self, _event: LocationEvent) -> Result<(), SinkError> {
            Err(SinkError::Setup("payload could not be encoded".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_start_outside_boundary_is_rejected() {
        let result = WalkEvent::new(profile(), Position::new(2.0, 2.0), unit_square(), fast_params());
        assert!(matches!(result, Err(SimulationError::BoundaryError(_))));
    }

    #[test]
    fn test_initial_heading_in_range() {
        for seed in 0..50 {
            let walker = WalkEvent::with_seed(
                profile(),
                Position::new(0.5, 0.5),
                unit_square(),
                fast_params(),
                seed,
            )
            .unwrap();
            assert!((0.0..TAU).contains(&walker.heading()));
            assert_eq!(walker.state(), WalkState::Running);
        }
    }

    #[test]
    fn test_reflection_turns_walker_around() {
        let mut walker = WalkEvent::with_seed(
            profile(),
            Position::new(0.9, 0.5),
            unit_square(),
            fast_params(),
            42,
        )
        .unwrap()
        .with_heading(0.0);

        let outcome = walker.advance();
        let position = walker.position();

        assert_eq!(outcome, MoveOutcome::Moved { reflections: 1 });
        assert!(position.x < 0.9);
        assert!((0.0..=1.0).contains(&position.x));
        assert!((0.0..=1.0).contains(&position.y));
    }

    #[test]
    fn test_step_longer_than_room_holds_position() {
        // From the centre of the unit square every 0.8 step lands outside
        let mut walker = WalkEvent::with_seed(
            profile(),
            Position::new(0.5, 0.5),
            unit_square(),
            fast_params(),
            7,
        )
        .unwrap()
        .with_heading(0.0);

        assert_eq!(walker.advance(), MoveOutcome::Held);
        assert_eq!(walker.state(), WalkState::Stuck);
        assert_eq!(walker.position(), Position::new(0.5, 0.5));
    }

    #[test]
    fn test_stuck_walker_recovers() {
        let params = WalkParameters { step_size: 0.1, ..fast_params() };
        let mut walker =
            WalkEvent::with_seed(profile(), Position::new(0.5, 0.5), unit_square(), params, 9)
                .unwrap();

        walker.state = WalkState::Stuck;
        assert!(matches!(walker.advance(), MoveOutcome::Moved { .. }));
        assert_eq!(walker.state(), WalkState::Running);
    }

    #[test]
    fn test_walker_stays_inside_boundary() {
        let hall: Arc<dyn Boundary> = Arc::new(BoundaryShape::rectangle(0.0, 0.0, 10.0, 4.0));
        let mut walker = WalkEvent::with_seed(
            profile(),
            Position::new(5.0, 2.0),
            Arc::clone(&hall),
            fast_params(),
            2024,
        )
        .unwrap();

        for _ in 0..5_000 {
            walker.advance();
            assert!(hall.contains(walker.position()));
        }
        assert_eq!(walker.state(), WalkState::Running);
    }

    #[test]
    fn test_snapshot_is_stable_between_advances() {
        let mut walker = WalkEvent::with_seed(
            profile(),
            Position::new(0.25, 0.75),
            unit_square(),
            fast_params(),
            3,
        )
        .unwrap();

        let first = walker.snapshot();
        let second = walker.snapshot();

        assert!(first.same_observation(&second));
        assert!((1..=2).contains(&first.accuracy));
        assert_eq!(first.object_id, walker.id());
        assert_eq!(first.geometry.x, 0.25);
        assert_eq!(first.geometry.y, 0.75);
        assert_eq!(first.geometry.z, "1");
    }

    #[test]
    fn test_seeded_walkers_repeat() {
        let make = || {
            WalkEvent::with_seed(profile(), Position::new(0.5, 0.5), unit_square(), fast_params(), 11)
                .unwrap()
        };
        let mut a = make();
        let mut b = make();

        assert_eq!(a.id(), b.id());
        for _ in 0..10 {
            a.advance();
            b.advance();
        }
        assert_eq!(a.position(), b.position());
    }

    #[tokio::test]
    async fn test_tick_counts_delivery() {
        let hall: Arc<dyn Boundary> = Arc::new(BoundaryShape::rectangle(0.0, 0.0, 10.0, 10.0));
        let mut walker =
            WalkEvent::with_seed(profile(), Position::new(5.0, 5.0), hall, fast_params(), 1).unwrap();
        let sink = MemorySink::new();

        let outcome = walker.tick(&sink).await.unwrap();

        assert!(outcome.delivered);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events()[0].position(), walker.position());
        assert_eq!(walker.report().ticks, 1);
        assert_eq!(walker.report().delivered, 1);
    }

    #[tokio::test]
    async fn test_rejected_delivery_does_not_stop_walk() {
        let hall: Arc<dyn Boundary> = Arc::new(BoundaryShape::rectangle(0.0, 0.0, 10.0, 10.0));
        let mut walker =
            WalkEvent::with_seed(profile(), Position::new(5.0, 5.0), hall, fast_params(), 1).unwrap();

        for _ in 0..3 {
            let outcome = walker.tick(&RejectingSink).await.unwrap();
            assert!(!outcome.delivered);
        }

        assert_eq!(walker.report().ticks, 3);
        assert_eq!(walker.report().failed, 3);
        assert_eq!(walker.state(), WalkState::Running);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancellation() {
        let hall: Arc<dyn Boundary> = Arc::new(BoundaryShape::rectangle(0.0, 0.0, 10.0, 10.0));
        let walker =
            WalkEvent::with_seed(profile(), Position::new(5.0, 5.0), hall, fast_params(), 5).unwrap();
        let sink = Arc::new(MemorySink::new());
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(walker.run(sink.clone(), cancel.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        let report = handle.await.unwrap();

        assert!(report.ticks >= 1);
        assert_eq!(report.delivered as usize, sink.len());
        assert_eq!(report.final_state, WalkState::Cancelled);
    }

    #[tokio::test]
    async fn test_broken_sink_ends_walk() {
        let hall: Arc<dyn Boundary> = Arc::new(BoundaryShape::rectangle(0.0, 0.0, 10.0, 10.0));
        let mut walker =
            WalkEvent::with_seed(profile(), Position::new(5.0, 5.0), hall.clone(), fast_params(), 4)
                .unwrap();

        let error = walker.tick(&BrokenSink).await.unwrap_err();
        assert!(!error.is_recoverable());
        assert_eq!(error.category(), "Delivery");
        assert_eq!(walker.report().failed, 1);

        let walker =
            WalkEvent::with_seed(profile(), Position::new(5.0, 5.0), hall, fast_params(), 4).unwrap();
        let report = walker.run(Arc::new(BrokenSink), CancellationToken::new()).await;

        assert_eq!(report.ticks, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.final_state, WalkState::Failed);
    }

    #[tokio::test]
    async fn test_run_with_cancelled_token_never_ticks() {
        let walker =
            WalkEvent::with_seed(profile(), Position::new(0.5, 0.5), unit_square(), fast_params(), 5)
                .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = walker.run(Arc::new(MemorySink::new()), cancel).await;
        assert_eq!(report.ticks, 0);
        assert_eq!(report.final_state, WalkState::Cancelled);
    }
}
