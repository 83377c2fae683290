//! Statistics collection and reporting
//!
//! Each walker keeps a [`WalkReport`] while it runs and returns it when cancelled.
//! The orchestrator folds the reports into [`SimulationStatistics`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::simulation::WalkState;
use crate::types::{AssetCategory, AssetId};

/// Counters for a single walker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkReport {
    /// Walker the counters belong to
    pub asset_id: AssetId,
    /// Asset category
    pub category: AssetCategory,
    /// Completed ticks
    pub ticks: u64,
    /// Events accepted by the sink
    pub delivered: u64,
    /// Events the sink failed to accept
    pub failed: u64,
    /// Ticks that ended with the walker held in place
    pub stuck_ticks: u64,
    /// State the walker was in when it stopped
    pub final_state: WalkState,
}

impl WalkReport {
    /// Empty report for a walker
    pub fn new(asset_id: AssetId, category: AssetCategory) -> Self {
        Self {
            asset_id,
            category,
            ticks: 0,
            delivered: 0,
            failed: 0,
            stuck_ticks: 0,
            final_state: WalkState::Running,
        }
    }

    /// Share of delivery attempts that succeeded, as a percentage
    pub fn delivery_rate(&self) -> f64 {
        percentage(self.delivered, self.delivered + self.failed)
    }
}

/// Aggregated statistics for a whole run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationStatistics {
    /// Walkers started
    pub walkers_started: usize,
    /// Walkers that returned a report
    pub walkers_completed: usize,
    /// Walkers whose task panicked
    pub walkers_crashed: usize,
    /// Walkers stopped early by an unrecoverable sink failure
    pub walkers_failed: usize,
    /// Ticks across all walkers
    pub total_ticks: u64,
    /// Events accepted by the sink
    pub events_delivered: u64,
    /// Events the sink failed to accept
    pub events_failed: u64,
    /// Ticks that ended with a walker held in place
    pub stuck_ticks: u64,
    /// Completed ticks per asset category
    pub ticks_by_category: BTreeMap<AssetCategory, u64>,
    /// Wall-clock time between start and the last walker stopping
    pub run_duration: Duration,
}

impl SimulationStatistics {
    /// Statistics for a run about to start `walkers` walkers
    pub fn new(walkers: usize) -> Self {
        Self { walkers_started: walkers, ..Default::default() }
    }

    /// Fold one walker's report into the totals
    pub fn record_report(&mut self, report: &WalkReport) {
        self.walkers_completed += 1;
        if report.final_state == WalkState::Failed {
            self.walkers_failed += 1;
        }
        self.total_ticks += report.ticks;
        self.events_delivered += report.delivered;
        self.events_failed += report.failed;
        self.stuck_ticks += report.stuck_ticks;
        *self.ticks_by_category.entry(report.category).or_insert(0) += report.ticks;
    }

    /// Count a walker whose task ended abnormally
    pub fn record_crash(&mut self) {
        self.walkers_crashed += 1;
    }

    /// Share of delivery attempts that succeeded, as a percentage
    pub fn delivery_rate(&self) -> f64 {
        percentage(self.events_delivered, self.events_delivered + self.events_failed)
    }

    /// Human-readable summary
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();
        report.push_str("Simulation Summary:\n");
        report.push_str(&format!(
            "  Walkers: {} started, {} completed, {} crashed, {} failed\n",
            self.walkers_started, self.walkers_completed, self.walkers_crashed, self.walkers_failed
        ));
        report.push_str(&format!("  Ticks: {}\n", self.total_ticks));
        report.push_str(&format!(
            "  Events: {} delivered, {} failed ({:.1}% delivered)\n",
            self.events_delivered,
            self.events_failed,
            self.delivery_rate()
        ));
        report.push_str(&format!("  Stuck Ticks: {}\n", self.stuck_ticks));
        for (category, ticks) in &self.ticks_by_category {
            report.push_str(&format!("  {} ticks: {}\n", category, ticks));
        }
        report.push_str(&format!("  Duration: {:.1}s", self.run_duration.as_secs_f64()));
        report
    }
}

impl fmt::Display for SimulationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary_report())
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
