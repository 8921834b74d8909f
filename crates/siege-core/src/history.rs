//! Per-round data collection.
//!
//! [`RoundHistory`] is a [`RoundCallback`] that keeps the snapshot of every
//! completed round, giving a presentation layer the time series it plots:
//! unit store, deployable slots, guard and target counts, and the units
//! held by each guard.

use siege_types::{GuardId, WorldSnapshot};

use crate::round::RoundSummary;
use crate::runner::RoundCallback;
use crate::world::WorldState;

/// Recorded snapshots, one per round that advanced.
#[derive(Debug, Clone, Default)]
pub struct RoundHistory {
    records: Vec<WorldSnapshot>,
}

impl RoundHistory {
    /// An empty history.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// All recorded snapshots in round order.
    pub fn records(&self) -> &[WorldSnapshot] {
        &self.records
    }

    /// Number of recorded rounds.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<&WorldSnapshot> {
        self.records.last()
    }

    /// Station store after each round.
    pub fn unit_store_series(&self) -> Vec<u32> {
        self.records.iter().map(|s| s.unit_store).collect()
    }

    /// Deployable slots after each round.
    pub fn deployable_slots_series(&self) -> Vec<u32> {
        self.records.iter().map(|s| s.deployable_slots).collect()
    }

    /// Guard count after each round.
    pub fn guard_count_series(&self) -> Vec<u32> {
        self.records.iter().map(|s| s.guard_count).collect()
    }

    /// Target count after each round.
    pub fn target_count_series(&self) -> Vec<u32> {
        self.records.iter().map(|s| s.target_count).collect()
    }

    /// Units held by one guard after each round (`None` before it existed
    /// or after it was retired).
    pub fn guard_units_series(&self, guard: GuardId) -> Vec<Option<u32>> {
        self.records
            .iter()
            .map(|s| s.per_guard_units.get(&guard).copied())
            .collect()
    }
}

impl RoundCallback for RoundHistory {
    fn on_round(&mut self, summary: &RoundSummary, _state: &WorldState) {
        if summary.advanced {
            self.records.push(summary.snapshot.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SiegeConfig;
    use crate::round::run_round;

    #[test]
    fn records_each_advanced_round() {
        let mut config = SiegeConfig::default();
        config.station.initial_units = 0;
        config.station.max_deployable = 0;
        let mut world = WorldState::new(&config).unwrap();
        let mut history = RoundHistory::new();

        for _ in 0..3 {
            let summary = run_round(&mut world).unwrap();
            history.on_round(&summary, &world);
        }

        // The first round ends the siege; later calls do not advance.
        assert_eq!(history.len(), 1);
        assert_eq!(history.unit_store_series(), vec![0]);
        assert_eq!(history.deployable_slots_series(), vec![0]);
        assert_eq!(history.guard_count_series(), vec![5]);
        assert_eq!(history.target_count_series(), vec![10]);
    }

    #[test]
    fn guard_series_tracks_holdings() {
        let mut world = WorldState::new(&SiegeConfig::default()).unwrap();
        let guard = world.guards().first().unwrap().id();
        let mut history = RoundHistory::new();

        let summary = run_round(&mut world).unwrap();
        history.on_round(&summary, &world);

        let series = history.guard_units_series(guard);
        assert_eq!(series.len(), 1);
        assert!(series.first().unwrap().is_some());
        assert_eq!(history.guard_units_series(GuardId::new()), vec![None]);
        assert_eq!(history.last().unwrap().round, 1);
    }
}
