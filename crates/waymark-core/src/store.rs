//! Tracked progress records and the store seam.
//!
//! The dispatcher never owns progress data; it mutates records held by a
//! [`ProgressStore`]. The store keeps three separate namespaces (interval,
//! standard, point-of-interest) because the host does not guarantee the id
//! space is disjoint across node kinds, plus location-scoped sub-namespaces
//! for milestones owned by a location.
//!
//! [`MemoryStore`] is the in-memory implementation used by hosts that
//! repopulate from the running session, and by the test suite.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::node::{LocationRef, NodeId};

/// Per-node state for a repeating record milestone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedInterval {
    /// Count of record thresholds already rewarded.
    pub interval: u32,
    /// Record value last rewarded; the staleness baseline for the current
    /// interval index.
    pub best_record: f64,
}

impl TrackedInterval {
    pub fn new(interval: u32, best_record: f64) -> Self {
        Self {
            interval,
            best_record,
        }
    }

    /// A newly reported record at or below the baseline is a stale or
    /// redelivered event.
    pub fn is_stale(&self, value: f64) -> bool {
        self.best_record >= value
    }

    /// Move to the next interval index after a grant, taking the rewarded
    /// value as the new baseline.
    pub fn advance(&mut self, value: f64) {
        self.interval += 1;
        self.best_record = value;
    }
}

/// Per-node state for a one-shot milestone (standard or point-of-interest).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedStandard {
    /// Set on the granting pass; enforces at-most-once-ever per node id.
    pub rewarded: bool,
    /// Actor or vehicle name recorded at completion, empty if unresolvable.
    pub note_reference: String,
    /// Host game-clock time of the achievement, `0.0` if unreadable.
    pub achieved_time: f64,
}

/// Location-scoped sub-namespace of standard records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationGroup {
    location: LocationRef,
    nodes: HashMap<NodeId, TrackedStandard>,
}

impl LocationGroup {
    pub fn new(location: LocationRef) -> Self {
        Self {
            location,
            nodes: HashMap::new(),
        }
    }

    pub fn location(&self) -> &LocationRef {
        &self.location
    }

    pub fn track(&mut self, id: impl Into<NodeId>) -> &mut TrackedStandard {
        self.nodes.entry(id.into()).or_default()
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut TrackedStandard> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &TrackedStandard)> {
        self.nodes.iter()
    }
}

/// Aggregate rollup of overall achievement progress.
///
/// Recomputed from scratch on every refresh; calling it redundantly is safe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

/// Storage seam consumed by the dispatcher.
///
/// Lookups return `None` for untracked ids; the dispatcher logs and skips
/// reward logic rather than creating records on the fly. Population is the
/// store owner's job when a session begins.
pub trait ProgressStore {
    fn interval_mut(&mut self, id: &NodeId) -> Option<&mut TrackedInterval>;
    fn standard_mut(&mut self, id: &NodeId) -> Option<&mut TrackedStandard>;
    fn poi_mut(&mut self, id: &NodeId) -> Option<&mut TrackedStandard>;
    fn location_group_mut(&mut self, location: &LocationRef) -> Option<&mut LocationGroup>;

    /// Recompute the completion summary. Idempotent.
    fn update_completion_summary(&mut self);

    fn completion_summary(&self) -> CompletionSummary;

    /// Drop all tracked records; called on session transitions.
    fn reset(&mut self);
}

/// In-memory [`ProgressStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    intervals: HashMap<NodeId, TrackedInterval>,
    standards: HashMap<NodeId, TrackedStandard>,
    pois: HashMap<NodeId, TrackedStandard>,
    groups: HashMap<LocationRef, LocationGroup>,
    summary: CompletionSummary,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an interval node.
    pub fn track_interval(&mut self, id: impl Into<NodeId>, record: TrackedInterval) {
        self.intervals.insert(id.into(), record);
    }

    /// Start tracking a globally-registered standard node.
    pub fn track_standard(&mut self, id: impl Into<NodeId>) -> &mut TrackedStandard {
        self.standards.entry(id.into()).or_default()
    }

    /// Start tracking a point-of-interest node.
    pub fn track_poi(&mut self, id: impl Into<NodeId>) -> &mut TrackedStandard {
        self.pois.entry(id.into()).or_default()
    }

    /// Get or create the sub-namespace for a location.
    pub fn track_location(&mut self, location: impl Into<LocationRef>) -> &mut LocationGroup {
        let location = location.into();
        self.groups
            .entry(location.clone())
            .or_insert_with(|| LocationGroup::new(location))
    }
}

impl ProgressStore for MemoryStore {
    fn interval_mut(&mut self, id: &NodeId) -> Option<&mut TrackedInterval> {
        self.intervals.get_mut(id)
    }

    fn standard_mut(&mut self, id: &NodeId) -> Option<&mut TrackedStandard> {
        self.standards.get_mut(id)
    }

    fn poi_mut(&mut self, id: &NodeId) -> Option<&mut TrackedStandard> {
        self.pois.get_mut(id)
    }

    fn location_group_mut(&mut self, location: &LocationRef) -> Option<&mut LocationGroup> {
        self.groups.get_mut(location)
    }

    fn update_completion_summary(&mut self) {
        let standards = self
            .standards
            .values()
            .chain(self.pois.values())
            .chain(self.groups.values().flat_map(|g| g.nodes.values()));

        let mut total = 0;
        let mut completed = 0;
        for record in standards {
            total += 1;
            if record.rewarded {
                completed += 1;
            }
        }
        for interval in self.intervals.values() {
            total += 1;
            if interval.interval > 0 {
                completed += 1;
            }
        }

        let percent = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        self.summary = CompletionSummary {
            completed,
            total,
            percent,
        };
    }

    fn completion_summary(&self) -> CompletionSummary {
        self.summary
    }

    fn reset(&mut self) {
        self.intervals.clear();
        self.standards.clear();
        self.pois.clear();
        self.groups.clear();
        self.summary = CompletionSummary::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staleness_baseline_is_inclusive() {
        let tracked = TrackedInterval::new(2, 500.0);
        assert!(tracked.is_stale(500.0));
        assert!(tracked.is_stale(499.9));
        assert!(!tracked.is_stale(500.1));
    }

    #[test]
    fn advance_moves_baseline_and_index() {
        let mut tracked = TrackedInterval::new(0, 0.0);
        tracked.advance(120.0);
        assert_eq!(tracked.interval, 1);
        assert_eq!(tracked.best_record, 120.0);
        assert!(tracked.is_stale(120.0));
    }

    #[test]
    fn namespaces_are_separate() {
        let mut store = MemoryStore::new();
        store.track_standard("shared-id");
        let id = NodeId::from("shared-id");
        assert!(store.standard_mut(&id).is_some());
        assert!(store.poi_mut(&id).is_none());
        assert!(store.interval_mut(&id).is_none());
    }

    #[test]
    fn summary_counts_all_namespaces() {
        let mut store = MemoryStore::new();
        store.track_standard("a").rewarded = true;
        store.track_poi("b");
        store.track_interval("c", TrackedInterval::new(1, 80.0));
        store.track_location("Mun").track("d").rewarded = true;

        store.update_completion_summary();
        let summary = store.completion_summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.percent, 75.0);
    }

    #[test]
    fn summary_refresh_is_idempotent() {
        let mut store = MemoryStore::new();
        store.track_standard("a").rewarded = true;
        store.update_completion_summary();
        let first = store.completion_summary();
        store.update_completion_summary();
        assert_eq!(store.completion_summary(), first);
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = MemoryStore::new();
        store.track_standard("a");
        store.track_interval("b", TrackedInterval::default());
        store.update_completion_summary();
        store.reset();
        assert!(store.standard_mut(&NodeId::from("a")).is_none());
        assert_eq!(store.completion_summary(), CompletionSummary::default());
    }
}
