//! Reward dispatch state machine.
//!
//! One [`RewardDispatcher`] instance serves a session. The host event source
//! calls the three phase handlers synchronously and in whatever order its
//! own plumbing produces them; every handler is safe against redelivery and
//! against phases arriving out of order. The record-value staleness check on
//! interval nodes is the authoritative duplicate guard, and the `rewarded`
//! flag on one-shot records enforces at-most-once-ever.
//!
//! Handlers never fail. Missing records and unresolvable metadata are logged
//! and skipped; a reward whose preconditions hold is granted even when the
//! note or timestamp cannot be resolved.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::classify::{self, NodeCategory};
use crate::config::TrackerConfig;
use crate::error::{RecordError, RecordKind, ResolveError};
use crate::events::{Phase, ProgressEvent};
use crate::node::{LocationRef, NodeId, ProgressNode};
use crate::store::{ProgressStore, TrackedInterval, TrackedStandard};

/// Opaque reward computation, supplied by the host.
pub trait RewardSink {
    /// Grant the reward for an interval milestone at the given index.
    fn grant_interval(&mut self, id: &NodeId, record: &TrackedInterval, interval: u32);

    /// Grant the reward for a one-shot milestone. `location` is the owning
    /// location when one resolved; points of interest never carry one.
    fn grant_standard(
        &mut self,
        id: &NodeId,
        record: &TrackedStandard,
        location: Option<&LocationRef>,
    );
}

/// Host-side name lookups used to annotate completed milestones.
pub trait NameResolver {
    fn actor_name(&self, node: &ProgressNode) -> Option<String>;
    fn vehicle_name(&self, node: &ProgressNode) -> Option<String>;
}

/// Outcome of the shared interval-grant path.
enum IntervalStep {
    Granted(ProgressEvent),
    /// Record value at or below the rewarded baseline; redelivery.
    Stale,
    /// Not an interval node, not tracked, or threshold not reached.
    Skipped,
}

/// Classifies incoming progress nodes and drives reward grants against the
/// tracked records in the store.
pub struct RewardDispatcher<S, R, N> {
    store: S,
    rewards: R,
    names: N,
    config: TrackerConfig,
    initialized: bool,
}

impl<S, R, N> RewardDispatcher<S, R, N>
where
    S: ProgressStore,
    R: RewardSink,
    N: NameResolver,
{
    pub fn new(store: S, rewards: R, names: N, config: TrackerConfig) -> Self {
        Self {
            store,
            rewards,
            names,
            config,
            initialized: false,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Mark the dispatcher ready for a (re)populated store.
    ///
    /// The host repopulates records through [`store_mut`](Self::store_mut)
    /// between `reset` and `initialize`.
    pub fn initialize(&mut self) {
        self.initialized = true;
        info!("progress tracking initialized");
    }

    /// Drop all tracked records. Called on session transitions.
    pub fn reset(&mut self) {
        self.store.reset();
        self.initialized = false;
        info!("progress records cleared");
    }

    /// Session/scene change signal from the host: invalidate and restart.
    pub fn on_session_change(&mut self) {
        self.reset();
        self.initialize();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn rewards(&self) -> &R {
        &self.rewards
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // ── Phase handlers ───────────────────────────────────────────────

    /// A node's threshold was reached.
    pub fn on_reach(&mut self, node: Option<&ProgressNode>) -> Option<ProgressEvent> {
        self.record_phase(node, Phase::Reach)
    }

    /// A node was achieved. Same policy as [`on_reach`](Self::on_reach); the
    /// host fires the two phases from different code paths.
    pub fn on_achieve(&mut self, node: Option<&ProgressNode>) -> Option<ProgressEvent> {
        self.record_phase(node, Phase::Achieve)
    }

    /// A node was completed.
    pub fn on_complete(&mut self, node: Option<&ProgressNode>) -> Option<ProgressEvent> {
        let node = node?;
        if !node.complete {
            return None;
        }

        let event = match classify::classify(node) {
            NodeCategory::Interval => match self.try_interval_grant(node, Phase::Complete) {
                IntervalStep::Granted(event) => Some(event),
                IntervalStep::Stale | IntervalStep::Skipped => None,
            },
            NodeCategory::PointOfInterest => self.complete_poi(node),
            NodeCategory::Standard => self.complete_standard(node),
        };

        self.store.update_completion_summary();
        event
    }

    fn record_phase(&mut self, node: Option<&ProgressNode>, phase: Phase) -> Option<ProgressEvent> {
        let node = node?;

        let step = self.try_interval_grant(node, phase);
        if let IntervalStep::Stale = step {
            // Redelivered record; no side effects at all.
            return None;
        }

        self.store.update_completion_summary();
        match step {
            IntervalStep::Granted(event) => Some(event),
            _ => None,
        }
    }

    /// Shared interval path for all three phases. Grants for the *current*
    /// interval index, then advances the counter and baseline so a second
    /// phase carrying the same record value is stale.
    fn try_interval_grant(&mut self, node: &ProgressNode, phase: Phase) -> IntervalStep {
        if classify::classify(node) != NodeCategory::Interval {
            return IntervalStep::Skipped;
        }

        let record = classify::interval_record(node, &self.config.labels);

        let Some(tracked) = self.store.interval_mut(&node.id) else {
            let err = RecordError::NotFound {
                kind: RecordKind::Interval,
                id: node.id.clone(),
            };
            match phase {
                Phase::Complete => warn!(%err, "interval completion without a tracked record"),
                _ => debug!(%err, "nothing to compare against yet"),
            }
            return IntervalStep::Skipped;
        };

        if tracked.is_stale(record.value) {
            debug!(
                id = %node.id,
                value = record.value,
                baseline = tracked.best_record,
                "stale interval record"
            );
            return IntervalStep::Stale;
        }

        if !node.reached {
            return IntervalStep::Skipped;
        }

        let interval = tracked.interval;
        self.rewards.grant_interval(&node.id, tracked, interval);
        tracked.advance(record.value);

        IntervalStep::Granted(ProgressEvent::IntervalRewarded {
            id: node.id.clone(),
            interval,
            value: record.value,
            label: record.label,
            phase,
            at: Utc::now(),
        })
    }

    fn complete_poi(&mut self, node: &ProgressNode) -> Option<ProgressEvent> {
        let Some(record) = self.store.poi_mut(&node.id) else {
            let err = RecordError::NotFound {
                kind: RecordKind::PointOfInterest,
                id: node.id.clone(),
            };
            warn!(%err, "point of interest completion dropped");
            return None;
        };

        if record.rewarded {
            debug!(id = %node.id, "point of interest already rewarded");
            return None;
        }

        // Grant before touching metadata; resolution failures below must not
        // cost the reward.
        self.rewards.grant_standard(&node.id, record, None);
        record.rewarded = true;
        record.note_reference = self.names.vehicle_name(node).unwrap_or_default();
        record.achieved_time = read_achieved_time(node);

        Some(ProgressEvent::PoiRewarded {
            id: node.id.clone(),
            note: record.note_reference.clone(),
            achieved_time: record.achieved_time,
            at: Utc::now(),
        })
    }

    fn complete_standard(&mut self, node: &ProgressNode) -> Option<ProgressEvent> {
        let location = classify::resolve_location(node);

        // Globally-registered nodes first; location-owned nodes live in
        // their group's namespace.
        if let Some(record) = self.store.standard_mut(&node.id) {
            if record.rewarded {
                debug!(id = %node.id, "milestone already rewarded");
                return None;
            }

            self.rewards.grant_standard(&node.id, record, location.as_ref());
            record.rewarded = true;
            record.note_reference = milestone_note(&self.names, node);
            record.achieved_time = read_achieved_time(node);

            return Some(ProgressEvent::MilestoneRewarded {
                id: node.id.clone(),
                location,
                note: record.note_reference.clone(),
                achieved_time: record.achieved_time,
                at: Utc::now(),
            });
        }

        let Some(location) = location else {
            let err = ResolveError::Location { id: node.id.clone() };
            info!(%err, "milestone is not tracked globally and owns no location");
            return None;
        };

        let Some(group) = self.store.location_group_mut(&location) else {
            let err = RecordError::NotFound {
                kind: RecordKind::LocationGroup,
                id: node.id.clone(),
            };
            warn!(%err, location = %location, "no record group for location");
            return None;
        };

        let Some(record) = group.node_mut(&node.id) else {
            let err = RecordError::NotFound {
                kind: RecordKind::Standard,
                id: node.id.clone(),
            };
            warn!(%err, location = %location, "location group has no record for node");
            return None;
        };

        if record.rewarded {
            debug!(id = %node.id, "milestone already rewarded");
            return None;
        }

        self.rewards.grant_standard(&node.id, record, Some(&location));
        record.rewarded = true;
        record.note_reference = milestone_note(&self.names, node);
        record.achieved_time = read_achieved_time(node);

        Some(ProgressEvent::MilestoneRewarded {
            id: node.id.clone(),
            location: Some(location),
            note: record.note_reference.clone(),
            achieved_time: record.achieved_time,
            at: Utc::now(),
        })
    }
}

/// Completion note: prefer an actor (crew) name, fall back to the vehicle,
/// else leave empty.
fn milestone_note<N: NameResolver>(names: &N, node: &ProgressNode) -> String {
    names
        .actor_name(node)
        .filter(|name| !name.is_empty())
        .or_else(|| names.vehicle_name(node))
        .unwrap_or_default()
}

/// Achievement timestamp from the node, degrading to the `0.0` default with
/// a log line when the host could not read it.
fn read_achieved_time(node: &ProgressNode) -> f64 {
    match node.achieved_at {
        Some(time) => time,
        None => {
            let err = ResolveError::Timestamp { id: node.id.clone() };
            warn!(%err, "leaving achievement time at default");
            0.0
        }
    }
}
