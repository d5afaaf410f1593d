//! Integration tests for the reward pipeline.
//!
//! Drives a populated store through realistic event sequences the way a host
//! session would: mixed node kinds, redelivered phases, and a session
//! transition, asserting grants and the completion rollup at each step.

use waymark_core::{
    LocationRef, MemoryStore, MilestoneKind, NameResolver, NodeId, NodeShape, ProgressNode,
    ProgressStore, RewardDispatcher, RewardSink, TrackedInterval, TrackedStandard, TrackerConfig,
};

#[derive(Default)]
struct GrantLog {
    intervals: Vec<(NodeId, u32)>,
    standards: Vec<(NodeId, Option<LocationRef>)>,
}

impl RewardSink for GrantLog {
    fn grant_interval(&mut self, id: &NodeId, _record: &TrackedInterval, interval: u32) {
        self.intervals.push((id.clone(), interval));
    }

    fn grant_standard(
        &mut self,
        id: &NodeId,
        _record: &TrackedStandard,
        location: Option<&LocationRef>,
    ) {
        self.standards.push((id.clone(), location.cloned()));
    }
}

struct SessionNames;

impl NameResolver for SessionNames {
    fn actor_name(&self, node: &ProgressNode) -> Option<String> {
        // Only crewed milestones have an actor in this scenario.
        (node.id.as_str() == "first-orbit").then(|| "Jeb".to_string())
    }

    fn vehicle_name(&self, _node: &ProgressNode) -> Option<String> {
        Some("Pioneer 4".to_string())
    }
}

fn session() -> RewardDispatcher<MemoryStore, GrantLog, SessionNames> {
    let mut store = MemoryStore::new();
    store.track_interval("speed", TrackedInterval::new(0, 0.0));
    store.track_standard("first-orbit");
    store.track_poi("anomaly");
    store.track_location("Mun").track("mun-landing");

    let mut dispatcher = RewardDispatcher::new(
        store,
        GrantLog::default(),
        SessionNames,
        TrackerConfig::default(),
    );
    dispatcher.initialize();
    dispatcher
}

fn speed(best: f64) -> ProgressNode {
    ProgressNode::new("speed", NodeShape::SpeedRecord { best }).reached()
}

#[test]
fn full_session_workflow() {
    let mut d = session();

    // Two genuine speed records, each phase redelivered once.
    assert!(d.on_reach(Some(&speed(100.0))).is_some());
    assert!(d.on_achieve(Some(&speed(100.0))).is_none());
    assert!(d.on_reach(Some(&speed(250.0))).is_some());
    assert!(d.on_reach(Some(&speed(250.0))).is_none());

    // Crewed orbit milestone completes, with timestamp.
    let orbit = ProgressNode::new(
        "first-orbit",
        NodeShape::LocationMilestone {
            kind: MilestoneKind::Orbit,
            location: Some(LocationRef::from("Home")),
        },
    )
    .reached()
    .completed()
    .achieved_at(3_600.0);
    assert!(d.on_complete(Some(&orbit)).is_some());

    // Location-owned landing, found through the Mun group.
    let landing = ProgressNode::new(
        "mun-landing",
        NodeShape::LocationMilestone {
            kind: MilestoneKind::Landing,
            location: Some(LocationRef::from("Mun")),
        },
    )
    .reached()
    .completed()
    .achieved_at(7_200.0);
    assert!(d.on_complete(Some(&landing)).is_some());

    // Anomaly discovery, timestamp unreadable.
    let anomaly = ProgressNode::new(
        "anomaly",
        NodeShape::PointOfInterest { name: "Arch".to_string() },
    )
    .completed();
    assert!(d.on_complete(Some(&anomaly)).is_some());

    assert_eq!(
        d.rewards().intervals,
        vec![(NodeId::from("speed"), 0), (NodeId::from("speed"), 1)]
    );
    assert_eq!(
        d.rewards().standards,
        vec![
            (NodeId::from("first-orbit"), Some(LocationRef::from("Home"))),
            (NodeId::from("mun-landing"), Some(LocationRef::from("Mun"))),
            (NodeId::from("anomaly"), None),
        ]
    );

    // Every one-shot rewarded, interval past its first threshold.
    let summary = d.store().completion_summary();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.completed, 4);
    assert_eq!(summary.percent, 100.0);
}

#[test]
fn metadata_lands_on_the_tracked_records() {
    let mut d = session();

    let orbit = ProgressNode::new(
        "first-orbit",
        NodeShape::LocationMilestone {
            kind: MilestoneKind::Orbit,
            location: Some(LocationRef::from("Home")),
        },
    )
    .completed()
    .achieved_at(3_600.0);
    d.on_complete(Some(&orbit));

    let anomaly = ProgressNode::new(
        "anomaly",
        NodeShape::PointOfInterest { name: "Arch".to_string() },
    )
    .completed();
    d.on_complete(Some(&anomaly));

    let orbit_record = d.store_mut().standard_mut(&NodeId::from("first-orbit")).unwrap();
    assert_eq!(orbit_record.note_reference, "Jeb");
    assert_eq!(orbit_record.achieved_time, 3_600.0);

    let poi_record = d.store_mut().poi_mut(&NodeId::from("anomaly")).unwrap();
    assert_eq!(poi_record.note_reference, "Pioneer 4");
    assert_eq!(poi_record.achieved_time, 0.0);
}

#[test]
fn redelivery_across_phases_never_double_grants() {
    let mut d = session();

    let node = speed(300.0).completed();
    d.on_reach(Some(&node));
    d.on_achieve(Some(&node));
    d.on_complete(Some(&node));
    d.on_complete(Some(&node));

    assert_eq!(d.rewards().intervals, vec![(NodeId::from("speed"), 0)]);
    let tracked = d.store_mut().interval_mut(&NodeId::from("speed")).unwrap();
    assert_eq!(tracked.interval, 1);
    assert_eq!(tracked.best_record, 300.0);
}

#[test]
fn completion_before_reach_uses_the_same_guard() {
    let mut d = session();

    // Host delivers complete first, then the (now stale) reach.
    let node = speed(180.0).completed();
    d.on_complete(Some(&node));
    d.on_reach(Some(&node));

    assert_eq!(d.rewards().intervals.len(), 1);
}

#[test]
fn untracked_nodes_degrade_to_summary_refresh_only() {
    let mut d = session();

    let unknown = ProgressNode::new("mystery", NodeShape::Other { kind: "Mystery".to_string() })
        .reached()
        .completed();
    assert!(d.on_complete(Some(&unknown)).is_none());

    let untracked_poi = ProgressNode::new(
        "other-anomaly",
        NodeShape::PointOfInterest { name: "Crater".to_string() },
    )
    .completed();
    assert!(d.on_complete(Some(&untracked_poi)).is_none());

    assert!(d.rewards().standards.is_empty());
    // The rollup still ran over the populated store.
    assert_eq!(d.store().completion_summary().total, 4);
}

#[test]
fn session_change_starts_from_a_clean_store() {
    let mut d = session();
    d.on_reach(Some(&speed(500.0)));
    assert_eq!(d.rewards().intervals.len(), 1);

    d.on_session_change();
    assert!(d.is_initialized());

    // Old interval record is gone; a redelivered event has nothing to
    // compare against and grants nothing.
    assert!(d.on_reach(Some(&speed(500.0))).is_none());
    assert_eq!(d.rewards().intervals.len(), 1);
    assert_eq!(d.store().completion_summary().total, 0);
}
