//! Node classification.
//!
//! Every node shape maps deterministically to one of three handling
//! categories. Classification is pure and total: shapes the set does not
//! know about are handled as plain one-shot milestones with no location,
//! never as errors.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::IntervalLabels;
use crate::node::{LocationRef, NodeShape, ProgressNode};

/// Handling category of a progress node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    /// One-shot milestone, optionally owned by a location.
    Standard,
    /// Repeating record milestone (altitude, depth, distance, speed).
    Interval,
    /// Location-discovery milestone with no interval or location owner.
    PointOfInterest,
}

/// Record value extracted from an interval node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub value: f64,
    pub label: String,
}

impl IntervalRecord {
    fn empty() -> Self {
        Self {
            value: 0.0,
            label: String::new(),
        }
    }
}

/// Classify a node by its concrete shape.
pub fn classify(node: &ProgressNode) -> NodeCategory {
    match node.shape {
        NodeShape::AltitudeRecord { .. }
        | NodeShape::DepthRecord { .. }
        | NodeShape::DistanceRecord { .. }
        | NodeShape::SpeedRecord { .. } => NodeCategory::Interval,
        NodeShape::PointOfInterest { .. } => NodeCategory::PointOfInterest,
        NodeShape::LocationMilestone { .. } | NodeShape::Other { .. } => NodeCategory::Standard,
    }
}

/// Extract the current record value and its configured label.
///
/// Only meaningful when [`classify`] returned [`NodeCategory::Interval`];
/// any other shape yields a zero record with an empty label. Callers check
/// the category first.
pub fn interval_record(node: &ProgressNode, labels: &IntervalLabels) -> IntervalRecord {
    let (value, label) = match node.shape {
        NodeShape::AltitudeRecord { best } => (best, &labels.altitude),
        NodeShape::DepthRecord { best } => (best, &labels.depth),
        NodeShape::DistanceRecord { best } => (best, &labels.distance),
        NodeShape::SpeedRecord { best } => (best, &labels.speed),
        _ => return IntervalRecord::empty(),
    };
    IntervalRecord {
        value,
        label: label.clone(),
    }
}

/// Resolve the location owning a node, if its shape carries one.
///
/// A location-owned shape delivered without its location is logged and
/// resolves to `None`; a missing location must never abort the reward
/// pipeline.
pub fn resolve_location(node: &ProgressNode) -> Option<LocationRef> {
    match &node.shape {
        NodeShape::LocationMilestone { location, kind } => {
            if location.is_none() {
                warn!(id = %node.id, ?kind, "location milestone carries no location reference");
            }
            location.clone()
        }
        _ => None,
    }
}
