//! Progress node model.
//!
//! The host achievement system delivers one [`ProgressNode`] per event. The
//! node's shape is a closed tagged sum: the host builds the right variant at
//! construction time, including any associated location and the achievement
//! timestamp, so the core never has to introspect host internals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a progress node, assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Reference to a location owning a milestone (a planet, region, site...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationRef(String);

impl LocationRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationRef {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// The known one-shot milestone kinds that are owned by a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    BaseConstruction,
    Docking,
    Escape,
    FlagPlant,
    Flight,
    Flyby,
    Landing,
    Orbit,
    Rendezvous,
    Return,
    Science,
    Spacewalk,
    Splashdown,
    StationConstruction,
    Suborbit,
    SurfaceExcursion,
    Transfer,
}

/// Concrete shape of a progress node.
///
/// The four record shapes repeat: every new best value is a fresh milestone.
/// `Other` covers any shape the host grows that this set does not know about
/// yet; it is handled as a plain one-shot with no location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeShape {
    AltitudeRecord { best: f64 },
    DepthRecord { best: f64 },
    DistanceRecord { best: f64 },
    SpeedRecord { best: f64 },
    PointOfInterest { name: String },
    LocationMilestone {
        kind: MilestoneKind,
        location: Option<LocationRef>,
    },
    Other { kind: String },
}

/// One unit of trackable achievement, as delivered by the host event source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressNode {
    pub id: NodeId,
    /// The node's threshold has been reached.
    pub reached: bool,
    /// The node is fully complete.
    pub complete: bool,
    /// Host game-clock time at which the node was achieved, when the host
    /// could read it. `None` models an unreadable timestamp.
    pub achieved_at: Option<f64>,
    pub shape: NodeShape,
}

impl ProgressNode {
    pub fn new(id: impl Into<NodeId>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            reached: false,
            complete: false,
            achieved_at: None,
            shape,
        }
    }

    pub fn reached(mut self) -> Self {
        self.reached = true;
        self
    }

    pub fn completed(mut self) -> Self {
        self.complete = true;
        self
    }

    pub fn achieved_at(mut self, time: f64) -> Self {
        self.achieved_at = Some(time);
        self
    }
}
