//! Events emitted by the reward dispatcher.
//!
//! Each grant produces exactly one event; hosts that want an activity feed or
//! a notification toast subscribe to these instead of wrapping the sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::{LocationRef, NodeId};

/// Which host delivery phase triggered an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Reach,
    Achieve,
    Complete,
}

/// A reward was granted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// An interval milestone crossed a new record threshold.
    IntervalRewarded {
        id: NodeId,
        /// Interval index the grant was issued for (pre-advance).
        interval: u32,
        value: f64,
        label: String,
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// A standard one-shot milestone completed.
    MilestoneRewarded {
        id: NodeId,
        location: Option<LocationRef>,
        note: String,
        achieved_time: f64,
        at: DateTime<Utc>,
    },
    /// A point of interest was discovered.
    PoiRewarded {
        id: NodeId,
        note: String,
        achieved_time: f64,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = ProgressEvent::IntervalRewarded {
            id: NodeId::from("alt"),
            interval: 3,
            value: 21_000.0,
            label: "Altitude Record".to_string(),
            phase: Phase::Reach,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "interval_rewarded");
        assert_eq!(json["interval"], 3);
        assert_eq!(json["phase"], "reach");
    }
}
