//! # Waymark Core Library
//!
//! This library provides the core logic for Waymark: classifying progress
//! nodes delivered by a host achievement system and dispatching reward
//! grants exactly once per qualifying milestone crossing.
//!
//! ## Architecture
//!
//! - **Classifier**: a pure, total mapping from a node's concrete shape to
//!   its handling category, plus record-value and location extraction
//! - **Dispatcher**: a per-node state machine driven by the host's
//!   reached/achieved/completed callbacks, idempotent under redelivery and
//!   out-of-order phases
//! - **Store**: tracked progress records behind a trait, with an in-memory
//!   implementation
//!
//! Data flows one way: raw node → classifier → dispatcher → store update +
//! reward grant. The classifier holds no state; all mutable state lives in
//! the store.
//!
//! ## Key components
//!
//! - [`RewardDispatcher`]: the event-handling state machine
//! - [`classify`](classify::classify): shape-to-category classification
//! - [`ProgressStore`] / [`MemoryStore`]: the storage seam
//! - [`RewardSink`] / [`NameResolver`]: host collaborator traits

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod node;
pub mod store;

pub use classify::{IntervalRecord, NodeCategory};
pub use config::{IntervalLabels, TrackerConfig};
pub use dispatch::{NameResolver, RewardDispatcher, RewardSink};
pub use error::{ConfigError, RecordError, RecordKind, ResolveError, TrackError};
pub use events::{Phase, ProgressEvent};
pub use node::{LocationRef, MilestoneKind, NodeId, NodeShape, ProgressNode};
pub use store::{
    CompletionSummary, LocationGroup, MemoryStore, ProgressStore, TrackedInterval, TrackedStandard,
};
