//! Error types for waymark-core.
//!
//! Nothing in the dispatch pipeline is fatal: record lookups and metadata
//! resolution degrade to a logged skip and processing continues. These types
//! exist so the degraded paths log something structured, and so the one
//! genuinely fallible entry point (config parsing) has a real `Result`.

use thiserror::Error;

use crate::node::NodeId;

/// Top-level error type for waymark-core.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Which store namespace a lookup went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Interval,
    Standard,
    PointOfInterest,
    LocationGroup,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordKind::Interval => "interval",
            RecordKind::Standard => "standard",
            RecordKind::PointOfInterest => "point-of-interest",
            RecordKind::LocationGroup => "location-group",
        };
        f.write_str(s)
    }
}

/// A tracked record was missing for a node the host reported on.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("no tracked {kind} record for node `{id}`")]
    NotFound { kind: RecordKind, id: NodeId },
}

/// Metadata resolution failed; the affected field keeps its default.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("node `{id}` carries no location reference")]
    Location { id: NodeId },

    #[error("achievement timestamp unavailable for node `{id}`")]
    Timestamp { id: NodeId },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
