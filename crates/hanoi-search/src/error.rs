//! Error types for configuration construction and move application.

use thiserror::Error;

use crate::tower::{Move, Ring};

/// Errors returned by the search core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HanoiError {
    /// A configuration violates the stacking invariant or does not belong
    /// to the puzzle instance it was offered to.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationFault),

    /// A move was applied to a configuration where it is not legal.
    #[error("invalid move ({mv}): {fault}")]
    InvalidMove { mv: Move, fault: MoveFault },
}

/// Why a configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationFault {
    #[error("a configuration needs at least one tower")]
    NoTowers,

    #[error("a puzzle needs at least one ring")]
    NoRings,

    #[error("{requested} rings exceed the largest ring size")]
    TooManyRings { requested: usize },

    #[error("ring sizes must be positive")]
    ZeroRing,

    #[error("ring {0} appears more than once")]
    DuplicateRing(Ring),

    /// Rings must strictly decrease from bottom to top.
    #[error("tower {tower}: ring {above} sits on ring {below}")]
    RingOrder { tower: usize, below: Ring, above: Ring },

    #[error("tower index {tower} is out of range for {tower_count} towers")]
    TowerOutOfRange { tower: usize, tower_count: usize },

    #[error("expected {expected} rings, found {found}")]
    RingCountMismatch { expected: usize, found: usize },

    #[error("expected {expected} towers, found {found}")]
    TowerCountMismatch { expected: usize, found: usize },

    #[error("ring sizes differ from the start configuration")]
    RingSetMismatch,
}

/// Why a move is not legal against a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveFault {
    #[error("tower index out of range for {tower_count} towers")]
    OutOfRange { tower_count: usize },

    #[error("source and destination are the same tower")]
    SameTower,

    #[error("source tower is empty")]
    EmptySource,

    #[error("ring {ring} cannot be placed on smaller ring {top}")]
    LargerOnSmaller { ring: Ring, top: Ring },
}

pub type Result<T> = std::result::Result<T, HanoiError>;
