//! State-space search for generalized Tower of Hanoi puzzles.
//!
//! This crate explores every configuration reachable from a start position
//! (any number of towers, any number of rings) breadth-first, and records
//! move sequences leading to each discovered configuration so that a path
//! to any pinned target can be read back once the search completes.

pub mod engine;
pub mod error;
pub mod moves;
pub mod node;
pub mod puzzle;
pub mod replay;
pub mod tower;

// Re-export main types
pub use engine::{solve, FoundTarget, SearchConfig, SearchEngine, SearchStats, SolveReport};
pub use error::{ConfigurationFault, HanoiError, MoveFault, Result};
pub use node::{Connection, HistoryEntry, Node, NodeArena, NodeId};
pub use puzzle::{PuzzleConfig, SolutionCheck};
pub use replay::{replay, verify_solution, ReplayResult, ReplayStatus};
pub use tower::{validate, Configuration, Move, Ring, Tower};

/// Render a move list one move per line.
pub fn render_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
