//! Replaying move sequences against a configuration.
//!
//! Used to check histories recorded by the engine and to verify move lists
//! supplied from outside.

use serde::Serialize;

use crate::error::MoveFault;
use crate::tower::{Configuration, Move};

/// How a replay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ReplayStatus {
    /// Every move applied and the target (if any) was reached
    Reached,
    /// Every move applied but the final configuration is not the target
    EndedElsewhere,
    /// The move at `step` was illegal; replay stopped before it
    IllegalMove { step: usize },
}

/// Result of replaying a move list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayResult {
    #[serde(flatten)]
    pub status: ReplayStatus,
    /// Configuration after the last legal move
    pub configuration: Configuration,
    pub moves_applied: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

impl ReplayResult {
    pub fn reached(&self) -> bool {
        self.status == ReplayStatus::Reached
    }
}

/// Apply `moves` in order starting from `start`.
///
/// With no target, a replay whose moves are all legal counts as `Reached`.
pub fn replay(
    start: &Configuration,
    moves: &[Move],
    target: Option<&Configuration>,
) -> ReplayResult {
    let mut configuration = start.clone();

    for (step, &mv) in moves.iter().enumerate() {
        if let Err(fault) = configuration.check_move(mv) {
            return illegal(configuration, step, mv, fault);
        }
        configuration = configuration.moved(mv);
    }

    let status = match target {
        Some(target) if target != &configuration => ReplayStatus::EndedElsewhere,
        _ => ReplayStatus::Reached,
    };

    ReplayResult {
        status,
        configuration,
        moves_applied: moves.len(),
        fault: None,
    }
}

fn illegal(
    configuration: Configuration,
    step: usize,
    mv: Move,
    fault: MoveFault,
) -> ReplayResult {
    ReplayResult {
        status: ReplayStatus::IllegalMove { step },
        configuration,
        moves_applied: step,
        fault: Some(format!("{}: {}", mv, fault)),
    }
}

/// Does `moves` take `start` to `target`?
pub fn verify_solution(start: &Configuration, moves: &[Move], target: &Configuration) -> bool {
    replay(start, moves, Some(target)).reached()
}
