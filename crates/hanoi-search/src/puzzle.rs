//! JSON puzzle descriptions accepted by the CLI.
//!
//! Configurations inside these documents are validated while deserializing,
//! so a parsed puzzle never carries a malformed tower.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tower::{Configuration, Move};

/// A start configuration and the targets to watch for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub start: Configuration,
    #[serde(default)]
    pub targets: Vec<Configuration>,
}

impl PuzzleConfig {
    /// The classic layout: every ring on tower `from`, target all on `to`.
    pub fn stacked(
        tower_count: usize,
        ring_count: usize,
        from: usize,
        to: usize,
    ) -> Result<Self> {
        Ok(Self {
            start: Configuration::stacked(tower_count, ring_count, from)?,
            targets: vec![Configuration::stacked(tower_count, ring_count, to)?],
        })
    }
}

/// A proposed solution to check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionCheck {
    pub start: Configuration,
    pub target: Configuration,
    pub moves: Vec<Move>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_puzzle() {
        let json = r#"{
            "start": [[3, 2, 1], [], []],
            "targets": [[[], [], [3, 2, 1]], [[3], [2], [1]]]
        }"#;

        let puzzle: PuzzleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(puzzle.start, Configuration::stacked(3, 3, 0).unwrap());
        assert_eq!(puzzle.targets.len(), 2);
        assert_eq!(puzzle.targets[1].top(2), Some(1));
    }

    #[test]
    fn test_targets_default_to_empty() {
        let puzzle: PuzzleConfig = serde_json::from_str(r#"{"start": [[1], []]}"#).unwrap();
        assert!(puzzle.targets.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_stack() {
        let json = r#"{"start": [[1, 2], []], "targets": []}"#;
        let err = serde_json::from_str::<PuzzleConfig>(json).unwrap_err();
        assert!(err.to_string().contains("ring 2 sits on ring 1"));
    }

    #[test]
    fn test_stacked_puzzle() {
        let puzzle = PuzzleConfig::stacked(4, 2, 0, 3).unwrap();
        assert_eq!(puzzle.start.tower(0), Some(&[2, 1][..]));
        assert_eq!(puzzle.targets[0].tower(3), Some(&[2, 1][..]));
        assert!(PuzzleConfig::stacked(3, 2, 0, 5).is_err());
    }

    #[test]
    fn test_parse_solution_check() {
        let json = r#"{
            "start": [[1], []],
            "target": [[], [1]],
            "moves": [{"from": 0, "to": 1}]
        }"#;
        let check: SolutionCheck = serde_json::from_str(json).unwrap();
        assert_eq!(check.moves, vec![Move::new(0, 1)]);
    }
}
