//! Move generation for a node.
//!
//! Candidates are produced in lexicographic `(from, to)` order. That order
//! fixes the order in which edges and history entries are discovered, but
//! not which configurations are reachable.

use smallvec::SmallVec;

use crate::node::{Node, NodeArena};
use crate::tower::{Configuration, Move};

/// A legal successor of some configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub configuration: Configuration,
    pub mv: Move,
}

/// Candidate list for one node. Most positions have few legal moves.
pub type Candidates = SmallVec<[Candidate; 8]>;

/// All ordered tower pairs `(i, j)`, `i != j`, in lexicographic order.
pub fn all_moves(tower_count: usize) -> impl Iterator<Item = Move> {
    (0..tower_count).flat_map(move |from| {
        (0..tower_count)
            .filter(move |&to| to != from)
            .map(move |to| Move::new(from, to))
    })
}

/// Every legal single move from `configuration`.
pub fn generate(configuration: &Configuration) -> Candidates {
    let mut candidates = Candidates::new();

    for mv in all_moves(configuration.tower_count()) {
        // Illegal pairs simply do not produce a candidate
        if !configuration.is_legal(mv) {
            continue;
        }
        candidates.push(Candidate {
            configuration: configuration.moved(mv),
            mv,
        });
    }

    candidates
}

/// Drop candidates that lead to a configuration `node` is already
/// connected to.
pub fn filter_connected(candidates: &mut Candidates, node: &Node, arena: &NodeArena) {
    candidates.retain(|candidate| {
        !node
            .connections()
            .iter()
            .any(|c| arena.get(c.node).configuration() == &candidate.configuration)
    });
}

/// Candidates for `node` that do not correspond to an existing edge.
pub fn pending(node: &Node, arena: &NodeArena) -> Candidates {
    let mut candidates = generate(node.configuration());
    filter_connected(&mut candidates, node, arena);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_moves_order() {
        let moves: Vec<Move> = all_moves(3).collect();
        assert_eq!(
            moves,
            vec![
                Move::new(0, 1),
                Move::new(0, 2),
                Move::new(1, 0),
                Move::new(1, 2),
                Move::new(2, 0),
                Move::new(2, 1),
            ]
        );
        assert_eq!(all_moves(1).count(), 0);
        assert_eq!(all_moves(4).count(), 12);
    }

    #[test]
    fn test_generate_from_start() {
        let start = Configuration::stacked(3, 3, 0).unwrap();
        let candidates = generate(&start);

        let moves: Vec<Move> = candidates.iter().map(|c| c.mv).collect();
        assert_eq!(moves, vec![Move::new(0, 1), Move::new(0, 2)]);
        assert_eq!(candidates[0].configuration.tower(1), Some(&[1][..]));
    }

    #[test]
    fn test_generate_middle_position() {
        // [3] [2] [1]: the smallest ring moves anywhere, 2 only onto 3
        let config = Configuration::new(vec![vec![3], vec![2], vec![1]]).unwrap();
        let moves: Vec<Move> = generate(&config).iter().map(|c| c.mv).collect();
        assert_eq!(
            moves,
            vec![
                Move::new(1, 0),
                Move::new(2, 0),
                Move::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_single_tower_has_no_moves() {
        let config = Configuration::stacked(1, 5, 0).unwrap();
        assert!(generate(&config).is_empty());
    }

    #[test]
    fn test_pending_skips_connected() {
        let mut arena = NodeArena::new();
        let start = Configuration::stacked(3, 2, 0).unwrap();
        let next = start.apply(Move::new(0, 1)).unwrap();

        let (a, _) = arena.insert(start);
        let (b, _) = arena.insert(next);
        arena.connect(a, b, Move::new(0, 1));

        let moves: Vec<Move> = pending(arena.get(a), &arena).iter().map(|c| c.mv).collect();
        assert_eq!(moves, vec![Move::new(0, 2)]);

        let back: Vec<Move> = pending(arena.get(b), &arena).iter().map(|c| c.mv).collect();
        assert!(!back.contains(&Move::new(1, 0)));
    }
}
