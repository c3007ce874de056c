//! Breadth-first exploration of the move graph.
//!
//! The engine materialises the whole reachable component of the start
//! configuration, one frontier wave per round, and collects every node that
//! matches a pinned target. Targets are matched when a node is created and
//! again when it is processed. The search never stops early on a match:
//! histories recorded later in the search may be wanted by callers.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ConfigurationFault, Result};
use crate::moves::{self, Candidate};
use crate::node::{Node, NodeArena, NodeId};
use crate::tower::{Configuration, Move};

/// Optional work budget around the otherwise exhaustive search
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Stop after this many rounds
    pub max_rounds: Option<usize>,
    /// Stop once this much time has passed (checked between rounds)
    pub timeout: Option<Duration>,
}

/// Counters describing a finished or interrupted search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub rounds: usize,
    pub nodes: usize,
    pub edges: usize,
    pub history_entries: usize,
    /// Whether the whole reachable graph was explored
    pub exhausted: bool,
    pub time_elapsed_ms: u64,
}

/// Frontier driver owning the node arena, the pinned targets and the matches.
#[derive(Debug)]
pub struct SearchEngine {
    arena: NodeArena,
    seed: NodeId,
    pinned: Vec<Configuration>,
    found: Vec<NodeId>,
    current: Vec<NodeId>,
    next: Vec<NodeId>,
    rounds: usize,
}

impl SearchEngine {
    /// Seed a search from `initial`, which must hold exactly `ring_count` rings.
    pub fn new(initial: Configuration, ring_count: usize) -> Result<Self> {
        if initial.ring_count() != ring_count {
            return Err(ConfigurationFault::RingCountMismatch {
                expected: ring_count,
                found: initial.ring_count(),
            }
            .into());
        }

        let mut arena = NodeArena::new();
        let (seed, _) = arena.insert(initial);

        Ok(Self {
            arena,
            seed,
            pinned: Vec::new(),
            found: Vec::new(),
            current: vec![seed],
            next: Vec::new(),
            rounds: 0,
        })
    }

    /// Watch for `target`. Targets that can never be reached from the start
    /// (different tower count or ring sizes) are rejected.
    pub fn add_target(&mut self, target: Configuration) -> Result<()> {
        let start = self.arena.get(self.seed).configuration();
        if target.tower_count() != start.tower_count() {
            return Err(ConfigurationFault::TowerCountMismatch {
                expected: start.tower_count(),
                found: target.tower_count(),
            }
            .into());
        }
        if target.ring_set() != start.ring_set() {
            return Err(ConfigurationFault::RingSetMismatch.into());
        }

        // A target pinned mid-search still matches nodes already discovered
        if let Some(id) = self.arena.lookup(&target) {
            self.record_match(id);
        }

        self.pinned.push(target);
        Ok(())
    }

    pub fn seed(&self) -> NodeId {
        self.seed
    }

    pub fn start(&self) -> &Configuration {
        self.arena.get(self.seed).configuration()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.arena.iter()
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn targets(&self) -> &[Configuration] {
        &self.pinned
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// True once the frontier is empty.
    pub fn is_exhausted(&self) -> bool {
        self.current.is_empty()
    }

    /// Nodes matching a pinned target, in discovery order.
    pub fn results(&self) -> Vec<&Node> {
        self.found.iter().map(|&id| self.arena.get(id)).collect()
    }

    pub fn found_ids(&self) -> &[NodeId] {
        &self.found
    }

    /// Shortest recorded move sequence from the start to `id`.
    ///
    /// The start node has no history of its own; reaching it takes zero
    /// moves, so it yields an empty path.
    pub fn path_to(&self, id: NodeId) -> Option<Vec<Move>> {
        if id == self.seed {
            return Some(Vec::new());
        }
        self.arena
            .get(id)
            .shortest_from(self.seed)
            .map(|entry| entry.moves.clone())
    }

    /// Propagate every node of the current frontier, then promote the next
    /// frontier. Returns whether any work remains.
    pub fn step(&mut self) -> bool {
        if self.current.is_empty() {
            return false;
        }

        // Reconciliation goes through the arena index, which covers both
        // frontiers, so the wave can be taken out while it is walked.
        let frontier = std::mem::take(&mut self.current);
        for &id in &frontier {
            self.propagate(id);
            self.check_pinned(id);
        }

        self.rounds += 1;
        debug!(
            round = self.rounds,
            processed = frontier.len(),
            discovered = self.next.len(),
            nodes = self.arena.len(),
            "round complete"
        );

        self.current = std::mem::take(&mut self.next);
        !self.current.is_empty()
    }

    /// Explore the whole reachable graph.
    pub fn run(&mut self) -> SearchStats {
        self.run_bounded(&SearchConfig::default())
    }

    /// Explore until the frontier empties or the budget runs out.
    pub fn run_bounded(&mut self, config: &SearchConfig) -> SearchStats {
        let start_time = Instant::now();
        let first_round = self.rounds;

        while !self.is_exhausted() {
            if let Some(max_rounds) = config.max_rounds {
                if self.rounds - first_round >= max_rounds {
                    warn!(rounds = max_rounds, "round budget reached before exhaustion");
                    break;
                }
            }
            if let Some(timeout) = config.timeout {
                if start_time.elapsed() > timeout {
                    warn!(?timeout, "timeout reached before exhaustion");
                    break;
                }
            }
            self.step();
        }

        let stats = self.stats(start_time.elapsed());
        info!(
            rounds = stats.rounds,
            nodes = stats.nodes,
            edges = stats.edges,
            found = self.found.len(),
            exhausted = stats.exhausted,
            "search finished"
        );
        stats
    }

    fn stats(&self, elapsed: Duration) -> SearchStats {
        SearchStats {
            rounds: self.rounds,
            nodes: self.arena.len(),
            edges: self.arena.edge_count(),
            history_entries: self.arena.history_count(),
            exhausted: self.is_exhausted(),
            time_elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// Connect `id` to every configuration one legal move away that it is
    /// not yet connected to. Existing nodes are reconciled first, then new
    /// nodes are created and queued on the next frontier.
    fn propagate(&mut self, id: NodeId) {
        let pending = moves::pending(self.arena.get(id), &self.arena);

        let (existing, fresh): (Vec<Candidate>, Vec<Candidate>) = pending
            .into_iter()
            .partition(|c| self.arena.lookup(&c.configuration).is_some());

        for candidate in existing {
            if let Some(other) = self.arena.lookup(&candidate.configuration) {
                self.arena.connect(id, other, candidate.mv);
            }
        }

        for candidate in fresh {
            let (created, _) = self.arena.insert(candidate.configuration);
            self.arena.connect(id, created, candidate.mv);
            self.next.push(created);
            self.check_pinned(created);
        }
    }

    fn check_pinned(&mut self, id: NodeId) {
        let configuration = self.arena.get(id).configuration();
        if self.pinned.iter().any(|target| target == configuration) {
            self.record_match(id);
        }
    }

    fn record_match(&mut self, id: NodeId) {
        if !self.found.contains(&id) {
            debug!(node = id.index(), "target matched");
            self.found.push(id);
        }
    }
}

/// One pinned target and the path found to it, if any
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundTarget {
    pub target: Configuration,
    pub reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moves: Option<Vec<Move>>,
}

/// Outcome of `solve`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub start: Configuration,
    pub targets: Vec<FoundTarget>,
    pub stats: SearchStats,
}

impl SolveReport {
    /// Whether every target was reached
    pub fn all_reached(&self) -> bool {
        self.targets.iter().all(|t| t.reached)
    }
}

/// Search from `start` and report the shortest recorded path to each target.
pub fn solve(
    start: Configuration,
    targets: Vec<Configuration>,
    config: &SearchConfig,
) -> Result<SolveReport> {
    let ring_count = start.ring_count();
    let mut engine = SearchEngine::new(start.clone(), ring_count)?;
    for target in &targets {
        engine.add_target(target.clone())?;
    }

    let stats = engine.run_bounded(config);

    let targets = targets
        .into_iter()
        .map(|target| {
            let moves = engine
                .found_ids()
                .iter()
                .find(|&&id| engine.node(id).configuration() == &target)
                .and_then(|&id| engine.path_to(id));
            FoundTarget {
                target,
                reached: moves.is_some(),
                moves,
            }
        })
        .collect();

    Ok(SolveReport {
        start,
        targets,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::error::HanoiError;
    use crate::replay::replay;

    fn engine(towers: usize, rings: usize, from: usize, to: usize) -> SearchEngine {
        let start = Configuration::stacked(towers, rings, from).unwrap();
        let mut engine = SearchEngine::new(start, rings).unwrap();
        engine
            .add_target(Configuration::stacked(towers, rings, to).unwrap())
            .unwrap();
        engine
    }

    fn assert_graph_sound(engine: &SearchEngine) {
        let start = engine.start().clone();
        let tower_count = start.tower_count();
        let mut seen = HashSet::new();

        for node in engine.nodes() {
            let config = node.configuration();
            assert!(config.is_valid());
            assert_eq!(config.ring_set(), start.ring_set());
            assert!(seen.insert(config.clone()), "duplicate node for {}", config);
            assert!(node.degree() <= tower_count * (tower_count - 1));
            if engine.is_exhausted() {
                assert_eq!(node.degree(), moves::generate(config).len());
            }

            let origins: HashSet<NodeId> = node.history().iter().map(|h| h.origin).collect();
            assert_eq!(origins.len(), node.history().len(), "repeated origin in {}", config);
            assert!(!origins.contains(&node.id()));

            for entry in node.history() {
                let origin = engine.node(entry.origin).configuration();
                let reached = replay(origin, &entry.moves, None);
                assert_eq!(&reached.configuration, config);
            }
            for connection in node.connections() {
                let neighbour = engine.node(connection.node);
                assert_eq!(
                    config.apply(connection.mv).as_ref(),
                    Ok(neighbour.configuration())
                );
            }
        }
    }

    #[test]
    fn test_classic_three_rings() {
        let mut engine = engine(3, 3, 0, 2);
        let stats = engine.run();

        assert!(stats.exhausted);
        assert_eq!(stats.nodes, 27);
        assert_eq!(stats.edges, 39);
        assert_eq!(stats.rounds, 8);

        let results = engine.results();
        assert_eq!(results.len(), 1);
        let target = results[0];
        assert!(target
            .history_from(engine.seed())
            .any(|entry| entry.moves.len() == 7));
        assert!(target
            .history_from(engine.seed())
            .all(|entry| entry.moves.len() >= 7));

        let path = engine.path_to(target.id()).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(stats.history_entries, 210);
        assert_graph_sound(&engine);
    }

    #[test]
    fn test_history_stays_polynomial() {
        // 729 positions, at most one history entry per origin in each
        let mut engine = engine(3, 6, 0, 2);
        let stats = engine.run();

        assert_eq!(stats.nodes, 729);
        assert!(stats.history_entries <= stats.nodes * stats.nodes);
        let found = engine.found_ids()[0];
        assert_eq!(engine.path_to(found).unwrap().len(), 63);
        for node in engine.nodes() {
            assert!(node.history_from(engine.seed()).count() <= 1);
        }
    }

    #[test]
    fn test_four_towers() {
        let mut engine = engine(4, 3, 0, 3);
        let stats = engine.run();

        assert_eq!(stats.nodes, 64);
        assert_eq!(stats.edges, 168);
        let found = engine.found_ids()[0];
        assert_eq!(engine.path_to(found).unwrap().len(), 5);
        assert_graph_sound(&engine);
    }

    #[test]
    fn test_single_tower_is_degenerate() {
        let mut engine = engine(1, 4, 0, 0);
        let stats = engine.run();

        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.rounds, 1);
        assert_eq!(stats.edges, 0);
        assert!(engine.is_exhausted());
        // the only target is the start itself
        assert_eq!(engine.found_ids(), &[engine.seed()]);
    }

    #[test]
    fn test_single_tower_without_target() {
        let start = Configuration::stacked(1, 2, 0).unwrap();
        let mut engine = SearchEngine::new(start, 2).unwrap();
        engine.run();
        assert_eq!(engine.node_count(), 1);
        assert!(engine.results().is_empty());
    }

    #[test]
    fn test_start_is_target() {
        let mut engine = engine(3, 2, 1, 1);
        engine.run();

        assert_eq!(engine.found_ids(), &[engine.seed()]);
        assert!(engine.node(engine.seed()).history().is_empty());
        assert_eq!(engine.path_to(engine.seed()), Some(Vec::new()));
    }

    #[test]
    fn test_unreachable_target() {
        // two rings cannot be transferred with only two towers
        let mut engine = engine(2, 2, 0, 1);
        let stats = engine.run();

        assert_eq!(stats.nodes, 2);
        assert!(engine.results().is_empty());
    }

    #[test]
    fn test_no_early_stop() {
        let mut engine = engine(3, 2, 0, 1);
        let stats = engine.run();
        // target sits at depth 3 but all 9 positions are explored
        assert_eq!(stats.nodes, 9);
        assert_eq!(engine.results().len(), 1);
    }

    #[test]
    fn test_bounded_run_then_resume() {
        let mut engine = engine(3, 3, 0, 2);
        let config = SearchConfig {
            max_rounds: Some(2),
            timeout: None,
        };

        let stats = engine.run_bounded(&config);
        assert!(!stats.exhausted);
        assert_eq!(stats.rounds, 2);
        assert_eq!(stats.nodes, 5);
        assert!(engine.results().is_empty());

        let stats = engine.run();
        assert!(stats.exhausted);
        assert_eq!(stats.nodes, 27);
        assert_eq!(engine.results().len(), 1);
    }

    #[test]
    fn test_bounded_run_matches_created_nodes() {
        let start = Configuration::stacked(3, 1, 0).unwrap();
        let target = Configuration::stacked(3, 1, 2).unwrap();
        let config = SearchConfig {
            max_rounds: Some(1),
            timeout: None,
        };

        let report = solve(start, vec![target], &config).unwrap();
        assert!(!report.stats.exhausted);
        assert_eq!(report.stats.nodes, 3);
        assert!(report.targets[0].reached);
        assert_eq!(report.targets[0].moves, Some(vec![Move::new(0, 2)]));
    }

    #[test]
    fn test_step_reports_remaining_work() {
        let mut engine = engine(3, 1, 0, 2);
        assert!(engine.step());
        assert!(!engine.step());
        assert!(engine.is_exhausted());
        assert!(!engine.step());
        assert_eq!(engine.rounds(), 2);
    }

    #[test]
    fn test_target_added_after_run() {
        let start = Configuration::stacked(3, 2, 0).unwrap();
        let mut engine = SearchEngine::new(start, 2).unwrap();
        engine.run();
        assert!(engine.results().is_empty());

        let target = Configuration::stacked(3, 2, 2).unwrap();
        engine.add_target(target.clone()).unwrap();
        engine.add_target(target.clone()).unwrap();

        let results = engine.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].configuration(), &target);
    }

    #[test]
    fn test_rejects_mismatched_input() {
        let start = Configuration::stacked(3, 3, 0).unwrap();
        assert_eq!(
            SearchEngine::new(start.clone(), 4).unwrap_err(),
            HanoiError::InvalidConfiguration(ConfigurationFault::RingCountMismatch {
                expected: 4,
                found: 3,
            })
        );

        let mut engine = SearchEngine::new(start, 3).unwrap();
        assert_eq!(
            engine
                .add_target(Configuration::stacked(4, 3, 0).unwrap())
                .unwrap_err(),
            HanoiError::InvalidConfiguration(ConfigurationFault::TowerCountMismatch {
                expected: 3,
                found: 4,
            })
        );
        let other_rings = Configuration::new(vec![vec![5, 2, 1], vec![], vec![]]).unwrap();
        assert_eq!(
            engine.add_target(other_rings).unwrap_err(),
            HanoiError::InvalidConfiguration(ConfigurationFault::RingSetMismatch)
        );
        assert!(engine.targets().is_empty());
    }

    #[test]
    fn test_solve_report() {
        let start = Configuration::stacked(3, 2, 0).unwrap();
        let targets = vec![
            Configuration::stacked(3, 2, 2).unwrap(),
            Configuration::new(vec![vec![2], vec![], vec![1]]).unwrap(),
        ];

        let report = solve(start, targets, &SearchConfig::default()).unwrap();
        assert!(report.all_reached());
        assert_eq!(report.targets[0].moves.as_ref().map(Vec::len), Some(3));
        assert_eq!(
            report.targets[1].moves,
            Some(vec![Move::new(0, 2)])
        );
        assert!(report.stats.exhausted);
    }
}
