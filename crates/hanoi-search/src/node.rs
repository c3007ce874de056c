//! Graph nodes and the arena that owns them.
//!
//! Nodes never reference each other directly. Edges and history origins are
//! `NodeId`s into a `NodeArena`, an append-only vector paired with a
//! configuration index so each configuration maps to exactly one node.
//! A node keeps at most one history entry per origin: the first path
//! recorded from that origin, which breadth-first discovery makes a
//! shortest one for the seed.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::tower::{Configuration, Move};

/// Index of a node inside its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An edge to a neighbouring node, with the move that leads there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub node: NodeId,
    pub mv: Move,
}

/// A recorded path from `origin` to the node holding this entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub origin: NodeId,
    pub moves: Vec<Move>,
}

/// A discovered configuration with its edges and path histories.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    configuration: Configuration,
    connections: Vec<Connection>,
    history: Vec<HistoryEntry>,
    origins: HashSet<NodeId>,
}

impl Node {
    fn new(id: NodeId, configuration: Configuration) -> Self {
        Self {
            id,
            configuration,
            connections: Vec::new(),
            history: Vec::new(),
            origins: HashSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.connections.iter().any(|c| c.node == other)
    }

    /// History entries whose path starts at `origin`
    pub fn history_from(&self, origin: NodeId) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().filter(move |h| h.origin == origin)
    }

    /// The shortest recorded path from `origin`.
    pub fn shortest_from(&self, origin: NodeId) -> Option<&HistoryEntry> {
        self.history_from(origin).min_by_key(|h| h.moves.len())
    }

    pub fn has_origin(&self, origin: NodeId) -> bool {
        self.origins.contains(&origin)
    }

    /// What `neighbour`, reached through `mv`, inherits: every known path
    /// extended by `mv`, plus the single hop from this node. Origins the
    /// neighbour already has, and the neighbour itself, are skipped.
    fn inherited_history(&self, mv: Move, neighbour: &Node) -> Vec<HistoryEntry> {
        let fresh = |origin: NodeId| origin != neighbour.id && !neighbour.has_origin(origin);

        let mut inherited = Vec::new();
        for entry in self.history.iter().filter(|h| fresh(h.origin)) {
            let mut moves = Vec::with_capacity(entry.moves.len() + 1);
            moves.extend_from_slice(&entry.moves);
            moves.push(mv);
            inherited.push(HistoryEntry {
                origin: entry.origin,
                moves,
            });
        }
        if fresh(self.id) {
            inherited.push(HistoryEntry {
                origin: self.id,
                moves: vec![mv],
            });
        }
        inherited
    }
}

/// Append-only node storage with configuration deduplication.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    index: HashMap<Configuration, NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Panics if `id` did not come from this arena.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// The node holding `configuration`, if one exists.
    pub fn lookup(&self, configuration: &Configuration) -> Option<NodeId> {
        self.index.get(configuration).copied()
    }

    /// Create a node for `configuration`, or return the existing one.
    /// The flag is true when a new node was created.
    pub fn insert(&mut self, configuration: Configuration) -> (NodeId, bool) {
        if let Some(id) = self.lookup(&configuration) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(configuration.clone(), id);
        self.nodes.push(Node::new(id, configuration));
        (id, true)
    }

    /// Record the undirected edge `from -> to` and push `from`'s history
    /// into `to`. History flows only in the direction of discovery.
    pub fn connect(&mut self, from: NodeId, to: NodeId, mv: Move) {
        let inherited = self.nodes[from.0].inherited_history(mv, &self.nodes[to.0]);
        self.nodes[from.0].connections.push(Connection { node: to, mv });

        let target = &mut self.nodes[to.0];
        target.connections.push(Connection {
            node: from,
            mv: mv.inverse(),
        });
        target.origins.extend(inherited.iter().map(|h| h.origin));
        target.history.extend(inherited);
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum::<usize>() / 2
    }

    pub fn history_count(&self) -> usize {
        self.nodes.iter().map(|n| n.history.len()).sum()
    }
}
