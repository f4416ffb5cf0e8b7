//! The statistics graph used by MCTS.
//!
//! Positions in Tak can be reached through different move orders, so the search
//! keeps a graph rather than a tree: every distinct `GameState` has exactly one node,
//! and a node may have several parents. Nodes and edges live in arenas and refer
//! to each other by index.

use std::collections::{HashMap, HashSet};

use crate::position::{Action, GameState};
use crate::search::arena::{Arena, Index};

pub type NodeId = Index<Node>;
pub type EdgeId = Index<Edge>;

pub struct Node {
    state: GameState,
    visits: u64,
    total_reward: f64,
    parents: Vec<EdgeId>,
    children: Vec<EdgeId>,
}

impl Node {
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Mean reward over all visits, 0 for an unvisited node
    pub fn value(&self) -> f64 {
        self.total_reward / self.visits.max(1) as f64
    }
}

/// An action leading from one node to another
pub struct Edge {
    source: NodeId,
    target: NodeId,
    action: Action,
}

impl Edge {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}

#[derive(Default)]
pub struct StatsGraph {
    nodes: Arena<Node>,
    edges: Arena<Edge>,
    index: HashMap<GameState, NodeId>,
}

impl StatsGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph holding a single node for `state`
    pub fn with_root(state: GameState) -> (Self, NodeId) {
        let mut graph = StatsGraph::new();
        let root = graph.add_node(state);
        (graph, root)
    }

    pub fn node_id(&self, state: &GameState) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    pub fn contains(&self, state: &GameState) -> bool {
        self.index.contains_key(state)
    }

    pub fn node(&self, node: NodeId) -> &Node {
        self.nodes.get(node)
    }

    pub fn edge(&self, edge: EdgeId) -> &Edge {
        self.edges.get(edge)
    }

    pub fn state(&self, node: NodeId) -> &GameState {
        &self.nodes.get(node).state
    }

    /// The node for `state`, created without any edges if it doesn't exist yet
    pub fn add_node(&mut self, state: GameState) -> NodeId {
        if let Some(&node) = self.index.get(&state) {
            return node;
        }
        let node = self.nodes.add(Node {
            state: state.clone(),
            visits: 0,
            total_reward: 0.0,
            parents: vec![],
            children: vec![],
        });
        self.index.insert(state, node);
        node
    }

    /// The node for `state`, reached from `parent` through `action`.
    /// The node is created if it is new, and the edge is added if it doesn't already exist.
    pub fn add_state(&mut self, parent: NodeId, state: GameState, action: Action) -> NodeId {
        let child = self.add_node(state);
        let exists = self
            .nodes
            .get(parent)
            .children
            .iter()
            .any(|&edge| {
                let edge = self.edges.get(edge);
                edge.target == child && edge.action == action
            });
        if !exists {
            let edge = self.edges.add(Edge {
                source: parent,
                target: child,
                action,
            });
            self.nodes.get_mut(parent).children.push(edge);
            self.nodes.get_mut(child).parents.push(edge);
        }
        child
    }

    /// Record one visit with `reward` on `node`. With `backpropagate`, every node
    /// with a path to `node` is credited as well, each of them exactly once.
    pub fn add_visit(&mut self, node: NodeId, reward: f64, backpropagate: bool) {
        self.record(node, reward);
        if !backpropagate {
            return;
        }
        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(node);
        let mut stack: Vec<NodeId> = self.parent_nodes(node).collect();
        while let Some(ancestor) = stack.pop() {
            if !visited.insert(ancestor) {
                continue;
            }
            self.record(ancestor, reward);
            stack.extend(self.parent_nodes(ancestor));
        }
    }

    fn record(&mut self, node: NodeId, reward: f64) {
        let node = self.nodes.get_mut(node);
        node.visits += 1;
        node.total_reward += reward;
    }

    pub fn parent_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(node)
            .parents
            .iter()
            .map(move |&edge| self.edges.get(edge).source)
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.nodes
            .get(node)
            .children
            .iter()
            .map(move |&edge| self.edges.get(edge))
    }

    pub fn visits(&self, node: NodeId) -> u64 {
        self.nodes.get(node).visits
    }

    pub fn total_reward(&self, node: NodeId) -> f64 {
        self.nodes.get(node).total_reward
    }

    pub fn value(&self, node: NodeId) -> f64 {
        self.nodes.get(node).value()
    }

    /// Mean reward of `state`, or 0 if it isn't in the graph
    pub fn state_value(&self, state: &GameState) -> f64 {
        self.node_id(state).map_or(0.0, |node| self.value(node))
    }

    /// Number of rollouts backed up through `root`
    pub fn total_rollouts(&self, root: NodeId) -> u64 {
        self.visits(root)
    }

    pub fn total_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_edges(&self) -> usize {
        self.edges.len()
    }
}
