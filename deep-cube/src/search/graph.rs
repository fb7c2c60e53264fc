use std::collections::VecDeque;

use cube::Action;

use super::{node::Node, state_index::Handle};
use crate::{
    error::SearchError,
    oracle::{Eval, Policy},
};

/// Arena of nodes addressed by handle.
#[derive(Clone, Debug, Default)]
pub struct SearchGraph {
    nodes: Vec<Node>,
}

impl SearchGraph {
    pub fn with_capacity(capacity: usize) -> Self {
        SearchGraph {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Make room for `projected` nodes by doubling the capacity.
    /// Called before a batch so that storage never grows halfway through it.
    pub fn reserve(&mut self, projected: usize) {
        if projected <= self.nodes.capacity() {
            return;
        }
        let mut capacity = self.nodes.capacity().max(1);
        while capacity < projected {
            capacity *= 2;
        }
        self.nodes.reserve_exact(capacity - self.nodes.len());
    }

    /// Ensure storage exists for `handle`.
    pub fn allocate(&mut self, handle: Handle) {
        if handle.position() >= self.nodes.len() {
            self.nodes.resize_with(handle.position() + 1, Node::default);
        }
    }

    /// Panics if the handle has not been allocated.
    pub fn node(&self, handle: Handle) -> &Node {
        &self.nodes[handle.position()]
    }

    pub fn node_mut(&mut self, handle: Handle) -> &mut Node {
        &mut self.nodes[handle.position()]
    }

    pub fn get(&self, handle: Handle) -> Option<&Node> {
        self.nodes.get(handle.position())
    }

    /// Store the oracle output of a node. Each node is evaluated exactly once.
    pub fn set_node(&mut self, handle: Handle, policy: Policy, value: Eval) -> Result<(), SearchError> {
        self.allocate(handle);
        let node = self.node_mut(handle);
        if node.evaluated {
            return Err(SearchError::NodeAlreadyEvaluated(handle));
        }
        node.policy = policy;
        node.value = value;
        node.evaluated = true;
        Ok(())
    }

    /// Link `from --action--> to` and the reverse edge.
    pub fn link_edge(&mut self, from: Handle, action: Action, to: Handle) {
        self.allocate(from);
        self.allocate(to);
        self.node_mut(from).neighbors[action.index()] = Some(to);
        self.node_mut(to).neighbors[action.reverse().index()] = Some(from);
    }

    pub fn mark_leaf_status(&mut self, handle: Handle) {
        let node = self.node_mut(handle);
        node.is_leaf = !node.unresolved().is_empty();
    }

    pub fn backup_value(&mut self, handle: Handle, action: Action, value: f32) {
        self.node_mut(handle).q_values[action.index()] = value;
    }

    /// Shortest action sequence from `from` to `to` over linked edges.
    pub fn shortest_path(&self, from: Handle, to: Handle) -> Option<Vec<Action>> {
        let mut parents: Vec<Option<(Handle, Action)>> = vec![None; self.nodes.len()];
        let mut queue = VecDeque::from([from]);
        let mut seen = vec![false; self.nodes.len()];
        *seen.get_mut(from.position())? = true;

        while let Some(handle) = queue.pop_front() {
            if handle == to {
                let mut path = VecDeque::new();
                let mut current = to;
                while let Some((parent, action)) = parents[current.position()] {
                    path.push_front(action);
                    current = parent;
                }
                return Some(path.into());
            }
            for (i, neighbor) in self.node(handle).neighbors.iter().enumerate() {
                if let Some(neighbor) = *neighbor {
                    if !seen[neighbor.position()] {
                        seen[neighbor.position()] = true;
                        parents[neighbor.position()] = Some((handle, Action::from_index(i)));
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        None
    }

    /// Checks that every linked edge has its reverse edge and that exactly
    /// the nodes with an unlinked edge are leaves.
    pub fn is_consistent(&self) -> bool {
        self.nodes.iter().enumerate().all(|(position, node)| {
            node.neighbors.iter().enumerate().all(|(i, neighbor)| match neighbor {
                Some(neighbor) => self
                    .get(*neighbor)
                    .and_then(|other| other.neighbors[Action::from_index(i).reverse().index()])
                    .map_or(false, |back| back.position() == position),
                None => true,
            })
        }) && self.nodes.iter().all(|node| node.is_leaf != node.is_fully_linked())
    }
}
