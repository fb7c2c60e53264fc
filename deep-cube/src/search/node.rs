use arrayvec::ArrayVec;
use cube::{Action, ACTION_COUNT};

use super::state_index::Handle;
use crate::oracle::{Eval, Policy};

/// Statistics of one state in the search graph, all indexed by action.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub neighbors: [Option<Handle>; ACTION_COUNT],
    pub policy: Policy, // P(s, a)
    pub value: Eval,    // V(s)
    pub visits: [u32; ACTION_COUNT], // N(s, a)
    pub q_values: [f32; ACTION_COUNT], // W(s, a)
    pub virtual_loss: [f32; ACTION_COUNT], // L(s, a)
    pub is_leaf: bool,
    pub(super) evaluated: bool,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            neighbors: [None; ACTION_COUNT],
            policy: [0.; ACTION_COUNT],
            value: 0.,
            visits: [0; ACTION_COUNT],
            q_values: [0.; ACTION_COUNT],
            virtual_loss: [0.; ACTION_COUNT],
            is_leaf: true,
            evaluated: false,
        }
    }
}

impl Node {
    /// Whether the oracle output has been written.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Sum of N(s, a) over all actions.
    pub fn visit_count(&self) -> u32 {
        self.visits.iter().sum()
    }

    pub fn is_fully_linked(&self) -> bool {
        self.neighbors.iter().all(Option::is_some)
    }

    /// Actions whose edge has not been linked yet.
    pub fn unresolved(&self) -> ArrayVec<Action, ACTION_COUNT> {
        self.neighbors
            .iter()
            .enumerate()
            .filter(|(_, neighbor)| neighbor.is_none())
            .map(|(i, _)| Action::from_index(i))
            .collect()
    }
}
