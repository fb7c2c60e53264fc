use std::{collections::VecDeque, fmt::Display, time::Duration};

use cube::{Action, Cube};
use log::info;

use super::{
    searcher::{trace_back, Budget, Outcome, Searcher},
    state_index::{Handle, StateIndex},
};
use crate::error::SearchError;

/// Breadth-first search. The first solution it finds is a shortest one.
#[derive(Default)]
pub struct Bfs {
    index: StateIndex,
    // parents[handle.position()] is where the state was first reached from.
    parents: Vec<Option<(Handle, Action)>>,
    action_queue: Vec<Action>,
    outcome: Outcome,
}

impl Bfs {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.index.clear();
        self.parents.clear();
        self.action_queue.clear();
        self.outcome = Outcome::Idle;
    }
}

impl Searcher for Bfs {
    fn search(&mut self, root: Cube, time_limit: Duration, max_states: usize) -> Result<bool, SearchError> {
        self.reset();
        let budget = Budget::new(time_limit, max_states);

        let (root_handle, _) = self.index.register(root);
        self.parents.push(None);
        if root.is_solved() {
            self.outcome = Outcome::Solved;
            return Ok(true);
        }

        let mut queue = VecDeque::from([root_handle]);
        while let Some(handle) = queue.pop_front() {
            if let Some(outcome) = budget.check(self.index.len()) {
                self.outcome = outcome;
                info!("{self} stopped ({outcome:?}) with {} states", self.index.len());
                return Ok(false);
            }
            let state = *self.index.lookup(handle);
            for action in Action::ALL {
                let next = state.applied(action);
                let (next_handle, is_new) = self.index.register(next);
                if !is_new {
                    continue;
                }
                self.parents.push(Some((handle, action)));
                if next.is_solved() {
                    let parents = &self.parents;
                    self.action_queue = trace_back(|h: Handle| parents[h.position()], next_handle);
                    self.outcome = Outcome::Solved;
                    info!(
                        "{self} solved in {:?}: {} actions, {} states",
                        budget.elapsed(),
                        self.action_queue.len(),
                        self.index.len()
                    );
                    return Ok(true);
                }
                queue.push_back(next_handle);
            }
        }

        self.outcome = Outcome::Exhausted;
        Ok(false)
    }

    fn action_queue(&self) -> &[Action] {
        &self.action_queue
    }

    fn explored_states(&self) -> usize {
        self.index.len()
    }

    fn outcome(&self) -> Outcome {
        self.outcome
    }
}

impl Display for Bfs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Breadth-first search")
    }
}
