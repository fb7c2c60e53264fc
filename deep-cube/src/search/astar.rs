use std::{cmp::Ordering, collections::BinaryHeap, fmt::Display, time::Duration};

use cube::{Action, Cube};
use log::{debug, info};

use super::{
    searcher::{trace_back, Budget, Outcome, Searcher},
    state_index::{Handle, StateIndex},
};
use crate::{
    config::{A_STAR_BATCH, G_WEIGHT},
    error::SearchError,
    oracle::{evaluate_batched, Oracle},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AStarConfig {
    /// Cost of a path is `g_weight * g + h`.
    pub g_weight: f32,
    /// Nodes popped per round; their children share one oracle call.
    pub batch_size: usize,
}

impl Default for AStarConfig {
    fn default() -> Self {
        AStarConfig {
            g_weight: G_WEIGHT,
            batch_size: A_STAR_BATCH,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    cost: f32,
    g: u32,
    handle: Handle,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // BinaryHeap pops the greatest entry, so the cheapest one must compare greatest.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.handle.cmp(&self.handle))
    }
}

/// A* over cube states with `h = -value` from the oracle.
pub struct AStar<'a, O: Oracle + ?Sized> {
    oracle: &'a O,
    config: AStarConfig,
    index: StateIndex,
    // All indexed by handle position.
    parents: Vec<Option<(Handle, Action)>>,
    best_g: Vec<u32>,
    heuristics: Vec<f32>,
    action_queue: Vec<Action>,
    outcome: Outcome,
}

impl<'a, O: Oracle + ?Sized> AStar<'a, O> {
    pub fn new(oracle: &'a O, config: AStarConfig) -> Self {
        AStar {
            oracle,
            config,
            index: StateIndex::new(),
            parents: Vec::new(),
            best_g: Vec::new(),
            heuristics: Vec::new(),
            action_queue: Vec::new(),
            outcome: Outcome::Idle,
        }
    }

    fn reset(&mut self) {
        self.index.clear();
        self.parents.clear();
        self.best_g.clear();
        self.heuristics.clear();
        self.action_queue.clear();
        self.outcome = Outcome::Idle;
    }

    fn entry(&self, handle: Handle) -> Entry {
        let g = self.best_g[handle.position()];
        Entry {
            cost: self.config.g_weight * g as f32 + self.heuristics[handle.position()],
            g,
            handle,
        }
    }

    /// Store the heuristic of freshly registered states (in handle order) with one oracle call.
    fn evaluate(&mut self, states: &[Cube]) -> Result<(), SearchError> {
        let outputs = evaluate_batched(self.oracle, states)?;
        self.heuristics.extend(outputs.into_iter().map(|(_, value)| -value));
        Ok(())
    }
}

impl<O: Oracle + ?Sized> Searcher for AStar<'_, O> {
    fn search(&mut self, root: Cube, time_limit: Duration, max_states: usize) -> Result<bool, SearchError> {
        self.reset();
        let budget = Budget::new(time_limit, max_states);

        let (root_handle, _) = self.index.register(root);
        self.parents.push(None);
        self.best_g.push(0);
        if root.is_solved() {
            self.outcome = Outcome::Solved;
            return Ok(true);
        }
        self.evaluate(&[root])?;

        let mut open = BinaryHeap::from([self.entry(root_handle)]);
        loop {
            if let Some(outcome) = budget.check(self.index.len()) {
                self.outcome = outcome;
                info!("{self} stopped ({outcome:?}) with {} states", self.index.len());
                return Ok(false);
            }

            let mut popped = Vec::with_capacity(self.config.batch_size);
            while popped.len() < self.config.batch_size.max(1) {
                let entry = match open.pop() {
                    Some(entry) => entry,
                    None => break,
                };
                // A cheaper path to this state was found after the entry was pushed.
                if entry.g > self.best_g[entry.handle.position()] {
                    continue;
                }
                if self.index.lookup(entry.handle).is_solved() {
                    let parents = &self.parents;
                    self.action_queue = trace_back(|h: Handle| parents[h.position()], entry.handle);
                    self.outcome = Outcome::Solved;
                    info!(
                        "{self} solved in {:?}: {} actions, {} states",
                        budget.elapsed(),
                        self.action_queue.len(),
                        self.index.len()
                    );
                    return Ok(true);
                }
                popped.push(entry);
            }
            if popped.is_empty() {
                self.outcome = Outcome::Exhausted;
                info!("{self} exhausted the open set with {} states", self.index.len());
                return Ok(false);
            }

            let mut new_states = Vec::new();
            let mut reopened = Vec::new();
            for entry in popped {
                let state = *self.index.lookup(entry.handle);
                let g = entry.g + 1;
                for action in Action::ALL {
                    let (handle, is_new) = self.index.register(state.applied(action));
                    if is_new {
                        self.parents.push(Some((entry.handle, action)));
                        self.best_g.push(g);
                        new_states.push(handle);
                    } else if g < self.best_g[handle.position()] {
                        self.parents[handle.position()] = Some((entry.handle, action));
                        self.best_g[handle.position()] = g;
                        reopened.push(handle);
                    }
                }
            }

            let states: Vec<Cube> = new_states.iter().map(|&h| *self.index.lookup(h)).collect();
            self.evaluate(&states)?;
            debug!(
                "a* round: {} new, {} reopened, {} open",
                new_states.len(),
                reopened.len(),
                open.len()
            );
            open.extend(new_states.into_iter().chain(reopened).map(|h| self.entry(h)));
        }
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

impl<O: Oracle + ?Sized> Display for AStar<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A* search (g weight={}, batch={})",
            self.config.g_weight, self.config.batch_size
        )
    }
}
