use std::{fmt::Display, time::Duration};

use cube::{Action, Cube};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use super::{
    expand::{expand, Expansion},
    graph::SearchGraph,
    policy::{select_leaf, TreePolicy},
    searcher::{Budget, Outcome, Searcher},
    state_index::{Handle, StateIndex},
};
use crate::{
    config::{EXPLORATION, MAX_DEPTH, VIRTUAL_LOSS, WORKERS},
    error::SearchError,
    oracle::{evaluate_batched, Oracle},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MctsConfig {
    pub policy: TreePolicy,
    /// Traversals per expansion round.
    pub workers: usize,
    /// Traversals longer than this are abandoned.
    pub max_depth: usize,
    /// Link every new node to all of its already known neighbours.
    pub complete_graph: bool,
    /// Replace the found path by the shortest one in the search graph.
    pub shorten: bool,
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            policy: TreePolicy::Uct {
                c: EXPLORATION,
                nu: VIRTUAL_LOSS,
            },
            workers: WORKERS,
            max_depth: MAX_DEPTH,
            complete_graph: false,
            shorten: false,
            seed: None,
        }
    }
}

/// Best-first search over a shared graph of cube states guided by an oracle.
pub struct Mcts<'a, O: Oracle + ?Sized> {
    oracle: &'a O,
    config: MctsConfig,
    index: StateIndex,
    graph: SearchGraph,
    rng: StdRng,
    action_queue: Vec<Action>,
    outcome: Outcome,
}

impl<'a, O: Oracle + ?Sized> Mcts<'a, O> {
    pub fn new(oracle: &'a O, config: MctsConfig) -> Self {
        Mcts {
            oracle,
            config,
            index: StateIndex::new(),
            graph: SearchGraph::default(),
            rng: new_rng(config.seed),
            action_queue: Vec::new(),
            outcome: Outcome::Idle,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn index(&self) -> &StateIndex {
        &self.index
    }

    pub fn graph(&self) -> &SearchGraph {
        &self.graph
    }

    /// Drop the graph of the previous search.
    pub fn reset(&mut self) {
        self.index.clear();
        self.graph.clear();
        self.action_queue.clear();
        self.outcome = Outcome::Idle;
        if self.config.seed.is_some() {
            self.rng = new_rng(self.config.seed);
        }
    }

    fn solved(&mut self, queue: Vec<Action>, budget: &Budget) -> bool {
        info!(
            "{self} solved in {:?}: {} actions, {} states",
            budget.elapsed(),
            queue.len(),
            self.index.len()
        );
        self.action_queue = queue;
        self.outcome = Outcome::Solved;
        true
    }

    fn found(&self, root: Handle, solved: Handle, mut queue: Vec<Action>) -> Vec<Action> {
        if self.config.shorten {
            if let Some(shorter) = self.graph.shortest_path(root, solved) {
                if shorter.len() < queue.len() {
                    info!("shortened solution from {} to {} actions", queue.len(), shorter.len());
                    queue = shorter;
                }
            }
        }
        queue
    }
}

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl<O: Oracle + ?Sized> Searcher for Mcts<'_, O> {
    fn search(&mut self, root: Cube, time_limit: Duration, max_states: usize) -> Result<bool, SearchError> {
        self.reset();
        let budget = Budget::new(time_limit, max_states);

        let (root_handle, _) = self.index.register(root);
        self.graph.allocate(root_handle);
        if root.is_solved() {
            return Ok(self.solved(Vec::new(), &budget));
        }

        // The root is evaluated on its own.
        let (policy, value) = evaluate_batched(self.oracle, &[root])?[0];
        self.graph.set_node(root_handle, policy, value)?;

        loop {
            if let Some(outcome) = budget.check(self.index.len()) {
                info!(
                    "{self} stopped ({outcome:?}) after {:?} with {} states",
                    budget.elapsed(),
                    self.index.len()
                );
                self.outcome = outcome;
                return Ok(false);
            }

            let mut paths = Vec::with_capacity(self.config.workers);
            let mut leaves = Vec::with_capacity(self.config.workers);
            for _ in 0..self.config.workers {
                if let Some((path, leaf)) = select_leaf(
                    &mut self.graph,
                    root_handle,
                    &self.config.policy,
                    &mut self.rng,
                    budget.deadline,
                    self.config.max_depth,
                ) {
                    if !leaves.contains(&leaf) {
                        paths.push(path);
                        leaves.push(leaf);
                    }
                }
            }
            if leaves.is_empty() && self.config.policy.is_deterministic() {
                // Every later walk would end the same way.
                info!(
                    "{self} found no leaf after {:?} with {} states",
                    budget.elapsed(),
                    self.index.len()
                );
                self.outcome = Outcome::Exhausted;
                return Ok(false);
            }
            if leaves.is_empty() || budget.timed_out() {
                continue;
            }

            let expansion = expand(
                &mut self.index,
                &mut self.graph,
                &leaves,
                self.oracle,
                self.config.complete_graph,
            )?;
            if let Expansion::Solved { leaf, action, handle } = expansion {
                let mut queue = std::mem::take(&mut paths[leaf]);
                queue.push(action);
                let queue = self.found(root_handle, handle, queue);
                return Ok(self.solved(queue, &budget));
            }
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

impl<O: Oracle + ?Sized> Display for Mcts<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Monte Carlo tree search ({}, workers={}, complete graph={}, shorten={})",
            self.config.policy, self.config.workers, self.config.complete_graph, self.config.shorten
        )
    }
}
