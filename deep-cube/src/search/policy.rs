use std::{fmt::Display, time::Instant};

use arrayvec::ArrayVec;
use cube::{Action, ACTION_COUNT};
use rand::{seq::SliceRandom, Rng};
use rand_distr::{Distribution, WeightedIndex};
use rustc_hash::FxHashSet;

use super::{graph::SearchGraph, node::Node, state_index::Handle, ucb::upper_confidence_bound};
use crate::oracle::Policy;

/// Rule for picking the edge to follow out of an internal node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TreePolicy {
    /// Upper confidence bound with exploration `c` and virtual loss `nu`.
    Uct { c: f32, nu: f32 },
    /// Follow the policy prior, either its argmax or a sample.
    Greedy { sample: bool },
    /// Uniformly random edges.
    Random,
}

impl TreePolicy {
    /// Pick an action at `node` and record the visit where the rule keeps statistics.
    pub fn choose<R: Rng + ?Sized>(&self, node: &mut Node, rng: &mut R) -> Action {
        match *self {
            TreePolicy::Uct { c, nu } => {
                let index = if node.visit_count() == 0 {
                    rng.gen_range(0..ACTION_COUNT)
                } else {
                    argmax(|a| upper_confidence_bound(c, &*node, a))
                };
                node.visits[index] += 1;
                node.virtual_loss[index] += nu;
                Action::from_index(index)
            }
            TreePolicy::Greedy { sample } => follow_policy(&node.policy, sample, rng),
            TreePolicy::Random => Action::from_index(rng.gen_range(0..ACTION_COUNT)),
        }
    }

    /// Like [`TreePolicy::choose`], restricted to the actions in `open`.
    ///
    /// UCT ignores the restriction, its visit counts already move it on.
    /// Returns `None` when `open` is empty.
    pub fn choose_among<R: Rng + ?Sized>(&self, node: &mut Node, open: &[Action], rng: &mut R) -> Option<Action> {
        match *self {
            TreePolicy::Uct { .. } => Some(self.choose(node, rng)),
            TreePolicy::Greedy { sample } => {
                if sample {
                    let weights = open.iter().map(|a| node.policy[a.index()]);
                    if let Ok(distr) = WeightedIndex::<f32>::new(weights) {
                        return Some(open[distr.sample(rng)]);
                    }
                }
                open.iter()
                    .copied()
                    .max_by(|a, b| node.policy[a.index()].total_cmp(&node.policy[b.index()]))
            }
            TreePolicy::Random => open.choose(rng).copied(),
        }
    }

    /// Whether the same graph always yields the same walk.
    pub fn is_deterministic(&self) -> bool {
        matches!(self, TreePolicy::Greedy { sample: false })
    }
}

impl Display for TreePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreePolicy::Uct { c, nu } => write!(f, "UCT (c={c}, nu={nu})"),
            TreePolicy::Greedy { sample } => {
                write!(f, "greedy policy {} sampling", if *sample { "with" } else { "without" })
            }
            TreePolicy::Random => write!(f, "uniform random"),
        }
    }
}

/// Argmax of the policy, or a sample from it when `sample` is set.
pub fn follow_policy<R: Rng + ?Sized>(policy: &Policy, sample: bool, rng: &mut R) -> Action {
    if sample {
        // Degenerate priors (all zero or not finite) cannot be sampled.
        if let Ok(distr) = WeightedIndex::<f32>::new(policy) {
            return Action::from_index(distr.sample(rng));
        }
    }
    Action::from_index(argmax(|a| policy[a]))
}

fn argmax<F: Fn(usize) -> f32>(score: F) -> usize {
    (0..ACTION_COUNT)
        .map(|a| (a, score(a)))
        .max_by(|(_, x), (_, y)| x.total_cmp(y))
        .map(|(a, _)| a)
        .unwrap_or_default()
}

/// Walk from `root` to a leaf following `policy`.
///
/// Greedy and random walks never step back onto a state already on the path.
/// Returns the actions taken and the leaf, or `None` when the deadline passes,
/// the walk gets longer than `max_depth` or every way forward closes a cycle.
pub fn select_leaf<R: Rng + ?Sized>(
    graph: &mut SearchGraph,
    root: Handle,
    policy: &TreePolicy,
    rng: &mut R,
    deadline: Instant,
    max_depth: usize,
) -> Option<(Vec<Action>, Handle)> {
    let mut path = Vec::new();
    let mut visited = FxHashSet::default();
    visited.insert(root);
    let mut handle = root;
    while !graph.node(handle).is_leaf {
        if path.len() >= max_depth || Instant::now() >= deadline {
            return None;
        }
        let node = graph.node_mut(handle);
        let open: ArrayVec<Action, ACTION_COUNT> = Action::ALL
            .into_iter()
            .filter(|a| node.neighbors[a.index()].map_or(true, |next| !visited.contains(&next)))
            .collect();
        let action = policy.choose_among(node, &open, rng)?;
        path.push(action);
        handle = graph.node(handle).neighbors[action.index()].expect("internal nodes are fully linked");
        visited.insert(handle);
    }
    Some((path, handle))
}
