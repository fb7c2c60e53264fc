use cube::{Action, Cube, ACTION_COUNT};
use log::debug;
use rustc_hash::FxHashMap;

use super::{graph::SearchGraph, state_index::{Handle, StateIndex}};
use crate::{
    error::SearchError,
    oracle::{evaluate_batched, Oracle},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// `leaves[leaf]` reaches the solved state (registered as `handle`) with `action`.
    Solved { leaf: usize, action: Action, handle: Handle },
    Grown { new_states: usize },
}

/// Expand every leaf along all of its actions in one batch.
///
/// A solved successor ends the expansion right away: its edge is linked and
/// nothing else in the batch is registered or evaluated. Otherwise all
/// successors are registered and linked in both directions, the new ones are
/// evaluated with a single oracle call. A new state's edge back to the leaf
/// that found it starts at that leaf's value, and each leaf's best neighbour
/// value is written onto the edges leading back to it from internal nodes.
///
/// When the oracle fails the graph is left untouched.
pub fn expand<O: Oracle + ?Sized>(
    index: &mut StateIndex,
    graph: &mut SearchGraph,
    leaves: &[Handle],
    oracle: &O,
    complete_graph: bool,
) -> Result<Expansion, SearchError> {
    let successors: Vec<Cube> = leaves
        .iter()
        .flat_map(|&leaf| index.lookup(leaf).successors())
        .collect();
    let edge = |position: usize| {
        (
            leaves[position / ACTION_COUNT],
            Action::from_index(position % ACTION_COUNT),
        )
    };

    if let Some(position) = successors.iter().position(Cube::is_solved) {
        let (leaf, action) = edge(position);
        let (handle, _) = index.register(successors[position]);
        graph.link_edge(leaf, action, handle);
        graph.mark_leaf_status(leaf);
        graph.mark_leaf_status(handle);
        return Ok(Expansion::Solved {
            leaf: position / ACTION_COUNT,
            action,
            handle,
        });
    }

    // Several leaves can reach the same state. The last occurrence of a
    // state in the batch decides whether it is new.
    let mut last_occurrence: FxHashMap<Cube, usize> = FxHashMap::default();
    for (position, state) in successors.iter().enumerate() {
        last_occurrence.insert(*state, position);
    }
    let new_positions: Vec<usize> = successors
        .iter()
        .enumerate()
        .filter(|&(position, state)| last_occurrence[state] == position && !index.contains(state))
        .map(|(position, _)| position)
        .collect();
    let new_states: Vec<Cube> = new_positions.iter().map(|&position| successors[position]).collect();

    // Evaluate before touching the graph so that a failing oracle leaves it consistent.
    let outputs = evaluate_batched(oracle, &new_states)?;

    graph.reserve(index.len() + new_states.len());
    let mut new_handles = Vec::with_capacity(new_states.len());
    for (&position, (policy, value)) in new_positions.iter().zip(outputs) {
        let (handle, is_new) = index.register(successors[position]);
        debug_assert!(is_new);
        graph.set_node(handle, policy, value)?;
        // The edge back to the discovering leaf starts at the leaf's value.
        let (leaf, action) = edge(position);
        let leaf_value = graph.node(leaf).value;
        graph.backup_value(handle, action.reverse(), leaf_value);
        new_handles.push(handle);
    }

    let mut touched: Vec<Handle> = leaves.to_vec();
    for (position, state) in successors.iter().enumerate() {
        let (leaf, action) = edge(position);
        let handle = index.get(state).expect("every successor has been registered");
        graph.link_edge(leaf, action, handle);
        touched.push(handle);
    }

    if complete_graph {
        for (&handle, state) in new_handles.iter().zip(&new_states) {
            let unresolved = graph.node(handle).unresolved();
            for action in unresolved {
                if let Some(neighbor) = index.get(&state.applied(action)) {
                    graph.link_edge(handle, action, neighbor);
                    touched.push(neighbor);
                }
            }
        }
    }

    for &handle in &touched {
        graph.mark_leaf_status(handle);
    }

    // The edge value towards a freshly expanded leaf is the best value among
    // the leaf's neighbours. Neighbours that are still leaves keep their seed.
    for &leaf in leaves {
        let neighbors = graph.node(leaf).neighbors;
        let max_value = neighbors
            .iter()
            .flatten()
            .map(|&neighbor| graph.node(neighbor).value)
            .fold(f32::NEG_INFINITY, f32::max);
        for (i, neighbor) in neighbors.iter().enumerate() {
            if let Some(neighbor) = *neighbor {
                if !graph.node(neighbor).is_leaf {
                    graph.backup_value(neighbor, Action::from_index(i).reverse(), max_value);
                }
            }
        }
    }

    debug!(
        "expanded {} leaves: {} successors, {} new states, {} states in total",
        leaves.len(),
        successors.len(),
        new_handles.len(),
        index.len()
    );
    Ok(Expansion::Grown {
        new_states: new_handles.len(),
    })
}
