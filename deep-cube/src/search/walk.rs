use std::{fmt::Display, time::Duration};

use cube::{Action, Cube, ACTION_COUNT};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{
    policy::follow_policy,
    searcher::{Budget, Outcome, Searcher},
};
use crate::{
    error::SearchError,
    oracle::{evaluate_batched, Oracle},
};

/// Walk from `root` one action at a time until the cube is solved or the
/// budget runs out. `max_states` bounds the number of visited states.
fn walk<F>(
    root: Cube,
    time_limit: Duration,
    max_states: usize,
    queue: &mut Vec<Action>,
    mut step: F,
) -> Result<Outcome, SearchError>
where
    F: FnMut(&Cube) -> Result<Action, SearchError>,
{
    queue.clear();
    let budget = Budget::new(time_limit, max_states);
    let mut state = root;
    while !state.is_solved() {
        if let Some(outcome) = budget.check(queue.len() + 1) {
            queue.clear();
            return Ok(outcome);
        }
        let action = step(&state)?;
        state.apply(action);
        queue.push(action);
    }
    Ok(Outcome::Solved)
}

fn new_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Uniformly random actions until the cube happens to be solved.
pub struct RandomWalk {
    seed: Option<u64>,
    rng: StdRng,
    action_queue: Vec<Action>,
    explored: usize,
    outcome: Outcome,
}

impl RandomWalk {
    pub fn new(seed: Option<u64>) -> Self {
        RandomWalk {
            seed,
            rng: new_rng(seed),
            action_queue: Vec::new(),
            explored: 0,
            outcome: Outcome::Idle,
        }
    }
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Searcher for RandomWalk {
    fn search(&mut self, root: Cube, time_limit: Duration, max_states: usize) -> Result<bool, SearchError> {
        if self.seed.is_some() {
            self.rng = new_rng(self.seed);
        }
        let rng = &mut self.rng;
        let mut steps = 0;
        self.outcome = walk(root, time_limit, max_states, &mut self.action_queue, |_| {
            steps += 1;
            Ok(Action::from_index(rng.gen_range(0..ACTION_COUNT)))
        })?;
        self.explored = steps + 1;
        Ok(self.outcome == Outcome::Solved)
    }

    fn action_queue(&self) -> &[Action] {
        &self.action_queue
    }

    fn explored_states(&self) -> usize {
        self.explored
    }

    fn outcome(&self) -> Outcome {
        self.outcome
    }
}

impl Display for RandomWalk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Random walk")
    }
}

/// Follow the oracle's policy, one oracle call per step.
pub struct PolicySearch<'a, O: Oracle + ?Sized> {
    oracle: &'a O,
    sample: bool,
    seed: Option<u64>,
    rng: StdRng,
    action_queue: Vec<Action>,
    explored: usize,
    outcome: Outcome,
}

impl<'a, O: Oracle + ?Sized> PolicySearch<'a, O> {
    pub fn new(oracle: &'a O, sample: bool, seed: Option<u64>) -> Self {
        PolicySearch {
            oracle,
            sample,
            seed,
            rng: new_rng(seed),
            action_queue: Vec::new(),
            explored: 0,
            outcome: Outcome::Idle,
        }
    }
}

impl<O: Oracle + ?Sized> Searcher for PolicySearch<'_, O> {
    fn search(&mut self, root: Cube, time_limit: Duration, max_states: usize) -> Result<bool, SearchError> {
        if self.seed.is_some() {
            self.rng = new_rng(self.seed);
        }
        let (oracle, sample, rng) = (self.oracle, self.sample, &mut self.rng);
        let mut steps = 0;
        self.outcome = walk(root, time_limit, max_states, &mut self.action_queue, |state| {
            steps += 1;
            let (policy, _) = evaluate_batched(oracle, &[*state])?[0];
            Ok(follow_policy(&policy, sample, rng))
        })?;
        self.explored = steps + 1;
        if self.outcome == Outcome::Solved {
            info!("{self} solved in {} actions", self.action_queue.len());
        }
        Ok(self.outcome == Outcome::Solved)
    }

    fn action_queue(&self) -> &[Action] {
        &self.action_queue
    }

    fn explored_states(&self) -> usize {
        self.explored
    }

    fn outcome(&self) -> Outcome {
        self.outcome
    }
}

impl<O: Oracle + ?Sized> Display for PolicySearch<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Policy search {} sampling",
            if self.sample { "with" } else { "without" }
        )
    }
}
