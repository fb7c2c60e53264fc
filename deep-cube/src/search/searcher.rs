use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use cube::{Action, Cube};

use crate::error::SearchError;

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Idle,
    Solved,
    Timeout,
    SizeLimit,
    /// Every reachable state was tried without finding a solution.
    Exhausted,
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Idle
    }
}

/// Common surface of all search strategies.
///
/// `Display` gives the strategy name and its hyperparameters.
pub trait Searcher: Display {
    /// Search for a path from `root` to the solved state.
    ///
    /// Returns `Ok(false)` when the time or state budget runs out, or the
    /// strategy has nothing left to explore; `outcome` tells these apart.
    fn search(&mut self, root: Cube, time_limit: Duration, max_states: usize) -> Result<bool, SearchError>;

    /// Actions solving the last searched root, empty when it was not solved.
    fn action_queue(&self) -> &[Action];

    /// Number of states the last search looked at.
    fn explored_states(&self) -> usize;

    fn outcome(&self) -> Outcome;
}

impl<S: Searcher + ?Sized> Searcher for &mut S {
    fn search(&mut self, root: Cube, time_limit: Duration, max_states: usize) -> Result<bool, SearchError> {
        (**self).search(root, time_limit, max_states)
    }

    fn action_queue(&self) -> &[Action] {
        (**self).action_queue()
    }

    fn explored_states(&self) -> usize {
        (**self).explored_states()
    }

    fn outcome(&self) -> Outcome {
        (**self).outcome()
    }
}

/// Time and size budget of one search.
#[derive(Clone, Copy, Debug)]
pub struct Budget {
    pub start: Instant,
    pub deadline: Instant,
    pub max_states: usize,
}

impl Budget {
    pub fn new(time_limit: Duration, max_states: usize) -> Self {
        let start = Instant::now();
        // Instant + Duration::MAX overflows, cap "forever" at a year.
        let deadline = start
            .checked_add(time_limit)
            .unwrap_or_else(|| start + Duration::from_secs(365 * 24 * 60 * 60));
        Budget {
            start,
            deadline,
            max_states,
        }
    }

    pub fn timed_out(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// The reason to stop, if any.
    pub fn check(&self, states: usize) -> Option<Outcome> {
        if self.timed_out() {
            Some(Outcome::Timeout)
        } else if states >= self.max_states {
            Some(Outcome::SizeLimit)
        } else {
            None
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Follow back-pointers from `handle` to the root.
pub(crate) fn trace_back<H: Copy>(
    parents: impl Fn(H) -> Option<(H, Action)>,
    mut handle: H,
) -> Vec<Action> {
    let mut path = Vec::new();
    while let Some((parent, action)) = parents(handle) {
        path.push(action);
        handle = parent;
    }
    path.reverse();
    path
}
