use std::{collections::VecDeque, time::Duration};

use cube::{Action, Cube};

use crate::{error::SearchError, search::Searcher};

pub trait Agent {
    /// Next action to take in `state`, or `None` when the agent has no plan.
    fn act(&mut self, state: &Cube) -> Result<Option<Action>, SearchError>;

    /// Forget everything planned so far.
    fn reset(&mut self) {}
}

/// Searches once per root and then plays out the found solution.
///
/// A new search is started whenever the state passed to `act` is not the one
/// the plan expects, for example after an external move. A state whose search
/// failed is not searched again until [`Agent::reset`].
pub struct TreeAgent<S: Searcher> {
    searcher: S,
    time_limit: Duration,
    max_states: usize,
    plan: VecDeque<Action>,
    expected: Option<Cube>,
    failed: Option<Cube>,
}

impl<S: Searcher> TreeAgent<S> {
    pub fn new(searcher: S, time_limit: Duration, max_states: usize) -> Self {
        TreeAgent {
            searcher,
            time_limit,
            max_states,
            plan: VecDeque::new(),
            expected: None,
            failed: None,
        }
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    pub fn into_searcher(self) -> S {
        self.searcher
    }
}

impl<S: Searcher> Agent for TreeAgent<S> {
    fn act(&mut self, state: &Cube) -> Result<Option<Action>, SearchError> {
        if self.expected != Some(*state) {
            self.plan.clear();
            if self.failed == Some(*state) {
                return Ok(None);
            }
            if self.searcher.search(*state, self.time_limit, self.max_states)? {
                self.plan.extend(self.searcher.action_queue());
            } else {
                self.failed = Some(*state);
            }
        }
        let action = self.plan.pop_front();
        self.expected = action.map(|action| state.applied(action));
        Ok(action)
    }

    fn reset(&mut self) {
        self.plan.clear();
        self.expected = None;
        self.failed = None;
    }
}

#[cfg(test)]
mod tests {
    use cube::{scramble, Cube};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::search::{Bfs, Outcome};

    /// Bfs that counts its searches.
    struct Counting {
        bfs: Bfs,
        searches: usize,
    }

    impl std::fmt::Display for Counting {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "counting {}", self.bfs)
        }
    }

    impl Searcher for Counting {
        fn search(&mut self, root: Cube, time_limit: Duration, max_states: usize) -> Result<bool, SearchError> {
            self.searches += 1;
            self.bfs.search(root, time_limit, max_states)
        }

        fn action_queue(&self) -> &[Action] {
            self.bfs.action_queue()
        }

        fn explored_states(&self) -> usize {
            self.bfs.explored_states()
        }

        fn outcome(&self) -> Outcome {
            self.bfs.outcome()
        }
    }

    fn agent(max_states: usize) -> TreeAgent<Counting> {
        let searcher = Counting {
            bfs: Bfs::new(),
            searches: 0,
        };
        TreeAgent::new(searcher, Duration::from_secs(10), max_states)
    }

    #[test]
    fn plays_out_the_plan() {
        let (mut state, _) = scramble(3, &mut StdRng::seed_from_u64(5));
        let mut agent = agent(usize::MAX);
        while let Some(action) = agent.act(&state).unwrap() {
            state.apply(action);
        }
        assert!(state.is_solved());
        assert_eq!(agent.searcher().searches, 1);
    }

    #[test]
    fn replans_after_external_move() {
        let (mut state, _) = scramble(2, &mut StdRng::seed_from_u64(6));
        let mut agent = agent(usize::MAX);
        let first = agent.act(&state).unwrap().unwrap();
        // Turn the other way than the agent asked.
        state.apply(first.reverse());
        while let Some(action) = agent.act(&state).unwrap() {
            state.apply(action);
        }
        assert!(state.is_solved());
        assert_eq!(agent.searcher().searches, 2);
    }

    #[test]
    fn no_plan_without_solution() {
        let (state, _) = scramble(20, &mut StdRng::seed_from_u64(7));
        let mut agent = TreeAgent::new(Bfs::new(), Duration::from_secs(10), 100);
        assert_eq!(agent.act(&state).unwrap(), None);
        assert_eq!(agent.searcher().outcome(), Outcome::SizeLimit);
    }

    #[test]
    fn failed_root_is_searched_once() {
        let (state, _) = scramble(20, &mut StdRng::seed_from_u64(8));
        let mut agent = agent(100);
        assert_eq!(agent.act(&state).unwrap(), None);
        assert_eq!(agent.act(&state).unwrap(), None);
        assert_eq!(agent.searcher().searches, 1);

        // Another root is searched, and a reset forgets the failure.
        let other = Cube::solved().applied(Action::from_index(0));
        assert!(agent.act(&other).unwrap().is_some());
        assert_eq!(agent.searcher().searches, 2);
        agent.reset();
        assert_eq!(agent.act(&state).unwrap(), None);
        assert_eq!(agent.searcher().searches, 3);
    }
}
