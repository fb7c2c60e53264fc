use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use cube::scramble;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    agent::{Agent, TreeAgent},
    config::{MAX_STATES, TIME_LIMIT_SECS},
    error::SearchError,
    search::Searcher,
};

/// Aggregated results of all games at one scramble depth.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthReport {
    pub depth: usize,
    pub games: usize,
    pub solved: usize,
    /// Summed over solved games only.
    pub total_length: usize,
    pub total_explored: usize,
    pub total_time: Duration,
}

impl DepthReport {
    pub fn solve_rate(&self) -> f64 {
        if self.games == 0 {
            0.
        } else {
            self.solved as f64 / self.games as f64
        }
    }

    /// Mean solution length over the solved games.
    pub fn mean_length(&self) -> Option<f64> {
        (self.solved > 0).then(|| self.total_length as f64 / self.solved as f64)
    }

    pub fn mean_explored(&self) -> f64 {
        if self.games == 0 {
            0.
        } else {
            self.total_explored as f64 / self.games as f64
        }
    }
}

impl Display for DepthReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "depth {:>3}: solved {}/{} ({:.1}%)",
            self.depth,
            self.solved,
            self.games,
            100. * self.solve_rate()
        )?;
        if let Some(length) = self.mean_length() {
            write!(f, ", mean length {length:.2}")?;
        }
        write!(
            f,
            ", mean explored {:.0}, took {:.2?}",
            self.mean_explored(),
            self.total_time
        )
    }
}

/// Plays scrambled cubes of increasing depth and reports how a searcher fares.
#[derive(Clone, Debug)]
pub struct Evaluator {
    pub depths: Vec<usize>,
    pub games: usize,
    pub time_limit: Duration,
    pub max_states: usize,
    pub seed: Option<u64>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator {
            depths: (1..=10).collect(),
            games: 10,
            time_limit: Duration::from_secs_f64(TIME_LIMIT_SECS),
            max_states: MAX_STATES,
            seed: None,
        }
    }
}

impl Evaluator {
    pub fn evaluate<S: Searcher + ?Sized>(&self, searcher: &mut S) -> Result<Vec<DepthReport>, SearchError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!("evaluating {searcher} on depths {:?}", self.depths);
        let mut agent = TreeAgent::new(searcher, self.time_limit, self.max_states);

        let mut reports = Vec::with_capacity(self.depths.len());
        for &depth in &self.depths {
            let mut report = DepthReport {
                depth,
                games: self.games,
                ..Default::default()
            };
            for game in 0..self.games {
                let (mut state, _) = scramble(depth, &mut rng);
                agent.reset();
                let start = Instant::now();
                let searched = !state.is_solved();
                let mut length = 0;
                while !state.is_solved() {
                    match agent.act(&state)? {
                        Some(action) => state.apply(action),
                        None => break,
                    }
                    length += 1;
                }
                report.total_time += start.elapsed();
                if searched {
                    report.total_explored += agent.searcher().explored_states();
                }
                if state.is_solved() {
                    report.solved += 1;
                    report.total_length += length;
                }
                debug!(
                    "depth {depth} game {game}: {:?} after {length} actions",
                    agent.searcher().outcome()
                );
            }
            info!("{report}");
            reports.push(report);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        oracle::UniformOracle,
        search::{Bfs, Mcts, MctsConfig, RandomWalk},
    };

    #[test]
    fn bfs_solves_shallow_scrambles() {
        let evaluator = Evaluator {
            depths: vec![1, 2, 3],
            games: 3,
            time_limit: Duration::from_secs(30),
            max_states: usize::MAX,
            seed: Some(0),
        };
        let reports = evaluator.evaluate(&mut Bfs::new()).unwrap();
        assert_eq!(reports.len(), 3);
        for report in reports {
            assert_eq!(report.solved, 3);
            assert_eq!(report.solve_rate(), 1.);
            assert!(report.mean_length().unwrap() <= report.depth as f64);
            assert!(report.mean_explored() >= 1.);
        }
    }

    #[test]
    fn works_through_trait_objects() {
        let oracle = UniformOracle;
        let mut searcher: Box<dyn Searcher + '_> = Box::new(Mcts::new(&oracle, MctsConfig {
            seed: Some(3),
            ..Default::default()
        }));
        let evaluator = Evaluator {
            depths: vec![1],
            games: 2,
            time_limit: Duration::from_secs(5),
            max_states: 10_000,
            seed: Some(1),
        };
        let reports = evaluator.evaluate(searcher.as_mut()).unwrap();
        assert_eq!(reports[0].solved, 2);
        assert_eq!(reports[0].mean_length(), Some(1.));
    }

    #[test]
    fn failures_are_counted() {
        let evaluator = Evaluator {
            depths: vec![20],
            games: 2,
            time_limit: Duration::from_secs(5),
            max_states: 30,
            seed: Some(2),
        };
        let reports = evaluator.evaluate(&mut RandomWalk::new(Some(0))).unwrap();
        assert_eq!(reports[0].solved, 0);
        assert_eq!(reports[0].mean_length(), None);
        assert_eq!(reports[0].mean_explored(), 30.);
        assert!(reports[0].to_string().starts_with("depth  20: solved 0/2"));
    }
}
