use cube::{Cube, ACTION_COUNT};
use log::warn;

use crate::{
    config::MAX_BATCH_SPLITS,
    error::{OracleError, SearchError},
};

pub type Policy = [f32; ACTION_COUNT];
pub type Eval = f32;

/// Policy/value oracle guiding the search.
///
/// For every state in the batch it returns a probability distribution over
/// the actions and a scalar value estimate (higher is closer to solved).
/// Implementations must accept batches of any size, including one.
pub trait Oracle {
    fn evaluate(&self, states: &[Cube]) -> Result<Vec<(Policy, Eval)>, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn evaluate(&self, states: &[Cube]) -> Result<Vec<(Policy, Eval)>, OracleError> {
        (**self).evaluate(states)
    }
}

/// Uniform policy and zero value for every state.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformOracle;

impl Oracle for UniformOracle {
    fn evaluate(&self, states: &[Cube]) -> Result<Vec<(Policy, Eval)>, OracleError> {
        Ok(vec![([1. / ACTION_COUNT as f32; ACTION_COUNT], 0.); states.len()])
    }
}

/// Uniform policy, value is minus the number of misplaced facelets (scaled so
/// that one quarter turn from solved is -1).
#[derive(Clone, Copy, Debug, Default)]
pub struct MisplacedOracle;

impl Oracle for MisplacedOracle {
    fn evaluate(&self, states: &[Cube]) -> Result<Vec<(Policy, Eval)>, OracleError> {
        Ok(states
            .iter()
            .map(|state| {
                let value = -(state.misplaced_facelets() as f32) / 12.;
                ([1. / ACTION_COUNT as f32; ACTION_COUNT], value)
            })
            .collect())
    }
}

/// Evaluate `states`, halving the sub-batch size whenever the oracle reports
/// a capacity error.
///
/// Evaluation resumes at the first state without an output, so nothing is
/// dropped or evaluated twice. Fatal errors are returned immediately.
pub fn evaluate_batched<O: Oracle + ?Sized>(
    oracle: &O,
    states: &[Cube],
) -> Result<Vec<(Policy, Eval)>, SearchError> {
    let mut outputs = Vec::with_capacity(states.len());
    let mut batch_size = states.len().max(1);
    let mut splits = 0;
    let mut rest = states;
    while !rest.is_empty() {
        let (batch, remaining) = rest.split_at(batch_size.min(rest.len()));
        match oracle.evaluate(batch) {
            Ok(output) => {
                if output.len() != batch.len() {
                    return Err(SearchError::OutputMismatch {
                        expected: batch.len(),
                        got: output.len(),
                    });
                }
                outputs.extend(output);
                rest = remaining;
            }
            Err(OracleError::Capacity(msg)) if batch_size > 1 && splits < MAX_BATCH_SPLITS => {
                batch_size = (batch_size + 1) / 2;
                splits += 1;
                warn!("oracle out of capacity ({msg}), retrying with batches of {batch_size}");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use cube::{scramble, Action};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    /// Fails with a capacity error on batches larger than `limit`.
    struct SmallDevice {
        limit: usize,
        calls: RefCell<Vec<usize>>,
    }

    impl Oracle for SmallDevice {
        fn evaluate(&self, states: &[Cube]) -> Result<Vec<(Policy, Eval)>, OracleError> {
            self.calls.borrow_mut().push(states.len());
            if states.len() > self.limit {
                return Err(OracleError::Capacity("out of memory".to_string()));
            }
            MisplacedOracle.evaluate(states)
        }
    }

    struct Broken;

    impl Oracle for Broken {
        fn evaluate(&self, _states: &[Cube]) -> Result<Vec<(Policy, Eval)>, OracleError> {
            Err(OracleError::Fatal("shape mismatch".to_string()))
        }
    }

    fn states(n: usize) -> Vec<Cube> {
        let mut rng = StdRng::seed_from_u64(3);
        (0..n).map(|_| scramble(4, &mut rng).0).collect()
    }

    #[test]
    fn capacity_errors_halve_the_batch() {
        let device = SmallDevice {
            limit: 3,
            calls: RefCell::new(Vec::new()),
        };
        let states = states(10);
        let outputs = evaluate_batched(&device, &states).unwrap();
        assert_eq!(outputs, MisplacedOracle.evaluate(&states).unwrap());
        // 10 fails, 5 fails, then batches of 3.
        assert_eq!(*device.calls.borrow(), vec![10, 5, 3, 3, 3, 1]);
    }

    #[test]
    fn capacity_error_on_single_state_is_returned() {
        let device = SmallDevice {
            limit: 0,
            calls: RefCell::new(Vec::new()),
        };
        let result = evaluate_batched(&device, &states(2));
        assert!(matches!(result, Err(SearchError::Oracle(OracleError::Capacity(_)))));
    }

    #[test]
    fn fatal_errors_are_not_retried() {
        let result = evaluate_batched(&Broken, &states(8));
        assert_eq!(
            result,
            Err(SearchError::Oracle(OracleError::Fatal("shape mismatch".to_string())))
        );
    }

    #[test]
    fn misplaced_value_is_minus_one_after_one_turn() {
        let cube = Cube::solved().applied(Action::from_index(0));
        let output = MisplacedOracle.evaluate(&[cube, Cube::solved()]).unwrap();
        assert_eq!(output[0].1, -1.);
        assert_eq!(output[1].1, 0.);
    }
}
