use rand::Rng;

use crate::{
    action::{Action, ACTION_COUNT},
    cube::Cube,
};

/// Random action sequence of the given length which never directly
/// undoes the previous action.
pub fn random_actions<R: Rng + ?Sized>(depth: usize, rng: &mut R) -> Vec<Action> {
    let mut actions: Vec<Action> = Vec::with_capacity(depth);
    while actions.len() < depth {
        let action = Action::from_index(rng.gen_range(0..ACTION_COUNT));
        if actions.last().map_or(false, |&last| last.reverse() == action) {
            continue;
        }
        actions.push(action);
    }
    actions
}

/// Scramble a solved cube with `depth` random quarter turns.
/// The resulting state may still be closer than `depth` to the solved state.
pub fn scramble<R: Rng + ?Sized>(depth: usize, rng: &mut R) -> (Cube, Vec<Action>) {
    let actions = random_actions(depth, rng);
    let mut cube = Cube::solved();
    cube.apply_all(actions.iter().copied());
    (cube, actions)
}
