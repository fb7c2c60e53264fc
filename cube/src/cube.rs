use std::fmt::{Debug, Display};

use crate::{
    action::{Action, Face, ACTION_COUNT},
    facelet::{FACELET_COUNT, FACE_FACELETS, PERMUTATIONS, SOLVED},
};

/// Length of the one-hot encoding: one slot per (facelet, colour) pair.
pub const ONE_HOT_SIZE: usize = FACELET_COUNT * 6;

/// A 3x3x3 cube configuration stored as the colour of every facelet.
///
/// Centres never move under face turns, so two cubes are the same
/// configuration exactly when their facelet arrays are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cube {
    facelets: [u8; FACELET_COUNT],
}

impl Default for Cube {
    fn default() -> Self {
        Cube { facelets: *SOLVED }
    }
}

impl Cube {
    pub fn solved() -> Self {
        Self::default()
    }

    pub fn is_solved(&self) -> bool {
        self.facelets == *SOLVED
    }

    pub fn apply(&mut self, action: Action) {
        let permutation = &PERMUTATIONS[action.index()];
        let mut next = [0; FACELET_COUNT];
        for (&colour, &to) in self.facelets.iter().zip(permutation.iter()) {
            next[to as usize] = colour;
        }
        self.facelets = next;
    }

    #[must_use]
    pub fn applied(mut self, action: Action) -> Self {
        self.apply(action);
        self
    }

    pub fn apply_all<I: IntoIterator<Item = Action>>(&mut self, actions: I) {
        for action in actions {
            self.apply(action);
        }
    }

    /// All states one quarter turn away, indexed by action.
    pub fn successors(&self) -> [Cube; ACTION_COUNT] {
        Action::ALL.map(|action| self.applied(action))
    }

    /// Byte form used for hashing and equality.
    pub fn canonical(&self) -> &[u8; FACELET_COUNT] {
        &self.facelets
    }

    pub fn colour(&self, facelet: usize) -> Face {
        Face::ALL[self.facelets[facelet] as usize]
    }

    /// Write the one-hot encoding into `out`, which must hold `ONE_HOT_SIZE` values.
    pub fn write_one_hot(&self, out: &mut [f32]) {
        assert_eq!(out.len(), ONE_HOT_SIZE, "one-hot buffer has the wrong size");
        out.fill(0.);
        for (i, &colour) in self.facelets.iter().enumerate() {
            out[6 * i + colour as usize] = 1.;
        }
    }

    pub fn one_hot(&self) -> Vec<f32> {
        let mut out = vec![0.; ONE_HOT_SIZE];
        self.write_one_hot(&mut out);
        out
    }

    /// Number of facelets not showing the colour of their face.
    pub fn misplaced_facelets(&self) -> usize {
        self.facelets
            .iter()
            .zip(SOLVED.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl Display for Cube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (face, indices) in Face::ALL.into_iter().zip(FACE_FACELETS.iter()) {
            let colours: String = indices
                .iter()
                .map(|&i| self.colour(i as usize).letter())
                .collect();
            writeln!(f, "{}: {colours}", face.letter())?;
        }
        Ok(())
    }
}

impl Debug for Cube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letters: String = (0..FACELET_COUNT).map(|i| self.colour(i).letter()).collect();
        write!(f, "Cube({letters})")
    }
}
