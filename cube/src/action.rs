use std::{fmt::Display, str::FromStr};

use crate::error::ParseActionError;

/// Number of quarter-turn actions.
pub const ACTION_COUNT: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Front,
    Back,
    Up,
    Down,
    Left,
    Right,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Up,
        Face::Down,
        Face::Left,
        Face::Right,
    ];

    /// Outward facing unit normal of the face.
    pub const fn normal(self) -> [i8; 3] {
        match self {
            Face::Front => [0, 0, 1],
            Face::Back => [0, 0, -1],
            Face::Up => [0, 1, 0],
            Face::Down => [0, -1, 0],
            Face::Left => [-1, 0, 0],
            Face::Right => [1, 0, 0],
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Face::Front => 'F',
            Face::Back => 'B',
            Face::Up => 'U',
            Face::Down => 'D',
            Face::Left => 'L',
            Face::Right => 'R',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Face::ALL.into_iter().find(|face| face.letter() == c)
    }
}

/// A quarter turn of one face.
///
/// Actions are indexed `2 * face + direction` where direction `0` is a
/// clockwise turn (seen from outside the face) and `1` is counterclockwise,
/// so reversing an action flips the lowest bit of its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    pub face: Face,
    pub clockwise: bool,
}

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = {
        let mut actions = [Action {
            face: Face::Front,
            clockwise: true,
        }; ACTION_COUNT];
        let mut i = 0;
        while i < ACTION_COUNT {
            actions[i] = Action {
                face: Face::ALL[i / 2],
                clockwise: i % 2 == 0,
            };
            i += 1;
        }
        actions
    };

    pub const fn new(face: Face, clockwise: bool) -> Self {
        Action { face, clockwise }
    }

    /// Panics if `index >= ACTION_COUNT`.
    pub const fn from_index(index: usize) -> Self {
        Action::ALL[index]
    }

    pub const fn index(self) -> usize {
        2 * self.face as usize + if self.clockwise { 0 } else { 1 }
    }

    /// The action which undoes this one.
    #[must_use]
    pub const fn reverse(self) -> Self {
        Action {
            face: self.face,
            clockwise: !self.clockwise,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.face.letter())?;
        if !self.clockwise {
            write!(f, "'")?;
        }
        Ok(())
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let face = chars.next().ok_or(ParseActionError::Empty)?;
        let face = Face::from_letter(face.to_ascii_uppercase()).ok_or(ParseActionError::UnknownFace(face))?;
        match chars.next() {
            None => Ok(Action::new(face, true)),
            Some('\'') if chars.next().is_none() => Ok(Action::new(face, false)),
            _ => Err(ParseActionError::Trailing(s.to_string())),
        }
    }
}

/// Parse a whitespace separated action sequence such as `"R U' F"`.
pub fn parse_actions(s: &str) -> Result<Vec<Action>, ParseActionError> {
    s.split_whitespace().map(str::parse).collect()
}
