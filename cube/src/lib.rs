#[macro_use]
extern crate lazy_static;

mod action;
mod cube;
mod error;
mod facelet;
mod scramble;

pub use action::{parse_actions, Action, Face, ACTION_COUNT};
pub use cube::{Cube, ONE_HOT_SIZE};
pub use error::*;
pub use facelet::{FACELETS_PER_FACE, FACELET_COUNT};
pub use scramble::{random_actions, scramble};
