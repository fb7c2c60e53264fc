use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParseActionError {
    Empty,
    UnknownFace(char),
    Trailing(String),
}

impl Display for ParseActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseActionError::Empty => write!(f, "cannot parse an action from an empty string"),
            ParseActionError::UnknownFace(c) => {
                write!(f, "unknown face {c:?}, expected one of F, B, U, D, L, R")
            }
            ParseActionError::Trailing(s) => {
                write!(f, "unexpected characters in action {s:?}, only a trailing ' is allowed")
            }
        }
    }
}

impl Error for ParseActionError {}
