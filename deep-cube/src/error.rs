use std::{error::Error, fmt::Display};

use crate::search::Handle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleError {
    /// The batch did not fit (for example the device ran out of memory).
    /// Retrying with a smaller batch may succeed.
    Capacity(String),
    Fatal(String),
}

impl Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleError::Capacity(msg) => write!(f, "oracle ran out of capacity: {msg}"),
            OracleError::Fatal(msg) => write!(f, "oracle failed: {msg}"),
        }
    }
}

impl Error for OracleError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    Oracle(OracleError),
    NodeAlreadyEvaluated(Handle),
    OutputMismatch { expected: usize, got: usize },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Oracle(oracle_error) => oracle_error.fmt(f),
            SearchError::NodeAlreadyEvaluated(handle) => write!(
                f,
                "node {handle} already has a policy and value, the search graph is inconsistent"
            ),
            SearchError::OutputMismatch { expected, got } => write!(
                f,
                "oracle returned {got} outputs for a batch of {expected} states"
            ),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SearchError::Oracle(oracle_error) => Some(oracle_error),
            _ => None,
        }
    }
}

impl From<OracleError> for SearchError {
    fn from(e: OracleError) -> Self {
        SearchError::Oracle(e)
    }
}
