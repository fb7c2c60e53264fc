use std::{fmt::Display, num::NonZeroU32};

use cube::Cube;
use rustc_hash::FxHashMap;

/// Stable identity of a registered state.
///
/// Handles start at 1; "no handle" is `Option::<Handle>::None`, which has the
/// same size as the handle itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(NonZeroU32);

impl Handle {
    fn from_position(position: usize) -> Self {
        let raw = u32::try_from(position + 1).expect("more states than handles");
        Handle(NonZeroU32::new(raw).expect("position + 1 is never zero"))
    }

    /// Zero-based slot of this handle in dense storage.
    pub fn position(self) -> usize {
        self.0.get() as usize - 1
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bijection between cube states and handles.
///
/// Grows monotonically during a search, nothing is ever removed.
#[derive(Clone, Debug, Default)]
pub struct StateIndex {
    handles: FxHashMap<Cube, Handle>,
    states: Vec<Cube>,
}

impl StateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle of `state` and whether it was newly allocated.
    pub fn register(&mut self, state: Cube) -> (Handle, bool) {
        if let Some(&handle) = self.handles.get(&state) {
            return (handle, false);
        }
        let handle = Handle::from_position(self.states.len());
        self.states.push(state);
        self.handles.insert(state, handle);
        (handle, true)
    }

    /// Panics if the handle was not issued by this index.
    pub fn lookup(&self, handle: Handle) -> &Cube {
        &self.states[handle.position()]
    }

    pub fn get(&self, state: &Cube) -> Option<Handle> {
        self.handles.get(state).copied()
    }

    pub fn contains(&self, state: &Cube) -> bool {
        self.handles.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
        self.states.clear();
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> {
        (0..self.states.len()).map(Handle::from_position)
    }
}
