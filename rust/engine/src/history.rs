use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Append-only, ordered log of the actions of one session.
///
/// Entries are never edited or removed. Operations that grow the log either
/// push in place or return a new log, so callers can keep the previous value
/// until a replay over the new one has succeeded.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// New log holding this log followed by `more`.
    pub fn appended(&self, more: &[Action]) -> ActionLog {
        let mut actions = Vec::with_capacity(self.actions.len() + more.len());
        actions.extend_from_slice(&self.actions);
        actions.extend_from_slice(more);
        Self { actions }
    }

    /// Entries from `index` on; empty when `index` is past the end.
    pub fn since(&self, index: usize) -> &[Action] {
        self.actions.get(index..).unwrap_or(&[])
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_vec(self) -> Vec<Action> {
        self.actions
    }
}

impl From<Vec<Action>> for ActionLog {
    fn from(actions: Vec<Action>) -> Self {
        Self::from_actions(actions)
    }
}
