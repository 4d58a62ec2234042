//! Bounded undo stack of prior selections.
//!
//! Snapshots are pushed before a mutating interaction starts, so popping one
//! restores the exact pre-mutation window. Once the stack holds [`UNDO_DEPTH`]
//! entries the oldest one is discarded on each push.

use super::selection::Selection;
use crate::constants::UNDO_DEPTH;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<Selection>,
    max_entries: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(UNDO_DEPTH)
    }
}

impl UndoHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    pub fn push(&mut self, snapshot: Selection) {
        self.entries.push_back(snapshot);
        // Keep only the most recent snapshots
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<Selection> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
