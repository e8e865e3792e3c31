//! Undo/redo stacks of inverse command batches

use std::collections::VecDeque;

use super::command::Command;

/// A batch of commands applied together
pub type Batch = Vec<Command>;

#[derive(Debug, Clone, Default)]
pub struct History {
    undo: VecDeque<Batch>,
    redo: Vec<Batch>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Record the inverse of a new batch; anything undone is no longer redoable
    pub fn record(&mut self, inverse: Batch) {
        self.push_undo(inverse);
        self.redo.clear();
    }

    /// Push onto the undo stack, dropping the oldest batch over the limit
    pub fn push_undo(&mut self, batch: Batch) {
        if self.limit == 0 {
            return;
        }
        self.undo.push_back(batch);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    pub fn pop_undo(&mut self) -> Option<Batch> {
        self.undo.pop_back()
    }

    pub fn push_redo(&mut self, batch: Batch) {
        self.redo.push(batch);
    }

    pub fn pop_redo(&mut self) -> Option<Batch> {
        self.redo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::canvas::move_canvas;

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(2);
        history.record(vec![move_canvas(1.0, 0.0)]);
        history.record(vec![move_canvas(2.0, 0.0)]);
        history.record(vec![move_canvas(3.0, 0.0)]);
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.pop_undo(), Some(vec![move_canvas(3.0, 0.0)]));
        assert_eq!(history.pop_undo(), Some(vec![move_canvas(2.0, 0.0)]));
        assert_eq!(history.pop_undo(), None);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new(8);
        history.push_redo(vec![move_canvas(1.0, 0.0)]);
        assert!(history.can_redo());
        history.record(vec![move_canvas(2.0, 0.0)]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_zero_limit_records_nothing() {
        let mut history = History::new(0);
        history.record(vec![move_canvas(1.0, 0.0)]);
        assert!(!history.can_undo());
    }
}
