#![forbid(unsafe_code)]

//! Bounded snapshot undo history.
//!
//! [`UndoHistory`] holds whole-document snapshots taken *before* each
//! applied mutation. Undo is linear: popping restores the previous
//! document and the popped state is discarded (there is no redo).
//!
//! # Invariants
//!
//! 1. `stack.len() <= config.max_depth` after any operation.
//! 2. The oldest snapshot is evicted first when the limit is exceeded.
//! 3. Only applied, document-affecting mutations push; camera, viewport,
//!    tool, and bare selection changes never enter the stack.

use std::collections::VecDeque;
use std::fmt;

use gridplan_core::document::Document;

/// Configuration for the undo history.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of snapshots retained. Oldest snapshots are evicted
    /// when the limit is exceeded.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_depth: 50 }
    }
}

impl HistoryConfig {
    /// Create a configuration with the given depth limit.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

/// Linear undo stack of pre-mutation document snapshots.
pub struct UndoHistory {
    /// Snapshots available for undo; most recent at the back.
    stack: VecDeque<Document>,
    config: HistoryConfig,
}

impl fmt::Debug for UndoHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoHistory")
            .field("depth", &self.stack.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl UndoHistory {
    /// Create a history with the given configuration.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            stack: VecDeque::new(),
            config,
        }
    }

    /// Push a pre-mutation snapshot, evicting the oldest if over the limit.
    pub fn push(&mut self, snapshot: Document) {
        self.stack.push_back(snapshot);
        while self.stack.len() > self.config.max_depth {
            self.stack.pop_front();
        }
    }

    /// Pop the most recent snapshot, if any.
    pub fn undo(&mut self) -> Option<Document> {
        self.stack.pop_back()
    }

    /// Check whether undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of snapshots on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Discard all snapshots. Used when opening a layout or starting a new
    /// document.
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplan_core::document::ComponentType;
    use gridplan_core::geometry::{Cell, Grid};

    fn doc_with_components(n: i32) -> Document {
        let mut doc = Document::new(Grid::new(100, 1));
        for x in 0..n {
            doc.place_component(Cell::new(x, 0), ComponentType::Light);
        }
        doc
    }

    #[test]
    fn new_history_is_empty() {
        let history = UndoHistory::default();
        assert!(!history.can_undo());
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn push_then_undo_restores_in_reverse_order() {
        let mut history = UndoHistory::default();
        history.push(doc_with_components(1));
        history.push(doc_with_components(2));

        assert_eq!(history.undo().unwrap().components.len(), 2);
        assert_eq!(history.undo().unwrap().components.len(), 1);
        assert!(history.undo().is_none());
    }

    #[test]
    fn depth_limit_evicts_oldest() {
        let mut history = UndoHistory::new(HistoryConfig::new(3));
        for n in 1..=5 {
            history.push(doc_with_components(n));
        }

        assert_eq!(history.depth(), 3);
        // 1 and 2 were evicted; undo bottoms out at 3.
        assert_eq!(history.undo().unwrap().components.len(), 5);
        assert_eq!(history.undo().unwrap().components.len(), 4);
        assert_eq!(history.undo().unwrap().components.len(), 3);
        assert!(history.undo().is_none());
    }

    #[test]
    fn default_capacity_is_fifty() {
        let mut history = UndoHistory::default();
        assert_eq!(history.config().max_depth, 50);
        for n in 0..60 {
            history.push(doc_with_components(n));
        }
        assert_eq!(history.depth(), 50);
    }

    #[test]
    fn clear_removes_all() {
        let mut history = UndoHistory::default();
        history.push(doc_with_components(1));
        history.push(doc_with_components(2));

        history.clear();
        assert!(!history.can_undo());
        assert_eq!(history.depth(), 0);
    }
}
