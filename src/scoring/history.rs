use std::collections::VecDeque;

/// Number of pre-delivery snapshots kept for undo.
pub const UNDO_DEPTH: usize = 2;

/// Bounded stack of snapshots; the oldest is dropped once full.
#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: VecDeque<T>,
    depth: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_depth(UNDO_DEPTH)
    }
}

impl<T> History<T> {
    pub fn with_depth(depth: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(depth),
            depth: depth.max(1),
        }
    }

    pub fn push(&mut self, snapshot: T) {
        if self.snapshots.len() == self.depth {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn peek(&self) -> Option<&T> {
        self.snapshots.back()
    }

    pub fn pop(&mut self) -> Option<T> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_snapshots() {
        let mut history = History::default();
        for n in 1..=4 {
            history.push(n);
        }
        assert_eq!(history.len(), UNDO_DEPTH);
        assert_eq!(history.pop(), Some(4));
        assert_eq!(history.pop(), Some(3));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut history = History::with_depth(3);
        history.push("a");
        assert_eq!(history.peek(), Some(&"a"));
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.is_empty());
    }
}
