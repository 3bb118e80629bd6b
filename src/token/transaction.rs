//! Host transaction contract.
//!
//! Every engine operation is all-or-nothing. Collaborators that hold state
//! the engine mutates (token balances, stablecoin supply) take part in that
//! guarantee by implementing [`Transactional`]: the engine opens a checkpoint
//! before an operation and either commits or rolls back to it afterwards.

use std::cell::{Ref, RefCell, RefMut};

/// Participant in the engine's all-or-nothing operations
pub trait Transactional {
    /// Open a checkpoint. Checkpoints nest.
    fn begin(&self);

    /// Discard the innermost checkpoint, keeping current state
    fn commit(&self);

    /// Restore the state captured by the innermost checkpoint
    fn rollback(&self);
}

/// Snapshot stack around a piece of cloneable state.
///
/// Gives in-memory collaborators their [`Transactional`] behaviour: `begin`
/// pushes a copy of the state, `rollback` pops it back in place.
#[derive(Debug, Default)]
pub struct Journal<T: Clone> {
    current: RefCell<T>,
    checkpoints: RefCell<Vec<T>>,
}

impl<T: Clone> Journal<T> {
    /// Wrap initial state
    pub fn new(state: T) -> Self {
        Self {
            current: RefCell::new(state),
            checkpoints: RefCell::new(Vec::new()),
        }
    }

    /// Borrow the current state
    pub fn read(&self) -> Ref<'_, T> {
        self.current.borrow()
    }

    /// Mutably borrow the current state
    pub fn write(&self) -> RefMut<'_, T> {
        self.current.borrow_mut()
    }

    /// Number of open checkpoints
    pub fn depth(&self) -> usize {
        self.checkpoints.borrow().len()
    }
}

impl<T: Clone> Transactional for Journal<T> {
    fn begin(&self) {
        let snapshot = self.current.borrow().clone();
        self.checkpoints.borrow_mut().push(snapshot);
    }

    fn commit(&self) {
        if self.checkpoints.borrow_mut().pop().is_none() {
            tracing::warn!("commit without an open checkpoint");
        }
    }

    fn rollback(&self) {
        let snapshot = self.checkpoints.borrow_mut().pop();
        match snapshot {
            Some(snapshot) => *self.current.borrow_mut() = snapshot,
            None => tracing::warn!("rollback without an open checkpoint"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_restores() {
        let journal = Journal::new(vec![1, 2]);
        journal.begin();
        journal.write().push(3);
        assert_eq!(journal.read().len(), 3);

        journal.rollback();
        assert_eq!(*journal.read(), vec![1, 2]);
        assert_eq!(journal.depth(), 0);
    }

    #[test]
    fn test_commit_keeps_changes() {
        let journal = Journal::new(0u32);
        journal.begin();
        *journal.write() = 7;
        journal.commit();
        assert_eq!(*journal.read(), 7);
    }

    #[test]
    fn test_nested_checkpoints() {
        let journal = Journal::new(0u32);
        journal.begin();
        *journal.write() = 1;
        journal.begin();
        *journal.write() = 2;
        journal.rollback();
        assert_eq!(*journal.read(), 1);
        journal.commit();
        assert_eq!(*journal.read(), 1);
        assert_eq!(journal.depth(), 0);
    }
}
