//! Reentrancy guard.
//!
//! One flag per engine instance. Every mutating entry point enters the guard
//! before touching any state; a nested entry from inside a collaborator call
//! fails immediately with [`Error::Reentrancy`] and leaves nothing behind.

use std::cell::Cell;

use crate::error::{Error, Result};

/// Engine-wide non-reentrant lock
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Cell<bool>,
}

impl ReentrancyGuard {
    /// Create an unlocked guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the guard for the lifetime of the returned token
    pub fn enter(&self, operation: &'static str) -> Result<GuardToken<'_>> {
        if self.entered.replace(true) {
            tracing::warn!(operation, "reentrant call rejected");
            return Err(Error::Reentrancy);
        }
        Ok(GuardToken { guard: self })
    }

    /// Check if an operation is in progress
    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

/// Releases the guard on drop
#[must_use = "the guard is released as soon as the token is dropped"]
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.entered.set(false);
    }
}
