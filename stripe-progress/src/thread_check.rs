//! Render-thread ownership.
//!
//! Widget state belongs to the thread that created it. Mutating it from any
//! other thread is a programmer error and panics immediately.

use std::thread::{self, ThreadId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderThread {
    owner: ThreadId,
}

impl RenderThread {
    /// Bind to the calling thread.
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panics with `message` unless called on the owning thread.
    #[track_caller]
    pub fn assert_current(&self, message: &str) {
        if !self.is_current() {
            let caller = thread::current();
            tracing::error!(thread = ?caller.name(), "{message}");
            panic!("{message} (called from thread {:?})", caller.name().unwrap_or("<unnamed>"));
        }
    }
}
