//! Thread-safe handle for sessions driven by more than one caller.

use std::sync::Arc;

use parking_lot::Mutex;

use marble_lab_core::{Command, Event};

use crate::{apply, query, EditSession, SessionSnapshot};

/// Cloneable handle that serialises every command against one session.
///
/// Painting, brush selection and the begin/complete halves of a transfer all
/// read and then write the same state, so each command runs under a single
/// lock. Slow file I/O must happen between the begin and complete commands,
/// outside the lock.
#[derive(Clone, Debug, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<EditSession>>,
}

impl SharedSession {
    /// Wraps a session so it can be shared between threads.
    #[must_use]
    pub fn new(session: EditSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Applies a single command and returns the events it produced.
    pub fn apply(&self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut *self.inner.lock(), command, &mut events);
        events
    }

    /// Applies a batch of commands atomically with respect to other callers.
    pub fn apply_all(&self, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
        let mut events = Vec::new();
        let mut session = self.inner.lock();
        for command in commands {
            apply(&mut session, command, &mut events);
        }
        events
    }

    /// Captures the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        query::snapshot(&*self.inner.lock())
    }

    /// Runs a read-only closure against the session.
    pub fn read<R>(&self, f: impl FnOnce(&EditSession) -> R) -> R {
        f(&*self.inner.lock())
    }
}
