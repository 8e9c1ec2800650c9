//! Ordered handler registry with copy-on-write snapshots.
//!
//! Readers clone the current `Arc<Vec<Entry>>` and iterate it without holding the lock;
//! writers build a new vector and swap it in. An in-flight dispatch therefore never observes
//! a register/unregister that happens after it started.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use nonobot_core::ChatHandler;
use parking_lot::RwLock;

/// Token returned by `register`, used to unregister or reorder the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerHandle(u64);

impl fmt::Display for HandlerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) handle: HandlerHandle,
    pub(crate) handler: Arc<dyn ChatHandler>,
}

pub(crate) type Snapshot = Arc<Vec<Entry>>;

/// Outcome of an insertion attempt.
pub(crate) enum Insert {
    Added(HandlerHandle),
    Existing(HandlerHandle),
}

pub(crate) struct Registry {
    entries: RwLock<Snapshot>,
    next_handle: AtomicU64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::new())),
            next_handle: AtomicU64::new(1),
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        self.entries.read().clone()
    }

    /// Appends unless a handler with the same id is present.
    pub(crate) fn insert(&self, handler: Arc<dyn ChatHandler>) -> Insert {
        let mut guard = self.entries.write();
        if let Some(existing) = guard.iter().find(|e| e.handler.id() == handler.id()) {
            return Insert::Existing(existing.handle);
        }
        let handle = HandlerHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(Entry { handle, handler });
        *guard = Arc::new(next);
        Insert::Added(handle)
    }

    pub(crate) fn remove(&self, handle: HandlerHandle) -> Option<Arc<dyn ChatHandler>> {
        let mut guard = self.entries.write();
        let position = guard.iter().position(|e| e.handle == handle)?;
        let mut next: Vec<Entry> = guard.iter().cloned().collect();
        let removed = next.remove(position);
        *guard = Arc::new(next);
        Some(removed.handler)
    }

    /// Moves the handler to `index` (clamped to the end). Returns false if the handle is unknown.
    pub(crate) fn move_to(&self, handle: HandlerHandle, index: usize) -> bool {
        let mut guard = self.entries.write();
        let Some(position) = guard.iter().position(|e| e.handle == handle) else {
            return false;
        };
        let mut next: Vec<Entry> = guard.iter().cloned().collect();
        let entry = next.remove(position);
        let index = index.min(next.len());
        next.insert(index, entry);
        *guard = Arc::new(next);
        true
    }
}

/// Id and help text of a registered handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescription {
    pub id: String,
    pub description: Option<String>,
}

pub(crate) fn describe(snapshot: &[Entry]) -> Vec<HandlerDescription> {
    snapshot
        .iter()
        .map(|e| HandlerDescription {
            id: e.handler.id().to_string(),
            description: e.handler.description(),
        })
        .collect()
}

/// Non-owning, read-only view of a router's registry. Handlers that need to inspect their
/// siblings (help) hold this instead of the router, so no reference cycle is formed.
#[derive(Clone)]
pub struct RegistryView {
    registry: Weak<Registry>,
}

impl RegistryView {
    pub(crate) fn new(registry: &Arc<Registry>) -> Self {
        Self {
            registry: Arc::downgrade(registry),
        }
    }

    /// A view that is not attached to any router; `descriptions` always returns `None`.
    pub fn detached() -> Self {
        Self {
            registry: Weak::new(),
        }
    }

    /// Descriptions of the currently registered handlers, in order. `None` once the router is gone.
    pub fn descriptions(&self) -> Option<Vec<HandlerDescription>> {
        let registry = self.registry.upgrade()?;
        let snapshot = registry.snapshot();
        Some(describe(&snapshot))
    }
}

impl fmt::Debug for RegistryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryView")
            .field("attached", &(self.registry.strong_count() > 0))
            .finish()
    }
}
