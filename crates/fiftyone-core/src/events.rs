//! # Observer Bus
//!
//! Typed event channel between the cart ledger and its listeners.
//!
//! ```text
//! ┌──────────────┐   emit(CartChanged)   ┌──────────────┐
//! │ Cart ledger  │ ────────────────────► │  EventBus    │
//! └──────────────┘                       │              │
//!                                        │  #1 counter  │──► listener 1
//!                                        │  #2 panel    │──► listener 2
//!                                        │  #3 toast    │──► listener 3
//!                                        └──────────────┘
//! ```
//!
//! Listeners are keyed by [`EventKind`] and run synchronously, in
//! registration order, on the emitting thread. There is no ordering
//! guarantee across different kinds.
//!
//! The listener list is copied out before any listener runs, so a listener
//! may subscribe or unsubscribe without deadlocking. Such changes apply from
//! the next emission on.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::CartLine;

/// The kinds of event a listener can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CartChanged,
    Error,
}

/// The cart as it stood right after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub total: Money,
}

/// An event with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    CartChanged(CartSnapshot),
    /// A user-facing error message.
    Error(String),
}

impl StoreEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            StoreEvent::CartChanged(_) => EventKind::CartChanged,
            StoreEvent::Error(_) => EventKind::Error,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

struct Registration {
    id: SubscriptionId,
    kind: EventKind,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
}

/// Synchronous, in-process publish/subscribe keyed by [`EventKind`].
#[derive(Default)]
pub struct EventBus {
    registry: Mutex<Registry>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    /// Registers `listener` for events of `kind`.
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let mut registry = self.registry();
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.registrations.push(Registration {
            id,
            kind,
            listener: Arc::new(listener),
        });
        id
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry();
        let before = registry.registrations.len();
        registry.registrations.retain(|r| r.id != id);
        registry.registrations.len() != before
    }

    /// Invokes every listener registered for the event's kind, in
    /// registration order. Returns how many listeners ran.
    pub fn emit(&self, event: &StoreEvent) -> usize {
        let kind = event.kind();
        let listeners: Vec<Listener> = self
            .registry()
            .registrations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| Arc::clone(&r.listener))
            .collect();

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry()
            .registrations
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    // A panicking listener runs outside the lock, so a poisoned registry is
    // still consistent.
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry();
        f.debug_struct("EventBus")
            .field("listeners", &registry.registrations.len())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
