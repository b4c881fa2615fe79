//! # Notifier
//!
//! Turns bus events into transient notifications for the presentation layer.
//!
//! ```text
//!  CartLedger ──emit──► EventBus ──► Notifier ──drain()──► view
//!                        │
//!                        ├── CartChanged (non-empty) → "Cart updated (N items)"
//!                        └── Error(message)          → message
//! ```
//!
//! Checkout progress ("Processing order...") is pushed directly by the
//! session driver.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use fiftyone_core::{EventBus, EventKind, StoreEvent, SubscriptionId};

/// How a notification is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Collects notifications until the view drains them.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    pending: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Notifier::default()
    }

    /// Subscribes to cart changes and errors on `bus`.
    pub fn attach(&self, bus: &EventBus) -> [SubscriptionId; 2] {
        let pending = Arc::clone(&self.pending);
        let cart = bus.subscribe(EventKind::CartChanged, move |event| {
            if let StoreEvent::CartChanged(snapshot) = event {
                if !snapshot.lines.is_empty() {
                    push_to(
                        &pending,
                        NotificationLevel::Success,
                        format!("Cart updated ({} items)", snapshot.item_count),
                    );
                }
            }
        });

        let pending = Arc::clone(&self.pending);
        let errors = bus.subscribe(EventKind::Error, move |event| {
            if let StoreEvent::Error(message) = event {
                push_to(&pending, NotificationLevel::Error, message.clone());
            }
        });

        [cart, errors]
    }

    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) {
        push_to(&self.pending, level, message.into());
    }

    /// Takes every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock().expect("Notifier mutex poisoned"))
    }
}

fn push_to(pending: &Mutex<Vec<Notification>>, level: NotificationLevel, message: String) {
    pending
        .lock()
        .expect("Notifier mutex poisoned")
        .push(Notification { level, message });
}
