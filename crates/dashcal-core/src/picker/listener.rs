//! Scoped document-level listeners.
//!
//! An open picker needs to hear pointer-downs and key presses anywhere in the
//! document so it can dismiss itself. [`ListenerHub`] is the host's registry of
//! those listeners; [`Subscription`] is the handle a picker holds while open.
//! Dropping the handle deregisters the listener, so closing, cancelling,
//! applying, and tearing the picker down all release it the same way.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::geometry::Point;

/// What a document-level listener hears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    PointerDown,
    KeyDown,
}

/// A document-level event forwarded to an open picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DismissEvent {
    PointerDown(Point),
    Escape,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    live: BTreeMap<u64, ListenerKind>,
}

/// Host-side registry of live listeners. Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct ListenerHub {
    registry: Rc<RefCell<Registry>>,
}

impl ListenerHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it stays live until the handle is dropped.
    pub fn subscribe(&self, kind: ListenerKind) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.live.insert(id, kind);
        tracing::trace!(id, ?kind, "listener subscribed");
        Subscription {
            registry: Rc::downgrade(&self.registry),
            id,
            kind,
        }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn active(&self) -> usize {
        self.registry.borrow().live.len()
    }

    #[must_use]
    pub fn active_of(&self, kind: ListenerKind) -> usize {
        self.registry
            .borrow()
            .live
            .values()
            .filter(|live| **live == kind)
            .count()
    }
}

/// A live listener registration.
#[derive(Debug)]
#[must_use = "dropping a Subscription deregisters the listener immediately"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
    kind: ListenerKind,
}

impl Subscription {
    #[must_use]
    pub const fn kind(&self) -> ListenerKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().live.remove(&self.id);
            tracing::trace!(id = self.id, kind = ?self.kind, "listener released");
        }
    }
}

/// The pointer-down and key-down pair an open picker holds.
#[derive(Debug)]
pub(crate) struct DismissGuard {
    _pointer: Subscription,
    _key: Subscription,
}

impl DismissGuard {
    pub(crate) fn acquire(hub: &ListenerHub) -> Self {
        Self {
            _pointer: hub.subscribe(ListenerKind::PointerDown),
            _key: hub.subscribe(ListenerKind::KeyDown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_releases_listener() {
        let hub = ListenerHub::new();
        let sub = hub.subscribe(ListenerKind::PointerDown);
        assert_eq!(hub.active(), 1);
        assert_eq!(sub.kind(), ListenerKind::PointerDown);
        drop(sub);
        assert_eq!(hub.active(), 0);
    }

    #[test]
    fn guard_holds_both_listeners() {
        let hub = ListenerHub::new();
        let guard = DismissGuard::acquire(&hub);
        assert_eq!(hub.active_of(ListenerKind::PointerDown), 1);
        assert_eq!(hub.active_of(ListenerKind::KeyDown), 1);
        drop(guard);
        assert_eq!(hub.active(), 0);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = ListenerHub::new();
        let sub = hub.subscribe(ListenerKind::KeyDown);
        drop(hub);
        drop(sub);
    }
}
