#![forbid(unsafe_code)]

//! Scoped global listener subscriptions.
//!
//! While the overlay is active the controller listens to document-wide
//! signals (outside pointer-downs, Escape, target mutations, viewport
//! changes). A resize gesture additionally listens to pointer moves and
//! releases anywhere in the document. Every subscription is owned by a
//! [`ListenerScope`]; dropping the scope unsubscribes everything it holds,
//! so no teardown path can leak a listener.
//!
//! Hosts implement [`ListenerRegistry`] over their real event plumbing and
//! forward matching signals to the controller as
//! [`HostEvent`](imgresize_core::HostEvent)s.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Global signal the controller can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    OutsidePointerDown,
    EscapeKey,
    TargetMutation,
    ViewportChange,
    DragPointerMove,
    DragPointerUp,
}

impl ListenerKind {
    /// Subscriptions taken immediately on activation.
    ///
    /// The outside pointer-down listener is armed one tick later so the
    /// click that activated the overlay cannot dismiss it.
    pub const ACTIVATION: [Self; 3] = [Self::EscapeKey, Self::TargetMutation, Self::ViewportChange];

    /// Subscriptions held for the duration of a resize gesture.
    pub const DRAG: [Self; 2] = [Self::DragPointerMove, Self::DragPointerUp];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutsidePointerDown => "outside_pointer_down",
            Self::EscapeKey => "escape_key",
            Self::TargetMutation => "target_mutation",
            Self::ViewportChange => "viewport_change",
            Self::DragPointerMove => "drag_pointer_move",
            Self::DragPointerUp => "drag_pointer_up",
        }
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle for one live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Host-side subscription plumbing.
pub trait ListenerRegistry {
    fn subscribe(&mut self, kind: ListenerKind) -> ListenerId;

    /// Unsubscribing an unknown id is a no-op.
    fn unsubscribe(&mut self, id: ListenerId);
}

/// Registry handle shared between the host and the controller's scopes.
pub type SharedRegistry = Rc<RefCell<dyn ListenerRegistry>>;

/// In-memory registry that tracks live subscriptions.
///
/// Used by tests and the replay tool to verify that activations never leak.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    next_id: u64,
    live: BTreeMap<ListenerId, ListenerKind>,
    subscribed_total: u64,
    unsubscribed_total: u64,
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh registry for sharing with a controller.
    #[must_use]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_live(&self, kind: ListenerKind) -> bool {
        self.live.values().any(|k| *k == kind)
    }

    /// Live subscriptions in subscription order.
    #[must_use]
    pub fn live_kinds(&self) -> Vec<ListenerKind> {
        self.live.values().copied().collect()
    }

    #[must_use]
    pub fn subscribed_total(&self) -> u64 {
        self.subscribed_total
    }

    #[must_use]
    pub fn unsubscribed_total(&self) -> u64 {
        self.unsubscribed_total
    }
}

impl ListenerRegistry for MemoryRegistry {
    fn subscribe(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId::new(self.next_id);
        self.live.insert(id, kind);
        self.subscribed_total += 1;
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        if self.live.remove(&id).is_some() {
            self.unsubscribed_total += 1;
        }
    }
}

/// RAII owner of a set of subscriptions.
///
/// Each subscription is recorded as soon as it is taken, so a scope that is
/// dropped halfway through being filled still releases what it holds.
pub struct ListenerScope {
    registry: SharedRegistry,
    held: Vec<(ListenerKind, ListenerId)>,
}

impl ListenerScope {
    /// Empty scope bound to `registry`.
    #[must_use]
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            held: Vec::new(),
        }
    }

    /// Scope holding every kind in `kinds`.
    #[must_use]
    pub fn acquire(registry: SharedRegistry, kinds: &[ListenerKind]) -> Self {
        let mut scope = Self::new(registry);
        for kind in kinds {
            scope.subscribe(*kind);
        }
        scope
    }

    /// Subscribe to `kind` unless already held. Returns `false` if it was held.
    pub fn subscribe(&mut self, kind: ListenerKind) -> bool {
        if self.holds(kind) {
            return false;
        }
        let id = self.registry.borrow_mut().subscribe(kind);
        tracing::trace!(kind = %kind, id = id.get(), "listener subscribed");
        self.held.push((kind, id));
        true
    }

    #[must_use]
    pub fn holds(&self, kind: ListenerKind) -> bool {
        self.held.iter().any(|(k, _)| *k == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Unsubscribe everything now. Dropping the scope does the same.
    pub fn release(&mut self) {
        if self.held.is_empty() {
            return;
        }
        let mut registry = self.registry.borrow_mut();
        for (kind, id) in self.held.drain(..).rev() {
            registry.unsubscribe(id);
            tracing::trace!(kind = %kind, id = id.get(), "listener released");
        }
    }
}

impl fmt::Debug for ListenerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerScope")
            .field("held", &self.held)
            .finish_non_exhaustive()
    }
}

impl Drop for ListenerScope {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> (Rc<RefCell<MemoryRegistry>>, SharedRegistry) {
        let registry = MemoryRegistry::shared();
        let dyn_registry: SharedRegistry = registry.clone();
        (registry, dyn_registry)
    }

    #[test]
    fn drop_releases_everything() {
        let (registry, handle) = shared();
        {
            let scope = ListenerScope::acquire(handle, &ListenerKind::ACTIVATION);
            assert_eq!(scope.len(), 3);
            assert_eq!(registry.borrow().live_count(), 3);
        }
        assert_eq!(registry.borrow().live_count(), 0);
        assert_eq!(registry.borrow().unsubscribed_total(), 3);
    }

    #[test]
    fn duplicate_subscribe_is_rejected() {
        let (registry, handle) = shared();
        let mut scope = ListenerScope::new(handle);
        assert!(scope.subscribe(ListenerKind::OutsidePointerDown));
        assert!(!scope.subscribe(ListenerKind::OutsidePointerDown));
        assert_eq!(registry.borrow().live_count(), 1);
    }

    #[test]
    fn explicit_release_then_drop_is_single_unsubscribe() {
        let (registry, handle) = shared();
        let mut scope = ListenerScope::acquire(handle, &ListenerKind::DRAG);
        scope.release();
        assert!(scope.is_empty());
        drop(scope);
        assert_eq!(registry.borrow().unsubscribed_total(), 2);
    }

    #[test]
    fn unknown_id_unsubscribe_is_noop() {
        let mut registry = MemoryRegistry::new();
        registry.unsubscribe(ListenerId::new(42));
        assert_eq!(registry.unsubscribed_total(), 0);
    }

    #[test]
    fn nested_scopes_release_independently() {
        let (registry, handle) = shared();
        let outer = ListenerScope::acquire(handle.clone(), &ListenerKind::ACTIVATION);
        let drag = ListenerScope::acquire(handle, &ListenerKind::DRAG);
        assert_eq!(registry.borrow().live_count(), 5);
        drop(drag);
        assert!(!registry.borrow().is_live(ListenerKind::DragPointerMove));
        assert!(registry.borrow().is_live(ListenerKind::EscapeKey));
        drop(outer);
        assert_eq!(registry.borrow().live_count(), 0);
    }
}
