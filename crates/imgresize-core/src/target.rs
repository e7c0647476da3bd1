#![forbid(unsafe_code)]

//! Capability interface for the host-owned image element.
//!
//! The controller never creates or destroys the element; it is granted
//! temporary write access to explicit size and class tokens while active.
//! Hosts that render into a real document implement [`VisualTarget`] over
//! their node handle; tests use [`MemoryTarget`](crate::memory::MemoryTarget).
//!
//! External changes to the element (another writer touching its size or
//! classes) are reported back through
//! [`HostEvent::TargetMutated`](crate::event::HostEvent::TargetMutated).

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{OverlayRect, Size};

/// Minimal read/write surface the overlay needs from a live visual node.
pub trait VisualTarget {
    /// Rendered bounding box in viewport coordinates.
    ///
    /// `None` means the element is no longer attached to a document.
    fn bounding_box(&self) -> Option<OverlayRect>;

    /// Current rendered size in whole pixels.
    fn size(&self) -> Size;

    /// Explicit inline size, if one is set.
    fn explicit_size(&self) -> Option<Size>;

    /// Set explicit inline width/height.
    fn set_size(&mut self, size: Size);

    /// Remove explicit inline width/height.
    fn clear_size(&mut self);

    fn has_class(&self, class: &str) -> bool;

    fn add_class(&mut self, class: &str);

    fn remove_class(&mut self, class: &str);

    /// Remove the element from its parent. Terminal for the current activation.
    fn detach(&mut self);

    /// Whether the element is still part of a document.
    fn is_attached(&self) -> bool {
        self.bounding_box().is_some()
    }
}

/// Shared handle: the host keeps one clone, the controller borrows through another.
///
/// Hosts must not hold a borrow across a call into the controller.
impl<T: VisualTarget + ?Sized> VisualTarget for Rc<RefCell<T>> {
    fn bounding_box(&self) -> Option<OverlayRect> {
        self.borrow().bounding_box()
    }

    fn size(&self) -> Size {
        self.borrow().size()
    }

    fn explicit_size(&self) -> Option<Size> {
        self.borrow().explicit_size()
    }

    fn set_size(&mut self, size: Size) {
        self.borrow_mut().set_size(size);
    }

    fn clear_size(&mut self) {
        self.borrow_mut().clear_size();
    }

    fn has_class(&self, class: &str) -> bool {
        self.borrow().has_class(class)
    }

    fn add_class(&mut self, class: &str) {
        self.borrow_mut().add_class(class);
    }

    fn remove_class(&mut self, class: &str) {
        self.borrow_mut().remove_class(class);
    }

    fn detach(&mut self) {
        self.borrow_mut().detach();
    }

    fn is_attached(&self) -> bool {
        self.borrow().is_attached()
    }
}

impl<T: VisualTarget + ?Sized> VisualTarget for Box<T> {
    fn bounding_box(&self) -> Option<OverlayRect> {
        (**self).bounding_box()
    }

    fn size(&self) -> Size {
        (**self).size()
    }

    fn explicit_size(&self) -> Option<Size> {
        (**self).explicit_size()
    }

    fn set_size(&mut self, size: Size) {
        (**self).set_size(size);
    }

    fn clear_size(&mut self) {
        (**self).clear_size();
    }

    fn has_class(&self, class: &str) -> bool {
        (**self).has_class(class)
    }

    fn add_class(&mut self, class: &str) {
        (**self).add_class(class);
    }

    fn remove_class(&mut self, class: &str) {
        (**self).remove_class(class);
    }

    fn detach(&mut self) {
        (**self).detach();
    }

    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }
}
