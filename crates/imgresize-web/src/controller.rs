#![forbid(unsafe_code)]

//! Overlay lifecycle controller.
//!
//! [`OverlayController`] owns the Inactive/Active state machine for one
//! image at a time. The host feeds it [`HostEvent`]s and toolbar actions in
//! delivery order; every call returns one [`OverlayDispatch`].
//!
//! # Lifecycle
//!
//! - `activate` takes scoped subscriptions for Escape, target mutations and
//!   viewport changes, then renders the overlay. Activating while already
//!   active first dismisses the previous activation.
//! - The outside pointer-down listener is armed by the first `Tick` after
//!   activation, so the pointer-down that caused activation never dismisses.
//! - A resize gesture holds document-wide move/up subscriptions until
//!   pointer-up, then commits once.
//! - Every transition to inactive releases every subscription and invokes
//!   the dismiss callback exactly once. A gesture still open at that point is
//!   committed first if the target is still attached.

use std::fmt;

use imgresize_core::style as style_rules;
use imgresize_core::{
    HostEvent, KeyCode, OverlayRect, Point, PointerButton, Size, StyleToken, Viewport, VisualTarget,
};
use imgresize_layout::{
    HandleId, OverlayFrame, OverlayHit, OverlayMetrics, OverlayMetricsError, ResizeSession,
    SizeLimits, render,
};
use serde::{Deserialize, Serialize};

use crate::dispatch::{CommitKind, DismissReason, IgnoredReason, OverlayDispatch, ToolbarAction};
use crate::listener::{ListenerKind, ListenerScope, SharedRegistry};
use crate::tracker::GeometryTracker;

/// Fixed controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub metrics: OverlayMetrics,
    #[serde(default)]
    pub limits: SizeLimits,
    /// Viewport at construction; updated by `ViewportResized` events.
    #[serde(default)]
    pub viewport: Viewport,
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), OverlayMetricsError> {
        self.metrics.validate()
    }
}

/// Host notifications.
pub struct OverlayCallbacks {
    on_dismiss: Box<dyn FnMut(DismissReason)>,
    on_mutate: Box<dyn FnMut(&CommitKind)>,
}

impl OverlayCallbacks {
    pub fn new(
        on_dismiss: impl FnMut(DismissReason) + 'static,
        on_mutate: impl FnMut(&CommitKind) + 'static,
    ) -> Self {
        Self {
            on_dismiss: Box::new(on_dismiss),
            on_mutate: Box::new(on_mutate),
        }
    }

    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_| {}, |_| {})
    }
}

impl Default for OverlayCallbacks {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for OverlayCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayCallbacks").finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Gesture {
    session: ResizeSession,
    last_size: Size,
    _listeners: ListenerScope,
}

impl Gesture {
    fn commit(&self) -> CommitKind {
        CommitKind::Resize {
            handle: self.session.handle,
            size: self.last_size,
        }
    }
}

#[derive(Debug)]
struct Activation<T> {
    target: T,
    tracker: GeometryTracker,
    frame: OverlayFrame,
    listeners: ListenerScope,
    gesture: Option<Gesture>,
}

/// Interactive resize/alignment overlay for one target at a time.
pub struct OverlayController<T: VisualTarget> {
    config: ControllerConfig,
    viewport: Viewport,
    registry: SharedRegistry,
    callbacks: OverlayCallbacks,
    active: Option<Activation<T>>,
}

impl<T: VisualTarget> OverlayController<T> {
    #[must_use]
    pub fn new(
        config: ControllerConfig,
        registry: SharedRegistry,
        callbacks: OverlayCallbacks,
    ) -> Self {
        Self {
            viewport: config.viewport,
            config,
            registry,
            callbacks,
            active: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.gesture.is_some())
    }

    /// Whether the outside pointer-down listener is armed.
    #[must_use]
    pub fn outside_click_armed(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.listeners.holds(ListenerKind::OutsidePointerDown))
    }

    /// Current overlay layout, if active.
    #[must_use]
    pub fn overlay(&self) -> Option<&OverlayFrame> {
        self.active.as_ref().map(|a| &a.frame)
    }

    #[must_use]
    pub fn target(&self) -> Option<&T> {
        self.active.as_ref().map(|a| &a.target)
    }

    /// Start editing `target`.
    pub fn activate(&mut self, target: T) -> OverlayDispatch {
        if self.active.is_some() {
            self.teardown(DismissReason::Replaced);
        }

        let mut tracker = GeometryTracker::new();
        let Some(rect) = tracker.refresh(&target) else {
            tracing::warn!(overlay_event = "activate_rejected", reason = "target_detached");
            return OverlayDispatch::ignored(IgnoredReason::TargetDetached);
        };
        let listeners = ListenerScope::acquire(self.registry.clone(), &ListenerKind::ACTIVATION);
        let frame = render(rect, self.viewport, &self.config.metrics);

        tracing::info!(
            overlay_event = "activated",
            top = rect.top,
            left = rect.left,
            width = rect.width,
            height = rect.height,
            toolbar = ?frame.toolbar.side,
        );
        self.active = Some(Activation {
            target,
            tracker,
            frame,
            listeners,
            gesture: None,
        });
        OverlayDispatch::Activated { rect }
    }

    /// Host-driven dismiss.
    pub fn deactivate(&mut self) -> OverlayDispatch {
        match self.teardown(DismissReason::Host) {
            Some(_) => OverlayDispatch::Dismissed {
                reason: DismissReason::Host,
            },
            None => OverlayDispatch::ignored(IgnoredReason::Inactive),
        }
    }

    /// Route one host event.
    pub fn handle_event(&mut self, event: HostEvent) -> OverlayDispatch {
        if let HostEvent::ViewportResized { viewport } = event {
            self.viewport = viewport;
        }
        let Some(activation) = self.active.as_ref() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        tracing::trace!(event = ?event, "overlay event");

        match event {
            HostEvent::PointerDown { position, button } => self.pointer_down(position, button),
            HostEvent::PointerMove { position } => self.continue_resize(position),
            HostEvent::PointerUp { .. } => self.end_resize(),
            HostEvent::Key {
                code: KeyCode::Escape,
            } => {
                if activation.listeners.holds(ListenerKind::EscapeKey) {
                    self.dismiss(DismissReason::EscapeKey)
                } else {
                    not_subscribed(ListenerKind::EscapeKey)
                }
            }
            HostEvent::Key { .. } => OverlayDispatch::ignored(IgnoredReason::UnhandledKey),
            HostEvent::Scroll | HostEvent::ViewportResized { .. } => {
                if activation.listeners.holds(ListenerKind::ViewportChange) {
                    self.refresh_dispatch()
                } else {
                    not_subscribed(ListenerKind::ViewportChange)
                }
            }
            HostEvent::TargetMutated { .. } => {
                if activation.listeners.holds(ListenerKind::TargetMutation) {
                    self.refresh_dispatch()
                } else {
                    not_subscribed(ListenerKind::TargetMutation)
                }
            }
            HostEvent::Tick => self.tick(),
        }
    }

    /// End of one host scheduling turn. Arms the outside-click listener.
    pub fn tick(&mut self) -> OverlayDispatch {
        let Some(activation) = self.active.as_mut() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        if activation.listeners.subscribe(ListenerKind::OutsidePointerDown) {
            tracing::debug!(overlay_event = "outside_click_armed");
            OverlayDispatch::OutsideClickArmed
        } else {
            OverlayDispatch::ignored(IgnoredReason::AlreadyArmed)
        }
    }

    /// Start a resize gesture on `handle` at `pointer`.
    pub fn begin_resize(&mut self, handle: HandleId, pointer: Point) -> OverlayDispatch {
        let Some(activation) = self.active.as_mut() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        if activation.gesture.is_some() {
            return OverlayDispatch::ignored(IgnoredReason::GestureInProgress);
        }
        let start = activation.target.size();
        let session = ResizeSession::begin(handle, pointer, start);
        let listeners = ListenerScope::acquire(self.registry.clone(), &ListenerKind::DRAG);
        activation.gesture = Some(Gesture {
            session,
            last_size: start,
            _listeners: listeners,
        });
        tracing::debug!(
            overlay_event = "resize_start",
            handle = %handle,
            width = start.width,
            height = start.height,
        );
        OverlayDispatch::ResizeStarted { handle, start }
    }

    /// Apply the size for the current pointer position.
    pub fn continue_resize(&mut self, pointer: Point) -> OverlayDispatch {
        let limits = self.config.limits;
        let Some(activation) = self.active.as_mut() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        let Some(gesture) = activation.gesture.as_mut() else {
            return OverlayDispatch::ignored(IgnoredReason::NoActiveGesture);
        };
        let handle = gesture.session.handle;
        let size = gesture.session.size_at(pointer, limits);
        gesture.last_size = size;
        activation.target.set_size(size);
        style_rules::clear_presets(&mut activation.target);
        tracing::trace!(
            overlay_event = "resize_move",
            handle = %handle,
            width = size.width,
            height = size.height,
        );

        match self.refresh() {
            Some(_) => OverlayDispatch::Resized { handle, size },
            None => OverlayDispatch::Dismissed {
                reason: DismissReason::TargetDetached,
            },
        }
    }

    /// Finish the gesture and commit once.
    pub fn end_resize(&mut self) -> OverlayDispatch {
        let Some(activation) = self.active.as_mut() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        let Some(gesture) = activation.gesture.take() else {
            return OverlayDispatch::ignored(IgnoredReason::NoActiveGesture);
        };
        let commit = gesture.commit();
        drop(gesture);

        if self.refresh().is_none() {
            return OverlayDispatch::Dismissed {
                reason: DismissReason::TargetDetached,
            };
        }
        tracing::info!(overlay_event = "resize_commit", commit = ?commit);
        (self.callbacks.on_mutate)(&commit);
        OverlayDispatch::Committed { commit }
    }

    /// Toggle a class token within its group.
    pub fn apply_class(&mut self, token: impl Into<StyleToken>) -> OverlayDispatch {
        let token = token.into();
        let Some(activation) = self.active.as_mut() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        let change = style_rules::apply_class(&mut activation.target, token);
        tracing::debug!(
            overlay_event = "class_toggled",
            class = token.class_name(),
            change = ?change,
        );
        self.after_mutation(CommitKind::Style { change })
    }

    /// Clear explicit sizing and every class token.
    pub fn reset_size(&mut self) -> OverlayDispatch {
        let Some(activation) = self.active.as_mut() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        style_rules::reset_size(&mut activation.target);
        tracing::debug!(overlay_event = "size_reset");
        self.after_mutation(CommitKind::Reset)
    }

    /// Detach the target, dismiss, then commit.
    pub fn remove_target(&mut self) -> OverlayDispatch {
        let Some(mut activation) = self.active.take() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        activation.gesture = None;
        activation.target.detach();
        drop(activation);

        tracing::info!(overlay_event = "dismissed", reason = %DismissReason::TargetRemoved);
        (self.callbacks.on_dismiss)(DismissReason::TargetRemoved);
        (self.callbacks.on_mutate)(&CommitKind::Removed);
        OverlayDispatch::Dismissed {
            reason: DismissReason::TargetRemoved,
        }
    }

    pub fn toolbar_action(&mut self, action: ToolbarAction) -> OverlayDispatch {
        match action {
            ToolbarAction::Align(class) => self.apply_class(class),
            ToolbarAction::Size(preset) => self.apply_class(preset),
            ToolbarAction::Reset => self.reset_size(),
            ToolbarAction::Delete => self.remove_target(),
        }
    }

    fn pointer_down(&mut self, position: Point, button: PointerButton) -> OverlayDispatch {
        let Some(activation) = self.active.as_ref() else {
            return OverlayDispatch::ignored(IgnoredReason::Inactive);
        };
        if activation.gesture.is_some() {
            return OverlayDispatch::ignored(IgnoredReason::GestureInProgress);
        }
        match activation.frame.hit_test(position) {
            OverlayHit::Handle(handle) if button == PointerButton::Primary => {
                self.begin_resize(handle, position)
            }
            OverlayHit::Handle(_) => OverlayDispatch::ignored(IgnoredReason::ButtonNotAllowed),
            OverlayHit::Toolbar | OverlayHit::Target => {
                OverlayDispatch::ignored(IgnoredReason::InsideOverlay)
            }
            OverlayHit::Outside => {
                if activation.listeners.holds(ListenerKind::OutsidePointerDown) {
                    self.dismiss(DismissReason::OutsideClick)
                } else {
                    OverlayDispatch::ignored(IgnoredReason::OutsideClickNotArmed)
                }
            }
        }
    }

    fn after_mutation(&mut self, commit: CommitKind) -> OverlayDispatch {
        (self.callbacks.on_mutate)(&commit);
        match self.refresh() {
            Some(_) => OverlayDispatch::Committed { commit },
            None => OverlayDispatch::Dismissed {
                reason: DismissReason::TargetDetached,
            },
        }
    }

    fn refresh_dispatch(&mut self) -> OverlayDispatch {
        match self.refresh() {
            Some(rect) => OverlayDispatch::Refreshed { rect },
            None => OverlayDispatch::Dismissed {
                reason: DismissReason::TargetDetached,
            },
        }
    }

    /// Re-read geometry and re-render. A detached target dismisses.
    fn refresh(&mut self) -> Option<OverlayRect> {
        let viewport = self.viewport;
        let metrics = self.config.metrics;
        let activation = self.active.as_mut()?;
        match activation.tracker.refresh(&activation.target) {
            Some(rect) => {
                activation.frame = render(rect, viewport, &metrics);
                Some(rect)
            }
            None => {
                tracing::warn!(overlay_event = "target_detached");
                self.teardown(DismissReason::TargetDetached);
                None
            }
        }
    }

    fn dismiss(&mut self, reason: DismissReason) -> OverlayDispatch {
        self.teardown(reason);
        OverlayDispatch::Dismissed { reason }
    }

    /// Return to inactive. Releases all subscriptions and notifies the host.
    fn teardown(&mut self, reason: DismissReason) -> Option<T> {
        let mut activation = self.active.take()?;
        if let Some(gesture) = activation.gesture.take() {
            let commit = gesture.commit();
            drop(gesture);
            if activation.target.is_attached() {
                tracing::info!(
                    overlay_event = "resize_commit",
                    commit = ?commit,
                    interrupted = true,
                );
                (self.callbacks.on_mutate)(&commit);
            }
        }
        let Activation {
            target, listeners, ..
        } = activation;
        drop(listeners);

        tracing::info!(overlay_event = "dismissed", reason = %reason);
        (self.callbacks.on_dismiss)(reason);
        Some(target)
    }
}

impl<T: VisualTarget> fmt::Debug for OverlayController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayController")
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("active", &self.active.is_some())
            .field("resizing", &self.is_resizing())
            .finish_non_exhaustive()
    }
}

fn not_subscribed(listener: ListenerKind) -> OverlayDispatch {
    OverlayDispatch::ignored(IgnoredReason::NotSubscribed { listener })
}
