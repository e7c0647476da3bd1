//! Random input sequences against the controller: listeners never leak,
//! style groups stay exclusive, and dismiss and resize-commit notifications
//! are exact.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use imgresize_core::style::{active_alignment, active_preset};
use imgresize_core::{
    AlignmentClass, HostEvent, KeyCode, MemoryTarget, Point, PointerButton, Size, SizePreset,
    StyleGroup, VisualTarget,
};
use imgresize_web::{
    CommitKind, ControllerConfig, MemoryRegistry, OverlayCallbacks, OverlayController,
    OverlayDispatch, SharedRegistry, ToolbarAction,
};
use proptest::prelude::*;

type Target = Rc<RefCell<MemoryTarget>>;

#[derive(Debug, Clone)]
enum Op {
    Activate(u32, u32),
    Tick,
    Down(f64, f64),
    Move(f64, f64),
    Up,
    Escape,
    Scroll,
    Toolbar(usize),
    Deactivate,
    DetachExternally,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (20u32..600, 20u32..600).prop_map(|(w, h)| Op::Activate(w, h)),
        Just(Op::Tick),
        (0.0f64..1000.0, 0.0f64..800.0).prop_map(|(x, y)| Op::Down(x, y)),
        (-200.0f64..1200.0, -200.0f64..1000.0).prop_map(|(x, y)| Op::Move(x, y)),
        Just(Op::Up),
        Just(Op::Escape),
        Just(Op::Scroll),
        (0usize..ToolbarAction::ALL.len()).prop_map(Op::Toolbar),
        Just(Op::Deactivate),
        Just(Op::DetachExternally),
    ]
}

fn assert_style_invariants(target: &Target) -> Result<(), TestCaseError> {
    let t = target.borrow();
    for group in [StyleGroup::Alignment, StyleGroup::Size] {
        let active = group.tokens().iter().filter(|tok| t.has_class(tok.class_name())).count();
        prop_assert!(active <= 1, "group {group:?} has {active} active tokens");
    }
    if active_preset(&*t).is_some() {
        prop_assert!(t.explicit_size().is_none());
    }
    Ok(())
}

proptest! {
    #[test]
    fn random_sessions_keep_invariants(ops in prop::collection::vec(op(), 1..80)) {
        let registry = MemoryRegistry::shared();
        let dismissed = Rc::new(Cell::new(0u32));
        let resize_commits = Rc::new(Cell::new(0u32));
        let counter = dismissed.clone();
        let commit_counter = resize_commits.clone();
        let callbacks = OverlayCallbacks::new(
            move |_| counter.set(counter.get() + 1),
            move |commit| {
                if matches!(commit, CommitKind::Resize { .. }) {
                    commit_counter.set(commit_counter.get() + 1);
                }
            },
        );
        let shared: SharedRegistry = registry.clone();
        let mut controller: OverlayController<Target> =
            OverlayController::new(ControllerConfig::default(), shared, callbacks);

        let mut targets: Vec<Target> = Vec::new();
        let mut expected_dismissals = 0u32;
        let mut expected_resize_commits = 0u32;

        for op in ops {
            let was_active = controller.is_active();
            let was_resizing = controller.is_resizing();
            let previous = targets.last().cloned();
            let dispatch = match op {
                Op::Activate(w, h) => {
                    let target = Rc::new(RefCell::new(
                        MemoryTarget::new(Size::new(w, h)).with_origin(Point::new(200.0, 150.0)),
                    ));
                    targets.push(target.clone());
                    if was_active {
                        expected_dismissals += 1;
                    }
                    controller.activate(target)
                }
                Op::Tick => controller.handle_event(HostEvent::Tick),
                Op::Down(x, y) => controller.handle_event(HostEvent::PointerDown {
                    position: Point::new(x, y),
                    button: PointerButton::Primary,
                }),
                Op::Move(x, y) => controller.handle_event(HostEvent::PointerMove {
                    position: Point::new(x, y),
                }),
                Op::Up => controller.handle_event(HostEvent::PointerUp {
                    position: Point::default(),
                    button: PointerButton::Primary,
                }),
                Op::Escape => controller.handle_event(HostEvent::Key { code: KeyCode::Escape }),
                Op::Scroll => controller.handle_event(HostEvent::Scroll),
                Op::Toolbar(i) => controller.toolbar_action(ToolbarAction::ALL[i]),
                Op::Deactivate => controller.deactivate(),
                Op::DetachExternally => {
                    if let Some(target) = targets.last() {
                        target.borrow_mut().detach();
                    }
                    continue;
                }
            };
            if matches!(dispatch, OverlayDispatch::Dismissed { .. }) {
                expected_dismissals += 1;
            }
            // A gesture commits once: on release, or when the overlay goes
            // away under it while the image is still in the document.
            let committed_resize = matches!(
                dispatch,
                OverlayDispatch::Committed { commit: CommitKind::Resize { .. } }
            );
            let interrupted = was_resizing
                && !controller.is_resizing()
                && !committed_resize
                && previous.as_ref().is_some_and(|t| t.borrow().is_attached());
            if committed_resize || interrupted {
                expected_resize_commits += 1;
            }

            let live = registry.borrow().live_count();
            if controller.is_active() {
                let expected = 3
                    + usize::from(controller.outside_click_armed())
                    + 2 * usize::from(controller.is_resizing());
                prop_assert_eq!(live, expected);
            } else {
                prop_assert_eq!(live, 0);
                prop_assert!(controller.overlay().is_none());
            }
            prop_assert_eq!(dismissed.get(), expected_dismissals);
            prop_assert_eq!(resize_commits.get(), expected_resize_commits);
            for target in &targets {
                assert_style_invariants(target)?;
            }
        }

        drop(controller);
        prop_assert_eq!(registry.borrow().live_count(), 0);
    }

    #[test]
    fn double_reset_is_idempotent(
        align in prop::sample::select(AlignmentClass::ALL.to_vec()),
        preset in prop::sample::select(SizePreset::ALL.to_vec()),
    ) {
        let registry: SharedRegistry = MemoryRegistry::shared();
        let mut controller: OverlayController<Target> =
            OverlayController::new(ControllerConfig::default(), registry, OverlayCallbacks::noop());
        let target = Rc::new(RefCell::new(MemoryTarget::new(Size::new(300, 200))));
        controller.activate(target.clone());
        controller.apply_class(align);
        controller.apply_class(preset);

        controller.reset_size();
        let once = target.borrow().clone();
        controller.reset_size();
        let t = target.borrow();
        prop_assert_eq!(t.explicit_size(), once.explicit_size());
        prop_assert_eq!(t.classes().count(), 0);
        prop_assert!(active_alignment(&*t).is_none());
        prop_assert!(active_preset(&*t).is_none());
    }
}
