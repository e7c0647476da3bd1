//! Drive a controller through a script and collect the outcome.

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;

use imgresize_core::{Point, Size, VisualTarget};
use imgresize_layout::{OverlayFrame, OverlayMetrics, SizeLimits};
use imgresize_web::{
    ControllerConfig, ListenerKind, MemoryRegistry, OverlayCallbacks, OverlayController,
    OverlayDispatch, SharedRegistry, Trace, TraceInput, TraceRecorder,
};
use serde::Serialize;

use crate::error::{ReplayError, Result};
use crate::script::{Script, ScriptStep};

/// Final state of the scripted image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSnapshot {
    pub attached: bool,
    pub size: Size,
    pub explicit_size: Option<Size>,
    pub classes: Vec<String>,
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub dispatches: Vec<OverlayDispatch>,
    /// Overlay layout after the last step, if still active.
    pub overlay: Option<OverlayFrame>,
    pub target: TargetSnapshot,
    pub dismiss_count: u32,
    pub mutate_count: u32,
    /// Subscriptions still live after the last step.
    pub live_listeners: usize,
    pub live_kinds: Vec<ListenerKind>,
    pub final_chain: Option<u64>,
    #[serde(skip)]
    pub trace: Trace,
}

/// Run `script` with the given overlay metrics.
pub fn replay(script: &Script, metrics: OverlayMetrics) -> Result<ReplayReport> {
    metrics.validate()?;
    let config = ControllerConfig {
        metrics,
        limits: SizeLimits::default(),
        viewport: script.viewport,
    };

    let registry = MemoryRegistry::shared();
    let shared: SharedRegistry = registry.clone();
    let dismissals = Rc::new(Cell::new(0u32));
    let mutations = Rc::new(Cell::new(0u32));
    let (on_dismiss, on_mutate) = (dismissals.clone(), mutations.clone());
    let callbacks = OverlayCallbacks::new(
        move |reason| {
            tracing::debug!(reason = %reason, "dismiss callback");
            on_dismiss.set(on_dismiss.get() + 1);
        },
        move |commit| {
            tracing::debug!(commit = ?commit, "mutate callback");
            on_mutate.set(on_mutate.get() + 1);
        },
    );

    let mut controller = OverlayController::new(config, shared, callbacks);
    let target = Rc::new(RefCell::new(script.target.build()));
    let mut recorder = TraceRecorder::new(script.viewport);
    let mut dispatches = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let (input, dispatch) = match *step {
            ScriptStep::Activate => (TraceInput::Activate, controller.activate(target.clone())),
            ScriptStep::Deactivate => (TraceInput::Deactivate, controller.deactivate()),
            ScriptStep::Event { event } => {
                (TraceInput::Event { event }, controller.handle_event(event))
            }
            ScriptStep::Toolbar { action } => {
                (TraceInput::Toolbar { action }, controller.toolbar_action(action))
            }
            ScriptStep::Detach => {
                target.borrow_mut().detach();
                tracing::debug!(step = index, "target detached externally");
                continue;
            }
            ScriptStep::Move { left, top } => {
                target.borrow_mut().set_origin(Point::new(left, top));
                continue;
            }
        };
        tracing::debug!(step = index, dispatch = ?dispatch, "replay step");
        recorder.record(input, dispatch)?;
        dispatches.push(dispatch);
    }

    let overlay = controller.overlay().copied();
    let snapshot = {
        let t = target.borrow();
        TargetSnapshot {
            attached: t.is_attached(),
            size: t.size(),
            explicit_size: t.explicit_size(),
            classes: t.classes().map(str::to_owned).collect(),
        }
    };
    let (live_listeners, live_kinds) = {
        let registry = registry.borrow();
        (registry.live_count(), registry.live_kinds())
    };
    let trace = recorder.finish();

    tracing::info!(
        replay_event = "complete",
        steps = dispatches.len(),
        dismissals = dismissals.get(),
        mutations = mutations.get(),
        live_listeners,
    );

    Ok(ReplayReport {
        dispatches,
        overlay,
        target: snapshot,
        dismiss_count: dismissals.get(),
        mutate_count: mutations.get(),
        live_listeners,
        live_kinds,
        final_chain: trace.final_chain(),
        trace,
    })
}

/// Replay `script` and require the header and every step to match
/// `expected`. A header mismatch reports step 0.
pub fn verify(script: &Script, metrics: OverlayMetrics, expected: &Trace) -> Result<ReplayReport> {
    let report = replay(script, metrics)?;
    let (want, got) = (expected.viewport(), report.trace.viewport());
    if want != got {
        return Err(ReplayError::TraceMismatch {
            step: 0,
            expected: serde_json::to_string(&want)?,
            actual: serde_json::to_string(&got)?,
        });
    }

    let mut recorded = expected.steps();
    for (index, actual) in report.trace.steps().enumerate() {
        let step = index as u64 + 1;
        match recorded.next() {
            Some(want) if want == actual => {}
            Some(want) => {
                return Err(ReplayError::TraceMismatch {
                    step,
                    expected: describe_step(want)?,
                    actual: describe_step(actual)?,
                });
            }
            None => {
                return Err(ReplayError::TraceMismatch {
                    step,
                    expected: "end of trace".to_string(),
                    actual: describe_step(actual)?,
                });
            }
        }
    }
    if let Some(want) = recorded.next() {
        return Err(ReplayError::TraceMismatch {
            step: report.trace.steps().count() as u64 + 1,
            expected: describe_step(want)?,
            actual: "end of script".to_string(),
        });
    }
    Ok(report)
}

fn describe_step((input, dispatch): (&TraceInput, &OverlayDispatch)) -> Result<String> {
    Ok(format!(
        "{} => {}",
        serde_json::to_string(input)?,
        serde_json::to_string(dispatch)?
    ))
}

/// Human-readable summary.
#[must_use]
pub fn render_text(report: &ReplayReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "steps: {}", report.dispatches.len());
    for (index, (input, dispatch)) in report.trace.steps().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}  {:<24} {}",
            index + 1,
            describe_input(input),
            describe(dispatch)
        );
    }
    let t = &report.target;
    let _ = writeln!(
        out,
        "target: {}x{} attached={} explicit={} classes=[{}]",
        t.size.width,
        t.size.height,
        t.attached,
        t.explicit_size
            .map_or_else(|| "none".to_string(), |s| format!("{}x{}", s.width, s.height)),
        t.classes.join(" "),
    );
    match &report.overlay {
        Some(frame) => {
            let bar = frame.toolbar.rect;
            let _ = writeln!(
                out,
                "overlay: target=({}, {}, {}x{}) toolbar=({}, {}) {:?}",
                frame.target.left,
                frame.target.top,
                frame.target.width,
                frame.target.height,
                bar.left,
                bar.top,
                frame.toolbar.side,
            );
        }
        None => {
            let _ = writeln!(out, "overlay: inactive");
        }
    }
    let _ = writeln!(
        out,
        "callbacks: dismiss={} mutate={} live_listeners={}",
        report.dismiss_count, report.mutate_count, report.live_listeners
    );
    if !report.live_kinds.is_empty() {
        let kinds: Vec<&str> = report.live_kinds.iter().map(|kind| kind.as_str()).collect();
        let _ = writeln!(out, "listeners: {}", kinds.join(" "));
    }
    if let Some(chain) = report.final_chain {
        let _ = writeln!(out, "chain: {chain:016x}");
    }
    out
}

fn describe_input(input: &TraceInput) -> String {
    match input {
        TraceInput::Activate => "activate".to_string(),
        TraceInput::Deactivate => "deactivate".to_string(),
        TraceInput::Event { event } => event.name().to_string(),
        TraceInput::Toolbar { action } => format!("toolbar \"{}\"", action.label()),
    }
}

fn describe(dispatch: &OverlayDispatch) -> String {
    match dispatch {
        OverlayDispatch::Activated { rect } => {
            format!("activated {}x{} at ({}, {})", rect.width, rect.height, rect.left, rect.top)
        }
        OverlayDispatch::Refreshed { rect } => {
            format!("refreshed {}x{} at ({}, {})", rect.width, rect.height, rect.left, rect.top)
        }
        OverlayDispatch::OutsideClickArmed => "outside click armed".to_string(),
        OverlayDispatch::ResizeStarted { handle, start } => {
            format!("resize {handle} from {}x{}", start.width, start.height)
        }
        OverlayDispatch::Resized { handle, size } => {
            format!("resize {handle} -> {}x{}", size.width, size.height)
        }
        OverlayDispatch::Committed { commit } => format!("commit {commit:?}"),
        OverlayDispatch::Dismissed { reason } => format!("dismissed ({reason})"),
        OverlayDispatch::Ignored { reason } => format!("ignored {reason:?}"),
    }
}
