#![forbid(unsafe_code)]

//! Deterministic interaction traces.
//!
//! [`TraceRecorder`] captures every controller input together with the
//! dispatch it produced, as JSON Lines:
//!
//! - **Header**: schema version and starting viewport (always first).
//! - **Step**: one controller input, its dispatch, and a running checksum.
//! - **Summary**: step/commit/dismiss totals and the final checksum.
//!
//! The checksum chains FNV-1a over each serialized dispatch, so two runs of
//! the same inputs against the same target produce identical chains.

use imgresize_core::{HostEvent, Viewport};
use serde::{Deserialize, Serialize};

use crate::dispatch::{OverlayDispatch, ToolbarAction};

/// Schema version written in every trace header.
pub const TRACE_SCHEMA: &str = "imgresize-trace-v1";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fnv1a64(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// One controller entry point invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum TraceInput {
    Activate,
    Deactivate,
    Event { event: HostEvent },
    Toolbar { action: ToolbarAction },
}

/// One line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceLine {
    Header {
        schema: String,
        viewport: Viewport,
    },
    Step {
        seq: u64,
        input: TraceInput,
        dispatch: OverlayDispatch,
        chain: u64,
    },
    Summary {
        steps: u64,
        commits: u64,
        dismissals: u64,
        final_chain: u64,
    },
}

/// A finished trace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trace {
    pub lines: Vec<TraceLine>,
}

impl Trace {
    /// Serialize as JSON Lines, one record per line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&serde_json::to_string(line)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse JSON Lines. Blank lines are skipped.
    pub fn from_jsonl(text: &str) -> Result<Self, serde_json::Error> {
        let lines = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<Vec<TraceLine>, _>>()?;
        Ok(Self { lines })
    }

    /// Viewport from the header record.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.lines.iter().find_map(|line| match line {
            TraceLine::Header { viewport, .. } => Some(*viewport),
            _ => None,
        })
    }

    /// Step records in order.
    pub fn steps(&self) -> impl Iterator<Item = (&TraceInput, &OverlayDispatch)> {
        self.lines.iter().filter_map(|line| match line {
            TraceLine::Step {
                input, dispatch, ..
            } => Some((input, dispatch)),
            _ => None,
        })
    }

    #[must_use]
    pub fn final_chain(&self) -> Option<u64> {
        self.lines.iter().rev().find_map(|line| match line {
            TraceLine::Summary { final_chain, .. } => Some(*final_chain),
            _ => None,
        })
    }
}

/// Incremental trace builder.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    lines: Vec<TraceLine>,
    chain: u64,
    steps: u64,
    commits: u64,
    dismissals: u64,
}

impl TraceRecorder {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            lines: vec![TraceLine::Header {
                schema: TRACE_SCHEMA.to_owned(),
                viewport,
            }],
            chain: FNV_OFFSET_BASIS,
            steps: 0,
            commits: 0,
            dismissals: 0,
        }
    }

    /// Append one step.
    pub fn record(
        &mut self,
        input: TraceInput,
        dispatch: OverlayDispatch,
    ) -> Result<(), serde_json::Error> {
        let bytes = serde_json::to_vec(&dispatch)?;
        self.chain = fnv1a64(self.chain, &bytes);
        self.steps += 1;
        match dispatch {
            OverlayDispatch::Committed { .. } => self.commits += 1,
            OverlayDispatch::Dismissed { .. } => self.dismissals += 1,
            _ => {}
        }
        self.lines.push(TraceLine::Step {
            seq: self.steps,
            input,
            dispatch,
            chain: self.chain,
        });
        Ok(())
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn chain(&self) -> u64 {
        self.chain
    }

    /// Close the trace with a summary record.
    #[must_use]
    pub fn finish(mut self) -> Trace {
        self.lines.push(TraceLine::Summary {
            steps: self.steps,
            commits: self.commits,
            dismissals: self.dismissals,
            final_chain: self.chain,
        });
        Trace { lines: self.lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DismissReason, IgnoredReason};
    use imgresize_core::KeyCode;

    fn sample() -> Trace {
        let mut recorder = TraceRecorder::new(Viewport::default());
        recorder
            .record(
                TraceInput::Event {
                    event: HostEvent::Tick,
                },
                OverlayDispatch::OutsideClickArmed,
            )
            .unwrap();
        recorder
            .record(
                TraceInput::Event {
                    event: HostEvent::Key { code: KeyCode::Escape },
                },
                OverlayDispatch::Dismissed {
                    reason: DismissReason::EscapeKey,
                },
            )
            .unwrap();
        recorder
            .record(TraceInput::Deactivate, OverlayDispatch::ignored(IgnoredReason::Inactive))
            .unwrap();
        recorder.finish()
    }

    #[test]
    fn header_first_summary_last() {
        let trace = sample();
        assert!(matches!(trace.lines.first(), Some(TraceLine::Header { .. })));
        match trace.lines.last() {
            Some(TraceLine::Summary {
                steps,
                commits,
                dismissals,
                ..
            }) => assert_eq!((*steps, *commits, *dismissals), (3, 0, 1)),
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn header_carries_viewport() {
        let trace = TraceRecorder::new(Viewport::new(800.0, 600.0)).finish();
        assert_eq!(trace.viewport(), Some(Viewport::new(800.0, 600.0)));
        assert_eq!(Trace::default().viewport(), None);
    }

    #[test]
    fn jsonl_survives_parse() {
        let trace = sample();
        let text = trace.to_jsonl().unwrap();
        assert_eq!(text.lines().count(), 5);
        assert_eq!(Trace::from_jsonl(&text).unwrap(), trace);
    }

    #[test]
    fn chain_depends_on_dispatch_order() {
        let a = sample();
        let mut recorder = TraceRecorder::new(Viewport::default());
        recorder
            .record(TraceInput::Deactivate, OverlayDispatch::ignored(IgnoredReason::Inactive))
            .unwrap();
        recorder
            .record(
                TraceInput::Event {
                    event: HostEvent::Tick,
                },
                OverlayDispatch::OutsideClickArmed,
            )
            .unwrap();
        let b = recorder.finish();
        assert_ne!(a.final_chain(), b.final_chain());
        assert_eq!(a.final_chain(), sample().final_chain());
    }
}
