//! Gesture classification from raw pointer events.
//!
//! The classifier turns an undifferentiated stream of press/move/release
//! events into exactly one of click, double-click, or drag-sequence, using
//! two deferred timers:
//!
//! - the **drag-initiation window** runs while the button is held; if it
//!   expires before release, the sequence is a drag;
//! - the **double-click window** runs after a release; a second press
//!   inside it makes a double-click, expiry makes a single click.
//!
//! ```text
//!            press                    window expires (held)
//!   Idle ───────────► AwaitingDragStart ─────────────────► Dragging
//!    ▲                      │ release                        │ release /
//!    │                      ▼                                │ target lost
//!    │ window expires  AwaitingDoubleClick                   │
//!    │◄──(click)─────────── │                                │
//!    │◄──(double-click)──── │ second press                   │
//!    │◄──(drag-end)─────────────────────────────────────────┘
//! ```
//!
//! A zero-length window classifies immediately and synchronously instead of
//! scheduling. Hit-testing is resolved by the caller on every event and
//! passed in; an unresolved target suppresses emission without erroring.

use std::sync::Arc;
use std::time::Duration;

use fresco_core::logging::targets;
use fresco_core::{TimerId, TimerService};

use crate::events::{DragInfo, Gesture, PointerSample};
use crate::geometry::Point;

/// Timing windows and drag-targeting policy.
#[derive(Debug, Clone, Copy)]
pub struct GestureConfig {
    /// How long after a release a second press still counts as a
    /// double-click. Zero classifies the click on release, synchronously.
    pub double_click_window: Duration,
    /// How long the button must be held before the sequence becomes a
    /// drag. Zero makes every press an immediate drag-start.
    pub drag_window: Duration,
    /// `false` pins a drag to the element under the pointer at drag-start;
    /// `true` retargets to the element under the pointer at each move.
    pub multi_element_drag: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_click_window: Duration::from_millis(500),
            drag_window: Duration::from_millis(25),
            multi_element_drag: false,
        }
    }
}

/// Classification phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing in flight.
    Idle,
    /// Button held, drag-initiation window pending.
    AwaitingDragStart,
    /// Click seen, double-click window pending.
    AwaitingDoubleClick,
    /// Drag in progress.
    Dragging,
}

/// A click candidate buffered while the double-click window runs.
#[derive(Debug, Clone, Copy)]
struct BufferedClick {
    sample: PointerSample,
    target: Option<usize>,
}

/// The timer-driven click/double-click/drag state machine.
pub struct GestureClassifier {
    config: GestureConfig,
    timers: Arc<TimerService>,
    phase: Phase,
    /// Target resolved at the most recent event.
    target: Option<usize>,
    /// Element a running drag is addressed to.
    drag_target: Option<usize>,
    start_pos: Point,
    last_pos: Point,
    drag_timer: Option<TimerId>,
    click_timer: Option<TimerId>,
    buffered: Option<BufferedClick>,
}

impl GestureClassifier {
    /// Create a classifier scheduling on `timers`.
    pub fn new(config: GestureConfig, timers: Arc<TimerService>) -> Self {
        Self {
            config,
            timers,
            phase: Phase::Idle,
            target: None,
            drag_target: None,
            start_pos: Point::ZERO,
            last_pos: Point::ZERO,
            drag_timer: None,
            click_timer: None,
            buffered: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether a drag is currently in progress.
    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    /// Button down. `target` is the hit-tested region under the pointer.
    pub fn on_press(&mut self, sample: PointerSample, target: Option<usize>) -> Vec<Gesture> {
        let mut out = Vec::new();
        self.target = target;

        match self.phase {
            Phase::Idle => {
                self.start_pos = sample.pos;
                self.last_pos = sample.pos;
                if self.config.drag_window.is_zero() {
                    // Immediate classification: the press is a drag.
                    self.begin_drag(sample, &mut out);
                } else {
                    self.cancel_drag_timer();
                    self.drag_timer = Some(self.timers.schedule(self.config.drag_window));
                    self.phase = Phase::AwaitingDragStart;
                }
            }
            Phase::AwaitingDoubleClick => {
                // Second press inside the window: a double-click.
                self.cancel_click_timer();
                self.buffered = None;
                if let Some(t) = target {
                    out.push(Gesture::DoubleClick { target: t, sample });
                } else {
                    tracing::trace!(target: targets::GESTURE, "double-click suppressed: no target");
                }
                self.reset_to_idle();
            }
            // A press while one is already tracked carries no information.
            Phase::AwaitingDragStart | Phase::Dragging => {}
        }
        out
    }

    /// Pointer motion while the button is held.
    pub fn on_move(&mut self, sample: PointerSample, target: Option<usize>) -> Vec<Gesture> {
        let mut out = Vec::new();
        self.target = target;

        match self.phase {
            Phase::Dragging => {
                let effective = if self.config.multi_element_drag {
                    target
                } else {
                    self.drag_target
                };
                match effective {
                    Some(t) => {
                        self.drag_target = Some(t);
                        let drag = DragInfo {
                            start: self.start_pos,
                            last: self.last_pos,
                            delta: sample.pos.delta_from(self.last_pos),
                            total: sample.pos.delta_from(self.start_pos),
                        };
                        out.push(Gesture::DragMove {
                            target: t,
                            sample,
                            drag,
                        });
                        self.last_pos = sample.pos;
                    }
                    None => {
                        // Continuation lost its target: the drag is over.
                        self.end_drag(&mut out);
                    }
                }
            }
            Phase::AwaitingDragStart => {
                // Held but not yet a drag; keep positions fresh so a drag
                // started by the timer begins where the pointer is.
                self.last_pos = sample.pos;
            }
            Phase::Idle | Phase::AwaitingDoubleClick => {}
        }
        out
    }

    /// Button up.
    pub fn on_release(&mut self, sample: PointerSample, target: Option<usize>) -> Vec<Gesture> {
        let mut out = Vec::new();
        self.target = target;

        match self.phase {
            Phase::AwaitingDragStart => {
                // Released before the drag window: a click candidate.
                self.cancel_drag_timer();
                if self.config.double_click_window.is_zero() {
                    // Immediate classification: emit the click now.
                    if let Some(t) = target {
                        out.push(Gesture::Click { target: t, sample });
                    }
                    self.reset_to_idle();
                } else {
                    self.cancel_click_timer();
                    self.click_timer = Some(self.timers.schedule(self.config.double_click_window));
                    self.buffered = Some(BufferedClick { sample, target });
                    self.phase = Phase::AwaitingDoubleClick;
                }
            }
            Phase::Dragging => {
                self.end_drag(&mut out);
            }
            Phase::Idle | Phase::AwaitingDoubleClick => {}
        }
        out
    }

    /// Route an expired timer id back into the classifier.
    ///
    /// Ids that belong to neither slot produce no gestures; the slots are
    /// cleared before acting so a stale id can never fire twice.
    pub fn on_timer(&mut self, id: TimerId) -> Vec<Gesture> {
        let mut out = Vec::new();

        if self.drag_timer == Some(id) {
            self.drag_timer = None;
            if self.phase == Phase::AwaitingDragStart {
                // Still pressed when the window expired: a drag begins.
                let sample = PointerSample {
                    pos: self.last_pos,
                    modifiers: Default::default(),
                };
                self.begin_drag(sample, &mut out);
            }
        } else if self.click_timer == Some(id) {
            self.click_timer = None;
            if self.phase == Phase::AwaitingDoubleClick {
                // No second press arrived: a single click.
                let buffered = self.buffered.take();
                if let Some(BufferedClick {
                    sample,
                    target: Some(t),
                }) = buffered
                {
                    out.push(Gesture::Click { target: t, sample });
                } else {
                    tracing::trace!(target: targets::GESTURE, "click suppressed: no target");
                }
                self.reset_to_idle();
            }
        }
        out
    }

    /// Cancel everything and return to `Idle` without emitting.
    ///
    /// Called by the owner when the event source goes away mid-sequence.
    pub fn reset(&mut self) {
        self.reset_to_idle();
    }

    fn begin_drag(&mut self, sample: PointerSample, out: &mut Vec<Gesture>) {
        match self.target {
            Some(t) => {
                tracing::trace!(target: targets::GESTURE, element = t, "drag started");
                self.drag_target = Some(t);
                self.start_pos = self.last_pos;
                self.phase = Phase::Dragging;
                out.push(Gesture::DragStart {
                    target: t,
                    sample: PointerSample {
                        pos: self.last_pos,
                        modifiers: sample.modifiers,
                    },
                });
            }
            None => {
                tracing::trace!(target: targets::GESTURE, "drag-start suppressed: no target");
                self.reset_to_idle();
            }
        }
    }

    fn end_drag(&mut self, out: &mut Vec<Gesture>) {
        // The phase guard makes drag-end fire exactly once per drag-start.
        if self.phase == Phase::Dragging {
            if let Some(t) = self.drag_target {
                out.push(Gesture::DragEnd { target: t });
            }
        }
        self.reset_to_idle();
    }

    fn reset_to_idle(&mut self) {
        self.cancel_drag_timer();
        self.cancel_click_timer();
        self.phase = Phase::Idle;
        self.target = None;
        self.drag_target = None;
        self.buffered = None;
        self.start_pos = Point::ZERO;
        self.last_pos = Point::ZERO;
    }

    fn cancel_drag_timer(&mut self) {
        if let Some(id) = self.drag_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_click_timer(&mut self) {
        if let Some(id) = self.click_timer.take() {
            self.timers.cancel(id);
        }
    }
}
