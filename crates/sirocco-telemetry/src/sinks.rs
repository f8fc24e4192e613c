//! Event sinks.
//!
//! A sink observes the motion event stream. Delivery is synchronous and
//! in emission order (the core is single-threaded per partition), so a
//! sink may keep per-substage state without any locking — which is also
//! why the trait carries no `Send` bound.

use crate::events::{EventKind, MotionEvent};

/// Trait for event consumers.
pub trait EventSink {
    /// Process a single event.
    fn handle(&mut self, event: &MotionEvent);

    /// Called when the run ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects the raw event stream in memory, for tests and post-run dumps.
pub struct CaptureSink {
    /// Collected events, in emission order.
    pub events: Vec<MotionEvent>,
}

impl CaptureSink {
    /// Creates an empty capture sink.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for CaptureSink {
    fn handle(&mut self, event: &MotionEvent) {
        self.events.push(event.clone());
    }

    fn name(&self) -> &str {
        "capture"
    }
}

/// Forwards every event to `tracing` at a configurable level.
pub struct TracingSink {
    /// Level the events are emitted at.
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink emitting at the given log level.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &MotionEvent) {
        // The event macros need a const level, so dispatch on ours.
        if self.level == tracing::Level::ERROR {
            tracing::error!(iter = event.iter, rk_step = event.rk_step, event = ?event.kind, "mesh_motion_event");
        } else if self.level == tracing::Level::WARN {
            tracing::warn!(iter = event.iter, rk_step = event.rk_step, event = ?event.kind, "mesh_motion_event");
        } else if self.level == tracing::Level::INFO {
            tracing::info!(iter = event.iter, rk_step = event.rk_step, event = ?event.kind, "mesh_motion_event");
        } else if self.level == tracing::Level::DEBUG {
            tracing::debug!(iter = event.iter, rk_step = event.rk_step, event = ?event.kind, "mesh_motion_event");
        } else {
            tracing::trace!(iter = event.iter, rk_step = event.rk_step, event = ?event.kind, "mesh_motion_event");
        }
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

/// Renders grid-health events as the classic deformation monitor lines,
/// one line per non-linear increment. Everything else stays quiet.
pub struct MonitorSink;

impl EventSink for MonitorSink {
    fn handle(&mut self, event: &MotionEvent) {
        match &event.kind {
            EventKind::DeformIteration {
                increment,
                n_increments,
                linear_iters,
                min_vol,
                tolerance,
            } => {
                tracing::info!(
                    "Non-linear iter.: {}/{}. Linear iter.: {}. Min vol.: {:.6e}. Error: {:.3e}.",
                    increment,
                    n_increments,
                    linear_iters,
                    min_vol,
                    tolerance
                );
            }
            EventKind::DegenerateElement { cell, det, count } => {
                tracing::warn!(
                    "degenerate element {} (|J| = {:.3e}, {} this substage)",
                    cell,
                    det,
                    count
                );
            }
            EventKind::NegativeVolume { min_vol, cell_count } => {
                tracing::warn!(
                    "{} elements with negative volume (min: {:.6e})",
                    cell_count,
                    min_vol
                );
            }
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "monitor"
    }
}
