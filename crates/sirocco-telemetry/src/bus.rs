//! Telemetry bus — synchronous dispatch with running health counters.
//!
//! The motion core is single-threaded per partition, so there is no queue
//! to drain: `emit` hands the event to every registered sink on the spot,
//! and sinks see events strictly in emission order. The bus itself keeps
//! the running counts of the reportable-but-nonfatal conditions
//! (degenerate elements, negative volumes, linear-solver failures), so
//! the driver can summarize grid health without asking any sink.

use crate::events::{EventKind, MotionEvent};
use crate::sinks::EventSink;

/// Running tally of the recoverable failure conditions.
///
/// These count *events*, not cells: a cell that stays degenerate over
/// several increments is counted once per increment it was reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounters {
    /// Elements whose Jacobian collapsed during stiffness assembly.
    pub degenerate_elements: u64,
    /// Substages whose post-deformation grid check found a non-positive
    /// element.
    pub negative_volumes: u64,
    /// Linear solves that hit the iteration cap without converging.
    pub solver_failures: u64,
}

/// Synchronous event bus for motion telemetry.
pub struct EventBus {
    /// Registered sinks, invoked in registration order.
    sinks: Vec<Box<dyn EventSink>>,
    /// Whether sinks receive events. Counters are always maintained.
    enabled: bool,
    counters: EventCounters,
}

impl EventBus {
    /// Creates a new event bus with no sinks.
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            enabled: true,
            counters: EventCounters::default(),
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Enables or disables sink delivery.
    ///
    /// A disabled bus still updates the health counters — they feed the
    /// run summary, not the sinks.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true if sinks receive events.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Counts the event and delivers it to every sink immediately.
    pub fn emit(&mut self, event: MotionEvent) {
        match &event.kind {
            EventKind::DegenerateElement { .. } => self.counters.degenerate_elements += 1,
            EventKind::NegativeVolume { .. } => self.counters.negative_volumes += 1,
            EventKind::SolverConvergence { converged: false, .. } => {
                self.counters.solver_failures += 1
            }
            _ => {}
        }

        if !self.enabled {
            return;
        }
        for sink in &mut self.sinks {
            sink.handle(&event);
        }
    }

    /// The running health counters.
    pub fn counters(&self) -> EventCounters {
        self.counters
    }

    /// Finalizes every sink. Call once when the run ends.
    pub fn finalize(&mut self) {
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    /// Returns the number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
