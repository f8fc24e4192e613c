//! # sirocco-telemetry
//!
//! Telemetry for the mesh-motion core. Structured events (deformation
//! monitor lines, grid-quality warnings, solver convergence) flow through
//! a synchronous bus that keeps running grid-health counters and hands
//! each event to pluggable sinks (tracing, monitor lines, capture).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::{EventBus, EventCounters};
pub use events::{EventKind, MotionEvent};
pub use sinks::{CaptureSink, EventSink, MonitorSink, TracingSink};
