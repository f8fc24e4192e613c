//! Motion event types.
//!
//! Structured events emitted by the motion core at various points in each
//! timestep. Events are lightweight value types that carry just enough
//! data to be useful for monitoring and debugging; none of them aborts
//! the run by itself.

use serde::{Deserialize, Serialize};

/// A mesh-motion event emitted by the core.
///
/// Events are tagged with the physical iteration and the Runge-Kutta
/// substage they occurred in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionEvent {
    /// Physical timestep number (0-indexed).
    pub iter: u32,
    /// Runge-Kutta substage within the timestep.
    pub rk_step: i32,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    /// Substage motion update started.
    SubstageBegin {
        /// Substage simulation time (seconds).
        rk_time: f64,
    },

    /// One non-linear deformation increment completed.
    ///
    /// This is the classic mesh-monitor line: increment index, linear
    /// iterations spent, minimum element measure after the update, and
    /// the solver tolerance in effect.
    DeformIteration {
        increment: u32,
        n_increments: u32,
        linear_iters: u32,
        min_vol: f64,
        tolerance: f64,
    },

    /// An element produced a non-positive Jacobian during assembly.
    DegenerateElement {
        /// Global cell index.
        cell: usize,
        /// Offending Jacobian determinant.
        det: f64,
        /// Running count of degenerate elements this substage.
        count: u32,
    },

    /// The post-deformation grid check found a non-positive element measure.
    NegativeVolume {
        min_vol: f64,
        /// Number of non-positive cells.
        cell_count: u32,
    },

    /// Linear solver convergence report.
    SolverConvergence {
        iterations: u32,
        final_residual: f64,
        tolerance: f64,
        converged: bool,
    },

    /// A mesh file was written.
    MeshWritten {
        /// Output path.
        path: String,
    },
}

impl MotionEvent {
    /// Creates a new event for the given iteration and substage.
    pub fn new(iter: u32, rk_step: i32, kind: EventKind) -> Self {
        Self { iter, rk_step, kind }
    }
}
