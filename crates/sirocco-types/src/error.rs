//! Error types for the Sirocco mesh-motion core.
//!
//! All crates return `SiroccoResult<T>` from fallible operations.
//! Degenerate-element, negative-volume, and solver-convergence conditions
//! are recoverable — the motion driver reports them and continues —
//! while mesh and configuration errors are fatal at setup.

use thiserror::Error;

/// Unified error type for the Sirocco mesh-motion core.
#[derive(Debug, Error)]
pub enum SiroccoError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value or combination is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An element produced a non-positive Jacobian or area during assembly.
    #[error("Degenerate element {cell}: non-positive Jacobian ({det:.3e})")]
    DegenerateElement {
        /// Global cell index.
        cell: usize,
        /// Offending Jacobian determinant (or signed area).
        det: f64,
    },

    /// The linear solver hit its iteration cap without converging.
    #[error(
        "Linear solver did not converge after {iterations} iterations \
         (residual: {residual:.2e}, tolerance: {tolerance:.2e})"
    )]
    SolverNonConvergence {
        iterations: u32,
        residual: f64,
        tolerance: f64,
    },

    /// Deformation produced at least one element of non-positive measure.
    #[error("Mesh deformation produced negative volume (min measure: {min_vol:.3e})")]
    NegativeVolume { min_vol: f64 },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, SiroccoError>`.
pub type SiroccoResult<T> = Result<T, SiroccoError>;
