//! Numerical constants and solver defaults.

/// Epsilon for geometric comparisons. Coordinates with magnitude below
/// `EPSILON * EPSILON` are flushed to zero after a deformation update.
pub const EPSILON: f64 = 1.0e-10;

/// The elasticity linear-solve tolerance is this factor times the
/// shortest edge length of the current grid.
pub const TOLERANCE_MIN_LENGTH_FACTOR: f64 = 1.0e-2;

/// Upper bound on the FGMRES restart length (inner iterations per cycle).
pub const MAX_LINEAR_ITERS: usize = 100;

/// Default number of sub-increments for the iterative elastic deformation.
pub const DEFAULT_DEFORM_ITERS: u32 = 1;

/// Number of coordinate-history levels kept per vertex (BDF4 stencil depth).
pub const N_HISTORY_LEVELS: usize = 5;
