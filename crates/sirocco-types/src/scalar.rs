//! Scalar type alias for the motion core.
//!
//! Mesh deformation feeds metric terms and grid velocities into a
//! high-order flow solver, so all geometry is kept in `f64`. Boundary
//! displacements must be honored to machine precision; `f32` would not
//! survive the backward-difference velocity stencil.

/// The floating-point type used throughout the motion core.
pub type Scalar = f64;
