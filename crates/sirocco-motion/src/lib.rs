//! # sirocco-motion
//!
//! The dynamic mesh motion core of an unsteady high-order flow solver.
//!
//! Given a body-fitted mesh whose boundary vertices follow prescribed
//! motion, computes new interior-vertex positions for every Runge-Kutta
//! substage and derives the ALE grid-velocity field the flow solver needs.
//!
//! ## Motion strategies
//!
//! - **Static** — no motion; every substage is a no-op.
//! - **Rigid** — rigid plunge/pitch of the whole grid from an analytic
//!   descriptor; no solve.
//! - **Perturb** — analytic sinusoidal perturbation used for
//!   method-of-manufactured-solutions verification.
//! - **Blend** — per-boundary displacements faded into the volume with a
//!   quintic distance kernel; no solve.
//! - **Elasticity** — pseudo-solid linear-elasticity FEM solve with
//!   per-element stiffness inversely proportional to element volume,
//!   FGMRES + block LU-SGS, and Dirichlet boundary displacement.
//!
//! The entry point is [`MotionDriver`], which owns the mesh and dispatches
//! one of the strategies per substage before handing updated positions and
//! grid velocities to the flow-solver collaborator.

pub mod config;
pub mod driver;
pub mod elasticity;
pub mod flow;
pub mod halo;
pub mod kernels;
pub mod shape;
pub mod stiffness;
pub mod velocity;

pub use config::{MotionConfig, MotionMode, MovingBoundarySpec, OscillationSpec, RigidMotionSpec, TimeScheme};
pub use driver::MotionDriver;
pub use flow::{FlowElements, NullFlowElements, RecordingFlowElements};
pub use halo::{PartitionExchange, SinglePartition};
