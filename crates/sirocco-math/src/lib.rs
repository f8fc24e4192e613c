//! # sirocco-math
//!
//! Linear algebra for the Sirocco mesh-motion core.
//!
//! Provides:
//! - Re-exports of `glam` f64 types (`DVec2`, `DVec3`, ...)
//! - Small dense `Block` type (2×2 / 3×3) with closed-form inversion
//! - `SparseBlockMatrix` — symmetric-pattern block CSR keyed on edge
//!   connectivity, with Dirichlet row elimination and a block LU-SGS sweep
//! - Restarted flexible GMRES over `LinearOperator`/`Preconditioner` seams

pub mod block;
pub mod block_matrix;
pub mod fgmres;

// Re-export glam f64 types as the canonical vector types for Sirocco.
pub use glam::{DMat2, DMat3, DVec2, DVec3};

pub use block::Block;
pub use block_matrix::{LuSgsPreconditioner, SparseBlockMatrix};
pub use fgmres::{FgmresSolver, IdentityPreconditioner, LinearOperator, Preconditioner, SolveStats};
