//! # sirocco-types
//!
//! Shared types, identifiers, error types, and numerical constants
//! for the Sirocco dynamic-mesh motion core.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Sirocco crates share.

pub mod boundary;
pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use boundary::BoundaryKind;
pub use error::{SiroccoError, SiroccoResult};
pub use ids::{EdgeId, VertexId};
pub use scalar::Scalar;
