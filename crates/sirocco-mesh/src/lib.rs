//! # sirocco-mesh
//!
//! Unstructured dynamic-mesh data model for the Sirocco motion core.
//!
//! Provides:
//! - `ElementType` and the local edge connectivity of each reference element
//! - `VertexHistory` — the five-level coordinate history behind the
//!   fourth-order backward-difference grid velocity
//! - `DynamicMesh` — vertices, cells, boundaries, and edge topology
//! - `EdgeTopology` — `v2e`/`e2v`/`v2n_e` built from cell connectivity
//! - grid-quality monitoring (signed minimum element measure, shortest edge)
//! - procedural test meshes and the Gmsh ASCII 2.2 writer

pub mod element;
pub mod generators;
pub mod gmsh;
pub mod history;
pub mod mesh;
pub mod quality;
pub mod topology;

pub use element::ElementType;
pub use gmsh::MeshFormat;
pub use history::VertexHistory;
pub use mesh::{Boundary, BoundaryFace, DynamicMesh};
pub use quality::QualityReport;
pub use topology::EdgeTopology;
