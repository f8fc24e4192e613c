//! Strongly-typed identifiers for mesh entities.
//!
//! Newtype wrappers prevent accidental mixing of vertex and edge
//! indices. Boundary vertex lists, boundary faces, and the edge table
//! carry these; flat coordinate buffers are addressed through `index()`.

use serde::{Deserialize, Serialize};

/// Index into the global vertex arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Index into the edge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl VertexId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for VertexId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for EdgeId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
