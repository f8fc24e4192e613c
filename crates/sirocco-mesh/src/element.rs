//! Reference element types.
//!
//! Node ordering follows the flow solver's tensor-product convention for
//! quads and hexes (node `2` sits above node `0`, not diagonally), which is
//! why the Gmsh writer reorders corners on export. Prisms are extruded
//! triangles with the extrusion along the first natural coordinate;
//! pyramids put the apex last.

use serde::{Deserialize, Serialize};

/// The closed set of supported cell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Tri,
    Quad,
    Tet,
    Pyramid,
    Prism,
    Hex,
}

impl ElementType {
    /// Number of corner vertices of the linear element.
    pub fn vertex_count(self) -> usize {
        match self {
            Self::Tri => 3,
            Self::Quad => 4,
            Self::Tet => 4,
            Self::Pyramid => 5,
            Self::Prism => 6,
            Self::Hex => 8,
        }
    }

    /// Spatial dimension of the element.
    pub fn dims(self) -> usize {
        match self {
            Self::Tri | Self::Quad => 2,
            _ => 3,
        }
    }

    /// Local corner pairs forming the element's edges (linear node order).
    pub fn edge_pairs(self) -> &'static [[usize; 2]] {
        match self {
            Self::Tri => &[[0, 1], [1, 2], [2, 0]],
            // Tensor-product ordering: x-edges then y-edges.
            Self::Quad => &[[0, 1], [2, 3], [0, 2], [1, 3]],
            Self::Tet => &[[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]],
            Self::Pyramid => &[
                [0, 1],
                [1, 2],
                [2, 3],
                [3, 0],
                [0, 4],
                [1, 4],
                [2, 4],
                [3, 4],
            ],
            Self::Prism => &[
                [0, 1],
                [1, 2],
                [2, 0],
                [3, 4],
                [4, 5],
                [5, 3],
                [0, 3],
                [1, 4],
                [2, 5],
            ],
            Self::Hex => &[
                [0, 1],
                [2, 3],
                [4, 5],
                [6, 7],
                [0, 2],
                [1, 3],
                [4, 6],
                [5, 7],
                [0, 4],
                [1, 5],
                [2, 6],
                [3, 7],
            ],
        }
    }

    /// True if `nv` is a valid node count for this element type.
    ///
    /// Linear counts are always valid; triangles and quads additionally
    /// admit their quadratic shape-node counts, which the mesh writer
    /// understands but the (first-order) stiffness assembly rejects.
    pub fn accepts_node_count(self, nv: usize) -> bool {
        if nv == self.vertex_count() {
            return true;
        }
        match self {
            Self::Tri => nv == 6,
            Self::Quad => nv == 8 || nv == 9,
            _ => false,
        }
    }
}
