//! Edge topology built from cell connectivity.
//!
//! The pseudo-solid stiffness matrix keys its sparsity pattern on edges:
//! block `(i, j)` exists iff `i == j` or `{i, j}` is a mesh edge. This
//! module derives the `v2e` / `e2v` / `v2n_e` tables from the cells when
//! the partitioner has not already provided them.

use std::collections::HashMap;

use sirocco_types::{EdgeId, VertexId};

use crate::element::ElementType;
use crate::mesh::DynamicMesh;

/// Precomputed edge adjacency for a mesh.
///
/// Edges are unique unordered global-vertex pairs, canonicalized as
/// `(min, max)`.
#[derive(Debug, Clone)]
pub struct EdgeTopology {
    /// Edge endpoints as `[v_min, v_max]` global vertex ids.
    pub e2v: Vec<[VertexId; 2]>,
    /// For each vertex, the list of incident edges.
    pub v2e: Vec<Vec<EdgeId>>,
    /// Number of edges incident to each vertex.
    pub v2n_e: Vec<u32>,
}

impl EdgeTopology {
    /// Builds the edge tables from a mesh's cells.
    pub fn build(mesh: &DynamicMesh) -> Self {
        Self::from_cells(
            mesh.n_verts(),
            (0..mesh.n_cells()).map(|ic| {
                (
                    mesh.cell_type(ic),
                    mesh.cell_node_count(ic),
                    mesh.cell_global_nodes(ic),
                )
            }),
        )
    }

    /// Builds the edge tables from `(type, node count, global node ids)`
    /// tuples, one per cell.
    pub fn from_cells<I>(n_verts: usize, cells: I) -> Self
    where
        I: Iterator<Item = (ElementType, usize, Vec<u32>)>,
    {
        // Key: (min_vertex, max_vertex) to canonicalize edge direction.
        let mut edge_map: HashMap<(u32, u32), u32> = HashMap::new();
        let mut e2v: Vec<[VertexId; 2]> = Vec::new();

        for (ctype, nv, nodes) in cells {
            for pair in corner_edge_pairs(ctype, nv) {
                let (a, b) = (nodes[pair[0]], nodes[pair[1]]);
                let key = if a < b { (a, b) } else { (b, a) };
                edge_map.entry(key).or_insert_with(|| {
                    e2v.push([VertexId(key.0), VertexId(key.1)]);
                    (e2v.len() - 1) as u32
                });
            }
        }

        let mut v2e: Vec<Vec<EdgeId>> = vec![Vec::new(); n_verts];
        for (ie, edge) in e2v.iter().enumerate() {
            v2e[edge[0].index()].push(EdgeId(ie as u32));
            v2e[edge[1].index()].push(EdgeId(ie as u32));
        }
        let v2n_e = v2e.iter().map(|edges| edges.len() as u32).collect();

        Self { e2v, v2e, v2n_e }
    }

    /// Number of unique edges.
    #[inline]
    pub fn n_edges(&self) -> usize {
        self.e2v.len()
    }
}

/// Local node pairs forming the corner edges of a cell.
///
/// Linear cells use the reference-element edge list directly; quadratic
/// triangles and quads contribute only their corner cycle (mid-edge nodes
/// never enter the stiffness pattern — first-order assembly only).
pub fn corner_edge_pairs(ctype: ElementType, nv: usize) -> Vec<[usize; 2]> {
    if nv == ctype.vertex_count() {
        return ctype.edge_pairs().to_vec();
    }
    match (ctype, nv) {
        (ElementType::Tri, 6) => vec![[0, 1], [1, 2], [2, 0]],
        // Gmsh-style quad8: corner cycle then mid-edge nodes.
        (ElementType::Quad, 8) => vec![[0, 1], [1, 2], [2, 3], [3, 0]],
        // Tensor-product 3x3 quad9: corners at 0, 2, 8, 6.
        (ElementType::Quad, 9) => vec![[0, 2], [2, 8], [8, 6], [6, 0]],
        _ => ctype.edge_pairs().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sirocco_types::VertexId;

    #[test]
    fn two_triangles_share_an_edge() {
        // Square split along the 0-3 diagonal.
        let cells = vec![
            (ElementType::Tri, 3, vec![0_u32, 1, 3]),
            (ElementType::Tri, 3, vec![0_u32, 3, 2]),
        ];
        let topo = EdgeTopology::from_cells(4, cells.into_iter());
        assert_eq!(topo.n_edges(), 5);
        // Diagonal vertices 0 and 3 touch three edges each.
        assert_eq!(topo.v2n_e[0], 3);
        assert_eq!(topo.v2n_e[3], 3);
        assert_eq!(topo.v2n_e[1], 2);
    }

    #[test]
    fn quad_has_no_diagonal_edges() {
        let cells = vec![(ElementType::Quad, 4, vec![0_u32, 1, 2, 3])];
        let topo = EdgeTopology::from_cells(4, cells.into_iter());
        assert_eq!(topo.n_edges(), 4);
        // Tensor ordering: 0-3 and 1-2 are the diagonals.
        assert!(!topo.e2v.contains(&[VertexId(0), VertexId(3)]));
        assert!(!topo.e2v.contains(&[VertexId(1), VertexId(2)]));
    }

    #[test]
    fn hex_has_twelve_edges() {
        let cells = vec![(ElementType::Hex, 8, (0..8_u32).collect::<Vec<_>>())];
        let topo = EdgeTopology::from_cells(8, cells.into_iter());
        assert_eq!(topo.n_edges(), 12);
    }
}
