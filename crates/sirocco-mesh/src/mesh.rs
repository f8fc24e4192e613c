//! The dynamic mesh: vertices with history, cells, boundaries, topology.
//!
//! Coordinates are flat `n_verts * n_dims` buffers indexed by *global*
//! vertex id. Cell connectivity stores partition-local node ids; `iv2ivg`
//! maps them to global ids (the identity on single-partition runs). The
//! initial positions `x0` are set once at setup and never mutated — every
//! motion kernel is parameterized on them.

use serde::{Deserialize, Serialize};
use sirocco_types::{BoundaryKind, SiroccoError, SiroccoResult, VertexId};

use crate::element::ElementType;
use crate::history::VertexHistory;
use crate::topology::EdgeTopology;

/// A boundary-face record kept for mesh export.
///
/// Faces are written to the `$Elements` section after the volume cells;
/// the physical and elementary tag slots both carry the boundary id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryFace {
    /// Gmsh element type code of the face (1 = 2-node line, 3 = quad, ...).
    pub gmsh_type: i32,
    /// Global vertex ids of the face nodes.
    pub verts: Vec<VertexId>,
}

/// One mesh boundary: its condition kind and vertex membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    /// Boundary-condition kind (stable wire code).
    pub kind: BoundaryKind,
    /// Ordered global vertex ids on this boundary.
    pub verts: Vec<VertexId>,
    /// Face records for mesh export (may be empty when export is unused).
    pub faces: Vec<BoundaryFace>,
}

impl Boundary {
    /// Creates a boundary from a kind and vertex list, with no face records.
    pub fn new(kind: BoundaryKind, verts: Vec<VertexId>) -> Self {
        Self {
            kind,
            verts,
            faces: Vec::new(),
        }
    }
}

/// Body-fitted unstructured volume mesh with prescribed boundary motion.
pub struct DynamicMesh {
    n_dims: usize,
    n_verts: usize,
    /// Global vertex count across partitions (== `n_verts` when serial).
    n_verts_global: usize,
    /// Global cell count across partitions.
    n_cells_global: usize,
    /// Initial vertex positions, immutable after setup.
    x0: Vec<f64>,
    /// Five-level coordinate history; level 0 is the current position.
    history: VertexHistory,
    /// Grid velocity at vertices, updated once per substage.
    grid_vel: Vec<f64>,
    /// Flat cell→node table (partition-local node ids).
    c2v: Vec<u32>,
    /// Prefix offsets into `c2v`, length `n_cells + 1`.
    c2v_ptr: Vec<usize>,
    /// Per-cell element type.
    ctype: Vec<ElementType>,
    /// Per-cell index within its element type (flow-solver containers are
    /// per-type).
    ic2loc: Vec<u32>,
    /// Local→global vertex map (identity when serial).
    iv2ivg: Vec<u32>,
    boundaries: Vec<Boundary>,
    topology: EdgeTopology,
}

impl DynamicMesh {
    /// Builds a mesh from the setup input contract.
    ///
    /// `positions` seeds `x0` and all five history levels. `c2n_v` gives
    /// the node count of each cell (prefix of `c2v`). When `iv2ivg` is
    /// `None` the identity map is used (single partition).
    pub fn new(
        n_dims: usize,
        positions: Vec<f64>,
        c2v: Vec<u32>,
        c2n_v: Vec<usize>,
        ctype: Vec<ElementType>,
        iv2ivg: Option<Vec<u32>>,
        boundaries: Vec<Boundary>,
    ) -> SiroccoResult<Self> {
        let history = VertexHistory::new(&positions, n_dims)?;
        let n_verts = history.n_verts();

        let n_cells = ctype.len();
        if c2n_v.len() != n_cells {
            return Err(SiroccoError::InvalidMesh(format!(
                "c2n_v has {} entries for {} cells",
                c2n_v.len(),
                n_cells
            )));
        }
        let total_nodes: usize = c2n_v.iter().sum();
        if total_nodes != c2v.len() {
            return Err(SiroccoError::InvalidMesh(format!(
                "c2v has {} entries but c2n_v sums to {}",
                c2v.len(),
                total_nodes
            )));
        }

        let iv2ivg = iv2ivg.unwrap_or_else(|| (0..n_verts as u32).collect());
        if iv2ivg.len() != n_verts {
            return Err(SiroccoError::InvalidMesh(format!(
                "iv2ivg has {} entries for {} vertices",
                iv2ivg.len(),
                n_verts
            )));
        }

        let mut c2v_ptr = Vec::with_capacity(n_cells + 1);
        c2v_ptr.push(0);
        for &nv in &c2n_v {
            c2v_ptr.push(c2v_ptr.last().unwrap() + nv);
        }

        for (ic, &t) in ctype.iter().enumerate() {
            if t.dims() != n_dims {
                return Err(SiroccoError::InvalidMesh(format!(
                    "cell {ic} is {t:?} but the mesh is {n_dims}-D"
                )));
            }
            if !t.accepts_node_count(c2n_v[ic]) {
                return Err(SiroccoError::InvalidMesh(format!(
                    "cell {ic} ({t:?}) has unsupported node count {}",
                    c2n_v[ic]
                )));
            }
            for &iv in &c2v[c2v_ptr[ic]..c2v_ptr[ic + 1]] {
                if iv as usize >= n_verts {
                    return Err(SiroccoError::InvalidMesh(format!(
                        "cell {ic} references vertex {iv} (vertex count {n_verts})"
                    )));
                }
            }
        }

        for (ib, bnd) in boundaries.iter().enumerate() {
            for &iv in &bnd.verts {
                if iv.index() >= n_verts {
                    return Err(SiroccoError::InvalidMesh(format!(
                        "boundary {ib} references vertex {} (vertex count {n_verts})",
                        iv.0
                    )));
                }
            }
        }

        let mut type_counts: std::collections::HashMap<ElementType, u32> =
            std::collections::HashMap::new();
        let ic2loc = ctype
            .iter()
            .map(|&t| {
                let counter = type_counts.entry(t).or_insert(0);
                let loc = *counter;
                *counter += 1;
                loc
            })
            .collect();

        let topology = EdgeTopology::from_cells(
            n_verts,
            (0..n_cells).map(|ic| {
                let nodes = c2v[c2v_ptr[ic]..c2v_ptr[ic + 1]]
                    .iter()
                    .map(|&iv| iv2ivg[iv as usize])
                    .collect();
                (ctype[ic], c2n_v[ic], nodes)
            }),
        );

        Ok(Self {
            n_dims,
            n_verts,
            n_verts_global: n_verts,
            n_cells_global: n_cells,
            x0: positions,
            history,
            grid_vel: vec![0.0; n_verts * n_dims],
            c2v,
            c2v_ptr,
            ctype,
            ic2loc,
            iv2ivg,
            boundaries,
            topology,
        })
    }

    /// Overrides the global vertex/cell counts (multi-partition setup).
    pub fn with_global_counts(mut self, n_verts_global: usize, n_cells_global: usize) -> Self {
        self.n_verts_global = n_verts_global;
        self.n_cells_global = n_cells_global;
        self
    }

    // ─── Sizes ───

    #[inline]
    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    #[inline]
    pub fn n_verts(&self) -> usize {
        self.n_verts
    }

    #[inline]
    pub fn n_verts_global(&self) -> usize {
        self.n_verts_global
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.ctype.len()
    }

    #[inline]
    pub fn n_cells_global(&self) -> usize {
        self.n_cells_global
    }

    // ─── Coordinates ───

    /// Initial positions (flat, global-indexed).
    #[inline]
    pub fn x0(&self) -> &[f64] {
        &self.x0
    }

    /// Initial position of vertex `ivg`.
    #[inline]
    pub fn x0_pos(&self, ivg: usize) -> &[f64] {
        &self.x0[ivg * self.n_dims..(ivg + 1) * self.n_dims]
    }

    #[inline]
    pub fn history(&self) -> &VertexHistory {
        &self.history
    }

    #[inline]
    pub fn history_mut(&mut self) -> &mut VertexHistory {
        &mut self.history
    }

    /// Current positions (history level 0).
    #[inline]
    pub fn current(&self) -> &[f64] {
        self.history.current()
    }

    /// Current positions, mutable.
    #[inline]
    pub fn current_mut(&mut self) -> &mut [f64] {
        self.history.current_mut()
    }

    /// Initial positions together with mutable current positions.
    ///
    /// The motion kernels rewrite level 0 as a function of `x0`; this
    /// split borrow lets them do it without copying either buffer.
    #[inline]
    pub fn x0_and_current_mut(&mut self) -> (&[f64], &mut [f64]) {
        (&self.x0, self.history.current_mut())
    }

    /// Grid velocity at vertices (flat, global-indexed).
    #[inline]
    pub fn grid_vel(&self) -> &[f64] {
        &self.grid_vel
    }

    #[inline]
    pub fn grid_vel_mut(&mut self) -> &mut [f64] {
        &mut self.grid_vel
    }

    // ─── Cells ───

    #[inline]
    pub fn cell_type(&self, ic: usize) -> ElementType {
        self.ctype[ic]
    }

    /// Index of cell `ic` within its element type's container.
    #[inline]
    pub fn cell_local_index(&self, ic: usize) -> usize {
        self.ic2loc[ic] as usize
    }

    #[inline]
    pub fn cell_node_count(&self, ic: usize) -> usize {
        self.c2v_ptr[ic + 1] - self.c2v_ptr[ic]
    }

    /// Partition-local node ids of cell `ic`.
    #[inline]
    pub fn cell_nodes(&self, ic: usize) -> &[u32] {
        &self.c2v[self.c2v_ptr[ic]..self.c2v_ptr[ic + 1]]
    }

    /// Global node ids of cell `ic`.
    pub fn cell_global_nodes(&self, ic: usize) -> Vec<u32> {
        self.cell_nodes(ic)
            .iter()
            .map(|&iv| self.iv2ivg[iv as usize])
            .collect()
    }

    /// Maps a partition-local vertex id to its global id.
    #[inline]
    pub fn ivg(&self, iv: usize) -> usize {
        self.iv2ivg[iv] as usize
    }

    // ─── Boundaries and topology ───

    #[inline]
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    #[inline]
    pub fn topology(&self) -> &EdgeTopology {
        &self.topology
    }
}
