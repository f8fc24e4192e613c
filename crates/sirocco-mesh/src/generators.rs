//! Procedural meshes for tests and verification runs.
//!
//! These generators produce deterministic meshes with positive element
//! measures and the node orderings the rest of the core expects
//! (tensor-product for quads and hexes).

use sirocco_types::{BoundaryKind, VertexId};

use crate::element::ElementType;
use crate::mesh::{Boundary, BoundaryFace, DynamicMesh};

/// Generates a structured quad grid spanning `[0, width] × [0, height]`.
///
/// Vertex `(i, j)` sits at `(i·width/cols, j·height/rows)` with index
/// `j·(cols+1) + i`. Every perimeter vertex belongs to a single boundary
/// of the given kind, with 2-node line faces for export.
///
/// # Example
/// ```
/// use sirocco_mesh::generators::quad_grid;
/// use sirocco_types::BoundaryKind;
/// let mesh = quad_grid(2, 2, 2.0, 2.0, BoundaryKind::IsothermMove);
/// assert_eq!(mesh.n_verts(), 9); // 3×3 vertices at {0,1,2}²
/// assert_eq!(mesh.n_cells(), 4);
/// ```
pub fn quad_grid(
    cols: usize,
    rows: usize,
    width: f64,
    height: f64,
    bnd_kind: BoundaryKind,
) -> DynamicMesh {
    let vx = cols + 1;
    let vy = rows + 1;
    let dx = width / cols as f64;
    let dy = height / rows as f64;

    let mut positions = Vec::with_capacity(vx * vy * 2);
    for j in 0..vy {
        for i in 0..vx {
            positions.push(i as f64 * dx);
            positions.push(j as f64 * dy);
        }
    }

    let at = |i: usize, j: usize| (j * vx + i) as u32;

    // Tensor-product node order: node 2 above node 0.
    let mut c2v = Vec::with_capacity(cols * rows * 4);
    for j in 0..rows {
        for i in 0..cols {
            c2v.extend_from_slice(&[at(i, j), at(i + 1, j), at(i, j + 1), at(i + 1, j + 1)]);
        }
    }
    let n_cells = cols * rows;
    let c2n_v = vec![4; n_cells];
    let ctype = vec![ElementType::Quad; n_cells];

    // Perimeter walk: bottom, right, top, left.
    let mut bverts: Vec<VertexId> = Vec::new();
    for i in 0..vx {
        bverts.push(VertexId(at(i, 0)));
    }
    for j in 1..vy {
        bverts.push(VertexId(at(vx - 1, j)));
    }
    for i in (0..vx - 1).rev() {
        bverts.push(VertexId(at(i, vy - 1)));
    }
    for j in (1..vy - 1).rev() {
        bverts.push(VertexId(at(0, j)));
    }

    let faces = bverts
        .iter()
        .zip(bverts.iter().cycle().skip(1))
        .map(|(&a, &b)| BoundaryFace {
            gmsh_type: 1,
            verts: vec![a, b],
        })
        .collect();

    let boundary = Boundary {
        kind: bnd_kind,
        verts: bverts,
        faces,
    };

    DynamicMesh::new(2, positions, c2v, c2n_v, ctype, None, vec![boundary])
        .expect("generated quad grid is valid")
}

/// Unit square split into two triangles along the 0-3 diagonal.
///
/// Vertices: `0=(0,0)`, `1=(1,0)`, `2=(0,1)`, `3=(1,1)`; both triangles
/// are counter-clockwise. No boundaries are attached.
pub fn two_triangle_square() -> DynamicMesh {
    let positions = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let c2v = vec![0, 1, 3, 0, 3, 2];
    DynamicMesh::new(
        2,
        positions,
        c2v,
        vec![3, 3],
        vec![ElementType::Tri; 2],
        None,
        Vec::new(),
    )
    .expect("generated mesh is valid")
}

/// Unit square with a center vertex, split into four triangles.
///
/// Vertices: corners `0=(0,0)`, `1=(1,0)`, `2=(0,1)`, `3=(1,1)` and the
/// center `4=(0.5,0.5)`. Two boundaries: the left wall `{0, 2}` of
/// `left_kind` and the right wall `{1, 3}` of `right_kind`. The center
/// vertex is the only interior vertex.
pub fn square_with_center(left_kind: BoundaryKind, right_kind: BoundaryKind) -> DynamicMesh {
    let positions = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.5, 0.5];
    let c2v = vec![0, 1, 4, 1, 3, 4, 3, 2, 4, 2, 0, 4];
    let boundaries = vec![
        Boundary::new(left_kind, vec![VertexId(0), VertexId(2)]),
        Boundary::new(right_kind, vec![VertexId(1), VertexId(3)]),
    ];
    DynamicMesh::new(
        2,
        positions,
        c2v,
        vec![3; 4],
        vec![ElementType::Tri; 4],
        None,
        boundaries,
    )
    .expect("generated mesh is valid")
}

/// A single equilateral triangle with unit edge length.
///
/// Vertices: `(0,0)`, `(1,0)`, `(0.5, √3/2)`.
pub fn equilateral_triangle() -> DynamicMesh {
    let h = 3.0_f64.sqrt() / 2.0;
    let positions = vec![0.0, 0.0, 1.0, 0.0, 0.5, h];
    DynamicMesh::new(
        2,
        positions,
        vec![0, 1, 2],
        vec![3],
        vec![ElementType::Tri],
        None,
        Vec::new(),
    )
    .expect("generated mesh is valid")
}

/// A single unit right tetrahedron with positive volume.
///
/// Vertices: `(0,0,0)`, `(1,0,0)`, `(0,1,0)`, `(0,0,1)`.
pub fn single_tet() -> DynamicMesh {
    let positions = vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    ];
    DynamicMesh::new(
        3,
        positions,
        vec![0, 1, 2, 3],
        vec![4],
        vec![ElementType::Tet],
        None,
        Vec::new(),
    )
    .expect("generated mesh is valid")
}

/// A single unit cube in tensor-product node order (`index = i + 2j + 4k`).
pub fn unit_hex() -> DynamicMesh {
    let mut positions = Vec::with_capacity(24);
    for k in 0..2 {
        for j in 0..2 {
            for i in 0..2 {
                positions.push(i as f64);
                positions.push(j as f64);
                positions.push(k as f64);
            }
        }
    }
    DynamicMesh::new(
        3,
        positions,
        (0..8).collect(),
        vec![8],
        vec![ElementType::Hex],
        None,
        Vec::new(),
    )
    .expect("generated mesh is valid")
}
