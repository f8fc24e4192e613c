//! Per-element pseudo-solid stiffness assembly.
//!
//! Each cell contributes `K_e = Σ_g w·|J|·Bᵀ D B` over its Gauss points,
//! with the strain-displacement matrix `B` built from the mapped shape
//! gradients and the isotropic `D` using Dwight's rigid-rotation-
//! preserving parameters `μ = E`, `λ = −E`, `E = scale/(w·|J|)`. The
//! `scale` is the global minimum element measure, so the smallest element
//! in the grid is the stiffest and resists inversion.
//!
//! The flat `(nv·d)²` element matrix is scattered into the global
//! block-CSR operator as `nv²` blocks of size `d×d`. Couplings outside
//! the edge pattern (the face diagonals of quads and hexes) are dropped,
//! matching the point-to-point operator the edge connectivity defines.

use faer::Mat;
use sirocco_math::block::Block;
use sirocco_math::block_matrix::SparseBlockMatrix;
use sirocco_mesh::DynamicMesh;
use sirocco_types::{SiroccoError, SiroccoResult};

use crate::shape::{self, corner_order, gauss_rule};

/// Dense stiffness of one element, with its node ids in assembly order.
pub struct ElementStiffness {
    /// Spatial dimension.
    pub dims: usize,
    /// Global node ids in shape-function (corner-cycle) order; row/column
    /// blocks of `k` follow this order.
    pub nodes: Vec<u32>,
    /// Dense `(nv·d) × (nv·d)` stiffness.
    pub k: Mat<f64>,
}

/// Assembles the stiffness of cell `ic` about the current grid positions.
///
/// `scale` is the (absolute) global minimum element measure. Returns
/// `DegenerateElement` when a Gauss-point Jacobian collapses; the caller
/// reports it and continues without this element's contribution.
pub fn assemble_element(
    mesh: &DynamicMesh,
    ic: usize,
    scale: f64,
) -> SiroccoResult<ElementStiffness> {
    let etype = mesh.cell_type(ic);
    let nv = etype.vertex_count();
    if mesh.cell_node_count(ic) != nv {
        return Err(SiroccoError::InvalidConfig(format!(
            "cell {ic} ({etype:?}): stiffness assembly is first-order only"
        )));
    }
    let d = mesh.n_dims();
    let n_strain = if d == 2 { 3 } else { 6 };
    let ndof = nv * d;

    // Corner coordinates from the current positions, in cycle order.
    let storage_nodes = mesh.cell_global_nodes(ic);
    let nodes: Vec<u32> = corner_order(etype)
        .iter()
        .map(|&slot| storage_nodes[slot])
        .collect();
    let x = mesh.current();
    let mut corners = [[0.0_f64; 3]; shape::MAX_NODES];
    for (k, &ivg) in nodes.iter().enumerate() {
        let base = ivg as usize * d;
        corners[k][..d].copy_from_slice(&x[base..base + d]);
    }

    let mut k_e = Mat::<f64>::zeros(ndof, ndof);

    for point in gauss_rule(etype) {
        let (sf, det) = shape::eval(etype, nv, point, &corners[..nv])?;
        if det.abs() < 1.0e-14 * scale.max(1.0) {
            return Err(SiroccoError::DegenerateElement { cell: ic, det });
        }

        // Strain-displacement matrix from the mapped gradients.
        let mut b = Mat::<f64>::zeros(n_strain, ndof);
        for node in 0..nv {
            let dn = &sf.table[node];
            if d == 2 {
                b[(0, node * d)] = dn[0];
                b[(1, node * d + 1)] = dn[1];
                b[(2, node * d)] = dn[1];
                b[(2, node * d + 1)] = dn[0];
            } else {
                b[(0, node * d)] = dn[0];
                b[(1, node * d + 1)] = dn[1];
                b[(2, node * d + 2)] = dn[2];

                b[(3, node * d)] = dn[1];
                b[(3, node * d + 1)] = dn[0];

                b[(4, node * d + 1)] = dn[2];
                b[(4, node * d + 2)] = dn[1];

                b[(5, node * d)] = dn[2];
                b[(5, node * d + 2)] = dn[0];
            }
        }

        // Dwight scaling: the element stiffness is inversely proportional
        // to its measure, and λ = −E cancels the rotational stiffness.
        let e = scale / (point.weight * det);
        let mu = e;
        let lambda = -e;

        let mut d_mat = Mat::<f64>::zeros(n_strain, n_strain);
        if d == 2 {
            d_mat[(0, 0)] = lambda + 2.0 * mu;
            d_mat[(0, 1)] = lambda;
            d_mat[(1, 0)] = lambda;
            d_mat[(1, 1)] = lambda + 2.0 * mu;
            d_mat[(2, 2)] = mu;
        } else {
            for i in 0..3 {
                for j in 0..3 {
                    d_mat[(i, j)] = if i == j { lambda + 2.0 * mu } else { lambda };
                }
            }
            for i in 3..6 {
                d_mat[(i, i)] = mu;
            }
        }

        let bt_d: Mat<f64> = b.as_ref().transpose() * d_mat.as_ref();
        let contrib: Mat<f64> = bt_d.as_ref() * b.as_ref();
        let w_det = point.weight * det;
        for i in 0..ndof {
            for j in 0..ndof {
                k_e[(i, j)] += w_det * contrib[(i, j)];
            }
        }
    }

    Ok(ElementStiffness {
        dims: d,
        nodes,
        k: k_e,
    })
}

/// Scatters an element stiffness into the global block-CSR operator.
///
/// Block `(α, β)` of the element is the `d×d` sub-matrix at rows
/// `α·d..`, columns `β·d..`; it is added at `(nodes[α], nodes[β])`.
/// Pairs outside the edge pattern are skipped.
pub fn scatter_element(matrix: &mut SparseBlockMatrix, elem: &ElementStiffness) {
    let d = elem.dims;
    let mut block = Block::zeros(d);
    for (alpha, &ia) in elem.nodes.iter().enumerate() {
        for (beta, &ib) in elem.nodes.iter().enumerate() {
            let (i, j) = (ia as usize, ib as usize);
            if !matrix.contains(i, j) {
                continue;
            }
            for r in 0..d {
                for c in 0..d {
                    block.set(r, c, elem.k[(alpha * d + r, beta * d + c)]);
                }
            }
            matrix
                .add_block(i, j, &block)
                .expect("pattern membership was just checked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sirocco_mesh::generators::{equilateral_triangle, single_tet, unit_hex};

    /// Applies the element stiffness to a nodal displacement field.
    fn apply(elem: &ElementStiffness, u: &[f64]) -> Vec<f64> {
        let n = u.len();
        let mut out = vec![0.0; n];
        for i in 0..n {
            for j in 0..n {
                out[i] += elem.k[(i, j)] * u[j];
            }
        }
        out
    }

    #[test]
    fn translation_produces_no_force() {
        let mesh = equilateral_triangle();
        let elem = assemble_element(&mesh, 0, 1.0).unwrap();
        // Uniform translation (0.1, 0) of all three nodes.
        let u = [0.1, 0.0, 0.1, 0.0, 0.1, 0.0];
        let f = apply(&elem, &u);
        let norm_u: f64 = u.iter().map(|v| v * v).sum::<f64>().sqrt();
        for fi in &f {
            assert!(fi.abs() <= 1e-10 * norm_u, "residual force {fi}");
        }
    }

    #[test]
    fn rotation_produces_no_force() {
        // Dwight's λ = −E choice annihilates linearized rigid rotations:
        // u = ω × x, i.e. u = ω(−y, x) in 2-D.
        let mesh = equilateral_triangle();
        let elem = assemble_element(&mesh, 0, 1.0).unwrap();
        let x = mesh.current();
        let omega = 0.3;
        let mut u = [0.0; 6];
        for (k, &ivg) in elem.nodes.iter().enumerate() {
            let (px, py) = (x[ivg as usize * 2], x[ivg as usize * 2 + 1]);
            u[k * 2] = -omega * py;
            u[k * 2 + 1] = omega * px;
        }
        let f = apply(&elem, &u);
        let norm_u: f64 = u.iter().map(|v| v * v).sum::<f64>().sqrt();
        for fi in &f {
            assert!(fi.abs() <= 1e-10 * norm_u, "residual force {fi}");
        }
    }

    #[test]
    fn stiffness_is_symmetric() {
        for mesh in [equilateral_triangle(), single_tet(), unit_hex()] {
            let elem = assemble_element(&mesh, 0, 0.5).unwrap();
            let n = elem.nodes.len() * elem.dims;
            for i in 0..n {
                for j in 0..n {
                    let diff = (elem.k[(i, j)] - elem.k[(j, i)]).abs();
                    assert!(diff < 1e-10, "K[{i},{j}] asymmetry {diff}");
                }
            }
        }
    }

    #[test]
    fn tet_translation_null_space() {
        let mesh = single_tet();
        let elem = assemble_element(&mesh, 0, 1.0).unwrap();
        let mut u = [0.0; 12];
        for k in 0..4 {
            u[k * 3] = 0.2;
            u[k * 3 + 2] = -0.7;
        }
        let f = apply(&elem, &u);
        for fi in &f {
            assert!(fi.abs() < 1e-9, "residual force {fi}");
        }
    }

    #[test]
    fn degenerate_cell_is_reported() {
        // Collapse the triangle onto a line.
        let mut mesh = equilateral_triangle();
        let x = mesh.current_mut();
        x[4] = 0.5;
        x[5] = 0.0;
        let err = assemble_element(&mesh, 0, 1.0);
        assert!(matches!(
            err,
            Err(SiroccoError::DegenerateElement { cell: 0, .. })
        ));
    }
}
