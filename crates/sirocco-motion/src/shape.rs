//! Isoparametric reference-element shape functions.
//!
//! For each supported element, evaluates the shape functions and their
//! physical-space gradients at a natural-coordinate point, returning an
//! `nv×4` table (columns 0..d−1: `∂N/∂x_k` after the Jacobian mapping,
//! column 3: `N`) and the Jacobian determinant. The polynomial forms are
//! the classical ones: linear triangle and tetrahedron, bilinear quad,
//! serendipity pyramid with the `4(1−μ)` denominator, wedge, trilinear
//! hex. They are a fixed contract with the Gauss rules below — the
//! element stiffness depends on reproducing exactly these values.
//!
//! Shape-function node numbering follows the corner *cycle* (quad node 2
//! diagonally opposite node 0); [`corner_order`] maps cycle slots to the
//! mesh's tensor-product storage slots.

use sirocco_mesh::ElementType;
use sirocco_types::{SiroccoError, SiroccoResult};

/// Maximum nodes of any supported element (hex).
pub const MAX_NODES: usize = 8;

/// `1/√3`: the tensor-product Gauss abscissa.
const G1: f64 = 0.577350269189626;

/// One quadrature point in natural coordinates.
#[derive(Debug, Clone, Copy)]
pub struct GaussPoint {
    pub xi: f64,
    pub eta: f64,
    pub mu: f64,
    pub weight: f64,
}

const fn gp(xi: f64, eta: f64, mu: f64, weight: f64) -> GaussPoint {
    GaussPoint { xi, eta, mu, weight }
}

const TRI_RULE: [GaussPoint; 1] = [gp(1.0 / 3.0, 1.0 / 3.0, 0.0, 0.5)];

const QUAD_RULE: [GaussPoint; 4] = [
    gp(-G1, -G1, 0.0, 1.0),
    gp(G1, -G1, 0.0, 1.0),
    gp(G1, G1, 0.0, 1.0),
    gp(-G1, G1, 0.0, 1.0),
];

const TET_RULE: [GaussPoint; 1] = [gp(0.25, 0.25, 0.25, 1.0 / 6.0)];

/// Five-point pyramid rule (Delmas).
const PYR_RULE: [GaussPoint; 5] = [
    gp(0.5, 0.0, 0.1531754163448146, 2.0 / 15.0),
    gp(0.0, 0.5, 0.1531754163448146, 2.0 / 15.0),
    gp(-0.5, 0.0, 0.1531754163448146, 2.0 / 15.0),
    gp(0.0, -0.5, 0.1531754163448146, 2.0 / 15.0),
    gp(0.0, 0.0, 0.6372983346207416, 2.0 / 15.0),
];

const PRISM_RULE: [GaussPoint; 6] = [
    gp(0.5, 0.5, -G1, 1.0 / 6.0),
    gp(-G1, 0.0, 0.5, 1.0 / 6.0),
    gp(0.5, -G1, 0.0, 1.0 / 6.0),
    gp(0.5, 0.5, G1, 1.0 / 6.0),
    gp(G1, 0.0, 0.5, 1.0 / 6.0),
    gp(0.5, G1, 0.0, 1.0 / 6.0),
];

const HEX_RULE: [GaussPoint; 8] = [
    gp(-G1, -G1, -G1, 1.0),
    gp(-G1, -G1, G1, 1.0),
    gp(-G1, G1, -G1, 1.0),
    gp(-G1, G1, G1, 1.0),
    gp(G1, -G1, -G1, 1.0),
    gp(G1, -G1, G1, 1.0),
    gp(G1, G1, -G1, 1.0),
    gp(G1, G1, G1, 1.0),
];

/// Returns the fixed quadrature rule of the given element type.
pub fn gauss_rule(etype: ElementType) -> &'static [GaussPoint] {
    match etype {
        ElementType::Tri => &TRI_RULE,
        ElementType::Quad => &QUAD_RULE,
        ElementType::Tet => &TET_RULE,
        ElementType::Pyramid => &PYR_RULE,
        ElementType::Prism => &PRISM_RULE,
        ElementType::Hex => &HEX_RULE,
    }
}

/// Maps shape-function (corner-cycle) node slots to mesh storage slots.
///
/// Quads and hexes are stored tensor-product (node 2 above node 0); the
/// bilinear/trilinear forms below expect the corner cycle.
pub fn corner_order(etype: ElementType) -> &'static [usize] {
    match etype {
        ElementType::Tri => &[0, 1, 2],
        ElementType::Quad => &[0, 1, 3, 2],
        ElementType::Tet => &[0, 1, 2, 3],
        ElementType::Pyramid => &[0, 1, 2, 3, 4],
        ElementType::Prism => &[0, 1, 2, 3, 4, 5],
        ElementType::Hex => &[0, 1, 3, 2, 4, 5, 7, 6],
    }
}

/// Shape values and physical-space gradients at one quadrature point.
///
/// `table[k] = [∂N_k/∂x, ∂N_k/∂y, ∂N_k/∂z, N_k]` (the z column is zero
/// in 2-D).
#[derive(Debug, Clone, Copy)]
pub struct ShapeDeriv {
    pub n_nodes: usize,
    pub table: [[f64; 4]; MAX_NODES],
}

/// Evaluates shape functions and gradients at a Gauss point.
///
/// `corners` are the physical corner coordinates in shape-function
/// (cycle) order, `corners[k] = [x, y, z]`. Returns the table and the
/// Jacobian determinant. Only linear elements are supported — quadratic
/// shape-node counts are a configuration error here (first-order
/// stiffness assembly only).
pub fn eval(
    etype: ElementType,
    n_nodes: usize,
    point: &GaussPoint,
    corners: &[[f64; 3]],
) -> SiroccoResult<(ShapeDeriv, f64)> {
    if n_nodes != etype.vertex_count() {
        return Err(SiroccoError::InvalidConfig(format!(
            "{etype:?} with {n_nodes} nodes: stiffness assembly is first-order only"
        )));
    }

    let mut shape = ShapeDeriv {
        n_nodes,
        table: [[0.0; 4]; MAX_NODES],
    };
    let t = &mut shape.table;
    let (xi, eta, mu) = (point.xi, point.eta, point.mu);

    match etype {
        ElementType::Tri => {
            t[0][3] = 1.0 - xi - eta;
            t[1][3] = xi;
            t[2][3] = eta;

            t[0][0] = -1.0;
            t[0][1] = -1.0;
            t[1][0] = 1.0;
            t[1][1] = 0.0;
            t[2][0] = 0.0;
            t[2][1] = 1.0;
        }
        ElementType::Quad => {
            t[0][3] = 0.25 * (1.0 - xi) * (1.0 - eta);
            t[1][3] = 0.25 * (1.0 + xi) * (1.0 - eta);
            t[2][3] = 0.25 * (1.0 + xi) * (1.0 + eta);
            t[3][3] = 0.25 * (1.0 - xi) * (1.0 + eta);

            t[0][0] = -0.25 * (1.0 - eta);
            t[0][1] = -0.25 * (1.0 - xi);
            t[1][0] = 0.25 * (1.0 - eta);
            t[1][1] = -0.25 * (1.0 + xi);
            t[2][0] = 0.25 * (1.0 + eta);
            t[2][1] = 0.25 * (1.0 + xi);
            t[3][0] = -0.25 * (1.0 + eta);
            t[3][1] = 0.25 * (1.0 - xi);
        }
        ElementType::Tet => {
            t[0][3] = xi;
            t[1][3] = eta;
            t[2][3] = mu;
            t[3][3] = 1.0 - xi - eta - mu;

            t[0][0] = 1.0;
            t[1][1] = 1.0;
            t[2][2] = 1.0;
            t[3][0] = -1.0;
            t[3][1] = -1.0;
            t[3][2] = -1.0;
        }
        ElementType::Pyramid => {
            let den = 4.0 * (1.0 - mu);
            t[0][3] = (-xi + eta + mu - 1.0) * (-xi - eta + mu - 1.0) / den;
            t[1][3] = (-xi - eta + mu - 1.0) * (xi - eta + mu - 1.0) / den;
            t[2][3] = (xi + eta + mu - 1.0) * (xi - eta + mu - 1.0) / den;
            t[3][3] = (xi + eta + mu - 1.0) * (-xi + eta + mu - 1.0) / den;
            t[4][3] = mu;

            let m1 = mu - 1.0;
            t[0][0] = 0.5 + (0.5 * xi) / (1.0 - mu);
            t[0][1] = (0.5 * eta) / m1;
            t[0][2] = (-0.25 - 0.25 * eta * eta + (0.5 - 0.25 * mu) * mu + 0.25 * xi * xi)
                / (m1 * m1);

            t[1][0] = (0.5 * xi) / m1;
            t[1][1] = (-0.5 - 0.5 * eta + 0.5 * mu) / m1;
            t[1][2] = (-0.25 + 0.25 * eta * eta + (0.5 - 0.25 * mu) * mu - 0.25 * xi * xi)
                / (m1 * m1);

            t[2][0] = -0.5 + (0.5 * xi) / (1.0 - mu);
            t[2][1] = (0.5 * eta) / m1;
            t[2][2] = (-0.25 - 0.25 * eta * eta + (0.5 - 0.25 * mu) * mu + 0.25 * xi * xi)
                / (m1 * m1);

            t[3][0] = (0.5 * xi) / m1;
            t[3][1] = (0.5 - 0.5 * eta - 0.5 * mu) / m1;
            t[3][2] = (-0.25 + 0.25 * eta * eta + (0.5 - 0.25 * mu) * mu - 0.25 * xi * xi)
                / (m1 * m1);

            t[4][0] = 0.0;
            t[4][1] = 0.0;
            t[4][2] = 1.0;
        }
        ElementType::Prism => {
            t[0][3] = 0.5 * eta * (1.0 - xi);
            t[1][3] = 0.5 * mu * (1.0 - xi);
            t[2][3] = 0.5 * (1.0 - eta - mu) * (1.0 - xi);
            t[3][3] = 0.5 * eta * (xi + 1.0);
            t[4][3] = 0.5 * mu * (xi + 1.0);
            t[5][3] = 0.5 * (1.0 - eta - mu) * (xi + 1.0);

            t[0][0] = -0.5 * eta;
            t[0][1] = 0.5 * (1.0 - xi);
            t[0][2] = 0.0;
            t[1][0] = -0.5 * mu;
            t[1][1] = 0.0;
            t[1][2] = 0.5 * (1.0 - xi);
            t[2][0] = -0.5 * (1.0 - eta - mu);
            t[2][1] = -0.5 * (1.0 - xi);
            t[2][2] = -0.5 * (1.0 - xi);
            t[3][0] = 0.5 * eta;
            t[3][1] = 0.5 * (xi + 1.0);
            t[3][2] = 0.0;
            t[4][0] = 0.5 * mu;
            t[4][1] = 0.0;
            t[4][2] = 0.5 * (xi + 1.0);
            t[5][0] = 0.5 * (1.0 - eta - mu);
            t[5][1] = -0.5 * (xi + 1.0);
            t[5][2] = -0.5 * (xi + 1.0);
        }
        ElementType::Hex => {
            // Sign tables of the corner cycle; shape is the product of the
            // three 1-D linear factors.
            const S0: [f64; 8] = [-0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5];
            const S1: [f64; 8] = [-0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5];
            const S2: [f64; 8] = [-0.5, -0.5, -0.5, -0.5, 0.5, 0.5, 0.5, 0.5];
            for i in 0..8 {
                let a0 = 0.5 + S0[i] * xi;
                let a1 = 0.5 + S1[i] * eta;
                let a2 = 0.5 + S2[i] * mu;
                t[i][0] = S0[i] * a1 * a2;
                t[i][1] = S1[i] * a0 * a2;
                t[i][2] = S2[i] * a0 * a1;
                t[i][3] = a0 * a1 * a2;
            }
        }
    }

    let det = map_to_physical(&mut shape, corners, etype.dims());
    Ok((shape, det))
}

/// Maps reference derivatives to physical space in place and returns the
/// Jacobian determinant.
fn map_to_physical(shape: &mut ShapeDeriv, corners: &[[f64; 3]], dims: usize) -> f64 {
    let n = shape.n_nodes;
    // Jacobian: xs[i][j] = ∂x_j/∂ξ_i.
    let mut xs = [[0.0_f64; 3]; 3];
    for i in 0..dims {
        for j in 0..dims {
            for k in 0..n {
                xs[i][j] += corners[k][j] * shape.table[k][i];
            }
        }
    }

    // Adjugate and determinant.
    let mut ad = [[0.0_f64; 3]; 3];
    let det;
    if dims == 2 {
        ad[0][0] = xs[1][1];
        ad[0][1] = -xs[0][1];
        ad[1][0] = -xs[1][0];
        ad[1][1] = xs[0][0];
        det = ad[0][0] * ad[1][1] - ad[0][1] * ad[1][0];
    } else {
        ad[0][0] = xs[1][1] * xs[2][2] - xs[1][2] * xs[2][1];
        ad[0][1] = xs[0][2] * xs[2][1] - xs[0][1] * xs[2][2];
        ad[0][2] = xs[0][1] * xs[1][2] - xs[0][2] * xs[1][1];
        ad[1][0] = xs[1][2] * xs[2][0] - xs[1][0] * xs[2][2];
        ad[1][1] = xs[0][0] * xs[2][2] - xs[0][2] * xs[2][0];
        ad[1][2] = xs[0][2] * xs[1][0] - xs[0][0] * xs[1][2];
        ad[2][0] = xs[1][0] * xs[2][1] - xs[1][1] * xs[2][0];
        ad[2][1] = xs[0][1] * xs[2][0] - xs[0][0] * xs[2][1];
        ad[2][2] = xs[0][0] * xs[1][1] - xs[0][1] * xs[1][0];
        det = xs[0][0] * ad[0][0] + xs[0][1] * ad[1][0] + xs[0][2] * ad[2][0];
    }

    // Inverse Jacobian rows, then chain rule per node.
    for i in 0..dims {
        for j in 0..dims {
            xs[i][j] = ad[i][j] / det;
        }
    }
    for k in 0..n {
        let mut mapped = [0.0_f64; 3];
        for (i, m) in mapped.iter_mut().enumerate().take(dims) {
            for j in 0..dims {
                *m += xs[i][j] * shape.table[k][j];
            }
        }
        shape.table[k][..dims].copy_from_slice(&mapped[..dims]);
    }

    det
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition_of_unity(etype: ElementType, corners: &[[f64; 3]]) {
        let n = etype.vertex_count();
        for point in gauss_rule(etype) {
            let (shape, det) = eval(etype, n, point, corners).unwrap();
            let sum_n: f64 = (0..n).map(|k| shape.table[k][3]).sum();
            assert!(
                (sum_n - 1.0).abs() < 1e-12,
                "{etype:?}: ΣN = {sum_n} at ({}, {}, {})",
                point.xi,
                point.eta,
                point.mu
            );
            // Gradients of a partition of unity sum to zero.
            for dim in 0..etype.dims() {
                let sum_d: f64 = (0..n).map(|k| shape.table[k][dim]).sum();
                assert!(sum_d.abs() < 1e-10, "{etype:?}: Σ∂N = {sum_d}");
            }
            assert!(det != 0.0);
        }
    }

    #[test]
    fn partition_of_unity_all_types() {
        partition_of_unity(
            ElementType::Tri,
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.3, 0.9, 0.0]],
        );
        partition_of_unity(
            ElementType::Quad,
            &[[0.0, 0.0, 0.0], [1.1, 0.0, 0.0], [1.0, 1.2, 0.0], [-0.1, 1.0, 0.0]],
        );
        partition_of_unity(
            ElementType::Tet,
            &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]],
        );
        partition_of_unity(
            ElementType::Pyramid,
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.5, 0.5, 1.0],
            ],
        );
        partition_of_unity(
            ElementType::Prism,
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
            ],
        );
        partition_of_unity(
            ElementType::Hex,
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0],
            ],
        );
    }

    #[test]
    fn quadrature_recovers_measures() {
        // Σ w·|J| equals the element measure for affine elements.
        let tri = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
        let sum: f64 = gauss_rule(ElementType::Tri)
            .iter()
            .map(|p| {
                let (_, det) = eval(ElementType::Tri, 3, p, &tri).unwrap();
                p.weight * det
            })
            .sum();
        assert!((sum - 2.0).abs() < 1e-12); // area of the right triangle

        let quad = [[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [3.0, 2.0, 0.0], [0.0, 2.0, 0.0]];
        let sum: f64 = gauss_rule(ElementType::Quad)
            .iter()
            .map(|p| {
                let (_, det) = eval(ElementType::Quad, 4, p, &quad).unwrap();
                p.weight * det
            })
            .sum();
        assert!((sum - 6.0).abs() < 1e-12);

        let hex = [
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.5],
            [2.0, 0.0, 1.5],
            [2.0, 1.0, 1.5],
            [0.0, 1.0, 1.5],
        ];
        let sum: f64 = gauss_rule(ElementType::Hex)
            .iter()
            .map(|p| {
                let (_, det) = eval(ElementType::Hex, 8, p, &hex).unwrap();
                p.weight * det
            })
            .sum();
        assert!((sum - 3.0).abs() < 1e-12);
    }

    #[test]
    fn pyramid_quadrature_volume() {
        // Unit-base pyramid of height 1: volume 1/3.
        let pyr = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.5, 0.5, 1.0],
        ];
        let sum: f64 = gauss_rule(ElementType::Pyramid)
            .iter()
            .map(|p| {
                let (_, det) = eval(ElementType::Pyramid, 5, p, &pyr).unwrap();
                p.weight * det
            })
            .sum();
        assert!((sum - 1.0 / 3.0).abs() < 1e-10, "pyramid volume was {sum}");
    }

    #[test]
    fn quadratic_node_count_is_rejected() {
        let corners = [[0.0; 3]; 6];
        let point = gauss_rule(ElementType::Tri)[0];
        assert!(eval(ElementType::Tri, 6, &point, &corners).is_err());
    }

    #[test]
    fn linear_field_gradient_is_exact() {
        // For u(x) = 3x + 2y, Σ u_k ∂N_k/∂x must be 3 everywhere.
        let quad = [[0.2, 0.1, 0.0], [1.3, 0.0, 0.0], [1.5, 1.4, 0.0], [0.0, 1.1, 0.0]];
        let u: Vec<f64> = quad.iter().map(|c| 3.0 * c[0] + 2.0 * c[1]).collect();
        for point in gauss_rule(ElementType::Quad) {
            let (shape, _) = eval(ElementType::Quad, 4, point, &quad).unwrap();
            let gx: f64 = (0..4).map(|k| u[k] * shape.table[k][0]).sum();
            let gy: f64 = (0..4).map(|k| u[k] * shape.table[k][1]).sum();
            assert!((gx - 3.0).abs() < 1e-12);
            assert!((gy - 2.0).abs() < 1e-12);
        }
    }
}
