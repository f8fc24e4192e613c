//! Grid-quality monitoring.
//!
//! The elasticity solver scales element stiffness by the minimum element
//! measure and sets its linear tolerance from the shortest edge, so both
//! quantities are recomputed before every deformation increment.
//!
//! The measure uses only the first 3 (2-D) or 4 (3-D) vertices of each
//! cell — non-simplex cells are judged by their leading corner simplex.
//! This is a contract, not an approximation to be improved: stiffness
//! scaling downstream depends on reproducing exactly this number.

use glam::{DVec2, DVec3};

use crate::mesh::DynamicMesh;

/// Result of a grid check.
#[derive(Debug, Clone, Copy)]
pub struct QualityReport {
    /// Signed minimum element measure (area in 2-D, volume in 3-D).
    pub min_measure: f64,
    /// Number of cells with non-positive measure.
    pub negative_cells: u32,
}

impl QualityReport {
    /// True when every element has strictly positive measure.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min_measure > 0.0 && self.negative_cells == 0
    }
}

/// Computes the signed minimum element measure over all cells.
///
/// 2-D: triangle area `½ (a × b)` with `a = v0 − v1`, `b = v1 − v2`
/// (positive for counter-clockwise corners). 3-D: tetrahedron volume
/// `(1/6) (r1 × r2) · r3` from the first four vertices.
pub fn check_grid(mesh: &DynamicMesh) -> QualityReport {
    let x = mesh.current();
    let d = mesh.n_dims();
    let mut min_measure = f64::MAX;
    let mut negative_cells = 0_u32;

    for ic in 0..mesh.n_cells() {
        let nodes = mesh.cell_global_nodes(ic);
        let measure = if d == 2 {
            let p = |k: usize| {
                let i = nodes[k] as usize * d;
                DVec2::new(x[i], x[i + 1])
            };
            let a = p(0) - p(1);
            let b = p(1) - p(2);
            0.5 * a.perp_dot(b)
        } else {
            let p = |k: usize| {
                let i = nodes[k] as usize * d;
                DVec3::new(x[i], x[i + 1], x[i + 2])
            };
            let r1 = p(1) - p(0);
            let r2 = p(2) - p(0);
            let r3 = p(3) - p(0);
            r1.cross(r2).dot(r3) / 6.0
        };

        if measure < 0.0 {
            negative_cells += 1;
        }
        min_measure = min_measure.min(measure);
    }

    QualityReport {
        min_measure,
        negative_cells,
    }
}

/// Returns the length of the shortest edge of the current grid.
pub fn min_edge_length(mesh: &DynamicMesh) -> f64 {
    let x = mesh.current();
    let d = mesh.n_dims();
    let mut min_sq = f64::MAX;

    for edge in &mesh.topology().e2v {
        let (a, b) = (edge[0].index() * d, edge[1].index() * d);
        let mut dist_sq = 0.0;
        for k in 0..d {
            let delta = x[a + k] - x[b + k];
            dist_sq += delta * delta;
        }
        min_sq = min_sq.min(dist_sq);
    }

    min_sq.sqrt()
}
