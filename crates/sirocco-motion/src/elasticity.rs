//! Pseudo-solid elasticity deformation.
//!
//! One substage of mode E runs `n_deform_iters` small elastic solves,
//! each taken about the updated grid state — the linear elasticity
//! equations only hold for small deformations, so large surface motion is
//! split into increments. Every increment:
//!
//! 1. rebuilds the stiffness operator about the current positions, with
//!    the per-element scale set from the global minimum element measure,
//! 2. enforces the prescribed boundary displacement (increment-scaled) by
//!    Dirichlet row elimination,
//! 3. exchanges Dirichlet data across partitions,
//! 4. solves with FGMRES preconditioned by a block LU-SGS sweep,
//! 5. adds the displacement into the current positions and re-checks the
//!    grid.
//!
//! Solver non-convergence and degenerate elements are reported and
//! tolerated; the post-solve volume check catches any real damage.

use sirocco_math::block_matrix::{LuSgsPreconditioner, SparseBlockMatrix};
use sirocco_math::fgmres::{FgmresSolver, LinearOperator};
use sirocco_mesh::quality::{check_grid, min_edge_length};
use sirocco_mesh::DynamicMesh;
use sirocco_telemetry::{EventBus, EventKind, MotionEvent};
use sirocco_types::constants::{EPSILON, MAX_LINEAR_ITERS, TOLERANCE_MIN_LENGTH_FACTOR};
use sirocco_types::{SiroccoError, SiroccoResult};

use crate::config::{MotionConfig, OscillationSpec};
use crate::halo::PartitionExchange;
use crate::stiffness::{assemble_element, scatter_element};

/// Stiffness operator with the halo exchange of the search direction
/// folded into every product, keeping the Krylov loop partition-agnostic.
struct HaloOperator<'a> {
    matrix: &'a SparseBlockMatrix,
    halo: &'a dyn PartitionExchange,
}

impl LinearOperator for HaloOperator<'_> {
    fn apply(&self, x: &[f64], y: &mut [f64]) {
        let mut synced = x.to_vec();
        self.halo.sync_vertex_field(&mut synced);
        self.matrix.mat_vec(&synced, y);
    }

    fn dim(&self) -> usize {
        self.matrix.scalar_dim()
    }

    fn reduce_sum(&self, local: f64) -> f64 {
        self.halo.reduce_sum(local)
    }
}

/// Outcome of one substage of elastic deformation.
#[derive(Debug, Clone, Copy)]
pub struct DeformStats {
    /// Total linear iterations across all increments.
    pub linear_iters: u32,
    /// Minimum element measure after the final increment.
    pub min_vol: f64,
    /// Degenerate elements skipped during assembly.
    pub degenerate_cells: u32,
    /// False when the final grid has a non-positive element.
    pub valid: bool,
}

/// The iterative pseudo-solid deformation driver for one substage.
pub struct ElasticitySolver<'a> {
    pub config: &'a MotionConfig,
    pub halo: &'a dyn PartitionExchange,
    pub bus: &'a mut EventBus,
}

impl ElasticitySolver<'_> {
    /// Deforms the mesh so every moving-boundary vertex reaches its
    /// prescribed position at `rk_time`.
    ///
    /// `moving` pairs mesh-boundary indices with their oscillation
    /// descriptors. `iter`/`rk_step` only tag telemetry events.
    pub fn deform(
        &mut self,
        mesh: &mut DynamicMesh,
        moving: &[(usize, OscillationSpec)],
        rk_time: f64,
        iter: u32,
        rk_step: i32,
    ) -> SiroccoResult<DeformStats> {
        let d = mesh.n_dims();
        let n = mesh.n_verts();
        let n_increments = self.config.n_deform_iters;
        let increment = 1.0 / n_increments as f64;

        let mut matrix = SparseBlockMatrix::from_edges(n, d, &mesh.topology().e2v);
        let mut rhs = vec![0.0_f64; n * d];
        let mut sol = vec![0.0_f64; n * d];

        // Full remaining boundary displacement for this substage, frozen
        // before the increment ladder: each increment prescribes exactly
        // 1/N of it about the updated state, so the N solves sum to the
        // prescription independent of N.
        let mut bnd_disp: Vec<(usize, [f64; 3])> = Vec::new();
        {
            let x = mesh.current();
            let x0 = mesh.x0();
            for &(bnd_idx, ref osc) in moving {
                let prescribed = osc.displacement(rk_time);
                for &iv in &mesh.boundaries()[bnd_idx].verts {
                    let ivg = iv.index();
                    let mut disp = [0.0_f64; 3];
                    for k in 0..d {
                        disp[k] = prescribed[k] + x0[ivg * d + k] - x[ivg * d + k];
                    }
                    bnd_disp.push((ivg, disp));
                }
            }
        }

        let mut stats = DeformStats {
            linear_iters: 0,
            min_vol: 0.0,
            degenerate_cells: 0,
            valid: true,
        };
        let mut last_negative_cells = 0_u32;

        for inc in 0..n_increments {
            rhs.fill(0.0);
            sol.fill(0.0);
            matrix.set_zero();

            let report = check_grid(mesh);
            let min_vol = self.halo.reduce_min(report.min_measure);
            let min_length = self.halo.reduce_min(min_edge_length(mesh));

            // Assemble every cell about the current state; degenerate
            // cells are reported and skipped, the run continues.
            let mut degenerate = 0_u32;
            for ic in 0..mesh.n_cells() {
                match assemble_element(mesh, ic, min_vol.abs()) {
                    Ok(elem) => scatter_element(&mut matrix, &elem),
                    Err(SiroccoError::DegenerateElement { cell, det }) => {
                        degenerate += 1;
                        self.bus.emit(MotionEvent::new(
                            iter,
                            rk_step,
                            EventKind::DegenerateElement {
                                cell,
                                det,
                                count: degenerate,
                            },
                        ));
                    }
                    Err(fatal) => return Err(fatal),
                }
            }
            stats.degenerate_cells += degenerate;

            let tolerance = TOLERANCE_MIN_LENGTH_FACTOR * min_length;

            // Dirichlet enforcement: pin every boundary vertex to zero
            // displacement, then overwrite the moving boundaries with
            // their increment-scaled prescription.
            for bnd in mesh.boundaries() {
                for &iv in &bnd.verts {
                    let ivg = iv.index();
                    matrix.clear_row_block(ivg);
                    for k in 0..d {
                        rhs[ivg * d + k] = 0.0;
                        sol[ivg * d + k] = 0.0;
                    }
                }
            }
            for &(ivg, disp) in &bnd_disp {
                matrix.clear_row_block(ivg);
                for k in 0..d {
                    rhs[ivg * d + k] = disp[k] * increment;
                    sol[ivg * d + k] = disp[k] * increment;
                }
            }

            // Shared vertices must see identical Dirichlet data on every
            // partition before the solve.
            self.halo.sync_vertex_field(&mut sol);
            self.halo.sync_vertex_field(&mut rhs);

            let solver = FgmresSolver::new(tolerance, MAX_LINEAR_ITERS);
            let op = HaloOperator {
                matrix: &matrix,
                halo: self.halo,
            };
            let precond = LuSgsPreconditioner::new(&matrix);
            let solve = solver.solve(&op, &precond, &rhs, &mut sol);
            stats.linear_iters += solve.iterations;

            self.bus.emit(MotionEvent::new(
                iter,
                rk_step,
                EventKind::SolverConvergence {
                    iterations: solve.iterations,
                    final_residual: solve.residual,
                    tolerance,
                    converged: solve.converged,
                },
            ));

            // Add the displacement into the current positions; coordinates
            // collapsing to the origin within ε² are flushed to exact zero.
            let flush = EPSILON * EPSILON;
            let x = mesh.current_mut();
            for (xi, si) in x.iter_mut().zip(&sol) {
                let mut new_coord = *xi + si;
                if new_coord.abs() < flush {
                    new_coord = 0.0;
                }
                *xi = new_coord;
            }

            let post = check_grid(mesh);
            stats.min_vol = self.halo.reduce_min(post.min_measure);
            last_negative_cells = post.negative_cells;

            self.bus.emit(MotionEvent::new(
                iter,
                rk_step,
                EventKind::DeformIteration {
                    increment: inc,
                    n_increments,
                    linear_iters: solve.iterations,
                    min_vol: stats.min_vol,
                    tolerance,
                },
            ));
        }

        if stats.min_vol <= 0.0 {
            stats.valid = false;
            self.bus.emit(MotionEvent::new(
                iter,
                rk_step,
                EventKind::NegativeVolume {
                    min_vol: stats.min_vol,
                    cell_count: last_negative_cells,
                },
            ));
        }

        Ok(stats)
    }
}
