//! Restarted flexible GMRES.
//!
//! Right-preconditioned FGMRES with modified Gram-Schmidt and Givens
//! rotations for the least-squares update. The flexible variant stores the
//! preconditioned Krylov vectors explicitly, so the preconditioner may vary
//! between iterations (LU-SGS sweeps are not a fixed linear map in floating
//! point).
//!
//! Convergence is tested on the residual norm relative to the right-hand
//! side norm. Non-convergence within the iteration cap is reported through
//! the returned statistics, never as an error — the caller decides whether
//! a partial solution is usable (the mesh deformation loop re-checks grid
//! validity afterwards).

use sirocco_types::constants::MAX_LINEAR_ITERS;

/// A linear operator `y = A·x` over flat vectors.
///
/// The elasticity solver wraps the stiffness matrix together with its
/// halo exchange in this seam, so the Krylov loop stays partition-agnostic.
pub trait LinearOperator {
    /// Computes `y = A·x`.
    fn apply(&self, x: &[f64], y: &mut [f64]);

    /// Scalar dimension of the operator.
    fn dim(&self) -> usize;

    /// Reduces a partial dot-product contribution across partitions.
    ///
    /// Every inner product in the Krylov loop goes through this hook, so
    /// a distributed operator can give all partitions identical norms.
    /// The default is the serial identity.
    fn reduce_sum(&self, local: f64) -> f64 {
        local
    }
}

/// A preconditioner application `z ≈ A⁻¹·r`.
pub trait Preconditioner {
    /// Computes `z ≈ A⁻¹·r`.
    fn apply(&self, r: &[f64], z: &mut [f64]);
}

/// The identity preconditioner (plain restarted GMRES).
pub struct IdentityPreconditioner;

impl Preconditioner for IdentityPreconditioner {
    fn apply(&self, r: &[f64], z: &mut [f64]) {
        z.copy_from_slice(r);
    }
}

/// Statistics returned by a linear solve.
#[derive(Debug, Clone, Copy)]
pub struct SolveStats {
    /// Total inner iterations performed.
    pub iterations: u32,
    /// Final relative residual norm `‖r‖ / ‖b‖`.
    pub residual: f64,
    /// Whether the relative residual met the tolerance.
    pub converged: bool,
}

/// Restarted flexible GMRES.
#[derive(Debug, Clone, Copy)]
pub struct FgmresSolver {
    /// Relative residual tolerance.
    pub tolerance: f64,
    /// Total inner-iteration cap across restart cycles.
    pub max_iters: usize,
}

impl FgmresSolver {
    /// Creates a solver with the given tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iters: usize) -> Self {
        Self { tolerance, max_iters }
    }

    /// Solves `A·x = b`, using `x` as the initial guess and writing the
    /// solution back into it.
    ///
    /// The restart length is `min(max_iters, MAX_LINEAR_ITERS)`.
    pub fn solve(
        &self,
        op: &dyn LinearOperator,
        precond: &dyn Preconditioner,
        b: &[f64],
        x: &mut [f64],
    ) -> SolveStats {
        let n = op.dim();
        debug_assert_eq!(b.len(), n);
        debug_assert_eq!(x.len(), n);

        let norm_b = op.reduce_sum(dot(b, b)).sqrt();
        if norm_b < f64::EPSILON {
            // Trivial right-hand side: the zero vector solves the system.
            x.fill(0.0);
            return SolveStats {
                iterations: 0,
                residual: 0.0,
                converged: true,
            };
        }

        let restart = self.max_iters.min(MAX_LINEAR_ITERS).max(1);
        let mut total_iters = 0_u32;
        let mut rel_res = f64::MAX;

        // Krylov basis, preconditioned vectors, Hessenberg, Givens terms.
        let mut v: Vec<Vec<f64>> = Vec::with_capacity(restart + 1);
        let mut z: Vec<Vec<f64>> = Vec::with_capacity(restart);
        let mut h = vec![vec![0.0_f64; restart]; restart + 1];
        let mut cs = vec![0.0_f64; restart];
        let mut sn = vec![0.0_f64; restart];
        let mut g = vec![0.0_f64; restart + 1];
        let mut w = vec![0.0_f64; n];

        'restart: loop {
            // Residual of the current iterate.
            op.apply(x, &mut w);
            let mut r0 = vec![0.0_f64; n];
            for i in 0..n {
                r0[i] = b[i] - w[i];
            }
            let beta = op.reduce_sum(dot(&r0, &r0)).sqrt();
            rel_res = beta / norm_b;
            if rel_res < self.tolerance || total_iters as usize >= self.max_iters {
                break;
            }

            v.clear();
            z.clear();
            for row in &mut h {
                row.fill(0.0);
            }
            g.fill(0.0);
            g[0] = beta;
            for val in &mut r0 {
                *val /= beta;
            }
            v.push(r0);

            let mut k_used = 0;
            for j in 0..restart {
                // Flexible step: store z_j = M⁻¹ v_j, then w = A z_j.
                let mut zj = vec![0.0_f64; n];
                precond.apply(&v[j], &mut zj);
                op.apply(&zj, &mut w);
                z.push(zj);

                // Modified Gram-Schmidt against the current basis.
                for i in 0..=j {
                    let hij = op.reduce_sum(dot(&w, &v[i]));
                    h[i][j] = hij;
                    axpy(-hij, &v[i], &mut w);
                }
                let wnorm = op.reduce_sum(dot(&w, &w)).sqrt();
                h[j + 1][j] = wnorm;

                // Apply the accumulated Givens rotations to column j,
                // then eliminate h[j+1][j] with a new rotation.
                for i in 0..j {
                    let tmp = cs[i] * h[i][j] + sn[i] * h[i + 1][j];
                    h[i + 1][j] = -sn[i] * h[i][j] + cs[i] * h[i + 1][j];
                    h[i][j] = tmp;
                }
                let denom = (h[j][j] * h[j][j] + wnorm * wnorm).sqrt();
                if denom < f64::MIN_POSITIVE * 16.0 {
                    cs[j] = 1.0;
                    sn[j] = 0.0;
                } else {
                    cs[j] = h[j][j] / denom;
                    sn[j] = wnorm / denom;
                }
                h[j][j] = cs[j] * h[j][j] + sn[j] * wnorm;
                h[j + 1][j] = 0.0;
                g[j + 1] = -sn[j] * g[j];
                g[j] = cs[j] * g[j];

                total_iters += 1;
                k_used = j + 1;
                rel_res = g[j + 1].abs() / norm_b;

                let done = rel_res < self.tolerance
                    || total_iters as usize >= self.max_iters
                    || wnorm < f64::MIN_POSITIVE * 16.0;
                if done {
                    break;
                }

                let mut vnext = w.clone();
                for val in &mut vnext {
                    *val /= wnorm;
                }
                v.push(vnext);
            }

            // Back-substitute the triangularized Hessenberg system and
            // update the iterate from the preconditioned vectors.
            let mut y = vec![0.0_f64; k_used];
            for i in (0..k_used).rev() {
                let mut acc = g[i];
                for j in i + 1..k_used {
                    acc -= h[i][j] * y[j];
                }
                y[i] = if h[i][i].abs() > f64::MIN_POSITIVE * 16.0 {
                    acc / h[i][i]
                } else {
                    0.0
                };
            }
            for (j, yj) in y.iter().enumerate() {
                axpy(*yj, &z[j], x);
            }

            if rel_res < self.tolerance || total_iters as usize >= self.max_iters {
                break 'restart;
            }
        }

        SolveStats {
            iterations: total_iters,
            residual: rel_res,
            converged: rel_res < self.tolerance,
        }
    }
}

/// Dot product of two flat vectors.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm of a flat vector.
#[inline]
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// `y += alpha * x`.
#[inline]
pub fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}
