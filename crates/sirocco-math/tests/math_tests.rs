//! Integration tests for sirocco-math.
//!
//! Dense reference computations use `faer` so the hand-built block-CSR
//! operator is checked against an independent backend.

use faer::Mat;
use sirocco_math::block::Block;
use sirocco_math::block_matrix::{LuSgsPreconditioner, SparseBlockMatrix};
use sirocco_math::fgmres::{FgmresSolver, IdentityPreconditioner, LinearOperator};
use sirocco_types::VertexId;

/// Builds a block-CSR matrix and its dense faer mirror for a 4-vertex
/// cycle graph with 2×2 blocks. Entries are deterministic but asymmetric
/// enough to catch transposition mistakes.
fn cycle4() -> (SparseBlockMatrix, Mat<f64>) {
    let dim = 2;
    let n = 4;
    let edges = [
        [VertexId(0), VertexId(1)],
        [VertexId(1), VertexId(2)],
        [VertexId(2), VertexId(3)],
        [VertexId(3), VertexId(0)],
    ];
    let mut sparse = SparseBlockMatrix::from_edges(n, dim, &edges);
    let mut dense = Mat::<f64>::zeros(n * dim, n * dim);

    let put = |sparse: &mut SparseBlockMatrix, dense: &mut Mat<f64>, i: usize, j: usize, seed: f64| {
        let mut b = Block::zeros(dim);
        for r in 0..dim {
            for c in 0..dim {
                let val = seed + (r * dim + c) as f64 * 0.25;
                b.set(r, c, val);
                dense[(i * dim + r, j * dim + c)] += val;
            }
        }
        sparse.add_block(i, j, &b).unwrap();
    };

    for i in 0..n {
        put(&mut sparse, &mut dense, i, i, 10.0 + i as f64);
    }
    for e in &edges {
        let (a, b) = (e[0].index(), e[1].index());
        put(&mut sparse, &mut dense, a, b, -1.0 - a as f64 * 0.1);
        put(&mut sparse, &mut dense, b, a, -1.5 - b as f64 * 0.1);
    }
    (sparse, dense)
}

// ─── SparseBlockMatrix Tests ──────────────────────────────────

#[test]
fn block_csr_matches_dense_matvec() {
    let (sparse, dense) = cycle4();
    let n = sparse.scalar_dim();

    let x: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).cos()).collect();
    let x_mat = Mat::<f64>::from_fn(n, 1, |i, _| x[i]);
    let y_ref = &dense * &x_mat;

    let mut y = vec![0.0; n];
    sparse.mat_vec(&x, &mut y);

    for i in 0..n {
        assert!(
            (y[i] - y_ref[(i, 0)]).abs() < 1e-12,
            "row {i}: sparse {} vs dense {}",
            y[i],
            y_ref[(i, 0)]
        );
    }
}

#[test]
fn dirichlet_row_elimination() {
    let (mut sparse, _) = cycle4();
    sparse.clear_row_block(2);

    let n = sparse.scalar_dim();
    let x: Vec<f64> = (0..n).map(|i| i as f64 + 1.0).collect();
    let mut y = vec![0.0; n];
    sparse.mat_vec(&x, &mut y);

    // Row block 2 is now the identity.
    assert_eq!(y[4], x[4]);
    assert_eq!(y[5], x[5]);
    // Other rows still couple their neighbors.
    assert!((y[0] - x[0]).abs() > 1.0);
}

#[test]
fn pattern_rejects_non_edges() {
    let (mut sparse, _) = cycle4();
    // {0,2} is a diagonal of the cycle, not an edge.
    assert!(sparse.add_block(0, 2, &Block::identity(2)).is_err());
}

// ─── FGMRES + LU-SGS Tests ────────────────────────────────────

/// Block Laplacian on a path graph: SPD, diagonally dominant.
fn block_laplacian(n: usize, dim: usize) -> SparseBlockMatrix {
    let edges: Vec<[VertexId; 2]> = (0..n - 1)
        .map(|i| [VertexId(i as u32), VertexId(i as u32 + 1)])
        .collect();
    let mut m = SparseBlockMatrix::from_edges(n, dim, &edges);
    let mut diag = Block::zeros(dim);
    let mut off = Block::zeros(dim);
    for k in 0..dim {
        diag.set(k, k, 4.0);
        off.set(k, k, -1.0);
    }
    for i in 0..n {
        m.add_block(i, i, &diag).unwrap();
    }
    for e in &edges {
        let (a, b) = (e[0].index(), e[1].index());
        m.add_block(a, b, &off).unwrap();
        m.add_block(b, a, &off).unwrap();
    }
    m
}

#[test]
fn fgmres_with_lu_sgs_recovers_known_solution() {
    let m = block_laplacian(16, 2);
    let n = m.scalar_dim();
    let x_exact: Vec<f64> = (0..n).map(|i| ((i as f64) * 0.31).sin() + 0.5).collect();
    let mut b = vec![0.0; n];
    m.mat_vec(&x_exact, &mut b);

    let solver = FgmresSolver::new(1e-12, 200);
    let precond = LuSgsPreconditioner::new(&m);
    let mut x = vec![0.0; n];
    let stats = solver.solve(&m, &precond, &b, &mut x);

    assert!(stats.converged, "relative residual {}", stats.residual);
    for i in 0..n {
        assert!((x[i] - x_exact[i]).abs() < 1e-8);
    }
}

#[test]
fn lu_sgs_accelerates_convergence() {
    let m = block_laplacian(24, 3);
    let n = m.scalar_dim();
    let b: Vec<f64> = (0..n).map(|i| 1.0 + (i % 5) as f64).collect();

    let solver = FgmresSolver::new(1e-10, 500);

    let mut x_plain = vec![0.0; n];
    let plain = solver.solve(&m, &IdentityPreconditioner, &b, &mut x_plain);

    let mut x_pc = vec![0.0; n];
    let precond = LuSgsPreconditioner::new(&m);
    let pc = solver.solve(&m, &precond, &b, &mut x_pc);

    assert!(plain.converged && pc.converged);
    assert!(
        pc.iterations <= plain.iterations,
        "LU-SGS took {} iters, identity took {}",
        pc.iterations,
        plain.iterations
    );
}

#[test]
fn residual_non_increasing_across_restart_cycles() {
    // Each solve call with a warm start is exactly one restart cycle.
    let m = block_laplacian(32, 2);
    let n = m.scalar_dim();
    let b: Vec<f64> = (0..n).map(|i| ((i as f64) * 1.3).cos()).collect();

    let cycle = FgmresSolver::new(1e-14, 4);
    let precond = LuSgsPreconditioner::new(&m);
    let mut x = vec![0.0; n];

    let mut prev = f64::MAX;
    for _ in 0..8 {
        let stats = cycle.solve(&m, &precond, &b, &mut x);
        assert!(
            stats.residual <= prev * (1.0 + 1e-12),
            "residual increased across restart: {} > {}",
            stats.residual,
            prev
        );
        prev = stats.residual;
    }
}

#[test]
fn operator_dim_matches_scalar_dim() {
    let m = block_laplacian(5, 3);
    assert_eq!(LinearOperator::dim(&m), 15);
}
