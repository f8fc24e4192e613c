//! Five-level vertex coordinate history.
//!
//! The grid-velocity rule is a fourth-order backward difference over the
//! positions at the last five macro-steps, so the mesh keeps five full
//! coordinate snapshots. Level 0 is "now"; level `k` is the position as of
//! the substage-advance `k` macro-steps ago.
//!
//! Rotation discipline: the owner calls `push_back()` exactly once per
//! macro-step, on the first Runge-Kutta substage, *before* recomputing
//! level 0. Restart seeds all five levels from the restart file and the
//! driver inhibits the initial rotation (the history is already aligned).

use sirocco_types::constants::N_HISTORY_LEVELS;
use sirocco_types::{SiroccoError, SiroccoResult};

/// Fixed-depth ring of per-vertex coordinate snapshots.
///
/// Coordinates are flat `n_verts * n_dims` buffers, vertex-major.
#[derive(Debug, Clone)]
pub struct VertexHistory {
    n_verts: usize,
    n_dims: usize,
    levels: [Vec<f64>; N_HISTORY_LEVELS],
}

impl VertexHistory {
    /// Creates a history with all five levels seeded from `initial`.
    pub fn new(initial: &[f64], n_dims: usize) -> SiroccoResult<Self> {
        if n_dims != 2 && n_dims != 3 {
            return Err(SiroccoError::InvalidMesh(format!(
                "unsupported spatial dimension {n_dims}"
            )));
        }
        if initial.is_empty() || initial.len() % n_dims != 0 {
            return Err(SiroccoError::InvalidMesh(format!(
                "coordinate buffer length {} is not a multiple of n_dims {}",
                initial.len(),
                n_dims
            )));
        }
        let n_verts = initial.len() / n_dims;
        let level = initial.to_vec();
        Ok(Self {
            n_verts,
            n_dims,
            levels: [
                level.clone(),
                level.clone(),
                level.clone(),
                level.clone(),
                level,
            ],
        })
    }

    /// Number of vertices.
    #[inline]
    pub fn n_verts(&self) -> usize {
        self.n_verts
    }

    /// Spatial dimension.
    #[inline]
    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    /// Rotates the history: `x[4]←x[3], x[3]←x[2], x[2]←x[1], x[1]←x[0]`.
    ///
    /// Level 0 is left in place as the starting point for the new substage.
    pub fn push_back(&mut self) {
        for i in (1..N_HISTORY_LEVELS).rev() {
            let (lower, upper) = self.levels.split_at_mut(i);
            upper[0].copy_from_slice(&lower[i - 1]);
        }
    }

    /// Returns the coordinate buffer at logical level `k` (0 = "now").
    #[inline]
    pub fn level(&self, k: usize) -> &[f64] {
        &self.levels[k]
    }

    /// Returns the current coordinate buffer.
    #[inline]
    pub fn current(&self) -> &[f64] {
        &self.levels[0]
    }

    /// Returns the current coordinate buffer mutably.
    #[inline]
    pub fn current_mut(&mut self) -> &mut [f64] {
        &mut self.levels[0]
    }

    /// Position of vertex `iv` at level `k`, as a `n_dims` slice.
    #[inline]
    pub fn pos(&self, k: usize, iv: usize) -> &[f64] {
        &self.levels[k][iv * self.n_dims..(iv + 1) * self.n_dims]
    }

    /// Seeds all five levels from restart data (level 0 first).
    pub fn seed_restart(&mut self, levels: [&[f64]; N_HISTORY_LEVELS]) -> SiroccoResult<()> {
        for (dst, src) in self.levels.iter_mut().zip(levels) {
            if src.len() != self.n_verts * self.n_dims {
                return Err(SiroccoError::InvalidMesh(format!(
                    "restart level length {} != {}",
                    src.len(),
                    self.n_verts * self.n_dims
                )));
            }
            dst.copy_from_slice(src);
        }
        Ok(())
    }
}
