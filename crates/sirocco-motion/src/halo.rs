//! Cross-partition communication seam.
//!
//! The motion core is single-threaded per partition; everything it needs
//! from its neighbors goes through this trait as blocking collectives:
//! halo exchange of shared-vertex fields (Dirichlet data, Krylov search
//! directions) and global reductions for the minimum element measure and
//! residual norms. The serial implementation is the identity.

/// Blocking collective operations over the partition boundary.
pub trait PartitionExchange {
    /// Exchanges a per-vertex field so shared vertices agree on all
    /// partitions. Flat layout, `n_verts * n_dims`.
    fn sync_vertex_field(&self, field: &mut [f64]);

    /// Global minimum reduction.
    fn reduce_min(&self, local: f64) -> f64;

    /// Global sum reduction.
    fn reduce_sum(&self, local: f64) -> f64;
}

/// Serial (single-partition) implementation: every collective is the
/// identity.
pub struct SinglePartition;

impl PartitionExchange for SinglePartition {
    fn sync_vertex_field(&self, _field: &mut [f64]) {}

    fn reduce_min(&self, local: f64) -> f64 {
        local
    }

    fn reduce_sum(&self, local: f64) -> f64 {
        local
    }
}
