//! Flow-solver collaborator interface.
//!
//! The motion core writes updated shape-node positions and grid
//! velocities into the flow solver's per-element-type containers through
//! this narrow trait, then asks it to rebuild its geometric transforms.
//! The core never reads back.

use sirocco_mesh::ElementType;

/// Per-element-type geometry sink of the flow solver.
pub trait FlowElements {
    /// Writes the new position of shape node `iv_local` of cell
    /// `ic_local` (index within its element type).
    fn set_dynamic_shape_node(
        &mut self,
        etype: ElementType,
        iv_local: usize,
        ic_local: usize,
        pos: &[f64],
    );

    /// Restart variant: writes all five history levels of a shape node
    /// (`levels[0]` is "now").
    fn set_dynamic_shape_node_restart(
        &mut self,
        etype: ElementType,
        iv_local: usize,
        ic_local: usize,
        levels: &[&[f64]],
    );

    /// Writes the grid velocity at shape point `iv_local` of cell `ic_local`.
    fn set_grid_vel_spt(&mut self, etype: ElementType, ic_local: usize, iv_local: usize, vel: &[f64]);

    /// Interpolates shape-point grid velocity to the flux points.
    fn set_grid_vel_fpts(&mut self, rk_step: i32);

    /// Interpolates shape-point grid velocity to the solution points.
    fn set_grid_vel_upts(&mut self, rk_step: i32);

    /// Rebuilds the dynamic geometric transforms from the new shape nodes.
    fn set_transforms_dynamic(&mut self);
}

/// A collaborator that ignores everything (static runs, benchmarks).
pub struct NullFlowElements;

impl FlowElements for NullFlowElements {
    fn set_dynamic_shape_node(&mut self, _: ElementType, _: usize, _: usize, _: &[f64]) {}
    fn set_dynamic_shape_node_restart(&mut self, _: ElementType, _: usize, _: usize, _: &[&[f64]]) {}
    fn set_grid_vel_spt(&mut self, _: ElementType, _: usize, _: usize, _: &[f64]) {}
    fn set_grid_vel_fpts(&mut self, _rk_step: i32) {}
    fn set_grid_vel_upts(&mut self, _rk_step: i32) {}
    fn set_transforms_dynamic(&mut self) {}
}

/// A collaborator that records every call, for tests.
#[derive(Default)]
pub struct RecordingFlowElements {
    /// `(etype, iv_local, ic_local, pos)` for each shape-node write.
    pub shape_nodes: Vec<(ElementType, usize, usize, Vec<f64>)>,
    /// `(etype, ic_local, iv_local, vel)` for each velocity write.
    pub velocities: Vec<(ElementType, usize, usize, Vec<f64>)>,
    /// `rk_step` of each flux-point interpolation request.
    pub fpt_updates: Vec<i32>,
    /// `rk_step` of each solution-point interpolation request.
    pub upt_updates: Vec<i32>,
    /// Number of transform rebuilds requested.
    pub transform_rebuilds: u32,
    /// Number of restart shape-node writes.
    pub restart_nodes: u32,
}

impl RecordingFlowElements {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlowElements for RecordingFlowElements {
    fn set_dynamic_shape_node(
        &mut self,
        etype: ElementType,
        iv_local: usize,
        ic_local: usize,
        pos: &[f64],
    ) {
        self.shape_nodes.push((etype, iv_local, ic_local, pos.to_vec()));
    }

    fn set_dynamic_shape_node_restart(
        &mut self,
        _etype: ElementType,
        _iv_local: usize,
        _ic_local: usize,
        _levels: &[&[f64]],
    ) {
        self.restart_nodes += 1;
    }

    fn set_grid_vel_spt(
        &mut self,
        etype: ElementType,
        ic_local: usize,
        iv_local: usize,
        vel: &[f64],
    ) {
        self.velocities.push((etype, ic_local, iv_local, vel.to_vec()));
    }

    fn set_grid_vel_fpts(&mut self, rk_step: i32) {
        self.fpt_updates.push(rk_step);
    }

    fn set_grid_vel_upts(&mut self, rk_step: i32) {
        self.upt_updates.push(rk_step);
    }

    fn set_transforms_dynamic(&mut self) {
        self.transform_rebuilds += 1;
    }
}
