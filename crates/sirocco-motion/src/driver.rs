//! The motion dispatcher.
//!
//! `MotionDriver` owns the dynamic mesh and the motion configuration,
//! and advances the grid by one Runge-Kutta substage at a time: it
//! computes the substage time, rotates the coordinate history on the
//! first substage of each macro-step, runs the selected motion strategy,
//! and pushes the resulting positions and grid velocities to the flow
//! collaborator.

use sirocco_mesh::{gmsh, DynamicMesh};
use sirocco_telemetry::{EventBus, EventCounters, EventKind, EventSink, MotionEvent};
use sirocco_types::{SiroccoError, SiroccoResult};

use crate::config::{MotionConfig, MotionMode, OscillationSpec};
use crate::elasticity::{DeformStats, ElasticitySolver};
use crate::flow::FlowElements;
use crate::halo::{PartitionExchange, SinglePartition};
use crate::kernels;
use crate::velocity;

/// Per-run motion state: mesh, configuration, substage clock, telemetry.
pub struct MotionDriver {
    mesh: DynamicMesh,
    config: MotionConfig,
    bus: EventBus,
    halo: Box<dyn PartitionExchange>,
    /// Mesh-boundary index and descriptor for each configured moving
    /// boundary.
    bnd_match: Vec<(usize, OscillationSpec)>,
    /// Substage times as fractions of dt.
    rk_c: Vec<f64>,
    n_stages: usize,
    iter: u32,
    rk_step: i32,
    time: f64,
    rk_time: f64,
    /// Outcome of the last elastic deformation, if any.
    last_deform: Option<DeformStats>,
}

impl MotionDriver {
    /// Validates the configuration against the mesh and builds the driver.
    ///
    /// Every configured moving boundary must match a mesh boundary of the
    /// same kind; a dangling descriptor is fatal here.
    pub fn new(mesh: DynamicMesh, config: MotionConfig) -> SiroccoResult<Self> {
        config.validate()?;

        let mut bnd_match = Vec::with_capacity(config.moving_boundaries.len());
        for spec in &config.moving_boundaries {
            let idx = mesh
                .boundaries()
                .iter()
                .position(|b| b.kind == spec.kind)
                .ok_or_else(|| {
                    SiroccoError::InvalidConfig(format!(
                        "moving boundary {:?} does not match any mesh boundary",
                        spec.kind
                    ))
                })?;
            bnd_match.push((idx, spec.oscillation));
        }

        let tableau = config.scheme.tableau();
        let n_stages = config.scheme.n_stages();

        Ok(Self {
            mesh,
            config,
            bus: EventBus::new(),
            halo: Box::new(SinglePartition),
            bnd_match,
            rk_c: tableau.c,
            n_stages,
            iter: 0,
            rk_step: 0,
            time: 0.0,
            rk_time: 0.0,
            last_deform: None,
        })
    }

    /// Replaces the partition-exchange collaborator (multi-partition runs).
    pub fn with_halo(mut self, halo: Box<dyn PartitionExchange>) -> Self {
        self.halo = halo;
        self
    }

    /// Registers a telemetry sink.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.bus.add_sink(sink);
    }

    #[inline]
    pub fn mesh(&self) -> &DynamicMesh {
        &self.mesh
    }

    #[inline]
    pub fn mesh_mut(&mut self) -> &mut DynamicMesh {
        &mut self.mesh
    }

    #[inline]
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Physical time at the start of the current macro-step.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The substage time of the last `move_substage` call.
    #[inline]
    pub fn rk_time(&self) -> f64 {
        self.rk_time
    }

    /// Statistics of the last elastic deformation, if mode E has run.
    #[inline]
    pub fn last_deform(&self) -> Option<&DeformStats> {
        self.last_deform.as_ref()
    }

    /// Number of substages per macro-step.
    #[inline]
    pub fn n_stages(&self) -> usize {
        self.n_stages
    }

    /// Advances the grid to substage `rk_step` of macro-step `iter`.
    ///
    /// `time` is the physical time at the start of the macro-step (owned
    /// by the flow solver). History rotates only on substage 0; the
    /// substage time is `time + dt·c[rk_step]` for multi-stage schemes
    /// and `time + dt` otherwise.
    pub fn move_substage(
        &mut self,
        iter: u32,
        rk_step: usize,
        time: f64,
        flow: &mut dyn FlowElements,
    ) -> SiroccoResult<()> {
        self.iter = iter;
        self.rk_step = rk_step as i32;
        self.time = time;
        self.rk_time = if self.n_stages > 1 {
            time + self.config.dt * self.rk_c[rk_step]
        } else {
            time + self.config.dt
        };

        if self.config.mode == MotionMode::Static {
            return Ok(());
        }

        self.bus.emit(MotionEvent::new(
            iter,
            self.rk_step,
            EventKind::SubstageBegin {
                rk_time: self.rk_time,
            },
        ));

        // One history rotation per macro-step, before the new positions.
        if rk_step == 0 {
            self.mesh.history_mut().push_back();
        }

        match self.config.mode {
            MotionMode::Static => unreachable!(),
            MotionMode::Elasticity => {
                let mut solver = ElasticitySolver {
                    config: &self.config,
                    halo: &*self.halo,
                    bus: &mut self.bus,
                };
                let stats = solver.deform(
                    &mut self.mesh,
                    &self.bnd_match,
                    self.rk_time,
                    iter,
                    self.rk_step,
                )?;
                self.last_deform = Some(stats);
            }
            MotionMode::Rigid => {
                kernels::rigid_update(&mut self.mesh, &self.config.rigid, self.rk_time);
            }
            MotionMode::Perturb => {
                kernels::perturb_update(&mut self.mesh, self.rk_time);
            }
            MotionMode::Blend => {
                kernels::blend_update(
                    &mut self.mesh,
                    &self.bnd_match,
                    self.config.blend_dist,
                    self.rk_time,
                );
            }
        }

        velocity::update_flow(
            &mut self.mesh,
            &self.config,
            self.rk_time,
            self.rk_step,
            flow,
        );
        Ok(())
    }

    /// Re-enters a run from restart data.
    ///
    /// Seeds all five history levels, recomputes the grid velocity from
    /// them, and pushes every level to the flow collaborator. The substage
    /// index is left at −1 so no history rotation is attributed to the
    /// restart itself.
    pub fn initialize_restart(
        &mut self,
        iter: u32,
        time: f64,
        levels: [&[f64]; 5],
        flow: &mut dyn FlowElements,
    ) -> SiroccoResult<()> {
        self.iter = iter;
        self.time = time;
        self.rk_time = time;
        self.rk_step = -1;

        self.mesh.history_mut().seed_restart(levels)?;

        velocity::compute_grid_velocity(&mut self.mesh, &self.config, self.rk_time);
        velocity::push_velocity(&self.mesh, flow, self.rk_step);
        velocity::push_shape_nodes_restart(&self.mesh, flow);
        Ok(())
    }

    /// Writes the current grid in the given format, named
    /// `{stem}_{iter:09}.msh` in the original mesh's naming scheme.
    pub fn write_mesh(&mut self, format: gmsh::MeshFormat, stem: &str) -> SiroccoResult<String> {
        let name = gmsh::mesh_output_name(stem, self.iter);
        gmsh::write_mesh(&self.mesh, format, std::path::Path::new(&name))?;
        self.bus.emit(MotionEvent::new(
            self.iter,
            self.rk_step,
            EventKind::MeshWritten { path: name.clone() },
        ));
        Ok(name)
    }

    /// Running grid-health counters (degenerate elements, negative
    /// volumes, solver failures).
    pub fn telemetry_counters(&self) -> EventCounters {
        self.bus.counters()
    }

    /// Finalizes every telemetry sink. Call once when the run ends.
    pub fn finalize_telemetry(&mut self) {
        self.bus.finalize();
    }
}
